//! @ai:module:intent Rate limiting for completion API requests
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter
//! @ai:module:depends_on config
//! @ai:module:stateless false

use crate::config::ApiConfig;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// @ai:intent Token bucket limiter in front of the completion clients
///
/// Capacity and refill rate both derive from a requests-per-minute budget:
/// a full bucket holds one minute's worth of requests, and tokens trickle
/// back at that same budget spread over the minute.
pub struct RateLimiter {
    state: Mutex<State>,
    capacity: f64,
    refill_per_sec: f64,
}

struct State {
    available: f64,
    updated_at: Instant,
}

impl RateLimiter {
    /// @ai:intent Create a limiter with a full bucket
    /// @ai:post a zero budget is treated as one request per minute
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32) -> Self {
        let capacity = requests_per_minute.max(1) as f64;

        Self {
            state: Mutex::new(State {
                available: capacity,
                updated_at: Instant::now(),
            }),
            capacity,
            refill_per_sec: capacity / 60.0,
        }
    }

    /// @ai:intent Create a limiter sized by the API configuration
    /// @ai:effects pure
    pub fn from_api(config: &ApiConfig) -> Self {
        Self::new(config.requests_per_minute)
    }

    /// @ai:intent Wait until a request token is available, then take it
    /// @ai:effects state:write, time
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;

                let now = Instant::now();
                let refilled = now.duration_since(state.updated_at).as_secs_f64()
                    * self.refill_per_sec;
                state.available = (state.available + refilled).min(self.capacity);
                state.updated_at = now;

                if state.available >= 1.0 {
                    state.available -= 1.0;
                    return;
                }

                Duration::from_secs_f64((1.0 - state.available) / self.refill_per_sec)
            };

            tokio::time::sleep(wait).await;
        }
    }
}
