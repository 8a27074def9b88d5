//! @ai:module:intent CLI for the Uncoder explain service
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use uncoder_core::Instruction;
use uncoder_explain::{
    client::{CompletionClient, CompletionClientTrait, MockCompletionClient, ProxyClient},
    config::ExplainConfig,
    explainer::{BlockExplanation, Explainer, Walkthrough},
    language::detect_language,
    transcript::RunRecord,
};

#[derive(Parser)]
#[command(name = "uncoder-explain")]
#[command(about = "Uncoder - explain source code through a completion API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "uncoder.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Explain a highlighted line range of a source file
    Explain {
        /// Path to source file
        file: PathBuf,

        /// First line of the highlighted block (1-based, inclusive)
        #[arg(long)]
        start: usize,

        /// Last line of the highlighted block (1-based, inclusive)
        #[arg(long)]
        end: usize,

        /// Save a transcript of the run
        #[arg(long)]
        save: bool,

        /// Print the prompt without querying the API
        #[arg(long)]
        dry_run: bool,
    },

    /// Walk through a source file block by block
    Walkthrough {
        /// Path to source file
        file: PathBuf,

        /// Instruction phrasing for the prompt
        #[arg(long, value_enum, default_value = "base")]
        instruction: Instruction,

        /// Save a transcript of the run
        #[arg(long)]
        save: bool,

        /// Print the prompt without querying the API
        #[arg(long)]
        dry_run: bool,
    },

    /// Render a prompt offline (no network)
    Prompt {
        /// Path to source file
        file: PathBuf,

        /// First line of the highlighted block (1-based, inclusive)
        #[arg(long)]
        start: Option<usize>,

        /// Last line of the highlighted block (1-based, inclusive)
        #[arg(long)]
        end: Option<usize>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "uncoder.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("uncoder_explain=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = ExplainConfig::load(&cli.config)?;

    match cli.command {
        Commands::Explain {
            file,
            start,
            end,
            save,
            dry_run,
        } => run_explain(&config, &file, start, end, save, dry_run).await,
        Commands::Walkthrough {
            file,
            instruction,
            save,
            dry_run,
        } => run_walkthrough(&config, &file, instruction, save, dry_run).await,
        Commands::Prompt { file, start, end } => render_prompt(&config, &file, start, end),
        Commands::Init { output } => init_config(&output),
    }
}

/// @ai:intent Explain a highlighted line range
/// @ai:effects network, fs:read, fs:write
async fn run_explain(
    config: &ExplainConfig,
    file: &Path,
    start: usize,
    end: usize,
    save: bool,
    dry_run: bool,
) -> Result<()> {
    let source = read_source(file)?;
    let block = line_range(&source, start, end)?;
    let language = detect_language(file);

    if dry_run {
        let explainer = offline_explainer(config);
        println!("{}", explainer.block_prompt(&source, &block, language)?);
        return Ok(());
    }

    let explanation = match config.api.proxy_url.clone() {
        Some(url) => {
            let client = Arc::new(ProxyClient::new(url, config.api.requests_per_minute)?);
            explain_with(client, config, &source, &block, language).await?
        }
        None => {
            let client = Arc::new(CompletionClient::new(config.api.clone())?);
            explain_with(client, config, &source, &block, language).await?
        }
    };

    println!("{}", explanation.explanation);

    if save {
        let record = RunRecord::new(
            "explain",
            Instruction::BlockBase.as_str(),
            language,
            &explanation.prompt,
            &explanation.explanation,
        );
        record.save(&config.paths.transcripts_dir)?;
    }

    Ok(())
}

/// @ai:intent Walk through a whole source file
/// @ai:effects network, fs:read, fs:write
async fn run_walkthrough(
    config: &ExplainConfig,
    file: &Path,
    instruction: Instruction,
    save: bool,
    dry_run: bool,
) -> Result<()> {
    let source = read_source(file)?;
    let language = detect_language(file);

    if dry_run {
        let explainer = offline_explainer(config);
        println!("{}", explainer.plain_prompt(&source, language, instruction));
        return Ok(());
    }

    let walkthrough = match config.api.proxy_url.clone() {
        Some(url) => {
            let client = Arc::new(ProxyClient::new(url, config.api.requests_per_minute)?);
            walkthrough_with(client, config, &source, language, instruction).await?
        }
        None => {
            let client = Arc::new(CompletionClient::new(config.api.clone())?);
            walkthrough_with(client, config, &source, language, instruction).await?
        }
    };

    if walkthrough.steps.is_empty() {
        println!("No walkthrough steps returned");
    }

    for (index, step) in walkthrough.steps.iter().enumerate() {
        println!("Step {}:", index + 1);
        println!("{}", step.code);

        if !step.description.is_empty() {
            println!();
            println!("{}", step.description);
        }

        println!();
    }

    if save {
        let record = RunRecord::new(
            "walkthrough",
            instruction.as_str(),
            language,
            &walkthrough.prompt,
            &walkthrough.response,
        );
        record.save(&config.paths.transcripts_dir)?;
    }

    Ok(())
}

/// @ai:intent Run explain_block against a chosen client
/// @ai:effects network
async fn explain_with<C: CompletionClientTrait>(
    client: Arc<C>,
    config: &ExplainConfig,
    source: &str,
    block: &str,
    language: &str,
) -> Result<BlockExplanation> {
    let explainer = Explainer::new(client, config.window.clone());
    explainer.explain_block(source, block, language).await
}

/// @ai:intent Run walkthrough against a chosen client
/// @ai:effects network
async fn walkthrough_with<C: CompletionClientTrait>(
    client: Arc<C>,
    config: &ExplainConfig,
    source: &str,
    language: &str,
    instruction: Instruction,
) -> Result<Walkthrough> {
    let explainer = Explainer::new(client, config.window.clone());
    explainer.walkthrough(source, language, instruction).await
}

/// @ai:intent Render a prompt offline
/// @ai:effects fs:read
fn render_prompt(
    config: &ExplainConfig,
    file: &Path,
    start: Option<usize>,
    end: Option<usize>,
) -> Result<()> {
    let source = read_source(file)?;
    let language = detect_language(file);
    let explainer = offline_explainer(config);

    let prompt = match (start, end) {
        (Some(start), Some(end)) => {
            let block = line_range(&source, start, end)?;
            explainer.block_prompt(&source, &block, language)?
        }
        (None, None) => explainer.plain_prompt(&source, language, Instruction::Base),
        _ => anyhow::bail!("--start and --end must be given together"),
    };

    println!("{}", prompt);
    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: &Path) -> Result<()> {
    let config = ExplainConfig::default();
    config.save(output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent An explainer whose client is never queried
/// @ai:effects pure
fn offline_explainer(config: &ExplainConfig) -> Explainer<MockCompletionClient> {
    Explainer::new(
        Arc::new(MockCompletionClient::new(String::new())),
        config.window.clone(),
    )
}

/// @ai:intent Read a source file
/// @ai:effects fs:read
fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// @ai:intent Take a 1-based inclusive line range as the highlighted block
/// @ai:post the result is a verbatim substring of source
/// @ai:effects pure
fn line_range(source: &str, start: usize, end: usize) -> Result<String> {
    let lines: Vec<&str> = source.split('\n').collect();

    if start == 0 || end < start || end > lines.len() {
        anyhow::bail!(
            "Invalid line range {}-{} (file has {} lines)",
            start,
            end,
            lines.len()
        );
    }

    Ok(lines[start - 1..end].join("\n"))
}
