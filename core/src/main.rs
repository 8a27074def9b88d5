//! @ai:module:intent CLI entry point for uncoder extraction and windowing
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on extract, output, window

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use uncoder_core::{extract, output, window, Error, OutputFormat, WindowConfig};

#[derive(Parser)]
#[command(name = "uncoder")]
#[command(author, version, about = "Uncoder - code-block extraction and prompt windows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and show its fenced code blocks
    Parse {
        /// Path to file
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Extract code blocks from every document in a directory
    Extract {
        /// Path to directory
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "json-pretty")]
        format: Format,
    },

    /// Print the bounded source window around a highlighted block
    Window {
        /// Path to source file
        path: PathBuf,

        /// Highlighted block text (verbatim substring of the source)
        #[arg(long)]
        block: Option<String>,

        /// Read the highlighted block from a file instead
        #[arg(long)]
        block_file: Option<PathBuf>,

        /// Maximum number of lines in the window
        #[arg(long, default_value = "200")]
        window_size: usize,

        /// Lines of trailing context after the block
        #[arg(long, default_value = "40")]
        suffix_size: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { path, format } => match extract::extract_file(&path) {
            Ok(document) => {
                println!("{}", output::format_document(&document, format.into()));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        },

        Commands::Extract { path, format } => {
            if !path.is_dir() {
                eprintln!("Error: extract command requires a directory path");
                return ExitCode::from(2);
            }

            match extract::extract_dir(&path) {
                Ok(documents) => {
                    println!("{}", output::format_documents(&documents, format.into()));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }

        Commands::Window {
            path,
            block,
            block_file,
            window_size,
            suffix_size,
        } => {
            let config = WindowConfig {
                window_size,
                suffix_size,
            };

            match run_window(&path, block, block_file, &config) {
                Ok(window) => {
                    println!("{}", window);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }
    }
}

/// @ai:intent Resolve block text and build the window
/// @ai:effects fs:read
fn run_window(
    path: &std::path::Path,
    block: Option<String>,
    block_file: Option<PathBuf>,
    config: &WindowConfig,
) -> uncoder_core::Result<String> {
    let source = read_file(path)?;

    let block = match (block, block_file) {
        (Some(text), _) => text,
        (None, Some(file)) => read_file(&file)?,
        (None, None) => {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "one of --block or --block-file is required",
            )))
        }
    };

    window::build_window(&source, &block, config)
}

/// @ai:intent Read a file, attaching the path to any failure
/// @ai:effects fs:read
fn read_file(path: &std::path::Path) -> uncoder_core::Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
