use std::path::PathBuf;

use bookrec::Result;
use bookrec::commands::{build_index, run_recommend, show_status};
use bookrec::config::{Config, run_interactive_config, show_config};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookrec")]
#[command(about = "Semantic book and research paper recommendations from a local embedding model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the Ollama connection and index settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Build the catalog index from cleaned dataset files
    Build {
        /// Path to the books dataset (JSON array of records)
        #[arg(long)]
        books: Option<PathBuf>,
        /// Path to the papers dataset (JSON array of records)
        #[arg(long)]
        papers: Option<PathBuf>,
        /// Where to write the index snapshot (defaults to the configured location)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Recommend books and papers for a query
    Recommend {
        /// Free-text query
        query: String,
        /// Number of book recommendations
        #[arg(long, default_value_t = 5)]
        books: i64,
        /// Number of paper recommendations
        #[arg(long, default_value_t = 5)]
        papers: i64,
        /// Index snapshot to query (defaults to the configured location)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Show details about the current index snapshot
    Status {
        /// Index snapshot to inspect (defaults to the configured location)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Build {
            books,
            papers,
            snapshot,
        } => {
            let config = Config::load()?;
            build_index(&config, books.as_deref(), papers.as_deref(), snapshot)?;
        }
        Commands::Recommend {
            query,
            books,
            papers,
            snapshot,
        } => {
            let config = Config::load()?;
            run_recommend(&config, &query, books, papers, snapshot)?;
        }
        Commands::Status { snapshot } => {
            let config = Config::load()?;
            show_status(&config, snapshot)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["bookrec", "status"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::Status { .. });
        }
    }

    #[test]
    fn build_command_with_datasets() {
        let cli = Cli::try_parse_from([
            "bookrec",
            "build",
            "--books",
            "books.json",
            "--papers",
            "papers.json",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Build { books, papers, .. } = parsed.command {
                assert_eq!(books, Some(PathBuf::from("books.json")));
                assert_eq!(papers, Some(PathBuf::from("papers.json")));
            }
        }
    }

    #[test]
    fn recommend_command_defaults() {
        let cli = Cli::try_parse_from(["bookrec", "recommend", "deep learning"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Recommend {
                query,
                books,
                papers,
                ..
            } = parsed.command
            {
                assert_eq!(query, "deep learning");
                assert_eq!(books, 5);
                assert_eq!(papers, 5);
            }
        }
    }

    #[test]
    fn recommend_command_with_counts() {
        let cli = Cli::try_parse_from([
            "bookrec",
            "recommend",
            "rust systems programming",
            "--books",
            "3",
            "--papers",
            "0",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Recommend { books, papers, .. } = parsed.command {
                assert_eq!(books, 3);
                assert_eq!(papers, 0);
            }
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["bookrec", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["bookrec", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["bookrec", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
