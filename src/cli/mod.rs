//! CLI module for Curator.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Curator - passage indexing and grounded answers for a content library
///
/// Chunks video transcripts and blog posts into passages, pushes them to a
/// vector index, and answers questions using only the indexed content.
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split text into passages and print them
    Chunk {
        /// Text file to chunk (reads stdin if omitted)
        file: Option<String>,

        /// Chunking strategy (paragraph, sentence-count)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Print passages as JSON
        #[arg(long)]
        json: bool,
    },

    /// Chunk the content library and upsert it into the vector index
    Index {
        /// Target namespace (defaults to the configured one)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Chunk and report without writing to the index
        #[arg(long)]
        dry_run: bool,
    },

    /// Search for relevant passages
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        /// Namespace to search (defaults to the configured one)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Ask a question and get an answer grounded in the library
    Ask {
        /// The question to ask
        question: String,

        /// Number of passages to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// LLM model to use for response generation
        #[arg(short, long)]
        model: Option<String>,

        /// Namespace to search (defaults to the configured one)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Start an interactive question session
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["curator", "-vv", "ask", "What is a trait?", "-k", "3"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Ask { question, top_k, .. } => {
                assert_eq!(question, "What is a trait?");
                assert_eq!(top_k, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_index_dry_run() {
        let cli = Cli::parse_from(["curator", "index", "--namespace", "drafts", "--dry-run"]);
        assert!(matches!(
            cli.command,
            Commands::Index { namespace: Some(ref ns), dry_run: true } if ns == "drafts"
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
