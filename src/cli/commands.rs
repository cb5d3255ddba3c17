use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notesync")]
#[command(version, about = "Personal notes with search, paging and tag suggestions")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand. They override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to a YAML config file (default: ./notesync.yaml if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Snapshot file for the local note store
    #[arg(long, global = true, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Use a remote notesync server instead of the local store
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Act as this user
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the local note store
    Init {
        /// Seed the store with demo notes
        #[arg(long)]
        sample: bool,
    },

    /// Run the REST server
    Serve {
        /// Listen address (overrides config `bind`)
        #[arg(long)]
        bind: Option<String>,

        /// Serve demo notes from memory instead of the data file
        #[arg(long)]
        sample: bool,
    },

    /// List notes, newest first
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single note
    Get {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new note
    Add {
        title: String,

        /// Note body
        #[arg(long, conflicts_with = "stdin")]
        content: Option<String>,

        /// Read the note body from stdin
        #[arg(long)]
        stdin: bool,

        /// Tags (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields of an existing note
    Update {
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long, conflicts_with = "stdin")]
        content: Option<String>,

        /// Read the new body from stdin
        #[arg(long)]
        stdin: bool,

        /// Replace the tags (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a note permanently
    Delete { id: String },

    /// Search notes by text and tags
    Search {
        /// Search text; `tag:<name>` tokens filter by tag
        query: Option<String>,

        /// Tag filter (can be specified multiple times); matches any
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest tags for some text
    Suggest {
        content: String,

        /// Tags already on the note (can be specified multiple times)
        #[arg(long = "exclude", short = 'x')]
        exclude: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_tags_and_globals() {
        let cli = Cli::try_parse_from([
            "notesync",
            "search",
            "tag:work report",
            "-t",
            "todo",
            "--page",
            "2",
            "--data-file",
            "/tmp/n.json",
        ])
        .unwrap();
        assert_eq!(cli.global.data_file, Some(PathBuf::from("/tmp/n.json")));
        match cli.command {
            Commands::Search {
                query, tags, page, ..
            } => {
                assert_eq!(query.as_deref(), Some("tag:work report"));
                assert_eq!(tags, vec!["todo"]);
                assert_eq!(page, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_content_and_stdin_conflict() {
        let result = Cli::try_parse_from(["notesync", "add", "t", "--content", "c", "--stdin"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
