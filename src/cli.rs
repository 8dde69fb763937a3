use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scene-namer")]
#[command(about = "Match media files against Radarr and rename them to their scene names")]
pub struct Cli {
    /// Path to config.toml (defaults to the per-user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log Radarr requests and responses
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look up a movie in Radarr and print the matched record as JSON
    #[command(group(ArgGroup::new("query").required(true).args(["tmdb_id", "filename"])))]
    Lookup {
        /// TMDb id of a movie already in the library
        #[arg(long)]
        tmdb_id: Option<u64>,

        /// File or folder name to search for
        #[arg(long)]
        filename: Option<String>,

        /// Name used to pick between several results (defaults to --filename)
        #[arg(long)]
        hint: Option<String>,
    },

    /// Normalize a scene name with the configured naming rules
    Normalize {
        scene_name: String,

        /// Source file whose extension should be kept
        #[arg(long)]
        original: Option<PathBuf>,
    },

    /// Rename files or folders to the scene name Radarr recorded for them
    Rename {
        /// Input files or directories to process
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Skip confirmation prompts
        #[arg(long)]
        no_confirm: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_requires_a_query() {
        assert!(Cli::try_parse_from(["scene-namer", "lookup"]).is_err());
        assert!(
            Cli::try_parse_from(["scene-namer", "lookup", "--tmdb-id", "1", "--filename", "x"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["scene-namer", "--debug", "lookup", "--tmdb-id", "603"])
            .unwrap();
        assert!(cli.debug);
        assert!(matches!(
            cli.command,
            Command::Lookup {
                tmdb_id: Some(603),
                filename: None,
                hint: None
            }
        ));
    }

    #[test]
    fn test_rename_args() {
        let cli = Cli::try_parse_from([
            "scene-namer",
            "rename",
            "a.mkv",
            "b",
            "--no-confirm",
            "--config",
            "/tmp/c.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        match cli.command {
            Command::Rename { inputs, no_confirm } => {
                assert_eq!(inputs, vec![PathBuf::from("a.mkv"), PathBuf::from("b")]);
                assert!(no_confirm);
            }
            _ => panic!("expected rename"),
        }
    }
}
