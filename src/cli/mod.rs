//! CLI module for the detective front end
//!
//! Provides command-line interface parsing and handling for the
//! `detective-server` binary. Uses clap for argument parsing and owo-colors
//! for colored terminal output.

pub mod commands;
pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Detective Agent - Ed D.
///
/// Web front end and command line for the remote financial detective agent.
#[derive(Parser, Debug)]
#[command(
    name = "detective-server",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Detective Agent - Ed D.: financial investigations over A2A",
    long_about = "Detective Agent - Ed D.: front end for a remote financial detective agent.\n\n\
                  Run without arguments to start the web front end, use 'investigate' to run\n\
                  one investigation in the terminal, or 'render' to turn a Markdown report into a PDF.",
    after_help = "EXAMPLES:\n    \
                  detective-server init                          # Scaffold detective.toml\n    \
                  detective-server                               # Start the web front end\n    \
                  detective-server investigate Tesla --pdf t.pdf # Investigate and export\n    \
                  detective-server render report.md --out r.pdf  # Render an existing report"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "detective.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web front end (default)
    Serve {
        /// Watch the configuration file and reload on change
        #[arg(long)]
        watch: bool,
    },

    /// Run one investigation and print the report
    Investigate {
        /// Company name or free-form query
        query: String,

        /// Also export the report as PDF to this path
        #[arg(long)]
        pdf: Option<PathBuf>,
    },

    /// Render a Markdown report file to PDF
    Render {
        /// Markdown report to render
        file: PathBuf,

        /// Output path (defaults to the input with a .pdf extension)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Image placed above the title (defaults to report.image_path)
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Scaffold detective.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Remote agent base URL
        #[arg(long, default_value = "http://localhost:8001")]
        server_url: String,

        /// Port for the web front end
        #[arg(long, default_value = "7860")]
        port: u16,
    },

    /// Show the effective configuration
    Config {
        /// Only validate, reporting warnings
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Output helper honoring `--no-color`
    pub fn output(&self) -> output::Output {
        if self.no_color {
            output::Output::no_color()
        } else {
            output::Output::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_help_names_the_agent() {
        use clap::CommandFactory;
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("Detective Agent - Ed D."));
    }

    #[test]
    fn test_default_is_serve() {
        let cli = Cli::try_parse_from(["detective-server"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("detective.toml"));
    }

    #[test]
    fn test_investigate_args() {
        let cli = Cli::try_parse_from([
            "detective-server",
            "investigate",
            "Tesla",
            "--pdf",
            "out.pdf",
            "--no-color",
        ])
        .unwrap();

        assert!(cli.no_color);
        match cli.command {
            Some(Commands::Investigate { query, pdf }) => {
                assert_eq!(query, "Tesla");
                assert_eq!(pdf, Some(PathBuf::from("out.pdf")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_render_args() {
        let cli = Cli::try_parse_from([
            "detective-server",
            "--config",
            "alt.toml",
            "render",
            "report.md",
            "-o",
            "report.pdf",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert!(matches!(
            cli.command,
            Some(Commands::Render { out: Some(_), image: None, .. })
        ));
    }
}
