//! Refrain CLI
//!
//! Command-line interface for Refrain - a rotation of quotes, lyrics and
//! affirmations. With no arguments it prints the next line in sequence.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use refrain_core::{Config, StorageError, Store, DEFAULT_KIND};

mod commands;
mod interactive;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "refrain")]
#[command(about = "Refrain - your daily rotation of quotes, lyrics and affirmations")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Print a random line instead of the next one
    #[arg(short, long)]
    random: bool,

    /// Show available collections
    #[arg(short, long)]
    collections: bool,

    /// Show recently served lines (default count from config, normally 10)
    #[arg(long, value_name = "N", num_args = 0..=1)]
    history: Option<Option<usize>>,

    /// Show progress through the current collection
    #[arg(short, long)]
    progress: bool,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Library file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Config file to use instead of ~/.config/refrain/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add or replace a collection from markdown (file or stdin)
    Add {
        /// Collection ID (spaces become underscores)
        id: String,
        /// Collection title (defaults to the ID)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Collection type, e.g. affirmations, song_lyrics, poem
        #[arg(short = 't', long = "type", default_value = DEFAULT_KIND)]
        kind: String,
        /// Markdown file to read (reads stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, data_file, history_count, seed, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// What a flag-only invocation should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Random,
    Collections,
    History(Option<usize>),
    Progress,
    Interactive,
}

impl Cli {
    fn has_action_flag(&self) -> bool {
        self.random
            || self.collections
            || self.history.is_some()
            || self.progress
            || self.interactive
    }

    /// One action per invocation: action flags and subcommands don't mix
    fn validate(&self) -> Result<(), clap::Error> {
        if self.command.is_some() && self.has_action_flag() {
            return Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "action flags (-r, -c, --history, -p, -i) cannot be combined with a subcommand",
            ));
        }
        Ok(())
    }

    /// First action flag wins, in the order they are documented
    fn action(&self) -> Action {
        if self.random {
            Action::Random
        } else if self.collections {
            Action::Collections
        } else if let Some(count) = self.history {
            Action::History(count)
        } else if self.progress {
            Action::Progress
        } else if self.interactive {
            Action::Interactive
        } else {
            Action::Next
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        if let Some(hint) = recovery_hint(&err) {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

/// Suggestion attached to the first storage error in the chain
fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StorageError>())
        .and_then(StorageError::recovery_suggestion)
}

fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work on the config file alone
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(path) = &cli.data_file {
        config.data_file = Some(path.clone());
    }

    logging::init(&config, cli.verbose);

    let history_count = config.history_count;
    let mut store = Store::open_with_config(config).context("Failed to open library")?;

    let action = cli.action();
    if let Some(Commands::Add {
        id,
        title,
        kind,
        file,
    }) = cli.command
    {
        return commands::add::run(&mut store, id, title, kind, file, &output);
    }

    match action {
        Action::Next => commands::serve::next(&mut store, &output),
        Action::Random => commands::serve::random(&mut store, &output),
        Action::Collections => commands::show::collections(&store, &output),
        Action::History(count) => {
            commands::show::history(&store, count.unwrap_or(history_count), &output)
        }
        Action::Progress => commands::show::progress(&store, &output),
        Action::Interactive => {
            let stdin = io::stdin();
            interactive::Session::new(&mut store, stdin.lock(), io::stdout()).run()
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
