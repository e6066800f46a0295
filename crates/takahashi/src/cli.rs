use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::app::LaunchOptions;
use crate::source::{BundledSource, ContentSource, FileSource};

#[derive(Parser)]
#[command(name = "takahashi")]
#[command(author, version, about)]
#[command(long_about = "A Takahashi-method presentation tool.\n\n\
    One short phrase per slide, set as large as the screen allows.\n\n\
    Examples:\n  \
    takahashi talk.txt                   Present (fullscreen, reloads on save)\n  \
    takahashi talk.txt --windowed        Present in a window\n  \
    takahashi --example getting-started  Present a bundled example\n  \
    takahashi new talk.txt               Start a new deck\n  \
    takahashi validate talk.txt          Check a deck for problems")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub deck: DeckArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long)]
    pub slide: Option<usize>,

    /// Start with the slide overview open
    #[arg(long)]
    pub overview: bool,

    /// Enable the slide entrance animation
    #[arg(long, overrides_with = "no_animations")]
    pub animations: bool,

    /// Disable the slide entrance animation
    #[arg(long, overrides_with = "animations")]
    pub no_animations: bool,

    /// Do not reload when the file changes on disk
    #[arg(long)]
    pub no_watch: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Where a deck comes from: a file on disk or a bundled example.
#[derive(Args, Debug, Clone, Default)]
pub struct DeckArgs {
    /// Presentation text file
    pub file: Option<PathBuf>,

    /// Use a bundled example instead of a file (see `takahashi examples`)
    #[arg(long, conflicts_with = "file")]
    pub example: Option<String>,
}

/// A resolved deck: its source, the directory images resolve against, and
/// the file to watch, if any.
pub struct Deck {
    pub source: Box<dyn ContentSource>,
    pub base_dir: PathBuf,
    pub file: Option<FileSource>,
}

impl DeckArgs {
    /// `Ok(None)` when neither a file nor an example was given.
    pub fn resolve(&self) -> anyhow::Result<Option<Deck>> {
        if let Some(name) = &self.example {
            let source = BundledSource::new(name);
            // Fail early with the list of available names
            source.load()?;
            return Ok(Some(Deck {
                source: Box::new(source),
                base_dir: PathBuf::from("."),
                file: None,
            }));
        }
        let Some(path) = &self.file else {
            return Ok(None);
        };
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let source = FileSource::new(path);
        Ok(Some(Deck {
            base_dir: source.base_dir(),
            source: Box::new(source.clone()),
            file: Some(source),
        }))
    }

    fn require(&self) -> anyhow::Result<Deck> {
        self.resolve()?
            .ok_or_else(|| anyhow::anyhow!("Give a presentation file or --example <name>"))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Export slides as PNG images
    Export {
        #[command(flatten)]
        deck: DeckArgs,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// Check a presentation for problems without presenting it
    Validate {
        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Create a new presentation from a starter template
    New {
        /// File to create
        file: PathBuf,

        /// Overwrite the file if it exists
        #[arg(long)]
        force: bool,
    },

    /// List the bundled example presentations
    Examples,

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (defaults.theme, defaults.font, defaults.animations)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Log filter from `-v`/`-q`; `RUST_LOG` still wins when set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    fn launch_options(&self) -> LaunchOptions {
        let animations = if self.animations {
            Some(true)
        } else if self.no_animations {
            Some(false)
        } else {
            None
        };
        LaunchOptions {
            windowed: self.windowed,
            slide: self.slide,
            overview: self.overview,
            animations,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let launch = self.launch_options();
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Export {
                ref deck,
                ref output_dir,
                width,
                height,
            }) => {
                let deck = deck.require()?;
                crate::commands::export::run(
                    deck.source.as_ref(),
                    deck.base_dir,
                    output_dir.clone(),
                    width,
                    height,
                )
            }
            Some(Commands::Validate { ref deck }) => {
                let deck = deck.require()?;
                crate::commands::validate::run(deck.source.as_ref())
            }
            Some(Commands::New { ref file, force }) => crate::commands::new::run(file, force),
            Some(Commands::Examples) => {
                crate::commands::examples::run();
                Ok(())
            }
            Some(Commands::Version) => {
                println!(
                    "{} {}",
                    env!("CARGO_PKG_NAME").bold(),
                    env!("CARGO_PKG_VERSION")
                );
                Ok(())
            }
            None => match self.deck.resolve()? {
                Some(deck) => {
                    let watch = match (&deck.file, self.no_watch) {
                        (Some(file), false) => match file.watch() {
                            Ok(watch) => Some(watch),
                            Err(e) => {
                                log::warn!("Live reload unavailable: {e}");
                                None
                            }
                        },
                        _ => None,
                    };
                    crate::app::run(deck.source, deck.base_dir, watch, launch)
                }
                None => {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            },
        }
    }
}
