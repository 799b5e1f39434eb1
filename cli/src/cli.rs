// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, io::IsTerminal, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use daymark_core::{APP_NAME, Daymark};
use futures::{FutureExt, future::BoxFuture};

use crate::cmd_cover::{CmdCoverClear, CmdCoverExport, CmdCoverSet};
use crate::cmd_event::{CmdDelete, CmdEdit, CmdList, CmdNew, CmdPin, CmdShow, CmdUnpin};
use crate::cmd_generate_completion::CmdGenerateCompletion;
use crate::cmd_widget::CmdWidget;
use crate::config::parse_config;

/// Run the daymark command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    };
    Ok(())
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Track the days to and since the dates that matter.")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(false) // allow default to list
            .arg_required_else_help(false)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/daymark/config.toml on Linux and \
MacOS, %LOCALAPPDATA%/daymark/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdList::command())
            .subcommand(CmdNew::command())
            .subcommand(CmdEdit::command())
            .subcommand(CmdShow::command())
            .subcommand(CmdDelete::command())
            .subcommand(CmdPin::command())
            .subcommand(CmdUnpin::command())
            .subcommand(
                Command::new("cover")
                    .about("Manage event cover images")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdCoverSet::command())
                    .subcommand(CmdCoverClear::command())
                    .subcommand(CmdCoverExport::command()),
            )
            .subcommand(CmdWidget::command())
            .subcommand(CmdGenerateCompletion::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdList::NAME, matches)) => List(CmdList::from(matches)),
            Some((CmdNew::NAME, matches)) => New(CmdNew::from(matches)),
            Some((CmdEdit::NAME, matches)) => Edit(CmdEdit::from(matches)),
            Some((CmdShow::NAME, matches)) => Show(CmdShow::from(matches)),
            Some((CmdDelete::NAME, matches)) => Delete(CmdDelete::from(matches)),
            Some((CmdPin::NAME, matches)) => Pin(CmdPin::from(matches)),
            Some((CmdUnpin::NAME, matches)) => Unpin(CmdUnpin::from(matches)),
            Some(("cover", matches)) => match matches.subcommand() {
                Some((CmdCoverSet::NAME, matches)) => CoverSet(CmdCoverSet::from(matches)?),
                Some((CmdCoverClear::NAME, matches)) => CoverClear(CmdCoverClear::from(matches)),
                Some((CmdCoverExport::NAME, matches)) => CoverExport(CmdCoverExport::from(matches)),
                _ => unreachable!(),
            },
            Some((CmdWidget::NAME, matches)) => Widget(CmdWidget::from(matches)),
            Some((CmdGenerateCompletion::NAME, matches)) => {
                GenerateCompletion(CmdGenerateCompletion::from(matches))
            }
            None => List(CmdList::default()),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// List events
    List(CmdList),

    /// Add a new event
    New(CmdNew),

    /// Edit an event
    Edit(CmdEdit),

    /// Show one event in detail
    Show(CmdShow),

    /// Delete an event
    Delete(CmdDelete),

    /// Pin an event
    Pin(CmdPin),

    /// Unpin an event
    Unpin(CmdUnpin),

    /// Crop and attach a cover image
    CoverSet(CmdCoverSet),

    /// Detach the cover image
    CoverClear(CmdCoverClear),

    /// Export the cover image at full quality
    CoverExport(CmdCoverExport),

    /// Inspect the widget record
    Widget(CmdWidget),

    /// Generate shell completion
    GenerateCompletion(CmdGenerateCompletion),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            List(a)        => Self::run_with(config, |x| a.run(x).boxed()).await,
            New(a)         => Self::run_with(config, |x| a.run(x).boxed()).await,
            Edit(a)        => Self::run_with(config, |x| a.run(x).boxed()).await,
            Show(a)        => Self::run_with(config, |x| a.run(x).boxed()).await,
            Delete(a)      => Self::run_with(config, |x| a.run(x).boxed()).await,
            Pin(a)         => Self::run_with(config, |x| a.run(x).boxed()).await,
            Unpin(a)       => Self::run_with(config, |x| a.run(x).boxed()).await,
            CoverSet(a)    => Self::run_with(config, |x| a.run(x).boxed()).await,
            CoverClear(a)  => Self::run_with(config, |x| a.run(x).boxed()).await,
            CoverExport(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            Widget(a)      => Self::run_with(config, |x| a.run(x).boxed()).await,
            GenerateCompletion(a) => a.run(),
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a mut Daymark) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("Parsing configuration...");
        let config = parse_config(config).await?;
        let mut app = Daymark::new(config).await?;

        f(&mut app).await?;

        app.close().await?;
        Ok(())
    }
}
