// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use colored::Colorize;
use daymark_core::{CropParams, Daymark, crop_square, images};

use crate::parser::{arg_id, get_id, parse_pan};

/// Default viewport side, matching the cover slot of the detail view.
const DEFAULT_VIEWPORT: u32 = 512;

#[derive(Debug, Clone)]
pub struct CmdCoverSet {
    pub id: String,
    pub image: PathBuf,
    pub viewport: u32,
    pub zoom: f32,
    pub pan: (f32, f32),
}

impl CmdCoverSet {
    pub const NAME: &str = "set";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Crop an image to a square and attach it as the cover")
            .arg(arg_id())
            .arg(
                arg!(image: <IMAGE> "Path of the source image")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(--viewport [SIZE] "Side length of the square crop, in pixels")
                    .value_parser(value_parser!(u32))
                    .default_value("512"),
            )
            .arg(
                arg!(-z --zoom [ZOOM] "Zoom factor on top of the fit scale")
                    .value_parser(value_parser!(f32))
                    .default_value("1.0"),
            )
            .arg(arg!(-p --pan [PAN] "Pan offset as DX,DY display pixels").default_value("0,0"))
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let pan = match matches.get_one::<String>("pan") {
            Some(pan) => parse_pan(pan)?,
            None => (0.0, 0.0),
        };
        Ok(Self {
            id: get_id(matches),
            image: matches
                .get_one::<PathBuf>("image")
                .cloned()
                .unwrap_or_default(),
            viewport: matches
                .get_one::<u32>("viewport")
                .copied()
                .unwrap_or(DEFAULT_VIEWPORT),
            zoom: matches.get_one::<f32>("zoom").copied().unwrap_or(1.0),
            pan,
        })
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "setting cover image...");
        let source = images::load_image(&self.image).await?;
        let params = CropParams {
            viewport: self.viewport,
            zoom: self.zoom,
            pan: self.pan,
        };
        let cover = crop_square(&source, &params)?;

        let event = app.set_cover(&self.id, cover).await?;
        if let Some(path) = &event.cover_image {
            println!("Cover of {} saved to {}", event.title.bold(), path);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdCoverClear {
    pub id: String,
}

impl CmdCoverClear {
    pub const NAME: &str = "clear";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Detach the cover image, deleting the file if owned")
            .arg(arg_id())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: get_id(matches),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "clearing cover image...");
        let event = app.clear_cover(&self.id).await?;
        println!("Cover of {} cleared", event.title.bold());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdCoverExport {
    pub id: String,
    pub dir: PathBuf,
}

impl CmdCoverExport {
    pub const NAME: &str = "export";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Export the cover image at full quality")
            .arg(arg_id())
            .arg(
                arg!(--dir [DIR] "Target directory")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::DirPath)
                    .default_value("."),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: get_id(matches),
            dir: matches
                .get_one::<PathBuf>("dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub async fn run(self, app: &mut Daymark) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "exporting cover image...");
        let path = app.export_cover(&self.id, &self.dir).await?;
        println!("Exported to {}", path.display());
        Ok(())
    }
}
