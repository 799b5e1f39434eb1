// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbaImage};
use uuid::Uuid;

use crate::event::is_owned_path;

/// JPEG quality for app-owned cover files.
const COVER_QUALITY: u8 = 90;

/// JPEG quality for gallery exports.
const EXPORT_QUALITY: u8 = 100;

/// Decodes an image off the interactive sequence.
pub async fn load_image(path: &Path) -> Result<DynamicImage, Box<dyn Error>> {
    let owned = path.to_owned();
    let image = tokio::task::spawn_blocking(move || -> image::ImageResult<DynamicImage> {
        Ok(ImageReader::open(&owned)?.decode()?)
    })
    .await
    .map_err(|e| format!("Image decoder task failed: {e}"))?
    .map_err(|e| format!("Failed to decode image {}: {e}", path.display()))?;
    Ok(image)
}

/// Writes a cropped cover under `images_dir` as a fresh JPEG file and
/// returns its path. Encoding runs on the blocking pool.
pub async fn save_cover(images_dir: &Path, cover: RgbaImage) -> Result<PathBuf, Box<dyn Error>> {
    tokio::fs::create_dir_all(images_dir)
        .await
        .map_err(|e| format!("Failed to create images directory: {e}"))?;

    let path = images_dir.join(format!("event_cover_{}.jpg", Uuid::new_v4()));
    let target = path.clone();
    tokio::task::spawn_blocking(move || write_jpeg(&target, cover, COVER_QUALITY))
        .await
        .map_err(|e| format!("Image encoder task failed: {e}"))?
        .map_err(|e| format!("Failed to write cover image: {e}"))?;

    Ok(path)
}

/// Best-effort delete of an owned cover file. References we do not own
/// (anything with a URI scheme) are left alone; failures are logged and
/// swallowed.
pub async fn delete_cover(path: &str) {
    if !is_owned_path(path) {
        tracing::debug!("Not deleting non-local cover reference {path}");
        return;
    }
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("Failed to delete cover image {path}: {e}");
    }
}

/// Re-encodes the cover into `dir` at full quality with a timestamped
/// name, the "save to gallery" path.
pub async fn export_cover(cover: &str, dir: &Path, name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let image = load_image(Path::new(cover)).await?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("Failed to create export directory: {e}"))?;

    // Timestamp suffix keeps repeated exports from clobbering each other.
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{name}_{stamp}.jpg"));
    let target = path.clone();
    tokio::task::spawn_blocking(move || write_jpeg(&target, image.to_rgba8(), EXPORT_QUALITY))
        .await
        .map_err(|e| format!("Image encoder task failed: {e}"))?
        .map_err(|e| format!("Failed to export cover: {e}"))?;

    Ok(path)
}

fn write_jpeg(path: &Path, image: RgbaImage, quality: u8) -> image::ImageResult<()> {
    // JPEG carries no alpha channel.
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    rgb.write_with_encoder(encoder)
}
