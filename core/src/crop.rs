// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use image::{DynamicImage, Rgba, RgbaImage};

/// Upper bound on user zoom.
pub const MAX_ZOOM: f32 = 5.0;

/// A user-controlled square crop: viewport side length, zoom factor and
/// pan offset, all in display pixels.
///
/// Zoom and pan outside their legal ranges are clamped when the crop is
/// resolved, never rejected.
#[derive(Debug, Clone, Copy)]
pub struct CropParams {
    /// Side length of the square viewport, in pixels. Also the side of
    /// the produced bitmap.
    pub viewport: u32,

    /// User zoom factor on top of the base fit scale.
    pub zoom: f32,

    /// User pan offset (dx, dy) of the image relative to the viewport
    /// center.
    pub pan: (f32, f32),
}

impl CropParams {
    /// Resolves the crop against a concrete source size: computes the
    /// fit-scale display size, re-derives the minimum zoom from it, and
    /// clamps zoom and pan so the viewport never exposes area outside
    /// the source.
    pub fn resolve(&self, src_w: u32, src_h: u32) -> Result<ResolvedCrop, Box<dyn Error>> {
        if self.viewport == 0 {
            return Err("Crop viewport must be at least one pixel".into());
        }
        if src_w == 0 || src_h == 0 {
            return Err("Cannot crop an empty source image".into());
        }

        let side = self.viewport as f32;
        let (display_w, display_h) = fit_display_size(src_w, src_h, self.viewport);
        let base_scale = display_w / src_w as f32;

        // The image must always cover the full square, whatever the
        // source aspect ratio.
        let min_zoom = (side / display_w).max(side / display_h);
        let zoom = self.zoom.clamp(min_zoom, MAX_ZOOM.max(min_zoom));

        let max_dx = ((display_w * zoom - side) / 2.0).max(0.0);
        let max_dy = ((display_h * zoom - side) / 2.0).max(0.0);
        let dx = self.pan.0.clamp(-max_dx, max_dx);
        let dy = self.pan.1.clamp(-max_dy, max_dy);

        Ok(ResolvedCrop {
            viewport: self.viewport,
            src_w,
            src_h,
            base_scale,
            zoom,
            dx,
            dy,
        })
    }
}

/// A crop with zoom and pan already clamped against a concrete source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCrop {
    pub viewport: u32,
    pub src_w: u32,
    pub src_h: u32,
    pub base_scale: f32,
    pub zoom: f32,
    pub dx: f32,
    pub dy: f32,
}

impl ResolvedCrop {
    /// Maps a viewport coordinate to its source-image coordinate.
    ///
    /// Inverse of the on-screen transform: scale around the image center
    /// by `zoom * base_scale`, then translate by the pan, then center in
    /// the viewport.
    fn source_coord(&self, x: f32, y: f32) -> (f32, f32) {
        let half = self.viewport as f32 / 2.0;
        let scale = self.zoom * self.base_scale;
        (
            (x - half - self.dx) / scale + self.src_w as f32 / 2.0,
            (y - half - self.dy) / scale + self.src_h as f32 / 2.0,
        )
    }
}

/// The on-screen size of the source under fit-width scaling inside a
/// square container of side `viewport`.
pub fn fit_display_size(src_w: u32, src_h: u32, viewport: u32) -> (f32, f32) {
    let side = viewport as f32;
    (side, src_h as f32 * side / src_w as f32)
}

/// Produces the square bitmap of the source pixels visible inside the
/// viewport, bilinear-sampled.
pub fn crop_square(src: &DynamicImage, params: &CropParams) -> Result<RgbaImage, Box<dyn Error>> {
    let rgba = src.to_rgba8();
    let (src_w, src_h) = rgba.dimensions();
    let resolved = params.resolve(src_w, src_h)?;

    let side = resolved.viewport;
    let mut out = RgbaImage::new(side, side);
    for y in 0..side {
        for x in 0..side {
            let (sx, sy) = resolved.source_coord(x as f32, y as f32);
            out.put_pixel(x, y, sample_bilinear(&rgba, sx, sy));
        }
    }
    Ok(out)
}

/// Bilinear sample with coordinates clamped to the image bounds.
fn sample_bilinear(img: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (w, h) = img.dimensions();
    let x = x.clamp(0.0, (w - 1) as f32);
    let y = y.clamp(0.0, (h - 1) as f32);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = img.get_pixel(x0, y0).0;
    let p10 = img.get_pixel(x1, y0).0;
    let p01 = img.get_pixel(x0, y1).0;
    let p11 = img.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
        let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round() as u8;
    }
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImage;

    /// Source image with four distinct solid quadrants.
    fn quadrant_image(w: u32, h: u32) -> DynamicImage {
        let mut img = DynamicImage::new_rgba8(w, h);
        let colors = [
            Rgba([255, 0, 0, 255]),
            Rgba([0, 255, 0, 255]),
            Rgba([0, 0, 255, 255]),
            Rgba([255, 255, 0, 255]),
        ];
        for y in 0..h {
            for x in 0..w {
                let q = (y >= h / 2) as usize * 2 + (x >= w / 2) as usize;
                img.put_pixel(x, y, colors[q]);
            }
        }
        img
    }

    fn params(viewport: u32, zoom: f32, pan: (f32, f32)) -> CropParams {
        CropParams {
            viewport,
            zoom,
            pan,
        }
    }

    #[test]
    fn test_min_zoom_covers_viewport() {
        // Landscape source: fit-width display is shorter than the
        // viewport, so minimum zoom must stretch the height to cover it.
        let resolved = params(100, 0.1, (0.0, 0.0)).resolve(200, 100).unwrap();
        let (_, display_h) = fit_display_size(200, 100, 100);
        assert_eq!(resolved.zoom, 100.0 / display_h);
        assert!(display_h * resolved.zoom >= 100.0);

        // Square source: minimum zoom is exactly 1.
        let resolved = params(100, 0.1, (0.0, 0.0)).resolve(64, 64).unwrap();
        assert_eq!(resolved.zoom, 1.0);
    }

    #[test]
    fn test_zoom_clamped_to_maximum() {
        let resolved = params(100, 50.0, (0.0, 0.0)).resolve(64, 64).unwrap();
        assert_eq!(resolved.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_pan_clamped_to_covered_region() {
        // At minimum zoom on a square source there is no slack at all.
        let resolved = params(100, 1.0, (300.0, -300.0)).resolve(64, 64).unwrap();
        assert_eq!((resolved.dx, resolved.dy), (0.0, 0.0));

        // At 2x zoom the image overhangs the viewport by 50px per side.
        let resolved = params(100, 2.0, (300.0, -300.0)).resolve(64, 64).unwrap();
        assert_eq!((resolved.dx, resolved.dy), (50.0, -50.0));
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert!(params(0, 1.0, (0.0, 0.0)).resolve(64, 64).is_err());
        assert!(params(100, 1.0, (0.0, 0.0)).resolve(0, 64).is_err());
    }

    #[test]
    fn test_round_trip_identity() {
        // Aspect-matched source at minimum zoom and zero pan reproduces
        // the full source.
        let src = quadrant_image(8, 8);
        let out = crop_square(&src, &params(8, 1.0, (0.0, 0.0))).unwrap();
        assert_eq!(out, src.to_rgba8());
    }

    #[test]
    fn test_round_trip_scales_to_viewport() {
        // Same aspect, doubled viewport: quadrant structure is preserved
        // with no cut content.
        let src = quadrant_image(4, 4);
        let out = crop_square(&src, &params(8, 1.0, (0.0, 0.0))).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(7, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(0, 7), Rgba([0, 0, 255, 255]));
        assert_eq!(*out.get_pixel(7, 7), Rgba([255, 255, 0, 255]));
    }

    #[test]
    fn test_affine_mapping() {
        let resolved = params(100, 2.0, (10.0, -4.0)).resolve(50, 50).unwrap();
        // base fit scale for a 50px-wide source in a 100px viewport
        assert_eq!(resolved.base_scale, 2.0);

        let (sx, sy) = resolved.source_coord(60.0, 30.0);
        assert_eq!(sx, (60.0 - 50.0 - 10.0) / 4.0 + 25.0);
        assert_eq!(sy, (30.0 - 50.0 + 4.0) / 4.0 + 25.0);

        // The viewport center maps to the source center when pan is zero.
        let resolved = params(100, 3.0, (0.0, 0.0)).resolve(50, 50).unwrap();
        assert_eq!(resolved.source_coord(50.0, 50.0), (25.0, 25.0));
    }

    #[test]
    fn test_pan_shifts_visible_region() {
        // Zoomed 2x into an 8x8 quadrant image with the pan pushed to
        // its positive limit, the viewport shows the top-left region.
        let src = quadrant_image(8, 8);
        let out = crop_square(&src, &params(8, 2.0, (100.0, 100.0))).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(6, 6), Rgba([255, 0, 0, 255]));

        // Pushed to the negative limit, the bottom-right region shows.
        let out = crop_square(&src, &params(8, 2.0, (-100.0, -100.0))).unwrap();
        assert_eq!(*out.get_pixel(7, 7), Rgba([255, 255, 0, 255]));
    }
}
