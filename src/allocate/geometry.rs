//! Picture placement inside the content region.

use super::probe::ImageInfo;
use crate::model::{pixels_to_emu, Emu, Rect};

/// Fit a picture into `region`, preserving aspect ratio.
///
/// The scale never exceeds 1.0, so pictures smaller than the region keep
/// their native size (pixels at `dpi`). The result is centered
/// horizontally and aligned to the top of the region.
pub fn fit_image(info: ImageInfo, region: Rect, dpi: f64) -> Rect {
    let native_w = pixels_to_emu(info.width_px, dpi) as f64;
    let native_h = pixels_to_emu(info.height_px, dpi) as f64;
    if native_w <= 0.0 || native_h <= 0.0 {
        return Rect::new(region.left, region.top, 0, 0);
    }

    let scale = (region.width as f64 / native_w)
        .min(region.height as f64 / native_h)
        .min(1.0)
        .max(0.0);
    let width = (native_w * scale).round() as Emu;
    let height = (native_h * scale).round() as Emu;
    let left = region.left + (region.width - width) / 2;

    Rect::new(left, region.top, width, height)
}

/// Caption box directly under a picture, as wide as the picture.
pub fn caption_frame(image: Rect, gap: Emu, height: Emu) -> Rect {
    Rect::new(image.left, image.bottom() + gap, image.width, height)
}
