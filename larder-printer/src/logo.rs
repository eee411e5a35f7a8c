//! Logo image processing
//!
//! Loads a logo file from disk and rasterizes it into the 1-bit format the
//! TSPL BITMAP command expects. TSPL bit semantics are inverted relative to
//! most raster formats: a 0 bit prints black, a 1 bit leaves white.

use crate::tspl::{DOTS_PER_MM, LogoBitmap};

/// Logo block edge length on the label, in dots (18 mm square)
const LOGO_MAX_DOTS: u32 = 18 * DOTS_PER_MM;

/// Process a logo image for label printing
///
/// The image is:
/// - Loaded from path (PNG/JPEG)
/// - Resized to fit the 18 mm logo block, preserving aspect ratio
/// - Converted to 1-bit monochrome (transparent pixels stay white)
///
/// Returns `None` if the file is missing or unreadable; a label without a
/// logo is still a valid label.
#[cfg(feature = "image")]
#[tracing::instrument]
pub fn process_logo(path: &str) -> Option<LogoBitmap> {
    use image::GenericImageView;
    use tracing::{info, warn};

    let img = match image::open(path) {
        Ok(i) => {
            info!(dimensions = ?i.dimensions(), "logo image opened");
            i
        }
        Err(e) => {
            warn!(path = path, error = %e, "failed to open logo, printing without it");
            return None;
        }
    };

    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        warn!(path = path, "logo image is empty");
        return None;
    }

    let ratio = f64::min(
        LOGO_MAX_DOTS as f64 / w as f64,
        LOGO_MAX_DOTS as f64 / h as f64,
    )
    .min(1.0);
    let new_w = ((w as f64 * ratio) as u32).max(1);
    let new_h = ((h as f64 * ratio) as u32).max(1);

    let resized = img.resize(new_w, new_h, image::imageops::FilterType::Nearest);
    let rgba = resized.to_rgba8();

    let width_bytes = new_w.div_ceil(8);
    let mut data = Vec::with_capacity((width_bytes * new_h) as usize);

    for y in 0..new_h {
        for x_byte in 0..width_bytes {
            // All white; clear bits where ink goes
            let mut byte = 0xFFu8;
            for bit in 0..8 {
                let x = x_byte * 8 + bit;
                if x < new_w {
                    let pixel = rgba.get_pixel(x, y);

                    let alpha = pixel[3];
                    if alpha >= 128 {
                        let luma = (0.299 * pixel[0] as f32
                            + 0.587 * pixel[1] as f32
                            + 0.114 * pixel[2] as f32) as u8;

                        if luma < 128 {
                            byte &= !(1 << (7 - bit));
                        }
                    }
                    // Transparent pixels stay white
                }
            }
            data.push(byte);
        }
    }

    info!(width = new_w, height = new_h, "logo rasterized");

    Some(LogoBitmap {
        width_bytes,
        height: new_h,
        data,
    })
}
