//! Avatar decoding - raw image bytes to a display-sized pixel grid

use image::imageops::FilterType;

use crate::error::ClientResult;
use crate::models::Avatar;

/// Decode `bytes` and scale to fit within `max_width` x `max_height`,
/// keeping the aspect ratio. Images already inside the box are not enlarged.
pub fn decode_avatar(bytes: &[u8], max_width: u32, max_height: u32) -> ClientResult<Avatar> {
    let img = image::load_from_memory(bytes)?;

    let img = if img.width() > max_width || img.height() > max_height {
        img.resize(max_width, max_height, FilterType::Triangle)
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| p.0).collect();

    Ok(Avatar {
        width,
        height,
        pixels,
    })
}
