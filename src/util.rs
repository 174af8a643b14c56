//! Conversions of decoded pixel data into `image` buffers. (Requires feature
//! `utils`.)
//!
//! This module is not available by default. To use it, you must enable the
//! feature `utils` in your `Cargo.toml`.
//!
//! ```toml
//! [dependencies]
//! asesheet = { version = "0.1", features = ["utils"] }
//! ```
//!
//! Palette indices are stored as `Luma` values, so the images can be saved
//! as 8-bit grayscale PNGs and recolored later.

use image::{GrayImage, Luma};

use crate::{Sprite, TileId, TileSheet};

/// The whole sprite strip as one image.
pub fn sprite_image(sprite: &Sprite) -> GrayImage {
    strip_image(
        sprite.pixels(),
        sprite.strip_width() as u32,
        sprite.frame_height() as u32,
    )
}

/// A single frame of the sprite, or `None` if `frame` is out of range.
pub fn frame_image(sprite: &Sprite, frame: u16) -> Option<GrayImage> {
    if frame >= sprite.num_frames() {
        return None;
    }
    let (w, h) = (sprite.frame_width(), sprite.frame_height());
    Some(GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([sprite
            .frame_pixel(frame, x as u16, y as u16)
            .unwrap_or_default()])
    }))
}

/// The tile strip as one image.
pub fn tilesheet_image(sheet: &TileSheet<'_>) -> GrayImage {
    strip_image(
        sheet.pixels(),
        sheet.strip_width() as u32,
        sheet.tile_size() as u32,
    )
}

/// A single tile, or `None` if `id` does not name a tile.
pub fn tile_image(sheet: &TileSheet<'_>, id: TileId) -> Option<GrayImage> {
    if id.is_empty() || id.0 > sheet.tile_count() {
        return None;
    }
    let size = sheet.tile_size() as u32;
    Some(GrayImage::from_fn(size, size, |x, y| {
        Luma([sheet.tile_pixel(id, x as u16, y as u16).unwrap_or_default()])
    }))
}

/// Add a 1 pixel border around the input image by duplicating the outmost
/// pixels.
///
/// This can be useful when creating a texture atlas for sprites that represent
/// tiles. Without this, under certain zoom levels there might be small gaps
/// between tiles. For an example, see this [discussion of the problem on
/// StackOverflow][1].
///
/// [1]: https://gamedev.stackexchange.com/questions/148247/prevent-tile-layout-gaps
///
/// Empty images are returned unchanged.
pub fn extrude_border(image: GrayImage) -> GrayImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return image;
    }
    GrayImage::from_fn(w + 2, h + 2, |x, y| {
        let src_x = x.saturating_sub(1).min(w - 1);
        let src_y = y.saturating_sub(1).min(h - 1);
        *image.get_pixel(src_x, src_y)
    })
}

fn strip_image(pixels: &[u8], width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let index = y as usize * width as usize + x as usize;
        Luma([pixels.get(index).copied().unwrap_or_default()])
    })
}
