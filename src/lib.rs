#![warn(clippy::all)]
#![warn(missing_docs)]
/*!

Decodes indexed-color [Aseprite](https://www.aseprite.org/) files straight
into game-ready pixel data ([file format specification][spec]). There is no
JSON export step and no third-party decompressor: compressed cels are
inflated by the crate's own zlib decoder.

Two products can be made from a file:

- a **sprite strip**: every frame composited and placed side by side, and
- a **tilesheet**: the first frame cut along its slices into square tiles,
  all in one row.

Only 8-bit indexed files are supported. Pixels are palette indices and
index 0 is transparent.

[spec]: https://github.com/aseprite/aseprite/blob/master/docs/ase-file-specs.md

# Sprite strips

```
# fn run(bytes: &[u8]) -> asesheet::Result<()> {
let sprite = asesheet::parse_sprite(bytes)?;
println!(
    "{} frames of {}x{}",
    sprite.num_frames(),
    sprite.frame_width(),
    sprite.frame_height()
);
let first = sprite.frame_pixel(0, 0, 0);
# Ok(())
# }
```

Layers that are hidden, or that sit in a hidden group, are left out. Later
layers paint over earlier ones, except where their pixels are 0.

# Tilesheets

```
# fn run(bytes: &[u8]) -> asesheet::Result<()> {
use asesheet::TileId;

let sheet = asesheet::parse_tilesheet(bytes, 8)?;
for region in sheet.regions() {
    println!(
        "{}: tiles {:?} .. +{}",
        region.slice.name,
        region.first_tile,
        region.tile_count()
    );
}
let pixel = sheet.tile_pixel(TileId(1), 0, 0);
# Ok(())
# }
```

Every slice must be a whole number of tiles in each direction. Text stored
in a slice's user data is available as [Slice::user_data].

# Fixed-capacity decoding

[FixedSprite] and [FixedTileSheet] keep their pixels inline and never
allocate. Inputs that do not fit are rejected with
[AsepriteParseError::CapacityExceeded]. The `embed` constructors panic
instead, which is what a build script wants when a bundled asset is broken.

Their capacities are const parameters: the pixel strip, plus the frame
canvas and inflate scratch space used while decoding. [SpriteLayout::scan]
and [TileLayout::scan] walk a file's headers and report every size without
decoding pixels.

The generic [decode_sprite_into] and [decode_tilesheet_into] accept any
[PixelBuffer] and [SliceList], so callers can bring their own storage.

# Inflate

[zlib_decompress] is usable on its own:

```
let stream = [
    0x78, 0x01, 0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o',
    0x05, 0x8C, 0x01, 0xF5,
];
let data = asesheet::zlib_decompress(&stream, 5).unwrap();
assert_eq!(data, b"Hello");
```

*/

pub(crate) mod bits;
pub(crate) mod buffer;
pub(crate) mod cel;
pub(crate) mod compose;
pub(crate) mod error;
pub(crate) mod huffman;
pub(crate) mod inflate;
pub(crate) mod layer;
pub(crate) mod parse;
pub(crate) mod reader;
pub(crate) mod slice;
pub(crate) mod sprite;
#[cfg(test)]
pub(crate) mod testutil;
pub(crate) mod tile;
pub(crate) mod tilesheet;
pub(crate) mod user_data;
#[cfg(feature = "utils")]
pub mod util;

/// A specialized `Result` type for Aseprite parsing functions.
pub type Result<T> = std::result::Result<T, AsepriteParseError>;

pub use buffer::{FixedBuffer, FixedList, PixelBuffer, SliceList};
pub use error::{AsepriteParseError, InflateError};
pub use inflate::{adler32, inflate_into, zlib_decompress, zlib_decompress_into, InflateOptions};
pub use parse::{
    decode_sprite_into, decode_tilesheet_into, ParseOptions, SpriteHeader, SpriteLayout,
    TileLayout,
};
pub use slice::Slice;
pub use sprite::{parse_sprite, parse_sprite_with, FixedSprite, Sprite};
pub use tile::{TileId, TileRegion, TileRegions};
pub use tilesheet::{parse_tilesheet, parse_tilesheet_with, FixedTileSheet, TileSheet};
