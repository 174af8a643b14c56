use crate::{reader::AseReader, AsepriteParseError, Result};
use bitflags::bitflags;

/// Types of layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayerType {
    /// A regular image layer. This is the normal layer type.
    Image,
    /// A layer that groups other layers and does not contain any image data.
    /// In Aseprite these are represented by a folder icon.
    Group,
    /// A layer whose cels reference tiles of a tileset.
    Tilemap,
}

impl Default for LayerType {
    fn default() -> Self {
        LayerType::Image
    }
}

bitflags! {
    /// Layer flags as stored in the file.
    #[derive(Default)]
    pub(crate) struct LayerFlags: u16 {
        /// Layer is visible (eye icon is enabled).
        const VISIBLE = 0x0001;
        /// Layer can be modified (lock icon is disabled).
        const EDITABLE = 0x0002;
        /// Layer cannot be moved.
        const MOVEMENT_LOCKED = 0x0004;
        /// Layer is background (stack order cannot be changed).
        const BACKGROUND = 0x0008;
        /// Prefer to link cels when the user copies them.
        const CONTINUOUS = 0x0010;
        /// Prefer to show this group layer collapsed.
        const COLLAPSED = 0x0020;
        /// This is a reference layer.
        const REFERENCE = 0x0040;
    }
}

impl LayerFlags {
    /// Shortcut for `.contains(LayerFlags::VISIBLE)`.
    pub(crate) fn is_visible(&self) -> bool {
        self.contains(LayerFlags::VISIBLE)
    }
}

/// Most layers a file may declare.
pub(crate) const MAX_LAYERS: usize = 256;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LayerData<'a> {
    pub(crate) flags: LayerFlags,
    pub(crate) layer_type: LayerType,
    pub(crate) child_level: u16,
    pub(crate) name: &'a str,
}

/// Layers in file order (back to front, groups before their children).
pub(crate) struct LayerTable<'a> {
    layers: [LayerData<'a>; MAX_LAYERS],
    len: usize,
}

impl<'a> LayerTable<'a> {
    pub(crate) fn new() -> Self {
        LayerTable {
            layers: [LayerData::default(); MAX_LAYERS],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, layer: LayerData<'a>) -> Result<()> {
        let slot = self
            .layers
            .get_mut(self.len)
            .ok_or(AsepriteParseError::TooManyLayers(MAX_LAYERS))?;
        *slot = layer;
        self.len += 1;
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn get(&self, index: u16) -> Option<&LayerData<'a>> {
        self.layers[..self.len].get(index as usize)
    }

    /// Whether cels of the layer are composited. A layer is shown only if it
    /// and every group above it is visible. Without any layer chunks every
    /// layer counts as visible.
    pub(crate) fn is_visible(&self, index: u16) -> Result<bool> {
        if self.len == 0 {
            return Ok(true);
        }
        let layer = self
            .get(index)
            .ok_or(AsepriteParseError::UnknownLayer(index))?;
        let mut visible = layer.flags.is_visible();
        let mut level = layer.child_level;
        // The parent is the closest earlier layer with a lower child level.
        for candidate in self.layers[..index as usize].iter().rev() {
            if level == 0 || !visible {
                break;
            }
            if candidate.child_level < level {
                visible = candidate.flags.is_visible();
                level = candidate.child_level;
            }
        }
        Ok(visible)
    }
}

pub(crate) fn parse_layer_chunk(data: &[u8]) -> Result<LayerData<'_>> {
    let mut reader = AseReader::new(data);

    let flags = reader.word()?;
    let layer_type = reader.word()?;
    let child_level = reader.word()?;
    let _default_width = reader.word()?;
    let _default_height = reader.word()?;
    let _blend_mode = reader.word()?;
    let _opacity = reader.byte()?;
    reader.skip_reserved(3)?;
    let name = reader.string()?;

    Ok(LayerData {
        flags: LayerFlags::from_bits_truncate(flags),
        layer_type: parse_layer_type(layer_type)?,
        child_level,
        name,
    })
}

fn parse_layer_type(id: u16) -> Result<LayerType> {
    match id {
        0 => Ok(LayerType::Image),
        1 => Ok(LayerType::Group),
        2 => Ok(LayerType::Tilemap),
        _ => Err(AsepriteParseError::InvalidLayerType(id)),
    }
}
