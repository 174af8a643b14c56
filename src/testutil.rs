//! Builds small Aseprite files in memory for tests.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

const LAYER: u16 = 0x2004;
const CEL: u16 = 0x2005;
const USER_DATA: u16 = 0x2020;
const SLICE: u16 = 0x2022;

pub(crate) struct AseBuilder {
    width: u16,
    height: u16,
    color_depth: u16,
    frames: Vec<Vec<(u16, Vec<u8>)>>,
    chunk_counts: Option<(u16, u32)>,
}

impl AseBuilder {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        AseBuilder {
            width,
            height,
            color_depth: 8,
            frames: vec![Vec::new()],
            chunk_counts: None,
        }
    }

    pub(crate) fn color_depth(mut self, depth: u16) -> Self {
        self.color_depth = depth;
        self
    }

    /// Makes sure the file has at least `count` frames.
    pub(crate) fn frames(mut self, count: usize) -> Self {
        while self.frames.len() < count {
            self.frames.push(Vec::new());
        }
        self
    }

    /// Overrides the old and new chunk counts written to every frame header.
    pub(crate) fn chunk_counts(mut self, old: u16, new: u32) -> Self {
        self.chunk_counts = Some((old, new));
        self
    }

    pub(crate) fn raw_chunk(self, chunk_type: u16, data: &[u8]) -> Self {
        self.raw_chunk_in(0, chunk_type, data)
    }

    pub(crate) fn raw_chunk_in(mut self, frame: usize, chunk_type: u16, data: &[u8]) -> Self {
        self = self.frames(frame + 1);
        self.frames[frame].push((chunk_type, data.to_vec()));
        self
    }

    pub(crate) fn layer(self, name: &str, visible: bool) -> Self {
        self.layer_at(name, visible, 0, 0)
    }

    pub(crate) fn group(self, name: &str, visible: bool, child_level: u16) -> Self {
        self.layer_at(name, visible, 1, child_level)
    }

    pub(crate) fn layer_at(self, name: &str, visible: bool, layer_type: u16, child_level: u16) -> Self {
        let mut data = Vec::new();
        let flags = if visible { 0x3 } else { 0x2 };
        data.write_u16::<LittleEndian>(flags).unwrap();
        data.write_u16::<LittleEndian>(layer_type).unwrap();
        data.write_u16::<LittleEndian>(child_level).unwrap();
        data.write_u16::<LittleEndian>(0).unwrap();
        data.write_u16::<LittleEndian>(0).unwrap();
        data.write_u16::<LittleEndian>(0).unwrap();
        data.write_u8(255).unwrap();
        data.extend_from_slice(&[0; 3]);
        write_string(&mut data, name);
        self.raw_chunk(LAYER, &data)
    }

    pub(crate) fn raw_cel(self, layer: u16, x: i16, y: i16, w: u16, h: u16, pixels: &[u8]) -> Self {
        self.raw_cel_in(0, layer, x, y, w, h, pixels)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn raw_cel_in(
        self,
        frame: usize,
        layer: u16,
        x: i16,
        y: i16,
        w: u16,
        h: u16,
        pixels: &[u8],
    ) -> Self {
        let mut data = cel_header(layer, x, y, 0, w, h);
        data.extend_from_slice(pixels);
        self.raw_chunk_in(frame, CEL, &data)
    }

    pub(crate) fn compressed_cel(
        self,
        layer: u16,
        x: i16,
        y: i16,
        w: u16,
        h: u16,
        pixels: &[u8],
    ) -> Self {
        self.compressed_cel_in(0, layer, x, y, w, h, pixels)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn compressed_cel_in(
        self,
        frame: usize,
        layer: u16,
        x: i16,
        y: i16,
        w: u16,
        h: u16,
        pixels: &[u8],
    ) -> Self {
        let mut data = cel_header(layer, x, y, 2, w, h);
        data.extend_from_slice(&zlib(pixels));
        self.raw_chunk_in(frame, CEL, &data)
    }

    pub(crate) fn slice(self, name: &str, x: i32, y: i32, w: u32, h: u32) -> Self {
        let mut data = slice_header(1, name);
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_i32::<LittleEndian>(x).unwrap();
        data.write_i32::<LittleEndian>(y).unwrap();
        data.write_u32::<LittleEndian>(w).unwrap();
        data.write_u32::<LittleEndian>(h).unwrap();
        self.raw_chunk(SLICE, &data)
    }

    pub(crate) fn slice_without_keys(self, name: &str) -> Self {
        let data = slice_header(0, name);
        self.raw_chunk(SLICE, &data)
    }

    pub(crate) fn user_data(self, text: Option<&str>) -> Self {
        let mut data = Vec::new();
        match text {
            Some(text) => {
                data.write_u32::<LittleEndian>(1).unwrap();
                write_string(&mut data, text);
            }
            None => {
                data.write_u32::<LittleEndian>(2).unwrap();
                data.extend_from_slice(&[10, 20, 30, 255]);
            }
        }
        self.raw_chunk(USER_DATA, &data)
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for chunks in &self.frames {
            let mut frame = Vec::new();
            for (chunk_type, data) in chunks {
                frame
                    .write_u32::<LittleEndian>(data.len() as u32 + 6)
                    .unwrap();
                frame.write_u16::<LittleEndian>(*chunk_type).unwrap();
                frame.extend_from_slice(data);
            }
            let (old, new) = self
                .chunk_counts
                .unwrap_or((chunks.len() as u16, chunks.len() as u32));
            body.write_u32::<LittleEndian>(frame.len() as u32 + 16)
                .unwrap();
            body.write_u16::<LittleEndian>(0xF1FA).unwrap();
            body.write_u16::<LittleEndian>(old).unwrap();
            body.write_u16::<LittleEndian>(100).unwrap();
            body.extend_from_slice(&[0; 2]);
            body.write_u32::<LittleEndian>(new).unwrap();
            body.extend_from_slice(&frame);
        }

        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(body.len() as u32 + 128)
            .unwrap();
        out.write_u16::<LittleEndian>(0xA5E0).unwrap();
        out.write_u16::<LittleEndian>(self.frames.len() as u16)
            .unwrap();
        out.write_u16::<LittleEndian>(self.width).unwrap();
        out.write_u16::<LittleEndian>(self.height).unwrap();
        out.write_u16::<LittleEndian>(self.color_depth).unwrap();
        out.write_u32::<LittleEndian>(1).unwrap(); // flags
        out.write_u16::<LittleEndian>(100).unwrap(); // speed
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u8(0).unwrap(); // transparent index
        out.extend_from_slice(&[0; 3]);
        out.write_u16::<LittleEndian>(32).unwrap(); // colors
        out.write_u8(1).unwrap();
        out.write_u8(1).unwrap();
        out.write_i16::<LittleEndian>(0).unwrap();
        out.write_i16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(16).unwrap();
        out.write_u16::<LittleEndian>(16).unwrap();
        out.extend_from_slice(&[0; 84]);
        assert_eq!(out.len(), 128);
        out.extend_from_slice(&body);
        out
    }
}

pub(crate) fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn cel_header(layer: u16, x: i16, y: i16, cel_type: u16, w: u16, h: u16) -> Vec<u8> {
    let mut data = Vec::new();
    data.write_u16::<LittleEndian>(layer).unwrap();
    data.write_i16::<LittleEndian>(x).unwrap();
    data.write_i16::<LittleEndian>(y).unwrap();
    data.write_u8(255).unwrap();
    data.write_u16::<LittleEndian>(cel_type).unwrap();
    data.write_i16::<LittleEndian>(0).unwrap();
    data.extend_from_slice(&[0; 5]);
    data.write_u16::<LittleEndian>(w).unwrap();
    data.write_u16::<LittleEndian>(h).unwrap();
    data
}

fn slice_header(keys: u32, name: &str) -> Vec<u8> {
    let mut data = Vec::new();
    data.write_u32::<LittleEndian>(keys).unwrap();
    data.write_u32::<LittleEndian>(0).unwrap();
    data.write_u32::<LittleEndian>(0).unwrap();
    write_string(&mut data, name);
    data
}

fn write_string(data: &mut Vec<u8>, text: &str) {
    data.write_u16::<LittleEndian>(text.len() as u16).unwrap();
    data.extend_from_slice(text.as_bytes());
}
