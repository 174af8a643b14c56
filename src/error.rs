use std::{error::Error, fmt, io, str::Utf8Error};

/// An error occured while reading the Aseprite file.
///
/// None of the variants the parser constructs allocate.
#[derive(Debug)]
pub enum AsepriteParseError {
    /// A header magic number did not match. `context` names the header.
    InvalidMagic {
        /// Which header was being read ("file" or "frame").
        context: &'static str,
        /// The magic number the format requires.
        expected: u16,
        /// The value found in the input.
        found: u16,
    },
    /// Only 8-bit indexed color is supported.
    UnsupportedColorDepth(u16),
    /// Only raw (0) and zlib-compressed (2) cels are supported.
    UnsupportedCelType(u16),
    /// A layer chunk declared an unknown layer type.
    InvalidLayerType(u16),
    /// A frame header declared a size that is smaller than the frame header
    /// or larger than the remaining input.
    InvalidFrameSize {
        /// Frame number.
        frame: u16,
        /// Declared frame size in bytes.
        size: u32,
    },
    /// A chunk header declared a size that does not fit its frame.
    InvalidChunkSize {
        /// Declared chunk size in bytes, including the chunk header.
        size: u32,
        /// Bytes left in the enclosing frame.
        available: usize,
    },
    /// The file has more layers than the layer table can hold.
    TooManyLayers(usize),
    /// A cel refers to a layer index that no layer chunk declared.
    UnknownLayer(u16),
    /// A slice chunk contained no slice keys.
    SliceWithoutKeys,
    /// A tilesheet was requested from a file without slice chunks.
    NoSlices,
    /// A tilesheet was requested with a tile size of zero.
    InvalidTileSize(u16),
    /// A slice is not a whole number of tiles wide and high.
    SliceNotTileAligned {
        /// Index of the slice in file order.
        index: usize,
        /// Slice width in pixels.
        width: u32,
        /// Slice height in pixels.
        height: u32,
        /// Requested tile size in pixels.
        tile_size: u16,
    },
    /// A slice reaches outside of the first frame.
    SliceOutOfBounds {
        /// Index of the slice in file order.
        index: usize,
    },
    /// The decoded content does not fit into the output storage.
    CapacityExceeded {
        /// Number of elements required.
        needed: usize,
        /// Number of elements available.
        capacity: usize,
    },
    /// A string in the file is not valid UTF-8.
    InvalidUtf8(Utf8Error),
    /// The compressed pixel data of a cel is corrupt.
    Inflate(InflateError),
    /// An IO error occured. Also includes errors where the input was shorter
    /// than expected.
    IoError(io::Error),
}

/// Why a zlib/DEFLATE stream could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateError {
    /// The input ended while more bits were needed.
    UnexpectedEof,
    /// The zlib compression method is not DEFLATE (8).
    UnsupportedMethod(u8),
    /// The zlib header check bits are wrong.
    HeaderChecksum,
    /// The stream requires a preset dictionary.
    PresetDictionary,
    /// Block type 3 is reserved.
    ReservedBlockType,
    /// A stored block's NLEN is not the complement of LEN.
    StoredLengthMismatch {
        /// LEN field.
        len: u16,
        /// NLEN field.
        nlen: u16,
    },
    /// A code length above 15 was requested.
    CodeLengthTooLong(u8),
    /// The code lengths describe more codes than fit in 15 bits.
    OversubscribedCode,
    /// No code of at most 15 bits matched the input.
    InvalidCode,
    /// Dynamic header declares more literal/length or distance codes than exist.
    TooManyCodes {
        /// Literal/length code count.
        literals: usize,
        /// Distance code count.
        distances: usize,
    },
    /// Code length symbol 16 appeared before any length.
    RepeatWithoutPrevious,
    /// A code length run overflowed the declared number of lengths.
    TooManyLengths,
    /// The literal/length code has no end-of-block symbol.
    MissingEndOfBlock,
    /// Literal/length symbols 286 and 287 are not allowed.
    InvalidLengthSymbol(u16),
    /// Distance symbols 30 and 31 are not allowed.
    InvalidDistanceSymbol(u16),
    /// A back-reference points before the start of the output.
    DistanceTooFar {
        /// Distance of the back-reference.
        distance: usize,
        /// Bytes decoded so far.
        available: usize,
    },
    /// The stream decodes to more bytes than expected.
    OutputOverflow {
        /// Declared output size.
        expected: usize,
    },
    /// The stream decodes to fewer bytes than expected.
    SizeMismatch {
        /// Declared output size.
        expected: usize,
        /// Decoded size.
        actual: usize,
    },
    /// The Adler-32 trailer does not match the decoded data.
    ChecksumMismatch {
        /// Checksum stored in the stream.
        expected: u32,
        /// Checksum of the decoded data.
        actual: u32,
    },
}

impl From<io::Error> for AsepriteParseError {
    fn from(err: io::Error) -> Self {
        AsepriteParseError::IoError(err)
    }
}

impl From<Utf8Error> for AsepriteParseError {
    fn from(err: Utf8Error) -> Self {
        AsepriteParseError::InvalidUtf8(err)
    }
}

impl From<InflateError> for AsepriteParseError {
    fn from(err: InflateError) -> Self {
        AsepriteParseError::Inflate(err)
    }
}

impl AsepriteParseError {
    pub(crate) fn eof() -> Self {
        AsepriteParseError::IoError(io::ErrorKind::UnexpectedEof.into())
    }
}

impl fmt::Display for AsepriteParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AsepriteParseError::*;
        match self {
            InvalidMagic {
                context,
                expected,
                found,
            } => write!(
                f,
                "Invalid magic number for {} header: {:x} != {:x}",
                context, found, expected
            ),
            UnsupportedColorDepth(depth) => write!(
                f,
                "Unsupported color depth: {} (only 8-bit indexed is supported)",
                depth
            ),
            UnsupportedCelType(cel_type) => write!(f, "Invalid/Unsupported Cel type: {}", cel_type),
            InvalidLayerType(id) => write!(f, "Invalid layer type: {}", id),
            InvalidFrameSize { frame, size } => {
                write!(f, "Invalid size for frame {}: {} bytes", frame, size)
            }
            InvalidChunkSize { size, available } => write!(
                f,
                "Invalid chunk size {}, there are only {} bytes available in the frame",
                size, available
            ),
            TooManyLayers(limit) => write!(f, "Too many layers (limit: {})", limit),
            UnknownLayer(index) => write!(f, "Cel refers to unknown layer {}", index),
            SliceWithoutKeys => write!(f, "Slice chunk has no slice keys"),
            NoSlices => write!(f, "No slices found, a tilesheet needs at least one"),
            InvalidTileSize(size) => write!(f, "Invalid tile size: {}", size),
            SliceNotTileAligned {
                index,
                width,
                height,
                tile_size,
            } => write!(
                f,
                "Slice {} is {}x{}, which is not a multiple of the tile size {}",
                index, width, height, tile_size
            ),
            SliceOutOfBounds { index } => write!(f, "Slice {} is outside of the frame", index),
            CapacityExceeded { needed, capacity } => write!(
                f,
                "Output does not fit: needs {}, capacity is {}",
                needed, capacity
            ),
            InvalidUtf8(err) => write!(f, "Could not decode utf8: {}", err),
            Inflate(err) => write!(f, "Corrupt compressed data: {}", err),
            IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for AsepriteParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AsepriteParseError::IoError(err) => Some(err),
            AsepriteParseError::InvalidUtf8(err) => Some(err),
            AsepriteParseError::Inflate(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for InflateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use InflateError::*;
        match self {
            UnexpectedEof => write!(f, "unexpected end of input"),
            UnsupportedMethod(method) => write!(f, "unsupported compression method {}", method),
            HeaderChecksum => write!(f, "zlib header check failed"),
            PresetDictionary => write!(f, "preset dictionaries are not supported"),
            ReservedBlockType => write!(f, "reserved block type"),
            StoredLengthMismatch { len, nlen } => {
                write!(f, "stored block LEN {:#06x} does not match NLEN {:#06x}", len, nlen)
            }
            CodeLengthTooLong(len) => write!(f, "code length {} is longer than 15", len),
            OversubscribedCode => write!(f, "code lengths are over-subscribed"),
            InvalidCode => write!(f, "no code matched within 15 bits"),
            TooManyCodes {
                literals,
                distances,
            } => write!(
                f,
                "too many codes: {} literal/length, {} distance",
                literals, distances
            ),
            RepeatWithoutPrevious => write!(f, "length repeat without a previous length"),
            TooManyLengths => write!(f, "code length run exceeds the declared count"),
            MissingEndOfBlock => write!(f, "no end-of-block code"),
            InvalidLengthSymbol(sym) => write!(f, "invalid length symbol {}", sym),
            InvalidDistanceSymbol(sym) => write!(f, "invalid distance symbol {}", sym),
            DistanceTooFar {
                distance,
                available,
            } => write!(
                f,
                "distance {} reaches before the start of output ({} bytes)",
                distance, available
            ),
            OutputOverflow { expected } => {
                write!(f, "decoded data is larger than the expected {} bytes", expected)
            }
            SizeMismatch { expected, actual } => write!(
                f,
                "invalid data size. Expected: {}, Actual: {}",
                expected, actual
            ),
            ChecksumMismatch { expected, actual } => write!(
                f,
                "Adler-32 mismatch: expected {:#010x}, got {:#010x}",
                expected, actual
            ),
        }
    }
}

impl Error for InflateError {}
