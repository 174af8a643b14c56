use crate::{reader::AseReader, Result};
use bitflags::bitflags;

bitflags! {
    struct UserDataFlags: u32 {
        const HAS_TEXT = 0x0001;
        const HAS_COLOR = 0x0002;
        const HAS_PROPERTIES = 0x0004;
    }
}

/// The parts of a user data chunk this crate keeps: the optional text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UserData<'a> {
    pub text: Option<&'a str>,
}

pub(crate) fn parse_userdata_chunk(data: &[u8]) -> Result<UserData<'_>> {
    let mut reader = AseReader::new(data);

    let flags = UserDataFlags::from_bits_truncate(reader.dword()?);
    let text = if flags.contains(UserDataFlags::HAS_TEXT) {
        Some(reader.string()?)
    } else {
        None
    };
    // Color and properties follow the text; neither is needed here.

    Ok(UserData { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_only_when_flagged() {
        let with_text = [1, 0, 0, 0, 2, 0, b'h', b'i', 9, 9, 9, 9];
        assert_eq!(
            parse_userdata_chunk(&with_text).unwrap(),
            UserData { text: Some("hi") }
        );
        let color_only = [2, 0, 0, 0, 1, 2, 3, 4];
        assert_eq!(
            parse_userdata_chunk(&color_only).unwrap(),
            UserData { text: None }
        );
    }
}
