//! Text string encodings used in the generated documents
//!
//! Glyph runs use WinAnsi (Windows-1252), the encoding declared on the standard
//! Helvetica fonts. Characters outside it are drawn as `?`; the exact text is
//! then carried in an `/ActualText` span as UTF-16BE so extraction is lossless.

/// Windows-1252 assignments for bytes 0x80..=0x9F; 0x81, 0x8D, 0x8F, 0x90 and 0x9D are unassigned
const WIN_ANSI_HIGH: [(u8, char); 27] = [
    (0x80, '€'),
    (0x82, '‚'),
    (0x83, 'ƒ'),
    (0x84, '„'),
    (0x85, '…'),
    (0x86, '†'),
    (0x87, '‡'),
    (0x88, 'ˆ'),
    (0x89, '‰'),
    (0x8A, 'Š'),
    (0x8B, '‹'),
    (0x8C, 'Œ'),
    (0x8E, 'Ž'),
    (0x91, '‘'),
    (0x92, '’'),
    (0x93, '“'),
    (0x94, '”'),
    (0x95, '•'),
    (0x96, '–'),
    (0x97, '—'),
    (0x98, '˜'),
    (0x99, '™'),
    (0x9A, 'š'),
    (0x9B, '›'),
    (0x9C, 'œ'),
    (0x9E, 'ž'),
    (0x9F, 'Ÿ'),
];

const UTF16_BOM: [u8; 2] = [0xFE, 0xFF];

fn win_ansi_byte(c: char) -> Option<u8> {
    match u32::from(c) {
        0x20..=0x7E | 0xA0..=0xFF => u8::try_from(u32::from(c)).ok(),
        _ => WIN_ANSI_HIGH.iter().find(|(_, ch)| *ch == c).map(|(b, _)| *b),
    }
}

fn win_ansi_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WIN_ANSI_HIGH
            .iter()
            .find(|(b, _)| *b == byte)
            .map(|(_, c)| *c)
            .unwrap_or(char::REPLACEMENT_CHARACTER),
        _ => char::from(byte),
    }
}

/// Whether every character has a WinAnsi glyph
pub(crate) fn is_win_ansi(text: &str) -> bool {
    text.chars().all(|c| win_ansi_byte(c).is_some())
}

/// WinAnsi bytes; unencodable characters become `?`
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

pub(crate) fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| win_ansi_char(b)).collect()
}

/// UTF-16BE with byte-order mark, the form PDF text strings use for full Unicode
pub(crate) fn encode_utf16(text: &str) -> Vec<u8> {
    let mut bytes = UTF16_BOM.to_vec();
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Decode a text string: UTF-16BE when it starts with a BOM, WinAnsi otherwise
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&UTF16_BOM) {
        Some(rest) => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => decode_win_ansi(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_uses_cp1252_for_high_bytes() {
        assert_eq!(encode_win_ansi("Peña"), b"Pe\xf1a".to_vec());
        assert_eq!(encode_win_ansi("Œuvre €5 – Šimon"), b"\x8cuvre \x805 \x96 \x8aimon".to_vec());
        assert_eq!(decode_win_ansi(b"\x8cuvre \x805 \x96 \x8aimon"), "Œuvre €5 – Šimon");
    }

    #[test]
    fn test_unencodable_characters() {
        assert!(is_win_ansi("José Peña"));
        assert!(!is_win_ansi("Łukasz Dvořák"));
        assert!(!is_win_ansi("李"));
        // C1 control code points have no glyph even though they fit in a byte
        assert!(!is_win_ansi("\u{0085}"));
        assert_eq!(encode_win_ansi("Łukasz Dvořák"), b"?ukasz Dvo?\xe1k".to_vec());
    }

    #[test]
    fn test_utf16_text_strings() {
        let bytes = encode_utf16("Łukasz 李");
        assert_eq!(&bytes[..2], &UTF16_BOM);
        assert_eq!(decode_text_string(&bytes), "Łukasz 李");
        assert_eq!(decode_text_string(b"Pe\xf1a"), "Peña");
    }
}
