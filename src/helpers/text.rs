//! Byte-to-text decoding for uploaded files.
//! Recognises byte order marks, prefers UTF-8 and falls back to Windows-1252.

use encoding_rs::Encoding;
use encoding_rs::WINDOWS_1252;
use log::warn;
use std::borrow::Cow;

/// Unicode byte order mark as it appears in decoded text.
const BOM: char = '\u{feff}';

/// Decodes raw bytes into text.
///
/// # Arguments
/// * `bytes` - File content as uploaded
///
/// # Returns
/// * `Cow<str>` - Borrowed when the input is already valid UTF-8 without a BOM
pub(crate) fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        if had_errors {
            warn!("Malformed {} sequences replaced while decoding input", encoding.name());
        }
        return text;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
            warn!("Input is not valid UTF-8, decoded as {}", WINDOWS_1252.name());
            if had_errors {
                warn!("Malformed {} sequences replaced while decoding input", WINDOWS_1252.name());
            }
            text
        }
    }
}

/// Strips a leading byte order mark left in already-decoded text.
pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}
