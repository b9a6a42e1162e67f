//! Validation and escaping of free text before it goes into the log.

use crate::error::{Result, SuuidError};

/// Returns true if `bytes` is well-formed UTF-8 that may appear in the log.
///
/// Rejects invalid continuation bytes, overlong encodings, encoded
/// surrogates (U+D800..U+DFFF) and the non-characters U+FFFE and U+FFFF.
/// Malformed input is never repaired.
///
/// # Examples
///
/// ```
/// use suuid_core::is_well_formed_utf8;
///
/// assert!(is_well_formed_utf8("blåbærsyltetøy".as_bytes()));
/// assert!(!is_well_formed_utf8(&[0xc0, 0x80]));
/// ```
pub fn is_well_formed_utf8(bytes: &[u8]) -> bool {
    well_formed_str(bytes).is_some()
}

/// Decodes `bytes` if [`is_well_formed_utf8`] accepts them.
pub(crate) fn well_formed_str(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(bytes)
        .ok()
        .filter(|s| !s.contains(['\u{fffe}', '\u{ffff}']))
}

/// Returns true if `text` contains no control characters other than
/// newline and tab, and no DEL.
pub fn is_loggable(text: &str) -> bool {
    text.bytes()
        .all(|b| b == b'\n' || b == b'\t' || (b >= 0x20 && b != 0x7f))
}

/// Escapes `text` for embedding in a log element.
///
/// `&`, `<` and `>` become entities; backslash, newline and tab become the
/// two-character sequences `\\`, `\n` and `\t`. Everything else is copied.
///
/// ```
/// use suuid_core::escape_for_log;
///
/// assert_eq!(escape_for_log("a&b<c>d"), "a&amp;b&lt;c&gt;d");
/// assert_eq!(escape_for_log("1\t2\n"), "1\\t2\\n");
/// ```
pub fn escape_for_log(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Checks raw input for `field` and returns it as a `&str`.
///
/// Malformed UTF-8 and unloggable characters are reported separately so
/// the caller can tell the user which field failed.
pub fn check_field<'a>(field: &'static str, bytes: &'a [u8]) -> Result<&'a str> {
    let text = well_formed_str(bytes).ok_or(SuuidError::InvalidUtf8 { field })?;
    if !is_loggable(text) {
        return Err(SuuidError::IllegalCharacters { field });
    }
    Ok(text)
}
