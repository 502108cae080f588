//! Quoting helpers for shell command lines and AppleScript literals.

/// Quotes a string for a POSIX shell command line.
///
/// Plain words pass through untouched; anything else is wrapped in single
/// quotes, with embedded single quotes closed around (`'` becomes `'\''`).
pub fn sh_quote(word: &str) -> String {
    if !word.is_empty() && word.bytes().all(is_plain_shell_byte) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

fn is_plain_shell_byte(byte: u8) -> bool {
    matches!(byte,
        b'A'..=b'Z'
        | b'a'..=b'z'
        | b'0'..=b'9'
        | b'/' | b'.' | b'_' | b'-' | b'+' | b'=' | b':' | b'@' | b'%' | b',')
}

/// Escapes a string for inclusion inside an AppleScript double-quoted
/// literal: backslashes and double quotes gain a leading backslash.
pub fn applescript_escape(text: &str) -> String {
    text.replace('\\', r"\\").replace('"', r#"\""#)
}
