//! Shell quoting for generated command lines.
//!
//! Role names, user names, keys and range ends are arbitrary bytes. Each
//! one is rendered as a single shell word that evaluates back to exactly
//! those bytes and never spans more than one output line.

use std::fmt::Write;

/// Turns raw bytes into one shell word.
pub trait ShellQuote {
    /// Quote arbitrary bytes.
    fn quote(&self, raw: &[u8]) -> String;

    /// Quote a UTF-8 string.
    fn quote_str(&self, raw: &str) -> String {
        self.quote(raw.as_bytes())
    }
}

/// Quoting for POSIX shells.
///
/// - empty input becomes `''`;
/// - words made only of `[A-Za-z0-9_@%+=:,./-]` are left bare;
/// - other printable UTF-8 is single-quoted, with `'` written as `'"'"'`;
/// - input with control characters or invalid UTF-8 uses `$'...'` with
///   `\xNN` escapes, so the command stays on one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixQuoter;

impl ShellQuote for PosixQuoter {
    fn quote(&self, raw: &[u8]) -> String {
        if raw.is_empty() {
            return "''".to_string();
        }

        match std::str::from_utf8(raw) {
            Ok(s) if s.bytes().all(is_safe) => s.to_string(),
            Ok(s) if !s.chars().any(char::is_control) => single_quote(s),
            _ => ansi_c_quote(raw),
        }
    }
}

fn is_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"_@%+=:,./-".contains(&b)
}

fn single_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    out.push_str(&s.replace('\'', "'\"'\"'"));
    out.push('\'');
    out
}

fn ansi_c_quote(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len() * 2 + 3);
    out.push_str("$'");
    for &b in raw {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push('\'');
    out
}
