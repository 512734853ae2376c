//! IRC formatting control bytes.
//!
//! Chat clients interpret these in message content:
//! - 0x02 (^B): Bold
//! - 0x03 (^C): Color, followed by a one or two digit color number
//! - 0x0F (^O): Reset all formatting
//! - 0x1D (^]): Italic
//! - 0x1F (^_): Underline

use std::borrow::Cow;

pub const BOLD: char = '\x02';
pub const COLOR: char = '\x03';
pub const RESET: char = '\x0F';
pub const ITALIC: char = '\x1D';
pub const UNDERLINE: char = '\x1F';

/// mIRC color numbers used by the bot.
pub mod color {
    pub const RED: u8 = 4;
    pub const GREEN: u8 = 3;
    pub const BLUE: u8 = 12;
    pub const GREY: u8 = 14;
}

/// Color code prefix, e.g. `color_code(14)` is `"\x0314"`.
pub fn color_code(n: u8) -> String {
    format!("{COLOR}{n}")
}

/// Wrap text in italic toggles.
pub fn italic(text: &str) -> String {
    format!("{ITALIC}{text}{ITALIC}")
}

/// Field label used by data summaries: bold grey `name:` then a reset.
///
/// The trailing space belongs to the label so values read `HP: 35`.
pub fn label(name: &str) -> String {
    format!("{BOLD}{COLOR}{}{name}:{RESET} ", color::GREY)
}

/// Collapse every run of spaces into a single space.
///
/// Only U+0020 is collapsed; tabs and control bytes pass through untouched.
pub fn collapse_spaces(text: &str) -> Cow<'_, str> {
    if !text.contains("  ") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(c);
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(label("HP"), "\x02\x0314HP:\x0F ");
    }

    #[test]
    fn test_color_code() {
        assert_eq!(color_code(color::RED), "\x034");
        assert_eq!(color_code(color::BLUE), "\x0312");
    }

    #[test]
    fn test_collapse_spaces() {
        assert_eq!(collapse_spaces("a   b  c"), "a b c");
        assert_eq!(collapse_spaces("  lead"), " lead");
        assert_eq!(collapse_spaces("tab\t\tkept"), "tab\t\tkept");
    }

    #[test]
    fn test_collapse_borrows_when_clean() {
        match collapse_spaces("already clean") {
            Cow::Borrowed(s) => assert_eq!(s, "already clean"),
            Cow::Owned(_) => panic!("expected borrowed"),
        }
    }
}
