//! ANSI escape sequences for console colors.
//!
//! The dark colors and `Gray` use the basic SGR codes (`30`-`37` for the
//! foreground, `40`-`47` for the background). The bright colors use the
//! first sixteen entries of the 256-color palette, which every terminal that
//! understands `38;5` maps onto its bright colors. No color at all selects
//! the terminal's default (`39` / `49`).

use crate::Color;
use std::fmt;
use std::io;

/// Writes the ANSI escape sequence selecting the given color.
///
/// If `bg` is true, then the color is treated as a background color.
/// Otherwise, it's treated as a foreground color. `None` selects the
/// terminal's default color.
///
/// The caller must provide their own writer. Callers should prefer the
/// consoles in this crate, such as `StandardConsole` or `TermConsole`.
pub fn ansi_color<W: io::Write>(
    mut wtr: W,
    color: Option<Color>,
    bg: bool,
) -> io::Result<()> {
    macro_rules! write_normal {
        ($clr:expr) => {
            if bg {
                wtr.write_all(concat!("\x1B[4", $clr, "m").as_bytes())
            } else {
                wtr.write_all(concat!("\x1B[3", $clr, "m").as_bytes())
            }
        };
    }
    macro_rules! write_intense {
        ($clr:expr) => {
            if bg {
                wtr.write_all(concat!("\x1B[48;5;", $clr, "m").as_bytes())
            } else {
                wtr.write_all(concat!("\x1B[38;5;", $clr, "m").as_bytes())
            }
        };
    }
    match color {
        None => write_normal!("9"),
        Some(Color::Black) => write_normal!("0"),
        Some(Color::DarkRed) => write_normal!("1"),
        Some(Color::DarkGreen) => write_normal!("2"),
        Some(Color::DarkYellow) => write_normal!("3"),
        Some(Color::DarkBlue) => write_normal!("4"),
        Some(Color::DarkMagenta) => write_normal!("5"),
        Some(Color::DarkCyan) => write_normal!("6"),
        Some(Color::Gray) => write_normal!("7"),
        Some(Color::DarkGray) => write_intense!("8"),
        Some(Color::Red) => write_intense!("9"),
        Some(Color::Green) => write_intense!("10"),
        Some(Color::Yellow) => write_intense!("11"),
        Some(Color::Blue) => write_intense!("12"),
        Some(Color::Magenta) => write_intense!("13"),
        Some(Color::Cyan) => write_intense!("14"),
        Some(Color::White) => write_intense!("15"),
    }
}

/// A pair of colors that formats to the ANSI escape sequences selecting them.
///
/// Only the colors that are present are written, so a pair of `None`s
/// formats to the empty string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnsiColor {
    fg: Option<Color>,
    bg: Option<Color>,
}

impl AnsiColor {
    /// Create a formattable escape for the given foreground and background.
    pub fn new(fg: Option<Color>, bg: Option<Color>) -> AnsiColor {
        AnsiColor { fg, bg }
    }
}

impl fmt::Display for AnsiColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        if self.fg.is_some() {
            ansi_color(&mut buf, self.fg, false).map_err(|_| fmt::Error)?;
        }
        if self.bg.is_some() {
            ansi_color(&mut buf, self.bg, true).map_err(|_| fmt::Error)?;
        }
        write!(f, "{}", String::from_utf8_lossy(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn escape(color: Option<Color>, bg: bool) -> String {
        let mut buf = vec![];
        ansi_color(&mut buf, color, bg).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test_case(Some(Color::DarkRed), "\x1B[31m", "\x1B[41m")]
    #[test_case(Some(Color::Gray), "\x1B[37m", "\x1B[47m")]
    #[test_case(Some(Color::DarkGray), "\x1B[38;5;8m", "\x1B[48;5;8m")]
    #[test_case(Some(Color::Blue), "\x1B[38;5;12m", "\x1B[48;5;12m")]
    #[test_case(Some(Color::White), "\x1B[38;5;15m", "\x1B[48;5;15m")]
    #[test_case(None, "\x1B[39m", "\x1B[49m")]
    fn escapes(color: Option<Color>, fg: &str, bg: &str) {
        assert_eq!(escape(color, false), fg);
        assert_eq!(escape(color, true), bg);
    }

    #[test]
    fn every_color_has_a_distinct_escape() {
        let mut seen: Vec<String> =
            Color::ALL.iter().map(|&c| escape(Some(c), false)).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn display_skips_missing_colors() {
        assert_eq!(AnsiColor::new(None, None).to_string(), "");
        assert_eq!(
            AnsiColor::new(Some(Color::DarkGreen), None).to_string(),
            "\x1B[32m"
        );
        assert_eq!(
            AnsiColor::new(Some(Color::Red), Some(Color::Black)).to_string(),
            "\x1B[38;5;9m\x1B[40m"
        );
    }
}
