use std::borrow::Cow;
use std::env;
use std::fmt;
use std::str::FromStr;

/// ColorChoice represents the color preferences of an end user.
///
/// The `Default` implementation for this type will select `Auto`, which tries
/// to do the right thing based on the current environment.
///
/// The `FromStr` implementation for this type converts a lowercase kebab-case
/// string of the variant name to the corresponding variant. Any other string
/// results in an error.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorChoice {
    /// Try very hard to emit colors. This includes emitting ANSI colors
    /// on Windows if virtual terminal processing can be enabled.
    Always,
    /// AlwaysAnsi is like Always, except it emits ANSI color codes even when
    /// virtual terminal processing could not be enabled on Windows.
    AlwaysAnsi,
    /// Use colors unless the user asked for none by setting `NO_COLOR`.
    #[default]
    Auto,
    /// Never emit colors.
    Never,
}

impl FromStr for ColorChoice {
    type Err = ColorChoiceParseError;

    fn from_str(s: &str) -> Result<ColorChoice, ColorChoiceParseError> {
        match s.to_lowercase().as_str() {
            "always" => Ok(ColorChoice::Always),
            "always-ansi" => Ok(ColorChoice::AlwaysAnsi),
            "never" => Ok(ColorChoice::Never),
            "auto" => Ok(ColorChoice::Auto),
            unknown => Err(ColorChoiceParseError {
                unknown_choice: unknown.to_string(),
            }),
        }
    }
}

impl ColorChoice {
    /// Returns true if we should attempt to write colored output.
    pub(crate) fn should_attempt_color(&self) -> bool {
        match *self {
            ColorChoice::Always => true,
            ColorChoice::AlwaysAnsi => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Returns true if this choice should forcefully use ANSI color codes.
    #[cfg(windows)]
    pub(crate) fn should_force_ansi(&self) -> bool {
        matches!(*self, ColorChoice::AlwaysAnsi)
    }
}

/// An error that occurs when parsing a `ColorChoice` fails.
#[derive(Clone, Debug)]
pub struct ColorChoiceParseError {
    unknown_choice: String,
}

impl ColorChoiceParseError {
    /// Return the string that couldn't be parsed as a valid color choice.
    pub fn invalid_choice(&self) -> &str {
        &self.unknown_choice
    }
}

impl std::error::Error for ColorChoiceParseError {}

impl fmt::Display for ColorChoiceParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unrecognized color choice '{}': valid choices are: \
             always, always-ansi, never, auto",
            self.unknown_choice,
        )
    }
}

/// The sixteen colors of a classic console palette.
///
/// The first eight are the dark (normal intensity) colors, the last eight
/// their bright counterparts. `Gray` is the normal intensity white and
/// `DarkGray` the bright black.
///
/// This type has a `FromStr` impl that matches color names case
/// insensitively, with words separated by `-`, `_` or nothing at all. That
/// is, `dark-blue`, `dark_blue` and `DarkBlue` all parse to `DarkBlue`.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Color {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

impl Color {
    /// Every color, in palette order.
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::DarkBlue,
        Color::DarkGreen,
        Color::DarkCyan,
        Color::DarkRed,
        Color::DarkMagenta,
        Color::DarkYellow,
        Color::Gray,
        Color::DarkGray,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
    ];

    /// Returns the kebab-case name of this color.
    pub fn name(&self) -> &'static str {
        match *self {
            Color::Black => "black",
            Color::DarkBlue => "dark-blue",
            Color::DarkGreen => "dark-green",
            Color::DarkCyan => "dark-cyan",
            Color::DarkRed => "dark-red",
            Color::DarkMagenta => "dark-magenta",
            Color::DarkYellow => "dark-yellow",
            Color::Gray => "gray",
            Color::DarkGray => "dark-gray",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Red => "red",
            Color::Magenta => "magenta",
            Color::Yellow => "yellow",
            Color::White => "white",
        }
    }

    /// Returns true for the eight bright colors, `DarkGray` through `White`.
    pub fn is_bright(&self) -> bool {
        self.index() >= 8
    }

    /// The position of this color in `Color::ALL`.
    pub(crate) fn index(&self) -> u8 {
        *self as u8
    }

    pub(crate) fn from_index(index: u8) -> Option<Color> {
        Color::ALL.get(usize::from(index)).copied()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Color, ParseColorError> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|&c| c != '-' && c != '_')
            .collect::<String>()
            .to_lowercase();
        Color::ALL
            .iter()
            .find(|c| c.name().replace('-', "") == folded)
            .copied()
            .ok_or_else(|| ParseColorError { given: s.to_string() })
    }
}

/// An error from parsing an invalid color name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseColorError {
    given: String,
}

impl ParseColorError {
    /// Return the string that couldn't be parsed as a valid color.
    pub fn invalid(&self) -> &str {
        &self.given
    }
}

impl std::error::Error for ParseColorError {}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized color name '{}'. Choose from: \
             black, dark-blue, dark-green, dark-cyan, dark-red, \
             dark-magenta, dark-yellow, gray, dark-gray, blue, green, \
             cyan, red, magenta, yellow, white",
            self.given
        )
    }
}

/// One contiguous piece of text together with the colors to paint it in.
///
/// A run without a foreground (or background) is painted in whatever color
/// was in effect on the console when the write call began, not in some fixed
/// default. This lets callers color only the runs they care about.
///
/// Runs are usually built through one of the `From` conversions, either
/// directly or via the [`runs!`](crate::runs) macro:
///
/// ```
/// use colorrun::{Color, ColorRun};
///
/// let plain = ColorRun::from("plain");
/// let red = ColorRun::from(("red", Color::Red));
/// let boxed = ColorRun::from(("boxed", Color::Blue, Color::Green));
/// let bg_only = ColorRun::from(("bg", None, Some(Color::DarkGray)));
///
/// assert_eq!(plain.fg(), None);
/// assert_eq!(red.bg(), None);
/// assert_eq!(boxed.bg(), Some(Color::Green));
/// assert_eq!(bg_only.fg(), None);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ColorRun<'a> {
    text: Cow<'a, str>,
    fg: Option<Color>,
    bg: Option<Color>,
}

impl<'a> ColorRun<'a> {
    /// Create a run with the given text and colors.
    pub fn new<T: Into<Cow<'a, str>>>(
        text: T,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> ColorRun<'a> {
        ColorRun { text: text.into(), fg, bg }
    }

    /// Create a run that inherits both colors.
    pub fn plain<T: Into<Cow<'a, str>>>(text: T) -> ColorRun<'a> {
        ColorRun::new(text, None, None)
    }

    /// The text of this run.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The foreground color, if this run sets one.
    pub fn fg(&self) -> Option<Color> {
        self.fg
    }

    /// The background color, if this run sets one.
    pub fn bg(&self) -> Option<Color> {
        self.bg
    }

    /// Detach this run from any borrowed text.
    pub fn into_owned(self) -> ColorRun<'static> {
        ColorRun {
            text: Cow::Owned(self.text.into_owned()),
            fg: self.fg,
            bg: self.bg,
        }
    }
}

impl<'a> From<&'a str> for ColorRun<'a> {
    fn from(text: &'a str) -> ColorRun<'a> {
        ColorRun::plain(text)
    }
}

impl<'a> From<&'a String> for ColorRun<'a> {
    fn from(text: &'a String) -> ColorRun<'a> {
        ColorRun::plain(text.as_str())
    }
}

impl From<String> for ColorRun<'static> {
    fn from(text: String) -> ColorRun<'static> {
        ColorRun::plain(text)
    }
}

impl<'a> From<Cow<'a, str>> for ColorRun<'a> {
    fn from(text: Cow<'a, str>) -> ColorRun<'a> {
        ColorRun::plain(text)
    }
}

impl<'a, T: Into<Cow<'a, str>>> From<(T, Color)> for ColorRun<'a> {
    fn from((text, fg): (T, Color)) -> ColorRun<'a> {
        ColorRun::new(text, Some(fg), None)
    }
}

impl<'a, T: Into<Cow<'a, str>>> From<(T, Option<Color>)> for ColorRun<'a> {
    fn from((text, fg): (T, Option<Color>)) -> ColorRun<'a> {
        ColorRun::new(text, fg, None)
    }
}

impl<'a, T: Into<Cow<'a, str>>> From<(T, Color, Color)> for ColorRun<'a> {
    fn from((text, fg, bg): (T, Color, Color)) -> ColorRun<'a> {
        ColorRun::new(text, Some(fg), Some(bg))
    }
}

impl<'a, T: Into<Cow<'a, str>>> From<(T, Option<Color>, Option<Color>)>
    for ColorRun<'a>
{
    fn from(
        (text, fg, bg): (T, Option<Color>, Option<Color>),
    ) -> ColorRun<'a> {
        ColorRun::new(text, fg, bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use test_case::test_case;

    #[test_case("black", Color::Black)]
    #[test_case("dark-blue", Color::DarkBlue)]
    #[test_case("dark_green", Color::DarkGreen)]
    #[test_case("DarkCyan", Color::DarkCyan)]
    #[test_case("DARK-RED", Color::DarkRed)]
    #[test_case("darkmagenta", Color::DarkMagenta)]
    #[test_case(" gray ", Color::Gray)]
    #[test_case("dark-gray", Color::DarkGray)]
    #[test_case("White", Color::White)]
    fn color_from_name(name: &str, expected: Color) {
        assert_eq!(name.parse::<Color>(), Ok(expected));
    }

    #[test_case("grey")]
    #[test_case("")]
    #[test_case("dark")]
    #[test_case("light-blue")]
    fn color_from_bad_name(name: &str) {
        let err = name.parse::<Color>().unwrap_err();
        assert_eq!(err.invalid(), name);
        assert!(err.to_string().contains("unrecognized color name"));
    }

    #[test]
    fn color_names_round_trip_through_display() {
        for color in Color::ALL {
            assert_eq!(color.to_string().parse::<Color>(), Ok(color));
        }
    }

    #[test]
    fn color_index_matches_palette_order() {
        for (i, color) in Color::ALL.iter().enumerate() {
            assert_eq!(usize::from(color.index()), i);
            assert_eq!(Color::from_index(color.index()), Some(*color));
        }
        assert_eq!(Color::from_index(16), None);
        assert!(!Color::Gray.is_bright());
        assert!(Color::DarkGray.is_bright());
    }

    #[test]
    fn color_choice_from_str() {
        assert_eq!("always".parse::<ColorChoice>().ok(), Some(ColorChoice::Always));
        assert_eq!(
            "Always-ANSI".parse::<ColorChoice>().ok(),
            Some(ColorChoice::AlwaysAnsi)
        );
        assert_eq!("never".parse::<ColorChoice>().ok(), Some(ColorChoice::Never));
        let err = "sometimes".parse::<ColorChoice>().unwrap_err();
        assert_eq!(err.invalid_choice(), "sometimes");
    }

    #[test]
    #[serial]
    fn auto_honors_no_color() {
        // SAFETY: serialized with every other test that touches NO_COLOR.
        unsafe { env::set_var("NO_COLOR", "1") };
        assert!(!ColorChoice::Auto.should_attempt_color());
        assert!(ColorChoice::Always.should_attempt_color());
        unsafe { env::remove_var("NO_COLOR") };
        assert!(ColorChoice::Auto.should_attempt_color());
        assert!(!ColorChoice::Never.should_attempt_color());
    }

    #[test]
    fn run_from_text() {
        let run = ColorRun::from("Hello world");
        assert_eq!(run.text(), "Hello world");
        assert_eq!(run.fg(), None);
        assert_eq!(run.bg(), None);

        let owned = ColorRun::from(String::from("owned"));
        assert_eq!(owned, ColorRun::plain("owned"));
    }

    #[test]
    fn run_from_text_and_foreground() {
        let run = ColorRun::from(("Hello", Color::Red));
        assert_eq!(run, ColorRun::new("Hello", Some(Color::Red), None));

        let none = ColorRun::from(("Hello", None));
        assert_eq!(none, ColorRun::plain("Hello"));
    }

    #[test]
    fn run_from_text_and_both_colors() {
        let run = ColorRun::from(("world", Color::Blue, Color::Green));
        assert_eq!(run.fg(), Some(Color::Blue));
        assert_eq!(run.bg(), Some(Color::Green));

        let bg_only = ColorRun::from(("world", None, Some(Color::Green)));
        assert_eq!(bg_only.fg(), None);
        assert_eq!(bg_only.bg(), Some(Color::Green));
    }

    #[test]
    fn run_text_is_not_validated() {
        let run = ColorRun::from(("\x07\tbell\r", Color::Yellow));
        assert_eq!(run.text(), "\x07\tbell\r");
        assert_eq!(ColorRun::from("").text(), "");
    }

    #[test]
    fn run_into_owned_keeps_colors() {
        let text = String::from("borrowed");
        let run = ColorRun::from((&text, Some(Color::Cyan))).into_owned();
        drop(text);
        assert_eq!(run, ColorRun::new("borrowed", Some(Color::Cyan), None));
    }
}
