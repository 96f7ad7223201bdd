use crate::{Color, ColorChoice, Console, WriteToken, ansi_color};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicU8, Ordering};

#[cfg(windows)]
use winapi_util::console as wincon;

/// `std::io` implements `Stdout` and `Stderr` (and their `Lock` variants) as
/// separate types, which makes it difficult to abstract over them. We use
/// some simple internal enum types to work around this.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum StandardStreamType {
    Stdout,
    Stderr,
}

impl StandardStreamType {
    fn lock(self) -> IoStandardStreamLock<'static> {
        match self {
            StandardStreamType::Stdout => {
                IoStandardStreamLock::StdoutLock(io::stdout().lock())
            }
            StandardStreamType::Stderr => {
                IoStandardStreamLock::StderrLock(io::stderr().lock())
            }
        }
    }

    fn ambient(self) -> &'static AmbientColors {
        match self {
            StandardStreamType::Stdout => &STDOUT_AMBIENT,
            StandardStreamType::Stderr => &STDERR_AMBIENT,
        }
    }

    fn token(self) -> &'static WriteToken {
        match self {
            StandardStreamType::Stdout => &STDOUT_TOKEN,
            StandardStreamType::Stderr => &STDERR_TOKEN,
        }
    }
}

#[derive(Debug)]
enum IoStandardStreamLock<'a> {
    StdoutLock(io::StdoutLock<'a>),
    StderrLock(io::StderrLock<'a>),
}

impl io::Write for IoStandardStreamLock<'_> {
    #[inline(always)]
    fn write(&mut self, b: &[u8]) -> io::Result<usize> {
        match *self {
            IoStandardStreamLock::StdoutLock(ref mut s) => s.write(b),
            IoStandardStreamLock::StderrLock(ref mut s) => s.write(b),
        }
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        match *self {
            IoStandardStreamLock::StdoutLock(ref mut s) => s.flush(),
            IoStandardStreamLock::StderrLock(ref mut s) => s.flush(),
        }
    }
}

/// The colors currently in effect on a standard stream.
///
/// A terminal's colors belong to the whole process, not to any one handle
/// on it, so these live in statics. Each color is stored as `0` for the
/// terminal default or `1 + index` for a palette color.
#[derive(Debug)]
struct AmbientColors {
    fg: AtomicU8,
    bg: AtomicU8,
}

static STDOUT_AMBIENT: AmbientColors = AmbientColors::new();
static STDERR_AMBIENT: AmbientColors = AmbientColors::new();

static STDOUT_TOKEN: WriteToken = WriteToken::new();
static STDERR_TOKEN: WriteToken = WriteToken::new();

impl AmbientColors {
    const fn new() -> AmbientColors {
        AmbientColors { fg: AtomicU8::new(0), bg: AtomicU8::new(0) }
    }

    fn slot(&self, bg: bool) -> &AtomicU8 {
        if bg { &self.bg } else { &self.fg }
    }

    fn get(&self, bg: bool) -> Option<Color> {
        match self.slot(bg).load(Ordering::Acquire) {
            0 => None,
            n => Color::from_index(n - 1),
        }
    }

    fn set(&self, bg: bool, color: Option<Color>) {
        let n = color.map_or(0, |c| c.index() + 1);
        self.slot(bg).store(n, Ordering::Release);
    }
}

/// Strip one trailing line terminator, `\n` or `\r\n`.
fn read_line_from<R: BufRead>(mut rdr: R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if rdr.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

/// How a `StandardConsole` gets colors onto the terminal.
#[derive(Debug)]
enum Painter {
    NoColor,
    Ansi,
    /// A Windows console without virtual terminal support, painted by
    /// changing its text attributes.
    #[cfg(windows)]
    Console(Mutex<wincon::Console>),
}

impl Painter {
    #[cfg(not(windows))]
    fn create(_sty: StandardStreamType, choice: ColorChoice) -> Painter {
        if choice.should_attempt_color() {
            Painter::Ansi
        } else {
            Painter::NoColor
        }
    }

    #[cfg(windows)]
    fn create(sty: StandardStreamType, choice: ColorChoice) -> Painter {
        if !choice.should_attempt_color() {
            return Painter::NoColor;
        }
        let con_res = match sty {
            StandardStreamType::Stdout => wincon::Console::stdout(),
            StandardStreamType::Stderr => wincon::Console::stderr(),
        };
        match con_res {
            Ok(mut con) => {
                let enabled_virtual =
                    con.set_virtual_terminal_processing(true).is_ok();
                if enabled_virtual || choice.should_force_ansi() {
                    Painter::Ansi
                } else {
                    Painter::Console(Mutex::new(con))
                }
            }
            // Not a console at all, e.g. redirected to a file.
            Err(_) if choice.should_force_ansi() => Painter::Ansi,
            Err(_) => Painter::NoColor,
        }
    }

    fn describe(&self) -> &'static str {
        match *self {
            Painter::NoColor => "no colors",
            Painter::Ansi => "ANSI colors",
            #[cfg(windows)]
            Painter::Console(_) => "console attributes",
        }
    }
}

/// Split a color into the intensity and base color of a Windows console
/// attribute. The palette is laid out like the attribute bits: blue, green
/// and red in the low three bits, intensity in the fourth.
#[cfg(windows)]
fn console_color(color: Color) -> (wincon::Intense, wincon::Color) {
    let intense =
        if color.is_bright() { wincon::Intense::Yes } else { wincon::Intense::No };
    let base = match color.index() & 0b111 {
        0 => wincon::Color::Black,
        1 => wincon::Color::Blue,
        2 => wincon::Color::Green,
        3 => wincon::Color::Cyan,
        4 => wincon::Color::Red,
        5 => wincon::Color::Magenta,
        6 => wincon::Color::Yellow,
        _ => wincon::Color::White,
    };
    (intense, base)
}

/// Change one of the console's colors. The console's default can only be
/// brought back for both colors at once, so `other` is the color to put back
/// on the other side afterwards.
#[cfg(windows)]
fn paint_console(
    con: &mut wincon::Console,
    bg: bool,
    color: Option<Color>,
    other: Option<Color>,
) -> io::Result<()> {
    let set = |con: &mut wincon::Console, bg: bool, color: Color| {
        let (intense, base) = console_color(color);
        if bg { con.bg(intense, base) } else { con.fg(intense, base) }
    };
    match color {
        Some(color) => set(con, bg, color),
        None => {
            con.reset()?;
            match other {
                Some(other) => set(con, !bg, other),
                None => Ok(()),
            }
        }
    }
}

/// The process's terminal, seen through stdout or stderr, with input read
/// from stdin.
///
/// Colors are painted with ANSI escape sequences when the `ColorChoice`
/// allows it. On Windows consoles that don't understand them, the console's
/// text attributes are changed instead. When colors are disabled they are
/// still tracked, so `foreground` and `background` report what was last set,
/// but nothing is emitted for them.
///
/// The current colors are shared by every `StandardConsole` on the same
/// stream, since they all paint the same terminal. They start out as the
/// terminal default (`None`). Setting a color that is already in effect
/// writes nothing. For the same reason, all of them share one write token
/// per stream, so every `SynchronizedConsole` over, say, stdout serializes
/// with every other one.
///
/// Every write goes straight to the underlying stream, which is flushed when
/// `flush` is called.
#[derive(Debug)]
pub struct StandardConsole {
    sty: StandardStreamType,
    painter: Painter,
}

impl StandardConsole {
    /// Create a new `StandardConsole` with the given color preferences that
    /// writes to standard output.
    pub fn stdout(choice: ColorChoice) -> StandardConsole {
        StandardConsole::create(StandardStreamType::Stdout, choice)
    }

    /// Create a new `StandardConsole` with the given color preferences that
    /// writes to standard error.
    pub fn stderr(choice: ColorChoice) -> StandardConsole {
        StandardConsole::create(StandardStreamType::Stderr, choice)
    }

    fn create(sty: StandardStreamType, choice: ColorChoice) -> StandardConsole {
        let painter = Painter::create(sty, choice);
        log::debug!(
            "{sty:?} console with {choice:?} paints {}",
            painter.describe()
        );
        StandardConsole { sty, painter }
    }

    /// Returns true if and only if this console paints colors.
    pub fn supports_color(&self) -> bool {
        !matches!(self.painter, Painter::NoColor)
    }

    /// The stream lock is held from the comparison through the store, so
    /// the recorded color always matches the last one painted.
    fn set(&self, bg: bool, color: Option<Color>) -> io::Result<()> {
        let ambient = self.sty.ambient();
        let mut wtr = self.sty.lock();
        if ambient.get(bg) == color {
            return Ok(());
        }
        match self.painter {
            Painter::NoColor => {}
            Painter::Ansi => ansi_color(&mut wtr, color, bg)?,
            #[cfg(windows)]
            Painter::Console(ref con) => {
                // Text written so far must come out in the old colors.
                wtr.flush()?;
                paint_console(&mut con.lock(), bg, color, ambient.get(!bg))?;
            }
        }
        ambient.set(bg, color);
        Ok(())
    }
}

impl Console for StandardConsole {
    fn foreground(&self) -> Option<Color> {
        self.sty.ambient().get(false)
    }

    fn background(&self) -> Option<Color> {
        self.sty.ambient().get(true)
    }

    fn set_foreground(&self, color: Option<Color>) -> io::Result<()> {
        self.set(false, color)
    }

    fn set_background(&self, color: Option<Color>) -> io::Result<()> {
        self.set(true, color)
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        self.sty.lock().write_all(text.as_bytes())
    }

    fn write_newline(&self) -> io::Result<()> {
        self.sty.lock().write_all(b"\n")
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        read_line_from(io::stdin().lock())
    }

    fn flush(&self) -> io::Result<()> {
        self.sty.lock().flush()
    }

    fn shared_token(&self) -> Option<&'static WriteToken> {
        Some(self.sty.token())
    }
}

/// WriterInner is a (limited) generic representation of a writer that
/// either paints colors or drops them.
#[derive(Debug)]
enum WriterInner<W> {
    NoColor(W),
    Ansi(W),
}

impl<W: io::Write> WriterInner<W> {
    fn get_mut(&mut self) -> &mut W {
        match *self {
            WriterInner::NoColor(ref mut w) => w,
            WriterInner::Ansi(ref mut w) => w,
        }
    }

    fn into_inner(self) -> W {
        match self {
            WriterInner::NoColor(w) => w,
            WriterInner::Ansi(w) => w,
        }
    }

    fn paint(&mut self, color: Option<Color>, bg: bool) -> io::Result<()> {
        match *self {
            WriterInner::NoColor(_) => Ok(()),
            WriterInner::Ansi(ref mut w) => ansi_color(w, color, bg),
        }
    }
}

#[derive(Debug)]
struct TermInner<W, R> {
    wtr: WriterInner<W>,
    rdr: R,
    fg: Option<Color>,
    bg: Option<Color>,
}

/// A console over an arbitrary writer and line reader.
///
/// This paints exactly like `StandardConsole`, but keeps its current colors
/// to itself, which makes it suitable for pipes, pseudo terminals, or
/// in-memory buffers:
///
/// ```
/// use std::io::Cursor;
/// use colorrun::{Color, LockPolicy, SynchronizedConsole, TermConsole, runs};
///
/// # fn main() -> std::io::Result<()> {
/// let term = TermConsole::ansi(Vec::new(), Cursor::new("Ada\n"));
/// let console = SynchronizedConsole::new(term, LockPolicy::Spin);
/// let name = console.prompt(&runs![("Name: ", Color::DarkCyan)])?;
/// assert_eq!(name.as_deref(), Some("Ada"));
///
/// let (out, _) = console.into_inner().into_inner();
/// assert_eq!(out, b"\x1B[36mName: \x1B[39m");
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct TermConsole<W, R> {
    inner: Mutex<TermInner<W, R>>,
}

impl<W: io::Write, R: BufRead> TermConsole<W, R> {
    /// Create a console that paints colors with ANSI escape sequences.
    pub fn ansi(wtr: W, rdr: R) -> TermConsole<W, R> {
        TermConsole::create(WriterInner::Ansi(wtr), rdr)
    }

    /// Create a console that tracks colors but drops them from the output.
    pub fn no_color(wtr: W, rdr: R) -> TermConsole<W, R> {
        TermConsole::create(WriterInner::NoColor(wtr), rdr)
    }

    /// Create a console according to the given color preferences.
    pub fn new(wtr: W, rdr: R, choice: ColorChoice) -> TermConsole<W, R> {
        if choice.should_attempt_color() {
            TermConsole::ansi(wtr, rdr)
        } else {
            TermConsole::no_color(wtr, rdr)
        }
    }

    fn create(wtr: WriterInner<W>, rdr: R) -> TermConsole<W, R> {
        TermConsole {
            inner: Mutex::new(TermInner { wtr, rdr, fg: None, bg: None }),
        }
    }

    /// Assume the terminal behind the writer is already painting in the
    /// given colors. Nothing is written.
    #[must_use]
    pub fn with_ambient(
        mut self,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> TermConsole<W, R> {
        let inner = self.inner.get_mut();
        inner.fg = fg;
        inner.bg = bg;
        self
    }

    /// Returns true if and only if this console emits color escapes.
    pub fn supports_color(&self) -> bool {
        matches!(self.inner.lock().wtr, WriterInner::Ansi(_))
    }

    /// Consume this console and return the writer and reader.
    pub fn into_inner(self) -> (W, R) {
        let inner = self.inner.into_inner();
        (inner.wtr.into_inner(), inner.rdr)
    }

    fn set(&self, bg: bool, color: Option<Color>) -> io::Result<()> {
        let mut inner = self.inner.lock();
        let current = if bg { inner.bg } else { inner.fg };
        if current == color {
            return Ok(());
        }
        inner.wtr.paint(color, bg)?;
        if bg {
            inner.bg = color;
        } else {
            inner.fg = color;
        }
        Ok(())
    }
}

impl<W: io::Write, R: BufRead> Console for TermConsole<W, R> {
    fn foreground(&self) -> Option<Color> {
        self.inner.lock().fg
    }

    fn background(&self) -> Option<Color> {
        self.inner.lock().bg
    }

    fn set_foreground(&self, color: Option<Color>) -> io::Result<()> {
        self.set(false, color)
    }

    fn set_background(&self, color: Option<Color>) -> io::Result<()> {
        self.set(true, color)
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        self.inner.lock().wtr.get_mut().write_all(text.as_bytes())
    }

    fn write_newline(&self) -> io::Result<()> {
        self.inner.lock().wtr.get_mut().write_all(b"\n")
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        read_line_from(&mut self.inner.lock().rdr)
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.lock().wtr.get_mut().flush()
    }
}

/// A piece of text written to a `RecordingConsole`, together with the colors
/// that were in effect when it was written.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Segment {
    /// The text as written. Newlines are recorded as `"\n"`.
    pub text: String,
    /// The foreground color in effect.
    pub fg: Option<Color>,
    /// The background color in effect.
    pub bg: Option<Color>,
}

impl Segment {
    /// Create a new segment.
    pub fn new<T: Into<String>>(
        text: T,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> Segment {
        Segment { text: text.into(), fg, bg }
    }
}

#[derive(Debug, Default)]
struct Recording {
    fg: Option<Color>,
    bg: Option<Color>,
    segments: Vec<Segment>,
    input: VecDeque<String>,
}

/// An in-memory console that remembers what was written in which colors.
///
/// Input is served from a script of lines given up front; once they run
/// out, `read_line` reports the end of input.
///
/// ```
/// use colorrun::{
///     Color, LockPolicy, RecordingConsole, Segment, SynchronizedConsole, runs,
/// };
///
/// # fn main() -> std::io::Result<()> {
/// let console = SynchronizedConsole::new(RecordingConsole::new(), LockPolicy::Yield);
/// console.write(&runs![("Hello", Color::Red), " there"])?;
///
/// assert_eq!(console.get_ref().segments(), vec![
///     Segment::new("Hello", Some(Color::Red), None),
///     Segment::new(" there", None, None),
/// ]);
/// # Ok(()) }
/// ```
#[derive(Debug, Default)]
pub struct RecordingConsole {
    inner: Mutex<Recording>,
}

impl RecordingConsole {
    /// Create an empty recording console in the default colors, with no
    /// input.
    pub fn new() -> RecordingConsole {
        RecordingConsole::default()
    }

    /// Start out in the given colors.
    #[must_use]
    pub fn with_ambient(
        mut self,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> RecordingConsole {
        let inner = self.inner.get_mut();
        inner.fg = fg;
        inner.bg = bg;
        self
    }

    /// Append lines to the input script. Each call to `read_line` consumes
    /// one of them.
    #[must_use]
    pub fn with_input<I, S>(mut self, lines: I) -> RecordingConsole
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.get_mut().input.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Returns every segment written so far, in order.
    pub fn segments(&self) -> Vec<Segment> {
        self.inner.lock().segments.clone()
    }

    /// Returns all text written so far, without any color information.
    pub fn output(&self) -> String {
        self.inner.lock().segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Forget everything written so far. The current colors and any unread
    /// input are kept.
    pub fn clear(&self) {
        self.inner.lock().segments.clear();
    }

    fn record(&self, text: &str) {
        let mut inner = self.inner.lock();
        let segment = Segment::new(text, inner.fg, inner.bg);
        inner.segments.push(segment);
    }
}

impl Console for RecordingConsole {
    fn foreground(&self) -> Option<Color> {
        self.inner.lock().fg
    }

    fn background(&self) -> Option<Color> {
        self.inner.lock().bg
    }

    fn set_foreground(&self, color: Option<Color>) -> io::Result<()> {
        self.inner.lock().fg = color;
        Ok(())
    }

    fn set_background(&self, color: Option<Color>) -> io::Result<()> {
        self.inner.lock().bg = color;
        Ok(())
    }

    fn write_text(&self, text: &str) -> io::Result<()> {
        self.record(text);
        Ok(())
    }

    fn write_newline(&self) -> io::Result<()> {
        self.record("\n");
        Ok(())
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        Ok(self.inner.lock().input.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::io::Cursor;

    fn assert_is_send_sync<T: Send + Sync>() {}

    #[test]
    fn consoles_are_send_and_sync() {
        assert_is_send_sync::<StandardConsole>();
        assert_is_send_sync::<RecordingConsole>();
        assert_is_send_sync::<TermConsole<Vec<u8>, Cursor<Vec<u8>>>>();
    }

    #[test]
    fn read_line_strips_one_terminator() {
        let mut input = Cursor::new("one\r\ntwo\n\nlast");
        assert_eq!(read_line_from(&mut input).unwrap().as_deref(), Some("one"));
        assert_eq!(read_line_from(&mut input).unwrap().as_deref(), Some("two"));
        assert_eq!(read_line_from(&mut input).unwrap().as_deref(), Some(""));
        assert_eq!(read_line_from(&mut input).unwrap().as_deref(), Some("last"));
        assert_eq!(read_line_from(&mut input).unwrap(), None);
    }

    #[test]
    fn ambient_colors_encode_default_and_palette() {
        let ambient = AmbientColors::new();
        assert_eq!(ambient.get(false), None);
        for color in Color::ALL {
            ambient.set(false, Some(color));
            ambient.set(true, Some(color));
            assert_eq!(ambient.get(false), Some(color));
            assert_eq!(ambient.get(true), Some(color));
        }
        ambient.set(true, None);
        assert_eq!(ambient.get(true), None);
        assert_eq!(ambient.get(false), Some(Color::White));
    }

    #[test]
    fn term_console_paints_only_changes() {
        let term = TermConsole::ansi(Vec::new(), io::empty());
        term.set_foreground(None).unwrap();
        term.write_text("a").unwrap();
        term.set_foreground(Some(Color::DarkRed)).unwrap();
        term.set_foreground(Some(Color::DarkRed)).unwrap();
        term.write_text("b").unwrap();
        term.set_background(Some(Color::Blue)).unwrap();
        term.set_foreground(None).unwrap();
        term.set_background(None).unwrap();
        term.write_newline().unwrap();

        let (out, _) = term.into_inner();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a\x1B[31mb\x1B[48;5;12m\x1B[39m\x1B[49m\n"
        );
    }

    #[test]
    fn term_console_without_color_tracks_but_drops() {
        let term = TermConsole::no_color(Vec::new(), io::empty())
            .with_ambient(Some(Color::Gray), Some(Color::Black));
        assert!(!term.supports_color());
        term.set_foreground(Some(Color::Red)).unwrap();
        assert_eq!(term.foreground(), Some(Color::Red));
        assert_eq!(term.background(), Some(Color::Black));
        term.write_text("plain").unwrap();

        let (out, _) = term.into_inner();
        assert_eq!(out, b"plain");
    }

    /// A writer whose pipe is already closed.
    #[derive(Debug)]
    struct Closed;

    impl io::Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn term_console_keeps_colors_that_failed_to_paint() {
        let term = TermConsole::ansi(Closed, io::empty())
            .with_ambient(Some(Color::Gray), None);
        let err = term.set_foreground(Some(Color::Red)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(term.foreground(), Some(Color::Gray));

        term.set_background(Some(Color::Blue)).unwrap_err();
        assert_eq!(term.background(), None);

        // Retrying the same color has to try painting again.
        term.set_foreground(Some(Color::Red)).unwrap_err();
    }

    #[test]
    fn term_console_choice() {
        let never = TermConsole::new(Vec::new(), io::empty(), ColorChoice::Never);
        assert!(!never.supports_color());
        let always = TermConsole::new(Vec::new(), io::empty(), ColorChoice::Always);
        assert!(always.supports_color());
    }

    #[test]
    fn recording_console_records_colors_per_segment() {
        let rec = RecordingConsole::new()
            .with_ambient(Some(Color::Gray), None)
            .with_input(["first", "second"]);
        rec.write_text("a").unwrap();
        rec.set_background(Some(Color::DarkBlue)).unwrap();
        rec.write_text("b").unwrap();
        rec.write_newline().unwrap();

        assert_eq!(
            rec.segments(),
            vec![
                Segment::new("a", Some(Color::Gray), None),
                Segment::new("b", Some(Color::Gray), Some(Color::DarkBlue)),
                Segment::new("\n", Some(Color::Gray), Some(Color::DarkBlue)),
            ]
        );
        assert_eq!(rec.output(), "ab\n");
        assert_eq!(rec.read_line().unwrap().as_deref(), Some("first"));
        assert_eq!(rec.read_line().unwrap().as_deref(), Some("second"));
        assert_eq!(rec.read_line().unwrap(), None);

        rec.clear();
        assert_eq!(rec.output(), "");
        assert_eq!(rec.background(), Some(Color::DarkBlue));
    }

    #[test]
    #[serial]
    fn standard_consoles_share_stream_colors() {
        let a = StandardConsole::stderr(ColorChoice::Never);
        let b = StandardConsole::stderr(ColorChoice::Never);
        let before = (a.foreground(), a.background());

        a.set_foreground(Some(Color::Magenta)).unwrap();
        assert_eq!(b.foreground(), Some(Color::Magenta));
        assert!(!b.supports_color());

        b.set_foreground(before.0).unwrap();
        b.set_background(before.1).unwrap();
        assert_eq!((a.foreground(), a.background()), before);
    }

    #[test]
    fn standard_consoles_share_a_token_per_stream() {
        let out = StandardConsole::stdout(ColorChoice::Never);
        let err = StandardConsole::stderr(ColorChoice::Never);
        let same = |a: &StandardConsole, b: &StandardConsole| {
            match (a.shared_token(), b.shared_token()) {
                (Some(a), Some(b)) => std::ptr::eq(a, b),
                _ => false,
            }
        };
        assert!(same(&out, &StandardConsole::stdout(ColorChoice::Always)));
        assert!(same(&err, &StandardConsole::stderr(ColorChoice::Never)));
        assert!(!same(&out, &err));
        assert!(RecordingConsole::new().shared_token().is_none());
    }

    #[test]
    #[cfg(windows)]
    fn console_attributes_follow_the_palette() {
        use wincon::{Color as W, Intense};

        let cases = [
            (Color::Black, Intense::No, W::Black),
            (Color::DarkBlue, Intense::No, W::Blue),
            (Color::DarkYellow, Intense::No, W::Yellow),
            (Color::Gray, Intense::No, W::White),
            (Color::DarkGray, Intense::Yes, W::Black),
            (Color::Cyan, Intense::Yes, W::Cyan),
            (Color::Red, Intense::Yes, W::Red),
            (Color::White, Intense::Yes, W::White),
        ];
        for (color, intense, base) in cases {
            assert_eq!(console_color(color), (intense, base), "{color}");
        }
    }
}
