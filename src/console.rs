use crate::sync::WriteToken;
use crate::{Color, ColorChoice, ColorRun, Console, LockPolicy, StandardConsole};
use std::io;
use std::sync::OnceLock;

/// Build an array of [`ColorRun`](crate::ColorRun)s from a mix of text and
/// tuples, converting each argument with `ColorRun::from`.
///
/// ```
/// use colorrun::{Color, runs};
///
/// let line = runs![("Hello", Color::Red), " ", ("world", Color::Blue, Color::Green)];
/// assert_eq!(line.len(), 3);
/// assert_eq!(line[1].text(), " ");
/// ```
#[macro_export]
macro_rules! runs {
    ($($run:expr),* $(,)?) => {
        [$($crate::ColorRun::from($run)),*]
    };
}

/// Serializes colored writes to a shared console.
///
/// Each operation takes a sequence of runs and, while holding the write
/// token:
///
/// 1. remembers the console's current colors,
/// 2. paints every run in order, using a run's own colors where it has them
///    and the remembered colors where it doesn't,
/// 3. restores the remembered colors,
/// 4. writes a newline (the `_line` variants) and flushes,
/// 5. reads a line of input (the `prompt` variants).
///
/// Since the colors are restored to what they were when the call began, a
/// caller never observes a color left behind by someone else's call. This
/// holds for empty run sequences too. Under the locking policies no two
/// calls ever interleave their text or colors.
///
/// The guarantee covers every call that waits on the same token. Usually
/// that is the token owned by this `SynchronizedConsole`, but a console that
/// paints a resource shared by the whole process offers its own through
/// [`Console::shared_token`]. `StandardConsole` does, so separately created
/// coordinators on stdout (or stderr) still serialize with each other and
/// with [`stdout()`](crate::stdout).
///
/// # Re-entrancy
///
/// Calls are not re-entrant. Calling an operation of a `SynchronizedConsole`
/// while another operation of the same `SynchronizedConsole` is in progress
/// on the same thread (for example, from inside a `Console` implementation)
/// never returns under `LockPolicy::Spin` or `LockPolicy::Yield`.
///
/// # Errors
///
/// Errors of the underlying console are returned as-is. When painting fails
/// part way through, the colors are still restored before the error is
/// returned, as far as the console lets us.
#[derive(Debug)]
pub struct SynchronizedConsole<C> {
    console: C,
    policy: LockPolicy,
    token: WriteToken,
}

impl SynchronizedConsole<StandardConsole> {
    /// Create a new `SynchronizedConsole` over standard output, with the
    /// given color preferences and the default lock policy.
    pub fn stdout(choice: ColorChoice) -> SynchronizedConsole<StandardConsole> {
        SynchronizedConsole::new(
            StandardConsole::stdout(choice),
            LockPolicy::default(),
        )
    }

    /// Create a new `SynchronizedConsole` over standard error, with the
    /// given color preferences and the default lock policy.
    pub fn stderr(choice: ColorChoice) -> SynchronizedConsole<StandardConsole> {
        SynchronizedConsole::new(
            StandardConsole::stderr(choice),
            LockPolicy::default(),
        )
    }
}

impl<C: Console> SynchronizedConsole<C> {
    /// Create a new `SynchronizedConsole` that waits for its token according
    /// to `policy`.
    pub fn new(console: C, policy: LockPolicy) -> SynchronizedConsole<C> {
        SynchronizedConsole { console, policy, token: WriteToken::new() }
    }

    /// Returns the lock policy of this console.
    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    /// Returns true if some call currently holds the write token.
    ///
    /// This is only a snapshot; by the time it returns, it may be stale.
    pub fn is_locked(&self) -> bool {
        self.token().is_held()
    }

    /// Return a reference to the underlying console.
    ///
    /// Using it directly bypasses the write token.
    pub fn get_ref(&self) -> &C {
        &self.console
    }

    /// Consume this `SynchronizedConsole` and return the underlying console.
    pub fn into_inner(self) -> C {
        self.console
    }

    /// Write the runs.
    pub fn write(&self, runs: &[ColorRun<'_>]) -> io::Result<()> {
        self.run(runs, false, false).map(|_| ())
    }

    /// Write the runs, followed by a newline.
    pub fn write_line(&self, runs: &[ColorRun<'_>]) -> io::Result<()> {
        self.run(runs, true, false).map(|_| ())
    }

    /// Write the runs, then read a line of input.
    ///
    /// The line is returned without its terminator, or `None` at the end of
    /// input. The write token is held while waiting for input, so other
    /// writers wait too.
    pub fn prompt(&self, runs: &[ColorRun<'_>]) -> io::Result<Option<String>> {
        self.run(runs, false, true)
    }

    /// Write the runs followed by a newline, then read a line of input.
    ///
    /// See [`prompt`](SynchronizedConsole::prompt) for details.
    pub fn prompt_line(
        &self,
        runs: &[ColorRun<'_>],
    ) -> io::Result<Option<String>> {
        self.run(runs, true, true)
    }

    fn run(
        &self,
        runs: &[ColorRun<'_>],
        newline: bool,
        read: bool,
    ) -> io::Result<Option<String>> {
        let _guard = self.token().acquire(self.policy);
        let fg = self.console.foreground();
        let bg = self.console.background();
        let painted = self.paint(runs, fg, bg);
        let restored = self.restore(fg, bg);
        if let Err(err) = painted {
            if let Err(restore_err) = restored {
                log::debug!(
                    "could not restore console colors after a failed \
                     write: {restore_err}"
                );
            }
            return Err(err);
        }
        restored?;
        if newline {
            self.console.write_newline()?;
        }
        self.console.flush()?;
        if read { self.console.read_line() } else { Ok(None) }
    }

    fn token(&self) -> &WriteToken {
        self.console.shared_token().unwrap_or(&self.token)
    }

    fn paint(
        &self,
        runs: &[ColorRun<'_>],
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> io::Result<()> {
        for run in runs {
            self.console.set_foreground(run.fg().or(fg))?;
            self.console.set_background(run.bg().or(bg))?;
            self.console.write_text(run.text())?;
        }
        Ok(())
    }

    fn restore(&self, fg: Option<Color>, bg: Option<Color>) -> io::Result<()> {
        let fg_result = self.console.set_foreground(fg);
        let bg_result = self.console.set_background(bg);
        fg_result.and(bg_result)
    }
}

/// The process-wide console behind the free functions of this crate.
///
/// It writes to stdout with `ColorChoice::Auto` and the default lock policy.
/// Every caller in the process shares its write token.
pub fn stdout() -> &'static SynchronizedConsole<StandardConsole> {
    static STDOUT: OnceLock<SynchronizedConsole<StandardConsole>> =
        OnceLock::new();
    STDOUT.get_or_init(|| SynchronizedConsole::stdout(ColorChoice::Auto))
}

/// Write the runs to the process-wide console.
///
/// ```no_run
/// use colorrun::{Color, runs};
///
/// # fn main() -> std::io::Result<()> {
/// colorrun::write(&runs!["Hello ", ("world", Color::Green)])?;
/// # Ok(()) }
/// ```
pub fn write(runs: &[ColorRun<'_>]) -> io::Result<()> {
    stdout().write(runs)
}

/// Write the runs and a newline to the process-wide console.
pub fn write_line(runs: &[ColorRun<'_>]) -> io::Result<()> {
    stdout().write_line(runs)
}

/// Write the runs to the process-wide console, then read a line from stdin.
pub fn prompt(runs: &[ColorRun<'_>]) -> io::Result<Option<String>> {
    stdout().prompt(runs)
}

/// Write the runs and a newline to the process-wide console, then read a
/// line from stdin.
pub fn prompt_line(runs: &[ColorRun<'_>]) -> io::Result<Option<String>> {
    stdout().prompt_line(runs)
}
