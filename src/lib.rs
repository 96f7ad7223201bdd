/*!
This crate writes runs of colored text to a console and puts the console's
colors back the way it found them, while keeping concurrent writers from
tripping over each other.

A write call takes a sequence of [`ColorRun`]s. Each run is a piece of text
with an optional foreground and an optional background color. Runs that leave
a color out are painted in whatever color was in effect when the call began,
and once all runs are written, exactly those colors are restored. Nothing is
inserted between runs.

# Organization

[`ColorRun`] and [`Color`] are plain values. The [`runs!`] macro builds a run
sequence out of text and `(text, fg)` / `(text, fg, bg)` tuples.

The [`Console`] trait is the device being painted: it can report and change
its colors, write text, and read a line. [`StandardConsole`] is the process's
terminal, painted with ANSI escape sequences. [`TermConsole`] does the same
over any writer and reader, and [`RecordingConsole`] keeps everything in
memory, which is handy in tests.

[`SynchronizedConsole`] wraps a console and serializes whole write calls
through a write token. How a caller waits for the token is chosen with a
[`LockPolicy`]. The free functions [`write`], [`write_line`], [`prompt`] and
[`prompt_line`] go through one process-wide `SynchronizedConsole` on stdout.

# Example

```no_run
use colorrun::{Color, runs};

# fn main() -> std::io::Result<()> {
colorrun::write_line(&runs!["Hello world"])?;
colorrun::write_line(&runs![("Hello World", Color::Red)])?;
colorrun::write_line(&runs![
    ("Hello", Color::Red),
    " ",
    ("world", Color::Blue, Color::Green),
])?;

if let Some(name) = colorrun::prompt(&runs![("Name: ", Color::Cyan)])? {
    colorrun::write_line(&runs!["Hi, ", (name, Color::Yellow), "!"])?;
}
# Ok(()) }
```
*/

#![deny(missing_docs)]

pub mod ansi;
mod console;
mod consoles;
mod sync;
mod traits;
mod types;

pub use ansi::{AnsiColor, ansi_color};
pub use console::{
    SynchronizedConsole, prompt, prompt_line, stdout, write, write_line,
};
pub use consoles::{RecordingConsole, Segment, StandardConsole, TermConsole};
pub use sync::{LockPolicy, ParseLockPolicyError, WriteToken};
pub use traits::Console;
pub use types::{
    Color, ColorChoice, ColorChoiceParseError, ColorRun, ParseColorError,
};
