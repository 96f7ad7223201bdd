use crate::{Color, WriteToken};
use std::io;
use std::sync::Arc;

/// This trait describes a console whose colors can be queried and changed.
///
/// Every method takes `&self`: a console is shared state, much like the
/// terminal it stands for. Implementations must make each individual
/// operation atomic with respect to the others, but nothing more. A sequence
/// of operations, such as setting a color and then writing text, can
/// interleave with another thread's sequence unless the caller serializes
/// them. `SynchronizedConsole` exists to do exactly that.
///
/// Colors are `Option<Color>`, where `None` stands for the console's own
/// default color. ANSI terminals cannot report their default as a concrete
/// color, so it has to be representable in its own right.
pub trait Console {
    /// Returns the current foreground color.
    fn foreground(&self) -> Option<Color>;

    /// Returns the current background color.
    fn background(&self) -> Option<Color>;

    /// Set the foreground color. Text written afterwards uses it until the
    /// foreground color is changed again.
    fn set_foreground(&self, color: Option<Color>) -> io::Result<()>;

    /// Set the background color. Text written afterwards uses it until the
    /// background color is changed again.
    fn set_background(&self, color: Option<Color>) -> io::Result<()>;

    /// Write text as-is, in the current colors.
    fn write_text(&self, text: &str) -> io::Result<()>;

    /// Write a line terminator.
    fn write_newline(&self) -> io::Result<()>;

    /// Read one line of input, blocking until it is available.
    ///
    /// The line terminator is not part of the returned string. At the end of
    /// input, this returns `None`.
    fn read_line(&self) -> io::Result<Option<String>>;

    /// Flush any output the console holds on to.
    ///
    /// This defaults to doing nothing.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Returns the write token of the resource behind this console, if it
    /// is shared beyond this one value.
    ///
    /// Every `SynchronizedConsole` over a console that returns a token waits
    /// on that token instead of its own, so separately created coordinators
    /// on the same resource still serialize against each other. This
    /// defaults to `None`.
    fn shared_token(&self) -> Option<&'static WriteToken> {
        None
    }
}

impl<T: ?Sized + Console> Console for &T {
    fn foreground(&self) -> Option<Color> {
        (**self).foreground()
    }
    fn background(&self) -> Option<Color> {
        (**self).background()
    }
    fn set_foreground(&self, color: Option<Color>) -> io::Result<()> {
        (**self).set_foreground(color)
    }
    fn set_background(&self, color: Option<Color>) -> io::Result<()> {
        (**self).set_background(color)
    }
    fn write_text(&self, text: &str) -> io::Result<()> {
        (**self).write_text(text)
    }
    fn write_newline(&self) -> io::Result<()> {
        (**self).write_newline()
    }
    fn read_line(&self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
    fn shared_token(&self) -> Option<&'static WriteToken> {
        (**self).shared_token()
    }
}

impl<T: ?Sized + Console> Console for Box<T> {
    fn foreground(&self) -> Option<Color> {
        (**self).foreground()
    }
    fn background(&self) -> Option<Color> {
        (**self).background()
    }
    fn set_foreground(&self, color: Option<Color>) -> io::Result<()> {
        (**self).set_foreground(color)
    }
    fn set_background(&self, color: Option<Color>) -> io::Result<()> {
        (**self).set_background(color)
    }
    fn write_text(&self, text: &str) -> io::Result<()> {
        (**self).write_text(text)
    }
    fn write_newline(&self) -> io::Result<()> {
        (**self).write_newline()
    }
    fn read_line(&self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
    fn shared_token(&self) -> Option<&'static WriteToken> {
        (**self).shared_token()
    }
}

impl<T: ?Sized + Console> Console for Arc<T> {
    fn foreground(&self) -> Option<Color> {
        (**self).foreground()
    }
    fn background(&self) -> Option<Color> {
        (**self).background()
    }
    fn set_foreground(&self, color: Option<Color>) -> io::Result<()> {
        (**self).set_foreground(color)
    }
    fn set_background(&self, color: Option<Color>) -> io::Result<()> {
        (**self).set_background(color)
    }
    fn write_text(&self, text: &str) -> io::Result<()> {
        (**self).write_text(text)
    }
    fn write_newline(&self) -> io::Result<()> {
        (**self).write_newline()
    }
    fn read_line(&self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
    fn shared_token(&self) -> Option<&'static WriteToken> {
        (**self).shared_token()
    }
}
