use std::fmt;
use std::hint;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// How a `SynchronizedConsole` waits for its write token.
///
/// All locking policies give the same guarantee: whole calls are serialized,
/// in whatever order the waiters happen to win the token. There is no
/// fairness, no timeout and no re-entrancy.
///
/// The `FromStr` implementation accepts `spin`, `yield`, and `none` (or its
/// long form `unsynchronized`), case insensitively.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LockPolicy {
    /// Retry the token in a tight loop without ever giving up the processor.
    ///
    /// This has the lowest latency when the token is rarely contended, but
    /// burns a core per waiter for as long as the holder keeps it. Keep in
    /// mind that a prompt holds the token while it waits for the user.
    Spin,
    /// Retry the token with an adaptive backoff: spin briefly, then yield the
    /// processor between attempts.
    #[default]
    Yield,
    /// Don't take any token at all.
    ///
    /// This is only correct when a single thread uses the console. Concurrent
    /// callers may interleave their text and may observe (and then "restore")
    /// colors set by one another.
    Unsynchronized,
}

impl FromStr for LockPolicy {
    type Err = ParseLockPolicyError;

    fn from_str(s: &str) -> Result<LockPolicy, ParseLockPolicyError> {
        match s.to_lowercase().as_str() {
            "spin" => Ok(LockPolicy::Spin),
            "yield" => Ok(LockPolicy::Yield),
            "none" | "unsynchronized" => Ok(LockPolicy::Unsynchronized),
            unknown => Err(ParseLockPolicyError {
                unknown_policy: unknown.to_string(),
            }),
        }
    }
}

impl fmt::Display for LockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            LockPolicy::Spin => "spin",
            LockPolicy::Yield => "yield",
            LockPolicy::Unsynchronized => "none",
        })
    }
}

/// An error that occurs when parsing a `LockPolicy` fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseLockPolicyError {
    unknown_policy: String,
}

impl ParseLockPolicyError {
    /// Return the string that couldn't be parsed as a valid lock policy.
    pub fn invalid_policy(&self) -> &str {
        &self.unknown_policy
    }
}

impl std::error::Error for ParseLockPolicyError {}

impl fmt::Display for ParseLockPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized lock policy '{}': valid policies are: \
             spin, yield, none",
            self.unknown_policy,
        )
    }
}

/// Retries beyond this many doublings yield instead of spinning.
const SPIN_LIMIT: u32 = 6;

/// A binary flag granting its holder exclusive use of a console.
///
/// A `SynchronizedConsole` normally owns its token. Consoles that paint a
/// resource shared by the whole process, such as a standard stream, hand out
/// a token in a `static` through `Console::shared_token` instead, so that
/// every `SynchronizedConsole` over that resource waits on the same one.
#[derive(Debug, Default)]
pub struct WriteToken {
    held: AtomicBool,
}

impl WriteToken {
    /// Create a token that nobody holds.
    pub const fn new() -> WriteToken {
        WriteToken { held: AtomicBool::new(false) }
    }

    /// Wait for the token according to `policy`.
    ///
    /// The token is released when the returned guard is dropped. Acquiring
    /// it again on the same thread before that happens never returns.
    pub(crate) fn acquire(&self, policy: LockPolicy) -> TokenGuard<'_> {
        let failed = match policy {
            LockPolicy::Unsynchronized => {
                return TokenGuard { token: None };
            }
            LockPolicy::Spin => self.wait(|_| hint::spin_loop()),
            LockPolicy::Yield => self.wait(backoff),
        };
        if failed > 0 {
            log::trace!("write token acquired after {failed} failed attempts");
        }
        TokenGuard { token: Some(self) }
    }

    /// Returns true if some caller currently holds the token.
    pub(crate) fn is_held(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }

    /// Loop until the token moves from free to held, calling `pause` with
    /// the attempt number after every failure. Returns the number of failed
    /// attempts.
    fn wait<F: FnMut(u32)>(&self, mut pause: F) -> u32 {
        let mut failed = 0u32;
        loop {
            if self
                .held
                .compare_exchange_weak(
                    false,
                    true,
                    Ordering::Acquire,
                    Ordering::Relaxed,
                )
                .is_ok()
            {
                return failed;
            }
            // Only retry the exchange once the token looks free again, so
            // waiters don't keep stealing the cache line from the holder.
            while self.held.load(Ordering::Relaxed) {
                pause(failed);
                failed = failed.saturating_add(1);
            }
        }
    }

    fn release(&self) {
        self.held.store(false, Ordering::Release);
    }
}

fn backoff(attempt: u32) {
    if attempt < SPIN_LIMIT {
        for _ in 0..(1u32 << attempt) {
            hint::spin_loop();
        }
    } else {
        thread::yield_now();
    }
}

/// Proof of holding a `WriteToken`. Dropping it releases the token.
#[derive(Debug)]
pub(crate) struct TokenGuard<'a> {
    token: Option<&'a WriteToken>,
}

impl Drop for TokenGuard<'_> {
    fn drop(&mut self) {
        if let Some(token) = self.token {
            token.release();
        }
    }
}
