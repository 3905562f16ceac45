//! Output verbosity for diagnostics.
//!
//! Requested data (records, raw bytes) always goes to stdout. Everything else
//! goes to stderr, filtered by level:
//! - **Quiet** (`-q`): errors only
//! - **Default**: warnings about malformed input
//! - **Verbose** (`-v`): layout diagnostics and timings

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Default = 1,
    Verbose = 2,
}

impl Verbosity {
    /// Level selected by the `-q` / `-v` flags; quiet wins.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Verbose,
            (false, false) => Self::Default,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(Verbosity::Default as u8);

/// Sets the process-wide level. Called once from `main`.
pub fn init(level: Verbosity) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Returns the current level.
pub fn level() -> Verbosity {
    match LEVEL.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Default,
    }
}

/// Returns `true` if verbose mode is active.
pub fn is_verbose() -> bool {
    level() >= Verbosity::Verbose
}

/// Returns `true` if quiet mode is active.
pub fn is_quiet() -> bool {
    level() == Verbosity::Quiet
}

/// Prints to stderr only in verbose mode.
///
/// ```ignore
/// vprintln!("{} section headers at {:#x}", count, shoff);
/// ```
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// Prints to stderr unless quiet mode is active.
///
/// ```ignore
/// dprintln!("warning: {} is truncated", path.display());
/// ```
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use dprintln;

/// RAII timer that reports elapsed time on drop in verbose mode.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Starts timing the operation named `label`.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if is_verbose() {
            eprintln!("  {}: {:.1?}", self.label, self.start.elapsed());
        }
    }
}
