//! Raw-mode terminal setup and teardown.

use std::future::Future;
use std::io::{self, Write};

use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

/// Switch to raw mode on the alternate screen.
pub(crate) fn enter(out: &mut impl Write) -> io::Result<()> {
    enable_raw_mode()?;
    if let Err(e) = execute!(out, EnterAlternateScreen) {
        let _ = restore(out);
        return Err(e);
    }
    Ok(())
}

/// Leave the alternate screen, show the cursor and drop raw mode.
///
/// Every step is attempted even if an earlier one fails; the first error is
/// returned.
pub(crate) fn restore(out: &mut impl Write) -> io::Result<()> {
    let screen = execute!(out, LeaveAlternateScreen, Show);
    let raw = disable_raw_mode();
    screen.and(raw)
}

/// Run `body`, then restore the terminal whatever `body` returned.
///
/// An error from `body` takes precedence over one from the restore.
pub(crate) async fn restoring<T, F>(out: &mut impl Write, body: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    let result = body.await;
    let restored = restore(out);
    let value = result?;
    restored?;
    Ok(value)
}
