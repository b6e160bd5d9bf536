//! RAII terminal session backed by crossterm.
//!
//! [`TerminalSession`] enters raw mode and the alternate screen and hides the
//! cursor on construction, and restores all three on [`Drop`], including on
//! early error returns. A panic hook restores the terminal *before* the panic
//! message is printed so the message lands on the normal screen.

use std::io::{self, Write};
use std::panic;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event;
use crossterm::style::Print;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use super::input::{self, InputAction};
use crate::core::errors::{BituiError, Result};
use crate::layout::buffer::CellBuffer;
use crate::layout::rect::Dimensions;

/// Set while raw mode is on. The panic hook checks it to decide whether
/// restoration is needed.
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

type PanicHook = Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Owns the terminal for the life of the dashboard.
pub struct TerminalSession {
    stdout: io::Stdout,
    /// Hook that was active before the session; reinstalled on drop.
    previous_hook: Option<Arc<PanicHook>>,
}

impl TerminalSession {
    /// Enter raw mode, the alternate screen, and hide the cursor.
    ///
    /// # Errors
    /// [`BituiError::Terminal`] if setup fails. Whatever was already switched
    /// on is switched back off before returning.
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode().map_err(terminal_err)?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            restore_terminal_best_effort();
            return Err(terminal_err(e));
        }

        Ok(Self {
            stdout,
            previous_hook: Some(install_restore_hook()),
        })
    }

    /// Physical terminal size.
    pub fn size(&self) -> Result<Dimensions> {
        let (cols, rows) = terminal::size().map_err(terminal_err)?;
        Ok(Dimensions::new(rows, cols))
    }

    /// Write every row of `buffer` to the display and flush.
    pub fn draw(&mut self, buffer: &CellBuffer) -> Result<()> {
        for (y, row) in (0u16..).zip(buffer.rows()) {
            queue!(self.stdout, MoveTo(0, y), Print(row)).map_err(terminal_err)?;
        }
        self.stdout.flush().map_err(terminal_err)
    }

    /// Read one pending event without blocking; `NoOp` when none is waiting.
    pub fn poll_action(&mut self) -> Result<InputAction> {
        if !event::poll(Duration::ZERO).map_err(terminal_err)? {
            return Ok(InputAction::NoOp);
        }
        let ev = event::read().map_err(terminal_err)?;
        Ok(input::resolve_event(Some(&ev)))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal_best_effort();
        if let Some(previous) = self.previous_hook.take() {
            reinstall_hook(previous);
        }
    }
}

/// Chain a terminal-restoring hook in front of the current one. Returns the
/// hook it wraps.
fn install_restore_hook() -> Arc<PanicHook> {
    let previous: Arc<PanicHook> = Arc::new(panic::take_hook());
    let chained = Arc::clone(&previous);
    panic::set_hook(Box::new(move |info| {
        restore_terminal_best_effort();
        (**chained)(info);
    }));
    previous
}

/// Replace the session hook with `previous`.
fn reinstall_hook(previous: Arc<PanicHook>) {
    panic::set_hook(Box::new(move |info| (**previous)(info)));
}

/// Leave the alternate screen, show the cursor, and disable raw mode. Safe to
/// call more than once.
fn restore_terminal_best_effort() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, Show);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

fn terminal_err(source: io::Error) -> BituiError {
    BituiError::Terminal { source }
}

// ──────────────────── tests ────────────────────
