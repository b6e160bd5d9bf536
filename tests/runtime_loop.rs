//! Session loop driven by scripted input instead of a terminal.

mod common;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use bitui::core::config::{Config, DashboardConfig};
use bitui::core::errors::Result;
use bitui::layout::buffer::CellBuffer;
use bitui::layout::rect::Dimensions;
use bitui::logger::activity::ActivityLog;
use bitui::tui::dashboard::Dashboard;
use bitui::tui::input::InputAction;
use bitui::tui::runtime::{TerminalIo, drive, run_session};
use bitui::tui::signals::SignalHandler;
use common::ScriptedChain;

/// Plays back `script`, then either quits or trips `signals` once it runs dry.
struct ScriptedTerminal {
    size: Dimensions,
    script: VecDeque<InputAction>,
    signal_when_done: Option<SignalHandler>,
    frames: Rc<RefCell<Vec<Vec<String>>>>,
    released: Rc<Cell<bool>>,
}

impl ScriptedTerminal {
    fn new(size: Dimensions, script: &[InputAction]) -> Self {
        Self {
            size,
            script: script.iter().copied().collect(),
            signal_when_done: None,
            frames: Rc::new(RefCell::new(Vec::new())),
            released: Rc::new(Cell::new(false)),
        }
    }
}

impl TerminalIo for ScriptedTerminal {
    fn size(&self) -> Result<Dimensions> {
        Ok(self.size)
    }

    fn poll_action(&mut self) -> Result<InputAction> {
        if let Some(action) = self.script.pop_front() {
            return Ok(action);
        }
        match &self.signal_when_done {
            Some(signals) => {
                signals.request_shutdown();
                Ok(InputAction::NoOp)
            }
            None => Ok(InputAction::Quit),
        }
    }

    fn draw(&mut self, buffer: &CellBuffer) -> Result<()> {
        self.frames.borrow_mut().push(buffer.rows().collect());
        Ok(())
    }
}

impl Drop for ScriptedTerminal {
    fn drop(&mut self) {
        self.released.set(true);
    }
}

fn fast_config() -> Config {
    let mut config = Config::default();
    config.dashboard.tick_ms = 1;
    config.dashboard.initial_blocks = 3;
    config
}

#[test]
fn quit_ends_loop_and_only_view_changes_redraw() {
    let mut dash = Dashboard::new(Dimensions::new(40, 100), &DashboardConfig::default()).unwrap();
    let mut term = ScriptedTerminal::new(
        Dimensions::new(40, 100),
        &[
            InputAction::NoOp,
            InputAction::Resize {
                height: 50,
                width: 120,
            },
            InputAction::ScrollRight,
            InputAction::NoOp,
            InputAction::Quit,
            InputAction::ScrollRight,
        ],
    );
    let signals = SignalHandler::unregistered();

    let frames = drive(&mut dash, &mut term, &signals, Duration::ZERO).unwrap();
    // Startup frame plus the one scroll; nothing for NoOp, Resize, or Quit.
    assert_eq!(frames, 2);
    assert_eq!(term.frames.borrow().len(), 2);
    assert!(!dash.is_running());
    // The action after Quit was never polled.
    assert_eq!(term.script.len(), 1);
}

#[test]
fn shutdown_signal_ends_loop() {
    let mut dash = Dashboard::new(Dimensions::new(40, 100), &DashboardConfig::default()).unwrap();
    let signals = SignalHandler::unregistered();
    let mut term = ScriptedTerminal::new(Dimensions::new(40, 100), &[InputAction::ScrollLeft]);
    term.signal_when_done = Some(signals.clone());

    let frames = drive(&mut dash, &mut term, &signals, Duration::ZERO).unwrap();
    assert_eq!(frames, 2);
    assert!(!dash.is_running());
    assert!(signals.should_shutdown());
}

#[test]
fn session_draws_populated_blocks_and_releases_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("session.jsonl");
    let term = ScriptedTerminal::new(Dimensions::new(24, 80), &[]);
    let frames = Rc::clone(&term.frames);
    let released = Rc::clone(&term.released);

    let report = run_session(
        &fast_config(),
        &mut ScriptedChain::new(12),
        term,
        &SignalHandler::unregistered(),
        ActivityLog::open(&log_path),
    )
    .unwrap();

    assert_eq!(report.placed, vec![10, 11, 12]);
    assert!(released.get());
    let frames = frames.borrow();
    assert_eq!(frames.len(), 1);
    assert!(frames[0].iter().any(|row| row.contains("height: 10")));

    let raw = std::fs::read_to_string(&log_path).unwrap();
    assert!(raw.lines().last().unwrap().contains("session_stop"));
}

#[test]
fn layout_failure_releases_terminal_and_logs() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("session.jsonl");
    let term = ScriptedTerminal::new(Dimensions::new(9, 80), &[]);
    let frames = Rc::clone(&term.frames);
    let released = Rc::clone(&term.released);
    let mut source = ScriptedChain::new(12);

    let err = run_session(
        &fast_config(),
        &mut source,
        term,
        &SignalHandler::unregistered(),
        ActivityLog::open(&log_path),
    )
    .unwrap_err();

    assert_eq!(err.code(), "BUI-1001");
    assert!(released.get());
    assert!(frames.borrow().is_empty());
    assert!(source.requested.is_empty());
    let raw = std::fs::read_to_string(&log_path).unwrap();
    assert!(raw.contains("BUI-1001"));
}
