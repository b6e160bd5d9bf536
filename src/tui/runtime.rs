//! Canonical runtime entrypoint: connect, lay out, populate, then poll.
//!
//! The loop only talks to the terminal through [`TerminalIo`], so the same
//! code path runs against [`TerminalSession`] in production and a scripted
//! double in tests.

#![allow(missing_docs)]

use std::thread;
use std::time::Duration;

use super::dashboard::{Dashboard, PopulateReport};
use super::input::InputAction;
use super::signals::SignalHandler;
use super::terminal_guard::TerminalSession;
use crate::core::config::Config;
use crate::core::errors::Result;
use crate::layout::buffer::CellBuffer;
use crate::layout::rect::Dimensions;
use crate::logger::activity::{ActivityEvent, ActivityLog};
use crate::rpc::ChainSource;
use crate::rpc::bitcoin::BitcoinRpc;
use crate::rpc::client::RpcClient;

/// The display side of a session: size, input, and frame output.
///
/// Implementors own the terminal; dropping them gives it back.
pub trait TerminalIo {
    fn size(&self) -> Result<Dimensions>;
    /// One pending action, or `NoOp` when none is waiting.
    fn poll_action(&mut self) -> Result<InputAction>;
    fn draw(&mut self, buffer: &CellBuffer) -> Result<()>;
}

impl TerminalIo for TerminalSession {
    fn size(&self) -> Result<Dimensions> {
        Self::size(self)
    }

    fn poll_action(&mut self) -> Result<InputAction> {
        Self::poll_action(self)
    }

    fn draw(&mut self, buffer: &CellBuffer) -> Result<()> {
        Self::draw(self, buffer)
    }
}

/// Build the bitcoind-backed source described by `config.rpc`.
///
/// # Errors
/// Cookie read failures and HTTP client setup failures.
pub fn connect(config: &Config) -> Result<BitcoinRpc> {
    let credentials = config.rpc.auth().resolve()?;
    let client = RpcClient::new(config.rpc.url.clone(), credentials, config.rpc.timeout())?;
    Ok(BitcoinRpc::new(client))
}

/// Action for this tick: a pending shutdown signal overrides the polled input.
#[must_use]
pub fn next_action(signals: &SignalHandler, polled: InputAction) -> InputAction {
    if signals.should_shutdown() {
        InputAction::Quit
    } else {
        polled
    }
}

/// Run the dashboard until the user quits or a signal arrives.
///
/// The terminal is restored on every exit path. Returns the startup
/// population report so the caller can summarize it on the normal screen.
///
/// # Errors
/// Connection, terminal, and layout failures, plus a chain summary that
/// cannot be fetched.
pub fn run_dashboard(config: &Config) -> Result<PopulateReport> {
    let mut log = ActivityLog::from_paths(&config.paths);
    log.record(&ActivityEvent::SessionStarted {
        url: config.rpc.url.clone(),
        network: config.rpc.network.label().to_string(),
    });

    // Registered before the terminal is taken over so failures reach stderr.
    let signals = SignalHandler::new();
    let connected = connect(config)
        .and_then(|source| TerminalSession::new().map(|session| (source, session)));
    let (mut source, session) = match connected {
        Ok(connected) => connected,
        Err(err) => {
            log.record(&ActivityEvent::error(&err));
            log.flush();
            return Err(err);
        }
    };
    run_session(config, &mut source, session, &signals, log)
}

/// Lay out, populate, and drive one session on `io`.
///
/// `io` is consumed, so it is dropped before this returns on every path.
///
/// # Errors
/// Layout failures, a chain summary that cannot be fetched, and IO errors
/// from `io`.
pub fn run_session<S, T>(
    config: &Config,
    source: &mut S,
    mut io: T,
    signals: &SignalHandler,
    mut log: ActivityLog,
) -> Result<PopulateReport>
where
    S: ChainSource + ?Sized,
    T: TerminalIo,
{
    let layout = io
        .size()
        .and_then(|screen| Dashboard::new(screen, &config.dashboard));
    let mut dashboard = match layout {
        Ok(dashboard) => dashboard.with_log(log),
        Err(err) => {
            log.record(&ActivityEvent::error(&err));
            log.flush();
            return Err(err);
        }
    };
    // populate() logs its own failures.
    let report = dashboard.populate(source, config.dashboard.initial_blocks)?;
    drive(&mut dashboard, &mut io, signals, config.dashboard.tick())?;

    let blocks = dashboard.chain().len();
    let log = dashboard.log_mut();
    log.record(&ActivityEvent::SessionStopped { blocks });
    log.flush();
    Ok(report)
}

/// Draw once, then poll and apply actions until the dashboard terminates.
/// Returns the number of frames drawn.
///
/// A frame is drawn only when an action changed the view.
///
/// # Errors
/// IO errors from `io`.
pub fn drive<T: TerminalIo + ?Sized>(
    dashboard: &mut Dashboard,
    io: &mut T,
    signals: &SignalHandler,
    tick: Duration,
) -> Result<usize> {
    dashboard.render();
    io.draw(&dashboard.screen())?;
    let mut frames = 1;

    while dashboard.is_running() {
        thread::sleep(tick);
        let action = next_action(signals, io.poll_action()?);
        if dashboard.apply(action) && dashboard.is_running() {
            dashboard.render();
            io.draw(&dashboard.screen())?;
            frames += 1;
        }
    }
    Ok(frames)
}
