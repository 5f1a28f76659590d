use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use analyzer_client::{ApiSettings, ClientBuildError, ClientHandle, TokenProvider};
use analyzer_core::{update, Msg, WorkflowState, WorkflowView};
use client_logging::client_debug;

use crate::effects::EffectRunner;

const PROGRESS_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Owns the workflow state and drives it with messages.
///
/// All mutation happens on the caller's thread inside `apply`; background
/// threads (the network event loop, the progress ticker, debounce timers)
/// only ever post messages onto the channel drained by `pump`.
pub struct Session {
    state: WorkflowState,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
    effects: EffectRunner,
}

impl Session {
    pub fn new(
        settings: ApiSettings,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, ClientBuildError> {
        let handle = ClientHandle::new(settings, token_provider)?;
        Ok(Self::with_handle(handle))
    }

    /// Construct over an existing handle; used by tests to substitute a
    /// fake transport.
    pub fn with_handle(handle: ClientHandle) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let effects = EffectRunner::new(handle, msg_tx.clone());

        spawn_progress_ticker(msg_tx.clone());

        let mut session = Self {
            state: WorkflowState::default(),
            msg_tx,
            msg_rx,
            effects,
        };
        session.apply(Msg::SessionStarted);
        session
    }

    /// Apply one message synchronously and run any resulting effects.
    pub fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if !effects.is_empty() {
            client_debug!("running {} effect(s)", effects.len());
        }
        self.effects.run(effects);
    }

    /// Post a message for the next `pump` to pick up. Useful when the caller
    /// holds only a sender clone.
    pub fn dispatch(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Drain messages posted by background work since the last call.
    pub fn pump(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.apply(msg);
        }
    }

    pub fn view(&self) -> WorkflowView {
        self.state.view()
    }

    /// True when the state changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn sender(&self) -> mpsc::Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn sign_out(&mut self) {
        self.apply(Msg::SessionEnded);
    }
}

/// The ticker runs for the session's lifetime; the core ignores ticks when
/// no upload is in flight. It exits once the session's receiver is gone.
fn spawn_progress_ticker(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while msg_tx.send(Msg::ProgressTick).is_ok() {
            thread::sleep(PROGRESS_TICK_INTERVAL);
        }
    });
}
