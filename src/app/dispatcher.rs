//! Button input: notification context → queue → command worker.
//!
//! ```text
//!   joystick thread ──▶ handler ──(mpsc)──▶ CommandWorker ──▶ controllers
//! ```
//!
//! Handlers only classify the event and enqueue an [`InputCommand`]; they
//! never touch a controller lock, so a slow fan stop cannot stall the
//! device reader.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{error, info, warn};

use super::commands::InputCommand;
use super::ports::{Button, InputPort};
use crate::control::aux_relay::AuxRelayController;
use crate::control::fan::FanController;

pub struct InputDispatcher {
    tx: Sender<InputCommand>,
}

impl InputDispatcher {
    /// Create the dispatcher and the receiving end for the worker.
    pub fn channel() -> (Self, Receiver<InputCommand>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Subscribe both buttons on `input`.
    pub fn register(&self, input: &mut impl InputPort) {
        for button in [Button::Up, Button::Down] {
            let tx = self.tx.clone();
            input.subscribe(
                button,
                Box::new(move |event| {
                    if let Some(cmd) = InputCommand::from_event(event) {
                        if tx.send(cmd).is_err() {
                            warn!("input: worker gone, dropping {:?}", cmd);
                        }
                    }
                }),
            );
        }
    }
}

/// Applies queued [`InputCommand`]s to the controllers.
pub struct CommandWorker {
    fan: Arc<FanController>,
    aux: Arc<AuxRelayController>,
}

impl CommandWorker {
    pub fn new(fan: Arc<FanController>, aux: Arc<AuxRelayController>) -> Self {
        Self { fan, aux }
    }

    /// Apply one command. A relay failure is logged and the controller
    /// keeps its previous state; the worker carries on with the next command.
    pub fn apply(&self, cmd: InputCommand) {
        let result = match cmd {
            InputCommand::ToggleFan => self.fan.toggle().map(|_| ()),
            InputCommand::ToggleAuxRelay => self.aux.toggle().map(|_| ()),
        };
        if let Err(e) = result {
            error!("input: {:?} failed: {}", cmd, e);
        }
    }

    /// Drain `rx` until every sender is dropped.
    pub fn run(&self, rx: Receiver<InputCommand>) {
        for cmd in rx {
            self.apply(cmd);
        }
        info!("input: command queue closed");
    }

    pub fn spawn(self, rx: Receiver<InputCommand>) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("input-worker".into())
            .spawn(move || self.run(rx))
    }
}
