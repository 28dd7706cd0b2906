//! Player handle shared between event callbacks
//!
//! Browser media events and UI commands all reach the same `Player`. The
//! handle applies each one under a short borrow and calls listeners only
//! after the borrow is released, so a listener may query the player again.

use std::cell::RefCell;
use std::rc::Rc;

use cadence_core::SinkEvent;
use tracing::warn;

use crate::error::Result;
use crate::player::{Command, Player};
use crate::types::PlaybackState;

type StateListener = Box<dyn FnMut(&PlaybackState)>;

/// Cloneable handle to one player
#[derive(Clone)]
pub struct SharedPlayer {
    player: Rc<RefCell<Player>>,
    listeners: Rc<RefCell<Vec<StateListener>>>,
}

impl SharedPlayer {
    pub fn new(player: Player) -> Self {
        Self {
            player: Rc::new(RefCell::new(player)),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Call `listener` with the state after every command and handled sink event
    pub fn subscribe(&self, listener: impl FnMut(&PlaybackState) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Apply a command, then notify listeners
    pub fn dispatch(&self, command: Command) -> Result<PlaybackState> {
        let state = self.player.borrow_mut().dispatch(command)?;
        self.notify(&state);
        Ok(state)
    }

    /// Forward a sink event, then notify listeners
    ///
    /// `None` when the event was ignored or the player was busy.
    pub fn handle_sink_event(&self, event: &SinkEvent) -> Option<PlaybackState> {
        let state = match self.player.try_borrow_mut() {
            Ok(mut player) => player.apply_sink_event(event),
            Err(_) => {
                warn!(track = %event.track_id(), "Player busy, dropping sink event");
                None
            }
        }?;
        self.notify(&state);
        Some(state)
    }

    /// Read from the player
    pub fn with<R>(&self, f: impl FnOnce(&Player) -> R) -> R {
        f(&*self.player.borrow())
    }

    /// Mutate the player without notifying listeners
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Player) -> R) -> R {
        f(&mut *self.player.borrow_mut())
    }

    fn notify(&self, state: &PlaybackState) {
        // A listener that dispatches again would find the list borrowed
        let Ok(mut listeners) = self.listeners.try_borrow_mut() else {
            warn!("Nested state notification skipped");
            return;
        };
        for listener in listeners.iter_mut() {
            listener(state);
        }
    }
}

impl std::fmt::Debug for SharedPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPlayer")
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}
