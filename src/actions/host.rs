//! Host ports.
//!
//! Messages, hit points, battles, saving and sound belong to the host
//! application. The engine calls into an [`EventHost`]; every method has a
//! default that only logs, so hosts override what they actually wire up.

use tracing::info;

use crate::core::{ExecutionResult, Position};
use crate::error::HostError;

/// Downstream systems an action chain talks to.
///
/// Returning `Failed` or `Cancelled` halts the chain and is recorded in
/// history. Returning `Err` aborts the event without recording it.
pub trait EventHost: Send {
    /// Display a message.
    fn show_message(&mut self, text: &str, speaker: Option<&str>) -> Result<ExecutionResult, HostError> {
        info!(text, speaker, "message");
        Ok(ExecutionResult::Success)
    }

    /// Restore player health.
    fn heal(&mut self, amount: i64) -> Result<ExecutionResult, HostError> {
        info!(amount, "heal");
        Ok(ExecutionResult::Success)
    }

    /// Hurt the player.
    fn damage(&mut self, amount: i64) -> Result<ExecutionResult, HostError> {
        info!(amount, "damage");
        Ok(ExecutionResult::Success)
    }

    /// The player was moved. The engine has already updated the state.
    fn on_warp(&mut self, position: &Position) -> Result<ExecutionResult, HostError> {
        info!(x = position.x, y = position.y, floor = position.floor, "warp");
        Ok(ExecutionResult::Success)
    }

    /// Run an encounter to completion.
    fn start_battle(&mut self, encounter: &str) -> Result<ExecutionResult, HostError> {
        info!(encounter, "battle");
        Ok(ExecutionResult::Success)
    }

    /// Persist a serialized game state snapshot.
    fn save_game(&mut self, slot: Option<&str>, snapshot: &[u8]) -> Result<ExecutionResult, HostError> {
        info!(slot, bytes = snapshot.len(), "save");
        Ok(ExecutionResult::Success)
    }

    /// Play a sound effect.
    fn play_sound(&mut self, sound: &str, volume: Option<f32>) -> Result<ExecutionResult, HostError> {
        info!(sound, volume, "sound");
        Ok(ExecutionResult::Success)
    }
}

/// Host that logs every request and reports success.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingHost;

impl EventHost for LoggingHost {}
