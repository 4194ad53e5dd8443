//! Cooldown and energy economy.
//!
//! Each color owns an [`EnergyPool`] that refills at a rate set by the
//! total elapsed game time. Cooldowns decay on the same tick. A move is
//! affordable when the piece is ready and its color can pay the cost at
//! the instant the move is attempted.

use crate::error::MoveError;
use crate::registry;
use crate::types::{Millis, Piece, Square};
use serde::{Deserialize, Serialize};

/// Tunable economy parameters. The defaults are the reference values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub tick_interval_ms: Millis,
    /// Regeneration per second at the start of the game.
    pub starting_rate: f64,
    /// Added to the rate every `rate_step_interval_ms`.
    pub rate_step: f64,
    pub rate_step_interval_ms: Millis,
    pub max_rate: f64,
    pub starting_energy: f64,
    pub max_energy: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            starting_rate: 0.5,
            rate_step: 0.5,
            rate_step_interval_ms: 15_000,
            max_rate: 10.0,
            starting_energy: 6.0,
            max_energy: 25.0,
        }
    }
}

impl EconomyConfig {
    /// Energy per second after `elapsed_ms` of game time.
    pub fn rate(&self, elapsed_ms: Millis) -> f64 {
        let steps = elapsed_ms / self.rate_step_interval_ms.max(1);
        (self.starting_rate + steps as f64 * self.rate_step).min(self.max_rate)
    }

    pub fn new_pool(&self) -> EnergyPool {
        EnergyPool::new(self.starting_energy, self.max_energy)
    }
}

/// One color's energy. `current` always stays within `0..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyPool {
    current: f64,
    max: f64,
}

impl EnergyPool {
    pub fn new(current: f64, max: f64) -> Self {
        let max = max.max(0.0);
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Adds energy, capped at the maximum.
    pub fn gain(&mut self, amount: f64) {
        if amount > 0.0 {
            self.current = (self.current + amount).min(self.max);
        }
    }

    pub fn can_pay(&self, cost: u32) -> bool {
        self.current >= f64::from(cost)
    }

    /// Removes `cost` if the pool holds at least that much.
    pub fn spend(&mut self, cost: u32) -> Result<(), MoveError> {
        if !self.can_pay(cost) {
            return Err(MoveError::InsufficientEnergy {
                required: cost,
                available: self.current,
            });
        }
        self.current = (self.current - f64::from(cost)).max(0.0);
        Ok(())
    }
}

/// Checks that `piece` on `square` could move right now with `pool`.
pub fn check_affordable(piece: &Piece, square: Square, pool: &EnergyPool) -> Result<(), MoveError> {
    if !piece.is_ready() {
        return Err(MoveError::NotReady {
            piece: piece.piece_type,
            square,
            remaining_ms: piece.cooldown_remaining,
        });
    }
    let cost = registry::lookup(piece.piece_type).energy_cost;
    if !pool.can_pay(cost) {
        return Err(MoveError::InsufficientEnergy {
            required: cost,
            available: pool.current(),
        });
    }
    Ok(())
}
