//! The pursuer's brain: it waits until something sets it off, then walks a
//! straight line at the player and slides along one axis when a wall is in
//! the way. No path search.

use rand::Rng;
use tracing::debug;

use crate::grid::{CellKind, Grid};
use crate::motion::{try_move, Agent, Position};

pub const DEFAULT_TRIGGER_CHANCE: f64 = 0.005;
pub const DEFAULT_CAPTURE_RADIUS: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PursuitState {
    Idle,
    Chasing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChaseReason {
    /// The player stepped into the exit corridor.
    Corridor,
    /// Random per-tick trigger.
    Chance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PursuitOutcome {
    Waiting,
    Triggered,
    Moved,
    SideStepped,
    Stalled,
    Captured,
}

#[derive(Clone, Debug)]
pub struct Pursuit {
    state: PursuitState,
    trigger_chance: f64,
    capture_radius: f32,
}

impl Default for Pursuit {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_CHANCE, DEFAULT_CAPTURE_RADIUS)
    }
}

impl Pursuit {
    pub fn new(trigger_chance: f64, capture_radius: f32) -> Self {
        Self {
            state: PursuitState::Idle,
            trigger_chance: if trigger_chance.is_nan() {
                0.0
            } else {
                trigger_chance.clamp(0.0, 1.0)
            },
            capture_radius,
        }
    }

    pub fn state(&self) -> PursuitState {
        self.state
    }

    pub fn is_chasing(&self) -> bool {
        self.state == PursuitState::Chasing
    }

    /// One-way latch into `Chasing`. Returns true only on the transition.
    pub fn latch(&mut self, reason: ChaseReason) -> bool {
        if self.state == PursuitState::Chasing {
            return false;
        }
        self.state = PursuitState::Chasing;
        debug!(?reason, "pursuer starts chasing");
        true
    }

    pub fn is_capture(&self, pursuer: Position, player: Position) -> bool {
        pursuer.distance(player) < self.capture_radius
    }

    /// Advances the pursuer by one update tick.
    pub fn step(
        &mut self,
        pursuer: &mut Agent,
        player: Position,
        grid: &Grid,
        rng: &mut impl Rng,
    ) -> PursuitOutcome {
        if self.state == PursuitState::Idle {
            if grid.classify(player.x, player.z) == CellKind::Corridor {
                self.latch(ChaseReason::Corridor);
            } else if rng.gen_bool(self.trigger_chance) {
                self.latch(ChaseReason::Chance);
                return PursuitOutcome::Triggered;
            } else {
                return PursuitOutcome::Waiting;
            }
        }

        let from = pursuer.position();
        if self.is_capture(from, player) {
            return PursuitOutcome::Captured;
        }

        let dx = player.x - from.x;
        let dz = player.z - from.z;
        let speed = pursuer.speed();
        let angle = dz.atan2(dx);
        let outcome = if try_move(pursuer, angle.cos() * speed, angle.sin() * speed, grid).is_some()
        {
            PursuitOutcome::Moved
        } else {
            let (sx, sz) = if rng.gen_bool(0.5) {
                (if dx > 0.0 { speed } else { -speed }, 0.0)
            } else {
                (0.0, if dz > 0.0 { speed } else { -speed })
            };
            if try_move(pursuer, sx, sz, grid).is_some() {
                PursuitOutcome::SideStepped
            } else {
                PursuitOutcome::Stalled
            }
        };

        if self.is_capture(pursuer.position(), player) {
            PursuitOutcome::Captured
        } else {
            outcome
        }
    }
}
