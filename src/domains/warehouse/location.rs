use rand::Rng;
use serde::{Deserialize, Serialize};

pub const SHELVES_PER_ROW: u8 = 10;
pub const ROWS_PER_ZONE: u8 = 20;
pub const FIRST_ZONE: char = 'A';
pub const LAST_ZONE: char = 'Z';

pub const FULL_BATTERY: f64 = 100.0;
pub const RECHARGE_THRESHOLD: f64 = 20.0;
pub const MIN_DRAIN_PER_MOVE: f64 = 0.1;
pub const MAX_DRAIN_PER_MOVE: f64 = 0.5;

/// A shelf address in the warehouse. Serialized as the `location` object of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub zone: char,
    pub row: u8,
    pub shelf: u8,
}

impl Position {
    pub fn origin() -> Self {
        Self { zone: FIRST_ZONE, row: 1, shelf: 1 }
    }

    pub fn is_within_bounds(&self) -> bool {
        (FIRST_ZONE..=LAST_ZONE).contains(&self.zone)
            && (1..=ROWS_PER_ZONE).contains(&self.row)
            && (1..=SHELVES_PER_ROW).contains(&self.shelf)
    }

    /// Odometer step: shelf is the least significant digit, zone the most.
    fn step(&mut self) {
        self.shelf += 1;
        if self.shelf <= SHELVES_PER_ROW {
            return;
        }
        self.shelf = 1;
        self.row += 1;
        if self.row <= ROWS_PER_ZONE {
            return;
        }
        self.row = 1;
        self.zone = next_zone(self.zone);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::origin()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.zone, self.row, self.shelf)
    }
}

fn next_zone(zone: char) -> char {
    if zone >= LAST_ZONE {
        FIRST_ZONE
    } else {
        (zone as u8 + 1) as char
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryLevel(f64);

impl BatteryLevel {
    pub fn new(level: f64) -> Self {
        Self(level.clamp(0.0, FULL_BATTERY))
    }

    pub fn full() -> Self {
        Self(FULL_BATTERY)
    }

    pub fn level(&self) -> f64 {
        self.0
    }

    /// Level rounded to one decimal, as reported to the backend.
    pub fn rounded(&self) -> f64 {
        (self.0 * 10.0).round() / 10.0
    }

    /// Drains by `delta`. Dropping below the threshold is an instant recharge
    /// to full, not a clamp. Returns true when the recharge happened.
    pub fn drain(&mut self, delta: f64) -> bool {
        let next = self.0 - delta;
        if next < RECHARGE_THRESHOLD {
            self.0 = FULL_BATTERY;
            true
        } else {
            self.0 = next;
            false
        }
    }
}

impl Default for BatteryLevel {
    fn default() -> Self {
        Self::full()
    }
}

/// Walks an agent through the zone/row/shelf grid and drains its battery as it moves.
#[derive(Debug, Clone)]
pub struct LocationCursor {
    position: Position,
    battery: BatteryLevel,
}

impl LocationCursor {
    pub fn new() -> Self {
        Self { position: Position::origin(), battery: BatteryLevel::full() }
    }

    /// Resumes from a saved position. Returns `None` when the position lies
    /// outside the warehouse grid.
    pub fn with_state(position: Position, battery: BatteryLevel) -> Option<Self> {
        position
            .is_within_bounds()
            .then_some(Self { position, battery })
    }

    pub fn current(&self) -> Position {
        self.position
    }

    pub fn battery(&self) -> BatteryLevel {
        self.battery
    }

    /// Moves one shelf forward and pays for it in battery.
    /// Returns true if the move triggered a recharge.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> bool {
        self.position.step();
        let delta = rng.gen_range(MIN_DRAIN_PER_MOVE..=MAX_DRAIN_PER_MOVE);
        self.battery.drain(delta)
    }

    /// Descriptive preview only. Uses row + 1 with no overflow handling, so it
    /// can name a row that does not exist (e.g. `A-21-10`).
    pub fn next_checkpoint_label(&self) -> String {
        format!(
            "{}-{}-{}",
            self.position.zone,
            u16::from(self.position.row) + 1,
            self.position.shelf
        )
    }
}

impl Default for LocationCursor {
    fn default() -> Self {
        Self::new()
    }
}
