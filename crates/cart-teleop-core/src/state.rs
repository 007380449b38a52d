/// Velocity saturates at `u8::MAX`; steering at `MAX_ANGLE`.
pub const MAX_SPEED: u8 = u8::MAX;
pub const MAX_ANGLE: u8 = 100;
pub const CENTER_ANGLE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Accelerate,
    SteerLeft,
    Decelerate,
    SteerRight,
    Center,
    HardStop,
    Brake,
}

impl KeyCommand {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'w' => Self::Accelerate,
            'a' => Self::SteerLeft,
            's' => Self::Decelerate,
            'd' => Self::SteerRight,
            'y' => Self::Center,
            'x' => Self::HardStop,
            'z' => Self::Brake,
            _ => return None,
        })
    }
}

/// Per-keypress adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Increments {
    pub throttle: u8,
    pub steering: u8,
}

impl Default for Increments {
    fn default() -> Self {
        Self {
            throttle: 15,
            steering: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartState {
    velocity: u8,
    angle: u8,
}

impl Default for CartState {
    fn default() -> Self {
        Self {
            velocity: 0,
            angle: CENTER_ANGLE,
        }
    }
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn angle(&self) -> u8 {
        self.angle
    }

    /// Applies a key to the state. `Brake` only zeroes velocity here; the
    /// ramp itself is driven by the control loop before calling this.
    pub fn apply(&mut self, cmd: KeyCommand, inc: Increments) {
        match cmd {
            KeyCommand::Accelerate => self.velocity = self.velocity.saturating_add(inc.throttle),
            KeyCommand::Decelerate => self.velocity = self.velocity.saturating_sub(inc.throttle),
            KeyCommand::SteerLeft => self.angle = self.angle.saturating_sub(inc.steering),
            KeyCommand::SteerRight => self.angle = self.angle.saturating_add(inc.steering).min(MAX_ANGLE),
            KeyCommand::Center => self.angle = CENTER_ANGLE,
            KeyCommand::HardStop | KeyCommand::Brake => self.velocity = 0,
        }
    }
}
