use thiserror::Error;

/// First byte of every frame.
pub const MARKER_A: u8 = 42;
/// Second byte of every frame.
pub const MARKER_B: u8 = 21;
pub const FRAME_LEN: usize = 5;
pub const MAX_STEERING: u8 = 100;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame truncated: got {0} bytes, need {FRAME_LEN}")]
    Truncated(usize),
    #[error("bad marker bytes {0:#04x} {1:#04x}")]
    BadMarker(u8, u8),
}

/// One throttle/brake/steering command as sent to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandFrame {
    pub throttle: u8,
    pub brake: u8,
    pub steering: u8,
}

impl CommandFrame {
    pub fn new(throttle: u8, brake: u8, steering: u8) -> Self {
        debug_assert!(steering <= MAX_STEERING, "steering {steering} out of range");
        Self { throttle, brake, steering }
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        [MARKER_A, MARKER_B, self.throttle, self.brake, self.steering]
    }

    /// Parses a frame from the start of `bytes`. Trailing bytes are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < FRAME_LEN {
            return Err(FrameError::Truncated(bytes.len()));
        }
        if bytes[0] != MARKER_A || bytes[1] != MARKER_B {
            return Err(FrameError::BadMarker(bytes[0], bytes[1]));
        }
        Ok(Self {
            throttle: bytes[2],
            brake: bytes[3],
            steering: bytes[4],
        })
    }
}

impl From<CommandFrame> for [u8; FRAME_LEN] {
    fn from(frame: CommandFrame) -> Self {
        frame.to_bytes()
    }
}

impl TryFrom<&[u8]> for CommandFrame {
    type Error = FrameError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::parse(bytes)
    }
}

/// Encodes a command triple into its 5-byte wire form.
pub fn encode(throttle: u8, brake: u8, steering: u8) -> [u8; FRAME_LEN] {
    CommandFrame::new(throttle, brake, steering).to_bytes()
}
