//! Wire format for cart command frames.

pub mod frame;
pub mod stream;

pub use frame::{encode, CommandFrame, FrameError, FRAME_LEN, MARKER_A, MARKER_B, MAX_STEERING};
pub use stream::FrameDecoder;
