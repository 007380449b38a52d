//! Core functionalities: port resolution, serial transport, cart state, control loop.

pub mod braking;
pub mod config;
pub mod control;
pub mod error;
pub mod framelog;
pub mod port;
pub mod serial;
pub mod state;

pub use braking::BrakeRamp;
pub use config::TeleopConfig;
pub use control::{KeyInput, KeySource, Pacer, StatusSink, Teleop, Tick, TickPacer};
pub use error::{Error, Result};
pub use framelog::FrameLog;
pub use port::{FixedPath, Platform, PortInfo, PortResolver, PortStrategy, ScanForSubstring};
pub use serial::{FrameWriter, SerialConfig, SerialTransport, Transport};
pub use state::{CartState, Increments, KeyCommand};

pub use cart_teleop_protocol::CommandFrame;
