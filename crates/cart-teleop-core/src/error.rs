use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no serial port name contains {marker:?}")]
    PortNotFound { marker: String },
    #[error("could not open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("serial write failed: {0}")]
    Write(#[source] std::io::Error),
    #[error("keyboard input failed: {0}")]
    Input(#[source] std::io::Error),
    #[error("status display failed: {0}")]
    Display(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
