use crate::error::{Error, Result};
use cart_teleop_protocol::{CommandFrame, FRAME_LEN};
use serialport::SerialPort;
use std::io::{ErrorKind, Write};
use std::time::Duration;

/// Baud rate the cart firmware listens at.
pub const CART_BAUD_RATE: u32 = 57_600;

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
    pub write_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: CART_BAUD_RATE,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
            write_timeout: Duration::ZERO,
        }
    }
}

/// Outbound half of the link to the cart.
pub trait Transport {
    fn send(&mut self, frame: &CommandFrame) -> Result<()>;
}

/// Send-and-forget frame writer over any byte sink.
///
/// A write that would block is dropped, not queued. A short write is not
/// completed later either; the receiver resynchronizes on the next markers.
pub struct FrameWriter<W> {
    inner: W,
    dropped: u64,
}

pub type SerialTransport = FrameWriter<Box<dyn SerialPort>>;

impl SerialTransport {
    pub fn open(port_name: &str, cfg: &SerialConfig) -> Result<Self> {
        let port = serialport::new(port_name, cfg.baud_rate)
            .data_bits(cfg.data_bits)
            .parity(cfg.parity)
            .stop_bits(cfg.stop_bits)
            .flow_control(cfg.flow_control)
            .timeout(cfg.write_timeout)
            .open()
            .map_err(|source| Error::Open {
                port: port_name.to_string(),
                source,
            })?;
        log::info!("opened {port_name} at {} baud", cfg.baud_rate);
        Ok(FrameWriter::new(port))
    }
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, dropped: 0 }
    }

    /// Frames that could not be written in full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Transport for FrameWriter<W> {
    fn send(&mut self, frame: &CommandFrame) -> Result<()> {
        let bytes = frame.to_bytes();
        match self.inner.write(&bytes) {
            Ok(n) if n == FRAME_LEN => {
                log::trace!("tx {bytes:?}");
                Ok(())
            }
            Ok(n) => {
                self.dropped += 1;
                log::debug!("short write: {n} of {FRAME_LEN} bytes");
                Ok(())
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                self.dropped += 1;
                log::debug!("frame dropped: {e}");
                Ok(())
            }
            Err(e) => Err(Error::Write(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Stalled(ErrorKind);

    impl Write for Stalled {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(self.0.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_whole_frame() {
        let mut tx = FrameWriter::new(Vec::new());
        tx.send(&CommandFrame::new(45, 0, 50)).unwrap();
        assert_eq!(tx.get_ref(), &vec![42, 21, 45, 0, 50]);
        assert_eq!(tx.dropped(), 0);
    }

    #[test]
    fn blocked_write_is_dropped_not_retried() {
        let mut tx = FrameWriter::new(Stalled(ErrorKind::TimedOut));
        tx.send(&CommandFrame::new(0, 0, 50)).unwrap();
        tx.send(&CommandFrame::new(0, 0, 50)).unwrap();
        assert_eq!(tx.dropped(), 2);
    }

    #[test]
    fn broken_link_is_fatal() {
        let mut tx = FrameWriter::new(Stalled(ErrorKind::BrokenPipe));
        let err = tx.send(&CommandFrame::new(0, 0, 50)).unwrap_err();
        assert!(matches!(err, Error::Write(_)));
    }

    #[test]
    fn short_write_counts_as_dropped() {
        let mut buf = [0u8; 3];
        let mut tx = FrameWriter::new(&mut buf[..]);
        tx.send(&CommandFrame::new(1, 2, 3)).unwrap();
        assert_eq!(tx.dropped(), 1);
    }

    #[test]
    fn missing_device_fails_to_open() {
        let path = "/dev/cart-teleop-does-not-exist";
        match SerialTransport::open(path, &SerialConfig::default()) {
            Err(Error::Open { port, .. }) => assert_eq!(port, path),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("opened a device that does not exist"),
        }
    }

    #[test]
    fn default_config_matches_cart_firmware() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baud_rate, 57_600);
        assert_eq!(cfg.write_timeout, Duration::ZERO);
    }
}
