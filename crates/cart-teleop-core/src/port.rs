//! Serial device selection.

use crate::error::{Error, Result};
use serialport::SerialPortInfo;

/// Device the cart's USB adapter enumerates as on the Linux control laptop.
pub const DEFAULT_PORT: &str = "/dev/ttyUSB9";
/// USB serial adapters on macOS show up as `/dev/cu.usbserial-*`.
pub const USB_SERIAL_MARKER: &str = "usbserial";

#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
    pub port_name: String,
    /// USB product string, when the adapter reports one.
    pub product: Option<String>,
}

impl PortInfo {
    pub fn named(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            product: None,
        }
    }
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let product = match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => usb.product,
            _ => None,
        };
        Self {
            port_name: info.port_name,
            product,
        }
    }
}

/// One synchronous snapshot of the visible serial devices.
pub fn list_ports() -> Vec<PortInfo> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(PortInfo::from).collect(),
        Err(e) => {
            log::warn!("serial port enumeration failed: {e}");
            Vec::new()
        }
    }
}

pub trait PortResolver {
    fn resolve(&self) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedPath(pub String);

impl PortResolver for FixedPath {
    fn resolve(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanForSubstring {
    pub marker: String,
}

impl ScanForSubstring {
    pub fn new(marker: impl Into<String>) -> Self {
        Self { marker: marker.into() }
    }

    /// First port in `ports` whose name contains the marker.
    pub fn resolve_in(&self, ports: &[PortInfo]) -> Result<String> {
        let port = ports
            .iter()
            .find(|p| p.port_name.contains(&self.marker))
            .ok_or_else(|| Error::PortNotFound {
                marker: self.marker.clone(),
            })?;
        log::info!(
            "picked {} ({})",
            port.port_name,
            port.product.as_deref().unwrap_or("unknown product")
        );
        Ok(port.port_name.clone())
    }
}

impl PortResolver for ScanForSubstring {
    fn resolve(&self) -> Result<String> {
        let ports = list_ports();
        log::debug!("scanning {} serial ports for {:?}", ports.len(), self.marker);
        self.resolve_in(&ports)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }
}

/// Port selection strategy, chosen once at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum PortStrategy {
    Fixed(FixedPath),
    Scan(ScanForSubstring),
}

impl PortStrategy {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::MacOs => Self::Scan(ScanForSubstring::new(USB_SERIAL_MARKER)),
            Platform::Linux | Platform::Other => Self::Fixed(FixedPath(DEFAULT_PORT.to_string())),
        }
    }
}

impl Default for PortStrategy {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl PortResolver for PortStrategy {
    fn resolve(&self) -> Result<String> {
        match self {
            Self::Fixed(fixed) => fixed.resolve(),
            Self::Scan(scan) => scan.resolve(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_uses_fixed_path() {
        let strategy = PortStrategy::for_platform(Platform::Linux);
        assert_eq!(strategy.resolve().unwrap(), DEFAULT_PORT);
    }

    #[test]
    fn macos_scans_for_usbserial() {
        assert_eq!(
            PortStrategy::for_platform(Platform::MacOs),
            PortStrategy::Scan(ScanForSubstring::new("usbserial"))
        );
    }

    #[test]
    fn scan_returns_first_match() {
        let ports = [
            PortInfo::named("/dev/cu.Bluetooth-Incoming-Port"),
            PortInfo {
                port_name: "/dev/cu.usbserial-1463340".into(),
                product: Some("FT232R USB UART".into()),
            },
            PortInfo::named("/dev/cu.usbserial-99"),
        ];
        let scan = ScanForSubstring::new(USB_SERIAL_MARKER);
        assert_eq!(scan.resolve_in(&ports).unwrap(), "/dev/cu.usbserial-1463340");
    }

    #[test]
    fn scan_without_match_is_not_found() {
        let ports = [PortInfo::named("/dev/cu.Bluetooth-Incoming-Port"), PortInfo::named("/dev/ttyS0")];
        let err = ScanForSubstring::new(USB_SERIAL_MARKER).resolve_in(&ports).unwrap_err();
        assert!(matches!(err, Error::PortNotFound { ref marker } if marker == "usbserial"));
    }

    #[test]
    fn non_usb_port_has_no_product() {
        let info = PortInfo::from(SerialPortInfo {
            port_name: "/dev/ttyS0".into(),
            port_type: serialport::SerialPortType::PciPort,
        });
        assert_eq!(info, PortInfo::named("/dev/ttyS0"));
    }

    #[test]
    fn scan_of_empty_snapshot_is_not_found() {
        let err = ScanForSubstring::new("usbserial").resolve_in(&[]).unwrap_err();
        assert!(matches!(err, Error::PortNotFound { .. }));
    }
}
