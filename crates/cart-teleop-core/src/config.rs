use crate::port::{FixedPath, PortStrategy};
use crate::serial::SerialConfig;
use crate::state::Increments;
use std::time::Duration;

pub const PORT_ENV: &str = "CART_TELEOP_PORT";
pub const BAUD_ENV: &str = "CART_TELEOP_BAUD";

#[derive(Debug, Clone)]
pub struct TeleopConfig {
    pub port: PortStrategy,
    pub serial: SerialConfig,
    pub tick: Duration,
    pub increments: Increments,
    /// Brake ramp length from full speed, in seconds.
    pub full_brake_secs: f64,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            port: PortStrategy::default(),
            serial: SerialConfig::default(),
            tick: Duration::from_millis(100),
            increments: Increments::default(),
            full_brake_secs: 3.0,
        }
    }
}

impl TeleopConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.trim().is_empty()) {
            log::info!("{PORT_ENV} overrides port selection: {port}");
            cfg.port = PortStrategy::Fixed(FixedPath(port.trim().to_string()));
        }

        if let Some(baud) = lookup(BAUD_ENV) {
            match baud.trim().parse::<u32>() {
                Ok(rate) if rate > 0 => cfg.serial.baud_rate = rate,
                _ => log::warn!("ignoring invalid {BAUD_ENV}={baud:?}, keeping {}", cfg.serial.baud_rate),
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cart() {
        let cfg = TeleopConfig::from_lookup(|_| None);
        assert_eq!(cfg.tick, Duration::from_millis(100));
        assert_eq!(cfg.serial.baud_rate, 57_600);
        assert_eq!(cfg.increments, Increments { throttle: 15, steering: 10 });
        assert_eq!(cfg.full_brake_secs, 3.0);
    }

    #[test]
    fn port_override_becomes_fixed_path() {
        let cfg = TeleopConfig::from_lookup(|key| (key == PORT_ENV).then(|| "/dev/ttyACM0".to_string()));
        assert_eq!(cfg.port, PortStrategy::Fixed(FixedPath("/dev/ttyACM0".into())));
    }

    #[test]
    fn blank_port_override_is_ignored() {
        let cfg = TeleopConfig::from_lookup(|key| (key == PORT_ENV).then(|| "  ".to_string()));
        assert_eq!(cfg.port, PortStrategy::default());
    }

    #[test]
    fn bad_baud_keeps_default() {
        let cfg = TeleopConfig::from_lookup(|key| (key == BAUD_ENV).then(|| "fast".to_string()));
        assert_eq!(cfg.serial.baud_rate, 57_600);
        let cfg = TeleopConfig::from_lookup(|key| (key == BAUD_ENV).then(|| "115200".to_string()));
        assert_eq!(cfg.serial.baud_rate, 115_200);
    }
}
