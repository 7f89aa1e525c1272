//! Controller-Konfiguration
//!
//! Ersetzt die Firmware-Varianten (voller Strip mit Segmentsteuerung und
//! kompakter Test-Aufbau) durch eine Konfiguration zur Laufzeit.

use crate::color::Hsv;
use crate::state::BrightnessLimits;

/// Über welchen Transport Kommandos ankommen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transport {
    Ble,
    Udp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerConfig {
    pub transport: Transport,
    /// `SEG_START`/`SEG_END` auswerten
    pub segment_control: bool,
    pub diagnostic_logging: bool,
    /// Anzahl der Pixel (N)
    pub strip_length: u16,
    pub min_brightness: f32,
    pub max_brightness: f32,
    pub initial_color: Hsv,
}

impl ControllerConfig {
    /// Standard-Strip mit 300 LEDs
    pub const fn full() -> Self {
        Self {
            transport: Transport::Udp,
            segment_control: true,
            diagnostic_logging: true,
            strip_length: 300,
            min_brightness: 0.05,
            max_brightness: 1.0,
            initial_color: Hsv::new(25.0, 1.0, 125.0 / 255.0),
        }
    }

    /// Kleiner Aufbau: 16 LEDs, gedeckelte Helligkeit, keine Segmente
    pub const fn compact() -> Self {
        Self {
            segment_control: false,
            diagnostic_logging: false,
            strip_length: 16,
            max_brightness: 100.0 / 255.0,
            ..Self::full()
        }
    }

    pub const fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub const fn with_segment_control(mut self, enabled: bool) -> Self {
        self.segment_control = enabled;
        self
    }

    pub const fn with_diagnostic_logging(mut self, enabled: bool) -> Self {
        self.diagnostic_logging = enabled;
        self
    }

    pub const fn with_strip_length(mut self, strip_length: u16) -> Self {
        self.strip_length = strip_length;
        self
    }

    pub const fn with_brightness_limits(mut self, min: f32, max: f32) -> Self {
        self.min_brightness = min;
        self.max_brightness = max;
        self
    }

    pub const fn with_initial_color(mut self, color: Hsv) -> Self {
        self.initial_color = color;
        self
    }

    pub fn brightness_limits(&self) -> BrightnessLimits {
        BrightnessLimits::new(self.min_brightness, self.max_brightness).normalized()
    }

    /// Strip-Länge mindestens 1, Helligkeitsgrenzen geordnet
    pub fn normalized(self) -> Self {
        let limits = self.brightness_limits();
        Self {
            strip_length: self.strip_length.max(1),
            min_brightness: limits.min,
            max_brightness: limits.max,
            ..self
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Transport {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Transport::Ble => defmt::write!(fmt, "BLE"),
            Transport::Udp => defmt::write!(fmt, "UDP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.transport, Transport::Udp);
        assert_eq!(config.strip_length, 300);
        assert!(config.segment_control);
        assert_eq!(config.initial_color.hue, 25.0);
    }

    #[test]
    fn test_compact_preset() {
        let config = ControllerConfig::compact();
        assert_eq!(config.strip_length, 16);
        assert!(!config.segment_control);
        assert!(!config.diagnostic_logging);
        assert_eq!(config.max_brightness, 100.0 / 255.0);
        assert_eq!(config.min_brightness, 0.05);
    }

    #[test]
    fn test_normalized() {
        let config = ControllerConfig::full()
            .with_strip_length(0)
            .with_brightness_limits(0.8, 0.2)
            .normalized();
        assert_eq!(config.strip_length, 1);
        assert_eq!((config.min_brightness, config.max_brightness), (0.2, 0.8));
    }
}
