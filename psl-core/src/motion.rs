//! Lage-Telemetrie (Pitch, Roll, Yaw) → HSV
//!
//! Yaw bestimmt den Farbton, Roll verschiebt Farbton und Sättigung,
//! Pitch steuert die Helligkeit.

use crate::color::Hsv;
use crate::numeric::{FULL_TURN_DEGREES, clamp, wrap};
use crate::state::BrightnessLimits;

/// π wie es die Smartphone-App beim Kodieren verwendet
pub const PI_APPROX: f32 = 3.14159;

/// Orientierung des Telefons in Radiant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl Orientation {
    pub const fn new(pitch: f32, roll: f32, yaw: f32) -> Self {
        Self { pitch, roll, yaw }
    }

    /// Roll und Yaw: `[-π, π]` → `[0, 1]`
    fn roll_norm(&self) -> f32 {
        clamp((self.roll + PI_APPROX) / (2.0 * PI_APPROX), 0.0, 1.0)
    }

    fn yaw_norm(&self) -> f32 {
        clamp((self.yaw + PI_APPROX) / (2.0 * PI_APPROX), 0.0, 1.0)
    }

    /// Pitch: `[-π/2, π/2]` → `[0, 1]`
    fn pitch_norm(&self) -> f32 {
        clamp((self.pitch + PI_APPROX / 2.0) / PI_APPROX, 0.0, 1.0)
    }

    /// Bildet die Orientierung auf eine HSV-Farbe ab
    ///
    /// Sensorrauschen außerhalb der nominalen Bereiche wird nach der
    /// Normalisierung auf `[0, 1]` geklemmt.
    pub fn to_hsv(&self, limits: BrightnessLimits) -> Hsv {
        let roll = self.roll_norm();
        let yaw = self.yaw_norm();
        let pitch = self.pitch_norm();

        Hsv {
            hue: wrap(yaw * FULL_TURN_DEGREES + roll * 120.0, FULL_TURN_DEGREES),
            saturation: clamp(0.35 + roll * 0.65, 0.2, 1.0),
            value: limits.clamp(0.2 + pitch * 0.8),
        }
    }
}
