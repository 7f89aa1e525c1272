//! Skalare Hilfsfunktionen: Begrenzen und Umlaufen
//!
//! Wird von Farbmodell, Zustand und Bewegungs-Mapping gemeinsam genutzt.

/// Volle Umdrehung in Grad
pub const FULL_TURN_DEGREES: f32 = 360.0;

/// Begrenzt `value` auf `[min, max]`
///
/// NaN wird auf `min` abgebildet, damit kein ungültiger Wert in den
/// Farbzustand gelangt.
///
/// ```
/// # use psl_core::numeric::clamp;
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
/// assert_eq!(clamp(f32::NAN, 0.2, 1.0), 0.2);
/// ```
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() || value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

/// Bildet `value` auf `[0, period)` ab, kongruent modulo `period`
///
/// Nicht-endliche Werte (NaN, ±∞) ergeben `0.0`.
///
/// ```
/// # use psl_core::numeric::wrap;
/// assert_eq!(wrap(370.0, 360.0), 10.0);
/// assert_eq!(wrap(-90.0, 360.0), 270.0);
/// assert_eq!(wrap(360.0, 360.0), 0.0);
/// ```
#[inline]
pub fn wrap(value: f32, period: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let mut wrapped = value % period;
    if wrapped < 0.0 {
        wrapped += period;
    }
    // -1e-6 + 360.0 rundet in f32 auf 360.0
    if wrapped >= period { 0.0 } else { wrapped }
}

/// Hue in Grad auf `[0, 360)` normalisieren
#[inline]
pub fn wrap_degrees(value: f32) -> f32 {
    wrap(value, FULL_TURN_DEGREES)
}

/// Begrenzt einen Pixel-Index auf `[0, len - 1]`
#[inline]
pub fn clamp_index(index: u32, len: u16) -> u16 {
    let last = u32::from(len.saturating_sub(1));
    // passt nach min() immer in u16
    index.min(last) as u16
}
