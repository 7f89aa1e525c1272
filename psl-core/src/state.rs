//! Farbzustand und Segment
//!
//! Der Zustand trennt Basiswerte (gesetzt durch absolute Kommandos und
//! Bewegungsdaten) von Offsets (relative Kommandos). Gerendert wird immer
//! der effektive Wert aus beiden.

use crate::color::Hsv;
use crate::motion::Orientation;
use crate::numeric::{clamp, clamp_index, wrap_degrees};

/// Untere/obere Grenze der normalisierten Helligkeit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrightnessLimits {
    pub min: f32,
    pub max: f32,
}

impl BrightnessLimits {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Vertauschte Grenzen werden getauscht
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self::new(self.max, self.min)
        } else {
            self
        }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        clamp(value, self.min, self.max)
    }
}

/// Inklusiver Pixelbereich, der die aktuelle Farbe bekommt
///
/// Invariante: `start <= end <= strip_length - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    start: u16,
    end: u16,
}

impl Segment {
    /// Segment über den ganzen Strip
    pub fn full(strip_length: u16) -> Self {
        Self {
            start: 0,
            end: strip_length.saturating_sub(1),
        }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Anzahl der Pixel im Segment (mindestens 1)
    pub fn pixel_count(&self) -> u16 {
        self.end - self.start + 1
    }

    #[inline]
    pub fn contains(&self, index: u16) -> bool {
        index >= self.start && index <= self.end
    }

    /// Setzt den Anfang (0-basiert)
    pub fn set_start(&mut self, index: u32, strip_length: u16) {
        self.start = clamp_index(index, strip_length);
        self.enforce_bounds(strip_length);
    }

    /// Setzt das Ende (0-basiert)
    pub fn set_end(&mut self, index: u32, strip_length: u16) {
        self.end = clamp_index(index, strip_length);
        self.enforce_bounds(strip_length);
    }

    fn enforce_bounds(&mut self, strip_length: u16) {
        self.start = clamp_index(u32::from(self.start), strip_length);
        self.end = clamp_index(u32::from(self.end), strip_length);
        if self.start > self.end {
            self.end = self.start;
        }
    }
}

/// 1-basierten Index vom Protokoll in einen 0-basierten umrechnen
#[inline]
pub fn one_based_to_index(position: u32) -> u32 {
    position.saturating_sub(1)
}

/// Veränderlicher Farbzustand des Controllers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorState {
    base: Hsv,
    hue_offset: f32,
    brightness_offset: f32,
    limits: BrightnessLimits,
}

impl ColorState {
    pub fn new(initial: Hsv, limits: BrightnessLimits) -> Self {
        let limits = limits.normalized();
        Self {
            base: Hsv {
                hue: wrap_degrees(initial.hue),
                saturation: clamp(initial.saturation, 0.0, 1.0),
                value: limits.clamp(initial.value),
            },
            hue_offset: 0.0,
            brightness_offset: 0.0,
            limits,
        }
    }

    pub fn base(&self) -> Hsv {
        self.base
    }

    pub fn hue_offset(&self) -> f32 {
        self.hue_offset
    }

    pub fn brightness_offset(&self) -> f32 {
        self.brightness_offset
    }

    pub fn limits(&self) -> BrightnessLimits {
        self.limits
    }

    /// `(base_hue + hue_offset) mod 360`
    pub fn effective_hue(&self) -> f32 {
        wrap_degrees(self.base.hue + self.hue_offset)
    }

    /// `clamp(base_brightness + brightness_offset, min, max)`
    pub fn effective_brightness(&self) -> f32 {
        self.limits.clamp(self.base.value + self.brightness_offset)
    }

    /// Die Farbe, die tatsächlich gerendert wird
    pub fn effective(&self) -> Hsv {
        Hsv {
            hue: self.effective_hue(),
            saturation: self.base.saturation,
            value: self.effective_brightness(),
        }
    }

    /// Absoluter Farbton, verwirft den Offset
    pub fn set_hue(&mut self, degrees: f32) {
        self.base.hue = wrap_degrees(degrees);
        self.hue_offset = 0.0;
    }

    /// Absolute Helligkeit in Prozent (0-100), verwirft den Offset
    pub fn set_brightness_percent(&mut self, percent: f32) {
        self.base.value = self.limits.clamp(percent / 100.0);
        self.brightness_offset = 0.0;
    }

    /// Relativer Farbton, Basis bleibt unverändert
    pub fn adjust_hue(&mut self, delta: f32) {
        self.hue_offset = wrap_degrees(self.hue_offset + delta);
    }

    /// Relative Helligkeit
    ///
    /// Der Offset wird so gewählt, dass Basis + Offset innerhalb der Grenzen
    /// bleibt, auch nach beliebig vielen Schritten in eine Richtung.
    pub fn adjust_brightness(&mut self, delta: f32) {
        let desired = self
            .limits
            .clamp(self.base.value + self.brightness_offset + delta);
        self.brightness_offset = desired - self.base.value;
    }

    /// Überschreibt die Basisfarbe aus Bewegungsdaten, Offsets bleiben
    pub fn apply_motion(&mut self, orientation: Orientation) {
        self.base = orientation.to_hsv(self.limits);
    }
}

/// Momentaufnahme für Logging und Tests
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorSnapshot {
    pub color: Hsv,
    pub segment: Segment,
    pub packed_grb: u32,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ColorSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ColorSnapshot {{ hsv: ({}, {}, {}), segment: {}..={}, grb: {=u32:#x} }}",
            self.color.hue,
            self.color.saturation,
            self.color.value,
            self.segment.start,
            self.segment.end,
            self.packed_grb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: BrightnessLimits = BrightnessLimits::new(0.05, 1.0);

    fn state() -> ColorState {
        ColorState::new(Hsv::new(25.0, 1.0, 125.0 / 255.0), LIMITS)
    }

    #[test]
    fn test_set_hue_resets_offset() {
        let mut s = state();
        s.adjust_hue(40.0);
        s.set_hue(90.0);
        assert_eq!(s.base().hue, 90.0);
        assert_eq!(s.hue_offset(), 0.0);
    }

    #[test]
    fn test_adjust_hue_keeps_base() {
        let mut s = state();
        s.adjust_hue(-50.0);
        assert_eq!(s.base().hue, 25.0);
        assert_eq!(s.hue_offset(), 310.0);
        assert_eq!(s.effective_hue(), 335.0);
    }

    #[test]
    fn test_brightness_percent_is_clamped() {
        let mut s = state();
        s.set_brightness_percent(250.0);
        assert_eq!(s.base().value, 1.0);
        s.set_brightness_percent(1.0);
        assert_eq!(s.base().value, 0.05);
    }

    #[test]
    fn test_adjust_brightness_saturates() {
        let mut s = state();
        for _ in 0..20 {
            s.adjust_brightness(0.3);
        }
        assert_eq!(s.effective_brightness(), 1.0);
        // ein Schritt zurück wirkt sofort, kein "aufgestauter" Offset
        s.adjust_brightness(-0.1);
        let diff = s.effective_brightness() - 0.9;
        assert!(diff < 1e-6 && diff > -1e-6);
    }

    #[test]
    fn test_swapped_limits_are_normalized() {
        let s = ColorState::new(Hsv::new(0.0, 1.0, 0.5), BrightnessLimits::new(1.0, 0.1));
        assert_eq!(s.limits(), BrightnessLimits::new(0.1, 1.0));
    }

    #[test]
    fn test_segment_full() {
        let segment = Segment::full(16);
        assert_eq!((segment.start(), segment.end()), (0, 15));
        assert_eq!(segment.pixel_count(), 16);
    }

    #[test]
    fn test_segment_start_past_end_raises_end() {
        let mut segment = Segment::full(16);
        segment.set_end(3, 16);
        segment.set_start(8, 16);
        assert_eq!((segment.start(), segment.end()), (8, 8));
    }

    #[test]
    fn test_segment_end_before_start_is_raised() {
        let mut segment = Segment::full(16);
        segment.set_start(10, 16);
        segment.set_end(2, 16);
        assert_eq!((segment.start(), segment.end()), (10, 10));
    }

    #[test]
    fn test_segment_out_of_range_is_clamped() {
        let mut segment = Segment::full(16);
        segment.set_start(1000, 16);
        assert_eq!((segment.start(), segment.end()), (15, 15));
    }

    #[test]
    fn test_one_based_to_index() {
        assert_eq!(one_based_to_index(0), 0);
        assert_eq!(one_based_to_index(1), 0);
        assert_eq!(one_based_to_index(5), 4);
    }
}
