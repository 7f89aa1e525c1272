//! Farbmodell: HSV → RGB → gepacktes GRB-Wort
//!
//! WS2812-Strips erwarten Grün, Rot, Blau in dieser Reihenfolge.
//! Das gepackte Wort ist `(G << 16) | (R << 8) | B`.

use num_traits::Float;
use rgb::RGB8;

use crate::numeric::{clamp, wrap_degrees};

/// Gepacktes Wort für ein ausgeschaltetes Pixel
pub const OFF: u32 = 0;

/// HSV-Farbe
///
/// - `hue`: Grad, wird vor der Umrechnung auf `[0, 360)` normalisiert
/// - `saturation`, `value`: `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Umrechnung nach RGB8
    pub fn to_rgb(self) -> RGB8 {
        hsv_to_rgb(self)
    }

    /// Umrechnung direkt ins Strip-Format
    pub fn to_grb(self) -> u32 {
        pack_grb(hsv_to_rgb(self))
    }
}

/// Standard HSV → RGB Umrechnung (sechs 60°-Sektoren)
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use psl_core::color::{Hsv, hsv_to_rgb};
/// let red = hsv_to_rgb(Hsv::new(0.0, 1.0, 1.0));
/// assert_eq!(red, RGB8 { r: 255, g: 0, b: 0 });
/// ```
pub fn hsv_to_rgb(hsv: Hsv) -> RGB8 {
    let h = wrap_degrees(hsv.hue);
    let c = hsv.value * hsv.saturation;
    let x = c * (1.0 - Float::abs((h / 60.0) % 2.0 - 1.0));
    let m = hsv.value - c;

    let (r1, g1, b1) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    RGB8 {
        r: to_channel(r1 + m),
        g: to_channel(g1 + m),
        b: to_channel(b1 + m),
    }
}

// Float-Rundung kann knapp über 255 landen
#[inline]
fn to_channel(level: f32) -> u8 {
    clamp(level * 255.0, 0.0, 255.0) as u8
}

/// Packt RGB8 als `(G << 16) | (R << 8) | B`
///
/// ```
/// # use rgb::RGB8;
/// # use psl_core::color::pack_grb;
/// assert_eq!(pack_grb(RGB8 { r: 0x12, g: 0x34, b: 0x56 }), 0x34_12_56);
/// ```
#[inline]
pub fn pack_grb(color: RGB8) -> u32 {
    (u32::from(color.g) << 16) | (u32::from(color.r) << 8) | u32::from(color.b)
}

/// Gegenstück zu [`pack_grb`], für Treiber die RGB8 erwarten
#[inline]
pub fn unpack_grb(word: u32) -> RGB8 {
    RGB8 {
        r: (word >> 8) as u8,
        g: (word >> 16) as u8,
        b: word as u8,
    }
}

/// HSV direkt ins GRB-Wort
#[inline]
pub fn hsv_to_grb(hue: f32, saturation: f32, value: f32) -> u32 {
    Hsv::new(hue, saturation, value).to_grb()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsv_to_rgb(Hsv::new(0.0, 1.0, 1.0)), RGB8 { r: 255, g: 0, b: 0 });
        assert_eq!(hsv_to_rgb(Hsv::new(120.0, 1.0, 1.0)), RGB8 { r: 0, g: 255, b: 0 });
        assert_eq!(hsv_to_rgb(Hsv::new(240.0, 1.0, 1.0)), RGB8 { r: 0, g: 0, b: 255 });
    }

    #[test]
    fn test_secondary_hues() {
        assert_eq!(hsv_to_rgb(Hsv::new(60.0, 1.0, 1.0)), RGB8 { r: 255, g: 255, b: 0 });
        assert_eq!(hsv_to_rgb(Hsv::new(180.0, 1.0, 1.0)), RGB8 { r: 0, g: 255, b: 255 });
        assert_eq!(hsv_to_rgb(Hsv::new(300.0, 1.0, 1.0)), RGB8 { r: 255, g: 0, b: 255 });
    }

    #[test]
    fn test_hue_is_wrapped_before_conversion() {
        assert_eq!(
            hsv_to_rgb(Hsv::new(360.0 + 120.0, 1.0, 1.0)),
            hsv_to_rgb(Hsv::new(120.0, 1.0, 1.0))
        );
        assert_eq!(
            hsv_to_rgb(Hsv::new(-120.0, 1.0, 1.0)),
            hsv_to_rgb(Hsv::new(240.0, 1.0, 1.0))
        );
    }

    #[test]
    fn test_zero_saturation_is_grey() {
        let grey = hsv_to_rgb(Hsv::new(200.0, 0.0, 0.5));
        assert_eq!(grey.r, grey.g);
        assert_eq!(grey.g, grey.b);
        assert_eq!(grey.r, 127);
    }

    #[test]
    fn test_zero_value_is_off() {
        assert_eq!(hsv_to_grb(90.0, 1.0, 0.0), OFF);
    }

    #[test]
    fn test_out_of_range_value_is_clamped() {
        assert_eq!(hsv_to_rgb(Hsv::new(0.0, 1.0, 2.0)), RGB8 { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn test_red_packs_into_middle_byte() {
        assert_eq!(hsv_to_grb(0.0, 1.0, 1.0), 0x00_FF_00);
        assert_eq!(hsv_to_grb(120.0, 1.0, 1.0), 0xFF_00_00);
        assert_eq!(hsv_to_grb(240.0, 1.0, 1.0), 0x00_00_FF);
    }

    #[test]
    fn test_unpack_reverses_pack() {
        let color = RGB8 { r: 1, g: 2, b: 3 };
        assert_eq!(unpack_grb(pack_grb(color)), color);
    }
}
