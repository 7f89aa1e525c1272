//! Kommando-Protokoll
//!
//! ASCII-Pakete vom Transport werden per geordnetem Pattern-Matching in ein
//! [`Command`] übersetzt. Die erste passende Regel gewinnt:
//!
//! | # | Muster                | Kommando                 |
//! |---|-----------------------|--------------------------|
//! | 1 | `RESET…`              | `Reset`                  |
//! | 2 | `H_SET,<f32>`         | `SetHue`                 |
//! | 3 | `B_SET,<f32>`         | `SetBrightnessPercent`   |
//! | 4 | `H,<f32>`             | `AdjustHue`              |
//! | 5 | `B,<f32>`             | `AdjustBrightness`       |
//! | 6 | `SEG_START,<u32>`     | `SetSegmentStart`        |
//! | 7 | `SEG_END,<u32>`       | `SetSegmentEnd`          |
//! | 8 | `<f32>,<f32>,<f32>`   | `MotionSample`           |
//! | 9 | alles andere          | `Unrecognized`           |
//!
//! Zahlen werden wie bei `scanf` gelesen: führender Whitespace wird
//! übersprungen, Zeichen nach einer erfolgreich gelesenen Zahl ignoriert.

use num_traits::Float;

use crate::motion::Orientation;

/// Größe des Arbeits-Buffers (inkl. Platz für den Terminator)
pub const PACKET_BUFFER: usize = 128;

/// Maximal ausgewertete Paketlänge, der Rest wird abgeschnitten
pub const MAX_PAYLOAD_LEN: usize = PACKET_BUFFER - 1;

/// Ein vom Transport empfangenes Kommando
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command<'a> {
    /// Neustart des Controllers
    Reset,
    /// Absoluter Farbton in Grad
    SetHue(f32),
    /// Absolute Helligkeit in Prozent (0-100)
    SetBrightnessPercent(f32),
    /// Relativer Farbton in Grad
    AdjustHue(f32),
    /// Relative Helligkeit (Anteil, z.B. 0.05)
    AdjustBrightness(f32),
    /// Segment-Anfang, 1-basiert
    SetSegmentStart(u32),
    /// Segment-Ende, 1-basiert
    SetSegmentEnd(u32),
    /// Lage des Telefons (Pitch, Roll, Yaw in Radiant)
    MotionSample(Orientation),
    /// Kein Muster passt; enthält die ausgewerteten Bytes
    Unrecognized(&'a [u8]),
}

impl<'a> Command<'a> {
    /// Klassifiziert ein Paket
    ///
    /// Liefert immer ein Kommando; unbekannte Pakete werden zu
    /// `Command::Unrecognized`. Pakete länger als [`MAX_PAYLOAD_LEN`] werden
    /// abgeschnitten, nicht abgelehnt.
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use psl_core::Command;
    /// assert_eq!(Command::parse(b"H_SET,90"), Command::SetHue(90.0));
    /// assert_eq!(Command::parse(b"RESET123"), Command::Reset);
    /// assert_eq!(Command::parse(b"B,-0.1xyz"), Command::AdjustBrightness(-0.1));
    /// ```
    pub fn parse(bytes: &'a [u8]) -> Self {
        let text = interpreted(bytes);

        if text.starts_with(b"RESET") {
            return Command::Reset;
        }
        if let Some(degrees) = prefixed_float(text, b"H_SET,") {
            return Command::SetHue(degrees);
        }
        if let Some(percent) = prefixed_float(text, b"B_SET,") {
            return Command::SetBrightnessPercent(percent);
        }
        if let Some(delta) = prefixed_float(text, b"H,") {
            return Command::AdjustHue(delta);
        }
        if let Some(delta) = prefixed_float(text, b"B,") {
            return Command::AdjustBrightness(delta);
        }
        if let Some(position) = prefixed_unsigned(text, b"SEG_START,") {
            return Command::SetSegmentStart(position);
        }
        if let Some(position) = prefixed_unsigned(text, b"SEG_END,") {
            return Command::SetSegmentEnd(position);
        }
        if let Some(orientation) = orientation(text) {
            return Command::MotionSample(orientation);
        }

        Command::Unrecognized(text)
    }

    /// Segment-Kommandos (abschaltbar über die Konfiguration)
    pub fn is_segment(&self) -> bool {
        matches!(self, Command::SetSegmentStart(_) | Command::SetSegmentEnd(_))
    }
}

impl<'a> From<&'a [u8]> for Command<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Command::parse(bytes)
    }
}

/// Der Teil eines Pakets, der tatsächlich ausgewertet wird
///
/// Auf [`MAX_PAYLOAD_LEN`] gekürzt und am ersten NUL-Byte beendet.
pub fn interpreted(bytes: &[u8]) -> &[u8] {
    let bytes = &bytes[..bytes.len().min(MAX_PAYLOAD_LEN)];
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

fn prefixed_float(text: &[u8], prefix: &[u8]) -> Option<f32> {
    let mut scanner = Scanner::new(text);
    scanner.literal(prefix)?;
    scanner.float()
}

fn prefixed_unsigned(text: &[u8], prefix: &[u8]) -> Option<u32> {
    let mut scanner = Scanner::new(text);
    scanner.literal(prefix)?;
    scanner.unsigned()
}

fn orientation(text: &[u8]) -> Option<Orientation> {
    let mut scanner = Scanner::new(text);
    let pitch = scanner.float()?;
    scanner.literal(b",")?;
    let roll = scanner.float()?;
    scanner.literal(b",")?;
    let yaw = scanner.float()?;
    Some(Orientation::new(pitch, roll, yaw))
}

/// Cursor über ein Paket mit scanf-ähnlichen Konvertierungen
struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Exakter Literal-Vergleich (case-sensitive)
    fn literal(&mut self, literal: &[u8]) -> Option<()> {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            Some(())
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)) {
            self.pos += 1;
        }
    }

    /// Liest ein optionales Vorzeichen, `true` bei `-`
    fn sign(&mut self) -> bool {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// `%f`: Vorzeichen, Dezimal- oder Hex-Zahl mit Exponent, `inf`, `nan`
    fn float(&mut self) -> Option<f32> {
        self.skip_whitespace();
        let start = self.pos;
        let negative = self.sign();

        let magnitude = self
            .special()
            .or_else(|| self.hex_float())
            .or_else(|| self.decimal());

        match magnitude {
            Some(value) if negative => Some(-value),
            Some(value) => Some(value),
            None => {
                self.pos = start;
                None
            }
        }
    }

    fn special(&mut self) -> Option<f32> {
        const WORDS: [(&[u8], f32); 3] = [
            (b"infinity", f32::INFINITY),
            (b"inf", f32::INFINITY),
            (b"nan", f32::NAN),
        ];

        let rest = self.rest();
        for (word, value) in WORDS {
            if rest.len() >= word.len() && rest[..word.len()].eq_ignore_ascii_case(word) {
                self.pos += word.len();
                return Some(value);
            }
        }
        None
    }

    fn decimal(&mut self) -> Option<f32> {
        let start = self.pos;
        let int_digits = self.digits();
        let mut frac_digits = 0;

        if self.peek() == Some(b'.') {
            let dot = self.pos;
            self.pos += 1;
            frac_digits = self.digits();
            if int_digits == 0 && frac_digits == 0 {
                self.pos = dot;
            }
        }
        if int_digits == 0 && frac_digits == 0 {
            self.pos = start;
            return None;
        }
        self.exponent(b'e', b'E');

        // Token ist reines ASCII: Ziffern, '.', 'e', Vorzeichen
        let token = core::str::from_utf8(&self.input[start..self.pos]).ok()?;
        token.parse::<f32>().ok()
    }

    /// `0x1.8p3` Notation
    fn hex_float(&mut self) -> Option<f32> {
        if self.peek() != Some(b'0') || !matches!(self.peek_at(1), Some(b'x' | b'X')) {
            return None;
        }
        let start = self.pos;
        self.pos += 2;

        let mut mantissa = 0f64;
        let mut exponent: i32 = 0;
        let mut any_digit = false;

        while let Some(digit) = self.peek().and_then(hex_value) {
            mantissa = mantissa * 16.0 + f64::from(digit);
            any_digit = true;
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            let dot = self.pos;
            self.pos += 1;
            let mut frac_digit = false;
            while let Some(digit) = self.peek().and_then(hex_value) {
                mantissa = mantissa * 16.0 + f64::from(digit);
                exponent = exponent.saturating_sub(4);
                frac_digit = true;
                self.pos += 1;
            }
            if !any_digit && !frac_digit {
                self.pos = dot;
            }
            any_digit |= frac_digit;
        }
        if !any_digit {
            // "0x" ohne Ziffern: nur die "0" gilt (Dezimalpfad)
            self.pos = start;
            return None;
        }
        if let Some(binary_exponent) = self.exponent(b'p', b'P') {
            exponent = exponent.saturating_add(binary_exponent);
        }

        // 0 * 2^exp bleibt 0, auch wenn 2^exp überläuft
        if mantissa == 0.0 {
            return Some(0.0);
        }
        Some((mantissa * Float::powi(2.0f64, exponent)) as f32)
    }

    /// Exponent wird nur konsumiert, wenn mindestens eine Ziffer folgt
    fn exponent(&mut self, lower: u8, upper: u8) -> Option<i32> {
        let mark = self.pos;
        match self.peek() {
            Some(c) if c == lower || c == upper => self.pos += 1,
            _ => return None,
        }
        let negative = self.sign();
        let digits_start = self.pos;
        if self.digits() == 0 {
            self.pos = mark;
            return None;
        }

        let value = self.input[digits_start..self.pos]
            .iter()
            .fold(0i32, |acc, &d| {
                acc.saturating_mul(10).saturating_add(i32::from(d - b'0'))
            });
        Some(if negative { -value } else { value })
    }

    /// `%lu`: Vorzeichen erlaubt, negative Werte laufen modulo 2^32 um,
    /// Überlauf sättigt auf `u32::MAX`
    fn unsigned(&mut self) -> Option<u32> {
        self.skip_whitespace();
        let start = self.pos;
        let negative = self.sign();
        let digits_start = self.pos;
        if self.digits() == 0 {
            self.pos = start;
            return None;
        }

        let mut value: u32 = 0;
        for &d in &self.input[digits_start..self.pos] {
            match value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(d - b'0')))
            {
                Some(next) => value = next,
                None => return Some(u32::MAX),
            }
        }
        Some(if negative { value.wrapping_neg() } else { value })
    }
}

fn hex_value(c: u8) -> Option<u32> {
    char::from(c).to_digit(16)
}

// ============================================================================
// defmt::Format Implementation (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Command<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::Reset => defmt::write!(fmt, "Reset"),
            Command::SetHue(v) => defmt::write!(fmt, "SetHue({})", v),
            Command::SetBrightnessPercent(v) => defmt::write!(fmt, "SetBrightnessPercent({})", v),
            Command::AdjustHue(v) => defmt::write!(fmt, "AdjustHue({})", v),
            Command::AdjustBrightness(v) => defmt::write!(fmt, "AdjustBrightness({})", v),
            Command::SetSegmentStart(n) => defmt::write!(fmt, "SetSegmentStart({})", n),
            Command::SetSegmentEnd(n) => defmt::write!(fmt, "SetSegmentEnd({})", n),
            Command::MotionSample(o) => defmt::write!(
                fmt,
                "MotionSample {{ pitch: {}, roll: {}, yaw: {} }}",
                o.pitch,
                o.roll,
                o.yaw
            ),
            Command::Unrecognized(raw) => defmt::write!(fmt, "Unrecognized('{=[u8]:a}')", *raw),
        }
    }
}
