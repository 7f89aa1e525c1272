//! Hardware Abstraction Traits
//!
//! Schnittstellen zu den externen Primitiven der Firmware:
//! LED-Strip, Neustart und Zufallsquelle.
//!
//! # Implementierungen
//! - **Production:** `RmtStripWriter`, `EspSystemControl`, `HardwareRandom` (psl-firmware)
//! - **Testing:** Mocks in `psl-tests`

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

/// Trait für den Zugriff auf den adressierbaren LED-Strip
///
/// Der Renderer ruft pro Frame `write_pixel()` genau einmal für jeden Index
/// `0..N` auf und danach einmal `latch()`.
pub trait StripWriter: Send {
    /// Schreibt das gepackte GRB-Wort für Pixel `index`
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write_pixel(&mut self, index: u16, grb: u32) -> Result<(), LedError>;

    /// Schließt einen Frame ab (z.B. Buffer an die Hardware übertragen)
    fn latch(&mut self) -> Result<(), LedError> {
        Ok(())
    }
}

/// Neustart der Plattform
pub trait SystemControl {
    /// Fordert einen vollständigen Neustart an
    ///
    /// Auf der Hardware kehrt dieser Aufruf nicht zurück. Nach dem Aufruf
    /// führt der Core keine weiteren Operationen aus.
    fn request_restart(&mut self);
}

/// Quelle für Zufallszahlen (Namens-Suffix, Geräteadresse)
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedError::WriteFailed => defmt::write!(fmt, "LED write failed"),
        }
    }
}
