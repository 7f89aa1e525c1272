// Strip Writer für WS2812 über das RMT Peripheral
//
// Pixel-Writes landen in einem Frame-Buffer, erst latch() überträgt
// den kompletten Frame an den Strip.

use esp_hal::Blocking;
use esp_hal::rmt::{PulseCode, Rmt};
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use psl_core::color::unpack_grb;
use psl_core::{LedError, StripWriter};
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

use crate::config::{LED_BUFFER_SIZE, LED_COUNT};

/// Real Hardware Strip Writer
///
/// Hinweis: Der RMT-Buffer muss 'static sein (bei 300 LEDs ~29 KB),
/// daher wird er im Task über eine StaticCell erstellt und übergeben.
pub struct RmtStripWriter<'a> {
    led: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
    frame: [RGB8; LED_COUNT],
}

impl<'a> RmtStripWriter<'a> {
    /// Erstellt einen neuen RmtStripWriter
    ///
    /// # Parameter
    /// - `gpio8`: GPIO8 Peripheral für die Datenleitung
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Pulse-Buffer (erstellt mit smart_led_buffer!(LED_COUNT))
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [PulseCode; LED_BUFFER_SIZE],
    ) -> Result<Self, LedError> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| LedError::WriteFailed)?;

        let led = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Ok(Self {
            led,
            frame: [RGB8::default(); LED_COUNT],
        })
    }
}

impl StripWriter for RmtStripWriter<'_> {
    fn write_pixel(&mut self, index: u16, grb: u32) -> Result<(), LedError> {
        let pixel = self
            .frame
            .get_mut(usize::from(index))
            .ok_or(LedError::WriteFailed)?;
        *pixel = unpack_grb(grb);
        Ok(())
    }

    fn latch(&mut self) -> Result<(), LedError> {
        // Adapter sortiert RGB8 selbst in GRB-Reihenfolge
        self.led
            .write(self.frame.iter().copied())
            .map_err(|_| LedError::WriteFailed)
    }
}
