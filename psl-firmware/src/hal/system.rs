// Neustart und Hardware-Zufallszahlen

use esp_hal::rng::Rng;
use psl_core::{RandomSource, SystemControl};

/// Neustart über den ESP32 Software-Reset
pub struct EspSystemControl;

impl SystemControl for EspSystemControl {
    fn request_restart(&mut self) {
        defmt::warn!("System: software reset");
        esp_hal::system::software_reset();
    }
}

/// Hardware RNG (echte Zufallszahlen sobald das Radio läuft)
pub struct HardwareRandom {
    rng: Rng,
}

impl HardwareRandom {
    pub fn new() -> Self {
        Self { rng: Rng::new() }
    }

    /// Seed für den embassy-net Stack
    pub fn seed(&mut self) -> u64 {
        u64::from(self.rng.random()) << 32 | u64::from(self.rng.random())
    }
}

impl Default for HardwareRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for HardwareRandom {
    fn next_u32(&mut self) -> u32 {
        self.rng.random()
    }
}
