// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus psl-core für die ESP32-C6 Hardware.

pub mod led_writer;
pub mod system;

pub use led_writer::RmtStripWriter;
pub use system::{EspSystemControl, HardwareRandom};
