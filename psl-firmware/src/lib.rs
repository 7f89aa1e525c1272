// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von psl-core
pub use psl_core::{
    CommandDispatcher, ControllerConfig, DispatchOutcome, LedError, MAX_PAYLOAD_LEN, StripWriter,
    SystemControl,
};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::COMMAND_QUEUE_DEPTH;

/// Ein validiertes Kommando-Paket (bereits auf 127 Bytes gekürzt)
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD_LEN>;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Transport-Tasks (UDP) → Light-Task. Nur der Light-Task besitzt den
// Dispatcher, dadurch sind alle Kommandos serialisiert.

/// Channel für Kommando-Pakete
pub type PayloadChannel = Channel<NoopRawMutex, Payload, COMMAND_QUEUE_DEPTH>;

/// Sender für Kommando-Pakete (Transport-Task)
pub type PayloadSender = Sender<'static, NoopRawMutex, Payload, COMMAND_QUEUE_DEPTH>;

/// Receiver für Kommando-Pakete (Light-Task)
pub type PayloadReceiver = Receiver<'static, NoopRawMutex, Payload, COMMAND_QUEUE_DEPTH>;
