//! PSL Core - Platform-agnostic Controller Logic
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Kommando-Parser, Farbzustand, Segment-Renderer, Discovery-Payloads und
//! Transport-Bridge; Hardware wird nur über Traits angesprochen.

#![no_std]

// muss zuerst kommen, die Makros werden in allen Modulen genutzt
mod fmt;

pub mod advertising;
pub mod att;
pub mod bridge;
pub mod color;
pub mod command;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod motion;
pub mod numeric;
pub mod render;
pub mod state;
pub mod traits;

// Re-exports für einfachen Zugriff
pub use advertising::{Advertiser, AdvertisingParams};
pub use att::{AttPdu, describe_att_pdu};
pub use bridge::{AttWrite, BridgeError, Inbound, TransactionMode, TransportBridge, UdpDatagram};
pub use color::{Hsv, hsv_to_grb, pack_grb};
pub use command::{Command, MAX_PAYLOAD_LEN, PACKET_BUFFER};
pub use config::{ControllerConfig, Transport};
pub use discovery::{DeviceIdentity, DiscoveryPayload, NameError, StaticAddress};
pub use dispatch::{CommandDispatcher, DispatchOutcome, PayloadHandler};
pub use motion::Orientation;
pub use render::SegmentRenderer;
pub use state::{BrightnessLimits, ColorSnapshot, ColorState, Segment};
pub use traits::{LedError, RandomSource, StripWriter, SystemControl};
