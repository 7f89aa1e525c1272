//! Transport Bridge
//!
//! Nimmt rohe Eingänge des Transports (ATT-Write oder UDP-Datagramm) an,
//! prüft das Ziel und reicht die Nutzdaten gekürzt an den Parser weiter.
//! Ungültige Ziele erreichen den Parser nie.

use crate::command::MAX_PAYLOAD_LEN;
use crate::dispatch::{DispatchOutcome, PayloadHandler};

/// ATT-Status für einen akzeptierten Write
pub const ATT_SUCCESS: u8 = 0x00;
pub const ATT_ERR_ATTRIBUTE_NOT_FOUND: u8 = 0x0A;
pub const ATT_ERR_UNLIKELY: u8 = 0x0E;

/// Standard-Port für UDP-Kommandos
pub const DEFAULT_UDP_PORT: u16 = 4210;

/// Zustand einer (Prepare/Execute) Write-Transaktion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    /// Einfacher Write
    None,
    /// Prepare Write, Daten liegen noch in der Queue
    Active,
    Execute,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttWrite<'a> {
    pub handle: u16,
    pub transaction_mode: TransactionMode,
    pub data: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpDatagram<'a> {
    /// Lokaler Ziel-Port (bei gebundenem Socket identisch mit dem bind-Port)
    pub port: u16,
    pub data: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    Att(AttWrite<'a>),
    Udp(UdpDatagram<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// Write auf ein fremdes Attribut
    AttributeNotFound,
    /// Datagramm an einen anderen Port
    PortMismatch,
    /// Eingang passt nicht zum konfigurierten Transport
    WrongTransport,
}

impl BridgeError {
    /// Status-Code für die ATT-Antwort
    pub fn att_status(&self) -> u8 {
        match self {
            BridgeError::AttributeNotFound => ATT_ERR_ATTRIBUTE_NOT_FOUND,
            BridgeError::PortMismatch | BridgeError::WrongTransport => ATT_ERR_UNLIKELY,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BridgeError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            BridgeError::AttributeNotFound => defmt::write!(fmt, "Attribute not found"),
            BridgeError::PortMismatch => defmt::write!(fmt, "Port mismatch"),
            BridgeError::WrongTransport => defmt::write!(fmt, "Wrong transport"),
        }
    }
}

/// Der eine Endpunkt, über den Kommandos angenommen werden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Value-Handle der Kommando-Characteristic
    Attribute(u16),
    Port(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportBridge {
    endpoint: Endpoint,
}

impl TransportBridge {
    pub const fn ble(command_handle: u16) -> Self {
        Self {
            endpoint: Endpoint::Attribute(command_handle),
        }
    }

    pub const fn udp(port: u16) -> Self {
        Self {
            endpoint: Endpoint::Port(port),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Prüft einen Eingang
    ///
    /// - `Ok(Some(bytes))`: Nutzdaten für den Parser, max. 127 Bytes
    /// - `Ok(None)`: angenommen, aber nichts zu tun (leer oder Prepare-Write)
    /// - `Err(_)`: abgelehnt
    pub fn accept<'a>(&self, inbound: Inbound<'a>) -> Result<Option<&'a [u8]>, BridgeError> {
        let data = match (self.endpoint, inbound) {
            (Endpoint::Attribute(owned), Inbound::Att(write)) => {
                if write.handle != owned {
                    warn!(
                        "Bridge: write to foreign handle {=u16:#06x} ({} bytes)",
                        write.handle,
                        write.data.len()
                    );
                    return Err(BridgeError::AttributeNotFound);
                }
                if write.transaction_mode != TransactionMode::None {
                    debug!("Bridge: queued write ignored");
                    return Ok(None);
                }
                write.data
            }
            (Endpoint::Port(owned), Inbound::Udp(datagram)) => {
                if datagram.port != owned {
                    warn!("Bridge: datagram for port {} ignored", datagram.port);
                    return Err(BridgeError::PortMismatch);
                }
                datagram.data
            }
            _ => return Err(BridgeError::WrongTransport),
        };

        if data.is_empty() {
            return Ok(None);
        }
        Ok(Some(&data[..data.len().min(MAX_PAYLOAD_LEN)]))
    }

    /// Prüft einen Eingang und gibt die Nutzdaten an den Handler
    pub fn forward<H: PayloadHandler>(
        &self,
        inbound: Inbound<'_>,
        handler: &mut H,
    ) -> Result<Option<DispatchOutcome>, BridgeError> {
        Ok(self
            .accept(inbound)?
            .map(|payload| handler.on_payload(payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANDLE: u16 = 0x002A;

    fn att(handle: u16, data: &[u8]) -> Inbound<'_> {
        Inbound::Att(AttWrite {
            handle,
            transaction_mode: TransactionMode::None,
            data,
        })
    }

    #[test]
    fn test_own_handle_accepted() {
        let bridge = TransportBridge::ble(HANDLE);
        assert_eq!(bridge.accept(att(HANDLE, b"H,5")), Ok(Some(&b"H,5"[..])));
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let bridge = TransportBridge::ble(HANDLE);
        let err = bridge.accept(att(0x0010, b"H,5")).unwrap_err();
        assert_eq!(err, BridgeError::AttributeNotFound);
        assert_eq!(err.att_status(), 0x0A);
    }

    #[test]
    fn test_prepared_write_ignored() {
        let bridge = TransportBridge::ble(HANDLE);
        let inbound = Inbound::Att(AttWrite {
            handle: HANDLE,
            transaction_mode: TransactionMode::Active,
            data: b"H,5",
        });
        assert_eq!(bridge.accept(inbound), Ok(None));
    }

    #[test]
    fn test_udp_port_and_truncation() {
        let bridge = TransportBridge::udp(DEFAULT_UDP_PORT);
        let long = [b'1'; 300];
        let accepted = bridge
            .accept(Inbound::Udp(UdpDatagram {
                port: DEFAULT_UDP_PORT,
                data: &long,
            }))
            .unwrap()
            .unwrap();
        assert_eq!(accepted.len(), 127);

        assert_eq!(
            bridge.accept(Inbound::Udp(UdpDatagram { port: 80, data: b"x" })),
            Err(BridgeError::PortMismatch)
        );
        assert_eq!(bridge.accept(att(HANDLE, b"x")), Err(BridgeError::WrongTransport));
    }
}
