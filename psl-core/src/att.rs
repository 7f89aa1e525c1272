//! ATT-PDU Klassifizierung für Diagnose-Logs

/// Grobe Einordnung einer ATT-PDU anhand des Opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttPdu {
    ErrorResponse,
    MtuRequest { client_mtu: Option<u16> },
    MtuResponse { server_mtu: Option<u16> },
    ReadByTypeRequest { start: Option<u16>, end: Option<u16> },
    ReadByGroupTypeRequest { start: Option<u16>, end: Option<u16> },
    ReadRequest { handle: Option<u16> },
    ReadBlobRequest { handle: Option<u16> },
    /// Read Multiple (0x0E) und Read Multiple Variable (0x20)
    ReadMultipleRequest { handles: usize },
    WriteRequest { handle: Option<u16>, len: usize },
    WriteCommand { handle: Option<u16>, len: usize },
    SignedWriteCommand { handle: Option<u16> },
    Other(u8),
    Empty,
}

pub const ATT_ERROR_RSP: u8 = 0x01;
pub const ATT_EXCHANGE_MTU_REQ: u8 = 0x02;
pub const ATT_EXCHANGE_MTU_RSP: u8 = 0x03;
pub const ATT_READ_BY_TYPE_REQ: u8 = 0x08;
pub const ATT_READ_REQ: u8 = 0x0A;
pub const ATT_READ_BLOB_REQ: u8 = 0x0C;
pub const ATT_READ_MULTIPLE_REQ: u8 = 0x0E;
pub const ATT_READ_BY_GROUP_TYPE_REQ: u8 = 0x10;
pub const ATT_READ_MULTIPLE_VARIABLE_REQ: u8 = 0x20;
pub const ATT_WRITE_REQ: u8 = 0x12;
pub const ATT_WRITE_CMD: u8 = 0x52;
pub const ATT_SIGNED_WRITE_CMD: u8 = 0xD2;

fn le_u16(pdu: &[u8], offset: usize) -> Option<u16> {
    let bytes = pdu.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Klassifiziert eine rohe ATT-PDU
///
/// Zu kurze PDUs liefern `None` für die fehlenden Felder statt eines Fehlers.
pub fn describe_att_pdu(pdu: &[u8]) -> AttPdu {
    let Some(&opcode) = pdu.first() else {
        return AttPdu::Empty;
    };

    match opcode {
        ATT_ERROR_RSP => AttPdu::ErrorResponse,
        ATT_EXCHANGE_MTU_REQ => AttPdu::MtuRequest {
            client_mtu: le_u16(pdu, 1),
        },
        ATT_EXCHANGE_MTU_RSP => AttPdu::MtuResponse {
            server_mtu: le_u16(pdu, 1),
        },
        ATT_READ_BY_TYPE_REQ => AttPdu::ReadByTypeRequest {
            start: le_u16(pdu, 1),
            end: le_u16(pdu, 3),
        },
        ATT_READ_BY_GROUP_TYPE_REQ => AttPdu::ReadByGroupTypeRequest {
            start: le_u16(pdu, 1),
            end: le_u16(pdu, 3),
        },
        ATT_READ_REQ => AttPdu::ReadRequest {
            handle: le_u16(pdu, 1),
        },
        ATT_READ_BLOB_REQ => AttPdu::ReadBlobRequest {
            handle: le_u16(pdu, 1),
        },
        ATT_READ_MULTIPLE_REQ | ATT_READ_MULTIPLE_VARIABLE_REQ => AttPdu::ReadMultipleRequest {
            handles: pdu.len().saturating_sub(1) / 2,
        },
        ATT_WRITE_REQ => AttPdu::WriteRequest {
            handle: le_u16(pdu, 1),
            len: pdu.len().saturating_sub(3),
        },
        ATT_WRITE_CMD => AttPdu::WriteCommand {
            handle: le_u16(pdu, 1),
            len: pdu.len().saturating_sub(3),
        },
        ATT_SIGNED_WRITE_CMD => AttPdu::SignedWriteCommand {
            handle: le_u16(pdu, 1),
        },
        other => AttPdu::Other(other),
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AttPdu {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AttPdu::ErrorResponse => defmt::write!(fmt, "Error Response"),
            AttPdu::MtuRequest { client_mtu } => {
                defmt::write!(fmt, "MTU Request (client MTU {})", client_mtu)
            }
            AttPdu::MtuResponse { server_mtu } => {
                defmt::write!(fmt, "MTU Response (server MTU {})", server_mtu)
            }
            AttPdu::ReadByTypeRequest { start, end } => {
                defmt::write!(fmt, "Read By Type Request ({}..{})", start, end)
            }
            AttPdu::ReadByGroupTypeRequest { start, end } => {
                defmt::write!(fmt, "Read By Group Type Request ({}..{})", start, end)
            }
            AttPdu::ReadRequest { handle } => defmt::write!(fmt, "Read Request (handle {})", handle),
            AttPdu::ReadBlobRequest { handle } => {
                defmt::write!(fmt, "Read Blob Request (handle {})", handle)
            }
            AttPdu::ReadMultipleRequest { handles } => {
                defmt::write!(fmt, "Read Multiple Request ({} handles)", handles)
            }
            AttPdu::WriteRequest { handle, len } => {
                defmt::write!(fmt, "Write Request (handle {}, {} bytes)", handle, len)
            }
            AttPdu::WriteCommand { handle, len } => {
                defmt::write!(fmt, "Write Command (handle {}, {} bytes)", handle, len)
            }
            AttPdu::SignedWriteCommand { handle } => {
                defmt::write!(fmt, "Signed Write Command (handle {})", handle)
            }
            AttPdu::Other(opcode) => defmt::write!(fmt, "opcode {=u8:#04x}", *opcode),
            AttPdu::Empty => defmt::write!(fmt, "empty PDU"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mtu_request() {
        assert_eq!(
            describe_att_pdu(&[0x02, 0xF7, 0x00]),
            AttPdu::MtuRequest { client_mtu: Some(247) }
        );
    }

    #[test]
    fn test_read_by_group_type_range() {
        assert_eq!(
            describe_att_pdu(&[0x10, 0x01, 0x00, 0xFF, 0xFF, 0x00, 0x28]),
            AttPdu::ReadByGroupTypeRequest {
                start: Some(0x0001),
                end: Some(0xFFFF)
            }
        );
    }

    #[test]
    fn test_write_command_length() {
        assert_eq!(
            describe_att_pdu(&[0x52, 0x2A, 0x00, b'H', b',', b'5']),
            AttPdu::WriteCommand {
                handle: Some(0x002A),
                len: 3
            }
        );
    }

    #[test]
    fn test_truncated_and_unknown() {
        assert_eq!(describe_att_pdu(&[]), AttPdu::Empty);
        assert_eq!(describe_att_pdu(&[0x0A]), AttPdu::ReadRequest { handle: None });
        assert_eq!(describe_att_pdu(&[0x1B]), AttPdu::Other(0x1B));
        assert_eq!(
            describe_att_pdu(&[0x0E, 0x03, 0x00, 0x05, 0x00]),
            AttPdu::ReadMultipleRequest { handles: 2 }
        );
    }
}
