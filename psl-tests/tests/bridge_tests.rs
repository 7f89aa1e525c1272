//! Integration Tests für Transport-Bridge und ATT-Diagnose
//!
//! Eingänge laufen über die Bridge bis in den Dispatcher

mod common;

use common::small_strip;
use psl_core::bridge::{ATT_SUCCESS, DEFAULT_UDP_PORT};
use psl_core::{
    AttPdu, AttWrite, BridgeError, DispatchOutcome, Inbound, TransactionMode, TransportBridge,
    UdpDatagram, describe_att_pdu,
};

const COMMAND_HANDLE: u16 = 0x002A;

fn write(handle: u16, transaction_mode: TransactionMode, data: &[u8]) -> Inbound<'_> {
    Inbound::Att(AttWrite {
        handle,
        transaction_mode,
        data,
    })
}

#[test]
fn test_ble_write_reaches_dispatcher() {
    let bridge = TransportBridge::ble(COMMAND_HANDLE);
    let mut d = small_strip();

    let outcome = bridge
        .forward(write(COMMAND_HANDLE, TransactionMode::None, b"H_SET,90"), &mut d)
        .unwrap();

    assert_eq!(outcome, Some(DispatchOutcome::Rendered));
    assert_eq!(d.color_state().base().hue, 90.0);
}

#[test]
fn test_foreign_handle_never_reaches_parser() {
    let bridge = TransportBridge::ble(COMMAND_HANDLE);
    let mut d = small_strip();

    let result = bridge.forward(write(0x0003, TransactionMode::None, b"RESET"), &mut d);

    assert_eq!(result, Err(BridgeError::AttributeNotFound));
    assert_eq!(result.unwrap_err().att_status(), 0x0A);
    assert_eq!(d.system().restart_requests, 0);
}

#[test]
fn test_empty_and_queued_writes_are_accepted_and_ignored() {
    let bridge = TransportBridge::ble(COMMAND_HANDLE);
    let mut d = small_strip();

    for mode in [
        TransactionMode::Active,
        TransactionMode::Execute,
        TransactionMode::Cancel,
    ] {
        assert_eq!(bridge.forward(write(COMMAND_HANDLE, mode, b"H,10"), &mut d), Ok(None));
    }
    assert_eq!(
        bridge.forward(write(COMMAND_HANDLE, TransactionMode::None, b""), &mut d),
        Ok(None)
    );

    assert_eq!(d.writer().write_count, 0);
    assert_eq!(ATT_SUCCESS, 0);
}

#[test]
fn test_udp_datagram_reaches_dispatcher() {
    let bridge = TransportBridge::udp(DEFAULT_UDP_PORT);
    let mut d = small_strip();

    let outcome = bridge
        .forward(
            Inbound::Udp(UdpDatagram {
                port: DEFAULT_UDP_PORT,
                data: b"SEG_END,8",
            }),
            &mut d,
        )
        .unwrap();

    assert_eq!(outcome, Some(DispatchOutcome::Rendered));
    assert_eq!(d.segment().end(), 7);
}

#[test]
fn test_oversized_datagram_is_truncated() {
    let bridge = TransportBridge::udp(DEFAULT_UDP_PORT);
    let mut datagram = vec![b'0'; 126];
    datagram.extend_from_slice(b"1,2,3");

    let accepted = bridge
        .accept(Inbound::Udp(UdpDatagram {
            port: DEFAULT_UDP_PORT,
            data: &datagram,
        }))
        .unwrap()
        .unwrap();

    assert_eq!(accepted.len(), 127);
    assert_eq!(accepted.last(), Some(&b'1'));
}

#[test]
fn test_socket_sized_datagram_is_truncated_not_rejected() {
    let bridge = TransportBridge::udp(DEFAULT_UDP_PORT);
    let mut datagram = b"H_SET,120".to_vec();
    datagram.resize(1024, b' ');

    let mut d = small_strip();
    let outcome = bridge
        .forward(
            Inbound::Udp(UdpDatagram {
                port: DEFAULT_UDP_PORT,
                data: &datagram,
            }),
            &mut d,
        )
        .unwrap();

    assert_eq!(outcome, Some(DispatchOutcome::Rendered));
    assert_eq!(d.color_state().base().hue, 120.0);

    // gleiches Datagramm an einen anderen Port
    assert_eq!(
        bridge.accept(Inbound::Udp(UdpDatagram {
            port: DEFAULT_UDP_PORT + 1,
            data: &datagram,
        })),
        Err(BridgeError::PortMismatch)
    );
}

#[test]
fn test_transport_mismatch() {
    let bridge = TransportBridge::udp(DEFAULT_UDP_PORT);
    assert_eq!(
        bridge.accept(write(COMMAND_HANDLE, TransactionMode::None, b"H,1")),
        Err(BridgeError::WrongTransport)
    );
}

#[test]
fn test_att_pdu_classification() {
    assert_eq!(
        describe_att_pdu(&[0x08, 0x01, 0x00, 0xFF, 0xFF, 0x03, 0x28]),
        AttPdu::ReadByTypeRequest {
            start: Some(1),
            end: Some(0xFFFF)
        }
    );
    assert_eq!(
        describe_att_pdu(&[0x12, 0x2A, 0x00, b'B', b',', b'1']),
        AttPdu::WriteRequest {
            handle: Some(COMMAND_HANDLE),
            len: 3
        }
    );
    assert_eq!(
        describe_att_pdu(&[0x03, 0x17, 0x00]),
        AttPdu::MtuResponse {
            server_mtu: Some(23)
        }
    );
}
