// UDP Command Task - empfängt Kommandos der Smartphone-App
//
// Jedes Datagramm läuft durch die TransportBridge (Port-Check, Kürzung
// auf 127 Bytes) und wird dann an den Light-Task weitergereicht.

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_time::{Duration, Timer};
use psl_core::{Inbound, TransportBridge, UdpDatagram};

use crate::config::{
    UDP_COMMAND_PORT, UDP_DATAGRAM_BUFFER_SIZE, UDP_PACKET_METADATA, UDP_RETRY_DELAY_SECS,
    UDP_SOCKET_BUFFER_SIZE,
};
use crate::{Payload, PayloadSender};

/// UDP Command Task
///
/// Wartet auf das Netzwerk, bindet `UDP_COMMAND_PORT` und leitet gültige
/// Pakete über den Channel weiter. Schlägt bind() fehl, wird nach
/// `UDP_RETRY_DELAY_SECS` erneut gebunden.
#[embassy_executor::task]
pub async fn udp_command_task(stack: &'static Stack<'static>, payload_sender: PayloadSender) {
    info!("UDP: Task started, waiting for network...");
    super::wifi::wait_for_network(stack).await;

    let bridge = TransportBridge::udp(UDP_COMMAND_PORT);

    let mut rx_meta = [PacketMetadata::EMPTY; UDP_PACKET_METADATA];
    let mut rx_buffer = [0u8; UDP_SOCKET_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; UDP_PACKET_METADATA];
    let mut tx_buffer = [0u8; UDP_SOCKET_BUFFER_SIZE];

    loop {
        let mut socket = UdpSocket::new(
            *stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );

        if let Err(e) = socket.bind(UDP_COMMAND_PORT) {
            error!("UDP: Failed to bind port {}: {}", UDP_COMMAND_PORT, Debug2Format(&e));
            Timer::after(Duration::from_secs(UDP_RETRY_DELAY_SECS)).await;
            continue;
        }
        info!("UDP: Listening on port {}", UDP_COMMAND_PORT);

        let mut packet = [0u8; UDP_DATAGRAM_BUFFER_SIZE];

        loop {
            // Datagramm ist bei einem Fehler bereits aus der Queue entfernt,
            // der Socket bleibt gebunden
            let (len, meta) = match socket.recv_from(&mut packet).await {
                Ok(received) => received,
                Err(e) => {
                    warn!("UDP: Receive failed: {}", Debug2Format(&e));
                    continue;
                }
            };

            // Ziel-Port: der Socket ist auf UDP_COMMAND_PORT gebunden, die
            // Port-Prüfung der Bridge entspricht hier dem bind()
            let inbound = Inbound::Udp(UdpDatagram {
                port: socket.endpoint().port,
                data: &packet[..len],
            });

            match bridge.accept(inbound) {
                Ok(Some(bytes)) => {
                    // Bridge kürzt bereits auf MAX_PAYLOAD_LEN, passt immer
                    let Ok(payload) = Payload::from_slice(bytes) else {
                        continue;
                    };
                    payload_sender.send(payload).await;
                }
                Ok(None) => {}
                Err(e) => warn!(
                    "UDP: Rejected datagram from {}: {}",
                    Debug2Format(&meta.endpoint),
                    e
                ),
            }
        }
    }
}
