// mDNS Responder Task - Advertised Hostname via Multicast DNS
//
// Dieser Task implementiert einen mDNS (Multicast DNS) Responder nach RFC 6762.
// Der Controller wird damit unter seinem Gerätenamen (z.B. "psl-motion-1a2b.local")
// im lokalen Netzwerk erreichbar; die App findet so die Adresse für UDP-Kommandos.
//
// Technische Details:
// - Protokoll: mDNS (RFC 6762)
// - Transport: UDP Multicast auf 224.0.0.251:5353
// - Unterstützt: A-Records (IPv4 Hostname-Auflösung)
// - Library: edge-mdns 0.6.1 (no_std)
// - Adapter: edge-nal-embassy 0.7.0 (embassy-net Integration)

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use core::net::{Ipv4Addr, SocketAddr};
use core::sync::atomic::{AtomicU32, Ordering};

use edge_mdns::{HostAnswersMdnsHandler, buf::VecBufAccess, domain::base::Ttl, host::Host, io};
use edge_nal::{MulticastV4, UdpBind, UdpSplit};
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use crate::config::{
    MDNS_MULTICAST_ADDR, MDNS_PACKET_BUFFER_SIZE, MDNS_PORT, MDNS_RECONNECT_DELAY_SECS,
    MDNS_TTL_SECS, MDNS_UDP_BUFFER_SIZE,
};
use crate::tasks::wifi::wait_for_network;

/// Atomischer Counter für Random Number Generator
///
/// Wird für mDNS Transaction IDs verwendet. Ein einfacher Counter
/// ist für mDNS ausreichend, da keine kryptographische Sicherheit
/// benötigt wird.
static RNG_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Random Number Generator für mDNS
///
/// Generiert Pseudo-Zufallszahlen basierend auf einem atomischen Counter.
/// Wird von edge-mdns für Transaction IDs und Query IDs verwendet.
///
/// # Parameter
/// - `buf`: Buffer der mit Zufallsbytes gefüllt werden soll
///
/// # Implementierung
/// Nutzt einen wrapping counter statt echter Zufallszahlen.
/// Für mDNS-Protokoll ausreichend, da nur Eindeutigkeit benötigt wird.
fn mdns_rng(buf: &mut [u8]) {
    let mut counter = RNG_COUNTER.fetch_add(1, Ordering::Relaxed);
    for chunk in buf.chunks_mut(4) {
        let bytes = counter.to_le_bytes();
        let len = chunk.len().min(4);
        chunk[..len].copy_from_slice(&bytes[..len]);
        counter = counter.wrapping_add(1);
    }
}

/// mDNS Responder Task
///
/// Advertised den Controller unter `<hostname>.local`. Der Hostname kommt
/// aus der Geräte-Identität (gleicher Suffix wie der BLE-Gerätename).
///
/// 1. Wartet auf WiFi-Link und DHCP-Adresse
/// 2. Bindet `0.0.0.0:5353` und joined `224.0.0.251`
/// 3. Beantwortet A-Record Queries (Hostname → IPv4)
/// 4. Bei jedem Fehler: Reconnect nach `MDNS_RECONNECT_DELAY_SECS`
///
/// # Parameter
/// - `stack`: embassy-net Stack (shared mit allen Tasks)
/// - `hostname`: Hostname ohne `.local` Suffix
#[embassy_executor::task]
pub async fn mdns_responder_task(stack: &'static Stack<'static>, hostname: &'static str) {
    info!("mDNS: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("mDNS: Network ready");

    loop {
        match run_mdns_responder(stack, hostname).await {
            Ok(_) => warn!("mDNS: Responder stopped normally"),
            Err(e) => error!("mDNS: Error: {}", e),
        }
        info!("mDNS: Reconnecting in {}s...", MDNS_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MDNS_RECONNECT_DELAY_SECS)).await;
    }
}

/// Führt mDNS Responder Loop aus
///
/// Kehrt nur bei Fehlern zurück. UDP_BUFFERS wird nur einmal initialisiert,
/// weitere Aufrufe nach einem Reconnect nutzen die vorhandene Referenz.
async fn run_mdns_responder(
    stack: &'static Stack<'static>,
    hostname: &'static str,
) -> Result<(), MdnsError> {
    // IP-Adresse vom DHCP holen (kann nach Link-Verlust fehlen)
    let our_ip = stack
        .config_v4()
        .ok_or(MdnsError::NoAddress)?
        .address
        .address();
    info!("mDNS: Using IP {}", Debug2Format(&our_ip));

    // UDP Adapter erstellen (edge-nal-embassy → embassy-net)
    // StaticCell wird nur einmal initialisiert, weitere Calls returnen existierende Referenz
    // Wichtig für Reconnect-Loop: Verhindert Panic bei wiederholter Initialisierung
    static UDP_BUFFERS: static_cell::StaticCell<
        UdpBuffers<1, MDNS_UDP_BUFFER_SIZE, MDNS_UDP_BUFFER_SIZE>,
    > = static_cell::StaticCell::new();
    let udp_buffers = UDP_BUFFERS.init_with(|| UdpBuffers::new());
    let udp_stack = Udp::new(*stack, udp_buffers);

    // Multicast Socket auf 0.0.0.0:MDNS_PORT binden
    // UNSPECIFIED = alle Interfaces (WiFi in unserem Fall)
    let mut socket = udp_stack
        .bind(SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), MDNS_PORT))
        .await
        .map_err(|_| MdnsError::SocketBindFailed)?;

    // Join Multicast-Gruppe (mDNS IPv4)
    // Ermöglicht Empfang von mDNS-Queries auf 224.0.0.251
    socket
        .join_v4(Ipv4Addr::from(MDNS_MULTICAST_ADDR), Ipv4Addr::UNSPECIFIED)
        .await
        .map_err(|_| MdnsError::MulticastJoinFailed)?;

    // Socket in RX/TX splitten für edge-mdns API
    let (recv, send) = socket.split();

    // Host-Konfiguration für mDNS Responses
    let host = Host {
        hostname,                           // Hostname ohne .local Suffix
        ipv4: our_ip.into(),                // Unsere IPv4-Adresse vom DHCP
        ipv6: [0u8; 16].into(),             // IPv6 nicht unterstützt (kein proto-ipv6 in smoltcp)
        ttl: Ttl::from_secs(MDNS_TTL_SECS), // Cache-Dauer für Clients
    };

    // mDNS Packet Buffers (stack-allocated)
    // Größe: MDNS_PACKET_BUFFER_SIZE (1500 Bytes = Standard MTU)
    let recv_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();
    let send_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();

    // Signal für Broadcast-Notifications (nicht verwendet, aber von API benötigt)
    let signal = Signal::<NoopRawMutex, ()>::new();

    // mDNS Responder erstellen
    let mdns = io::Mdns::new(
        Some(our_ip), // IPv4 Interface
        None,         // Kein IPv6
        recv,         // UDP RX
        send,         // UDP TX
        recv_buf,     // RX Buffer
        send_buf,     // TX Buffer
        mdns_rng,     // RNG für Transaction IDs
        &signal,      // Broadcast Signal
    );

    info!("mDNS: Responder running, advertising '{}.local'", hostname);

    // Blocking: Läuft bis Fehler auftritt
    // HostAnswersMdnsHandler implementiert einfache A-Record Responses
    // (nur Hostname → IP, kein Service Discovery)
    mdns.run(HostAnswersMdnsHandler::new(&host))
        .await
        .map_err(|_| MdnsError::ResponderFailed)?;

    Ok(())
}

/// mDNS Fehler-Typen
///
/// Alle möglichen Fehler die während mDNS-Operationen auftreten können.
/// Jeder Fehler führt zu einem Reconnect-Versuch im Haupt-Loop.
#[derive(Debug)]
enum MdnsError {
    /// Keine IPv4-Adresse (DHCP-Lease verloren)
    NoAddress,

    /// UDP Socket konnte nicht auf Port MDNS_PORT gebunden werden
    ///
    /// Mögliche Ursachen:
    /// - Port bereits belegt (unwahrscheinlich)
    /// - Keine Socket-Ressourcen verfügbar
    SocketBindFailed,

    /// Multicast-Gruppe konnte nicht gejoint werden
    ///
    /// Mögliche Ursachen:
    /// - Netzwerk-Interface nicht bereit
    /// - Multicast nicht unterstützt (sehr unwahrscheinlich bei WiFi)
    MulticastJoinFailed,

    /// mDNS Responder Loop ist fehlgeschlagen
    ///
    /// Mögliche Ursachen:
    /// - Netzwerk-Verbindung verloren
    /// - UDP Socket-Fehler
    /// - Buffer-Overflow (sehr unwahrscheinlich mit 1500 Byte Buffers)
    ResponderFailed,
}

impl defmt::Format for MdnsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MdnsError::NoAddress => defmt::write!(fmt, "No IPv4 address"),
            MdnsError::SocketBindFailed => defmt::write!(fmt, "Socket bind failed"),
            MdnsError::MulticastJoinFailed => defmt::write!(fmt, "Multicast join failed"),
            MdnsError::ResponderFailed => defmt::write!(fmt, "Responder failed"),
        }
    }
}
