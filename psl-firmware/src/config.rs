// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use psl_core::ControllerConfig;
use psl_core::bridge::DEFAULT_UDP_PORT;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die Datenleitung des Strips (WS2812)
pub const LED_GPIO_PIN: u8 = 8;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs im Strip
#[cfg(not(feature = "compact"))]
pub const LED_COUNT: usize = 300;

/// Anzahl der LEDs im Strip (Test-Aufbau)
#[cfg(feature = "compact")]
pub const LED_COUNT: usize = 16;

/// RMT Pulse-Buffer: 24 Bits pro LED + 1 Reset
pub const LED_BUFFER_SIZE: usize = LED_COUNT * 24 + 1;

/// Controller-Konfiguration passend zur Hardware-Variante
pub const fn controller_config() -> ControllerConfig {
    #[cfg(not(feature = "compact"))]
    let config = ControllerConfig::full();
    #[cfg(feature = "compact")]
    let config = ControllerConfig::compact();

    config.with_strip_length(LED_COUNT as u16)
}

// ============================================================================
// Kommando-Transport (UDP)
// ============================================================================

/// UDP-Port für Kommandos der Smartphone-App
pub const UDP_COMMAND_PORT: u16 = DEFAULT_UDP_PORT;

/// Anzahl Pakete, die zwischen UDP- und Light-Task gepuffert werden
/// Bewegungsdaten kommen schnell, ältere Pakete dürfen warten
pub const COMMAND_QUEUE_DEPTH: usize = 4;

/// UDP RX/TX Buffer-Größe in Bytes
pub const UDP_SOCKET_BUFFER_SIZE: usize = 1024;

/// Anzahl Paket-Metadaten im Socket
pub const UDP_PACKET_METADATA: usize = 8;

/// Empfangs-Buffer für ein Datagramm
///
/// So groß wie der Socket-Buffer: jedes gepufferte Datagramm passt komplett
/// hinein, gekürzt wird erst in der Bridge (auf 127 Bytes).
pub const UDP_DATAGRAM_BUFFER_SIZE: usize = UDP_SOCKET_BUFFER_SIZE;

const _: () = assert!(UDP_DATAGRAM_BUFFER_SIZE >= UDP_SOCKET_BUFFER_SIZE);

/// Wartezeit nach Socket-Fehlern
pub const UDP_RETRY_DELAY_SECS: u64 = 5;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Heap-Größe für WiFi (Bytes)
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Wartezeit vor erneutem Verbindungsversuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Socket-Ressourcen für embassy-net: Kommando-UDP + mDNS + DHCP
pub const NET_SOCKET_COUNT: usize = 4;

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS TTL (Time To Live) in Sekunden
pub const MDNS_TTL_SECS: u32 = 120;

/// mDNS Reconnect Delay in Sekunden
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// mDNS Port (Standard: 5353, RFC 6762)
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 Multicast-Adresse (224.0.0.251)
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX in Bytes)
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Receive/Send Buffer-Größen in Bytes
/// 1500 Bytes = Standard MTU für Ethernet/WiFi
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;
