//! Discovery: Gerätename, Adresse und Advertising-Payloads
//!
//! Die Payloads sind bit-genau: jede AD-Struktur ist `[len][type][data]`,
//! wobei `len` die Bytes nach dem Längenbyte zählt.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::traits::RandomSource;

// ============================================================================
// Konstanten
// ============================================================================

/// Basisname des Geräts
pub const DEVICE_NAME: &str = "PSL Motion";

/// Service-UUID `21436587-a9cb-ed0f-1032-547698badcfe` (kanonisch, big-endian)
pub const SERVICE_UUID: [u8; 16] = [
    0x21, 0x43, 0x65, 0x87, 0xa9, 0xcb, 0xed, 0x0f, 0x10, 0x32, 0x54, 0x76, 0x98, 0xba, 0xdc, 0xfe,
];

/// Maximale Länge eines Advertising- oder Scan-Response-Buffers
pub const AD_PAYLOAD_CAPACITY: usize = 31;

/// Platz für den Namen: Buffer minus Längen- und Typ-Byte
pub const NAME_CAPACITY: usize = AD_PAYLOAD_CAPACITY - 2;

/// mDNS-Label-Limit
pub const HOSTNAME_CAPACITY: usize = 63;

pub const AD_TYPE_FLAGS: u8 = 0x01;
pub const AD_TYPE_COMPLETE_128BIT_UUIDS: u8 = 0x07;
pub const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;

/// LE General Discoverable | BR/EDR not supported
pub const AD_FLAGS_GENERAL_DISCOVERABLE: u8 = 0x06;

pub type AdBuffer = Vec<u8, AD_PAYLOAD_CAPACITY>;
pub type DeviceName = String<NAME_CAPACITY>;
pub type Hostname = String<HOSTNAME_CAPACITY>;

/// Service-UUID in Übertragungsreihenfolge (little-endian)
pub const fn service_uuid_le() -> [u8; 16] {
    let mut reversed = [0u8; 16];
    let mut i = 0;
    while i < 16 {
        reversed[i] = SERVICE_UUID[15 - i];
        i += 1;
    }
    reversed
}

// ============================================================================
// Fehler
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    /// Name passt nicht in den Scan-Response-Buffer
    TooLong,
}

#[cfg(feature = "defmt")]
impl defmt::Format for NameError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            NameError::TooLong => defmt::write!(fmt, "Name too long"),
        }
    }
}

// ============================================================================
// Geräte-Identität
// ============================================================================

/// Basisname plus optionaler 16-Bit Suffix (`PSL Motion-1A2B`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    base: &'static str,
    suffix: Option<u16>,
    name: DeviceName,
}

impl DeviceIdentity {
    /// Identität ohne Suffix
    pub fn new(base: &'static str) -> Result<Self, NameError> {
        let mut name = DeviceName::new();
        name.push_str(base).map_err(|_| NameError::TooLong)?;
        Ok(Self {
            base,
            suffix: None,
            name,
        })
    }

    /// Identität mit Suffix aus einem Zufallswert
    pub fn with_random(base: &'static str, random: u32) -> Result<Self, NameError> {
        let mut identity = Self::new(base)?;
        identity.apply_suffix(random);
        Ok(identity)
    }

    /// Neuer Suffix aus der Zufallsquelle
    pub fn regenerate<R: RandomSource>(&mut self, rng: &mut R) {
        self.apply_suffix(rng.next_u32());
        info!("Discovery: device name regenerated");
    }

    /// Setzt `"<base>-%04X"`; passt das nicht, bleibt der Basisname
    fn apply_suffix(&mut self, random: u32) {
        let suffix = (random & 0xFFFF) as u16;
        let mut name = DeviceName::new();
        if write!(name, "{}-{:04X}", self.base, suffix).is_ok() {
            self.name = name;
            self.suffix = Some(suffix);
        } else {
            self.name.clear();
            // passt immer, wurde in new() geprüft
            let _ = self.name.push_str(self.base);
            self.suffix = None;
        }
    }

    pub fn base(&self) -> &'static str {
        self.base
    }

    pub fn suffix(&self) -> Option<u16> {
        self.suffix
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// mDNS-tauglicher Hostname, z.B. `psl-motion-1a2b`
    pub fn hostname(&self) -> Result<Hostname, NameError> {
        let mut hostname = Hostname::new();
        let mut last_dash = true;

        for c in self.base.chars() {
            let mapped = if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else if !last_dash {
                '-'
            } else {
                continue;
            };
            last_dash = mapped == '-';
            hostname.push(mapped).map_err(|_| NameError::TooLong)?;
        }
        while hostname.ends_with('-') {
            hostname.pop();
        }

        if let Some(suffix) = self.suffix {
            write!(hostname, "-{:04x}", suffix).map_err(|_| NameError::TooLong)?;
        }
        Ok(hostname)
    }
}

// ============================================================================
// Geräteadresse
// ============================================================================

/// Random Static Device Address, höchstwertiges Byte zuerst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAddress([u8; 6]);

impl StaticAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Sechs Zufallsbytes, die oberen zwei Bits auf `11` gesetzt
    pub fn from_random<R: RandomSource>(rng: &mut R) -> Self {
        let high = rng.next_u32().to_be_bytes();
        let low = rng.next_u32().to_be_bytes();
        let mut bytes = [high[0], high[1], high[2], high[3], low[0], low[1]];
        bytes[0] = (bytes[0] & 0x3F) | 0xC0;
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 6] {
        self.0
    }

    /// Reihenfolge auf der Luftschnittstelle (niederwertigstes Byte zuerst)
    pub fn to_le_bytes(&self) -> [u8; 6] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }

    pub fn is_static_random(&self) -> bool {
        self.0[0] & 0xC0 == 0xC0
    }
}

impl fmt::Display for StaticAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StaticAddress {
    fn format(&self, fmt: defmt::Formatter) {
        let [a, b, c, d, e, g] = self.0;
        defmt::write!(
            fmt,
            "{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}",
            a,
            b,
            c,
            d,
            e,
            g
        )
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Advertising- und Scan-Response-Daten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPayload {
    pub advertising: AdBuffer,
    pub scan_response: AdBuffer,
}

impl DiscoveryPayload {
    pub fn build(identity: &DeviceIdentity) -> Result<Self, NameError> {
        Ok(Self {
            advertising: advertising_data()?,
            scan_response: scan_response_data(identity.name())?,
        })
    }
}

/// Flags plus vollständige 128-Bit Service-UUID (21 Bytes)
pub fn advertising_data() -> Result<AdBuffer, NameError> {
    let mut buffer = AdBuffer::new();
    push_structure(&mut buffer, AD_TYPE_FLAGS, &[AD_FLAGS_GENERAL_DISCOVERABLE])?;
    push_structure(&mut buffer, AD_TYPE_COMPLETE_128BIT_UUIDS, &service_uuid_le())?;
    Ok(buffer)
}

/// Vollständiger lokaler Name
pub fn scan_response_data(name: &str) -> Result<AdBuffer, NameError> {
    let mut buffer = AdBuffer::new();
    push_structure(&mut buffer, AD_TYPE_COMPLETE_LOCAL_NAME, name.as_bytes())?;
    Ok(buffer)
}

fn push_structure(buffer: &mut AdBuffer, ad_type: u8, data: &[u8]) -> Result<(), NameError> {
    let len = u8::try_from(data.len() + 1).map_err(|_| NameError::TooLong)?;
    buffer.push(len).map_err(|_| NameError::TooLong)?;
    buffer.push(ad_type).map_err(|_| NameError::TooLong)?;
    buffer
        .extend_from_slice(data)
        .map_err(|_| NameError::TooLong)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u32);

    impl RandomSource for Fixed {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_advertising_layout() {
        let data = advertising_data().unwrap();
        assert_eq!(data.len(), 21);
        assert_eq!(&data[..5], &[0x02, 0x01, 0x06, 0x11, 0x07]);
        assert_eq!(data[5], 0xfe);
        assert_eq!(data[20], 0x21);
    }

    #[test]
    fn test_suffix_is_uppercase_hex() {
        let identity = DeviceIdentity::with_random(DEVICE_NAME, 0xDEAD_1A2B).unwrap();
        assert_eq!(identity.name(), "PSL Motion-1A2B");
        assert_eq!(identity.suffix(), Some(0x1A2B));
    }

    #[test]
    fn test_suffix_overflow_falls_back_to_base() {
        // 25 + 5 > 29
        let mut identity = DeviceIdentity::new("ABCDEFGHIJKLMNOPQRSTUVWXY").unwrap();
        identity.regenerate(&mut Fixed(0x1234));
        assert_eq!(identity.name(), "ABCDEFGHIJKLMNOPQRSTUVWXY");
        assert_eq!(identity.suffix(), None);
    }

    #[test]
    fn test_hostname() {
        let identity = DeviceIdentity::with_random(DEVICE_NAME, 0xABCD).unwrap();
        assert_eq!(identity.hostname().unwrap().as_str(), "psl-motion-abcd");
        let plain = DeviceIdentity::new(DEVICE_NAME).unwrap();
        assert_eq!(plain.hostname().unwrap().as_str(), "psl-motion");
    }

    #[test]
    fn test_static_address_top_bits() {
        let address = StaticAddress::from_random(&mut Fixed(0x0011_2233));
        assert_eq!(address.bytes(), [0xC0, 0x11, 0x22, 0x33, 0x00, 0x11]);
        assert!(address.is_static_random());
        assert_eq!(address.to_le_bytes()[5], 0xC0);
    }
}
