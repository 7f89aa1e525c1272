//! Advertising-Lebenszyklus für einen BLE-Host
//!
//! Der eigentliche Host-Stack ist extern. Hier liegen nur die Parameter,
//! die aktuellen Payloads und der Zustand (aktiv, verbunden). Nach einem
//! Disconnect wird Advertising automatisch wieder gestartet.

use crate::discovery::{DeviceIdentity, DiscoveryPayload, NameError, StaticAddress};

/// Intervall in Einheiten von 0.625 ms (0x0030 = 30 ms)
pub const ADV_INTERVAL: u16 = 0x0030;

/// Kanäle 37, 38 und 39
pub const ADV_CHANNEL_MAP_ALL: u8 = 0x07;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisingKind {
    /// ADV_IND
    ConnectableUndirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvertisingParams {
    pub interval_min: u16,
    pub interval_max: u16,
    pub kind: AdvertisingKind,
    pub channel_map: u8,
}

impl Default for AdvertisingParams {
    fn default() -> Self {
        Self {
            interval_min: ADV_INTERVAL,
            interval_max: ADV_INTERVAL,
            kind: AdvertisingKind::ConnectableUndirected,
            channel_map: ADV_CHANNEL_MAP_ALL,
        }
    }
}

pub struct Advertiser {
    params: AdvertisingParams,
    address: StaticAddress,
    payload: DiscoveryPayload,
    advertising: bool,
    connected: bool,
}

impl Advertiser {
    pub fn new(identity: &DeviceIdentity, address: StaticAddress) -> Result<Self, NameError> {
        Ok(Self {
            params: AdvertisingParams::default(),
            address,
            payload: DiscoveryPayload::build(identity)?,
            advertising: false,
            connected: false,
        })
    }

    pub fn params(&self) -> &AdvertisingParams {
        &self.params
    }

    pub fn address(&self) -> StaticAddress {
        self.address
    }

    pub fn payload(&self) -> &DiscoveryPayload {
        &self.payload
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Neue Identität oder Adresse: Payloads neu bauen
    ///
    /// Bei einem Fehler bleiben die bisherigen Payloads bestehen.
    pub fn refresh(
        &mut self,
        identity: &DeviceIdentity,
        address: StaticAddress,
    ) -> Result<(), NameError> {
        self.payload = DiscoveryPayload::build(identity)?;
        self.address = address;
        debug!("Advertising: payload rebuilt for {}", address);
        Ok(())
    }

    /// Startet Advertising, `true` wenn sich der Zustand geändert hat
    pub fn start(&mut self) -> bool {
        if self.advertising || self.connected {
            return false;
        }
        self.advertising = true;
        info!("Advertising: started");
        true
    }

    /// Stoppt Advertising, `true` wenn sich der Zustand geändert hat
    pub fn stop(&mut self) -> bool {
        if !self.advertising {
            return false;
        }
        self.advertising = false;
        info!("Advertising: stopped");
        true
    }

    /// Ein Central hat sich verbunden, der Controller stoppt dann das Advertising
    pub fn on_connect(&mut self) {
        self.connected = true;
        self.advertising = false;
    }

    /// Verbindung getrennt: Advertising wieder aufnehmen
    pub fn on_disconnect(&mut self) -> bool {
        self.connected = false;
        self.start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DEVICE_NAME;

    fn advertiser() -> Advertiser {
        let identity = DeviceIdentity::with_random(DEVICE_NAME, 0x0042).unwrap();
        Advertiser::new(&identity, StaticAddress::new([0xC1, 2, 3, 4, 5, 6])).unwrap()
    }

    #[test]
    fn test_default_params() {
        let params = AdvertisingParams::default();
        assert_eq!(params.interval_min, 0x0030);
        assert_eq!(params.channel_map, 0x07);
    }

    #[test]
    fn test_start_stop_idempotent() {
        let mut adv = advertiser();
        assert!(adv.start());
        assert!(!adv.start());
        assert!(adv.stop());
        assert!(!adv.stop());
    }

    #[test]
    fn test_restart_after_disconnect() {
        let mut adv = advertiser();
        adv.start();
        adv.on_connect();
        assert!(!adv.is_advertising());
        assert!(!adv.start());
        assert!(adv.on_disconnect());
        assert!(adv.is_advertising());
    }

    #[test]
    fn test_refresh_rebuilds_scan_response() {
        let mut adv = advertiser();
        let identity = DeviceIdentity::with_random(DEVICE_NAME, 0xBEEF).unwrap();
        adv.refresh(&identity, StaticAddress::new([0xC0; 6])).unwrap();
        assert_eq!(&adv.payload().scan_response[2..], b"PSL Motion-BEEF");
        assert_eq!(adv.address().bytes(), [0xC0; 6]);
    }
}
