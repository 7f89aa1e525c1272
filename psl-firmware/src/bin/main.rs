// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use psl_core::discovery::{DEVICE_NAME, Hostname};
use psl_core::{Advertiser, DeviceIdentity, StaticAddress};
use psl_firmware::PayloadChannel;
use psl_firmware::config::{EXTRA_HEAP_SIZE, NET_SOCKET_COUNT, WIFI_HEAP_SIZE};
use psl_firmware::hal::HardwareRandom;
use psl_firmware::tasks::{
    connection_task, dhcp_task, light_task, mdns_responder_task, net_task, udp_command_task,
};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, Geräte-Identität und WiFi, startet Embassy
/// Runtime und spawnt Tasks. Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Geräte-Identität: Namens-Suffix und Adresse aus dem Hardware RNG
    // (Radio läuft bereits, RNG liefert echte Zufallszahlen)
    let mut random = HardwareRandom::new();
    let mut identity = DeviceIdentity::new(DEVICE_NAME).expect("Device name too long");
    identity.regenerate(&mut random);
    let address = StaticAddress::from_random(&mut random);

    let advertiser = Advertiser::new(&identity, address).expect("Discovery payload too long");
    info!("Discovery: name '{}', address {}", identity.name(), address);
    info!(
        "Discovery: adv data {=[u8]:02x}",
        advertiser.payload().advertising.as_slice()
    );
    info!(
        "Discovery: scan response {=[u8]:02x}",
        advertiser.payload().scan_response.as_slice()
    );

    static HOSTNAME: static_cell::StaticCell<Hostname> = static_cell::StaticCell::new();
    let hostname: &'static Hostname =
        HOSTNAME.init(identity.hostname().expect("Hostname too long"));

    // Netzwerk-Stack erstellen (Seed vom Hardware RNG)
    let seed = random.seed();

    static RESOURCES: static_cell::StaticCell<StackResources<NET_SOCKET_COUNT>> =
        static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Command-Channel erstellen (UDP → Light)
    // Nur der Light-Task besitzt den Controller, alle Kommandos laufen seriell
    static PAYLOAD_CHANNEL: static_cell::StaticCell<PayloadChannel> =
        static_cell::StaticCell::new();
    let payload_channel = &*PAYLOAD_CHANNEL.init(PayloadChannel::new());

    // Spawn Light Task (rendert Initialzustand, wartet dann auf Kommandos)
    spawner
        .spawn(light_task(
            peripherals.GPIO8,
            peripherals.RMT,
            payload_channel.receiver(),
        ))
        .unwrap();

    // Spawn WiFi Tasks
    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // Spawn UDP Command Task
    spawner
        .spawn(udp_command_task(stack, payload_channel.sender()))
        .unwrap();

    // Spawn mDNS Responder Task (<hostname>.local)
    spawner
        .spawn(mdns_responder_task(stack, hostname.as_str()))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
