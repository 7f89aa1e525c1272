// Light Task - besitzt den Controller und rendert auf den Strip
use defmt::{error, info, warn};
use esp_hal_smartled::smart_led_buffer;
use static_cell::StaticCell;

use crate::config::{LED_BUFFER_SIZE, LED_COUNT, RMT_CLOCK_MHZ, controller_config};
use crate::hal::{EspSystemControl, RmtStripWriter};
use crate::{CommandDispatcher, DispatchOutcome, PayloadReceiver, StripWriter, SystemControl};

/// Light Logic - Testbare Steuerungs-Logik ohne Hardware-Abhängigkeit
///
/// - Rendert einmal den Initialzustand
/// - Wartet auf Kommando-Pakete vom Transport-Task
/// - Führt jedes Paket vollständig aus, bevor das nächste gelesen wird
///
/// # Trait-basierte Abstraktion
/// Die generischen Parameter erlauben den RMT-Writer im Production-Code
/// und Mocks auf dem Host.
pub async fn light_logic<W: StripWriter, S: SystemControl>(
    mut controller: CommandDispatcher<W, S>,
    payload_receiver: PayloadReceiver,
) {
    match controller.render() {
        Ok(()) => info!("Light: initial state {}", controller.snapshot()),
        Err(e) => error!("Light: initial render failed: {}", e),
    }

    loop {
        let payload = payload_receiver.receive().await;

        match controller.handle_payload(&payload) {
            DispatchOutcome::Rendered | DispatchOutcome::Ignored => {}
            DispatchOutcome::RenderFailed(e) => error!("Light: strip write failed: {}", e),
            DispatchOutcome::Unrecognized => {
                if controller.config().diagnostic_logging {
                    warn!("Light: unrecognized command ({} bytes)", payload.len())
                }
            }
            // kommt auf der Hardware nicht zurück
            DispatchOutcome::Restarting => info!("Light: restarting"),
        }
    }
}

/// Light Task - Embassy Task für parallele Ausführung
///
/// Initialisiert RMT und Strip Writer und ruft dann `light_logic()` auf.
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für die Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `payload_receiver`: Channel Receiver für Kommando-Pakete
#[embassy_executor::task]
pub async fn light_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    payload_receiver: PayloadReceiver,
) {
    // Buffer zu groß für den Task-Stack
    static RMT_BUFFER: StaticCell<[esp_hal::rmt::PulseCode; LED_BUFFER_SIZE]> = StaticCell::new();
    let rmt_buffer = RMT_BUFFER.init_with(|| smart_led_buffer!(LED_COUNT));

    let writer = match RmtStripWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, rmt_buffer) {
        Ok(writer) => writer,
        Err(e) => {
            error!("Light: RMT init failed: {}", e);
            discard_payloads(payload_receiver).await
        }
    };

    let config = controller_config();
    info!(
        "Light: {} LEDs, segment control: {}, transport: {}",
        config.strip_length, config.segment_control, config.transport
    );

    let controller = CommandDispatcher::new(config, writer, EspSystemControl);
    light_logic(controller, payload_receiver).await;
}

/// Ohne Strip werden Pakete weiter abgeholt und verworfen,
/// damit der UDP-Task nicht am vollen Channel hängt
async fn discard_payloads(payload_receiver: PayloadReceiver) -> ! {
    loop {
        let payload = payload_receiver.receive().await;
        warn!("Light: no strip, dropped {} bytes", payload.len());
    }
}
