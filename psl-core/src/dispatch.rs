//! Command Dispatcher
//!
//! Besitzt den kompletten Controller-Zustand (Farbe, Segment, Strip) und
//! führt pro Kommando genau eine Zustandsänderung plus einen Render aus.
//! Es gibt genau eine Instanz, die Firmware serialisiert alle Aufrufe.

use crate::color::Hsv;
use crate::command::Command;
use crate::config::ControllerConfig;
use crate::render::SegmentRenderer;
use crate::state::{ColorSnapshot, ColorState, Segment, one_based_to_index};
use crate::traits::{LedError, StripWriter, SystemControl};

/// Ergebnis eines Dispatch-Aufrufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Zustand geändert und Strip neu geschrieben
    Rendered,
    /// Zustand geändert, aber der Strip meldete einen Fehler
    RenderFailed(LedError),
    /// Paket passte auf kein Muster, Zustand unverändert
    Unrecognized,
    /// Kommando ist in dieser Konfiguration deaktiviert
    Ignored,
    /// Neustart wurde angefordert
    Restarting,
}

/// Empfänger für validierte Transport-Payloads
pub trait PayloadHandler {
    fn on_payload(&mut self, payload: &[u8]) -> DispatchOutcome;
}

pub struct CommandDispatcher<W: StripWriter, S: SystemControl> {
    config: ControllerConfig,
    state: ColorState,
    segment: Segment,
    renderer: SegmentRenderer,
    writer: W,
    system: S,
}

impl<W: StripWriter, S: SystemControl> CommandDispatcher<W, S> {
    /// Erstellt den Controller im Initialzustand (noch kein Render)
    pub fn new(config: ControllerConfig, writer: W, system: S) -> Self {
        let config = config.normalized();
        Self {
            state: ColorState::new(config.initial_color, config.brightness_limits()),
            segment: Segment::full(config.strip_length),
            renderer: SegmentRenderer::new(config.strip_length),
            config,
            writer,
            system,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn color_state(&self) -> &ColorState {
        &self.state
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    /// Effektive Farbe, Segment und gepacktes Wort
    pub fn snapshot(&self) -> ColorSnapshot {
        let color: Hsv = self.state.effective();
        ColorSnapshot {
            color,
            segment: self.segment,
            packed_grb: color.to_grb(),
        }
    }

    /// Schreibt den aktuellen Zustand auf den Strip
    pub fn render(&mut self) -> Result<(), LedError> {
        let grb = self.state.effective().to_grb();
        self.renderer.render(&mut self.writer, &self.segment, grb)
    }

    /// Parsen und ausführen in einem Schritt
    pub fn handle_payload(&mut self, payload: &[u8]) -> DispatchOutcome {
        self.dispatch(Command::parse(payload))
    }

    /// Führt ein Kommando aus
    pub fn dispatch(&mut self, command: Command<'_>) -> DispatchOutcome {
        if command.is_segment() && !self.config.segment_control {
            if self.config.diagnostic_logging {
                debug!("Dispatch: segment control disabled, ignoring command");
            }
            return DispatchOutcome::Ignored;
        }

        let strip_length = self.config.strip_length;

        match command {
            Command::Reset => {
                info!("Dispatch: restart requested");
                self.system.request_restart();
                return DispatchOutcome::Restarting;
            }
            Command::SetHue(degrees) => self.state.set_hue(degrees),
            Command::SetBrightnessPercent(percent) => self.state.set_brightness_percent(percent),
            Command::AdjustHue(delta) => self.state.adjust_hue(delta),
            Command::AdjustBrightness(delta) => self.state.adjust_brightness(delta),
            Command::SetSegmentStart(position) => self
                .segment
                .set_start(one_based_to_index(position), strip_length),
            Command::SetSegmentEnd(position) => self
                .segment
                .set_end(one_based_to_index(position), strip_length),
            Command::MotionSample(orientation) => self.state.apply_motion(orientation),
            Command::Unrecognized(raw) => {
                if self.config.diagnostic_logging {
                    debug!("Dispatch: unrecognized packet '{=[u8]:a}'", raw);
                }
                return DispatchOutcome::Unrecognized;
            }
        }

        match self.render() {
            Ok(()) => {
                if self.config.diagnostic_logging {
                    let snapshot = self.snapshot();
                    debug!("Dispatch: {}", snapshot);
                }
                DispatchOutcome::Rendered
            }
            Err(e) => {
                warn!("Dispatch: render failed: {}", e);
                DispatchOutcome::RenderFailed(e)
            }
        }
    }
}

impl<W: StripWriter, S: SystemControl> PayloadHandler for CommandDispatcher<W, S> {
    fn on_payload(&mut self, payload: &[u8]) -> DispatchOutcome {
        self.handle_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingWriter {
        writes: usize,
        last: u32,
    }

    impl StripWriter for CountingWriter {
        fn write_pixel(&mut self, _index: u16, grb: u32) -> Result<(), LedError> {
            self.writes += 1;
            self.last = grb;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Restart {
        requested: bool,
    }

    impl SystemControl for Restart {
        fn request_restart(&mut self) {
            self.requested = true;
        }
    }

    fn dispatcher(config: ControllerConfig) -> CommandDispatcher<CountingWriter, Restart> {
        CommandDispatcher::new(
            config,
            CountingWriter { writes: 0, last: 0 },
            Restart::default(),
        )
    }

    #[test]
    fn test_no_render_before_first_command() {
        let d = dispatcher(ControllerConfig::compact());
        assert_eq!(d.writer().writes, 0);
    }

    #[test]
    fn test_hue_command_renders_full_strip() {
        let mut d = dispatcher(ControllerConfig::compact());
        assert_eq!(d.handle_payload(b"H_SET,0"), DispatchOutcome::Rendered);
        assert_eq!(d.writer().writes, 16);
    }

    #[test]
    fn test_reset_skips_render() {
        let mut d = dispatcher(ControllerConfig::compact());
        assert_eq!(d.dispatch(Command::Reset), DispatchOutcome::Restarting);
        assert!(d.system().requested);
        assert_eq!(d.writer().writes, 0);
    }

    #[test]
    fn test_segment_commands_ignored_when_disabled() {
        let mut d = dispatcher(ControllerConfig::compact());
        assert_eq!(d.dispatch(Command::SetSegmentStart(4)), DispatchOutcome::Ignored);
        assert_eq!(d.segment(), Segment::full(16));
        assert_eq!(d.writer().writes, 0);
    }

    #[test]
    fn test_unrecognized_keeps_state() {
        let mut d = dispatcher(ControllerConfig::full());
        let before = d.snapshot();
        assert_eq!(d.handle_payload(b"hello"), DispatchOutcome::Unrecognized);
        assert_eq!(d.snapshot(), before);
    }
}
