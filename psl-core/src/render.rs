//! Segment-Renderer
//!
//! Schreibt bei jedem Aufruf den kompletten Strip: Pixel im Segment
//! bekommen die Farbe, alle anderen werden explizit ausgeschaltet.

use crate::color::OFF;
use crate::state::Segment;
use crate::traits::{LedError, StripWriter};

/// Rendert eine Farbe auf einen Strip fester Länge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRenderer {
    strip_length: u16,
}

impl SegmentRenderer {
    pub fn new(strip_length: u16) -> Self {
        Self { strip_length }
    }

    pub fn strip_length(&self) -> u16 {
        self.strip_length
    }

    /// Schreibt genau `strip_length` Wörter und schließt den Frame ab
    ///
    /// Ein fehlgeschlagener Pixel-Write bricht den Frame nicht ab; der erste
    /// Fehler wird nach dem Frame zurückgegeben.
    pub fn render<W: StripWriter>(
        &self,
        writer: &mut W,
        segment: &Segment,
        grb: u32,
    ) -> Result<(), LedError> {
        let mut first_error = None;

        for index in 0..self.strip_length {
            let word = if segment.contains(index) { grb } else { OFF };
            if let Err(e) = writer.write_pixel(index, word) {
                first_error.get_or_insert(e);
            }
        }

        if let Err(e) = writer.latch() {
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimaler Writer mit festem Buffer (kein std im Core)
    struct FrameWriter {
        frame: [u32; 8],
        writes: usize,
        latches: usize,
        fail_index: Option<u16>,
    }

    impl FrameWriter {
        fn new() -> Self {
            Self {
                frame: [u32::MAX; 8],
                writes: 0,
                latches: 0,
                fail_index: None,
            }
        }
    }

    impl StripWriter for FrameWriter {
        fn write_pixel(&mut self, index: u16, grb: u32) -> Result<(), LedError> {
            self.writes += 1;
            if self.fail_index == Some(index) {
                return Err(LedError::WriteFailed);
            }
            self.frame[usize::from(index)] = grb;
            Ok(())
        }

        fn latch(&mut self) -> Result<(), LedError> {
            self.latches += 1;
            Ok(())
        }
    }

    #[test]
    fn test_full_segment_lights_every_pixel() {
        let mut writer = FrameWriter::new();
        SegmentRenderer::new(8)
            .render(&mut writer, &Segment::full(8), 0x00_FF_00)
            .unwrap();
        assert_eq!(writer.frame, [0x00_FF_00; 8]);
        assert_eq!(writer.writes, 8);
        assert_eq!(writer.latches, 1);
    }

    #[test]
    fn test_pixels_outside_segment_are_off() {
        let mut writer = FrameWriter::new();
        let mut segment = Segment::full(8);
        segment.set_start(2, 8);
        segment.set_end(4, 8);

        SegmentRenderer::new(8)
            .render(&mut writer, &segment, 0x12_34_56)
            .unwrap();

        assert_eq!(
            writer.frame,
            [0, 0, 0x12_34_56, 0x12_34_56, 0x12_34_56, 0, 0, 0]
        );
    }

    #[test]
    fn test_failed_pixel_does_not_shorten_frame() {
        let mut writer = FrameWriter::new();
        writer.fail_index = Some(3);

        let result = SegmentRenderer::new(8).render(&mut writer, &Segment::full(8), 1);

        assert_eq!(result, Err(LedError::WriteFailed));
        assert_eq!(writer.writes, 8);
        assert_eq!(writer.latches, 1);
    }
}
