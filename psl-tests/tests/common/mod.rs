//! Gemeinsame Mocks für die Integration Tests
//!
//! Jede Test-Datei nutzt nur einen Teil davon.
#![allow(dead_code)]

use psl_core::{
    CommandDispatcher, ControllerConfig, LedError, RandomSource, StripWriter, SystemControl,
};

// ============================================================================
// Mock Strip Writer
// ============================================================================

/// Zeichnet jeden Pixel-Write in einem Frame-Buffer auf
#[derive(Default)]
pub struct MockStripWriter {
    pub frame: Vec<u32>,
    pub write_count: usize,
    pub latch_count: usize,
    pub fail_index: Option<u16>,
}

impl MockStripWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anzahl Writes pro Frame (= Strip-Länge bei vollständigem Render)
    pub fn writes_per_latch(&self) -> Option<usize> {
        (self.latch_count > 0).then(|| self.write_count / self.latch_count)
    }
}

impl StripWriter for MockStripWriter {
    fn write_pixel(&mut self, index: u16, grb: u32) -> Result<(), LedError> {
        self.write_count += 1;
        if self.fail_index == Some(index) {
            return Err(LedError::WriteFailed);
        }

        let index = usize::from(index);
        if self.frame.len() <= index {
            self.frame.resize(index + 1, u32::MAX);
        }
        self.frame[index] = grb;
        Ok(())
    }

    fn latch(&mut self) -> Result<(), LedError> {
        self.latch_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock System Control
// ============================================================================

#[derive(Default)]
pub struct MockSystemControl {
    pub restart_requests: usize,
}

impl SystemControl for MockSystemControl {
    fn request_restart(&mut self) {
        self.restart_requests += 1;
    }
}

// ============================================================================
// Zufallsquelle mit fester Folge
// ============================================================================

pub struct SequenceRandom {
    values: Vec<u32>,
    next: usize,
}

impl SequenceRandom {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub type TestDispatcher = CommandDispatcher<MockStripWriter, MockSystemControl>;

pub fn dispatcher(config: ControllerConfig) -> TestDispatcher {
    CommandDispatcher::new(config, MockStripWriter::new(), MockSystemControl::default())
}

/// 16 Pixel, Segmentsteuerung aktiv
pub fn small_strip() -> TestDispatcher {
    dispatcher(ControllerConfig::full().with_strip_length(16))
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
