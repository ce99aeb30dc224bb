//! Scripted bus and clock for unit tests

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;

use crate::bus::Bus;
use crate::word;
use crate::MonotonicCounter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeError {
    Nack,
    Io,
}

/// Bus that records writes and serves queued responses
///
/// Each response only becomes readable after `busy_polls` unsuccessful reads.
#[derive(Default)]
pub struct FakeBus {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub responses: VecDeque<Vec<u8>>,
    pub busy_polls: usize,
    pub nack_writes: bool,
    /// NACK only writes of this command code
    pub nack_command: Option<u16>,
    pub fail_reads: bool,
    pub reads: usize,
    pending_polls: usize,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&mut self, words: &[u16]) {
        self.responses.push_back(frame(words));
    }

    /// Command codes written so far, without payload
    pub fn commands(&self) -> Vec<u16> {
        self.writes
            .iter()
            .map(|(_, bytes)| u16::from_be_bytes([bytes[0], bytes[1]]))
            .collect()
    }
}

impl Bus for FakeBus {
    type Error = FakeError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), FakeError> {
        let code = u16::from_be_bytes([bytes[0], bytes[1]]);
        if self.nack_writes || self.nack_command == Some(code) {
            return Err(FakeError::Nack);
        }
        self.writes.push((address, bytes.to_vec()));
        Ok(())
    }

    fn read(&mut self, _address: u8, buffer: &mut [u8]) -> nb::Result<(), FakeError> {
        self.reads += 1;
        if self.fail_reads {
            return Err(nb::Error::Other(FakeError::Io));
        }
        if self.pending_polls < self.busy_polls {
            self.pending_polls += 1;
            return Err(nb::Error::WouldBlock);
        }
        match self.responses.front() {
            Some(response) if response.len() >= buffer.len() => {
                buffer.copy_from_slice(&response[..buffer.len()]);
                self.responses.pop_front();
                self.pending_polls = 0;
                Ok(())
            }
            _ => Err(nb::Error::WouldBlock),
        }
    }
}

/// Millisecond clock that only advances when slept on
#[derive(Clone)]
pub struct FakeClock {
    now: Rc<Cell<u32>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(ms)),
        }
    }

    pub fn now(&self) -> u32 {
        self.now.get()
    }
}

impl MonotonicCounter for FakeClock {
    fn value(&self) -> u32 {
        self.now.get()
    }

    fn frequency(&self) -> u32 {
        1000
    }
}

impl DelayMs<u32> for FakeClock {
    fn delay_ms(&mut self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

/// Encode words the way the sensor puts them on the wire
pub fn frame(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|&w| word::encode(w).to_vec()).collect()
}
