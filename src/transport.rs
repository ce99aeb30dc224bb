use embedded_hal::blocking::delay::DelayMs;
use log::trace;

use crate::bus::Bus;
use crate::config::Config;
use crate::error::Error;
use crate::word::{self, WORD_SIZE};
use crate::MonotonicCounter;

/// Largest payload a command carries
pub(crate) const MAX_PAYLOAD_WORDS: usize = 3;
/// Largest response the sensor returns
pub(crate) const MAX_RESPONSE_WORDS: usize = 3;

const COMMAND_SIZE: usize = 2;

/// Command framing and response polling over a [`Bus`]
///
/// One exchange at a time; the transport owns the bus for its lifetime.
/// Payloads and responses are bounded by the command table, callers must
/// stay within [`MAX_PAYLOAD_WORDS`] and [`MAX_RESPONSE_WORDS`].
pub(crate) struct Transport<B, D, C> {
    bus: B,
    delay: D,
    counter: C,
    address: u8,
    response_timeout_ms: u32,
    poll_interval_ms: u32,
}

impl<E, B: Bus<Error = E>, D: DelayMs<u32>, C: MonotonicCounter> Transport<B, D, C> {
    pub fn new(bus: B, delay: D, counter: C, config: &Config) -> Self {
        Self {
            bus,
            delay,
            counter,
            address: config.address,
            response_timeout_ms: config.response_timeout_ms,
            poll_interval_ms: config.poll_interval_ms.max(1),
        }
    }

    pub fn free(self) -> (B, D, C) {
        (self.bus, self.delay, self.counter)
    }

    /// Send a command code followed by its checksummed payload words
    pub fn send(&mut self, code: u16, payload: &[u16]) -> Result<(), Error<E>> {
        assert!(payload.len() <= MAX_PAYLOAD_WORDS);

        let mut buffer = [0u8; COMMAND_SIZE + MAX_PAYLOAD_WORDS * WORD_SIZE];
        buffer[..COMMAND_SIZE].copy_from_slice(&code.to_be_bytes());
        for (chunk, &value) in buffer[COMMAND_SIZE..]
            .chunks_mut(WORD_SIZE)
            .zip(payload)
        {
            chunk.copy_from_slice(&word::encode(value));
        }

        let frame = &buffer[..COMMAND_SIZE + payload.len() * WORD_SIZE];
        trace!("tx {:02x?}", frame);
        self.bus.write(self.address, frame).map_err(Error::Write)
    }

    /// Poll for `N` response words, then validate all of them
    ///
    /// Fails with [`Error::Timeout`] if the bytes are not available within
    /// the response timeout. A checksum failure in any word discards the whole
    /// response.
    pub fn receive<const N: usize>(&mut self) -> Result<[u16; N], Error<E>> {
        assert!(N <= MAX_RESPONSE_WORDS);

        let mut buffer = [0u8; MAX_RESPONSE_WORDS * WORD_SIZE];
        let buffer = &mut buffer[..N * WORD_SIZE];

        let t0 = self.counter.value();
        let dt = self.ticks(self.response_timeout_ms);

        loop {
            match self.bus.read(self.address, buffer) {
                Ok(()) => break,
                Err(nb::Error::Other(e)) => return Err(Error::Read(e)),
                Err(nb::Error::WouldBlock) => {}
            }
            let elapsed = self.counter.value().wrapping_sub(t0);
            if elapsed >= dt {
                return Err(Error::Timeout);
            }
            // never sleep past the deadline
            let step = self.poll_interval_ms.min(self.millis(dt - elapsed));
            self.delay.delay_ms(step);
        }
        trace!("rx {:02x?}", buffer);

        let mut words = [0u16; N];
        word::decode_all(buffer, &mut words)?;
        Ok(words)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }

    fn ticks(&self, ms: u32) -> u32 {
        (u64::from(self.counter.frequency()) * u64::from(ms) / 1000) as u32
    }

    /// Milliseconds covering `ticks`, rounded up, at least 1
    fn millis(&self, ticks: u32) -> u32 {
        let frequency = u64::from(self.counter.frequency());
        ((u64::from(ticks) * 1000 + frequency - 1) / frequency).max(1) as u32
    }
}
