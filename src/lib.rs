//! Sensirion SCD40 / SCD41 CO2, temperature and humidity sensor driver.
//!
//! [SCD4x Datasheet](https://sensirion.com/media/documents/48C4B7FB/64C134E7/Sensirion_SCD4x_Datasheet.pdf)
//!
//! Every operation is a blocking command/response exchange over I2C. Words
//! on the wire carry a CRC-8 each, and responses are polled for with a bounded
//! timeout measured on a [`MonotonicCounter`].
//!
//! ```ignore
//! let mut sensor = Scd4x::new(BlockingI2c::new(i2c), delay, counter, Config::default());
//! sensor.init()?;
//! sensor.start_periodic_measurement()?;
//! let measurement = sensor.read_measurement()?;
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bus;
mod command;
mod config;
pub mod convert;
mod crc;
mod device;
mod error;
mod transport;
pub mod word;

#[cfg(test)]
mod testing;

pub use bus::{BlockingI2c, Bus};
pub use command::{Command, Variant};
pub use config::{Config, DEFAULT_ADDRESS};
pub use convert::{Measurement, RawMeasurement};
pub use crc::checksum;
pub use device::{DeviceMode, Scd4x};
pub use error::Error;
pub use word::ChecksumMismatch;

pub trait MonotonicCounter {
    /// Returns a measurement of the monotonic counter
    fn value(&self) -> u32;

    /// Returns the frequency at which the monotonic counter is operating at
    fn frequency(&self) -> u32;
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl MonotonicCounter for std::time::Instant {
    fn value(&self) -> u32 {
        (self.elapsed().as_millis() & 0xffffffff) as u32
    }

    fn frequency(&self) -> u32 {
        1000
    }
}
