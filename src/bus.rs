use embedded_hal::blocking::i2c::{Read, Write};

/// Two-wire bus as seen by the driver
pub trait Bus {
    type Error;

    /// Write `bytes` to the device in a single transaction
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Read exactly `buffer.len()` bytes from the device
    ///
    /// Returns `WouldBlock` while the device does not have that many bytes available yet.
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), Self::Error>;
}

/// [`Bus`] on top of a blocking `embedded-hal` I2C implementation
///
/// The sensor does not acknowledge its address while a command is being
/// processed, so a failed read is reported as `WouldBlock` and retried until
/// the response timeout expires.
pub struct BlockingI2c<I> {
    i2c: I,
}

impl<I> BlockingI2c<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn free(self) -> I {
        self.i2c
    }
}

impl<E, I: Read<Error = E> + Write<Error = E>> Bus for BlockingI2c<I> {
    type Error = E;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), E> {
        Write::write(&mut self.i2c, address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), E> {
        Read::read(&mut self.i2c, address, buffer).map_err(|_| nb::Error::WouldBlock)
    }
}
