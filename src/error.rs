use core::fmt;

use crate::command::Command;
use crate::word::ChecksumMismatch;

#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// Command transmission was not acknowledged
    Write(E),
    /// Underlying bus reported a read failure that cannot be retried
    Read(E),
    /// Response bytes did not become available within the response timeout
    Timeout,
    /// A response word has the wrong checksum, the whole response is discarded
    ChecksumMismatch,
    /// The configured sensor variant does not implement this command
    Unsupported(Command),
    /// Serial number differs from the one the driver was configured to expect
    UnexpectedSerial(u64),
}

impl<E> From<ChecksumMismatch> for Error<E> {
    fn from(_: ChecksumMismatch) -> Self {
        Error::ChecksumMismatch
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Write(e) => write!(f, "bus write failed: {:?}", e),
            Error::Read(e) => write!(f, "bus read failed: {:?}", e),
            Error::Timeout => f.write_str("timed out waiting for response"),
            Error::ChecksumMismatch => f.write_str("response checksum mismatch"),
            Error::Unsupported(command) => {
                write!(f, "{:?} is not supported by this sensor variant", command)
            }
            Error::UnexpectedSerial(serial) => {
                write!(f, "unexpected serial number {:#014x}", serial)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
