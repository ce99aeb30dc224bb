use crate::command::Variant;

/// Default 7-bit I2C address of every SCD4x
pub const DEFAULT_ADDRESS: u8 = 0x62;

/// Driver configuration
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    /// 7-bit bus address of the sensor
    pub address: u8,
    /// Sensor model, selects the available command set
    pub variant: Variant,
    /// How long to poll for response bytes after the settle delay
    pub response_timeout_ms: u32,
    /// Delay between two polls for response bytes
    pub poll_interval_ms: u32,
    /// Serial number [`init`](crate::Scd4x::init) must find on the bus
    pub expected_serial: Option<u64>,
}

impl Config {
    pub fn new(address: u8, variant: Variant) -> Config {
        Config {
            address,
            variant,
            ..Config::default()
        }
    }

    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn response_timeout_ms(mut self, timeout: u32) -> Self {
        self.response_timeout_ms = timeout;
        self
    }

    /// Sets the polling step, clamped to at least 1 ms
    pub fn poll_interval_ms(mut self, interval: u32) -> Self {
        self.poll_interval_ms = interval.max(1);
        self
    }

    pub fn expected_serial(mut self, serial: u64) -> Self {
        self.expected_serial = Some(serial);
        self
    }
}

impl Default for Config {
    /// Default address, SCD41 command set, 100 ms response timeout polled every 1 ms
    fn default() -> Config {
        Config {
            address: DEFAULT_ADDRESS,
            variant: Variant::default(),
            response_timeout_ms: 100,
            poll_interval_ms: 1,
            expected_serial: None,
        }
    }
}
