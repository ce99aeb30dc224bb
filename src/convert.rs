//! Raw sensor words to physical units and back

/// Raw words of one measurement, as read from the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMeasurement {
    pub co2: u16,
    pub temperature: u16,
    pub humidity: u16,
}

/// One converted measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// CO2 concentration in ppm
    pub co2: u16,
    /// Temperature in °C
    pub temperature: f32,
    /// Relative humidity in %
    pub humidity: f32,
}

impl From<RawMeasurement> for Measurement {
    fn from(raw: RawMeasurement) -> Self {
        Measurement {
            co2: raw.co2,
            temperature: temperature(raw.temperature),
            humidity: humidity(raw.humidity),
        }
    }
}

const FULL_SCALE: f32 = 65535.0;

pub fn temperature(raw: u16) -> f32 {
    -45.0 + 175.0 * raw as f32 / FULL_SCALE
}

pub fn humidity(raw: u16) -> f32 {
    100.0 * raw as f32 / FULL_SCALE
}

pub fn temperature_offset(raw: u16) -> f32 {
    175.0 * raw as f32 / FULL_SCALE
}

/// Encode a temperature offset in °C
///
/// Not range checked: the scaled value is truncated toward zero and wrapped to
/// 16 bits, so negative offsets or offsets above 175 °C produce wrapped words.
pub fn temperature_offset_raw(offset: f32) -> u16 {
    (offset / 175.0 * FULL_SCALE) as i32 as u16
}
