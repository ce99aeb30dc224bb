use embedded_hal::blocking::delay::DelayMs;
use log::{debug, warn};

use crate::bus::Bus;
use crate::command::Command;
use crate::config::Config;
use crate::convert::{self, Measurement, RawMeasurement};
use crate::error::Error;
use crate::transport::Transport;
use crate::MonotonicCounter;

/// Operating mode of the sensor as last commanded by this driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    Idle,
    PeriodicMeasuring,
    LowPowerPeriodicMeasuring,
    /// A single-shot measurement was triggered and has not been read yet
    SingleShotPending,
}

/// Sentinel the sensor returns when forced recalibration failed
const FRC_FAILED: u16 = 0xffff;
const FRC_ZERO: i32 = 0x8000;

/// SCD40 / SCD41 driver
///
/// The driver tracks the operating mode but never blocks a command because of
/// it: the sensor only accepts configuration while idle, and calling those
/// methods while measuring is a caller error that gets logged and forwarded.
/// Nothing is retried internally.
pub struct Scd4x<B, D, C> {
    transport: Transport<B, D, C>,
    config: Config,
    mode: DeviceMode,
    frc_pending: bool,
}

impl<E, B, D, C> Scd4x<B, D, C>
where
    B: Bus<Error = E>,
    D: DelayMs<u32>,
    C: MonotonicCounter,
{
    pub fn new(bus: B, delay: D, counter: C, config: Config) -> Self {
        Self {
            transport: Transport::new(bus, delay, counter, &config),
            config,
            mode: DeviceMode::Idle,
            frc_pending: false,
        }
    }

    pub fn free(self) -> (B, D, C) {
        self.transport.free()
    }

    pub fn mode(&self) -> DeviceMode {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the serial number and bring the sensor to idle
    ///
    /// If [`Config::expected_serial`] is set, a different serial number fails
    /// with [`Error::UnexpectedSerial`] and the sensor is left untouched.
    /// The sensor refuses the serial number request while measuring, so this
    /// fails on a sensor that is still running a periodic measurement.
    pub fn init(&mut self) -> Result<u64, Error<E>> {
        let serial = self.serial_number()?;
        if let Some(expected) = self.config.expected_serial {
            if serial != expected {
                warn!(
                    "serial number {:#014x} does not match expected {:#014x}",
                    serial, expected
                );
                return Err(Error::UnexpectedSerial(serial));
            }
        }
        self.stop_periodic_measurement()?;
        debug!("sensor {:#014x} ready", serial);
        Ok(serial)
    }

    /// Start periodic measurement, new data every 5 seconds
    pub fn start_periodic_measurement(&mut self) -> Result<(), Error<E>> {
        self.warn_unless_idle(Command::StartPeriodicMeasurement);
        self.execute(Command::StartPeriodicMeasurement, &[])?;
        self.set_mode(DeviceMode::PeriodicMeasuring);
        Ok(())
    }

    /// Start low power periodic measurement, new data every 30 seconds
    pub fn start_low_power_periodic_measurement(&mut self) -> Result<(), Error<E>> {
        self.warn_unless_idle(Command::StartLowPowerPeriodicMeasurement);
        self.execute(Command::StartLowPowerPeriodicMeasurement, &[])?;
        self.set_mode(DeviceMode::LowPowerPeriodicMeasuring);
        Ok(())
    }

    /// Stop periodic measurement; blocks for 500 ms until the sensor is idle
    pub fn stop_periodic_measurement(&mut self) -> Result<(), Error<E>> {
        self.execute(Command::StopPeriodicMeasurement, &[])?;
        self.set_mode(DeviceMode::Idle);
        Ok(())
    }

    /// Read the latest measurement
    ///
    /// Consumes a pending single-shot trigger once the sensor has answered.
    pub fn read_measurement(&mut self) -> Result<Measurement, Error<E>> {
        if self.mode == DeviceMode::Idle {
            warn!("reading measurement with no measurement running");
        }
        let result = self.fetch::<3>(Command::ReadMeasurement);

        if self.mode == DeviceMode::SingleShotPending {
            match result {
                Ok(_) | Err(Error::ChecksumMismatch) => self.set_mode(DeviceMode::Idle),
                Err(_) => {}
            }
        }

        let [co2, temperature, humidity] = result?;
        Ok(Measurement::from(RawMeasurement {
            co2,
            temperature,
            humidity,
        }))
    }

    /// Whether a new measurement can be read
    pub fn data_ready(&mut self) -> Result<bool, Error<E>> {
        let [status] = self.fetch::<1>(Command::GetDataReadyStatus)?;
        Ok(status & 0x07ff != 0)
    }

    /// Trigger a single CO2, temperature and humidity measurement (SCD41)
    ///
    /// Does not wait; the result is ready about 5 seconds later.
    pub fn measure_single_shot(&mut self) -> Result<(), Error<E>> {
        self.trigger_single_shot(Command::MeasureSingleShot)
    }

    /// Trigger a single temperature and humidity measurement (SCD41)
    ///
    /// Does not wait; the result is ready after 50 ms and reports 0 ppm CO2.
    pub fn measure_single_shot_rht_only(&mut self) -> Result<(), Error<E>> {
        self.trigger_single_shot(Command::MeasureSingleShotRhtOnly)
    }

    /// Wake the sensor, take one measurement and read it (SCD41)
    ///
    /// Blocks for the full single-shot duration of about 5 seconds.
    pub fn measure_and_read_single_shot(&mut self) -> Result<Measurement, Error<E>> {
        self.check(Command::MeasureSingleShot)?;
        self.wake_up()?;
        self.measure_single_shot()?;
        self.transport
            .delay_ms(Command::MeasureSingleShot.execution_time_ms());
        self.read_measurement()
    }

    /// Set the temperature offset in °C
    ///
    /// The value is not range checked, see [`convert::temperature_offset_raw`].
    pub fn set_temperature_offset(&mut self, offset: f32) -> Result<(), Error<E>> {
        let raw = convert::temperature_offset_raw(offset);
        self.execute(Command::SetTemperatureOffset, &[raw])
    }

    pub fn temperature_offset(&mut self) -> Result<f32, Error<E>> {
        let [raw] = self.fetch::<1>(Command::GetTemperatureOffset)?;
        Ok(convert::temperature_offset(raw))
    }

    /// Set the sensor altitude in meters above sea level
    pub fn set_sensor_altitude(&mut self, altitude: u16) -> Result<(), Error<E>> {
        self.execute(Command::SetSensorAltitude, &[altitude])
    }

    pub fn sensor_altitude(&mut self) -> Result<u16, Error<E>> {
        let [altitude] = self.fetch::<1>(Command::GetSensorAltitude)?;
        Ok(altitude)
    }

    /// Set the ambient pressure in hPa (mbar), overrides the altitude setting
    pub fn set_ambient_pressure(&mut self, pressure: u16) -> Result<(), Error<E>> {
        self.execute(Command::SetAmbientPressure, &[pressure])
    }

    /// Ambient pressure in hPa
    pub fn ambient_pressure(&mut self) -> Result<u16, Error<E>> {
        let [pressure] = self.fetch::<1>(Command::GetAmbientPressure)?;
        Ok(pressure)
    }

    /// Start forced recalibration against a known CO2 concentration in ppm
    ///
    /// The correction is only available through
    /// [`read_forced_recalibration_correction`](Self::read_forced_recalibration_correction),
    /// which costs another 500 ms.
    pub fn perform_forced_recalibration(&mut self, target_co2: u16) -> Result<(), Error<E>> {
        let command = Command::PerformForcedRecalibration;
        self.check(command)?;
        debug!("{:?} target {} ppm", command, target_co2);
        self.transport.send(command.code(), &[target_co2])?;
        self.frc_pending = true;
        Ok(())
    }

    /// Wait for and read the result of forced recalibration
    ///
    /// Returns the applied correction in ppm, or `None` if the sensor reports
    /// that recalibration failed.
    pub fn read_forced_recalibration_correction(&mut self) -> Result<Option<i16>, Error<E>> {
        if !self.frc_pending {
            warn!("reading forced recalibration result with no recalibration started");
        }
        self.frc_pending = false;
        self.transport
            .delay_ms(Command::PerformForcedRecalibration.execution_time_ms());
        let [raw] = self.transport.receive::<1>()?;
        if raw == FRC_FAILED {
            warn!("forced recalibration failed");
            return Ok(None);
        }
        Ok(Some((i32::from(raw) - FRC_ZERO) as i16))
    }

    /// Both phases of forced recalibration
    pub fn forced_recalibration(&mut self, target_co2: u16) -> Result<Option<i16>, Error<E>> {
        self.perform_forced_recalibration(target_co2)?;
        self.read_forced_recalibration_correction()
    }

    pub fn set_automatic_self_calibration(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.execute(
            Command::SetAutomaticSelfCalibrationEnabled,
            &[u16::from(enabled)],
        )
    }

    pub fn automatic_self_calibration(&mut self) -> Result<bool, Error<E>> {
        let [enabled] = self.fetch::<1>(Command::GetAutomaticSelfCalibrationEnabled)?;
        Ok(enabled != 0)
    }

    /// Set the CO2 concentration in ppm ASC assumes as its baseline
    pub fn set_automatic_self_calibration_target(&mut self, target: u16) -> Result<(), Error<E>> {
        self.execute(Command::SetAutomaticSelfCalibrationTarget, &[target])
    }

    pub fn automatic_self_calibration_target(&mut self) -> Result<u16, Error<E>> {
        let [target] = self.fetch::<1>(Command::GetAutomaticSelfCalibrationTarget)?;
        Ok(target)
    }

    /// Hours until the first automatic self-calibration (SCD41, multiple of 4)
    pub fn set_automatic_self_calibration_initial_period(
        &mut self,
        hours: u16,
    ) -> Result<(), Error<E>> {
        self.execute(Command::SetAutomaticSelfCalibrationInitialPeriod, &[hours])
    }

    pub fn automatic_self_calibration_initial_period(&mut self) -> Result<u16, Error<E>> {
        let [hours] = self.fetch::<1>(Command::GetAutomaticSelfCalibrationInitialPeriod)?;
        Ok(hours)
    }

    /// Hours between automatic self-calibrations (SCD41, multiple of 4)
    pub fn set_automatic_self_calibration_standard_period(
        &mut self,
        hours: u16,
    ) -> Result<(), Error<E>> {
        self.execute(Command::SetAutomaticSelfCalibrationStandardPeriod, &[hours])
    }

    pub fn automatic_self_calibration_standard_period(&mut self) -> Result<u16, Error<E>> {
        let [hours] = self.fetch::<1>(Command::GetAutomaticSelfCalibrationStandardPeriod)?;
        Ok(hours)
    }

    /// Store the current configuration in EEPROM
    pub fn persist_settings(&mut self) -> Result<(), Error<E>> {
        self.execute(Command::PersistSettings, &[])
    }

    /// 48-bit serial number
    pub fn serial_number(&mut self) -> Result<u64, Error<E>> {
        let [w0, w1, w2] = self.fetch::<3>(Command::GetSerialNumber)?;
        Ok(u64::from(w0) << 32 | u64::from(w1) << 16 | u64::from(w2))
    }

    /// Run the built-in self test, blocks for 10 seconds
    ///
    /// Returns `true` if no malfunction was detected.
    pub fn self_test(&mut self) -> Result<bool, Error<E>> {
        let [status] = self.fetch::<1>(Command::PerformSelfTest)?;
        if status != 0 {
            warn!("self test reported malfunction {:#06x}", status);
        }
        Ok(status == 0)
    }

    /// Reset all configuration, including EEPROM, to factory defaults
    pub fn factory_reset(&mut self) -> Result<(), Error<E>> {
        self.execute(Command::PerformFactoryReset, &[])?;
        self.set_mode(DeviceMode::Idle);
        Ok(())
    }

    /// Reload user settings from EEPROM
    pub fn reinit(&mut self) -> Result<(), Error<E>> {
        self.warn_unless_idle(Command::Reinit);
        self.execute(Command::Reinit, &[])?;
        self.set_mode(DeviceMode::Idle);
        Ok(())
    }

    /// Put the sensor into sleep mode (SCD41)
    pub fn power_down(&mut self) -> Result<(), Error<E>> {
        self.warn_unless_idle(Command::PowerDown);
        self.execute(Command::PowerDown, &[])?;
        self.set_mode(DeviceMode::Idle);
        Ok(())
    }

    /// Wake the sensor from sleep mode (SCD41)
    ///
    /// The sensor does not acknowledge this command, so a write failure is ignored.
    pub fn wake_up(&mut self) -> Result<(), Error<E>> {
        let command = Command::WakeUp;
        self.check(command)?;
        debug!("{:?}", command);
        match self.transport.send(command.code(), &[]) {
            Ok(()) | Err(Error::Write(_)) => {}
            Err(e) => return Err(e),
        }
        self.transport.delay_ms(command.execution_time_ms());
        Ok(())
    }

    fn trigger_single_shot(&mut self, command: Command) -> Result<(), Error<E>> {
        self.check(command)?;
        self.warn_unless_idle(command);
        debug!("{:?}", command);
        self.transport.send(command.code(), &[])?;
        self.set_mode(DeviceMode::SingleShotPending);
        Ok(())
    }

    /// Send a command with payload and wait for its execution time
    fn execute(&mut self, command: Command, payload: &[u16]) -> Result<(), Error<E>> {
        self.check(command)?;
        debug!("{:?} {:04x?}", command, payload);
        self.transport.send(command.code(), payload)?;
        self.transport.delay_ms(command.execution_time_ms());
        Ok(())
    }

    /// Send a read command, wait for the settle delay and read `N` words back
    fn fetch<const N: usize>(&mut self, command: Command) -> Result<[u16; N], Error<E>> {
        self.check(command)?;
        debug!("{:?}", command);
        self.transport.send(command.code(), &[])?;
        self.transport.delay_ms(command.execution_time_ms());
        self.transport.receive::<N>()
    }

    fn check(&self, command: Command) -> Result<(), Error<E>> {
        if !command.is_supported_by(self.config.variant) {
            return Err(Error::Unsupported(command));
        }
        if command.is_configuration() {
            self.warn_unless_idle(command);
        }
        Ok(())
    }

    fn warn_unless_idle(&self, command: Command) {
        if self.mode != DeviceMode::Idle {
            warn!("{:?} issued while {:?}", command, self.mode);
        }
    }

    fn set_mode(&mut self, mode: DeviceMode) {
        if self.mode != mode {
            debug!("{:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}
