//! SCD4x command table

/// Sensor model, selects which commands are available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// SCD40: periodic measurement only
    Scd40,
    /// SCD41: adds single-shot measurement, power cycling and ASC period control
    Scd41,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Scd41
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartPeriodicMeasurement,
    ReadMeasurement,
    StopPeriodicMeasurement,
    SetTemperatureOffset,
    GetTemperatureOffset,
    SetSensorAltitude,
    GetSensorAltitude,
    SetAmbientPressure,
    GetAmbientPressure,
    PerformForcedRecalibration,
    SetAutomaticSelfCalibrationEnabled,
    GetAutomaticSelfCalibrationEnabled,
    SetAutomaticSelfCalibrationTarget,
    GetAutomaticSelfCalibrationTarget,
    StartLowPowerPeriodicMeasurement,
    GetDataReadyStatus,
    PersistSettings,
    GetSerialNumber,
    PerformSelfTest,
    PerformFactoryReset,
    Reinit,
    MeasureSingleShot,
    MeasureSingleShotRhtOnly,
    PowerDown,
    WakeUp,
    SetAutomaticSelfCalibrationInitialPeriod,
    GetAutomaticSelfCalibrationInitialPeriod,
    SetAutomaticSelfCalibrationStandardPeriod,
    GetAutomaticSelfCalibrationStandardPeriod,
}

impl Command {
    /// 16-bit operation code sent big-endian at the start of the transaction
    pub fn code(self) -> u16 {
        use Command::*;
        match self {
            StartPeriodicMeasurement => 0x21b1,
            ReadMeasurement => 0xec05,
            StopPeriodicMeasurement => 0x3f86,
            SetTemperatureOffset => 0x241d,
            GetTemperatureOffset => 0x2318,
            SetSensorAltitude => 0x2427,
            GetSensorAltitude => 0x2322,
            SetAmbientPressure | GetAmbientPressure => 0xe000,
            PerformForcedRecalibration => 0x362f,
            SetAutomaticSelfCalibrationEnabled => 0x2416,
            GetAutomaticSelfCalibrationEnabled => 0x2313,
            SetAutomaticSelfCalibrationTarget => 0x243a,
            GetAutomaticSelfCalibrationTarget => 0x233f,
            StartLowPowerPeriodicMeasurement => 0x21ac,
            GetDataReadyStatus => 0xe4b8,
            PersistSettings => 0x3615,
            GetSerialNumber => 0x3682,
            PerformSelfTest => 0x3639,
            PerformFactoryReset => 0x3632,
            Reinit => 0x3646,
            MeasureSingleShot => 0x219d,
            MeasureSingleShotRhtOnly => 0x2196,
            PowerDown => 0x36e0,
            WakeUp => 0x36f6,
            SetAutomaticSelfCalibrationInitialPeriod => 0x2445,
            GetAutomaticSelfCalibrationInitialPeriod => 0x2340,
            SetAutomaticSelfCalibrationStandardPeriod => 0x244e,
            GetAutomaticSelfCalibrationStandardPeriod => 0x234b,
        }
    }

    /// Time in milliseconds the firmware needs after this command
    ///
    /// For reads this is the settle delay before the response may be polled,
    /// for everything else the time before the next command is accepted.
    pub fn execution_time_ms(self) -> u32 {
        use Command::*;
        match self {
            StartPeriodicMeasurement | StartLowPowerPeriodicMeasurement => 0,
            ReadMeasurement | GetSerialNumber => 5,
            StopPeriodicMeasurement | PerformForcedRecalibration => 500,
            PersistSettings => 800,
            PerformSelfTest => 10_000,
            PerformFactoryReset => 1200,
            Reinit | WakeUp => 30,
            MeasureSingleShot => 5000,
            MeasureSingleShotRhtOnly => 50,
            _ => 1,
        }
    }

    pub fn is_supported_by(self, variant: Variant) -> bool {
        use Command::*;
        match self {
            MeasureSingleShot
            | MeasureSingleShotRhtOnly
            | PowerDown
            | WakeUp
            | SetAutomaticSelfCalibrationInitialPeriod
            | GetAutomaticSelfCalibrationInitialPeriod
            | SetAutomaticSelfCalibrationStandardPeriod
            | GetAutomaticSelfCalibrationStandardPeriod => variant == Variant::Scd41,
            _ => true,
        }
    }

    /// Commands that change persisted or volatile sensor settings
    ///
    /// The sensor only accepts these while idle.
    pub fn is_configuration(self) -> bool {
        use Command::*;
        matches!(
            self,
            SetTemperatureOffset
                | SetSensorAltitude
                | SetAmbientPressure
                | PerformForcedRecalibration
                | SetAutomaticSelfCalibrationEnabled
                | SetAutomaticSelfCalibrationTarget
                | SetAutomaticSelfCalibrationInitialPeriod
                | SetAutomaticSelfCalibrationStandardPeriod
                | PersistSettings
                | PerformFactoryReset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_shot_requires_scd41() {
        assert!(!Command::MeasureSingleShot.is_supported_by(Variant::Scd40));
        assert!(Command::MeasureSingleShot.is_supported_by(Variant::Scd41));
        assert!(Command::ReadMeasurement.is_supported_by(Variant::Scd40));
    }

    #[test]
    fn pressure_shares_opcode() {
        assert_eq!(
            Command::SetAmbientPressure.code(),
            Command::GetAmbientPressure.code()
        );
    }

    #[test]
    fn settle_delays() {
        assert_eq!(Command::GetTemperatureOffset.execution_time_ms(), 1);
        assert_eq!(Command::ReadMeasurement.execution_time_ms(), 5);
        assert_eq!(Command::GetSerialNumber.execution_time_ms(), 5);
        assert_eq!(Command::PerformForcedRecalibration.execution_time_ms(), 500);
    }
}
