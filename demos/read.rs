use linux_embedded_hal::{Delay, I2cdev};
use scd4x_sensor::{BlockingI2c, Config, Scd4x};
use std::thread::sleep;
use std::time::{Duration, Instant};

fn main() {
    let i2c_path = std::env::args().nth(1).unwrap_or("/dev/i2c-1".into());
    let i2c = I2cdev::new(i2c_path).unwrap();
    let mut sensor = Scd4x::new(BlockingI2c::new(i2c), Delay, Instant::now(), Config::default());

    // the sensor may still be measuring from a previous run
    sensor.stop_periodic_measurement().unwrap();
    let serial = sensor.init().unwrap();
    println!("serial: {:#014x} at {:#04x}", serial, sensor.config().address);
    println!("temperature offset: {:.2} °C", sensor.temperature_offset().unwrap());
    println!("altitude: {} m", sensor.sensor_altitude().unwrap());
    println!("ASC enabled: {}", sensor.automatic_self_calibration().unwrap());

    sensor.start_periodic_measurement().unwrap();
    loop {
        sleep(Duration::from_secs(5));
        if !sensor.data_ready().unwrap() {
            continue;
        }
        match sensor.read_measurement() {
            Ok(m) => println!(
                "CO2: {} ppm, temperature: {:.2} °C, humidity: {:.2} %",
                m.co2, m.temperature, m.humidity
            ),
            Err(e) => println!("read failed: {}", e),
        }
    }
}
