const CRC8_POLYNOMIAL: u8 = 0x31;
const CRC8_INIT: u8 = 0xff;

/// Sensirion CRC-8 over the two bytes of a data word
///
/// Polynomial `0x31`, initial value `0xff`, MSB first, no final XOR.
pub fn checksum(msb: u8, lsb: u8) -> u8 {
    [msb, lsb].iter().fold(CRC8_INIT, |crc, &byte| {
        let mut crc = crc ^ byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLYNOMIAL
            } else {
                crc << 1
            };
        }
        crc
    })
}
