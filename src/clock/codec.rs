//! Packed-BCD codec for the DS1307 register layout.
//!
//! The RTC stores each field as two decimal digits packed into one byte.
//! The hours register additionally carries the 12/24-hour marker in bit 6,
//! which is why decoding takes explicit masks instead of assuming the whole
//! byte is digits.

/// Seconds register, tens digit (bit 7 is the clock-halt flag)
pub const SECONDS_TENS_MASK: u8 = 0x70;
/// Seconds register, ones digit
pub const SECONDS_ONES_MASK: u8 = 0x0F;
/// Minutes register, tens digit
pub const MINUTES_TENS_MASK: u8 = 0x70;
/// Minutes register, ones digit
pub const MINUTES_ONES_MASK: u8 = 0x0F;
/// Hours register, tens digit (12-hour mode, so a single bit)
pub const HOURS_TENS_MASK: u8 = 0x10;
/// Hours register, ones digit
pub const HOURS_ONES_MASK: u8 = 0x0F;

/// 12/24-hour select bit in the hours register; high means 12-hour mode
pub const HOUR_MODE_12H: u8 = 0x40;
/// Clock-halt bit in the seconds register; high stops the oscillator
pub const CLOCK_HALT: u8 = 0x80;

/// Decode a packed register byte into a plain binary value (0..=99).
///
/// Only the bits selected by the masks participate, so flag bits sharing
/// the register (clock halt, 12/24 select) are ignored for free.
pub fn decode_field(raw: u8, tens_mask: u8, ones_mask: u8) -> u8 {
    ((raw & tens_mask) >> 4) * 10 + (raw & ones_mask)
}

/// Pack a binary value (0..=99) into two BCD digits.
///
/// Callers clamp before encoding; values >= 100 never reach this function.
pub fn encode_binary(value: u8) -> u8 {
    let mut ones = value;
    let mut tens = 0u8;
    while ones >= 10 {
        tens += 1;
        ones -= 10;
    }
    (tens << 4) | ones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_two_digit_values() {
        for v in 0..=99u8 {
            let packed = encode_binary(v);
            assert_eq!(decode_field(packed, 0xF0, 0x0F), v, "value {}", v);
        }
    }

    #[test]
    fn decode_ignores_bits_outside_the_masks() {
        // 7 o'clock with the 12-hour marker set
        let raw = encode_binary(7) | HOUR_MODE_12H;
        assert_eq!(decode_field(raw, HOURS_TENS_MASK, HOURS_ONES_MASK), 7);

        // 12 o'clock, tens bit plus marker
        let raw = encode_binary(12) | HOUR_MODE_12H;
        assert_eq!(decode_field(raw, HOURS_TENS_MASK, HOURS_ONES_MASK), 12);

        // seconds with the clock-halt flag high still decode
        let raw = encode_binary(42) | CLOCK_HALT;
        assert_eq!(decode_field(raw, SECONDS_TENS_MASK, SECONDS_ONES_MASK), 42);
    }

    #[test]
    fn encode_packs_digits_into_nibbles() {
        assert_eq!(encode_binary(0), 0x00);
        assert_eq!(encode_binary(9), 0x09);
        assert_eq!(encode_binary(10), 0x10);
        assert_eq!(encode_binary(59), 0x59);
        assert_eq!(encode_binary(99), 0x99);
    }
}
