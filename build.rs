use std::env;

fn main() {
    let target = env::var("TARGET").unwrap();

    if target.contains("avr") {
        // Configure for ATmega328P
        println!("cargo:rustc-link-arg=-mmcu=atmega328p");

        // Pass CPU frequency for timing calculations
        println!("cargo:rustc-env=MCU_FREQ_HZ=1000000");
    }
    // Non-AVR targets only build the library for host-side tests.
}
