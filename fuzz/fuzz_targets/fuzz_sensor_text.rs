//! Fuzz target: text parsers for `vcgencmd` output and thermal-zone files.
//!
//! Neither parser may panic; anything they accept must be finite.
//!
//! cargo fuzz run fuzz_sensor_text

#![no_main]

use greenhouse::sensors::thermal::{parse_thermal_zone, parse_vcgencmd};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(t) = parse_vcgencmd(&text) {
        assert!(t.is_finite());
    }
    if let Ok(t) = parse_thermal_zone(&text) {
        assert!(t.is_finite());
    }
});
