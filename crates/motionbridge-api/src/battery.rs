// ── Battery voltage curve ──
//
// Blinds report battery as centivolts. The gateway firmware does not
// publish a charge estimate, so the pack size is inferred from the voltage
// band and mapped linearly between its empty and full voltages.

/// Voltage and charge fraction derived from a raw battery reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryInfo {
    pub voltage: f64,
    /// Charge in `[0.0, 1.0]`.
    pub fraction: f64,
}

/// (upper band limit, empty voltage, full voltage) per cell count.
const PACKS: [(f64, f64, f64); 3] = [
    (9.4, 6.2, 8.4),             // 2 cells
    (13.6, 10.4, 12.6),          // 3 cells
    (f64::INFINITY, 14.6, 16.8), // 4 cells
];

/// Convert a raw `batteryLevel` reading into voltage and charge fraction.
pub fn battery_info(raw_level: u32) -> BatteryInfo {
    let voltage = f64::from(raw_level) / 100.0;
    if voltage <= 0.0 {
        return BatteryInfo {
            voltage,
            fraction: 0.0,
        };
    }

    let fraction = PACKS
        .iter()
        .find(|(limit, _, _)| voltage <= *limit)
        .map_or(0.0, |(_, empty, full)| (voltage - empty) / (full - empty));

    BatteryInfo {
        voltage,
        fraction: fraction.clamp(0.0, 1.0),
    }
}
