use serde::Serialize;
use tabled::Tabled;

use motionbridge_api::battery_info;
use motionbridge_core::translate::battery_percent;

use crate::cli::{BatteryArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// What the bridge would publish for a raw `batteryLevel` reading.
#[derive(Debug, Serialize)]
struct BatteryReading {
    raw: u32,
    voltage: f64,
    percent: u8,
}

#[derive(Tabled)]
struct BatteryRow {
    #[tabled(rename = "Raw")]
    raw: u32,
    #[tabled(rename = "Voltage")]
    voltage: String,
    #[tabled(rename = "Charge")]
    percent: String,
}

pub fn handle(args: &BatteryArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let readings: Vec<BatteryReading> = args
        .levels
        .iter()
        .map(|&raw| BatteryReading {
            raw,
            voltage: battery_info(raw).voltage,
            percent: battery_percent(raw),
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &readings,
        |r| BatteryRow {
            raw: r.raw,
            voltage: format!("{:.2} V", r.voltage),
            percent: format!("{}%", r.percent),
        },
        |r| r.percent.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
