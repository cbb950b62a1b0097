use serde::Serialize;
use tabled::Tabled;

use motionbridge_core::BlindConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// A blind's effective settings after defaults are applied.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedBlind {
    mac: String,
    name: String,
    invert: bool,
    tilt: bool,
    /// Milliseconds, 0 when polling is off.
    poll_interval: u64,
    low_battery_threshold: u8,
    /// Explicit override; `None` means detected from the device.
    is_battery_powered: Option<bool>,
}

impl From<&BlindConfig> for ResolvedBlind {
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn from(cfg: &BlindConfig) -> Self {
        Self {
            mac: cfg.mac.to_string(),
            name: cfg.display_name().to_owned(),
            invert: cfg.invert(),
            tilt: cfg.tilt(),
            poll_interval: cfg.poll_interval().map_or(0, |d| d.as_millis() as u64),
            low_battery_threshold: cfg.low_battery_threshold(),
            is_battery_powered: cfg.is_battery_powered,
        }
    }
}

#[derive(Tabled)]
struct BlindRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Invert")]
    invert: bool,
    #[tabled(rename = "Tilt")]
    tilt: bool,
    #[tabled(rename = "Poll")]
    poll: String,
    #[tabled(rename = "Low Battery")]
    low_battery: String,
    #[tabled(rename = "Battery Powered")]
    battery_powered: String,
}

impl From<&ResolvedBlind> for BlindRow {
    fn from(b: &ResolvedBlind) -> Self {
        Self {
            mac: b.mac.clone(),
            name: b.name.clone(),
            invert: b.invert,
            tilt: b.tilt,
            poll: match b.poll_interval {
                0 => "off".into(),
                ms => format!("{ms} ms"),
            },
            low_battery: format!("< {}%", b.low_battery_threshold),
            battery_powered: b
                .is_battery_powered
                .map_or_else(|| "auto".into(), |v| v.to_string()),
        }
    }
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let config = motionbridge_config::load_config(global.config.as_deref())?;
    let blinds: Vec<ResolvedBlind> = config
        .blind_table()
        .configs()
        .iter()
        .map(|c| ResolvedBlind::from(c.as_ref()))
        .collect();
    tracing::debug!(count = blinds.len(), "resolved blind configs");

    let out = output::render_list(&global.output, &blinds, |b| BlindRow::from(b), |b| b.mac.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
