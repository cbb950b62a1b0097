use serde::Serialize;
use tabled::Tabled;

use motionbridge_core::MacAddress;

use crate::cli::{GlobalOpts, UuidArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct AccessoryId {
    mac: String,
    uuid: String,
}

#[derive(Tabled)]
struct AccessoryIdRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Accessory UUID")]
    uuid: String,
}

/// Normalize and check that `raw` is six hex octets.
fn parse_mac(raw: &str) -> Result<MacAddress, CliError> {
    let mac = MacAddress::new(raw);
    let octets: Vec<&str> = mac.as_str().split(':').collect();
    let well_formed = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));
    if well_formed {
        Ok(mac)
    } else {
        Err(CliError::Validation {
            field: "mac".into(),
            reason: format!("'{raw}' is not a MAC address (expected aa:bb:cc:dd:ee:ff)"),
        })
    }
}

pub fn handle(args: &UuidArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let ids = args
        .macs
        .iter()
        .map(|raw| {
            let mac = parse_mac(raw)?;
            Ok(AccessoryId {
                uuid: mac.accessory_uuid().to_string(),
                mac: mac.to_string(),
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    let out = output::render_list(
        &global.output,
        &ids,
        |id| AccessoryIdRow {
            mac: id.mac.clone(),
            uuid: id.uuid.clone(),
        },
        |id| id.uuid.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dashes_and_uppercase() {
        let mac = parse_mac("AA-BB-CC-DD-EE-FF").unwrap();
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn accepts_bare_hex() {
        let mac = parse_mac("AABBCCDDEEFF").unwrap();
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn rejects_short_and_non_hex() {
        assert!(parse_mac("aa:bb:cc").is_err());
        assert!(parse_mac("zz:bb:cc:dd:ee:ff").is_err());
        assert!(parse_mac("aabbccddeef").is_err());
    }
}
