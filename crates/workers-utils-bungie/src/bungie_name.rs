//! Bungie name parsing

use regex::Regex;
use std::sync::LazyLock;
use workers_utils_common::{Result, thing_or_err};

#[allow(clippy::expect_used)]
static BUNGIE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+)#(\d{1,4})$").expect("Bungie name pattern is valid"));

/// A Bungie name split into its display name and numeric code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BungieName {
    pub display_name: String,
    pub display_name_code: u16,
}

/// Parse `Name#1234` into its parts
pub fn validate_bungie_name(name: &str) -> Result<BungieName> {
    let captures = thing_or_err(BUNGIE_NAME.captures(name), "Invalid Bungie name provided", &[])?;
    let parsed = captures[2].parse::<u16>().ok();
    let display_name_code = thing_or_err(parsed, "Invalid Bungie name provided", &[])?;

    Ok(BungieName {
        display_name: captures[1].to_string(),
        display_name_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(
            validate_bungie_name("Guardian#0042").expect("valid name"),
            BungieName {
                display_name: "Guardian".to_string(),
                display_name_code: 42,
            }
        );
        // Only the last `#` separates the code
        assert_eq!(
            validate_bungie_name("a#b#7").expect("valid name").display_name,
            "a#b"
        );
    }

    #[test]
    fn test_invalid_names() {
        for name in ["Guardian", "Guardian#", "Guardian#12345", "#1234", "Guardian#12a"] {
            let err = validate_bungie_name(name).expect_err(name);
            assert_eq!(err.to_string(), "Invalid Bungie name provided");
        }
    }
}
