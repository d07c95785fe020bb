use serde::{Deserialize, Serialize};

/// Configuration for the contacts module (`modules.contacts` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactsConfig {
    /// Two-letter region assumed for phone numbers without a country code.
    #[serde(default = "default_region")]
    pub default_region: String,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            default_region: default_region(),
        }
    }
}

fn default_region() -> String {
    "AU".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: ContactsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.default_region, "AU");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_str::<ContactsConfig>(r#"{"region":"NZ"}"#);
        assert!(res.is_err());
    }
}
