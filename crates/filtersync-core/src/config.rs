//! Binding configuration

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attribute whose value is a control's filter name
    pub filter_attribute: String,
    /// CSS selector of the container the filters live in
    pub form_selector: String,
}

impl Config {
    pub fn new(filter_attribute: &str, form_selector: &str) -> Self {
        Self {
            filter_attribute: filter_attribute.to_string(),
            form_selector: form_selector.to_string(),
        }
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.filter_attribute.trim().is_empty() {
            return Err(CoreError::Config(
                "filter_attribute cannot be empty".to_string(),
            ));
        }
        if self.form_selector.trim().is_empty() {
            return Err(CoreError::Config("form_selector cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("name", "form")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults() {
        let config = Config::from_json(r#"{"filter_attribute": "data-filter"}"#).unwrap();
        assert_eq!(config.filter_attribute, "data-filter");
        assert_eq!(config.form_selector, "form");

        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            Config::from_json(r#"{"filter_attribute": " "}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(CoreError::Serialization(_))
        ));
    }
}
