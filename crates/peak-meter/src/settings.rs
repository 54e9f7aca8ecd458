use serde::{Deserialize, Serialize};

use crate::MeterError;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MeterSettings {
    pub bit_depth: u32,
    /// dB the meter falls per processed block.
    pub return_time: f64,
}

impl Default for MeterSettings {
    fn default() -> Self {
        Self {
            bit_depth: 16,
            return_time: 1.0,
        }
    }
}

impl MeterSettings {
    pub fn from_json(json: &str) -> Result<Self, MeterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, MeterError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings = MeterSettings::from_json(r#"{ "bit_depth": 24 }"#).unwrap();
        assert_eq!(24, settings.bit_depth);
        assert_eq!(1.0, settings.return_time);
    }

    #[test]
    fn survives_json_round_trip() {
        let settings = MeterSettings {
            bit_depth: 24,
            return_time: 0.25,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(settings, MeterSettings::from_json(&json).unwrap());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            MeterSettings::from_json("{ bit_depth: "),
            Err(MeterError::Settings(_))
        ));
    }
}
