use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Inclusive bounds for user-supplied custom durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    #[serde(default = "default_heat_min")]
    pub heat_min: u32,
    #[serde(default = "default_heat_max")]
    pub heat_max: u32,
    #[serde(default = "default_cool_min")]
    pub cool_min: u32,
    #[serde(default = "default_cool_max")]
    pub cool_max: u32,
}

fn default_heat_min() -> u32 {
    5
}
fn default_heat_max() -> u32 {
    300
}
fn default_cool_min() -> u32 {
    30
}
fn default_cool_max() -> u32 {
    120
}

impl DurationBounds {
    /// Each minimum must be at least one second and no larger than its maximum.
    pub fn validate(&self) -> Result<()> {
        check_bounds("heat", self.heat_min, self.heat_max)?;
        check_bounds("cool", self.cool_min, self.cool_max)
    }
}

fn check_bounds(field: &'static str, min: u32, max: u32) -> Result<()> {
    if min >= 1 && min <= max {
        Ok(())
    } else {
        Err(CoreError::InvalidBounds { field, min, max })
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self {
            heat_min: default_heat_min(),
            heat_max: default_heat_max(),
            cool_min: default_cool_min(),
            cool_max: default_cool_max(),
        }
    }
}

/// Explicit heat/cool seconds that replace the computed durations when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDurations {
    pub heat_secs: u32,
    pub cool_secs: u32,
    #[serde(default, alias = "locked")]
    pub enabled: bool,
}

impl Default for CustomDurations {
    fn default() -> Self {
        Self {
            heat_secs: 30,
            cool_secs: 45,
            enabled: false,
        }
    }
}

impl CustomDurations {
    /// Build enabled custom durations, rejecting out-of-range values.
    pub fn new(heat_secs: u32, cool_secs: u32, bounds: &DurationBounds) -> Result<Self> {
        let custom = Self {
            heat_secs,
            cool_secs,
            enabled: true,
        };
        custom.validate(bounds)?;
        Ok(custom)
    }

    /// Both values must lie within `bounds`, which must themselves be valid.
    /// Nothing is clamped.
    pub fn validate(&self, bounds: &DurationBounds) -> Result<()> {
        bounds.validate()?;
        check("heat", self.heat_secs, bounds.heat_min, bounds.heat_max)?;
        check("cool", self.cool_secs, bounds.cool_min, bounds.cool_max)
    }
}

fn check(field: &'static str, value: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::InvalidCustomDuration {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let bounds = DurationBounds::default();
        assert!(CustomDurations::new(5, 30, &bounds).is_ok());
        assert!(CustomDurations::new(300, 120, &bounds).is_ok());
    }

    #[test]
    fn heat_below_minimum_is_rejected() {
        let err = CustomDurations::new(2, 90, &DurationBounds::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidCustomDuration { field: "heat", value: 2, min: 5, max: 300 }
        ));
    }

    #[test]
    fn cool_above_maximum_is_rejected() {
        let err = CustomDurations::new(30, 121, &DurationBounds::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCustomDuration { field: "cool", .. }));
    }

    #[test]
    fn zero_minimum_bounds_are_rejected() {
        let bounds = DurationBounds {
            heat_min: 0,
            cool_min: 0,
            ..DurationBounds::default()
        };
        let err = CustomDurations::new(0, 0, &bounds).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBounds { field: "heat", min: 0, .. }));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let bounds = DurationBounds {
            cool_min: 120,
            cool_max: 30,
            ..DurationBounds::default()
        };
        assert!(matches!(
            bounds.validate(),
            Err(CoreError::InvalidBounds { field: "cool", min: 120, max: 30 })
        ));
        assert!(DurationBounds::default().validate().is_ok());
    }

    #[test]
    fn locked_is_accepted_as_enabled() {
        let custom: CustomDurations =
            serde_json::from_str(r#"{"heat_secs": 12, "cool_secs": 90, "locked": true}"#).unwrap();
        assert!(custom.enabled);
    }

    #[test]
    fn toml_roundtrip_preserves_value() {
        let custom = CustomDurations::new(12, 90, &DurationBounds::default()).unwrap();
        let text = toml::to_string(&custom).unwrap();
        let parsed: CustomDurations = toml::from_str(&text).unwrap();
        assert_eq!(parsed, custom);
    }
}
