use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

use super::Category;

/// Base heat/cool seconds for one material (or one thickness of it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseTimes {
    pub base_heat_secs: f64,
    pub base_cool_secs: f64,
}

/// A surface material.
///
/// Materials either carry flat base times or a table of thickness variants,
/// each with its own base times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_heat_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_cool_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub thickness: IndexMap<String, BaseTimes>,
    /// Thickness used when a selection does not name one.
    /// Defaults to the first declared thickness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_thickness: Option<String>,
    /// W/(m·K), informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_conductivity: Option<f64>,
    /// J/(g·K), informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_heat: Option<f64>,
}

impl MaterialEntry {
    pub fn has_thickness(&self) -> bool {
        !self.thickness.is_empty()
    }

    /// Resolve the base times, honouring an optional thickness key.
    ///
    /// Materials without thickness variants ignore the key.
    pub fn base_times(&self, thickness: Option<&str>) -> Result<BaseTimes> {
        if !self.has_thickness() {
            if let Some(key) = thickness {
                tracing::debug!(thickness = key, "material has no thickness variants, ignoring");
            }
            return match (self.base_heat_secs, self.base_cool_secs) {
                (Some(base_heat_secs), Some(base_cool_secs)) => Ok(BaseTimes {
                    base_heat_secs,
                    base_cool_secs,
                }),
                _ => Err(CoreError::InvalidCatalog(
                    "material has neither base times nor thickness variants".into(),
                )),
            };
        }

        let key = thickness
            .or(self.default_thickness.as_deref())
            .or_else(|| self.thickness.keys().next().map(String::as_str))
            .unwrap_or_default();
        self.thickness
            .get(key)
            .copied()
            .ok_or_else(|| CoreError::UnknownKey {
                category: Category::Thickness,
                key: key.to_string(),
            })
    }

    pub(super) fn validate(&self, key: &str) -> Result<()> {
        if self.has_thickness() {
            for (thickness, times) in &self.thickness {
                let path = format!("materials.{key}.thickness.{thickness}");
                check_coefficient(&format!("{path}.base_heat_secs"), times.base_heat_secs)?;
                check_coefficient(&format!("{path}.base_cool_secs"), times.base_cool_secs)?;
            }
            if let Some(default) = &self.default_thickness {
                if !self.thickness.contains_key(default) {
                    return Err(CoreError::InvalidCatalog(format!(
                        "materials.{key}.default_thickness '{default}' is not a declared thickness"
                    )));
                }
            }
        } else {
            let (Some(heat), Some(cool)) = (self.base_heat_secs, self.base_cool_secs) else {
                return Err(CoreError::InvalidCatalog(format!(
                    "materials.{key} needs base_heat_secs and base_cool_secs or a thickness table"
                )));
            };
            check_coefficient(&format!("materials.{key}.base_heat_secs"), heat)?;
            check_coefficient(&format!("materials.{key}.base_cool_secs"), cool)?;
        }
        if let Some(k) = self.thermal_conductivity {
            check_coefficient(&format!("materials.{key}.thermal_conductivity"), k)?;
        }
        if let Some(c) = self.specific_heat {
            check_coefficient(&format!("materials.{key}.specific_heat"), c)?;
        }
        Ok(())
    }
}

/// A heating element (torch, lighter, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterEntry {
    /// Multiplier on heat time; lower is a hotter, faster heater.
    pub modifier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temp_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
}

impl HeaterEntry {
    pub(super) fn validate(&self, key: &str) -> Result<()> {
        check_coefficient(&format!("heaters.{key}.modifier"), self.modifier)?;
        if let Some(t) = self.max_temp_c {
            check_coefficient(&format!("heaters.{key}.max_temp_c"), t)?;
        }
        if let Some(e) = self.efficiency {
            check_coefficient(&format!("heaters.{key}.efficiency"), e)?;
        }
        Ok(())
    }
}

/// A concentrate type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrateEntry {
    pub heat_modifier: f64,
    /// Falls back to `heat_modifier` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cool_modifier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_temp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConcentrateEntry {
    pub fn cool_modifier(&self) -> f64 {
        self.cool_modifier.unwrap_or(self.heat_modifier)
    }

    pub(super) fn validate(&self, key: &str) -> Result<()> {
        check_coefficient(&format!("concentrates.{key}.heat_modifier"), self.heat_modifier)?;
        if let Some(m) = self.cool_modifier {
            check_coefficient(&format!("concentrates.{key}.cool_modifier"), m)?;
        }
        Ok(())
    }
}

/// A rig type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigEntry {
    pub heat_modifier: f64,
    pub cool_modifier: f64,
}

impl RigEntry {
    pub(super) fn validate(&self, key: &str) -> Result<()> {
        check_coefficient(&format!("rigs.{key}.heat_modifier"), self.heat_modifier)?;
        check_coefficient(&format!("rigs.{key}.cool_modifier"), self.cool_modifier)
    }
}

fn check_coefficient(path: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidCatalog(format!(
            "{path} must be a positive finite number, got {value}"
        )))
    }
}
