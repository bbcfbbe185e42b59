//! Duration calculator.
//!
//! Maps a [`Selection`] and a [`Catalog`] to the heat and cool seconds of one
//! cycle using a modifier product:
//!
//! ```text
//! heat = round(base_heat × heater × concentrate_heat × rig_heat)
//! cool = round(base_cool × concentrate_cool × rig_cool)
//! ```
//!
//! Each result is floored at [`HEAT_FLOOR_SECS`] / [`COOL_FLOOR_SECS`]. Enabled
//! [`CustomDurations`] bypass the formula entirely.

mod custom;
mod selection;

pub use custom::{CustomDurations, DurationBounds};
pub use selection::Selection;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{CoreError, Result};
use crate::timer::Phase;

/// Minimum computed heat time in seconds.
pub const HEAT_FLOOR_SECS: u32 = 10;
/// Minimum computed cool time in seconds.
pub const COOL_FLOOR_SECS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationSource {
    Computed,
    Custom,
}

/// Resolved durations for one cycle, with the selection they were resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDurations {
    pub heat_secs: u32,
    pub cool_secs: u32,
    pub source: DurationSource,
    pub selection: Selection,
}

impl CycleDurations {
    pub fn total_secs(&self) -> u32 {
        self.heat_secs.saturating_add(self.cool_secs)
    }
}

/// Every factor that went into a computed duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationBreakdown {
    pub base_heat_secs: f64,
    pub base_cool_secs: f64,
    pub heater_modifier: f64,
    pub concentrate_heat_modifier: f64,
    pub concentrate_cool_modifier: f64,
    pub rig_heat_modifier: f64,
    pub rig_cool_modifier: f64,
    /// Unrounded products.
    pub raw_heat_secs: f64,
    pub raw_cool_secs: f64,
    pub heat_secs: u32,
    pub cool_secs: u32,
    pub heat_floored: bool,
    pub cool_floored: bool,
}

/// Compute the durations for one cycle.
///
/// Enabled custom durations are validated against `bounds` and returned
/// verbatim without consulting the catalog.
pub fn compute_durations(
    selection: &Selection,
    catalog: &Catalog,
    custom: Option<&CustomDurations>,
    bounds: &DurationBounds,
) -> Result<CycleDurations> {
    if let Some(custom) = custom.filter(|c| c.enabled) {
        custom.validate(bounds)?;
        tracing::debug!(
            heat_secs = custom.heat_secs,
            cool_secs = custom.cool_secs,
            "using custom durations"
        );
        return Ok(CycleDurations {
            heat_secs: custom.heat_secs,
            cool_secs: custom.cool_secs,
            source: DurationSource::Custom,
            selection: selection.clone(),
        });
    }

    let breakdown = explain_durations(selection, catalog)?;
    Ok(CycleDurations {
        heat_secs: breakdown.heat_secs,
        cool_secs: breakdown.cool_secs,
        source: DurationSource::Computed,
        selection: selection.clone(),
    })
}

/// Run the formula and report every factor.
pub fn explain_durations(selection: &Selection, catalog: &Catalog) -> Result<DurationBreakdown> {
    let base = catalog
        .material(&selection.material)?
        .base_times(selection.thickness.as_deref())?;
    let heater = catalog.heater(&selection.heater)?;
    let concentrate = catalog.concentrate(&selection.concentrate)?;
    let (rig_heat_modifier, rig_cool_modifier) = match &selection.rig {
        Some(key) => {
            let rig = catalog.rig(key)?;
            (rig.heat_modifier, rig.cool_modifier)
        }
        None => (1.0, 1.0),
    };

    let raw_heat_secs =
        base.base_heat_secs * heater.modifier * concentrate.heat_modifier * rig_heat_modifier;
    let raw_cool_secs = base.base_cool_secs * concentrate.cool_modifier() * rig_cool_modifier;

    let rounded_heat = round_secs(Phase::Heating, raw_heat_secs)?;
    let rounded_cool = round_secs(Phase::Cooling, raw_cool_secs)?;

    Ok(DurationBreakdown {
        base_heat_secs: base.base_heat_secs,
        base_cool_secs: base.base_cool_secs,
        heater_modifier: heater.modifier,
        concentrate_heat_modifier: concentrate.heat_modifier,
        concentrate_cool_modifier: concentrate.cool_modifier(),
        rig_heat_modifier,
        rig_cool_modifier,
        raw_heat_secs,
        raw_cool_secs,
        heat_secs: rounded_heat.max(HEAT_FLOOR_SECS),
        cool_secs: rounded_cool.max(COOL_FLOOR_SECS),
        heat_floored: rounded_heat < HEAT_FLOOR_SECS,
        cool_floored: rounded_cool < COOL_FLOOR_SECS,
    })
}

fn round_secs(phase: Phase, value: f64) -> Result<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(u32::MAX) {
        tracing::error!(%phase, value, "computed duration is out of range");
        return Err(CoreError::InvalidDuration { phase, value });
    }
    Ok(rounded as u32)
}
