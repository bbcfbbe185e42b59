use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Result;

/// The user's current choice of one key per catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub material: String,
    /// Only consulted for materials with thickness variants.
    #[serde(default)]
    pub thickness: Option<String>,
    pub concentrate: String,
    pub heater: String,
    #[serde(default)]
    pub rig: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            material: "quartz".into(),
            thickness: Some("2mm".into()),
            concentrate: "shatter".into(),
            heater: "butane_torch".into(),
            rig: Some("standard_rig".into()),
        }
    }
}

impl Selection {
    pub fn new(
        material: impl Into<String>,
        concentrate: impl Into<String>,
        heater: impl Into<String>,
    ) -> Self {
        Self {
            material: material.into(),
            thickness: None,
            concentrate: concentrate.into(),
            heater: heater.into(),
            rig: None,
        }
    }

    pub fn with_thickness(mut self, thickness: impl Into<String>) -> Self {
        self.thickness = Some(thickness.into());
        self
    }

    pub fn with_rig(mut self, rig: impl Into<String>) -> Self {
        self.rig = Some(rig.into());
        self
    }

    /// Check that every key resolves against `catalog`.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        catalog
            .material(&self.material)?
            .base_times(self.thickness.as_deref())?;
        catalog.concentrate(&self.concentrate)?;
        catalog.heater(&self.heater)?;
        if let Some(rig) = &self.rig {
            catalog.rig(rig)?;
        }
        Ok(())
    }
}
