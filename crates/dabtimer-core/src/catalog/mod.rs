//! Lookup catalog: static reference data for duration calculation.
//!
//! A catalog maps each category (materials, heaters, concentrates, rigs) from
//! a string key to an entry of positive coefficients. Categories keep their
//! declaration order, which listings and statistics tie-breaks rely on.
//!
//! Catalogs are validated once at construction and are immutable afterwards.
//! The raw table is TOML; see [`Catalog::from_toml_str`].

mod builtin;
mod entry;

pub use entry::{BaseTimes, ConcentrateEntry, HeaterEntry, MaterialEntry, RigEntry};

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Material,
    Thickness,
    Concentrate,
    Heater,
    Rig,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Material => "material",
            Category::Thickness => "thickness",
            Category::Concentrate => "concentrate",
            Category::Heater => "heater",
            Category::Rig => "rig",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawCatalog {
    materials: IndexMap<String, MaterialEntry>,
    heaters: IndexMap<String, HeaterEntry>,
    concentrates: IndexMap<String, ConcentrateEntry>,
    #[serde(default)]
    rigs: IndexMap<String, RigEntry>,
}

/// Validated, immutable reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    materials: IndexMap<String, MaterialEntry>,
    heaters: IndexMap<String, HeaterEntry>,
    concentrates: IndexMap<String, ConcentrateEntry>,
    rigs: IndexMap<String, RigEntry>,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = CoreError;

    fn try_from(raw: RawCatalog) -> Result<Self> {
        if raw.materials.is_empty() {
            return Err(CoreError::InvalidCatalog("no materials declared".into()));
        }
        if raw.heaters.is_empty() {
            return Err(CoreError::InvalidCatalog("no heaters declared".into()));
        }
        if raw.concentrates.is_empty() {
            return Err(CoreError::InvalidCatalog("no concentrates declared".into()));
        }
        for (key, material) in &raw.materials {
            material.validate(key)?;
        }
        for (key, heater) in &raw.heaters {
            heater.validate(key)?;
        }
        for (key, concentrate) in &raw.concentrates {
            concentrate.validate(key)?;
        }
        for (key, rig) in &raw.rigs {
            rig.validate(key)?;
        }
        Ok(Self {
            materials: raw.materials,
            heaters: raw.heaters,
            concentrates: raw.concentrates,
            rigs: raw.rigs,
        })
    }
}

impl Catalog {
    /// The catalog shipped with the application.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(builtin::BUILTIN_CATALOG)
    }

    /// Parse and validate a raw TOML table.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded catalog");
        Ok(catalog)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn material(&self, key: &str) -> Result<&MaterialEntry> {
        lookup(&self.materials, Category::Material, key)
    }

    pub fn heater(&self, key: &str) -> Result<&HeaterEntry> {
        lookup(&self.heaters, Category::Heater, key)
    }

    pub fn concentrate(&self, key: &str) -> Result<&ConcentrateEntry> {
        lookup(&self.concentrates, Category::Concentrate, key)
    }

    pub fn rig(&self, key: &str) -> Result<&RigEntry> {
        lookup(&self.rigs, Category::Rig, key)
    }

    /// Whether `key` exists in `category`.
    ///
    /// Thickness keys are checked across every material.
    pub fn contains(&self, category: Category, key: &str) -> bool {
        match category {
            Category::Material => self.materials.contains_key(key),
            Category::Thickness => self
                .materials
                .values()
                .any(|m| m.thickness.contains_key(key)),
            Category::Concentrate => self.concentrates.contains_key(key),
            Category::Heater => self.heaters.contains_key(key),
            Category::Rig => self.rigs.contains_key(key),
        }
    }

    /// Keys of `category` in declaration order.
    pub fn keys(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Material => self.materials.keys().map(String::as_str).collect(),
            Category::Thickness => {
                let mut keys: Vec<&str> = Vec::new();
                for material in self.materials.values() {
                    for key in material.thickness.keys() {
                        if !keys.contains(&key.as_str()) {
                            keys.push(key);
                        }
                    }
                }
                keys
            }
            Category::Concentrate => self.concentrates.keys().map(String::as_str).collect(),
            Category::Heater => self.heaters.keys().map(String::as_str).collect(),
            Category::Rig => self.rigs.keys().map(String::as_str).collect(),
        }
    }

    /// Declaration index of a concentrate, used for deterministic tie-breaks.
    pub fn concentrate_rank(&self, key: &str) -> Option<usize> {
        self.concentrates.get_index_of(key)
    }

    pub fn materials(&self) -> impl Iterator<Item = (&str, &MaterialEntry)> {
        self.materials.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn heaters(&self) -> impl Iterator<Item = (&str, &HeaterEntry)> {
        self.heaters.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn concentrates(&self) -> impl Iterator<Item = (&str, &ConcentrateEntry)> {
        self.concentrates.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn rigs(&self) -> impl Iterator<Item = (&str, &RigEntry)> {
        self.rigs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn lookup<'a, T>(map: &'a IndexMap<String, T>, category: Category, key: &str) -> Result<&'a T> {
    map.get(key).ok_or_else(|| CoreError::UnknownKey {
        category,
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.keys(Category::Material), vec!["quartz", "titanium", "ceramic"]);
        assert_eq!(
            catalog.keys(Category::Concentrate),
            vec!["shatter", "wax", "resin", "rosin", "budder"]
        );
        assert_eq!(catalog.keys(Category::Thickness), vec!["1mm", "2mm", "4mm"]);
        assert_eq!(catalog.heater("bic_lighter").unwrap().modifier, 2.2);
        assert_eq!(catalog.rig("recycler").unwrap().cool_modifier, 1.2);
    }

    #[test]
    fn unknown_key_fails_explicitly() {
        let catalog = Catalog::builtin().unwrap();
        let err = catalog.concentrate("live_sugar").unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownKey { category: Category::Concentrate, ref key } if key == "live_sugar"
        ));
    }

    #[test]
    fn concentrate_rank_follows_declaration_order() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.concentrate_rank("shatter"), Some(0));
        assert_eq!(catalog.concentrate_rank("budder"), Some(4));
        assert_eq!(catalog.concentrate_rank("diamonds"), None);
    }

    #[test]
    fn rejects_non_positive_coefficients() {
        let raw = r#"
            [materials.glass]
            base_heat_secs = 20
            base_cool_secs = 30

            [heaters.torch]
            modifier = -1.0

            [concentrates.wax]
            heat_modifier = 1.0
        "#;
        let err = Catalog::from_toml_str(raw).unwrap_err();
        assert!(err.to_string().contains("heaters.torch.modifier"), "{err}");
    }

    #[test]
    fn rejects_material_without_times() {
        let raw = r#"
            [materials.glass]
            specific_heat = 0.8

            [heaters.torch]
            modifier = 1.0

            [concentrates.wax]
            heat_modifier = 1.0
        "#;
        assert!(Catalog::from_toml_str(raw).is_err());
    }

    #[test]
    fn rigs_are_optional() {
        let raw = r#"
            [materials.glass]
            base_heat_secs = 20
            base_cool_secs = 30

            [heaters.torch]
            modifier = 1.0

            [concentrates.wax]
            heat_modifier = 1.0
        "#;
        let catalog = Catalog::from_toml_str(raw).unwrap();
        assert!(catalog.keys(Category::Rig).is_empty());
        assert!(catalog.rig("mini_rig").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, builtin::BUILTIN_CATALOG).unwrap();
        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded, Catalog::builtin().unwrap());
    }
}
