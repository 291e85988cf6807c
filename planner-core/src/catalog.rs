//! Map catalog: the backgrounds a plan can be drawn on.

use serde::{Deserialize, Serialize};

use crate::{PlannerError, PlannerResult};

const IMAGE_BASE: &str =
    "https://github.com/HEATLabs/HEAT-Labs-Images-Features/blob/main/strat-planner";

/// One selectable map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapInfo {
    /// Stable identifier stored in plans.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Background image URL.
    pub image: String,
}

impl MapInfo {
    /// Create a catalog entry.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
        }
    }

    fn radar(id: &str, name: &str) -> Self {
        Self::new(id, name, format!("{IMAGE_BASE}/{id}_radar.webp?raw=true"))
    }
}

/// Ordered list of maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapCatalog {
    maps: Vec<MapInfo>,
}

impl MapCatalog {
    /// Build a catalog from entries.
    #[must_use]
    pub fn new(maps: Vec<MapInfo>) -> Self {
        Self { maps }
    }

    /// Parse a JSON array of `{id, name, image}` objects.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Serialization`] if the JSON is malformed.
    pub fn from_json(json: &str) -> PlannerResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        tracing::debug!(maps = catalog.maps.len(), "Loaded map catalog");
        Ok(catalog)
    }

    /// Look up a map by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&MapInfo> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// Look up a map, failing for unknown ids.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownMap`] if no entry has that id.
    pub fn require(&self, id: &str) -> PlannerResult<&MapInfo> {
        self.find(id)
            .ok_or_else(|| PlannerError::UnknownMap(id.to_string()))
    }

    /// All entries in display order.
    #[must_use]
    pub fn maps(&self) -> &[MapInfo] {
        &self.maps
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl Default for MapCatalog {
    fn default() -> Self {
        Self::new(vec![
            MapInfo::radar("blossom_crash", "Blossom Crash"),
            MapInfo::radar("nord_oko", "Nord Oko"),
            MapInfo::radar("scarred_city", "Scarred City"),
            MapInfo::radar("sunstroke", "Sunstroke"),
        ])
    }
}
