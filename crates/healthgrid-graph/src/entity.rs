//! Entities: the nodes placed on the globe.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Latitude / longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPosition {
    /// Create a new position.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both coordinates are inside the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Entity category tag.
///
/// Tags outside the known set are kept verbatim in [`Category::Other`] so
/// they survive a load/serve round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Central server
    Hub,
    /// Patient-side data source
    Source,
    /// Care provider
    Provider,
    /// Physical logistics (pharmacy, drone, ambulance)
    Logistics,
    /// Marketplace and research
    Ecosystem,
    /// Field sensor
    Sensor,
    /// Unrecognised tag, as written in the data file
    Other(String),
}

impl Category {
    /// Tag as it appears in data files.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Hub => "hub",
            Category::Source => "source",
            Category::Provider => "provider",
            Category::Logistics => "logistics",
            Category::Ecosystem => "ecosystem",
            Category::Sensor => "sensor",
            Category::Other(tag) => tag,
        }
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        match tag {
            "hub" => Category::Hub,
            "source" => Category::Source,
            "provider" => Category::Provider,
            "logistics" => Category::Logistics,
            "ecosystem" => Category::Ecosystem,
            "sensor" => Category::Sensor,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match Category::from(tag.as_str()) {
            Category::Other(_) => Category::Other(tag),
            known => known,
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the network diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(flatten)]
    pub position: GeoPosition,
    pub label: String,
    #[serde(rename = "type")]
    pub category: Category,
    /// Opaque display token (usually a CSS colour)
    pub color: String,
    /// Relative size, always positive
    pub size: f64,
    /// Feeds the pipeline stream
    #[serde(default)]
    pub pipeline: bool,
}

impl Entity {
    /// Create an entity without the pipeline flag.
    pub fn new(
        id: impl Into<EntityId>,
        position: GeoPosition,
        label: impl Into<String>,
        category: Category,
        color: impl Into<String>,
        size: f64,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            label: label.into(),
            category,
            color: color.into(),
            size,
            pipeline: false,
        }
    }

    /// Mark this entity as a pipeline feeder.
    pub fn with_pipeline(mut self) -> Self {
        self.pipeline = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_borrows_as_str() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(EntityId::from("server"));
        assert!(set.contains("server"));
        assert!(!set.contains("doctor"));
    }

    #[test]
    fn position_bounds() {
        assert!(GeoPosition::new(38.0, -95.0).is_valid());
        assert!(GeoPosition::new(90.0, 180.0).is_valid());
        assert!(!GeoPosition::new(91.0, 0.0).is_valid());
        assert!(!GeoPosition::new(0.0, -180.5).is_valid());
        assert!(!GeoPosition::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn entity_json_uses_flat_position_and_type_tag() {
        let json = r##"{"id":"market","lat":5.0,"lng":20.0,"label":"Telth Market","type":"ecosystem","color":"#f472b6","size":4,"pipeline":true}"##;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.id, "market");
        assert_eq!(entity.position, GeoPosition::new(5.0, 20.0));
        assert_eq!(entity.category, Category::Ecosystem);
        assert!(entity.pipeline);
    }

    #[test]
    fn unknown_category_keeps_its_tag() {
        let json = r##"{"id":"x","lat":0,"lng":0,"label":"X","type":"satellite","color":"#fff","size":1}"##;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.category, Category::Other("satellite".to_string()));
        assert!(!entity.pipeline);

        let back = serde_json::to_value(&entity).unwrap();
        assert_eq!(back["type"], "satellite");
    }

    #[test]
    fn known_category_tags_round_trip() {
        for tag in ["hub", "source", "provider", "logistics", "ecosystem", "sensor"] {
            let category = Category::from(tag);
            assert!(!matches!(category, Category::Other(_)), "{tag}");
            assert_eq!(serde_json::to_value(&category).unwrap(), tag);
        }
    }
}
