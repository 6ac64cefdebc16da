use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity category as produced by the upstream extractor.
///
/// Unknown labels pass through untouched as [`EntityType::Unlisted`]; the
/// extractor owns the vocabulary, not this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Person,
    Organization,
    Location,
    Date,
    Event,
    Product,
    Infrastructure,
    Project,
    Money,
    Quantity,
    Law,
    Other,
    Unlisted(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::Location => "LOCATION",
            Self::Date => "DATE",
            Self::Event => "EVENT",
            Self::Product => "PRODUCT",
            Self::Infrastructure => "INFRASTRUCTURE",
            Self::Project => "PROJECT",
            Self::Money => "MONEY",
            Self::Quantity => "QUANTITY",
            Self::Law => "LAW",
            Self::Other => "OTHER",
            Self::Unlisted(label) => label,
        }
    }
}

impl Default for EntityType {
    fn default() -> Self {
        Self::Unlisted("UNKNOWN".to_string())
    }
}

impl From<String> for EntityType {
    fn from(label: String) -> Self {
        // Case-sensitive: "person" stays Unlisted("person").
        match label.as_str() {
            "PERSON" => Self::Person,
            "ORGANIZATION" => Self::Organization,
            "LOCATION" => Self::Location,
            "DATE" => Self::Date,
            "EVENT" => Self::Event,
            "PRODUCT" => Self::Product,
            "INFRASTRUCTURE" => Self::Infrastructure,
            "PROJECT" => Self::Project,
            "MONEY" => Self::Money,
            "QUANTITY" => Self::Quantity,
            "LAW" => Self::Law,
            "OTHER" => Self::Other,
            _ => Self::Unlisted(label),
        }
    }
}

impl From<&str> for EntityType {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<EntityType> for String {
    fn from(entity_type: EntityType) -> Self {
        entity_type.as_str().to_string()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named real-world thing extracted from article text. Identity is `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub entity_type: EntityType,
    #[serde(default)]
    pub context: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, entity_type: impl Into<EntityType>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            context: String::new(),
        }
    }
}

/// A directed, typed edge between two entity names. Either endpoint may be
/// absent from the entity list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    #[serde(default = "default_relationship")]
    pub relationship: String,
    #[serde(default)]
    pub context: String,
}

fn default_relationship() -> String {
    "related".to_string()
}

impl Relation {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
            context: String::new(),
        }
    }
}

/// Per-article knowledge graph, owned for the duration of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl KnowledgeGraph {
    pub fn new(entities: Vec<Entity>, relations: Vec<Relation>) -> Self {
        Self {
            entities,
            relations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }
}
