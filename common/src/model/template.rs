use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often a check template is meant to be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckFrequency {
    Preuse,
    Daily,
    Monthly,
    Yearly,
}

impl CheckFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckFrequency::Preuse => "preuse",
            CheckFrequency::Daily => "daily",
            CheckFrequency::Monthly => "monthly",
            CheckFrequency::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<CheckFrequency> {
        match s {
            "preuse" => Some(CheckFrequency::Preuse),
            "daily" => Some(CheckFrequency::Daily),
            "monthly" => Some(CheckFrequency::Monthly),
            "yearly" => Some(CheckFrequency::Yearly),
            _ => None,
        }
    }
}

/// Where a check item came from.
///
/// Stored as a single tag string: `generic`, `ride:<category>`, `library`
/// or `custom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCategory {
    /// Applies to any ride.
    Generic,
    /// Specific to one ride category (e.g. `ride:coaster`).
    RideSpecific(String),
    /// Picked from the check item library in bulk.
    Library,
    /// Freeform text entered by the operator.
    Custom,
}

impl ItemCategory {
    pub fn as_tag(&self) -> String {
        match self {
            ItemCategory::Generic => "generic".to_string(),
            ItemCategory::RideSpecific(cat) => format!("ride:{}", cat),
            ItemCategory::Library => "library".to_string(),
            ItemCategory::Custom => "custom".to_string(),
        }
    }

    pub fn from_tag(tag: &str) -> Result<ItemCategory, String> {
        match tag {
            "generic" => Ok(ItemCategory::Generic),
            "library" => Ok(ItemCategory::Library),
            "custom" => Ok(ItemCategory::Custom),
            other => match other.strip_prefix("ride:") {
                Some(cat) if !cat.is_empty() => Ok(ItemCategory::RideSpecific(cat.to_string())),
                _ => Err(format!("unknown item category tag: {}", other)),
            },
        }
    }
}

impl Serialize for ItemCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_tag())
    }
}

impl<'de> Deserialize<'de> for ItemCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        ItemCategory::from_tag(&tag).map_err(serde::de::Error::custom)
    }
}

/// A named, frequency-scoped checklist owned by one ride.
///
/// At most one template per (owner, ride, frequency) is active at a time;
/// the backend enforces this on activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub owner_id: String,
    pub ride_id: String,
    pub name: String,
    pub frequency: CheckFrequency,
    pub is_active: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub items: Vec<TemplateItem>,
}

/// One ordered row of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateItem {
    pub id: String,
    pub template_id: String,
    pub text: String,
    pub category: ItemCategory,
    pub is_required: bool,
    pub sort_order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tag_round_trip() {
        for cat in [
            ItemCategory::Generic,
            ItemCategory::RideSpecific("coaster".to_string()),
            ItemCategory::Library,
            ItemCategory::Custom,
        ] {
            assert_eq!(ItemCategory::from_tag(&cat.as_tag()).unwrap(), cat);
        }
    }

    #[test]
    fn category_rejects_unknown_tags() {
        assert!(ItemCategory::from_tag("ride:").is_err());
        assert!(ItemCategory::from_tag("bogus").is_err());
    }

    #[test]
    fn frequency_parse_matches_as_str() {
        for freq in [
            CheckFrequency::Preuse,
            CheckFrequency::Daily,
            CheckFrequency::Monthly,
            CheckFrequency::Yearly,
        ] {
            assert_eq!(CheckFrequency::parse(freq.as_str()), Some(freq));
        }
        assert_eq!(CheckFrequency::parse("weekly"), None);
    }
}
