// ABOUTME: Normalized output records, one variant per category, tagged by a "type" discriminator.
// ABOUTME: Records require a non-empty display name and serialize sparsely (empty fields omitted).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::{Category, Field};

/// A non-empty English display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Returns `None` for names that are empty after trimming.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DisplayName::new(value).ok_or_else(|| "display name must not be empty".to_string())
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub en: DisplayName,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jp: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weakness: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub habitat: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub en: DisplayName,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jp: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub weapon_class: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rarity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub en: DisplayName,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jp: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slot: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub en: DisplayName,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jp: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub en: DisplayName,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jp: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// One scraped entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Monster(Monster),
    Weapon(Weapon),
    Armor(Armor),
    Skill(Skill),
    Item(Item),
}

impl Record {
    pub fn category(&self) -> Category {
        match self {
            Record::Monster(_) => Category::Monster,
            Record::Weapon(_) => Category::Weapon,
            Record::Armor(_) => Category::Armor,
            Record::Skill(_) => Category::Skill,
            Record::Item(_) => Category::Item,
        }
    }

    pub fn name(&self) -> &DisplayName {
        match self {
            Record::Monster(r) => &r.en,
            Record::Weapon(r) => &r.en,
            Record::Armor(r) => &r.en,
            Record::Skill(r) => &r.en,
            Record::Item(r) => &r.en,
        }
    }

    /// Builds a record from extracted field values.
    ///
    /// Returns `None` when the display name is empty; such an item is not a
    /// record at all.
    pub fn from_fields(category: Category, mut fields: FieldValues) -> Option<Record> {
        let en = DisplayName::new(fields.text(Field::En))?;
        let jp = fields.text(Field::Jp);
        let record = match category {
            Category::Monster => Record::Monster(Monster {
                en,
                jp,
                weakness: dedup_preserving_order(fields.list(Field::Weakness)),
                materials: fields.list(Field::Materials),
                habitat: fields.text(Field::Habitat),
            }),
            Category::Weapon => Record::Weapon(Weapon {
                en,
                jp,
                weapon_class: fields.text(Field::WeaponClass),
                rarity: fields.text(Field::Rarity),
            }),
            Category::Armor => Record::Armor(Armor {
                en,
                jp,
                slot: fields.text(Field::Slot),
                skills: fields.list(Field::Skills),
            }),
            Category::Skill => Record::Skill(Skill {
                en,
                jp,
                category: fields.text(Field::Category),
                description: fields.text(Field::Description),
            }),
            Category::Item => Record::Item(Item {
                en,
                jp,
                category: fields.text(Field::Category),
                description: fields.text(Field::Description),
            }),
        };
        Some(record)
    }
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Values extracted for one item element, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: HashMap<Field, FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    /// Takes a scalar value; absent or list-valued fields yield an empty string.
    pub fn text(&mut self, field: Field) -> String {
        match self.values.remove(&field) {
            Some(FieldValue::Text(s)) => s,
            _ => String::new(),
        }
    }

    /// Takes a list value; absent or scalar fields yield an empty list.
    pub fn list(&mut self, field: Field) -> Vec<String> {
        match self.values.remove(&field) {
            Some(FieldValue::List(v)) => v,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn values(pairs: Vec<(Field, FieldValue)>) -> FieldValues {
        let mut fv = FieldValues::new();
        for (f, v) in pairs {
            fv.insert(f, v);
        }
        fv
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_empty_name_is_not_a_record() {
        let fv = values(vec![(Field::En, text("")), (Field::Jp, text("ドスジャグラス"))]);
        assert!(Record::from_fields(Category::Monster, fv).is_none());
        let fv = values(vec![(Field::En, text("   "))]);
        assert!(Record::from_fields(Category::Item, fv).is_none());
        assert!(Record::from_fields(Category::Skill, FieldValues::new()).is_none());
    }

    #[test]
    fn test_monster_serializes_sparsely_with_type_tag() {
        let fv = values(vec![
            (Field::En, text("Great Jagras")),
            (Field::Jp, text("")),
            (Field::Weakness, list(&["fire", "thunder", "fire"])),
            (Field::Materials, list(&[])),
        ]);
        let record = Record::from_fields(Category::Monster, fv).unwrap();
        assert_eq!(record.category(), Category::Monster);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"type": "monster", "en": "Great Jagras", "weakness": ["fire", "thunder"]})
        );
    }

    #[test]
    fn test_weapon_keeps_non_empty_fields() {
        let fv = values(vec![
            (Field::En, text("Iron Sword")),
            (Field::Jp, text("鉄刀")),
            (Field::WeaponClass, text("Great Sword")),
            (Field::Rarity, text("2")),
        ]);
        let record = Record::from_fields(Category::Weapon, fv).unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"type": "weapon", "en": "Iron Sword", "jp": "鉄刀",
                   "weapon_class": "Great Sword", "rarity": "2"})
        );
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let fv = values(vec![(Field::En, text("Potion")), (Field::Jp, text("回復薬"))]);
        let record = Record::from_fields(Category::Item, fv).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("回復薬"), "{json}");
    }

    #[test]
    fn test_round_trip_preserves_exactly_the_set_fields() {
        let fv = values(vec![
            (Field::En, text("Leather Helm")),
            (Field::Slot, text("Head")),
            (Field::Skills, list(&["Defense Boost"])),
        ]);
        let record = Record::from_fields(Category::Armor, fv).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert!(value.get("jp").is_none());

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_deserialize_rejects_empty_name() {
        let err = serde_json::from_str::<Record>(r#"{"type": "skill", "en": ""}"#);
        assert!(err.is_err());
        let ok: Record = serde_json::from_str(r#"{"type": "skill", "en": "Attack Boost"}"#).unwrap();
        assert_eq!(ok.name().as_str(), "Attack Boost");
    }

    #[test]
    fn test_display_name_trims() {
        assert_eq!(DisplayName::new("  Rathalos ").unwrap().as_str(), "Rathalos");
        assert!(DisplayName::new("\n").is_none());
    }

    #[test]
    fn test_mismatched_value_kind_reads_as_empty() {
        let mut fv = values(vec![(Field::Skills, text("oops")), (Field::Slot, list(&["a"]))]);
        assert!(fv.list(Field::Skills).is_empty());
        assert_eq!(fv.text(Field::Slot), "");
    }
}
