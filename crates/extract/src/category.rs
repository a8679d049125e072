// ABOUTME: The closed set of scraped categories and the fields each one declares.
// ABOUTME: Categories are ordered by declaration, which is also the scrape order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five entity kinds scraped from the site.
///
/// The derived `Ord` follows declaration order, so maps keyed by `Category`
/// iterate monsters first and items last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Monster,
    Weapon,
    Armor,
    Skill,
    Item,
}

impl Category {
    /// All categories in scrape order.
    pub const ALL: [Category; 5] = [
        Category::Monster,
        Category::Weapon,
        Category::Armor,
        Category::Skill,
        Category::Item,
    ];

    /// Position in [`Category::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The record discriminator, e.g. `"monster"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Monster => "monster",
            Category::Weapon => "weapon",
            Category::Armor => "armor",
            Category::Skill => "skill",
            Category::Item => "item",
        }
    }

    /// The plural section name used in file names and the summary.
    pub fn section_name(&self) -> &'static str {
        match self {
            Category::Monster => "monsters",
            Category::Weapon => "weapons",
            Category::Armor => "armor",
            Category::Skill => "skills",
            Category::Item => "items",
        }
    }

    /// Fields extracted for records of this category, `En` first.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Category::Monster => &[
                Field::En,
                Field::Jp,
                Field::Weakness,
                Field::Materials,
                Field::Habitat,
            ],
            Category::Weapon => &[Field::En, Field::Jp, Field::WeaponClass, Field::Rarity],
            Category::Armor => &[Field::En, Field::Jp, Field::Slot, Field::Skills],
            Category::Skill => &[Field::En, Field::Jp, Field::Category, Field::Description],
            Category::Item => &[Field::En, Field::Jp, Field::Category, Field::Description],
        }
    }

    /// Returns true if `field` is declared for this category.
    pub fn declares(&self, field: Field) -> bool {
        self.fields().contains(&field)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a field's candidates are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// First matching element's text, even if empty.
    Scalar,
    /// All non-empty texts from the first candidate that yields any.
    List,
}

/// A record attribute that can be extracted from an item element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    En,
    Jp,
    Weakness,
    Materials,
    Habitat,
    WeaponClass,
    Rarity,
    Slot,
    Skills,
    Category,
    Description,
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Weakness | Field::Materials | Field::Skills => FieldKind::List,
            _ => FieldKind::Scalar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::En => "en",
            Field::Jp => "jp",
            Field::Weakness => "weakness",
            Field::Materials => "materials",
            Field::Habitat => "habitat",
            Field::WeaponClass => "weapon_class",
            Field::Rarity => "rarity",
            Field::Slot => "slot",
            Field::Skills => "skills",
            Field::Category => "category",
            Field::Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
