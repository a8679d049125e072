// ABOUTME: Selector registry: per-category navigation path, item/container candidates and field candidates.
// ABOUTME: Built once, validated at construction, and passed explicitly to the parser and orchestrator.

//! Selector registry.
//!
//! The registry describes where each category lives on the site and how to
//! find its records. Every list of candidates is ordered and tried first to
//! last. A field may be written in JSON either as a comma-joined string
//! (`".name-en, .name"`) or as an array whose entries are CSS strings or
//! `[css, attribute]` pairs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::category::{Category, Field};
use crate::dom::compiled::is_valid;
use crate::error::RegistryError;

/// Specifies how one candidate reads a value from a matched element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    /// A CSS selector whose matches are read as text, e.g. `".name-en"`.
    Css(String),
    /// A CSS selector whose matches are read through an attribute, e.g. `["img.weak", "alt"]`.
    CssAttr(String, String),
}

impl SelectorSpec {
    pub fn css(&self) -> &str {
        match self {
            SelectorSpec::Css(css) | SelectorSpec::CssAttr(css, _) => css,
        }
    }
}

/// Splits a comma-joined selector list into its ordered candidates.
///
/// Only top-level commas separate candidates; commas inside parentheses,
/// brackets or quotes belong to the selector. Empty pieces are dropped.
pub fn split_candidates(joined: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in joined.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' | '[' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    out.push(std::mem::take(&mut current));
                }
                _ => current.push(ch),
            },
        }
    }
    out.push(current);

    out.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCss {
    Joined(String),
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCandidates {
    Joined(String),
    List(Vec<SelectorSpec>),
}

fn css_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawCss::deserialize(deserializer)? {
        RawCss::Joined(s) => split_candidates(&s),
        RawCss::List(list) => list,
    })
}

fn field_map<'de, D>(deserializer: D) -> Result<BTreeMap<Field, Vec<SelectorSpec>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<Field, RawCandidates>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(field, candidates)| {
            let specs = match candidates {
                RawCandidates::Joined(s) => split_candidates(&s)
                    .into_iter()
                    .map(SelectorSpec::Css)
                    .collect(),
                RawCandidates::List(list) => list,
            };
            (field, specs)
        })
        .collect())
}

/// Selectors for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySelectors {
    pub category: Category,
    /// Path joined onto the base URL, e.g. `"/#/monster"`.
    pub path: String,
    /// Selectors whose presence signals that the list has rendered.
    #[serde(default, deserialize_with = "css_list")]
    pub container: Vec<String>,
    /// Item-boundary candidates; the first with any match wins.
    #[serde(deserialize_with = "css_list")]
    pub items: Vec<String>,
    #[serde(default, deserialize_with = "field_map")]
    pub fields: BTreeMap<Field, Vec<SelectorSpec>>,
}

impl CategorySelectors {
    /// Candidates for `field`, empty when the registry declares none.
    pub fn candidates(&self, field: Field) -> &[SelectorSpec] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The category's URL under `base`.
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.path)
    }
}

fn default_fallback_items() -> Vec<String> {
    vec![
        "div[class*='card']".to_string(),
        "[class*='row']".to_string(),
        "tr".to_string(),
    ]
}

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default = "default_fallback_items", deserialize_with = "css_list")]
    fallback_items: Vec<String>,
    categories: Vec<CategorySelectors>,
}

/// Immutable, validated selector configuration for every category.
#[derive(Debug, Clone)]
pub struct SelectorRegistry {
    categories: Vec<CategorySelectors>,
    fallback_items: Vec<String>,
}

impl SelectorRegistry {
    /// Validates and builds a registry.
    ///
    /// Every category must appear exactly once, have at least one item
    /// candidate and one display-name candidate, and only declare fields its
    /// records carry. Every selector must compile.
    pub fn new(
        categories: Vec<CategorySelectors>,
        fallback_items: Vec<String>,
    ) -> Result<Self, RegistryError> {
        let mut slots: Vec<Option<CategorySelectors>> = vec![None; Category::ALL.len()];
        for spec in categories {
            let idx = spec.category.index();
            if slots[idx].is_some() {
                return Err(RegistryError::DuplicateCategory(spec.category));
            }
            validate_category(&spec)?;
            slots[idx] = Some(spec);
        }

        let mut ordered = Vec::with_capacity(slots.len());
        for (category, slot) in Category::ALL.iter().zip(slots) {
            ordered.push(slot.ok_or(RegistryError::MissingCategory(*category))?);
        }

        for css in &fallback_items {
            check_selector(css, "fallback_items")?;
        }

        Ok(Self {
            categories: ordered,
            fallback_items,
        })
    }

    /// Parses and validates a registry from JSON text.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::new(file.categories, file.fallback_items)
    }

    /// Reads, parses and validates a registry file.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn get(&self, category: Category) -> &CategorySelectors {
        &self.categories[category.index()]
    }

    /// Structural fallback candidates tried when no item candidate matches.
    pub fn fallback_items(&self) -> &[String] {
        &self.fallback_items
    }

    /// Per-category selectors in scrape order.
    pub fn iter(&self) -> impl Iterator<Item = &CategorySelectors> {
        self.categories.iter()
    }
}

fn check_selector(css: &str, context: impl Into<String>) -> Result<(), RegistryError> {
    if is_valid(css) {
        Ok(())
    } else {
        Err(RegistryError::InvalidSelector {
            selector: css.to_string(),
            context: context.into(),
        })
    }
}

fn validate_category(spec: &CategorySelectors) -> Result<(), RegistryError> {
    let category = spec.category;
    if spec.items.is_empty() {
        return Err(RegistryError::NoItemSelectors(category));
    }
    if spec.candidates(Field::En).is_empty() {
        return Err(RegistryError::NoNameSelectors(category));
    }
    for css in &spec.items {
        check_selector(css, format!("{category}.items"))?;
    }
    for css in &spec.container {
        check_selector(css, format!("{category}.container"))?;
    }
    for (field, candidates) in &spec.fields {
        if !category.declares(*field) {
            return Err(RegistryError::FieldNotApplicable {
                category,
                field: *field,
            });
        }
        for candidate in candidates {
            check_selector(candidate.css(), format!("{category}.{field}"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn minimal(category: Category) -> CategorySelectors {
        CategorySelectors {
            category,
            path: format!("/#/{}", category.as_str()),
            container: vec![],
            items: vec![format!(".{}-card", category.as_str())],
            fields: BTreeMap::from([(Field::En, vec![SelectorSpec::Css(".name".to_string())])]),
        }
    }

    fn all_minimal() -> Vec<CategorySelectors> {
        Category::ALL.iter().map(|c| minimal(*c)).collect()
    }

    #[test]
    fn test_split_candidates_respects_nesting_and_quotes() {
        assert_eq!(
            split_candidates(".name-en, .name, [lang='en']"),
            vec![".name-en", ".name", "[lang='en']"]
        );
        assert_eq!(
            split_candidates("div:is(.a, .b), [data-x='1,2'] , "),
            vec!["div:is(.a, .b)", "[data-x='1,2']"]
        );
        assert!(split_candidates("  ").is_empty());
    }

    #[test]
    fn test_registry_orders_categories_regardless_of_input_order() {
        let mut specs = all_minimal();
        specs.reverse();
        let reg = SelectorRegistry::new(specs, default_fallback_items()).unwrap();
        let order: Vec<Category> = reg.iter().map(|s| s.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
        assert_eq!(reg.get(Category::Skill).items, vec![".skill-card"]);
    }

    #[test]
    fn test_registry_rejects_missing_category() {
        let mut specs = all_minimal();
        specs.retain(|s| s.category != Category::Armor);
        let err = SelectorRegistry::new(specs, vec![]).unwrap_err();
        assert!(matches!(err, RegistryError::MissingCategory(Category::Armor)));
    }

    #[test]
    fn test_registry_rejects_duplicate_category() {
        let mut specs = all_minimal();
        specs.push(minimal(Category::Item));
        let err = SelectorRegistry::new(specs, vec![]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCategory(Category::Item)));
    }

    #[test]
    fn test_registry_rejects_empty_items() {
        let mut specs = all_minimal();
        specs[0].items.clear();
        let err = SelectorRegistry::new(specs, vec![]).unwrap_err();
        assert!(matches!(err, RegistryError::NoItemSelectors(Category::Monster)));
    }

    #[test]
    fn test_registry_rejects_missing_name_candidates() {
        let mut specs = all_minimal();
        specs[1].fields.clear();
        let err = SelectorRegistry::new(specs, vec![]).unwrap_err();
        assert!(matches!(err, RegistryError::NoNameSelectors(Category::Weapon)));
    }

    #[test]
    fn test_registry_rejects_inapplicable_field() {
        let mut specs = all_minimal();
        specs[1]
            .fields
            .insert(Field::Weakness, vec![SelectorSpec::Css(".weakness".into())]);
        let err = SelectorRegistry::new(specs, vec![]).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::FieldNotApplicable {
                category: Category::Weapon,
                field: Field::Weakness
            }
        ));
    }

    #[test]
    fn test_registry_rejects_invalid_selector() {
        let mut specs = all_minimal();
        specs[2].items = vec!["[[[broken".to_string()];
        let err = SelectorRegistry::new(specs, vec![]).unwrap_err();
        match err {
            RegistryError::InvalidSelector { selector, context } => {
                assert_eq!(selector, "[[[broken");
                assert_eq!(context, "armor.items");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_accepts_joined_strings_and_attribute_pairs() {
        let json = r#"{
            "categories": [
                {"category": "monster", "path": "/#/monster",
                 "items": ".monster-card, .list-item",
                 "fields": {
                    "en": ".name-en, .name",
                    "weakness": [".weakness", ["img[class*='weak']", "alt"]]
                 }},
                {"category": "weapon", "path": "/#/weapon", "items": [".weapon-card"], "fields": {"en": ".name"}},
                {"category": "armor", "path": "/#/armor", "items": [".armor-card"], "fields": {"en": ".name"}},
                {"category": "skill", "path": "/#/skill", "items": [".skill-card"], "fields": {"en": ".name"}},
                {"category": "item", "path": "/#/item", "items": [".item-card"], "fields": {"en": ".name"}}
            ]
        }"#;
        let reg = SelectorRegistry::from_json(json).unwrap();
        let monster = reg.get(Category::Monster);
        assert_eq!(monster.items, vec![".monster-card", ".list-item"]);
        assert_eq!(
            monster.candidates(Field::En),
            &[
                SelectorSpec::Css(".name-en".into()),
                SelectorSpec::Css(".name".into())
            ]
        );
        assert_eq!(
            monster.candidates(Field::Weakness),
            &[
                SelectorSpec::Css(".weakness".into()),
                SelectorSpec::CssAttr("img[class*='weak']".into(), "alt".into())
            ]
        );
        assert!(monster.candidates(Field::Materials).is_empty());
        assert_eq!(reg.fallback_items(), default_fallback_items().as_slice());
    }

    #[test]
    fn test_json_rejects_unknown_field_name() {
        let json = r#"{"categories": [{"category": "monster", "path": "/", "items": ".x",
            "fields": {"nickname": ".nick"}}]}"#;
        assert!(matches!(
            SelectorRegistry::from_json(json),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_url_joins_fragment_paths() {
        let spec = minimal(Category::Monster);
        let base = Url::parse("http://mhn.quest").unwrap();
        assert_eq!(
            spec.url(&base).unwrap().as_str(),
            "http://mhn.quest/#/monster"
        );
    }
}
