use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric card identifier as published by the KRCG card database
pub type CardId = u32;

/// The two disjoint deck-construction pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Crypt,
    Library,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Crypt, Category::Library];

    /// Derive the category from a card's type line.
    /// Vampires and Imbued go to the crypt, everything else to the library.
    /// Cards without any type have no category.
    pub fn from_types(types: &[String]) -> Option<Self> {
        if types.is_empty() {
            return None;
        }
        if types.iter().any(|t| t == "Vampire" || t == "Imbued") {
            Some(Category::Crypt)
        } else {
            Some(Category::Library)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Crypt => write!(f, "crypt"),
            Category::Library => write!(f, "library"),
        }
    }
}

/// Crypt grouping. Usually a number, but some cards are printed as "ANY".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Group {
    Number(u32),
    Text(String),
}

/// A card as loaded from the card database.
/// Only `id`, `name` and `types` drive computation; the rest is carried through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub clans: Vec<String>,
    #[serde(default)]
    pub disciplines: Vec<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub group: Option<Group>,
    #[serde(default)]
    pub card_text: String,
}

impl Card {
    pub fn category(&self) -> Option<Category> {
        Category::from_types(&self.types)
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(|s| s.as_str())
    }

    /// Image key used by the static card image host:
    /// lowercased name with everything but letters and digits removed
    pub fn slug(&self) -> String {
        self.name
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_alphanumeric())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, types: &[&str]) -> Card {
        Card {
            id: 1,
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            clans: vec![],
            disciplines: vec![],
            capacity: None,
            group: None,
            card_text: String::new(),
        }
    }

    #[test]
    fn test_category_from_types() {
        assert_eq!(card("Anson", &["Vampire"]).category(), Some(Category::Crypt));
        assert_eq!(card("Jennie Orne", &["Imbued"]).category(), Some(Category::Crypt));
        assert_eq!(
            card("Deflection", &["Reaction"]).category(),
            Some(Category::Library)
        );
        assert_eq!(
            card("Aid from Bats", &["Combat", "Action Modifier"]).category(),
            Some(Category::Library)
        );
        assert_eq!(card("Blank", &[]).category(), None);
    }

    #[test]
    fn test_slug() {
        assert_eq!(card("Bum's Rush", &["Action"]).slug(), "bumsrush");
        assert_eq!(
            card("Enkidu, The Noah (G4)", &["Vampire"]).slug(),
            "enkiduthenoahg4"
        );
    }

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let json = r#"{
            "id": 200076,
            "_name": "Anson",
            "name": "Anson",
            "types": ["Vampire"],
            "clans": ["Toreador"],
            "capacity": 8,
            "group": "1",
            "url": "https://static.krcg.org/card/anson.jpg"
        }"#;
        let card: Card = serde_json::from_str(json).expect("card should parse");
        assert_eq!(card.id, 200076);
        assert_eq!(card.capacity, Some(8));
        assert_eq!(card.group, Some(Group::Text("1".to_string())));
        assert!(card.disciplines.is_empty());
    }

    #[test]
    fn test_group_number() {
        let card: Card =
            serde_json::from_str(r#"{"id": 1, "name": "X", "types": ["Vampire"], "group": 5}"#)
                .expect("card should parse");
        assert_eq!(card.group, Some(Group::Number(5)));
    }
}
