//! Attribute schema
//!
//! Statically enumerates the card attributes a filter may reference and the
//! kind of each one. The predicate compiler consults the schema to decide
//! which predicate a filter entry turns into and to reject unknown names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a filterable attribute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Unordered scalar text
    Text,
    /// Ordered numeric scalar - supports range operators
    Number,
    /// Scalar boolean flag
    Boolean,
    /// Set of strings - list values overlap
    Set,
}

impl AttributeKind {
    #[inline]
    pub fn is_ordered(self) -> bool {
        matches!(self, AttributeKind::Number)
    }

    #[inline]
    pub fn is_set(self) -> bool {
        matches!(self, AttributeKind::Set)
    }
}

const CARD_ATTRIBUTES: &[(&str, AttributeKind)] = &[
    ("id", AttributeKind::Number),
    ("card_key", AttributeKind::Text),
    ("name", AttributeKind::Text),
    ("ascii_name", AttributeKind::Text),
    ("type", AttributeKind::Text),
    ("text", AttributeKind::Text),
    ("layout", AttributeKind::Text),
    ("mana_cost", AttributeKind::Text),
    ("mana_value", AttributeKind::Number),
    ("converted_mana_cost", AttributeKind::Number),
    ("face_converted_mana_cost", AttributeKind::Number),
    ("face_mana_value", AttributeKind::Number),
    ("face_name", AttributeKind::Text),
    ("first_printing", AttributeKind::Text),
    ("hand", AttributeKind::Text),
    ("life", AttributeKind::Text),
    ("loyalty", AttributeKind::Text),
    ("power", AttributeKind::Text),
    ("toughness", AttributeKind::Text),
    ("side", AttributeKind::Text),
    ("defense", AttributeKind::Text),
    ("edhrec_rank", AttributeKind::Number),
    ("edhrec_saltiness", AttributeKind::Number),
    ("is_funny", AttributeKind::Boolean),
    ("is_game_changer", AttributeKind::Boolean),
    ("is_reserved", AttributeKind::Boolean),
    ("has_alternative_deck_limit", AttributeKind::Boolean),
    ("colors", AttributeKind::Set),
    ("color_identity", AttributeKind::Set),
    ("color_indicator", AttributeKind::Set),
    ("types", AttributeKind::Set),
    ("subtypes", AttributeKind::Set),
    ("supertypes", AttributeKind::Set),
    ("keywords", AttributeKind::Set),
    ("subsets", AttributeKind::Set),
    ("printings", AttributeKind::Set),
    ("scryfall_oracle_id", AttributeKind::Text),
    ("image_url", AttributeKind::Text),
];

/// Known attributes keyed by name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeSchema {
    pub attributes: HashMap<String, AttributeKind>,
}

impl AttributeSchema {
    pub fn new(attributes: HashMap<String, AttributeKind>) -> Self {
        Self { attributes }
    }

    /// Schema of the card table. Derived columns (`text_to_embed`,
    /// `embedding`) are deliberately absent.
    pub fn cards() -> Self {
        Self::new(
            CARD_ATTRIBUTES
                .iter()
                .map(|(name, kind)| (name.to_string(), *kind))
                .collect(),
        )
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<AttributeKind> {
        self.attributes.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attribute names in a deterministic order (sorted)
    pub fn sorted_names(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.attributes.keys().collect();
        names.sort();
        names
    }
}

impl Default for AttributeSchema {
    fn default() -> Self {
        Self::cards()
    }
}
