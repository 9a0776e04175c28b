use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;
use crate::vector::Vector;

pub type CardId = u64;

/// One of the five colors of mana
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [Color::White, Color::Blue, Color::Black, Color::Red, Color::Green];

    /// Single-letter code used in card data and filters
    pub fn code(self) -> &'static str {
        match self {
            Color::White => "W",
            Color::Blue => "U",
            Color::Black => "B",
            Color::Red => "R",
            Color::Green => "G",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Blue => "blue",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
        }
    }

    pub fn from_code(code: &str) -> Option<Color> {
        Color::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A card record: descriptive attributes plus the derived embeddable text and embedding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub id: Option<CardId>,
    pub card_key: String,
    pub name: Option<String>,
    pub ascii_name: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    /// Rules text
    pub text: Option<String>,
    pub layout: Option<String>,
    /// Symbolic cost, e.g. `{2}{R}`
    pub mana_cost: Option<String>,
    pub mana_value: Option<f64>,
    pub converted_mana_cost: Option<f64>,
    pub face_converted_mana_cost: Option<f64>,
    pub face_mana_value: Option<f64>,
    pub face_name: Option<String>,
    pub first_printing: Option<String>,
    pub hand: Option<String>,
    pub life: Option<String>,
    pub loyalty: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub side: Option<String>,
    pub defense: Option<String>,
    pub edhrec_rank: Option<f64>,
    pub edhrec_saltiness: Option<f64>,
    pub is_funny: Option<bool>,
    pub is_game_changer: Option<bool>,
    pub is_reserved: Option<bool>,
    pub has_alternative_deck_limit: Option<bool>,
    pub colors: Vec<Color>,
    pub color_identity: Vec<Color>,
    pub color_indicator: Vec<Color>,
    pub types: Vec<String>,
    pub subtypes: Vec<String>,
    pub supertypes: Vec<String>,
    pub keywords: Vec<String>,
    pub subsets: Vec<String>,
    pub printings: Vec<String>,
    pub scryfall_oracle_id: Option<Uuid>,
    pub image_url: Option<String>,
    /// Derived: canonical text fed to the embedding model
    pub text_to_embed: Option<String>,
    /// Derived: embedding of `text_to_embed`
    pub embedding: Option<Vector>,
}

/// A column value as seen by predicate evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Column<'a> {
    Null,
    Text(Cow<'a, str>),
    Number(f64),
    Bool(bool),
    Set(Vec<Cow<'a, str>>),
}

fn text(value: &Option<String>) -> Column<'_> {
    value
        .as_deref()
        .map(|s| Column::Text(Cow::Borrowed(s)))
        .unwrap_or(Column::Null)
}

fn number(value: Option<f64>) -> Column<'static> {
    value.map(Column::Number).unwrap_or(Column::Null)
}

fn boolean(value: Option<bool>) -> Column<'static> {
    value.map(Column::Bool).unwrap_or(Column::Null)
}

fn strings(values: &[String]) -> Column<'_> {
    Column::Set(values.iter().map(|s| Cow::Borrowed(s.as_str())).collect())
}

fn colors(values: &[Color]) -> Column<'static> {
    Column::Set(values.iter().map(|c| Cow::Borrowed(c.code())).collect())
}

impl Card {
    #[must_use]
    pub fn new(card_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            card_key: card_key.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: CardId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    #[inline]
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    /// Look up a filterable column by name. Returns `None` for names that are
    /// not columns at all.
    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        let column = match name {
            "id" => self.id.map(|id| Column::Number(id as f64)).unwrap_or(Column::Null),
            "card_key" => Column::Text(Cow::Borrowed(self.card_key.as_str())),
            "name" => text(&self.name),
            "ascii_name" => text(&self.ascii_name),
            "type" => text(&self.card_type),
            "text" => text(&self.text),
            "layout" => text(&self.layout),
            "mana_cost" => text(&self.mana_cost),
            "mana_value" => number(self.mana_value),
            "converted_mana_cost" => number(self.converted_mana_cost),
            "face_converted_mana_cost" => number(self.face_converted_mana_cost),
            "face_mana_value" => number(self.face_mana_value),
            "face_name" => text(&self.face_name),
            "first_printing" => text(&self.first_printing),
            "hand" => text(&self.hand),
            "life" => text(&self.life),
            "loyalty" => text(&self.loyalty),
            "power" => text(&self.power),
            "toughness" => text(&self.toughness),
            "side" => text(&self.side),
            "defense" => text(&self.defense),
            "edhrec_rank" => number(self.edhrec_rank),
            "edhrec_saltiness" => number(self.edhrec_saltiness),
            "is_funny" => boolean(self.is_funny),
            "is_game_changer" => boolean(self.is_game_changer),
            "is_reserved" => boolean(self.is_reserved),
            "has_alternative_deck_limit" => boolean(self.has_alternative_deck_limit),
            "colors" => colors(&self.colors),
            "color_identity" => colors(&self.color_identity),
            "color_indicator" => colors(&self.color_indicator),
            "types" => strings(&self.types),
            "subtypes" => strings(&self.subtypes),
            "supertypes" => strings(&self.supertypes),
            "keywords" => strings(&self.keywords),
            "subsets" => strings(&self.subsets),
            "printings" => strings(&self.printings),
            "scryfall_oracle_id" => self
                .scryfall_oracle_id
                .map(|u| Column::Text(Cow::Owned(u.to_string())))
                .unwrap_or(Column::Null),
            "image_url" => text(&self.image_url),
            _ => return None,
        };
        Some(column)
    }
}

/// The subset of card fields returned to search clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardProjection {
    pub id: Option<CardId>,
    pub card_key: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub text: Option<String>,
    pub mana_cost: Option<String>,
    pub mana_value: Option<f64>,
    pub colors: Vec<Color>,
    pub color_identity: Vec<Color>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub defense: Option<String>,
    pub keywords: Vec<String>,
    pub image_url: Option<String>,
}

impl From<&Card> for CardProjection {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            card_key: card.card_key.clone(),
            name: card.name.clone(),
            card_type: card.card_type.clone(),
            text: card.text.clone(),
            mana_cost: card.mana_cost.clone(),
            mana_value: card.mana_value,
            colors: card.colors.clone(),
            color_identity: card.color_identity.clone(),
            power: card.power.clone(),
            toughness: card.toughness.clone(),
            loyalty: card.loyalty.clone(),
            defense: card.defense.clone(),
            keywords: card.keywords.clone(),
            image_url: card.image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_partial_record() {
        let card: Card = serde_json::from_value(json!({
            "id": 7,
            "card_key": "Lightning Bolt",
            "name": "Lightning Bolt",
            "type": "Instant",
            "mana_cost": "{R}",
            "mana_value": 1,
            "colors": ["R"],
        }))
        .unwrap();

        assert_eq!(card.id, Some(7));
        assert_eq!(card.card_type.as_deref(), Some("Instant"));
        assert_eq!(card.colors, vec![Color::Red]);
        assert!(card.keywords.is_empty());
        assert!(!card.has_embedding());
    }

    #[test]
    fn test_column_lookup() {
        let mut card = Card::new("bolt", "Bolt").with_id(3);
        card.colors = vec![Color::Red, Color::Blue];
        card.mana_value = Some(0.0);

        assert_eq!(card.column("mana_value"), Some(Column::Number(0.0)));
        assert_eq!(
            card.column("colors"),
            Some(Column::Set(vec![Cow::Borrowed("R"), Cow::Borrowed("U")]))
        );
        assert_eq!(card.column("power"), Some(Column::Null));
        assert_eq!(card.column("embedding"), None);
        assert_eq!(card.column("bogus"), None);
    }

    #[test]
    fn test_color_codes() {
        for color in Color::ALL {
            assert_eq!(Color::from_code(color.code()), Some(color));
        }
        assert_eq!(Color::from_code("X"), None);
    }
}
