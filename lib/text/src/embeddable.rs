//! Embeddable text
//!
//! Renders a card's attributes as one descriptive string, the input to the
//! embedding model. Attribute groups are emitted in a fixed order as short
//! labeled clauses (`Card: Bolt. Type: Instant. Mana cost: red.`); anything
//! null or empty is left out rather than rendered blank.

use crate::normalize::normalize;
use magicsearch_core::{Card, Color, Error, Result};

/// Builds the embeddable text for a card
#[derive(Debug, Clone, Default)]
pub struct CardTextBuilder {
    preamble: Option<String>,
}

impl CardTextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed context sentence placed before the card's own clauses
    #[must_use]
    pub fn preamble(mut self, preamble: impl Into<String>) -> Self {
        let preamble = preamble.into();
        self.preamble = if preamble.trim().is_empty() { None } else { Some(preamble) };
        self
    }

    /// Render `card`. Fails with [`Error::InvalidState`] when the card has no id.
    pub fn build(&self, card: &Card) -> Result<String> {
        if card.id.is_none() {
            return Err(Error::InvalidState(format!(
                "cannot build embeddable text for card '{}' without an id",
                card.card_key
            )));
        }

        let mut clauses: Vec<String> = Vec::new();
        if let Some(preamble) = &self.preamble {
            clauses.push(preamble.clone());
        }

        // identity and type line
        push_labeled(&mut clauses, "Card", card.name.as_deref());
        push_labeled(&mut clauses, "Type", card.card_type.as_deref());

        // cost
        let cost = card.mana_cost.as_deref().map(normalize);
        push_labeled(&mut clauses, "Mana cost", cost.as_deref());
        if let Some(value) = card.mana_value {
            clauses.push(format!("Mana value: {}", format_number(value)));
        }

        // color
        push_colors(&mut clauses, "Colors", &card.colors);
        push_colors(&mut clauses, "Color identity", &card.color_identity);
        push_colors(&mut clauses, "Color indicator", &card.color_indicator);

        // rules text
        let rules = card.text.as_deref().map(normalize);
        push_labeled(&mut clauses, "Rules text", rules.as_deref());

        // combat stats
        push_labeled(&mut clauses, "Power", card.power.as_deref());
        push_labeled(&mut clauses, "Toughness", card.toughness.as_deref());
        push_labeled(&mut clauses, "Loyalty", card.loyalty.as_deref());
        push_labeled(&mut clauses, "Defense", card.defense.as_deref());

        if !card.keywords.is_empty() {
            clauses.push(format!("Keywords: {}", card.keywords.join(", ")));
        }

        // special-property flags, only when set
        let flags = [
            (card.is_reserved, "On the reserved list"),
            (card.is_game_changer, "Game changer"),
            (card.is_funny, "Funny card"),
            (card.has_alternative_deck_limit, "Alternative deck limit"),
        ];
        for (flag, clause) in flags {
            if flag == Some(true) {
                clauses.push(clause.to_string());
            }
        }

        // alternate face
        let layout = card.layout.as_deref().filter(|l| !l.eq_ignore_ascii_case("normal"));
        push_labeled(&mut clauses, "Layout", layout);
        push_labeled(&mut clauses, "Face name", card.face_name.as_deref());
        push_labeled(&mut clauses, "Side", card.side.as_deref());

        Ok(join_clauses(&clauses))
    }
}

/// Render `card` with the default builder
pub fn build_embeddable_text(card: &Card) -> Result<String> {
    CardTextBuilder::new().build(card)
}

fn push_labeled(clauses: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        clauses.push(format!("{label}: {value}"));
    }
}

fn push_colors(clauses: &mut Vec<String>, label: &str, colors: &[Color]) {
    if colors.is_empty() {
        return;
    }
    let names: Vec<&str> = colors.iter().map(|c| c.name()).collect();
    clauses.push(format!("{label}: {}", names.join(", ")));
}

/// Integral values print without a fraction; zero prints as `0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Join with `. ` and end with exactly one period
fn join_clauses(clauses: &[String]) -> String {
    let trimmed: Vec<&str> = clauses
        .iter()
        .map(|c| c.trim().trim_end_matches('.').trim_end())
        .filter(|c| !c.is_empty())
        .collect();
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{}.", trimmed.join(". "))
}
