//! # MagicSearch Text
//!
//! Turns card records into the text the embedding model sees.
//!
//! - [`normalize`] - rewrites bracketed cost symbols (`{2}{R}`) into words
//! - [`CardTextBuilder`] - renders a card as ordered, labeled clauses
//!
//! ```rust
//! use magicsearch_core::Card;
//! use magicsearch_text::build_embeddable_text;
//!
//! let mut card = Card::new("Bolt", "Bolt").with_id(1);
//! card.mana_cost = Some("{R}".into());
//! assert_eq!(build_embeddable_text(&card).unwrap(), "Card: Bolt. Mana cost: red.");
//! ```

pub mod embeddable;
pub mod normalize;

pub use embeddable::{build_embeddable_text, CardTextBuilder};
pub use normalize::{normalize, normalize_opt, symbol_table, SYMBOLS};
