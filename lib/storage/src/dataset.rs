// Card dataset import
use anyhow::{Context, Result};
use magicsearch_core::{Card, CardStore};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a JSON array of card records. Records without an id get sequential
/// ids after the largest id present in the file.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<Card>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening dataset {}", path.display()))?;
    let mut cards: Vec<Card> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing dataset {}", path.display()))?;

    let assigned = assign_ids(&mut cards);
    tracing::info!(
        "Read {} cards from {} ({} ids assigned)",
        cards.len(),
        path.display(),
        assigned
    );
    Ok(cards)
}

/// Give every id-less card the next free id. Returns how many were assigned.
pub fn assign_ids(cards: &mut [Card]) -> usize {
    let mut next = cards.iter().filter_map(|c| c.id).max().map_or(1, |max| max + 1);
    let mut assigned = 0;
    for card in cards.iter_mut().filter(|c| c.id.is_none()) {
        card.id = Some(next);
        next += 1;
        assigned += 1;
    }
    assigned
}

/// Upsert `cards` into `store` in order, so insertion order (the ranking
/// tie-break) follows the source.
pub fn restore_into(store: &dyn CardStore, cards: Vec<Card>) -> Result<usize> {
    let count = cards.len();
    for card in cards {
        let key = card.card_key.clone();
        store
            .upsert(card)
            .with_context(|| format!("restoring card '{}'", key))?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicsearch_core::{Color, InMemoryCardStore};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_dataset_assigns_ids() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"card_key": "Bolt", "name": "Bolt", "type": "Instant", "mana_cost": "{{R}}", "colors": ["R"]}},
                {{"id": 7, "card_key": "Island", "name": "Island", "unknown_field": 1}},
                {{"card_key": "Ornithopter", "name": "Ornithopter", "mana_value": 0}}
            ]"#
        )
        .unwrap();

        let cards = load_dataset(file.path()).unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].id, Some(8));
        assert_eq!(cards[1].id, Some(7));
        assert_eq!(cards[2].id, Some(9));
        assert_eq!(cards[0].card_type.as_deref(), Some("Instant"));
        assert_eq!(cards[0].colors, vec![Color::Red]);
        assert_eq!(cards[2].mana_value, Some(0.0));
    }

    #[test]
    fn test_assign_ids_from_one() {
        let mut cards = vec![Card::new("a", "A"), Card::new("b", "B")];
        assert_eq!(assign_ids(&mut cards), 2);
        assert_eq!(cards[0].id, Some(1));
        assert_eq!(cards[1].id, Some(2));
        assert_eq!(assign_ids(&mut cards), 0);
    }

    #[test]
    fn test_malformed_dataset_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not an array").unwrap();
        assert!(load_dataset(file.path()).is_err());
        assert!(load_dataset("/nonexistent/cards.json").is_err());
    }

    #[test]
    fn test_restore_into_preserves_order() {
        let store = InMemoryCardStore::default();
        let cards = vec![
            Card::new("c", "C").with_id(3),
            Card::new("a", "A").with_id(1),
        ];
        assert_eq!(restore_into(&store, cards).unwrap(), 2);
        let keys: Vec<String> = store.cards().into_iter().map(|c| c.card_key).collect();
        assert_eq!(keys, vec!["c", "a"]);
    }

    #[test]
    fn test_restore_into_duplicate_key_fails() {
        let store = InMemoryCardStore::default();
        let cards = vec![
            Card::new("same", "A").with_id(1),
            Card::new("same", "B").with_id(2),
        ];
        assert!(restore_into(&store, cards).is_err());
    }
}
