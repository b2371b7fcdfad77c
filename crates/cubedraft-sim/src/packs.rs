// Cube loading and pack generation.

use std::path::Path;

use anyhow::{bail, Context};
use cubedraft_core::card::Card;
use cubedraft_core::config::DraftSettings;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

/// A cube list as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct CubeList {
    pub id: String,
    pub cards: Vec<Card>,
    /// Basic lands offered at deck construction; not part of the packs.
    #[serde(default)]
    pub basics: Vec<Card>,
}

pub fn load_cube(path: &Path) -> anyhow::Result<CubeList> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read cube list {}", path.display()))?;
    let cube: CubeList =
        serde_json::from_str(&text).with_context(|| format!("failed to parse cube list {}", path.display()))?;
    if cube.basics.is_empty() {
        warn!(cube = %cube.id, "cube has no basic lands; decks may come up short");
    }
    info!(cube = %cube.id, cards = cube.cards.len(), basics = cube.basics.len(), "cube loaded");
    Ok(cube)
}

/// Shuffle the cube and deal `seats * packs` packs of `pack_size` cards,
/// indexed `[seat][pack]`. Undealt cards are left out.
pub fn deal_packs<R: Rng + ?Sized>(
    mut cards: Vec<Card>,
    settings: &DraftSettings,
    rng: &mut R,
) -> anyhow::Result<Vec<Vec<Vec<Card>>>> {
    let needed = settings.seats * settings.packs * settings.pack_size;
    if cards.len() < needed {
        bail!(
            "cube has {} cards but {} seats x {} packs x {} cards needs {needed}",
            cards.len(),
            settings.seats,
            settings.packs,
            settings.pack_size
        );
    }

    cards.shuffle(rng);
    let mut remaining = cards.into_iter();
    let dealt: Vec<Vec<Vec<Card>>> = (0..settings.seats)
        .map(|_| {
            (0..settings.packs)
                .map(|_| remaining.by_ref().take(settings.pack_size).collect())
                .collect()
        })
        .collect();
    Ok(dealt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings(seats: usize, packs: usize, pack_size: usize) -> DraftSettings {
        DraftSettings {
            seats,
            packs,
            pack_size,
            seed: None,
        }
    }

    fn cube(n: usize) -> Vec<Card> {
        (0..n).map(|i| Card::new(format!("c{i}"), format!("Card {i}"), "Instant")).collect()
    }

    #[test]
    fn deals_every_seat_full_packs() {
        let mut rng = StdRng::seed_from_u64(1);
        let dealt = deal_packs(cube(100), &settings(4, 3, 5), &mut rng).unwrap();
        assert_eq!(dealt.len(), 4);
        for seat in &dealt {
            assert_eq!(seat.len(), 3);
            assert!(seat.iter().all(|p| p.len() == 5));
        }

        let mut ids: Vec<&str> = dealt.iter().flatten().flatten().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 60);
    }

    #[test]
    fn same_seed_same_packs() {
        let a = deal_packs(cube(50), &settings(2, 2, 10), &mut StdRng::seed_from_u64(42)).unwrap();
        let b = deal_packs(cube(50), &settings(2, 2, 10), &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn small_cube_is_rejected() {
        let err = deal_packs(cube(10), &settings(2, 2, 3), &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(err.to_string().contains("needs 12"));
    }

    #[test]
    fn cube_list_parses_with_default_basics() {
        let json = r#"{
            "id": "tiny",
            "cards": [
                {"id": "1", "name": "Lightning Bolt", "type_line": "Instant", "colors": "R", "mana_value": 1.0}
            ]
        }"#;
        let cube: CubeList = serde_json::from_str(json).unwrap();
        assert_eq!(cube.cards.len(), 1);
        assert!(cube.basics.is_empty());
        assert_eq!(cube.cards[0].colors.to_string(), "R");
    }
}
