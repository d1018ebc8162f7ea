use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Shuffles pairs from the tile set onto the layout. The same seed always deals the same board.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomDealer {
    seed: u64,
}

impl RandomDealer {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl TileDealer for RandomDealer {
    fn deal(self, layout: &LevelLayout, tile_set: &TileSet) -> Result<Vec<Face>> {
        layout.validate()?;
        if tile_set.is_empty() {
            return Err(GameError::InvalidLayout("tile set is empty".into()));
        }

        let needed = usize::from(layout.tile_count() / 2);
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let mut pool: Vec<(Face, Face)> = tile_set.pairs().to_vec();
        if needed > pool.len() {
            log::warn!(
                "Level {:?} needs {} pairs but the tile set only has {}, reusing pairs",
                layout.name,
                needed,
                pool.len()
            );
            let base = pool.clone();
            while pool.len() < needed {
                pool.extend_from_slice(&base);
            }
        }
        pool.shuffle(&mut rng);

        let mut faces: Vec<Face> = pool
            .into_iter()
            .take(needed)
            .flat_map(|(a, b)| [a, b])
            .collect();
        faces.shuffle(&mut rng);
        Ok(faces)
    }
}
