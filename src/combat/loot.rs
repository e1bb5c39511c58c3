use crate::data::DropEntry;
use rand::Rng;

/// Picks at most one item from a weighted drop table.
///
/// Draws uniformly in `[0, total_weight)` and walks the cumulative weights.
/// Empty tables and tables whose weights sum to zero or less drop nothing.
pub fn roll_loot<R: Rng>(drops: &[DropEntry], rng: &mut R) -> Option<u32> {
    let total: f64 = drops.iter().map(|d| d.weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let roll = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for drop in drops {
        cumulative += drop.weight.max(0.0);
        if roll < cumulative {
            return Some(drop.item_id);
        }
    }
    None
}
