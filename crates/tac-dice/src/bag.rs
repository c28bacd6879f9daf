//! Finite draw bags for blind-bag pools.
//!
//! A bag is described by how many items of each color it holds. Refilling
//! expands that description into a flat list; drawing removes a random item
//! from the list. Editing the description never touches the live bag.

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Quantity of each color in a full bag, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BagDefinition(IndexMap<String, u32>);

impl BagDefinition {
    /// Create an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// The same quantity of every color.
    pub fn uniform<I, S>(colors: I, quantity: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(colors.into_iter().map(|c| (c.into(), quantity)).collect())
    }

    /// Quantity of `color`, 0 if absent.
    pub fn quantity(&self, color: &str) -> u32 {
        self.0.get(color).copied().unwrap_or(0)
    }

    /// Set the quantity of one color, clamping negatives to 0.
    pub fn set_quantity(&mut self, color: &str, quantity: i64) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        match self.0.get_mut(color) {
            Some(q) => *q = quantity,
            None => {
                self.0.insert(color.to_string(), quantity);
            }
        }
    }

    /// Total number of items in a full bag.
    pub fn total(&self) -> usize {
        self.0.values().map(|q| *q as usize).sum()
    }

    /// Colors and quantities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(c, q)| (c.as_str(), *q))
    }

    /// A full bag: `quantity` copies of each color, colors in order.
    pub fn refill(&self) -> Vec<String> {
        let mut bag = Vec::with_capacity(self.total());
        for (color, quantity) in self.iter() {
            bag.extend(std::iter::repeat_n(color.to_string(), quantity as usize));
        }
        bag
    }

    /// Whether `bag` could have been drawn down from a full bag.
    pub fn contains_all(&self, bag: &[String]) -> bool {
        let mut remaining: IndexMap<&str, u32> = self.0.iter().map(|(c, q)| (c.as_str(), *q)).collect();
        bag.iter().all(|color| match remaining.get_mut(color.as_str()) {
            Some(q) if *q > 0 => {
                *q -= 1;
                true
            }
            _ => false,
        })
    }
}

/// Remove and return a uniformly random item, or `None` if the bag is empty.
pub fn draw<R: Rng>(bag: &mut Vec<String>, rng: &mut R) -> Option<String> {
    if bag.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..bag.len());
    Some(bag.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn refill_expands_in_color_order() {
        let mut def = BagDefinition::new();
        def.set_quantity("red", 2);
        def.set_quantity("blue", 1);
        def.set_quantity("green", 0);
        assert_eq!(def.refill(), vec!["red", "red", "blue"]);
        assert_eq!(def.total(), 3);
    }

    #[test]
    fn set_quantity_clamps_and_rewrites_one_color() {
        let mut def = BagDefinition::uniform(["red", "blue"], 5);
        def.set_quantity("red", -3);
        assert_eq!(def.quantity("red"), 0);
        assert_eq!(def.quantity("blue"), 5);
        assert_eq!(def.quantity("missing"), 0);
    }

    #[test]
    fn editing_definition_leaves_live_bag_alone() {
        let mut def = BagDefinition::uniform(["red"], 2);
        let bag = def.refill();
        def.set_quantity("red", 10);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn draw_from_empty_bag() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bag: Vec<String> = Vec::new();
        assert_eq!(draw(&mut bag, &mut rng), None);
    }

    #[test]
    fn contains_all_detects_foreign_items() {
        let def = BagDefinition::uniform(["red", "blue"], 1);
        assert!(def.contains_all(&["blue".to_string()]));
        assert!(!def.contains_all(&["red".to_string(), "red".to_string()]));
        assert!(!def.contains_all(&["green".to_string()]));
    }

    #[test]
    fn serde_keeps_color_order() {
        let def: BagDefinition = serde_json::from_str(r##"{"#f1f5f9":1,"#ef4444":2}"##).unwrap();
        assert_eq!(def.refill(), vec!["#f1f5f9", "#ef4444", "#ef4444"]);
    }

    proptest! {
        #[test]
        fn draws_never_replace(quantities in proptest::collection::vec(0u32..6, 1..6), k in 0usize..40, seed in any::<u64>()) {
            let colors: Vec<String> = (0..quantities.len()).map(|i| format!("c{i}")).collect();
            let mut def = BagDefinition::new();
            for (color, q) in colors.iter().zip(&quantities) {
                def.set_quantity(color, i64::from(*q));
            }
            let mut bag = def.refill();
            let n = bag.len();
            let mut rng = StdRng::seed_from_u64(seed);
            let drawn: Vec<String> = (0..k).filter_map(|_| draw(&mut bag, &mut rng)).collect();
            prop_assert_eq!(drawn.len(), k.min(n));
            prop_assert_eq!(bag.len(), n - k.min(n));
            prop_assert!(def.contains_all(&bag));
            prop_assert!(def.contains_all(&drawn));
        }
    }
}
