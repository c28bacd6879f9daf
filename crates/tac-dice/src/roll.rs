//! The roll engine and its results.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bag::draw;
use crate::custom::{CustomDieRegistry, ResolvedDie};
use crate::die::DieType;
use crate::entry::{DiceEntry, PoolMode};
use crate::face::FaceValue;
use crate::threshold::classify;

/// One rolled die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    /// The face that came up.
    pub value: FaceValue,
    /// Classification under the entry's rule; absent when unclassified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_success: Option<bool>,
    /// Display color: the drawn bag color, else the entry override, else the
    /// custom die's color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Whether the face came from a custom die.
    #[serde(default)]
    pub is_custom: bool,
    /// The die type it was rolled with.
    #[serde(rename = "diceType")]
    pub die_type: DieType,
}

/// Everything the engine needs from a pool.
#[derive(Debug, Clone, Copy)]
pub struct RollRequest<'a> {
    /// Pool mode.
    pub mode: PoolMode,
    /// Pool entries, in declaration order.
    pub entries: &'a [DiceEntry],
    /// Remaining bag contents (blind-bag pools only).
    pub bag: &'a [String],
}

/// The engine's answer: the results and the bag left after drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollOutcome {
    /// Results, in entry order then draw order.
    pub results: Vec<RollResult>,
    /// The authoritative remaining bag after this roll.
    pub bag: Vec<String>,
}

impl RollOutcome {
    /// Sum of the numeric faces. See [`sum`].
    pub fn sum(&self) -> f64 {
        sum(&self.results)
    }

    /// Number of successes. See [`successes`].
    pub fn successes(&self) -> u32 {
        successes(&self.results)
    }
}

/// Sum of numeric faces; faces without a numeric reading add 0.
pub fn sum(results: &[RollResult]) -> f64 {
    results
        .iter()
        .filter_map(|r| r.value.as_number())
        .sum()
}

/// Count of results classified as a success.
pub fn successes(results: &[RollResult]) -> u32 {
    results.iter().filter(|r| r.is_success == Some(true)).count() as u32
}

/// Roll a pool.
///
/// Standard pools roll every entry's dice independently, each classified by
/// its own entry. Blind-bag pools pull `min(total count, bag size)` items
/// without replacement; every pull rolls the first entry's die and uses the
/// first entry's rule, while later entries only add to the pull count.
pub fn roll<R: Rng>(request: &RollRequest<'_>, registry: &CustomDieRegistry, rng: &mut R) -> RollOutcome {
    let mut bag = request.bag.to_vec();
    let mut results = Vec::new();

    match request.mode {
        PoolMode::Standard => {
            for entry in request.entries {
                let resolved = registry.resolve(&entry.die_type);
                let color = entry
                    .color
                    .clone()
                    .or_else(|| resolved.map(|d| d.color.to_string()));
                for _ in 0..entry.count {
                    results.push(roll_one(entry, resolved, color.clone(), rng));
                }
            }
        }
        PoolMode::BlindBag => {
            if let Some(template) = request.entries.first() {
                let requested: usize = request.entries.iter().map(|e| e.count as usize).sum();
                let pulls = requested.min(bag.len());
                let resolved = registry.resolve(&template.die_type);
                for _ in 0..pulls {
                    let color = draw(&mut bag, rng);
                    results.push(roll_one(template, resolved, color, rng));
                }
            }
        }
    }

    tracing::debug!(
        mode = %request.mode,
        results = results.len(),
        bag_left = bag.len(),
        "rolled pool"
    );
    RollOutcome { results, bag }
}

fn roll_one<R: Rng>(
    entry: &DiceEntry,
    resolved: Option<ResolvedDie<'_>>,
    color: Option<String>,
    rng: &mut R,
) -> RollResult {
    let value = draw_face(&entry.die_type, resolved, rng);
    RollResult {
        is_success: classify(&value, &entry.rule),
        value,
        color,
        is_custom: resolved.is_some(),
        die_type: entry.die_type.clone(),
    }
}

fn draw_face<R: Rng>(die: &DieType, resolved: Option<ResolvedDie<'_>>, rng: &mut R) -> FaceValue {
    match resolved {
        Some(custom) => {
            let idx = rng.random_range(0..custom.faces.len());
            FaceValue::Text(custom.faces[idx].content.clone())
        }
        None => FaceValue::Number(i64::from(rng.random_range(1..=die.sides()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::BagDefinition;
    use crate::custom::FaceTemplate;
    use crate::threshold::ThresholdRule;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn standard(entries: &[DiceEntry]) -> RollRequest<'_> {
        RollRequest {
            mode: PoolMode::Standard,
            entries,
            bag: &[],
        }
    }

    #[test]
    fn five_d6_give_five_results_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let entries = [DiceEntry::new(DieType::d6()).with_count(5)];
        let outcome = roll(&standard(&entries), &CustomDieRegistry::new(), &mut rng);
        assert_eq!(outcome.results.len(), 5);
        for r in &outcome.results {
            let FaceValue::Number(n) = r.value else {
                panic!("standard dice roll numbers");
            };
            assert!((1..=6).contains(&n));
            assert!(!r.is_custom);
            assert_eq!(r.die_type, DieType::d6());
        }
    }

    #[test]
    fn results_follow_entry_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let entries = [
            DiceEntry::new(DieType::Standard(20)).with_count(2),
            DiceEntry::new(DieType::Standard(4)).with_count(3),
        ];
        let outcome = roll(&standard(&entries), &CustomDieRegistry::new(), &mut rng);
        let types: Vec<u32> = outcome
            .results
            .iter()
            .map(|r| r.die_type.sides())
            .collect();
        assert_eq!(types, vec![20, 20, 4, 4, 4]);
    }

    #[test]
    fn each_entry_uses_its_own_rule() {
        let mut rng = StdRng::seed_from_u64(3);
        let entries = [
            DiceEntry::new(DieType::d6()).with_count(4).with_rule(ThresholdRule::at_least(1)),
            DiceEntry::new(DieType::d6()).with_count(4).with_rule(ThresholdRule::none()),
        ];
        let outcome = roll(&standard(&entries), &CustomDieRegistry::new(), &mut rng);
        assert!(outcome.results[..4].iter().all(|r| r.is_success == Some(true)));
        assert!(outcome.results[4..].iter().all(|r| r.is_success.is_none()));
        assert_eq!(outcome.successes(), 4);
    }

    #[test]
    fn custom_die_rolls_its_faces_with_its_color() {
        let mut registry = CustomDieRegistry::new();
        let id = registry.create("#a855f7");
        registry
            .get_mut(&id)
            .unwrap()
            .apply_template(FaceTemplate::Binary);

        let mut rng = StdRng::seed_from_u64(11);
        let entries = [DiceEntry::new(DieType::CustomRef(id))
            .with_count(10)
            .with_rule(ThresholdRule::match_any(["hit"]))];
        let outcome = roll(&standard(&entries), &registry, &mut rng);

        for r in &outcome.results {
            assert!(r.is_custom);
            assert_eq!(r.color.as_deref(), Some("#a855f7"));
            let hit = r.value == FaceValue::from("HIT");
            assert!(hit || r.value == FaceValue::from("MISS"));
            assert_eq!(r.is_success, Some(hit));
        }
    }

    #[test]
    fn entry_color_overrides_die_color() {
        let mut registry = CustomDieRegistry::new();
        let id = registry.create("#a855f7");
        let mut rng = StdRng::seed_from_u64(5);
        let entries = [DiceEntry::new(DieType::CustomRef(id)).with_color("#22c55e")];
        let outcome = roll(&standard(&entries), &registry, &mut rng);
        assert_eq!(outcome.results[0].color.as_deref(), Some("#22c55e"));
    }

    #[test]
    fn dangling_custom_reference_rolls_as_d6() {
        let mut rng = StdRng::seed_from_u64(9);
        let entries = [DiceEntry::new(DieType::CustomRef("gone".into())).with_count(20)];
        let outcome = roll(&standard(&entries), &CustomDieRegistry::new(), &mut rng);
        for r in &outcome.results {
            assert!(!r.is_custom);
            assert!(r.color.is_none());
            assert!(matches!(r.value, FaceValue::Number(1..=6)));
        }
    }

    #[test]
    fn blind_bag_pulls_without_replacement() {
        let def = BagDefinition::uniform(["red", "blue"], 3);
        let bag = def.refill();
        let entries = [
            DiceEntry::new(DieType::d6()).with_count(2).with_rule(ThresholdRule::none()),
            DiceEntry::new(DieType::Standard(20)).with_count(2).with_rule(ThresholdRule::at_least(1)),
        ];
        let request = RollRequest {
            mode: PoolMode::BlindBag,
            entries: &entries,
            bag: &bag,
        };
        let mut rng = StdRng::seed_from_u64(21);
        let outcome = roll(&request, &CustomDieRegistry::new(), &mut rng);

        assert_eq!(outcome.results.len(), 4);
        assert_eq!(outcome.bag.len(), 2);
        for r in &outcome.results {
            assert_eq!(r.die_type, DieType::d6());
            assert!(r.is_success.is_none());
            assert!(matches!(r.color.as_deref(), Some("red" | "blue")));
        }
        let mut all: Vec<String> = outcome.bag.clone();
        all.extend(outcome.results.iter().filter_map(|r| r.color.clone()));
        all.sort();
        let mut full = bag.clone();
        full.sort();
        assert_eq!(all, full);
    }

    #[test]
    fn blind_bag_is_capped_by_bag_size() {
        let bag = vec!["red".to_string(), "blue".to_string()];
        let entries = [DiceEntry::new(DieType::d6()).with_count(5)];
        let request = RollRequest {
            mode: PoolMode::BlindBag,
            entries: &entries,
            bag: &bag,
        };
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = roll(&request, &CustomDieRegistry::new(), &mut rng);
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.bag.is_empty());

        let again = roll(
            &RollRequest {
                bag: &outcome.bag,
                ..request
            },
            &CustomDieRegistry::new(),
            &mut rng,
        );
        assert!(again.results.is_empty());
    }

    #[test]
    fn sum_skips_textual_faces() {
        let result = |value: FaceValue| RollResult {
            value,
            is_success: None,
            color: None,
            is_custom: false,
            die_type: DieType::d6(),
        };
        let results = vec![
            result(FaceValue::Number(3)),
            result(FaceValue::from("HIT")),
            result(FaceValue::from("4")),
        ];
        assert_eq!(sum(&results), 7.0);
        assert_eq!(successes(&results), 0);
    }

    #[test]
    fn result_serde_omits_absent_fields() {
        let r = RollResult {
            value: FaceValue::Number(5),
            is_success: None,
            color: None,
            is_custom: false,
            die_type: DieType::Standard(8),
        };
        insta::assert_snapshot!(
            serde_json::to_string(&r).unwrap(),
            @r#"{"value":5,"isCustom":false,"diceType":8}"#
        );
    }

    proptest! {
        #[test]
        fn standard_counts_and_ranges(count in 1u32..30, sides_idx in 0usize..7, seed in any::<u64>()) {
            let sides = crate::die::STANDARD_SIDES[sides_idx];
            let entries = [DiceEntry::new(DieType::Standard(sides)).with_count(count)];
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = roll(&standard(&entries), &CustomDieRegistry::new(), &mut rng);
            prop_assert_eq!(outcome.results.len(), count as usize);
            for r in &outcome.results {
                let n = r.value.as_number().unwrap_or_default();
                prop_assert!((1.0..=f64::from(sides)).contains(&n));
            }
        }

        #[test]
        fn blind_bag_leaves_n_minus_k(n in 0u32..30, count in 1u32..40, seed in any::<u64>()) {
            let def = BagDefinition::uniform(["red", "blue", "green"], n);
            let bag = def.refill();
            let entries = [DiceEntry::new(DieType::d6()).with_count(count)];
            let request = RollRequest { mode: PoolMode::BlindBag, entries: &entries, bag: &bag };
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = roll(&request, &CustomDieRegistry::new(), &mut rng);
            let k = (count as usize).min(bag.len());
            prop_assert_eq!(outcome.results.len(), k);
            prop_assert_eq!(outcome.bag.len(), bag.len() - k);
            prop_assert!(def.contains_all(&outcome.bag));
        }
    }
}
