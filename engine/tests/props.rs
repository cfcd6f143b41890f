use engine::stats::{Breakdown, StatSource};
use engine::{ability_mod, proficiency_bonus};
use proptest::prelude::*;

proptest! {
    #[test]
    fn ability_mod_is_mathematical_floor(score in -20i32..=50) {
        let expected = (((score - 10) as f64) / 2.0).floor() as i32;
        prop_assert_eq!(ability_mod(score), expected);
    }

    #[test]
    fn proficiency_bonus_is_a_monotone_step(level in 1i32..=30) {
        let bonus = proficiency_bonus(level);
        prop_assert!((2..=6).contains(&bonus));
        prop_assert!(proficiency_bonus(level + 1) >= bonus);
        // Exact step edges.
        prop_assert_eq!(bonus, 2 + (level - 1).clamp(0, 16) / 4);
    }

    #[test]
    fn breakdown_total_always_equals_source_sum(values in prop::collection::vec(-50i32..=50, 0..10)) {
        let sources: Vec<StatSource> = values
            .iter()
            .enumerate()
            .map(|(i, v)| StatSource { source: format!("s{}", i), value: *v })
            .collect();
        let b = Breakdown::from_sources(sources);
        let sum: i32 = b.sources.iter().map(|s| s.value).sum();
        prop_assert_eq!(b.total, sum);
    }
}
