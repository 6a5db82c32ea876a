/// Property-based tests using proptest
/// Invariants of schema resolution, lookups and scoring over arbitrary inputs
use proptest::prelude::*;

use ecoscore::compare::{best_value, compare};
use ecoscore::dataset::ProductRecord;
use ecoscore::schema::find_column;
use ecoscore::scoring::whatif::{project, Baseline, Scenario};
use ecoscore::scoring::{adjusted_carbon, recyclability_lookup, score_records, simulate, ScoringModel, WhatIf};

const PACKAGING: [&str; 6] = ["Plastic", "Glass", "Paper", "Tube", "Aerosol Can", "Refill Pouch"];
const COUNTRIES: [&str; 5] = ["USA", "France", "China", "India", "Atlantis"];

// Property: an exact label wins over substring hits, whatever the candidate order
proptest! {
    #[test]
    fn exact_match_beats_substring(
        exact in "[a-z]{3,8}",
        prefix in "[a-z]{1,4}",
        substring_first in any::<bool>(),
    ) {
        // `partial` only hits `longer`, and only in the substring tier
        let longer = format!("{}_{}", prefix, exact);
        let partial = format!("{}_", prefix);
        let labels = vec![longer, exact.to_uppercase()];
        let candidates = if substring_first {
            vec![partial, exact.clone()]
        } else {
            vec![exact.clone(), partial]
        };
        let upper = exact.to_uppercase();
        prop_assert_eq!(find_column(&labels, &candidates), Some(upper.as_str()));
    }

    #[test]
    fn recyclability_lookup_is_total(packaging in "\\PC*") {
        let value = recyclability_lookup(&packaging);
        prop_assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn adjusted_carbon_monotonic_in_factor(
        raw in 0.0f64..10_000.0,
        f1 in 0.0f64..5.0,
        f2 in 0.0f64..5.0,
    ) {
        let (lo, hi) = if f1 <= f2 { (f1, f2) } else { (f2, f1) };
        prop_assert!(adjusted_carbon(raw, lo) <= adjusted_carbon(raw, hi));
    }
}

fn record(packaging: usize, country: usize, carbon: f64, eco: Option<f64>) -> ProductRecord {
    let mut r = ProductRecord::new("P", "Care");
    r.packaging_type = Some(PACKAGING[packaging].to_string());
    r.country_of_origin = Some(COUNTRIES[country].to_string());
    r.carbon_intensity = Some(carbon);
    r.eco_score = eco;
    r.price = Some(5.0);
    r
}

// Property: what-if outcomes
proptest! {
    #[test]
    fn whatif_identity_keeps_carbon_and_score(
        packaging in 0usize..PACKAGING.len(),
        country in 0usize..COUNTRIES.len(),
        carbon in 0.0f64..5_000.0,
        eco in 0.0f64..=100.0,
    ) {
        let r = record(packaging, country, carbon, Some(eco));
        let model = ScoringModel::default();
        let sim = simulate(&r, &WhatIf::default(), &model).unwrap();

        let before = sim.carbon_before.unwrap();
        let after = sim.simulated_carbon().unwrap();
        prop_assert!((after - before).abs() <= 1e-9 * before.max(1.0));
        prop_assert!((sim.simulated_eco_score().unwrap() - eco).abs() < 1e-6);
    }

    #[test]
    fn simulated_score_always_in_range(
        old_recyc in 0.0f64..=100.0,
        new_recyc in 0.0f64..=100.0,
        old_factor in 0.1f64..3.0,
        new_factor in 0.1f64..3.0,
        carbon in 0.0f64..100_000.0,
        eco in 0.0f64..=100.0,
        tweak in 0.5f64..=2.0,
        safety_bonus in 0.0f64..=40.0,
    ) {
        let baseline = Baseline {
            recyclability: old_recyc,
            country_factor: old_factor,
            adjusted_carbon: carbon,
            eco_score: Some(eco),
        };
        let scenario = Scenario {
            recyclability: new_recyc,
            country_factor: new_factor,
            tweak,
            safety_bonus,
        };
        let projection = project(&baseline, &scenario);
        let score = projection.simulated_eco_score.unwrap();
        prop_assert!((0.0..=100.0).contains(&score));
        prop_assert!(projection.simulated_carbon >= 0.0);
    }

    #[test]
    fn tweak_outside_range_is_rejected(tweak in prop_oneof![0.0f64..0.4999, 2.0001f64..10.0]) {
        let r = record(0, 0, 100.0, Some(50.0));
        let what_if = WhatIf { tweak, ..WhatIf::default() };
        prop_assert!(simulate(&r, &what_if, &ScoringModel::default()).is_err());
    }
}

// Property: best value fails gracefully without usable prices
proptest! {
    #[test]
    fn best_value_graceful_without_prices(
        ecos in prop::collection::vec(0.0f64..=100.0, 1..6),
        zero_price in prop::collection::vec(any::<bool>(), 6),
    ) {
        let records: Vec<ProductRecord> = ecos
            .iter()
            .enumerate()
            .map(|(i, eco)| {
                let mut r = ProductRecord::new(format!("P{}", i), "Care");
                r.eco_score = Some(*eco);
                r.carbon_intensity = Some(10.0 * i as f64);
                r.price = if zero_price[i] { Some(0.0) } else { None };
                r
            })
            .collect();
        let refs: Vec<&ProductRecord> = records.iter().collect();
        let scores = score_records(&refs, &ScoringModel::default());

        prop_assert!(best_value(&scores).is_err());
        let picks = compare(&scores);
        prop_assert!(picks.best_value.is_none());
        prop_assert!(picks.best_eco.is_some());
        prop_assert_eq!(picks.lowest_carbon.unwrap().index, 0);
    }
}
