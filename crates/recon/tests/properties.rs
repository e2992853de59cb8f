// Property-based tests for region reconciliation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashMap;

use proptest::prelude::*;
use rentratio_io::{NormalizedRow, NormalizedTable, Period, Series};
use rentratio_recon::engine::{region_key, split_composite_name};
use rentratio_recon::{reconcile, DuplicatePolicy, ReconcileOptions, Resolution};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

const CITIES: &[&str] = &["Austin", "Columbus", "Dayton", "Portland", "Tampa", "Reno"];
const STATES: &[&str] = &["TX", "OH", "MN", "GA", "ME", "NV"];

fn periods() -> Vec<Period> {
    (1..=6).map(|m| Period::new(2021, m).unwrap()).collect()
}

/// A series over the fixed 6-month vocabulary with some holes.
fn arb_series(lo: f64, hi: f64) -> impl Strategy<Value = Series> {
    prop::collection::vec(prop::option::weighted(0.8, lo..hi), 6).prop_map(|values| {
        periods()
            .into_iter()
            .zip(values)
            .filter_map(|(p, v)| v.map(|v| (p, v)))
            .collect()
    })
}

fn arb_name() -> impl Strategy<Value = String> {
    (0..CITIES.len(), 0..STATES.len()).prop_map(|(c, s)| format!("{}, {}", CITIES[c], STATES[s]))
}

fn build_table(name: &str, rows: Vec<(String, Series)>) -> NormalizedTable {
    NormalizedTable {
        name: name.into(),
        periods: periods(),
        rows: rows
            .into_iter()
            .enumerate()
            .map(|(index, (region_name, series))| NormalizedRow {
                index,
                region_name,
                region_id: 1000 + index as u64,
                size_rank: index as u32,
                series,
            })
            .collect(),
    }
}

/// Primary table (sentinel first, as in the real data) plus a shorter secondary.
fn arb_dataset() -> impl Strategy<Value = (NormalizedTable, NormalizedTable)> {
    prop::collection::vec((arb_name(), arb_series(50_000.0, 900_000.0)), 1..30)
        .prop_flat_map(|rows| {
            let n = rows.len() + 1;
            (
                Just(rows),
                prop::collection::vec(arb_series(500.0, 4_000.0), 0..n),
            )
        })
        .prop_map(|(rows, rents)| {
            let mut primary_rows = vec![("United States".to_string(), Series::new())];
            primary_rows.extend(rows);
            let secondary_rows = rents
                .into_iter()
                .enumerate()
                .map(|(i, s)| (primary_rows[i].0.clone(), s))
                .collect();
            (build_table("zhvi", primary_rows), build_table("zori", secondary_rows))
        })
}

/// Reference model of the duplicate policy: which primary row index wins per key.
fn expected_winners(primary: &NormalizedTable, policy: &DuplicatePolicy) -> HashMap<String, usize> {
    let mut winners: HashMap<String, usize> = HashMap::new();
    for row in &primary.rows {
        let Some((city, state)) = split_composite_name(&row.region_name) else {
            continue;
        };
        let key = region_key(city);
        if winners.contains_key(&key) && policy.resolve(&key, state) == Resolution::KeepExisting {
            continue;
        }
        winners.insert(key, row.index);
    }
    winners
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn keys_come_from_input_cities((primary, secondary) in arb_dataset()) {
        let result = reconcile(&primary, Some(&secondary), &ReconcileOptions::default());
        for key in result.regions.keys() {
            let found = primary.rows.iter().any(|r| {
                split_composite_name(&r.region_name).map(|(c, _)| region_key(c)) == Some(key.clone())
            });
            prop_assert!(found, "key {} not derived from any row", key);
        }
        prop_assert!(result.get("united states").is_none());
        prop_assert_eq!(result.order.len(), result.regions.len());
    }

    #[test]
    fn duplicate_policy_is_deterministic((primary, secondary) in arb_dataset()) {
        let options = ReconcileOptions::default();
        let result = reconcile(&primary, Some(&secondary), &options);
        let winners = expected_winners(&primary, &options.policy);

        prop_assert_eq!(winners.len(), result.regions.len());
        for (key, index) in &winners {
            let region = &result.regions[key];
            prop_assert_eq!(region.row_index, *index, "winner mismatch for {}", key);
            prop_assert_eq!(&region.primary_series, &primary.rows[*index].series);
        }

        // Flagged keys are exactly those that collided.
        for key in &result.duplicate_keys {
            prop_assert!(result.collisions.iter().any(|c| &c.key == key));
        }
        prop_assert_eq!(
            result.duplicate_keys.len(),
            result.collisions.iter().map(|c| c.key.as_str()).collect::<std::collections::BTreeSet<_>>().len()
        );
    }

    #[test]
    fn secondary_is_strictly_positional((primary, secondary) in arb_dataset()) {
        let result = reconcile(&primary, Some(&secondary), &ReconcileOptions::default());
        for region in result.regions.values() {
            if region.row_index >= secondary.len() {
                prop_assert!(region.secondary_series.is_none());
            } else {
                prop_assert_eq!(
                    region.secondary_series.as_ref(),
                    Some(&secondary.rows[region.row_index].series)
                );
            }
        }
    }

    #[test]
    fn derived_matches_formula((primary, secondary) in arb_dataset()) {
        let result = reconcile(&primary, Some(&secondary), &ReconcileOptions::default());
        for region in result.regions.values() {
            prop_assert_eq!(region.derived_series.is_some(), region.secondary_series.is_some());
            let (Some(rent), Some(ratio)) = (&region.secondary_series, &region.derived_series) else {
                continue;
            };
            for (period, value) in region.primary_series.iter() {
                match rent.get(period) {
                    Some(r) => {
                        let expected = value / r / 12.0;
                        let got = ratio.get(period).unwrap();
                        prop_assert!((got - expected).abs() <= 1e-9 * expected.abs().max(1.0));
                    }
                    None => prop_assert!(ratio.get(period).is_none()),
                }
            }
            for period in ratio.periods() {
                prop_assert!(region.primary_series.get(period).is_some());
                prop_assert!(rent.get(period).is_some());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn austin_texas_survives_later_minnesota_row() {
    let dec = Period::new(2021, 12).unwrap();
    let mut rows: Vec<(String, Series)> = (0..41)
        .map(|i| (format!("Filler{i}, ZZ"), [(dec, 100_000.0 + i as f64)].into_iter().collect()))
        .collect();
    rows[0].0 = "United States".into();
    rows[5] = ("Austin, TX".into(), [(dec, 540_000.0)].into_iter().collect());
    rows[40] = ("Austin, MN".into(), [(dec, 150_000.0)].into_iter().collect());
    let primary = build_table("zhvi", rows);

    let rents = (0..10)
        .map(|i| (primary.rows[i].region_name.clone(), [(dec, 2250.0)].into_iter().collect()))
        .collect();
    let secondary = build_table("zori", rents);

    let result = reconcile(&primary, Some(&secondary), &ReconcileOptions::default());
    let austin = result.get("austin").unwrap();
    assert_eq!(austin.state, "TX");
    assert_eq!(austin.row_index, 5);
    assert_eq!(austin.primary_series.get(dec), Some(540_000.0));
    assert!((austin.derived_series.as_ref().unwrap().get(dec).unwrap() - 20.0).abs() < 1e-9);

    assert!(result.duplicate_keys.contains("austin"));
    assert_eq!(result.collisions.len(), 1);
    assert_eq!(result.collisions[0].incoming_state, "MN");
    assert_eq!(result.collisions[0].existing_state, "TX");
    assert_eq!(result.collisions[0].row_index, 40);
}
