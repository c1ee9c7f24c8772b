//! FILENAME: core/olap-engine/src/aggregate.rs
//! Group-By Aggregator - partitions records and reduces each
//! partition to a weighted measure tuple.
//!
//! The central correctness property here is the weighting: group
//! averages are weighted sums divided by the summed order count,
//! never the arithmetic mean of per-record averages. Naive averaging
//! over heterogeneous group sizes produces biased results.
//!
//! Groups are keyed by the tuple of grouping-attribute values and
//! emitted in first-seen record order, which keeps repeated queries
//! over an unchanged store byte-identical. The same key-to-index map
//! plus ordered vector idiom backs the value interning in the pivot
//! cache this engine grew out of.

use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;

use crate::store::FactRecord;

/// The eight measure columns, in output order. These names are
/// reserved: they are never valid dimension-column names.
pub const MEASURE_COLUMNS: [&str; 8] = [
    "nombre_commandes",
    "total_retard",
    "moyenne_retard",
    "min_retard",
    "max_retard",
    "moy_prevue",
    "moy_reelle",
    "ecart_moyen",
];

/// Values of the grouping attributes for one group, in fixed axis
/// order (time, client, employee, product). Empty = grand total.
type KeyValues = SmallVec<[String; 4]>;

/// Rounds to 2 decimals with half-to-even ties, matching the
/// reference output. `f64::round` rounds halves away from zero.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor == 0.5 {
        if floor.rem_euclid(2.0) == 0.0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        scaled.round()
    };
    rounded / 100.0
}

/// Running state for one group. All averages stay as weighted sums
/// until `finish`; extrema come from the stored per-record extrema,
/// not recomputed from totals.
#[derive(Debug, Clone, Default)]
struct MeasureAccumulator {
    orders: u64,
    total_retard: f64,
    min_retard: Option<f64>,
    max_retard: Option<f64>,
    weighted_prevue: f64,
    weighted_reelle: f64,
}

impl MeasureAccumulator {
    fn add(&mut self, record: &FactRecord) {
        let weight = f64::from(record.nombre_commandes);
        self.orders += u64::from(record.nombre_commandes);
        self.total_retard += record.total_retard;
        self.min_retard = Some(
            self.min_retard
                .map_or(record.min_retard, |m| m.min(record.min_retard)),
        );
        self.max_retard = Some(
            self.max_retard
                .map_or(record.max_retard, |m| m.max(record.max_retard)),
        );
        self.weighted_prevue += record.moy_prevue * weight;
        self.weighted_reelle += record.moy_reelle * weight;
    }

    fn finish(&self) -> MeasureSet {
        let n = self.orders as f64;
        let moyenne_retard = if self.orders > 0 {
            self.total_retard / n
        } else {
            0.0
        };
        let moy_prevue = if self.orders > 0 {
            self.weighted_prevue / n
        } else {
            0.0
        };
        let moy_reelle = if self.orders > 0 {
            self.weighted_reelle / n
        } else {
            0.0
        };

        MeasureSet {
            nombre_commandes: self.orders,
            total_retard: round2(self.total_retard),
            moyenne_retard: round2(moyenne_retard),
            min_retard: round2(self.min_retard.unwrap_or(0.0)),
            max_retard: round2(self.max_retard.unwrap_or(0.0)),
            moy_prevue: round2(moy_prevue),
            moy_reelle: round2(moy_reelle),
            ecart_moyen: round2(moy_reelle - moy_prevue),
        }
    }
}

/// The computed measures of one result row, rounded for output.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MeasureSet {
    pub nombre_commandes: u64,
    pub total_retard: f64,
    pub moyenne_retard: f64,
    pub min_retard: f64,
    pub max_retard: f64,
    pub moy_prevue: f64,
    pub moy_reelle: f64,
    pub ecart_moyen: f64,
}

/// One output row: the dimension values that defined its group key,
/// plus the computed measures. Serializes flat, dimension columns
/// first and measures after, exactly as the stored-procedure cursor
/// lays its columns out.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    /// Ordered (attribute-name, value) pairs, one per grouping
    /// attribute. Empty for the grand-total row.
    pub dimensions: Vec<(String, String)>,
    pub measures: MeasureSet,
}

impl Serialize for AggregateRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dimensions.len() + 8))?;
        for (name, value) in &self.dimensions {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("nombre_commandes", &self.measures.nombre_commandes)?;
        map.serialize_entry("total_retard", &self.measures.total_retard)?;
        map.serialize_entry("moyenne_retard", &self.measures.moyenne_retard)?;
        map.serialize_entry("min_retard", &self.measures.min_retard)?;
        map.serialize_entry("max_retard", &self.measures.max_retard)?;
        map.serialize_entry("moy_prevue", &self.measures.moy_prevue)?;
        map.serialize_entry("moy_reelle", &self.measures.moy_reelle)?;
        map.serialize_entry("ecart_moyen", &self.measures.ecart_moyen)?;
        map.end()
    }
}

/// Partitions `records` by the values of `grouping` and reduces each
/// partition.
///
/// An empty `grouping` yields exactly one grand-total row, or no row
/// at all when `records` is empty. A record missing one of the
/// grouping attributes (only possible when a caller passes a field
/// name outside the dimension schema) is excluded, consistent with
/// the fail-closed filter policy.
pub fn aggregate(records: &[&FactRecord], grouping: &[&str]) -> Vec<AggregateRow> {
    if grouping.is_empty() {
        if records.is_empty() {
            return Vec::new();
        }
        let mut acc = MeasureAccumulator::default();
        for record in records {
            acc.add(record);
        }
        return vec![AggregateRow {
            dimensions: Vec::new(),
            measures: acc.finish(),
        }];
    }

    let mut index: FxHashMap<KeyValues, usize> = FxHashMap::default();
    let mut groups: Vec<(KeyValues, MeasureAccumulator)> = Vec::new();

    'records: for record in records {
        let mut key = KeyValues::new();
        for attribute in grouping {
            match record.dimension(attribute) {
                Some(value) => key.push(value.to_string()),
                None => continue 'records,
            }
        }

        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                let i = groups.len();
                index.insert(key.clone(), i);
                groups.push((key, MeasureAccumulator::default()));
                i
            }
        };
        groups[slot].1.add(record);
    }

    groups
        .into_iter()
        .map(|(key, acc)| AggregateRow {
            dimensions: grouping
                .iter()
                .map(|a| a.to_string())
                .zip(key.into_iter())
                .collect(),
            measures: acc.finish(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FactRecord;

    fn record(year: &str, dept: &str, orders: u32, avg_delay: f64) -> FactRecord {
        FactRecord {
            year: year.to_string(),
            departement: dept.to_string(),
            nombre_commandes: orders,
            total_retard: avg_delay * f64::from(orders),
            moyenne_retard: avg_delay,
            min_retard: (avg_delay - 1.0).max(0.0),
            max_retard: avg_delay + 2.0,
            moy_prevue: 10.0,
            moy_reelle: 10.0 + avg_delay,
            ..Default::default()
        }
    }

    #[test]
    fn weighted_average_not_naive_mean() {
        // Order counts 2 and 3 with per-record delays 4.0 and 9.0:
        // total = 2*4 + 3*9 = 35, n = 5, weighted mean = 7.0.
        // The naive mean of the two per-record averages would be 6.5.
        let a = record("2023", "Sales", 2, 4.0);
        let b = record("2023", "Sales", 3, 9.0);
        let rows = aggregate(&[&a, &b], &["year"]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].measures.nombre_commandes, 5);
        assert_eq!(rows[0].measures.total_retard, 35.0);
        assert_eq!(rows[0].measures.moyenne_retard, 7.0);
    }

    #[test]
    fn extrema_come_from_stored_per_record_extrema() {
        let a = record("2023", "Sales", 2, 4.0);
        let b = record("2023", "Sales", 3, 9.0);
        let rows = aggregate(&[&a, &b], &["year"]);

        assert_eq!(rows[0].measures.min_retard, 3.0); // min(4-1, 9-1)
        assert_eq!(rows[0].measures.max_retard, 11.0); // max(4+2, 9+2)
    }

    #[test]
    fn grand_total_is_single_row() {
        let a = record("2023", "Sales", 2, 4.0);
        let b = record("2024", "IT", 3, 9.0);
        let rows = aggregate(&[&a, &b], &[]);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].dimensions.is_empty());
        assert_eq!(rows[0].measures.nombre_commandes, 5);
    }

    #[test]
    fn empty_input_yields_no_grand_total_row() {
        assert!(aggregate(&[], &[]).is_empty());
        assert!(aggregate(&[], &["year"]).is_empty());
    }

    #[test]
    fn partition_completeness() {
        let records = vec![
            record("2023", "Sales", 2, 4.0),
            record("2023", "IT", 1, 2.0),
            record("2024", "Sales", 3, 9.0),
            record("2024", "IT", 4, 1.0),
        ];
        let refs: Vec<&FactRecord> = records.iter().collect();
        let total_orders: u64 = records.iter().map(|r| u64::from(r.nombre_commandes)).sum();

        for grouping in [
            &[][..],
            &["year"][..],
            &["departement"][..],
            &["year", "departement"][..],
        ] {
            let rows = aggregate(&refs, grouping);
            let summed: u64 = rows.iter().map(|r| r.measures.nombre_commandes).sum();
            assert_eq!(summed, total_orders, "grouping {:?}", grouping);
        }
    }

    #[test]
    fn groups_emit_in_first_seen_order() {
        let a = record("2024", "Sales", 1, 1.0);
        let b = record("2023", "Sales", 1, 1.0);
        let c = record("2024", "Sales", 1, 1.0);
        let rows = aggregate(&[&a, &b, &c], &["year"]);

        assert_eq!(rows[0].dimensions[0], ("year".to_string(), "2024".to_string()));
        assert_eq!(rows[1].dimensions[0], ("year".to_string(), "2023".to_string()));
        assert_eq!(rows[0].measures.nombre_commandes, 2);
    }

    #[test]
    fn weighted_durations_and_deviation() {
        let mut a = record("2023", "Sales", 2, 0.0);
        a.moy_prevue = 6.0;
        a.moy_reelle = 8.0;
        let mut b = record("2023", "Sales", 3, 0.0);
        b.moy_prevue = 11.0;
        b.moy_reelle = 11.0;
        let rows = aggregate(&[&a, &b], &["year"]);

        // (2*6 + 3*11) / 5 = 9.0, (2*8 + 3*11) / 5 = 9.8
        assert_eq!(rows[0].measures.moy_prevue, 9.0);
        assert_eq!(rows[0].measures.moy_reelle, 9.8);
        assert!((rows[0].measures.ecart_moyen - 0.8).abs() < 1e-9);
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.135), 0.14);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(2.675000001), 2.68);
        assert_eq!(round2(7.0), 7.0);
    }

    #[test]
    fn row_serializes_flat_with_dimensions_first() {
        let a = record("2023", "Sales", 2, 4.0);
        let rows = aggregate(&[&a], &["year", "departement"]);
        let json = serde_json::to_value(&rows[0]).unwrap();

        assert_eq!(json["year"], "2023");
        assert_eq!(json["departement"], "Sales");
        assert_eq!(json["nombre_commandes"], 2);
        assert_eq!(json["moyenne_retard"], 4.0);
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "year");
        assert_eq!(keys[1], "departement");
        assert_eq!(keys.len(), 2 + MEASURE_COLUMNS.len());
    }
}
