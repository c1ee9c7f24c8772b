//! FILENAME: server/src/dataset.rs
//! Seeded fact-table generation.
//!
//! Produces the detailed dataset at the lowest granularity (day,
//! client, employee, product) that the engine aggregates. Generation
//! is seeded so that a given (size, seed) pair always yields the same
//! store; the invariant `total_retard == moyenne_retard *
//! nombre_commandes` holds for every generated record.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use olap_engine::{round2, FactRecord, FactStore};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const SEASONS: [&str; 4] = ["Winter", "Spring", "Summer", "Fall"];

// (name, country, region)
const CLIENTS: [(&str, &str, &str); 5] = [
    ("TechCorp", "USA", "North"),
    ("BizSol", "USA", "South"),
    ("EduInst", "UK", "Europe"),
    ("GovSys", "France", "Europe"),
    ("RetailCo", "Germany", "Europe"),
];

// (name, department)
const EMPLOYEES: [(&str, &str); 5] = [
    ("John Doe", "Sales"),
    ("Jane Smith", "Sales"),
    ("Bob Johnson", "Marketing"),
    ("Alice Brown", "Support"),
    ("Charlie Davis", "Operations"),
];

// (name, category, supplier)
const PRODUCTS: [(&str, &str, &str); 5] = [
    ("Laptop X", "Electronics", "Dell"),
    ("Monitor Y", "Electronics", "Samsung"),
    ("Desk Chair", "Furniture", "IKEA"),
    ("Office Table", "Furniture", "Herman Miller"),
    ("ERP License", "Software", "Oracle"),
];

/// Builds the immutable store: `size` records across 2023-2024.
pub fn build_store(size: usize, seed: u64) -> FactStore {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(size);

    for _ in 0..size {
        let year: u32 = if rng.gen_bool(0.5) { 2023 } else { 2024 };
        let month: u32 = rng.gen_range(1..=12);
        let day: u32 = rng.gen_range(1..=28);
        let quarter = (month - 1) / 3 + 1;
        let season = SEASONS[((month % 12 + 3) / 3 - 1) as usize];

        let (client, pays, region) = CLIENTS[rng.gen_range(0..CLIENTS.len())];
        let (employe, departement) = EMPLOYEES[rng.gen_range(0..EMPLOYEES.len())];
        let (produit, categorie, fournisseur) = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];

        let nombre_commandes: u32 = rng.gen_range(1..=5);

        // Sales and Marketing run with fewer delays than Operations.
        let base_delay: f64 = if matches!(departement, "Sales" | "Marketing") {
            rng.gen_range(0.0..5.0)
        } else {
            rng.gen_range(2.0..10.0)
        };
        let moyenne_retard = round2((base_delay + rng.gen_range(-1.0..1.0)).max(0.0));

        let moy_prevue = rng.gen_range(5.0..15.0);
        let moy_reelle = moy_prevue + moyenne_retard;

        records.push(FactRecord {
            year: year.to_string(),
            month: MONTH_LABELS[(month - 1) as usize].to_string(),
            trimestre: format!("{}-Q{}", year, quarter),
            saison: season.to_string(),
            jour: day.to_string(),
            client: client.to_string(),
            pays: pays.to_string(),
            region: region.to_string(),
            employe: employe.to_string(),
            departement: departement.to_string(),
            produit: produit.to_string(),
            categorie: categorie.to_string(),
            fournisseur: fournisseur.to_string(),
            nombre_commandes,
            total_retard: moyenne_retard * f64::from(nombre_commandes),
            moyenne_retard,
            min_retard: (moyenne_retard - 1.0).max(0.0),
            max_retard: moyenne_retard + 2.0,
            moy_prevue,
            moy_reelle,
        });
    }

    FactStore::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = build_store(50, 7);
        let b = build_store(50, 7);
        assert_eq!(a.records(), b.records());

        let c = build_store(50, 8);
        assert_ne!(a.records(), c.records());
    }

    #[test]
    fn records_satisfy_the_store_invariant() {
        let store = build_store(200, 42);
        assert_eq!(store.len(), 200);

        for record in store.records() {
            assert!(record.nombre_commandes >= 1);
            assert!(record.moyenne_retard >= 0.0);
            let expected = record.moyenne_retard * f64::from(record.nombre_commandes);
            assert!((record.total_retard - expected).abs() < 1e-9);
            assert!(record.min_retard <= record.moyenne_retard);
            assert!(record.max_retard >= record.moyenne_retard);
        }
    }

    #[test]
    fn dimensions_stay_consistent_within_a_record() {
        let store = build_store(100, 1);
        for record in store.records() {
            assert!(record.trimestre.starts_with(&record.year));
            assert!(SEASONS.contains(&record.saison.as_str()));
            assert!(MONTH_LABELS.contains(&record.month.as_str()));
        }
    }
}
