//! FILENAME: core/olap-engine/src/store.rs
//! Fact Record Store - the immutable record set every query reads.
//!
//! Records are stored at the finest granularity (day, employee,
//! product, client). The store is built once at process startup and
//! never mutated afterwards; queries borrow it read-only, so
//! concurrent queries need no coordination.

use serde::{Deserialize, Serialize};

/// One service-delivery observation at the finest granularity.
///
/// Dimension attributes are categorical strings; measure attributes
/// are numeric. `total_retard` is already multiplied by
/// `nombre_commandes` when the record is produced, so
/// `total_retard == moyenne_retard * nombre_commandes` holds per
/// record. `moy_reelle >= moy_prevue` is NOT guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    // Time dimension
    pub year: String,
    pub month: String,
    pub trimestre: String,
    pub saison: String,
    pub jour: String,

    // Client dimension
    pub client: String,
    pub pays: String,
    pub region: String,

    // Employee dimension
    pub employe: String,
    pub departement: String,

    // Product dimension
    pub produit: String,
    pub categorie: String,
    pub fournisseur: String,

    // Measures
    pub nombre_commandes: u32,
    pub total_retard: f64,
    pub moyenne_retard: f64,
    pub min_retard: f64,
    pub max_retard: f64,
    pub moy_prevue: f64,
    pub moy_reelle: f64,
}

/// A record attribute as seen by the slice filter: either a
/// categorical dimension label or a measure number.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl FactRecord {
    /// Looks up an attribute by lower-cased name.
    ///
    /// Returns `None` for names outside the record schema; the filter
    /// treats that as a failed constraint (fail-closed).
    pub fn attribute(&self, name: &str) -> Option<AttrValue<'_>> {
        let value = match name {
            "year" => AttrValue::Text(&self.year),
            "month" => AttrValue::Text(&self.month),
            "trimestre" => AttrValue::Text(&self.trimestre),
            "saison" => AttrValue::Text(&self.saison),
            "jour" => AttrValue::Text(&self.jour),
            "client" => AttrValue::Text(&self.client),
            "pays" => AttrValue::Text(&self.pays),
            "region" => AttrValue::Text(&self.region),
            "employe" => AttrValue::Text(&self.employe),
            "departement" => AttrValue::Text(&self.departement),
            "produit" => AttrValue::Text(&self.produit),
            "categorie" => AttrValue::Text(&self.categorie),
            "fournisseur" => AttrValue::Text(&self.fournisseur),
            "nombre_commandes" => AttrValue::Number(f64::from(self.nombre_commandes)),
            "total_retard" => AttrValue::Number(self.total_retard),
            "moyenne_retard" => AttrValue::Number(self.moyenne_retard),
            "min_retard" => AttrValue::Number(self.min_retard),
            "max_retard" => AttrValue::Number(self.max_retard),
            "moy_prevue" => AttrValue::Number(self.moy_prevue),
            "moy_reelle" => AttrValue::Number(self.moy_reelle),
            "ecart_moyen" => AttrValue::Number(self.moy_reelle - self.moy_prevue),
            _ => return None,
        };
        Some(value)
    }

    /// Dimension value by lower-cased name, for grouping.
    /// Measures are never valid grouping attributes.
    pub fn dimension(&self, name: &str) -> Option<&str> {
        match self.attribute(name)? {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }
}

/// The immutable fact table. Built once, then lent read-only to each
/// query invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactStore {
    records: Vec<FactRecord>,
}

impl FactStore {
    pub fn from_records(records: Vec<FactRecord>) -> Self {
        FactStore { records }
    }

    pub fn records(&self) -> &[FactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total order count across the whole table (`Σ nombre_commandes`).
    pub fn total_orders(&self) -> u64 {
        self.records
            .iter()
            .map(|r| u64::from(r.nombre_commandes))
            .sum()
    }
}
