//! FILENAME: core/olap-engine/src/hierarchy.rs
//! Dimension Hierarchy Resolver.
//!
//! Translates a per-axis level token (`"year+month"`,
//! `"pays+client"`, ...) into the ordered list of grouping attributes
//! for that axis. Tokens are matched after trimming and ASCII
//! lower-casing; the employee axis is conventionally sent upper-cased
//! by older clients (`DEPARTEMENT+EMPLOYE`).
//!
//! Unknown tokens resolve to the empty list, which degrades that axis
//! to "ALL" instead of failing the whole query.

/// One of the four independent dimensions a query can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Time,
    Client,
    Employee,
    Product,
}

/// Fixed axis order for composite group keys: time, client,
/// employee, product.
pub const AXES: [Axis; 4] = [Axis::Time, Axis::Client, Axis::Employee, Axis::Product];

/// Resolves a level token into the ordered grouping attributes for
/// one axis. Pure function of (axis, token); possibly empty.
pub fn resolve(axis: Axis, level_token: &str) -> &'static [&'static str] {
    let token = level_token.trim().to_ascii_lowercase();
    match axis {
        Axis::Time => match token.as_str() {
            "year" => &["year"],
            "year+saison" => &["year", "saison"],
            // A month is only unique within its year.
            "year+month" => &["year", "month"],
            _ => &[],
        },
        Axis::Client => match token.as_str() {
            "pays" => &["pays"],
            "pays+client" => &["pays", "client"],
            _ => &[],
        },
        Axis::Employee => match token.as_str() {
            "departement" => &["departement"],
            "departement+employe" => &["departement", "employe"],
            // Direct fine-grain access, skipping the department level.
            "employe" => &["employe"],
            _ => &[],
        },
        Axis::Product => match token.as_str() {
            "categorie" => &["categorie"],
            "categorie+produit" => &["categorie", "produit"],
            "fournisseur" => &["fournisseur"],
            "fournisseur+produit" => &["fournisseur", "produit"],
            "categorie+produit+fournisseur" => &["categorie", "produit", "fournisseur"],
            _ => &[],
        },
    }
}

/// Whether a token asks for grouping at all. Drives the
/// `dimension_count` metadata: an unknown token still counts as a
/// grouped axis even though it resolves to no attributes.
pub fn is_grouped(level_token: &str) -> bool {
    let token = level_token.trim();
    !token.is_empty() && !token.eq_ignore_ascii_case("all")
}
