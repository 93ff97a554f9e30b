//! Header synonym resolution.
//!
//! Suppliers name their columns differently. Each canonical role has a
//! fixed vocabulary of recognised labels; a file's header row is scanned
//! once and the first label matching a role's vocabulary claims that role.

use crate::config::SynonymsConfig;
use crate::models::{ColumnMapping, ColumnRole};

pub const PRODUCT_SYNONYMS: &[&str] = &["товар", "название", "наименование", "продукт"];
pub const PRICE_SYNONYMS: &[&str] = &["цена", "розница"];
pub const WEIGHT_SYNONYMS: &[&str] = &["вес", "масса", "фасовка"];

/// Lowercased label vocabularies per role.
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    product: Vec<String>,
    price: Vec<String>,
    weight: Vec<String>,
}

impl Default for HeaderResolver {
    fn default() -> Self {
        Self {
            product: lowercase_all(PRODUCT_SYNONYMS.iter().copied()),
            price: lowercase_all(PRICE_SYNONYMS.iter().copied()),
            weight: lowercase_all(WEIGHT_SYNONYMS.iter().copied()),
        }
    }
}

impl HeaderResolver {
    /// The fixed vocabulary extended with labels from `[synonyms]`.
    pub fn with_extra(extra: &SynonymsConfig) -> Self {
        let mut resolver = Self::default();
        extend_unique(&mut resolver.product, &extra.product);
        extend_unique(&mut resolver.price, &extra.price);
        extend_unique(&mut resolver.weight, &extra.weight);
        resolver
    }

    pub fn synonyms(&self, role: ColumnRole) -> &[String] {
        match role {
            ColumnRole::Product => &self.product,
            ColumnRole::Price => &self.price,
            ColumnRole::Weight => &self.weight,
        }
    }

    /// Role recognised for a single label, if any.
    ///
    /// Matching is exact up to case; only a leading byte-order mark is dropped.
    pub fn role_of(&self, label: &str) -> Option<ColumnRole> {
        let label = label.trim_start_matches('\u{feff}').to_lowercase();
        ColumnRole::ALL
            .into_iter()
            .find(|role| self.synonyms(*role).iter().any(|s| *s == label))
    }

    /// Map a header row to column indices. Labels matching no role are ignored.
    pub fn resolve<I, S>(&self, headers: I) -> ColumnMapping
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mapping = ColumnMapping::default();
        for (index, label) in headers.into_iter().enumerate() {
            if let Some(role) = self.role_of(label.as_ref()) {
                if mapping.get(role).is_none() {
                    mapping.set(role, index);
                }
            }
        }
        mapping
    }
}

fn lowercase_all<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    labels.map(|l| l.to_lowercase()).collect()
}

fn extend_unique(target: &mut Vec<String>, extra: &[String]) {
    for label in lowercase_all(extra.iter().map(String::as_str)) {
        if !target.contains(&label) {
            target.push(label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_synonym_resolves_in_any_case() {
        let resolver = HeaderResolver::default();
        let cases = [
            (PRODUCT_SYNONYMS, ColumnRole::Product),
            (PRICE_SYNONYMS, ColumnRole::Price),
            (WEIGHT_SYNONYMS, ColumnRole::Weight),
        ];
        for (labels, role) in cases {
            for label in labels {
                assert_eq!(resolver.role_of(label), Some(role), "{}", label);
                assert_eq!(resolver.role_of(&label.to_uppercase()), Some(role));
            }
        }
    }

    #[test]
    fn unknown_label_has_no_role() {
        let resolver = HeaderResolver::default();
        assert_eq!(resolver.role_of("артикул"), None);
        assert_eq!(resolver.role_of("цена за кг"), None);
        assert_eq!(resolver.role_of(""), None);
    }

    #[test]
    fn first_matching_header_wins() {
        let resolver = HeaderResolver::default();
        let mapping = resolver.resolve(["№", "товар", "розница", "наименование", "цена", "вес"]);
        assert_eq!(mapping.product, Some(1));
        assert_eq!(mapping.price, Some(2));
        assert_eq!(mapping.weight, Some(5));
    }

    #[test]
    fn partial_mapping_is_represented() {
        let resolver = HeaderResolver::default();
        let mapping = resolver.resolve(["Название", "Цена"]);
        assert_eq!(mapping.product, Some(0));
        assert_eq!(mapping.price, Some(1));
        assert_eq!(mapping.weight, None);
        assert!(mapping.complete().is_none());
    }

    #[test]
    fn padded_label_is_not_a_synonym() {
        let resolver = HeaderResolver::default();
        assert_eq!(resolver.role_of(" вес "), None);
        let mapping = resolver.resolve([" Продукт ", "Цена", "Масса"]);
        assert_eq!(mapping.product, None);
        assert_eq!(mapping.weight, Some(2));
    }

    #[test]
    fn leading_bom_is_dropped() {
        let resolver = HeaderResolver::default();
        assert_eq!(resolver.role_of("\u{feff}Товар"), Some(ColumnRole::Product));
    }

    #[test]
    fn extra_synonyms_extend_vocabulary() {
        let extra = SynonymsConfig {
            product: vec!["Product".to_string()],
            price: vec!["PRICE".to_string(), "цена".to_string()],
            weight: vec![],
        };
        let resolver = HeaderResolver::with_extra(&extra);
        assert_eq!(resolver.role_of("product"), Some(ColumnRole::Product));
        assert_eq!(resolver.role_of("Price"), Some(ColumnRole::Price));
        assert_eq!(resolver.role_of("розница"), Some(ColumnRole::Price));
        assert_eq!(
            resolver.synonyms(ColumnRole::Price).len(),
            PRICE_SYNONYMS.len() + 1
        );
    }
}
