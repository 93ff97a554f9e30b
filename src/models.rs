//! Core data models used throughout Price Machine.
//!
//! These types represent the price-list rows and column mappings that flow
//! through the ingestion and ranking pipeline.

use serde::Serialize;

/// One of the three canonical columns every ingestible price list must expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Product,
    Price,
    Weight,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 3] = [ColumnRole::Product, ColumnRole::Price, ColumnRole::Weight];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Product => "product",
            ColumnRole::Price => "price",
            ColumnRole::Weight => "weight",
        }
    }
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positional column indices resolved from one file's header row.
///
/// Produced once per file and consumed as plain indices during ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub product: Option<usize>,
    pub price: Option<usize>,
    pub weight: Option<usize>,
}

impl ColumnMapping {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::Product => self.product,
            ColumnRole::Price => self.price,
            ColumnRole::Weight => self.weight,
        }
    }

    pub(crate) fn set(&mut self, role: ColumnRole, index: usize) {
        match role {
            ColumnRole::Product => self.product = Some(index),
            ColumnRole::Price => self.price = Some(index),
            ColumnRole::Weight => self.weight = Some(index),
        }
    }

    /// Roles with no matching header.
    pub fn missing(&self) -> Vec<ColumnRole> {
        ColumnRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    /// All three indices, or `None` if any role is absent.
    pub fn complete(&self) -> Option<ResolvedColumns> {
        Some(ResolvedColumns {
            product: self.product?,
            price: self.price?,
            weight: self.weight?,
        })
    }
}

/// A [`ColumnMapping`] with every role present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub product: usize,
    pub price: usize,
    pub weight: usize,
}

/// One priced row from one source file.
///
/// `unit_price` is derived at construction and `rank` is assigned by the
/// catalog after the merged collection is sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    product: String,
    price: f64,
    weight: f64,
    source_file: String,
    unit_price: f64,
    rank: usize,
}

impl Record {
    /// Build a record, deriving the price per kilogram.
    ///
    /// Only a strictly positive weight triggers division; anything else
    /// yields a unit price of zero.
    pub fn new(
        product: impl Into<String>,
        price: f64,
        weight: f64,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            price,
            weight,
            source_file: source_file.into(),
            unit_price: unit_price(price, weight),
            rank: 0,
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Weight in kilograms.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Price per kilogram.
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// 1-based position in the last loaded catalog; `0` before ranking.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub(crate) fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }
}

pub fn unit_price(price: f64, weight: f64) -> f64 {
    if weight > 0.0 {
        price / weight
    } else {
        0.0
    }
}
