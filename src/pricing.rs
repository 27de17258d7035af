use serde::Serialize;

use crate::catalog::WoundCategory;
use crate::disclosure::CodeKind;
use crate::index::PriceIndex;

pub const UNKNOWN_SETTING: &str = "unknown";

/// Charges as published, before the explicit/derived precedence is applied.
///
/// Absent, blank, negative and unparseable cells are all `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PublishedCharges {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub gross: Option<f64>,
    pub discounted_cash: Option<f64>,
}

/// The shape a record's price comes in. A zero or missing value means "no data", never "free".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceBounds {
    Explicit { min: f64, max: f64 },
    GrossDiscounted { gross: f64, discounted_cash: f64 },
    Unpriced,
}

impl PriceBounds {
    pub fn from_charges(charges: PublishedCharges) -> Self {
        let min = charges.min.unwrap_or(0.0);
        let max = charges.max.unwrap_or(0.0);
        if min > 0.0 || max > 0.0 {
            return PriceBounds::Explicit { min, max };
        }
        let gross = charges.gross.unwrap_or(0.0);
        let discounted_cash = charges.discounted_cash.unwrap_or(0.0);
        if gross > 0.0 || discounted_cash > 0.0 {
            return PriceBounds::GrossDiscounted {
                gross,
                discounted_cash,
            };
        }
        PriceBounds::Unpriced
    }

    /// Normalized `{min, max}`, or `None` when the record carries no usable price.
    ///
    /// A lone positive value collapses to `min == max`; its zero partner is missing data.
    pub fn range(&self) -> Option<PriceRange> {
        match *self {
            PriceBounds::Explicit { min, max } => positive_range(min, max),
            PriceBounds::GrossDiscounted {
                gross,
                discounted_cash,
            } => positive_range(gross, discounted_cash),
            PriceBounds::Unpriced => None,
        }
    }
}

fn positive_range(a: f64, b: f64) -> Option<PriceRange> {
    let (min, max) = match (a > 0.0, b > 0.0) {
        (true, true) => (a.min(b), a.max(b)),
        (true, false) => (a, a),
        (false, true) => (b, b),
        (false, false) => return None,
    };
    Some(PriceRange { min, max })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn estimate(&self) -> f64 {
        round_to((self.min + self.max) / 2.0, 2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pricing {
    pub min: f64,
    pub max: f64,
    pub estimate: f64,
    pub setting: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProcedure {
    pub code: &'static str,
    pub name: &'static str,
    pub code_type: CodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pricing: Pricing,
}

/// Prices the category's candidates that this hospital publishes, in catalog order.
///
/// Candidates missing from the index, or present without a usable price, are skipped.
pub fn resolve(index: &PriceIndex, category: WoundCategory) -> Vec<ResolvedProcedure> {
    category
        .candidates()
        .iter()
        .filter_map(|candidate| {
            let record = index.get(candidate.code)?;
            let range = record.bounds.range()?;
            Some(ResolvedProcedure {
                code: candidate.code,
                name: candidate.name,
                code_type: record.code_kind.clone(),
                description: record.description.clone(),
                pricing: Pricing {
                    min: round_to(range.min, 2),
                    max: round_to(range.max, 2),
                    estimate: range.estimate(),
                    setting: record.setting.clone(),
                },
            })
        })
        .collect()
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
