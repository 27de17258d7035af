use std::collections::BTreeMap;

use anyhow::Context;
use serde::Serialize;

use crate::catalog::WoundCategory;
use crate::cli::CompareArgs;
use crate::compare::{Cheaper, compare, format_usd};
use crate::hospital::HospitalId;
use crate::index::PriceBook;
use crate::pricing::{ResolvedProcedure, resolve};

#[derive(Debug, Serialize)]
pub struct PricingReport {
    pub wound_type: WoundCategory,
    pub procedures: Vec<ResolvedProcedure>,
    pub hospital_id: HospitalId,
    pub hospital: &'static str,
    pub location: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HospitalQuote {
    pub hospital_id: HospitalId,
    pub hospital: &'static str,
    pub location: &'static str,
    pub procedures: Vec<ResolvedProcedure>,
    pub total_estimate: f64,
    pub procedure_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SavingsReport {
    pub amount: f64,
    pub difference: f64,
    pub percentage: f64,
    /// Display name of the cheaper hospital; `None` when the totals are equal.
    pub cheaper_hospital: Option<&'static str>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub wound_type: WoundCategory,
    pub comparison: [HospitalQuote; 2],
    pub savings: SavingsReport,
}

#[derive(Debug, Serialize)]
pub struct WoundTypesReport {
    pub supported_wound_types: Vec<WoundCategory>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HospitalHealth {
    pub name: &'static str,
    pub procedures_loaded: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub hospitals: BTreeMap<&'static str, HospitalHealth>,
    pub wound_types: usize,
    pub comparison_available: bool,
}

pub fn pricing(book: &PriceBook, hospital: HospitalId, wound: WoundCategory) -> PricingReport {
    let procedures = resolve(book.index(hospital), wound);
    PricingReport {
        wound_type: wound,
        count: procedures.len(),
        procedures,
        hospital_id: hospital,
        hospital: hospital.display_name(),
        location: hospital.location(),
    }
}

pub fn comparison(
    book: &PriceBook,
    wound: WoundCategory,
    a: HospitalId,
    b: HospitalId,
) -> ComparisonReport {
    let procedures_a = resolve(book.index(a), wound);
    let procedures_b = resolve(book.index(b), wound);
    let cmp = compare(&procedures_a, &procedures_b);

    let cheaper_hospital = match cmp.savings.cheaper {
        Cheaper::A => Some(a.display_name()),
        Cheaper::B => Some(b.display_name()),
        Cheaper::Equal => None,
    };
    let message = match cheaper_hospital {
        Some(name) => format!(
            "Save {} ({:.1}%) at {}!",
            format_usd(cmp.savings.amount),
            cmp.savings.percentage,
            name
        ),
        None => format!(
            "No savings: both hospitals estimate {}",
            format_usd(cmp.a.total_estimate)
        ),
    };

    let quote = |hospital: HospitalId, procedures: Vec<ResolvedProcedure>, total: f64| {
        HospitalQuote {
            hospital_id: hospital,
            hospital: hospital.display_name(),
            location: hospital.location(),
            procedure_count: procedures.len(),
            procedures,
            total_estimate: total,
        }
    };

    ComparisonReport {
        wound_type: wound,
        comparison: [
            quote(a, procedures_a, cmp.a.total_estimate),
            quote(b, procedures_b, cmp.b.total_estimate),
        ],
        savings: SavingsReport {
            amount: cmp.savings.amount,
            difference: cmp.savings.difference,
            percentage: cmp.savings.percentage,
            cheaper_hospital,
            message,
        },
    }
}

pub fn wound_types() -> WoundTypesReport {
    WoundTypesReport {
        supported_wound_types: WoundCategory::ALL.to_vec(),
        count: WoundCategory::ALL.len(),
    }
}

pub fn health(book: &PriceBook) -> HealthReport {
    let hospitals = HospitalId::ALL
        .into_iter()
        .map(|h| {
            (
                h.as_str(),
                HospitalHealth {
                    name: h.display_name(),
                    procedures_loaded: book.procedures_loaded(h),
                },
            )
        })
        .collect();
    HealthReport {
        status: "healthy",
        hospitals,
        wound_types: WoundCategory::ALL.len(),
        comparison_available: true,
    }
}

/// Prints one comparison as JSON without starting the server.
pub fn run(opts: CompareArgs) -> anyhow::Result<()> {
    let wound = WoundCategory::from_label_lenient(&opts.wound_type)?;
    let a: HospitalId = opts.a.parse()?;
    let b: HospitalId = opts.b.parse()?;

    let book = PriceBook::load(&opts.data.storage_paths());
    let report = comparison(&book, wound, a, b);
    let json = serde_json::to_string_pretty(&report).context("serialize comparison")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disclosure::{Layout, read_index};

    fn book() -> PriceBook {
        let barnes = "meta\nmeta\n\
            code|1,setting,standard_charge|min,standard_charge|max\n\
            927,inpatient,40000,60000\n\
            97597,outpatient,100,300\n";
        let lincoln = "meta\nmeta\n\
            code|1,code|1|type,code|2,code|2|type,setting,standard_charge|gross,standard_charge|discounted_cash\n\
            927,DRG,,,inpatient,42000,30000\n\
            ,,97597,CPT,outpatient,500,350\n";
        let (barnes, _) = read_index(barnes.as_bytes(), Layout::SingleCode).unwrap();
        let (lincoln, _) = read_index(lincoln.as_bytes(), Layout::DualCode).unwrap();
        PriceBook::from_indices([
            (HospitalId::BarnesJewish, barnes),
            (HospitalId::Lincoln, lincoln),
        ])
    }

    #[test]
    fn pricing_report_names_the_hospital() {
        let report = pricing(&book(), HospitalId::BarnesJewish, WoundCategory::Abrasion);
        assert_eq!(report.hospital, "Barnes Jewish St. Peters Hospital");
        assert_eq!(report.location, "St. Peters, MO");
        assert_eq!(report.count, 1);
        assert_eq!(report.procedures[0].pricing.estimate, 200.0);
    }

    #[test]
    fn comparison_report_picks_cheaper_hospital() {
        let report = comparison(
            &book(),
            WoundCategory::Burn,
            HospitalId::BarnesJewish,
            HospitalId::Lincoln,
        );
        assert_eq!(report.comparison[0].total_estimate, 50000.0);
        assert_eq!(report.comparison[1].total_estimate, 36000.0);
        assert_eq!(report.savings.amount, 14000.0);
        assert_eq!(report.savings.percentage, 28.0);
        assert_eq!(report.savings.cheaper_hospital, Some("Mercy Hospital Lincoln"));
        assert_eq!(
            report.savings.message,
            "Save $14,000.00 (28.0%) at Mercy Hospital Lincoln!"
        );
    }

    #[test]
    fn equal_totals_report_no_savings() {
        let report = comparison(
            &book(),
            WoundCategory::Laceration,
            HospitalId::BarnesJewish,
            HospitalId::Lincoln,
        );
        assert_eq!(report.comparison[0].procedure_count, 0);
        assert_eq!(report.savings.percentage, 0.0);
        assert_eq!(report.savings.cheaper_hospital, None);
        assert_eq!(report.savings.message, "No savings: both hospitals estimate $0.00");
    }

    #[test]
    fn health_counts_loaded_procedures() {
        let report = health(&book());
        assert_eq!(report.hospitals["barnes_jewish"].procedures_loaded, 2);
        assert_eq!(report.hospitals["lincoln"].procedures_loaded, 2);
        assert_eq!(report.wound_types, 8);
    }

    #[test]
    fn wound_types_follow_catalog_order() {
        let json = serde_json::to_value(wound_types()).unwrap();
        assert_eq!(json["count"], 8);
        assert_eq!(json["supported_wound_types"][0], "Abrasion");
        assert_eq!(json["supported_wound_types"][6], "Foot-ulcer");
    }
}
