use serde::Serialize;

use crate::pricing::{ResolvedProcedure, round_to};

/// Which side of a comparison has the strictly lower total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cheaper {
    A,
    B,
    /// Equal totals, including two empty sides. No savings either way.
    Equal,
}

impl Cheaper {
    #[cfg(test)]
    pub fn swapped(self) -> Self {
        match self {
            Cheaper::A => Cheaper::B,
            Cheaper::B => Cheaper::A,
            Cheaper::Equal => Cheaper::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SideTotals {
    pub total_estimate: f64,
    pub procedure_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Savings {
    /// `total_a - total_b`; negative when A is cheaper.
    pub difference: f64,
    pub amount: f64,
    /// `amount` as a share of the larger total, in percent.
    pub percentage: f64,
    pub cheaper: Cheaper,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub a: SideTotals,
    pub b: SideTotals,
    pub savings: Savings,
}

pub fn totals(procedures: &[ResolvedProcedure]) -> SideTotals {
    let sum: f64 = procedures.iter().map(|p| p.pricing.estimate).sum();
    SideTotals {
        total_estimate: round_to(sum, 2),
        procedure_count: procedures.len(),
    }
}

pub fn compare(a: &[ResolvedProcedure], b: &[ResolvedProcedure]) -> Comparison {
    let a = totals(a);
    let b = totals(b);

    let difference = round_to(a.total_estimate - b.total_estimate, 2);
    let amount = difference.abs();
    let larger = a.total_estimate.max(b.total_estimate);
    let percentage = if larger > 0.0 {
        round_to(amount / larger * 100.0, 1)
    } else {
        0.0
    };
    let cheaper = if a.total_estimate < b.total_estimate {
        Cheaper::A
    } else if b.total_estimate < a.total_estimate {
        Cheaper::B
    } else {
        Cheaper::Equal
    };

    Comparison {
        a,
        b,
        savings: Savings {
            difference,
            amount,
            percentage,
            cheaper,
        },
    }
}

/// `$1,234.50` style rendering for savings messages.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disclosure::CodeKind;
    use crate::pricing::Pricing;

    fn procedure(code: &'static str, estimate: f64) -> ResolvedProcedure {
        ResolvedProcedure {
            code,
            name: "test",
            code_type: CodeKind::Cpt,
            description: None,
            pricing: Pricing {
                min: estimate,
                max: estimate,
                estimate,
                setting: "outpatient".to_string(),
            },
        }
    }

    #[test]
    fn b_cheaper_by_a_quarter() {
        let a = [procedure("927", 600.0), procedure("928", 400.0)];
        let b = [procedure("927", 750.0)];
        let cmp = compare(&a, &b);
        assert_eq!(cmp.a.total_estimate, 1000.0);
        assert_eq!(cmp.a.procedure_count, 2);
        assert_eq!(cmp.b.total_estimate, 750.0);
        assert_eq!(cmp.savings.difference, 250.0);
        assert_eq!(cmp.savings.amount, 250.0);
        assert_eq!(cmp.savings.percentage, 25.0);
        assert_eq!(cmp.savings.cheaper, Cheaper::B);
    }

    #[test]
    fn percentage_uses_larger_side() {
        let cmp = compare(&[procedure("1", 750.0)], &[procedure("1", 1000.0)]);
        assert_eq!(cmp.savings.difference, -250.0);
        assert_eq!(cmp.savings.percentage, 25.0);
        assert_eq!(cmp.savings.cheaper, Cheaper::A);
    }

    #[test]
    fn both_empty_is_an_even_zero() {
        let cmp = compare(&[], &[]);
        assert_eq!(cmp.a.total_estimate, 0.0);
        assert_eq!(cmp.b.total_estimate, 0.0);
        assert_eq!(cmp.savings.amount, 0.0);
        assert_eq!(cmp.savings.percentage, 0.0);
        assert_eq!(cmp.savings.cheaper, Cheaper::Equal);
    }

    #[test]
    fn one_empty_side_is_full_savings() {
        let cmp = compare(&[], &[procedure("463", 1234.5)]);
        assert_eq!(cmp.savings.amount, 1234.5);
        assert_eq!(cmp.savings.percentage, 100.0);
        assert_eq!(cmp.savings.cheaper, Cheaper::A);
    }

    #[test]
    fn swapping_sides_negates_difference_only() {
        let sides: [&[ResolvedProcedure]; 4] = [
            &[],
            &[procedure("1", 19.99)],
            &[procedure("1", 333.33), procedure("2", 0.01)],
            &[procedure("1", 19.99)],
        ];
        for a in sides {
            for b in sides {
                let ab = compare(a, b);
                let ba = compare(b, a);
                assert_eq!(ab.savings.difference, -ba.savings.difference);
                assert_eq!(ab.savings.amount, ba.savings.amount);
                assert_eq!(ab.savings.percentage, ba.savings.percentage);
                assert_eq!(ab.savings.cheaper, ba.savings.cheaper.swapped());
                assert_eq!(ab.a, ba.b);
            }
        }
    }

    #[test]
    fn compare_is_idempotent() {
        let a = [procedure("1", 10.1), procedure("2", 20.2)];
        let b = [procedure("1", 30.3)];
        let first = serde_json::to_string(&compare(&a, &b)).unwrap();
        let second = serde_json::to_string(&compare(&a, &b)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(250.0), "$250.00");
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_usd(-99.999), "-$100.00");
    }
}
