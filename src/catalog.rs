use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A billing code the catalog proposes for a wound category, with the name shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcedureCandidate {
    pub code: &'static str,
    pub name: &'static str,
}

const fn candidate(code: &'static str, name: &'static str) -> ProcedureCandidate {
    ProcedureCandidate { code, name }
}

const ABRASION: &[ProcedureCandidate] = &[
    candidate("97597", "Wound debridement"),
    candidate("70450", "CT imaging for assessment"),
];

const BRUISE: &[ProcedureCandidate] = &[
    candidate("70450", "CT imaging"),
    candidate("73000", "X-Ray - Clavicle/shoulder"),
];

const BURN: &[ProcedureCandidate] = &[
    candidate("927", "Extensive Burns Or Full Thickness Burns"),
    candidate("928", "Full Thickness Burn With Skin Graft"),
    candidate("465", "Wound Debridement And Skin Graft"),
];

const CUT: &[ProcedureCandidate] = &[
    candidate("12001", "Simple Repair - Scalp/Neck"),
    candidate("463", "Wound Debridement And Skin Graft"),
];

const INGROWN_NAIL: &[ProcedureCandidate] = &[
    candidate("15851", "Removal Sutures/Staples"),
    candidate("97597", "Wound debridement"),
];

const STAB_WOUND: &[ProcedureCandidate] = &[
    candidate("99281", "ED Level 1 - Emergency Visit"),
    candidate("463", "Wound Debridement And Surgical Repair"),
    candidate("70450", "CT imaging for internal assessment"),
];

const FOOT_ULCER: &[ProcedureCandidate] = &[
    candidate("463", "Wound Debridement"),
    candidate("97597", "Debridement Open Wound"),
    candidate("97598", "Debridement Additional Areas"),
];

const LACERATION: &[ProcedureCandidate] = &[
    candidate("12001", "Simple Repair (<2.5cm)"),
    candidate("12032", "Intermediate Repair (2.6-7.5cm)"),
    candidate("13121", "Complex Repair - Scalp/Extremities"),
    candidate("13132", "Complex Repair - Face/Neck"),
];

/// Wound labels emitted by the classifier. The string form of each variant is the exact label
/// the classifier produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WoundCategory {
    Abrasion,
    Bruise,
    Burn,
    Cut,
    IngrownNail,
    StabWound,
    FootUlcer,
    Laceration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown wound: {0}")]
pub struct UnknownWoundCategory(pub String);

impl WoundCategory {
    /// Catalog order. Listing endpoints report categories in this order.
    pub const ALL: [WoundCategory; 8] = [
        WoundCategory::Abrasion,
        WoundCategory::Bruise,
        WoundCategory::Burn,
        WoundCategory::Cut,
        WoundCategory::IngrownNail,
        WoundCategory::StabWound,
        WoundCategory::FootUlcer,
        WoundCategory::Laceration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WoundCategory::Abrasion => "Abrasion",
            WoundCategory::Bruise => "Bruise",
            WoundCategory::Burn => "Burn",
            WoundCategory::Cut => "Cut",
            WoundCategory::IngrownNail => "Ingrown_nail",
            WoundCategory::StabWound => "Stab_wound",
            WoundCategory::FootUlcer => "Foot-ulcer",
            WoundCategory::Laceration => "Laceration",
        }
    }

    /// Candidate procedures in clinical priority order.
    pub fn candidates(self) -> &'static [ProcedureCandidate] {
        match self {
            WoundCategory::Abrasion => ABRASION,
            WoundCategory::Bruise => BRUISE,
            WoundCategory::Burn => BURN,
            WoundCategory::Cut => CUT,
            WoundCategory::IngrownNail => INGROWN_NAIL,
            WoundCategory::StabWound => STAB_WOUND,
            WoundCategory::FootUlcer => FOOT_ULCER,
            WoundCategory::Laceration => LACERATION,
        }
    }

    /// Matches classifier output that drifted in case or separator (`foot_ulcer`,
    /// `STAB WOUND`). Use at the request boundary; `FromStr` stays exact.
    pub fn from_label_lenient(label: &str) -> Result<Self, UnknownWoundCategory> {
        let wanted = fold_label(label);
        if wanted.is_empty() {
            return Err(UnknownWoundCategory(label.trim().to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|c| fold_label(c.label()) == wanted)
            .ok_or_else(|| UnknownWoundCategory(label.trim().to_string()))
    }
}

fn fold_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

impl FromStr for WoundCategory {
    type Err = UnknownWoundCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownWoundCategory(s.to_string()))
    }
}

impl fmt::Display for WoundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for WoundCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn exact_labels_round_trip_through_from_str() {
        for category in WoundCategory::ALL {
            assert_eq!(category.label().parse::<WoundCategory>(), Ok(category));
        }
    }

    #[test]
    fn from_str_is_case_sensitive() {
        assert!("burn".parse::<WoundCategory>().is_err());
        assert!("Foot_ulcer".parse::<WoundCategory>().is_err());
    }

    #[test]
    fn lenient_lookup_folds_case_and_separators() {
        assert_eq!(
            WoundCategory::from_label_lenient("Foot_ulcer"),
            Ok(WoundCategory::FootUlcer)
        );
        assert_eq!(
            WoundCategory::from_label_lenient("  stab wound "),
            Ok(WoundCategory::StabWound)
        );
        assert_eq!(
            WoundCategory::from_label_lenient("INGROWN-NAIL"),
            Ok(WoundCategory::IngrownNail)
        );
        assert_eq!(
            WoundCategory::from_label_lenient("Bruises"),
            Err(UnknownWoundCategory("Bruises".to_string()))
        );
        assert!(WoundCategory::from_label_lenient("   ").is_err());
    }

    #[test]
    fn every_category_has_unique_non_empty_candidates() {
        for category in WoundCategory::ALL {
            let candidates = category.candidates();
            assert!(!candidates.is_empty(), "{category} has no candidates");
            let codes: HashSet<_> = candidates.iter().map(|c| c.code).collect();
            assert_eq!(codes.len(), candidates.len(), "{category} repeats a code");
        }
    }

    #[test]
    fn catalog_order_is_preserved() {
        let codes: Vec<_> = WoundCategory::Laceration
            .candidates()
            .iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, ["12001", "12032", "13121", "13132"]);
    }

    #[test]
    fn candidate_lists_are_static() {
        let lists: [&'static [ProcedureCandidate]; 8] =
            WoundCategory::ALL.map(WoundCategory::candidates);
        assert_eq!(
            lists[2][0],
            candidate("927", "Extensive Burns Or Full Thickness Burns")
        );
        assert_eq!(lists.iter().map(|l| l.len()).sum::<usize>(), 21);
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&WoundCategory::FootUlcer).unwrap();
        assert_eq!(json, "\"Foot-ulcer\"");
    }
}
