use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::disclosure::Layout;

/// Hospitals whose disclosure files the service knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HospitalId {
    BarnesJewish,
    Lincoln,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown hospital: {0}")]
pub struct UnknownHospital(pub String);

impl HospitalId {
    pub const ALL: [HospitalId; 2] = [HospitalId::BarnesJewish, HospitalId::Lincoln];

    pub fn as_str(self) -> &'static str {
        match self {
            HospitalId::BarnesJewish => "barnes_jewish",
            HospitalId::Lincoln => "lincoln",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HospitalId::BarnesJewish => "Barnes Jewish St. Peters Hospital",
            HospitalId::Lincoln => "Mercy Hospital Lincoln",
        }
    }

    pub fn location(self) -> &'static str {
        match self {
            HospitalId::BarnesJewish => "St. Peters, MO",
            HospitalId::Lincoln => "Troy, MO",
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            HospitalId::BarnesJewish => Layout::SingleCode,
            HospitalId::Lincoln => Layout::DualCode,
        }
    }

    /// File name looked up under the data directory when no explicit path is given.
    pub fn default_file_name(self) -> &'static str {
        match self {
            HospitalId::BarnesJewish => "barnes_procedures.csv",
            HospitalId::Lincoln => "lincoln_procedures.csv",
        }
    }
}

impl FromStr for HospitalId {
    type Err = UnknownHospital;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|h| h.as_str() == wanted)
            .ok_or_else(|| UnknownHospital(s.trim().to_string()))
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HospitalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ids() {
        assert_eq!("barnes_jewish".parse(), Ok(HospitalId::BarnesJewish));
        assert_eq!(" Lincoln ".parse(), Ok(HospitalId::Lincoln));
        assert_eq!(
            "mayo".parse::<HospitalId>(),
            Err(UnknownHospital("mayo".to_string()))
        );
    }

    #[test]
    fn layouts_match_published_files() {
        assert_eq!(HospitalId::BarnesJewish.layout(), Layout::SingleCode);
        assert_eq!(HospitalId::Lincoln.layout(), Layout::DualCode);
    }
}
