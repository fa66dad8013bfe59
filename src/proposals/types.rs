use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Organizational unit a proposal originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cellule {
    #[serde(rename = "Méthodologie")]
    Methodologie,
    Promotion,
    Investigation,
    Intercellule,
}

impl Cellule {
    pub const ALL: [Cellule; 4] = [
        Cellule::Methodologie,
        Cellule::Promotion,
        Cellule::Investigation,
        Cellule::Intercellule,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Cellule::Methodologie => "Méthodologie",
            Cellule::Promotion => "Promotion",
            Cellule::Investigation => "Investigation",
            Cellule::Intercellule => "Intercellule",
        }
    }

    /// Next value in `ALL`, wrapping around (used by selection widgets).
    pub fn next(self) -> Cellule {
        let idx = Cellule::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Cellule::ALL[(idx + 1) % Cellule::ALL.len()]
    }

    pub fn previous(self) -> Cellule {
        let idx = Cellule::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Cellule::ALL[(idx + Cellule::ALL.len() - 1) % Cellule::ALL.len()]
    }
}

impl fmt::Display for Cellule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cellule {
    type Err = StoreError;

    /// Case-insensitive; "Methodologie" is accepted for keyboards without accents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('é', "e");
        Cellule::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase().replace('é', "e") == wanted)
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "cellule must be one of {}, got '{}'",
                    Cellule::ALL
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    s.trim()
                ))
            })
    }
}

/// A candidate acronym with its expansion and originating cellule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proposal {
    pub acronym: String,
    pub signification: String,
    pub cellule: Cellule,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// Time elapsed since the proposal was added
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_names() {
        for cellule in Cellule::ALL {
            assert_eq!(cellule.as_str().parse::<Cellule>().unwrap(), cellule);
        }
    }

    #[test]
    fn test_parse_is_lenient_on_case_and_accent() {
        assert_eq!("methodologie".parse::<Cellule>().unwrap(), Cellule::Methodologie);
        assert_eq!(" PROMOTION ".parse::<Cellule>().unwrap(), Cellule::Promotion);
    }

    #[test]
    fn test_parse_unknown_is_validation_error() {
        let err = "Marketing".parse::<Cellule>().unwrap_err();
        match err {
            StoreError::Validation(msg) => assert!(msg.contains("Marketing")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_next_and_previous_wrap() {
        assert_eq!(Cellule::Intercellule.next(), Cellule::Methodologie);
        assert_eq!(Cellule::Methodologie.previous(), Cellule::Intercellule);
        assert_eq!(Cellule::Promotion.next(), Cellule::Investigation);
    }

    #[test]
    fn test_serializes_with_accent() {
        let json = serde_json::to_string(&Cellule::Methodologie).unwrap();
        assert_eq!(json, "\"Méthodologie\"");
    }
}
