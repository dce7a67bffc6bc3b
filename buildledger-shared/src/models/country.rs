/// Country (branch) partition key
///
/// Every record belongs to exactly one country. The country decides which file
/// partition (file mode) or which `country = $n` predicate (remote mode) a
/// record lives under, and it never changes after creation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Recognised branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Egypt,
    Libya,
}

impl Country {
    /// All partitions, in a stable order
    pub const ALL: [Country; 2] = [Country::Egypt, Country::Libya];

    /// Converts country to its storage/wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Egypt => "egypt",
            Country::Libya => "libya",
        }
    }

    /// Parses a user-supplied value
    ///
    /// Surrounding whitespace and letter case are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidCountry` for anything other than the two
    /// recognised branches.
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "egypt" => Ok(Country::Egypt),
            "libya" => Ok(Country::Libya),
            _ => Err(StoreError::InvalidCountry(value.to_string())),
        }
    }
}

impl FromStr for Country {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::parse(s)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_as_str() {
        assert_eq!(Country::Egypt.as_str(), "egypt");
        assert_eq!(Country::Libya.as_str(), "libya");
    }

    #[test]
    fn test_country_parse() {
        assert_eq!(Country::parse("egypt").unwrap(), Country::Egypt);
        assert_eq!(Country::parse(" Libya ").unwrap(), Country::Libya);
        assert!(matches!(
            Country::parse("tunisia"),
            Err(StoreError::InvalidCountry(c)) if c == "tunisia"
        ));
        assert!(Country::parse("").is_err());
    }

    #[test]
    fn test_country_serde() {
        assert_eq!(serde_json::to_string(&Country::Libya).unwrap(), "\"libya\"");
        let c: Country = serde_json::from_str("\"egypt\"").unwrap();
        assert_eq!(c, Country::Egypt);
        assert!(serde_json::from_str::<Country>("\"EGYPT\"").is_err());
    }
}
