//! Product category enum.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid category: {0} (expected Food, Devices, Games or Books)")]
pub struct CategoryError(pub String);

/// Product category.
///
/// The catalog is partitioned into a fixed set of departments; stored as the
/// variant name in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
pub enum Category {
    Food,
    Devices,
    Games,
    Books,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [Self::Food, Self::Devices, Self::Games, Self::Books];

    /// The category name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Devices => "Devices",
            Self::Games => "Games",
            Self::Books => "Books",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Self::Food),
            "Devices" => Ok(Self::Devices),
            "Games" => Ok(Self::Games),
            "Books" => Ok(Self::Books),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("Gadgets".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_variant_name() {
        assert_eq!(
            serde_json::to_string(&Category::Devices).unwrap(),
            "\"Devices\""
        );
    }
}
