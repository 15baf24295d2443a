use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Label outside the closed category set. Rendered without a prefix so the
/// tool surface can encode it as `"Error: Invalid category '...'."`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid category '{0}'.")]
pub struct UnknownCategory(pub String);

/// The closed set of user-facing deal categories.
///
/// Both `segment` and `fallback_deal` are total over the enum, so every
/// resolvable category has a catalog segment and a static fallback by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Meat,
    Snacks,
    Vegetables,
    Dairy,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Meat,
        Category::Snacks,
        Category::Vegetables,
        Category::Dairy,
    ];

    /// User-facing label, also the accepted `FromStr` spelling.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Meat => "meat",
            Category::Snacks => "snacks",
            Category::Vegetables => "vegetables",
            Category::Dairy => "dairy",
        }
    }

    /// Internal identifier the deals table uses in `category_level_1`.
    pub fn segment(&self) -> &'static str {
        match self {
            Category::Meat => "fleischUndGefluegel",
            Category::Snacks => "snacks",
            Category::Vegetables => "Obst, Gemüse",
            Category::Dairy => "milchprodukte",
        }
    }

    /// Static deal description used when the store has no row for the
    /// category or is unreachable. Constant for the process lifetime.
    pub fn fallback_deal(&self) -> &'static str {
        match self {
            Category::Meat => "Chicken breast at 5.99 EUR/kg",
            Category::Snacks => "Chips at 1.49 EUR/bag",
            Category::Vegetables => "Cucumbers at 0.49 EUR each",
            Category::Dairy => "Milk at 0.89 EUR/liter",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meat" => Ok(Category::Meat),
            "snacks" => Ok(Category::Snacks),
            "vegetables" => Ok(Category::Vegetables),
            "dairy" => Ok(Category::Dairy),
            _ => Err(UnknownCategory(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_in_the_closed_set_resolves() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn resolution_ignores_case_and_whitespace() {
        assert_eq!("  Meat ".parse::<Category>(), Ok(Category::Meat));
        assert_eq!("SNACKS".parse::<Category>(), Ok(Category::Snacks));
    }

    #[test]
    fn unknown_labels_are_rejected_not_defaulted() {
        let err = "frozen goods".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("frozen goods".to_string()));
        assert_eq!(err.to_string(), "Invalid category 'frozen goods'.");
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn segments_match_the_catalog() {
        assert_eq!(Category::Meat.segment(), "fleischUndGefluegel");
        assert_eq!(Category::Snacks.segment(), "snacks");
        assert_eq!(Category::Vegetables.segment(), "Obst, Gemüse");
        assert_eq!(Category::Dairy.segment(), "milchprodukte");
    }

    #[test]
    fn every_category_has_a_fallback_deal() {
        for category in Category::ALL {
            assert!(!category.fallback_deal().is_empty());
        }
    }
}
