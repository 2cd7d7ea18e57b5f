//! Search categories for the points-of-interest endpoint.

/// One amenity category: what to ask the POI endpoint for, and the
/// prefix under which its columns appear in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmenityCategory {
    /// Free-text search keyword, if the category uses one.
    pub keyword: Option<String>,
    /// Structured place type filter, if the category uses one.
    pub place_type: Option<String>,
    /// Output column prefix (e.g. "toilet" yields `toilet_name`,
    /// `toilet_distance_m`, ...).
    pub column_prefix: String,
}

impl AmenityCategory {
    pub fn new(
        keyword: Option<&str>,
        place_type: Option<&str>,
        column_prefix: &str,
    ) -> Self {
        Self {
            keyword: keyword.map(str::to_string),
            place_type: place_type.map(str::to_string),
            column_prefix: column_prefix.to_string(),
        }
    }

    /// Public toilets, searched by keyword.
    pub fn public_toilets() -> Self {
        Self::new(Some("public toilet"), None, "toilet")
    }

    /// Parks, searched by keyword and place type.
    pub fn parks() -> Self {
        Self::new(Some("park"), Some("park"), "park")
    }

    /// Bars, searched by place type; typically combined with the
    /// open-now filter for a density metric.
    pub fn bars() -> Self {
        Self::new(None, Some("bar"), "open_bars")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_categories_have_distinct_prefixes() {
        let prefixes = [
            AmenityCategory::public_toilets().column_prefix,
            AmenityCategory::parks().column_prefix,
            AmenityCategory::bars().column_prefix,
        ];
        let mut unique = prefixes.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), prefixes.len());
    }
}
