//! Search filtering
//!
//! The search box keeps two strings: what the user has typed, shown
//! immediately, and the query actually applied to the option list, which
//! catches up once typing pauses.

/// Case-insensitive substring match
pub fn matches(option: &str, query_lower: &str) -> bool {
    option.to_lowercase().contains(query_lower)
}

/// Options containing `query` (case-insensitive), in option-set order
///
/// An empty query matches everything.
pub fn filter_options<'a>(options: &'a [String], query: &str) -> Vec<&'a String> {
    let query_lower = query.to_lowercase();
    options
        .iter()
        .filter(|o| matches(o, &query_lower))
        .collect()
}

/// Typed text and the query currently applied
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Text shown in the search input
    pub typed: String,
    /// Query the displayed options are filtered by
    pub applied: String,
}

impl SearchState {
    /// Replace the typed text, leaving the applied query alone
    pub fn with_typed(self, typed: impl Into<String>) -> Self {
        Self {
            typed: typed.into(),
            ..self
        }
    }

    /// Make the typed text the applied query
    pub fn applied(self) -> Self {
        Self {
            applied: self.typed.clone(),
            ..self
        }
    }

    /// A non-empty query is filtering the option list
    pub fn is_filtering(&self) -> bool {
        !self.applied.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fruits() -> Vec<String> {
        ["Apple 🍎", "Banana 🍌", "Pineapple 🍍", "Grapes 🍇"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_filter_case_insensitive_in_order() {
        let options = fruits();
        let hits: Vec<&str> = filter_options(&options, "APPLE").into_iter().map(String::as_str).collect();
        assert_eq!(hits, vec!["Apple 🍎", "Pineapple 🍍"]);
    }

    #[test]
    fn test_filter_no_match() {
        assert!(filter_options(&fruits(), "xyz-no-match").is_empty());
    }

    #[test]
    fn test_typed_vs_applied() {
        let s = SearchState::default().with_typed("ki");
        assert_eq!(s.typed, "ki");
        assert!(!s.is_filtering());

        let s = s.applied();
        assert_eq!(s.typed, "ki");
        assert!(s.is_filtering());
        assert_eq!(s.applied, "ki");
    }

    proptest! {
        #[test]
        fn test_filter_equals_set_comprehension(
            options in prop::collection::vec("[a-cA-C]{0,6}", 0..30),
            query in "[a-cA-C]{0,3}",
        ) {
            let q = query.to_lowercase();
            let expected: Vec<&String> = options
                .iter()
                .filter(|s| s.to_lowercase().contains(&q))
                .collect();
            prop_assert_eq!(filter_options(&options, &query), expected);
        }
    }
}
