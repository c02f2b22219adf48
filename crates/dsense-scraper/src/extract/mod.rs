//! Signal extractors, one per source page shape.
//!
//! Each extractor declares an ordered list of strategies — pure
//! functions from raw page content to an optional measurement — and
//! folds over them first-success-wins. A strategy that finds no
//! matching shape simply yields `None` and control moves on; nothing at
//! this layer raises. Only the marketplace extractor has a hard failure
//! mode (an empty listing sample), expressed as a typed error.

pub mod allegro;
pub mod instagram;
pub mod tiktok;

/// Applies `strategies` to `content` in declared order and returns the
/// first non-empty result. Remaining strategies are skipped.
pub(crate) fn first_success<T>(content: &str, strategies: &[fn(&str) -> Option<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_success_stops_at_first_match() {
        fn never(_: &str) -> Option<i32> {
            None
        }
        fn one(_: &str) -> Option<i32> {
            Some(1)
        }
        fn two(_: &str) -> Option<i32> {
            Some(2)
        }

        assert_eq!(first_success("", &[never, one, two]), Some(1));
        assert_eq!(first_success("", &[never, never]), None);
    }
}
