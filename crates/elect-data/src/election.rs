//! Short election facts shown next to bodies and offices.

use serde_json::{Map, Value};

/// Returns the first election year not before `current`, stepping from
/// `seed` by `term` years.
///
/// Returns `None` when `term` is zero.
///
/// # Examples
///
/// ```
/// use elect_data::next_election_year;
///
/// assert_eq!(next_election_year(2020, 4, 2023), Some(2024));
/// assert_eq!(next_election_year(2020, 4, 2020), Some(2020));
/// assert_eq!(next_election_year(2030, 4, 2023), Some(2026));
/// ```
#[must_use]
pub const fn next_election_year(seed: i64, term: i64, current: i64) -> Option<i64> {
    if term <= 0 {
        return None;
    }
    let mut year = seed;
    while year >= current {
        year -= term;
    }
    while year < current {
        year += term;
    }
    Some(year)
}

/// Builds the election info list of a source object.
///
/// In order, each when available: `"<n> year term"`, `"<year> next"`, the
/// vote method, and `"partisan"` or `"non-partisan"`.
#[must_use]
pub fn election_info(source: &Map<String, Value>, current_year: i64) -> Vec<String> {
    let term = source.get("term_length").and_then(Value::as_i64).filter(|&n| n != 0);
    let seed = source.get("seed_year").and_then(Value::as_i64);

    let next = term
        .zip(seed)
        .and_then(|(term, seed)| next_election_year(seed, term, current_year));

    let vote_method = source
        .get("vote_method")
        .and_then(Value::as_str)
        .filter(|method| !method.is_empty());

    let partisan = source.get("partisan").and_then(Value::as_bool);

    let mut info = Vec::with_capacity(4);
    if let Some(term) = term {
        info.push(format!("{term} year term"));
    }
    if let Some(year) = next {
        info.push(format!("{year} next"));
    }
    if let Some(method) = vote_method {
        info.push(method.to_owned());
    }
    if let Some(partisan) = partisan {
        info.push(if partisan { "partisan" } else { "non-partisan" }.to_owned());
    }
    info
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn info(value: &Value) -> Vec<String> {
        election_info(value.as_object().unwrap(), 2023)
    }

    #[test]
    fn test_next_election_year_zero_term() {
        assert_eq!(next_election_year(2020, 0, 2023), None);
    }

    #[test]
    fn test_next_election_year_far_past_seed() {
        assert_eq!(next_election_year(1850, 2, 2023), Some(2024));
        assert_eq!(next_election_year(1851, 2, 2023), Some(2023));
    }

    #[test]
    fn test_election_info_full() {
        let source = json!({
            "term_length": 4,
            "seed_year": 2020,
            "vote_method": "ranked choice",
            "partisan": false,
        });
        assert_eq!(
            info(&source),
            ["4 year term", "2024 next", "ranked choice", "non-partisan"]
        );
    }

    #[test]
    fn test_election_info_partial() {
        assert_eq!(info(&json!({"partisan": true})), ["partisan"]);
        assert_eq!(info(&json!({"term_length": 6})), ["6 year term"]);
        assert!(info(&json!({"seed_year": 2020, "vote_method": ""})).is_empty());
    }
}
