use crate::core::round_to;
use crate::error::{Error, Result};

/// Flat, ordered, string-keyed query parameters as they appear in a share link.
///
/// Lookups follow `URLSearchParams` semantics: the first occurrence of a key
/// wins, values are trimmed, and an empty value counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string, with or without a leading `?`.
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.trim().trim_start_matches('?');
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .map_err(|e| Error::InvalidQuery(e.to_string()))?;
        Ok(Self { pairs })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let (_, value) = self.pairs.iter().find(|(k, _)| k == key)?;
        let trimmed = value.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Replaces every existing value for `key`, keeping the first position.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                self.pairs[idx].1 = value;
                let mut seen = false;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Finite number stored under `key`.
    pub fn number(&self, key: &str) -> Option<f64> {
        let parsed = self.get(key)?.parse::<f64>().ok()?;
        parsed.is_finite().then_some(parsed)
    }

    /// First finite number found among `keys`, in order.
    pub fn first_number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| self.number(key))
    }

    /// Like [`first_number`](Self::first_number), rounded to a whole count.
    /// Negative values saturate to 0.
    pub fn first_whole(&self, keys: &[&str]) -> Option<u32> {
        self.first_number(keys).map(|v| v.round() as u32)
    }

    /// `true` for `1`/`true` (any case) under the first present key.
    pub fn first_flag(&self, keys: &[&str]) -> Option<bool> {
        let raw = keys.iter().find_map(|key| self.get(key))?;
        Some(raw == "1" || raw.eq_ignore_ascii_case("true"))
    }

    /// Writes `value` rounded to `decimals`; non-finite values are omitted.
    pub fn set_number(&mut self, key: &str, value: f64, decimals: i32) {
        if !value.is_finite() {
            return;
        }
        self.set(key, round_to(value, decimals).to_string());
    }

    pub fn set_whole(&mut self, key: &str, value: u32) {
        self.set(key, value.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_query_string(&self) -> String {
        // A sequence of string pairs always serializes.
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_and_keeps_order() {
        let params = QueryParams::parse("?mode=sip&amt=5000&note=a%20b+c").expect("valid query");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![("mode", "sip"), ("amt", "5000"), ("note", "a b c")]
        );
    }

    #[test]
    fn get_returns_first_trimmed_non_empty_value() {
        let params = QueryParams::parse("a=%20%207%20&a=9&b=&c=%20").expect("valid query");
        assert_eq!(params.get("a"), Some("7"));
        assert_eq!(params.get("b"), None);
        assert_eq!(params.get("c"), None);
        assert!(params.contains_key("b"));
        assert!(!params.contains_key("d"));
    }

    #[test]
    fn numbers_reject_non_finite_and_garbage() {
        let params: QueryParams = [("a", "12.5"), ("b", "abc"), ("c", "NaN"), ("d", "inf")]
            .into_iter()
            .collect();
        assert_eq!(params.number("a"), Some(12.5));
        assert_eq!(params.number("b"), None);
        assert_eq!(params.number("c"), None);
        assert_eq!(params.number("d"), None);
        assert_eq!(params.first_number(&["b", "c", "a"]), Some(12.5));
    }

    #[test]
    fn whole_numbers_round_and_saturate() {
        let params: QueryParams = [("y", "2.6"), ("n", "-4")].into_iter().collect();
        assert_eq!(params.first_whole(&["y"]), Some(3));
        assert_eq!(params.first_whole(&["n"]), Some(0));
        assert_eq!(params.first_whole(&["missing"]), None);
    }

    #[test]
    fn flags_accept_one_and_true() {
        let params: QueryParams = [("a", "1"), ("b", "TRUE"), ("c", "yes"), ("d", "0")]
            .into_iter()
            .collect();
        assert_eq!(params.first_flag(&["a"]), Some(true));
        assert_eq!(params.first_flag(&["b"]), Some(true));
        assert_eq!(params.first_flag(&["c"]), Some(false));
        assert_eq!(params.first_flag(&["x", "d"]), Some(false));
        assert_eq!(params.first_flag(&["x"]), None);
    }

    #[test]
    fn set_replaces_in_place_and_drops_duplicates() {
        let mut params: QueryParams = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        params.set("a", "9");
        params.set("c", "4");
        assert_eq!(params.to_query_string(), "a=9&b=2&c=4");
    }

    #[test]
    fn set_number_rounds_and_skips_non_finite() {
        let mut params = QueryParams::new();
        params.set_number("rate", 12.3456, 2);
        params.set_number("amt", 5_000.4, 0);
        params.set_number("bad", f64::NAN, 2);
        assert_eq!(params.to_query_string(), "rate=12.35&amt=5000");
    }
}
