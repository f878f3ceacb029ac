//! Upstream query construction
//!
//! The built URL doubles as the cache key, so parameter order is preserved
//! exactly as the caller inserted it.

use url::Url;

use crate::error::{AppError, Result};

// == Query Params ==
/// Ordered outbound query parameters. Absent or empty values are kept here
/// but never make it into the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`. Re-setting a name keeps its original position.
    pub fn param(mut self, name: &str, value: Option<impl Into<String>>) -> Self {
        let value = value.map(Into::into);
        match self.pairs.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((name.to_string(), value)),
        }
        self
    }

    /// Iterates the pairs that will be sent, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().filter_map(|(name, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((name.as_str(), v)),
            _ => None,
        })
    }
}

// == Build URL ==
/// Builds `<base>/<resource>/?api_key=..&format=json&<params>`.
///
/// Pure: equal inputs always yield the same string.
pub fn build_url(base_url: &str, api_key: &str, resource: &str, params: &QueryParams) -> Result<String> {
    let raw = format!(
        "{}/{}/",
        base_url.trim_end_matches('/'),
        resource.trim_matches('/')
    );
    let mut url = Url::parse(&raw)
        .map_err(|e| AppError::Internal(format!("invalid upstream URL '{}': {}", raw, e)))?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("api_key", api_key);
        query.append_pair("format", "json");
        for (name, value) in params.present() {
            query.append_pair(name, value);
        }
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "https://www.gamespot.com/api";

    #[test]
    fn test_fixed_fields_come_first() {
        let params = QueryParams::new().param("limit", Some("20"));
        let url = build_url(BASE, "KEY", "games", &params).unwrap();

        assert_eq!(
            url,
            "https://www.gamespot.com/api/games/?api_key=KEY&format=json&limit=20"
        );
    }

    #[test]
    fn test_absent_and_empty_values_are_omitted() {
        let params = QueryParams::new()
            .param("limit", Some("20"))
            .param("sort", None::<String>)
            .param("filter", Some(""));
        let url = build_url(BASE, "KEY", "games", &params).unwrap();

        assert!(url.contains("limit=20"));
        assert!(!url.contains("sort="));
        assert!(!url.contains("filter="));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let a = QueryParams::new()
            .param("offset", Some("0"))
            .param("limit", Some("20"));
        let b = QueryParams::new()
            .param("limit", Some("20"))
            .param("offset", Some("0"));

        let url_a = build_url(BASE, "K", "reviews", &a).unwrap();
        let url_b = build_url(BASE, "K", "reviews", &b).unwrap();

        assert_ne!(url_a, url_b);
        assert!(url_a.ends_with("offset=0&limit=20"));
    }

    #[test]
    fn test_reset_param_keeps_position() {
        let params = QueryParams::new()
            .param("limit", Some("20"))
            .param("sort", Some("name:asc"))
            .param("limit", Some("50"));

        let pairs: Vec<_> = params.present().collect();
        assert_eq!(pairs, vec![("limit", "50"), ("sort", "name:asc")]);
    }

    #[test]
    fn test_values_are_form_encoded() {
        let params = QueryParams::new().param("filter", Some("name:mario kart,platforms:18"));
        let url = build_url(BASE, "K", "games", &params).unwrap();

        assert!(url.ends_with("filter=name%3Amario+kart%2Cplatforms%3A18"));
    }

    #[test]
    fn test_slashes_are_normalized() {
        let url = build_url("http://localhost:9000/api/", "K", "/platforms/", &QueryParams::new())
            .unwrap();
        assert_eq!(url, "http://localhost:9000/api/platforms/?api_key=K&format=json");
    }

    #[test]
    fn test_invalid_base_is_an_error() {
        let result = build_url("not a url", "K", "games", &QueryParams::new());
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        // Names given no value never appear in the query string.
        #[test]
        fn prop_missing_values_never_serialized(
            kept in "[a-z]{1,8}",
            dropped in "[a-z]{1,8}",
            value in "[a-zA-Z0-9]{1,12}",
            empty in any::<bool>(),
        ) {
            prop_assume!(kept != dropped);
            prop_assume!(!["api", "format"].iter().any(|f| f.contains(dropped.as_str())));
            let dropped_value = if empty { Some(String::new()) } else { None };
            let params = QueryParams::new()
                .param(&kept, Some(value.clone()))
                .param(&dropped, dropped_value);

            let url = build_url(BASE, "K", "games", &params).unwrap();
            let needle = format!("&{}={}", kept, value);
            let dropped_needle = format!("&{}=", dropped);
            prop_assert!(url.contains(&needle));
            prop_assert!(!url.contains(&dropped_needle));
        }
    }
}
