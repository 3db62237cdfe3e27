//! Convenience builder for HTTP query parameters.
//!
//! Every resource manager request carries an `api-version`; list operations
//! may add `$filter`/`$top` style parameters on top of it.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Create a builder seeded with the `api-version` parameter.
    #[must_use]
    pub fn with_api_version(api_version: &str) -> Self {
        let mut params = Self::new();
        params.push("api-version", api_version);
        params
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Borrow the collected pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("ipAddress", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn api_version_comes_first() {
        let mut params = QueryParams::with_api_version("2023-09-01");
        params.push_opt("ipAddress", Some("10.0.0.4"));
        assert_eq!(
            params.into_pairs(),
            vec![
                ("api-version", "2023-09-01".to_string()),
                ("ipAddress", "10.0.0.4".to_string())
            ]
        );
    }
}
