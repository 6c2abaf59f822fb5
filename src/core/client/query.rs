//! Query-string building for remote API calls.

use serde::Serialize;

/// Insertion-ordered query parameters.
///
/// Absent values are skipped at insertion time, so encoding never emits a
/// key without a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    /// Append a parameter only when a value is present.
    pub fn push_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Append an array filter as a comma-joined value under `key[]`.
    pub fn push_list(&mut self, key: &str, values: Option<&[String]>) -> &mut Self {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.push(format!("{key}[]"), values.join(","));
        }
        self
    }

    /// Value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// URL-encode the parameters (`a=1&b=2`), without a leading `?`.
    pub fn encode(&self) -> String {
        // Encoding a list of string pairs cannot fail.
        serde_urlencoded::to_string(&self.0).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_preserves_insertion_order() {
        let mut query = QueryParams::new();
        query.push("page", 2).push("limit", 50);
        assert_eq!(query.encode(), "page=2&limit=50");
    }

    #[test]
    fn test_absent_values_are_skipped() {
        let mut query = QueryParams::new();
        query
            .push_opt("page", None::<u32>)
            .push_opt("phone", Some("600 000 000"))
            .push_list("customId", None);
        assert_eq!(query.len(), 1);
        assert_eq!(query.encode(), "phone=600+000+000");
    }

    #[test]
    fn test_list_values_are_comma_joined() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let mut query = QueryParams::new();
        query.push_list("customId", Some(&ids));
        assert_eq!(query.get("customId[]"), Some("a,b"));
        assert_eq!(query.encode(), "customId%5B%5D=a%2Cb");
    }
}
