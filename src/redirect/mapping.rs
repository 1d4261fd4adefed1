//! Path to destination lookup table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One configured redirect rule, as read from a redirect table.
///
/// Fields other than `path` and `url` are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathRoute {
    /// Exact request path to match, including the leading slash.
    pub path: String,

    /// Redirect target.
    #[serde(rename = "url")]
    pub destination: String,
}

impl PathRoute {
    pub fn new(path: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            destination: destination.into(),
        }
    }
}

/// Exact-match mapping from request path to redirect destination.
///
/// Built once, then read concurrently without locking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMapping {
    routes: HashMap<String, String>,
}

impl PathMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an ordered sequence of routes into a mapping.
    ///
    /// A path that appears more than once keeps the destination of its last
    /// occurrence.
    pub fn from_routes<I>(routes: I) -> Self
    where
        I: IntoIterator<Item = PathRoute>,
    {
        routes.into_iter().collect()
    }

    /// Insert a route, replacing any previous destination for the same path.
    pub fn insert(&mut self, path: impl Into<String>, destination: impl Into<String>) -> Option<String> {
        self.routes.insert(path.into(), destination.into())
    }

    /// Look up the destination for an exact path.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.routes.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for PathMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut mapping = Self::new();
        for (path, destination) in iter {
            mapping.insert(path, destination);
        }
        mapping
    }
}

impl FromIterator<PathRoute> for PathMapping {
    fn from_iter<T: IntoIterator<Item = PathRoute>>(iter: T) -> Self {
        iter.into_iter()
            .map(|route| (route.path, route.destination))
            .collect()
    }
}

impl From<HashMap<String, String>> for PathMapping {
    fn from(routes: HashMap<String, String>) -> Self {
        Self { routes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mapping = PathMapping::from_routes(vec![
            PathRoute::new("/a", "/x"),
            PathRoute::new("/b", "/z"),
            PathRoute::new("/a", "/y"),
        ]);

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.resolve("/a"), Some("/y"));
        assert_eq!(mapping.resolve("/b"), Some("/z"));
    }

    #[test]
    fn test_exact_match_only() {
        let mapping: PathMapping = [("/docs", "https://example.com/docs")].into_iter().collect();

        assert_eq!(mapping.resolve("/docs"), Some("https://example.com/docs"));
        assert_eq!(mapping.resolve("/docs/"), None);
        assert_eq!(mapping.resolve("/docs/intro"), None);
        assert_eq!(mapping.resolve("/DOCS"), None);
        assert_eq!(mapping.resolve("docs"), None);
    }

    #[test]
    fn test_empty_mapping() {
        let mapping = PathMapping::new();
        assert!(mapping.is_empty());
        assert_eq!(mapping.resolve("/"), None);
    }

    #[test]
    fn test_from_hash_map() {
        let mut routes = HashMap::new();
        routes.insert("/go".to_string(), "https://go.dev".to_string());
        let mapping = PathMapping::from(routes);

        assert_eq!(mapping.iter().collect::<Vec<_>>(), vec![("/go", "https://go.dev")]);
    }
}
