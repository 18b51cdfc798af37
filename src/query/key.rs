use std::collections::BTreeMap;
use std::fmt;

use crate::list::pagination::PaginationModel;

/// Deterministic identity of one backend read.
///
/// Two keys are equal exactly when they would produce the same request, so
/// the key doubles as the cache key and as the request description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    path: String,
    params: Vec<(String, String)>,
}

impl QueryKey {
    /// Build a key from a path and parameters, dropping empty values.
    ///
    /// Parameters keep the order they are given in.
    pub fn new<K, V>(path: impl Into<String>, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Self {
            path: path.into(),
            params,
        }
    }

    /// Key of a single-record or unparameterised read.
    pub fn detail(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return f.write_str(&self.path);
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        write!(f, "{}?{}", self.path, query)
    }
}

/// Inputs of a paginated list read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInputs {
    pub path: String,
    /// Debounced search text; trimmed when the key is built
    pub search: String,
    /// Filter parameters by wire name
    pub filters: BTreeMap<String, String>,
    pub pagination: PaginationModel,
}

impl ListInputs {
    pub fn new(path: impl Into<String>, pagination: PaginationModel) -> Self {
        Self {
            path: path.into(),
            search: String::new(),
            filters: BTreeMap::new(),
            pagination,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    /// `search`, then filters in name order, then `limit` and `offset`.
    pub fn key(&self) -> QueryKey {
        let mut params: Vec<(String, String)> = Vec::with_capacity(self.filters.len() + 3);
        params.push(("search".to_string(), self.search.trim().to_string()));
        params.extend(
            self.filters
                .iter()
                .map(|(k, v)| (k.clone(), v.trim().to_string())),
        );
        params.push((
            "limit".to_string(),
            self.pagination.page_size.to_string(),
        ));
        params.push(("offset".to_string(), self.pagination.offset().to_string()));
        QueryKey::new(self.path.clone(), params)
    }
}

/// Which cached reads an invalidation touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyScope {
    /// One specific read
    Exact(QueryKey),
    /// Every read whose path starts with the given prefix, whatever its
    /// parameters (all pages and filters of a list, plus its detail reads)
    Prefix(String),
}

impl KeyScope {
    pub fn prefix(path: impl Into<String>) -> Self {
        KeyScope::Prefix(path.into())
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            KeyScope::Exact(exact) => exact == key,
            KeyScope::Prefix(prefix) => key.path.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for KeyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyScope::Exact(key) => write!(f, "{key}"),
            KeyScope::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}
