use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Named filter keys understood by the list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKey {
    /// Free-text search
    Q,
    Status,
    Verified,
    Active,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Q => "q",
            FilterKey::Status => "status",
            FilterKey::Verified => "verified",
            FilterKey::Active => "active",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterKey::Q => "Search",
            FilterKey::Status => "Status",
            FilterKey::Verified => "Verified",
            FilterKey::Active => "Active",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "search" => Ok(FilterKey::Q),
            "status" => Ok(FilterKey::Status),
            "verified" => Ok(FilterKey::Verified),
            "active" => Ok(FilterKey::Active),
            other => Err(CatalogError::InvalidArgument {
                key: "filter".to_string(),
                message: format!("unknown filter '{other}'"),
            }),
        }
    }
}

/// Search and filter values of one list view, persisted as a URL-style
/// query string.
///
/// A missing key reads as the empty string. Values are not validated here;
/// whatever is stored is passed on to the query layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<FilterKey, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `q=acme&status=pending`. Unknown keys are ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut state = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if let Ok(key) = key.parse::<FilterKey>() {
                state.set(key, value.as_ref());
            }
        }
        state
    }

    pub fn get(&self, key: FilterKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Overwrite one key. An empty value removes the key.
    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    pub fn delete(&mut self, key: FilterKey) {
        self.values.remove(&key);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-empty filters other than the free-text search, by wire name.
    pub fn filters(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .filter(|(key, _)| **key != FilterKey::Q)
            .map(|(key, value)| (key.as_str().to_string(), value.clone()))
            .collect()
    }

    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.values.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish()
    }
}
