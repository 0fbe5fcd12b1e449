use std::collections::BTreeMap;
use std::fmt;

/// Company/tenant boundary under which listings and bulk actions are partitioned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Filter option name -> selected value, compared structurally.
///
/// Names and values are trimmed on insert and options with an empty value are
/// treated as unset, so `{status: ""}` equals `{}`. Options are kept sorted,
/// which makes insertion order irrelevant for equality and hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterSnapshot {
    options: BTreeMap<String, String>,
}

impl FilterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    /// Returns true when the stored snapshot changed.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() {
            return false;
        }
        if value.is_empty() {
            return self.options.remove(name).is_some();
        }
        match self.options.get(name) {
            Some(existing) if existing == value => false,
            _ => {
                self.options.insert(name.to_string(), value.to_string());
                true
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.options.remove(name.trim()).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name.trim()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Options in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for FilterSnapshot {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.set(name.as_ref(), value.as_ref());
        }
        snapshot
    }
}

impl fmt::Display for FilterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

/// Stable key partitioning cached pages by scope and filter state.
///
/// Only obtainable through [`derive`]; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryIdentity {
    scope: CompanyId,
    filters: FilterSnapshot,
}

impl QueryIdentity {
    pub fn scope(&self) -> &CompanyId {
        &self.scope
    }

    pub fn filters(&self) -> &FilterSnapshot {
        &self.filters
    }
}

impl fmt::Display for QueryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.scope, self.filters)
    }
}

/// Derives the cache identity for a company and filter snapshot.
///
/// Snapshots normalize on construction, so structurally equal inputs always
/// produce equal identities.
pub fn derive(scope: &CompanyId, filters: &FilterSnapshot) -> QueryIdentity {
    QueryIdentity {
        scope: scope.clone(),
        filters: filters.clone(),
    }
}
