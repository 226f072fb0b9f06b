//! Value objects describing a list's URL contract and its resolved parameters.
//!
//! A [`QueryConfig`] is declared once per list and never changes. A
//! [`Parameters`] set is re-derived from the address bar on every render, so
//! both types are plain immutable data with cheap clones.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameter holding the 1-based page number.
pub const PAGE: &str = "page";
/// Parameter holding the number of rows per page.
pub const PAGE_SIZE: &str = "page_size";
/// Parameter holding the sort key, prefixed with `-` for descending order.
pub const ORDER_BY: &str = "order_by";

/// Characters that cannot appear in a namespace without breaking the URL format.
const RESERVED_NAMESPACE_CHARS: &[char] = &['.', '&', '=', '?', '#', '+', '%', ','];

/// Errors produced when declaring a list's query configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryConfigError {
    /// Namespace was provided but contained no characters.
    #[error("namespace cannot be empty")]
    EmptyNamespace,
    /// Namespace contained whitespace or a character used by the URL format.
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),
    /// The same parameter was given two defaults.
    #[error("duplicate default for parameter {0}")]
    DuplicateDefault(String),
    /// An integer field was declared with a non-integer default.
    #[error("integer field {0} has a non-integer default")]
    NonIntegerDefault(String),
    /// `page` or `page_size` was given a default below 1.
    #[error("default for {0} must be at least 1")]
    NonPositiveDefault(String),
}

/// A single parameter value as carried by the URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Builds a value from decoded URL values: one value is text, several a list.
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(Self::Text),
            _ => Some(Self::List(values)),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::List(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The values as they appear in a query string, in stored order.
    pub fn to_query_values(&self) -> Vec<String> {
        match self {
            Self::Integer(value) => vec![value.to_string()],
            Self::Text(text) => vec![text.clone()],
            Self::List(values) => values.clone(),
        }
    }

    /// Whether both values serialize to the same query string values.
    ///
    /// `Integer(1)` and `Text("1")` are the same parameter once in the URL;
    /// `Integer(0)` and `Text("")` are not.
    pub fn same_encoding(&self, other: &ParamValue) -> bool {
        self.to_query_values() == other.to_query_values()
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query_values().join(","))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Direction encoded by the leading `-` of an `order_by` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Splits an `order_by` value into its direction and field name.
    pub fn split(order_by: &str) -> (Self, &str) {
        match order_by.strip_prefix('-') {
            Some(field) => (Self::Descending, field),
            None => (Self::Ascending, order_by),
        }
    }

    /// Builds the `order_by` value sorting `key` in this direction.
    pub fn apply(self, key: &str) -> String {
        match self {
            Self::Ascending => key.to_string(),
            Self::Descending => format!("-{key}"),
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// URL contract of a single list: namespace, defaults and integer fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    namespace: Option<String>,
    default_params: Vec<(String, ParamValue)>,
    integer_fields: BTreeSet<String>,
}

impl QueryConfig {
    /// Declares a list configuration, validating namespace and defaults.
    ///
    /// Default parameters keep their declaration order; that order is the
    /// order in which they are written back to the URL.
    pub fn try_new(
        namespace: Option<&str>,
        default_params: Vec<(&str, ParamValue)>,
        integer_fields: &[&str],
    ) -> Result<Self, QueryConfigError> {
        let namespace = namespace.map(validate_namespace).transpose()?;
        let integer_fields: BTreeSet<String> =
            integer_fields.iter().map(|f| f.to_string()).collect();

        let mut seen = BTreeSet::new();
        let mut defaults = Vec::with_capacity(default_params.len());
        for (key, value) in default_params {
            if !seen.insert(key) {
                return Err(QueryConfigError::DuplicateDefault(key.to_string()));
            }
            if integer_fields.contains(key) && !matches!(value, ParamValue::Integer(_)) {
                return Err(QueryConfigError::NonIntegerDefault(key.to_string()));
            }
            if (key == PAGE || key == PAGE_SIZE) && value.as_integer().is_none_or(|n| n < 1) {
                return Err(QueryConfigError::NonPositiveDefault(key.to_string()));
            }
            defaults.push((key.to_string(), value));
        }

        Ok(Self {
            namespace,
            default_params: defaults,
            integer_fields,
        })
    }

    /// The configuration most admin lists use: page 1, a page size and a sort key.
    pub fn standard(
        namespace: Option<&str>,
        page_size: usize,
        order_by: &str,
    ) -> Result<Self, QueryConfigError> {
        Self::try_new(
            namespace,
            vec![
                (PAGE, ParamValue::Integer(1)),
                (PAGE_SIZE, ParamValue::from(page_size)),
                (ORDER_BY, ParamValue::from(order_by)),
            ],
            &[PAGE, PAGE_SIZE],
        )
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn default_params(&self) -> &[(String, ParamValue)] {
        &self.default_params
    }

    pub fn default_value(&self, key: &str) -> Option<&ParamValue> {
        self.default_params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn is_integer_field(&self, key: &str) -> bool {
        self.integer_fields.contains(key)
    }

    /// A parameter set holding only the declared defaults.
    pub fn defaults(&self) -> Parameters {
        self.default_params.iter().cloned().collect()
    }

    /// The key under which `key` appears in the URL.
    pub fn namespaced_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{key}"),
            None => key.to_string(),
        }
    }

    /// Returns the list-local field name when `raw_key` belongs to this list.
    ///
    /// A list without a namespace owns every bare key; dotted keys belong to
    /// namespaced lists sharing the URL.
    pub fn strip_namespace<'a>(&self, raw_key: &'a str) -> Option<&'a str> {
        let field = match &self.namespace {
            Some(namespace) => raw_key.strip_prefix(namespace.as_str())?.strip_prefix('.')?,
            None if raw_key.contains('.') => return None,
            None => raw_key,
        };
        (!field.is_empty()).then_some(field)
    }
}

fn validate_namespace(namespace: &str) -> Result<String, QueryConfigError> {
    if namespace.is_empty() {
        return Err(QueryConfigError::EmptyNamespace);
    }
    if namespace
        .chars()
        .any(|c| c.is_whitespace() || RESERVED_NAMESPACE_CHARS.contains(&c))
    {
        return Err(QueryConfigError::InvalidNamespace(namespace.to_string()));
    }
    Ok(namespace.to_string())
}

/// Resolved parameters of one list, keyed by list-local field name.
///
/// Two sets are equal when they hold the same keys and each value writes the
/// same query string values, so `Integer(5)` and `Text("5")` compare equal.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Stores `value` under `key`. A one-element list is kept as text and
    /// an empty list removes the key, matching what the URL can carry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = match value.into() {
            ParamValue::List(values) => ParamValue::from_values(values),
            value => Some(value),
        };
        match value {
            Some(value) => {
                self.0.insert(key, value);
            }
            None => {
                self.0.remove(&key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Entries in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Current page, never below 1.
    pub fn page(&self) -> usize {
        self.positive(PAGE).unwrap_or(1)
    }

    pub fn page_size(&self) -> Option<usize> {
        self.positive(PAGE_SIZE)
    }

    pub fn order_by(&self) -> Option<&str> {
        self.get(ORDER_BY)
            .and_then(ParamValue::as_text)
            .filter(|order| !order.is_empty())
    }

    /// Sort field and direction taken from `order_by`.
    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.order_by().map(|order| {
            let (direction, field) = SortDirection::split(order);
            (field, direction)
        })
    }

    /// Search filters: every entry other than page, page size and ordering.
    pub fn filters(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.iter()
            .filter(|(key, _)| ![PAGE, PAGE_SIZE, ORDER_BY].contains(key))
    }

    fn positive(&self, key: &str) -> Option<usize> {
        self.get(key)
            .and_then(ParamValue::as_integer)
            .filter(|value| *value >= 1)
            .and_then(|value| usize::try_from(value).ok())
    }
}

impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|((k1, v1), (k2, v2))| k1 == k2 && v1.same_encoding(v2))
    }
}

impl Eq for Parameters {}

impl<K: Into<String>> FromIterator<(K, ParamValue)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, ParamValue)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}
