//! Route parameters, query strings, and URL component decoding.
//!
//! - [`RouteParams`] — values captured by a route pattern (e.g. `:id` in
//!   `/user/:id`). Several routes in one chain may contribute to the same
//!   mapping; [`merge_missing`](RouteParams::merge_missing) keeps the first
//!   value seen for each key.
//! - [`QueryParams`] — the `key=value&...` portion of a path, multi-valued.
//! - [`decode_url_component`] — the decoding applied to path components when
//!   the router's `decode_url_components` option is on.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{QueryParams, RouteParams};
//!
//! let mut params = RouteParams::new();
//! params.insert("id".to_string(), "42".to_string());
//! assert_eq!(params.get_as::<u32>("id"), Some(42));
//!
//! let query = QueryParams::from_query_string("page=1&sort=name");
//! assert_eq!(query.get_as::<u32>("page"), Some(1));
//! assert_eq!(query.get("sort"), Some(&"name".to_string()));
//! ```

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;

/// Characters left untouched by [`QueryParams::to_query_string`].
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-decode `value`, returning it unchanged if the result is not UTF-8.
pub fn decode_uri_component(value: &str) -> String {
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Decode a URL component in either `x-www-form-urlencoded` or plain
/// percent-encoded form: `+` becomes a space, then `%XX` sequences are decoded.
///
/// ```
/// use spa_navigator::decode_url_component;
///
/// assert_eq!(decode_url_component("hello+world"), "hello world");
/// assert_eq!(decode_url_component("caf%C3%A9"), "café");
/// ```
pub fn decode_url_component(value: &str) -> String {
    if value.contains('+') {
        decode_uri_component(&value.replace('+', " "))
    } else {
        decode_uri_component(value)
    }
}

fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Route parameters extracted from path segments
///
/// # Example
///
/// ```
/// use spa_navigator::RouteParams;
///
/// // Route pattern: /user/:id
/// // Matched path: /user/123
/// let mut params = RouteParams::new();
/// params.insert("id".to_string(), "123".to_string());
///
/// assert_eq!(params.get("id"), Some(&"123".to_string()));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing `HashMap`.
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Fold `other` into `self`, keeping values that are already present.
    ///
    /// This is how parameters accumulate across the routes of one dispatch:
    /// the first route to define a key wins, later routes only fill gaps.
    ///
    /// ```
    /// use spa_navigator::RouteParams;
    ///
    /// let mut ctx_params = RouteParams::new();
    /// ctx_params.insert("id".to_string(), "1".to_string());
    ///
    /// let mut later = RouteParams::new();
    /// later.insert("id".to_string(), "2".to_string());
    /// later.insert("tab".to_string(), "posts".to_string());
    ///
    /// ctx_params.merge_missing(later);
    /// assert_eq!(ctx_params.get("id"), Some(&"1".to_string()));
    /// assert_eq!(ctx_params.get("tab"), Some(&"posts".to_string()));
    /// ```
    pub fn merge_missing(&mut self, other: RouteParams) {
        for (key, value) in other.params {
            self.params.entry(key).or_insert(value);
        }
    }
}

/// Query parameters parsed from URL query string
///
/// Supports multiple values for the same key.
///
/// # Example
///
/// ```
/// use spa_navigator::QueryParams;
///
/// let query = QueryParams::from_query_string("page=1&sort=name&tag=rust&tag=wasm");
///
/// assert_eq!(query.get("page"), Some(&"1".to_string()));
/// assert_eq!(query.get_all("tag").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: HashMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (still encoded) query string without its leading `?`.
    ///
    /// A key without `=` is recorded with an empty value.
    pub fn from_query_string(query: &str) -> Self {
        let mut params: HashMap<String, Vec<String>> = HashMap::new();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params
                .entry(decode_url_component(key))
                .or_default()
                .push(decode_url_component(value));
        }

        Self { params }
    }

    /// Get the first value for a key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)?.first()
    }

    /// Get all values for a key.
    pub fn get_all(&self, key: &str) -> Option<&Vec<String>> {
        self.params.get(key)
    }

    /// Get the first value for a key, parsed as type `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Append a value for the given key.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.entry(key).or_default().push(value);
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Serialize back into a query string. Key order is unspecified.
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<String> = self
            .params
            .iter()
            .flat_map(|(key, values)| {
                values.iter().map(move |value| {
                    format!(
                        "{}={}",
                        encode_uri_component(key),
                        encode_uri_component(value)
                    )
                })
            })
            .collect();

        pairs.join("&")
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of unique parameter keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
