//! Form-encoded submission data.
//!
//! [`QueryDict`] wraps [`MultiValueDict`](crate::utils::MultiValueDict) with
//! query-string parsing and an immutability guard. Forms bind their
//! prefix-scoped field names against it.

use crate::error::{SubformsError, SubformsResult};
use crate::utils::MultiValueDict;

/// Parsed query-string or form-body data.
///
/// Instances are immutable unless created with
/// [`new_mutable`](QueryDict::new_mutable) or cloned via
/// [`copy`](QueryDict::copy); write methods on an immutable instance fail
/// rather than silently mutating shared request data.
///
/// # Examples
///
/// ```
/// use subforms_core::QueryDict;
///
/// let qd = QueryDict::parse("color=red&color=blue&size=large");
/// assert_eq!(qd.get("color"), Some("blue"));
/// assert_eq!(qd.get_list("color"), Some(&vec!["red".to_string(), "blue".to_string()]));
///
/// let mut mutable = qd.copy();
/// mutable.set("color", "green").unwrap();
/// assert_eq!(mutable.get("color"), Some("green"));
/// ```
#[derive(Debug, Clone)]
pub struct QueryDict {
    data: MultiValueDict<String, String>,
    mutable: bool,
}

impl Default for QueryDict {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryDict {
    /// An empty, immutable `QueryDict`.
    pub fn new() -> Self {
        Self {
            data: MultiValueDict::new(),
            mutable: false,
        }
    }

    /// An empty, mutable `QueryDict`.
    pub fn new_mutable() -> Self {
        Self {
            data: MultiValueDict::new(),
            mutable: true,
        }
    }

    /// Parses `key=value` pairs separated by `&` into an immutable
    /// `QueryDict`, decoding percent escapes and `+` as space. A pair
    /// without `=` is kept as a key with an empty value; repeated keys
    /// accumulate.
    pub fn parse(query_string: &str) -> Self {
        let mut data = MultiValueDict::new();

        for pair in query_string.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            data.append(percent_decode(key), percent_decode(value));
        }

        Self {
            data,
            mutable: false,
        }
    }

    /// The last submitted value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(&key.to_string()).map(String::as_str)
    }

    /// Every submitted value for `key`, in order, if any.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.data.get_list(&key.to_string())
    }

    fn ensure_mutable(&self) -> SubformsResult<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(SubformsError::SuspiciousOperation(
                "This QueryDict instance is immutable".to_string(),
            ))
        }
    }

    /// Replaces whatever `key` held with the single given value.
    ///
    /// # Errors
    ///
    /// Returns [`SubformsError::SuspiciousOperation`] on an immutable
    /// instance.
    pub fn set(&mut self, key: &str, value: &str) -> SubformsResult<()> {
        self.ensure_mutable()?;
        self.data.set(key.to_string(), value.to_string());
        Ok(())
    }

    /// Adds a value to the end of `key`'s list.
    ///
    /// # Errors
    ///
    /// Returns [`SubformsError::SuspiciousOperation`] on an immutable
    /// instance.
    pub fn append(&mut self, key: &str, value: &str) -> SubformsResult<()> {
        self.ensure_mutable()?;
        self.data.append(key.to_string(), value.to_string());
        Ok(())
    }

    /// A mutable clone of this `QueryDict`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            data: self.data.clone(),
            mutable: true,
        }
    }

    /// Serializes back to a percent-encoded query string, with pairs
    /// sorted for deterministic output.
    pub fn urlencode(&self) -> String {
        let mut parts: Vec<String> = self
            .data
            .into_iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| format!("{}={}", percent_encode(key), percent_encode(value)))
            })
            .collect();
        parts.sort();
        parts.join("&")
    }

    /// Returns `true` if write methods are allowed.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when no keys are present.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn percent_decode(input: &str) -> String {
    // Form encoding uses + for space; decode it before percent escapes.
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
