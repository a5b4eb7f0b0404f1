//! Case-insensitive header storage shared by requests and responses.
//!
//! Keys are stored lower-cased. A key that is seen twice keeps a single entry whose
//! value is the earlier value and the new one joined by `", "`. Iteration order is
//! whatever the underlying hash map yields and must not be relied upon.

use std::collections::HashMap;
use std::collections::hash_map;

/// Characters, besides ASCII letters and digits, allowed in a header key.
const TOKEN_SYMBOLS: &[u8] = b"!#$%&'*+-.^_`|~";

/// Returns true if `b` belongs to the header key token charset.
#[inline]
pub fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || TOKEN_SYMBOLS.contains(&b)
}

/// A map from lower-cased header key to its (possibly folded) value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a header, ignoring the case of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(&key.to_ascii_lowercase())
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        self.inner.insert(key.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Adds `value` under `key`, folding it into an existing value with `", "`.
    pub fn append<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match self.inner.entry(key.as_ref().to_ascii_lowercase()) {
            hash_map::Entry::Occupied(mut entry) => {
                let folded = entry.get_mut();
                folded.push_str(", ");
                folded.push_str(value.as_ref());
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value.as_ref().to_owned());
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.remove(&key.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.inner.iter() }
    }
}

/// Iterator over `(key, value)` pairs of a [`Headers`], in no particular order.
#[derive(Debug)]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (key, value) in iter {
            headers.append(key, value);
        }
        headers
    }
}

/// The header set every plain response starts from.
///
/// The connection is always closed after one response, so `connection: close` is
/// advertised unconditionally.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.insert("content-length", content_length.to_string());
    headers.insert("connection", "close");
    headers.insert("content-type", "text/plain");
    headers
}
