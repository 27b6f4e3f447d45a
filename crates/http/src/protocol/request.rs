//! HTTP request head handling implementation.
//!
//! The head is kept as raw as the wire allows: the method is whatever token the
//! client sent, the path is not percent-decoded and the query string stays bytes.
//! Header names are lower-cased, header values are left untouched.

use bytes::Bytes;

/// Request header fields in arrival order.
///
/// Names are stored lower-cased. Inserting a name that is already present
/// replaces its value in place, so the last occurrence on the wire wins while
/// the first occurrence keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(Bytes, Bytes)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, lower-casing `name` if needed.
    pub fn insert(&mut self, name: Bytes, value: Bytes) {
        let name = if name.iter().any(u8::is_ascii_uppercase) { Bytes::from(name.to_ascii_lowercase()) } else { name };

        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&Bytes> {
        let name = name.as_ref();
        self.entries.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value)
    }

    pub fn contains(&self, name: impl AsRef<[u8]>) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &Bytes)> {
        self.entries.iter().map(|(name, value)| (name, value))
    }
}

/// The parsed head of one request: request line plus header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    method: String,
    path: String,
    query_string: Bytes,
    headers: Headers,
}

impl RequestHead {
    pub fn new(method: String, path: String, query_string: Bytes, headers: Headers) -> Self {
        Self { method, path, query_string, headers }
    }

    /// Returns the method token as sent by the client.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the raw path, without the query component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw bytes after the first `?`, empty if there is none.
    pub fn query_string(&self) -> &Bytes {
        &self.query_string
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Whether the client asked for the connection to be closed after this response.
    pub fn wants_close(&self) -> bool {
        self.headers.get(b"connection").is_some_and(|value| value.trim_ascii().eq_ignore_ascii_case(b"close"))
    }

    pub(crate) fn into_parts(self) -> (String, String, Bytes, Headers) {
        (self.method, self.path, self.query_string, self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_last_write_wins() {
        let mut headers = Headers::new();
        headers.insert(Bytes::from_static(b"Host"), Bytes::from_static(b"a"));
        headers.insert(Bytes::from_static(b"accept"), Bytes::from_static(b"*/*"));
        headers.insert(Bytes::from_static(b"HOST"), Bytes::from_static(b"b"));

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("host"), Some(&Bytes::from_static(b"b")));
        assert_eq!(headers.get("Host"), Some(&Bytes::from_static(b"b")));

        let names: Vec<_> = headers.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, vec![Bytes::from_static(b"host"), Bytes::from_static(b"accept")]);
    }

    #[test]
    fn connection_close() {
        let mut headers = Headers::new();
        headers.insert(Bytes::from_static(b"connection"), Bytes::from_static(b"Close"));
        let head = RequestHead::new("GET".into(), "/".into(), Bytes::new(), headers);
        assert!(head.wants_close());

        let head = RequestHead::new("GET".into(), "/".into(), Bytes::new(), Headers::new());
        assert!(!head.wants_close());
    }
}
