//! HTTP header decoder implementation for parsing HTTP request heads
//!
//! The decoder waits for the blank line that ends the header block, then parses
//! the request line and the header fields out of it. Parsing is deliberately
//! lenient: the version token is ignored, lines without a `:` are skipped and
//! names and values only get their surrounding whitespace trimmed.
//!
//! # Limits
//!
//! - Maximum header block size: 64KB by default
//! - Only Content-Length framing, `Transfer-Encoding: chunked` is rejected
//!
//! # Implementation Details
//!
//! The header block is split off the input buffer as one frozen [`Bytes`] and
//! every name, value and query string handed out is a slice of it, so parsing
//! does not copy header data. Whatever follows the blank line stays in the
//! input buffer for the body reader.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, ParseError, PayloadSize, RequestHead};

/// Default maximum size in bytes allowed for the header block
pub const DEFAULT_MAX_HEADER_SIZE: usize = 64 * 1024;

const HEADER_END: &[u8] = b"\r\n\r\n";
const CRLF: &[u8] = b"\r\n";

/// Decoder for HTTP request heads implementing the [`Decoder`] trait.
///
/// Yields the parsed [`RequestHead`] together with the [`PayloadSize`] declared
/// by its Content-Length header.
#[derive(Debug, Clone, Copy)]
pub struct HeaderDecoder {
    max_header_size: usize,
}

impl HeaderDecoder {
    pub fn new(max_header_size: usize) -> Self {
        Self { max_header_size }
    }

    pub fn max_header_size(&self) -> usize {
        self.max_header_size
    }
}

impl Default for HeaderDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADER_SIZE)
    }
}

impl Decoder for HeaderDecoder {
    type Item = (RequestHead, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode a request head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((head, payload_size)))` if a complete head was parsed
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if the head is oversized or malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(header_len) = find(src, HEADER_END) else {
            // up to three bytes of a split delimiter may already be buffered
            let partial_limit = self.max_header_size + HEADER_END.len() - 1;
            ensure!(src.len() <= partial_limit, ParseError::too_large_header(src.len(), self.max_header_size));
            return Ok(None);
        };

        ensure!(header_len <= self.max_header_size, ParseError::too_large_header(header_len, self.max_header_size));

        let header_bytes = src.split_to(header_len).freeze();
        src.advance(HEADER_END.len());
        trace!(header_size = header_len, remaining = src.len(), "split request head");

        let head = parse_head(&header_bytes)?;
        let payload_size = parse_payload(head.headers())?;

        Ok(Some((head, payload_size)))
    }
}

/// Parses the request line and header fields out of a complete header block.
fn parse_head(header_bytes: &Bytes) -> Result<RequestHead, ParseError> {
    let mut lines = split_lines(header_bytes).filter(|line| !line.is_empty());

    let request_line = lines.next().ok_or(ParseError::IncompleteRequestLine)?;
    let request_line = std::str::from_utf8(request_line).map_err(ParseError::invalid_request_line)?;

    let mut parts = request_line.split(' ');
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return Err(ParseError::IncompleteRequestLine);
    };

    let (path, query_string) = match target.split_once('?') {
        Some((path, query)) => (path, header_bytes.slice_ref(query.as_bytes())),
        None => (target, Bytes::new()),
    };

    let mut headers = Headers::new();
    for line in lines {
        let Some(colon) = line.iter().position(|b| *b == b':') else {
            continue;
        };

        let name = line[..colon].trim_ascii();
        let value = line[colon + 1..].trim_ascii();
        headers.insert(header_bytes.slice_ref(name), header_bytes.slice_ref(value));
    }

    Ok(RequestHead::new(method.to_owned(), path.to_owned(), query_string, headers))
}

/// Determines the payload size from the request headers.
///
/// A missing or blank Content-Length means no body. Chunked transfer-encoding
/// is refused whatever the Content-Length says.
fn parse_payload(headers: &Headers) -> Result<PayloadSize, ParseError> {
    ensure!(!is_chunked(headers.get(b"transfer-encoding")), ParseError::ChunkedUnsupported);

    let length = match headers.get(b"content-length") {
        Some(value) if !value.trim_ascii().is_empty() => {
            let cl_str = std::str::from_utf8(value).map_err(|_e| ParseError::invalid_content_length("value can't to_str"))?;

            cl_str.trim().parse::<u64>().map_err(|_e| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))?
        }
        _ => 0,
    };

    Ok(PayloadSize::new_length(length))
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 7230, chunked must be the last encoding if present.
fn is_chunked(header_value: Option<&Bytes>) -> bool {
    const CHUNKED: &[u8] = b"chunked";
    if let Some(value) = header_value {
        if let Some(bytes) = value.rsplit(|b| *b == b',').next() {
            return bytes.trim_ascii().eq_ignore_ascii_case(CHUNKED);
        }
    }
    false
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = Some(bytes);
    std::iter::from_fn(move || {
        let current = rest?;
        match find(current, CRLF) {
            Some(index) => {
                rest = Some(&current[index + CRLF.len()..]);
                Some(&current[..index])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn crlf(str: &str) -> BytesMut {
        BytesMut::from(str.replace('\n', "\r\n").as_str())
    }

    #[test]
    fn check_is_chunked() {
        assert!(!is_chunked(None));
        assert!(is_chunked(Some(&Bytes::from_static(b"chunked"))));
        assert!(is_chunked(Some(&Bytes::from_static(b"gzip, Chunked"))));
        assert!(!is_chunked(Some(&Bytes::from_static(b"chunked, gzip"))));
        assert!(!is_chunked(Some(&Bytes::from_static(b"gzip"))));
    }

    #[test]
    fn partial_head_needs_more_data() {
        let mut bytes = BytesMut::from(&b"GET /index.html HTTP/1.1\r\nHost: 127.0.0.1\r\n"[..]);
        let result = HeaderDecoder::default().decode(&mut bytes).unwrap();

        assert!(result.is_none());
        assert_eq!(bytes.len(), 43);
    }

    #[test]
    fn test_bytes_mut_lens() {
        let mut bytes = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        123"##});

        let result = HeaderDecoder::default().decode(&mut bytes).unwrap();

        assert!(result.is_some());
        assert_eq!(&bytes[..], &b"123"[..]);
    }

    #[test]
    fn from_curl() {
        let mut buf = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##});

        let (head, payload_size) = HeaderDecoder::default().decode(&mut buf).unwrap().unwrap();

        assert!(payload_size.is_empty());
        assert!(buf.is_empty());

        assert_eq!(head.method(), "GET");
        assert_eq!(head.path(), "/index.html");
        assert!(head.query_string().is_empty());
        assert_eq!(head.headers().len(), 3);
        assert_eq!(head.headers().get("host"), Some(&Bytes::from_static(b"127.0.0.1:8080")));
        assert_eq!(head.headers().get("user-agent"), Some(&Bytes::from_static(b"curl/7.79.1")));
        assert_eq!(head.headers().get("accept"), Some(&Bytes::from_static(b"*/*")));
    }

    #[test]
    fn query_and_lenient_fields() {
        let mut buf = crlf(indoc! {r##"
        POST /index/?a=1&b=2&a=3?c HTTP/1.1
        Content-Length:   11
        X-Trace : first
        no colon here
        x-trace: second

        hello=world"##});

        let (head, payload_size) = HeaderDecoder::default().decode(&mut buf).unwrap().unwrap();

        assert_eq!(payload_size, PayloadSize::Length(11));
        assert_eq!(head.method(), "POST");
        assert_eq!(head.path(), "/index/");
        assert_eq!(head.query_string(), &Bytes::from_static(b"a=1&b=2&a=3?c"));

        let names: Vec<_> = head.headers().iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, vec![Bytes::from_static(b"content-length"), Bytes::from_static(b"x-trace")]);
        assert_eq!(head.headers().get("x-trace"), Some(&Bytes::from_static(b"second")));
        assert_eq!(&buf[..], b"hello=world");
    }

    #[test]
    fn request_line_without_version() {
        let mut buf = BytesMut::from(&b"POST / \r\nContent-Length: 11\r\n\r\nhello=world"[..]);

        let (head, payload_size) = HeaderDecoder::default().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method(), "POST");
        assert_eq!(head.path(), "/");
        assert_eq!(payload_size.len(), 11);
    }

    #[test]
    fn incomplete_request_line() {
        let mut buf = BytesMut::from(&b"GET\r\nHost: a\r\n\r\n"[..]);
        let result = HeaderDecoder::default().decode(&mut buf);
        assert!(matches!(result, Err(ParseError::IncompleteRequestLine)));

        let mut buf = BytesMut::from(&b"\r\n\r\n"[..]);
        let result = HeaderDecoder::default().decode(&mut buf);
        assert!(matches!(result, Err(ParseError::IncompleteRequestLine)));
    }

    #[test]
    fn non_utf8_request_line() {
        let mut buf = BytesMut::from(&b"GET /\xff\xfe HTTP/1.1\r\n\r\n"[..]);
        let result = HeaderDecoder::default().decode(&mut buf);
        assert!(matches!(result, Err(ParseError::InvalidRequestLine { .. })));
    }

    #[test]
    fn invalid_content_length() {
        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: eleven\r\n\r\n"[..]);
        let result = HeaderDecoder::default().decode(&mut buf);
        assert!(matches!(result, Err(ParseError::InvalidContentLength { .. })));

        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: \r\n\r\n"[..]);
        let (_, payload_size) = HeaderDecoder::default().decode(&mut buf).unwrap().unwrap();
        assert!(payload_size.is_empty());
    }

    #[test]
    fn chunked_is_refused() {
        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n"[..]);
        let result = HeaderDecoder::default().decode(&mut buf);
        assert!(matches!(result, Err(ParseError::ChunkedUnsupported)));
    }

    #[test]
    fn block_at_limit_with_split_delimiter() {
        let mut decoder = HeaderDecoder::new(64);
        let block = format!("GET / HTTP/1.1\r\nX-Fill: {}", "a".repeat(64 - 24));
        assert_eq!(block.len(), 64);

        let mut buf = BytesMut::from(format!("{block}\r\n\r").as_str());
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"\n");
        let (head, _) = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(head.headers().get("x-fill").map(Bytes::len), Some(40));
    }

    #[test]
    fn too_large_header() {
        let mut decoder = HeaderDecoder::new(64);

        let mut buf = BytesMut::from(format!("GET / HTTP/1.1\r\nX-Long: {}", "a".repeat(64)).as_str());
        let result = decoder.decode(&mut buf);
        assert!(matches!(result, Err(ParseError::TooLargeHeader { max_size: 64, .. })));

        // the delimiter arrived in the same read as the oversized block
        let mut buf = BytesMut::from(format!("GET / HTTP/1.1\r\nX-Long: {}\r\n\r\n", "a".repeat(64)).as_str());
        let result = decoder.decode(&mut buf);
        assert!(matches!(result, Err(ParseError::TooLargeHeader { .. })));

        // a body larger than the limit is not part of the header block
        let mut buf = BytesMut::from(format!("POST / HTTP/1.1\r\nContent-Length: 100\r\n\r\n{}", "b".repeat(100)).as_str());
        let (_, payload_size) = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(payload_size.len(), 100);
        assert_eq!(buf.len(), 100);
    }
}
