use crate::errors::{Error, Result};
use serde::de::DeserializeOwned;
use std::io::{BufReader, Read};

/// Represents an HTTP request.
#[derive(Debug)]
pub struct Request {
    /// The HTTP method used in the request
    pub method: String,
    /// The full path of the request, query string included
    pub path: String,
    /// Headers of the request
    pub headers: Vec<(String, String)>,
    /// Body of the request
    pub body: String,
}

impl Request {
    /// Create a new request from scratch
    pub fn new(method: &str, path: &str, headers: Vec<(String, String)>, body: String) -> Request {
        Request {
            method: method.to_string(),
            path: path.to_string(),
            headers,
            body,
        }
    }
    /// Create a new GET request for the given path, with an empty body
    pub fn get(path: &str) -> Request {
        Request::new("GET", path, vec![], String::new())
    }
    /// Create a new POST request for the given path, with the given body
    pub fn post(path: &str, body: String) -> Request {
        Request::new("POST", path, vec![], body)
    }
    /// Create a new PATCH request for the given path, with the given body
    pub fn patch(path: &str, body: String) -> Request {
        Request::new("PATCH", path, vec![], body)
    }
    /// Create a new DELETE request for the given path, with an empty body
    pub fn delete(path: &str) -> Request {
        Request::new("DELETE", path, vec![], String::new())
    }

    /// The path without its query string, which is what routing looks at
    pub fn route_path(&self) -> &str {
        self.path
            .split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(&self.path)
    }

    /// Decode the body as JSON.
    ///
    /// An empty body decodes as the default value, a body that isn't valid JSON for `T` is a bad
    /// request.
    pub fn json<T: DeserializeOwned + Default>(&self) -> Result<T> {
        if self.body.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&self.body)
            .map_err(|err| Error::BadRequest(format!("invalid request body: {}", err)))
    }
}

/// Find the length of the body announced in a set of headers
pub(crate) fn content_length(headers: &[httparse::Header]) -> usize {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("Content-Length"))
        .and_then(|length| String::from_utf8_lossy(length.value).trim().parse::<usize>().ok())
        .unwrap_or(0)
}

/// Copy parsed headers into owned pairs
pub(crate) fn owned_headers(headers: &[httparse::Header]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|h| {
            (
                h.name.to_string(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect()
}

/// Keep reading until `body_len` bytes past the head are buffered, then decode the body.
///
/// Lengths are counted in raw bytes, the body is decoded once it is complete.
pub(crate) fn read_body<T: Read>(
    buf_reader: &mut BufReader<T>,
    mut buf: Vec<u8>,
    parsed_len: usize,
    body_len: usize,
) -> Result<String> {
    let mut chunk = [0; 4096];
    while buf.len() - parsed_len < body_len {
        let bytes_read = buf_reader.read(&mut chunk)?;
        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }
        buf.extend_from_slice(&chunk[..bytes_read]);
    }

    // Bytes past the announced length are dropped. Fine for HTTP1.1 since requests are not meant
    // to be sent before the response from the last is received
    buf.truncate(parsed_len + body_len);
    let body = buf.split_off(parsed_len);
    String::from_utf8(body).map_err(|_| Error::BadRequest("body is not valid UTF-8".to_string()))
}

/// Parse an HTTP request from a byte stream
pub fn parse_request<T>(mut buf_reader: BufReader<T>) -> Result<Request>
where
    T: Sized + Read,
{
    let mut chunk = [0; 4096];
    let mut buf = Vec::new();

    let (body_len, parsed_len, mut request) = loop {
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        let bytes_read = buf_reader.read(&mut chunk)?;

        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }

        buf.extend_from_slice(&chunk[..bytes_read]);

        match req.parse(&buf)? {
            httparse::Status::Complete(parsed_len) => {
                break (
                    content_length(req.headers),
                    parsed_len,
                    Request {
                        method: req.method.unwrap_or("GET").to_string(),
                        path: req.path.unwrap_or("/").to_string(),
                        headers: owned_headers(req.headers),
                        body: String::new(),
                    },
                );
            }
            httparse::Status::Partial => continue,
        }
    };

    request.body = read_body(&mut buf_reader, buf, parsed_len, body_len)?;
    Ok(request)
}
