use std::io::{BufReader, Read};

use crate::api::ErrorBody;
use crate::errors::{Error, Result};
use crate::http::request::{content_length, owned_headers, read_body};
use serde::Serialize;
use tracing::{error, warn};

/// An HTTP response to be sent to a client
#[derive(Debug)]
pub struct Response {
    /// Status code of the response. Optional because that's what httparse returns, but it
    /// shouldn't happen in practice since we control the responses.
    pub status: Option<u16>,
    /// Headers for the response. It is not necessary to add Content-Length to it, this is done
    /// automatically on serialization.
    pub headers: Vec<(String, String)>,
    /// Body of the response. Give an empty string for an empty body
    pub body: String,
}

impl Response {
    /// Creates an empty OK response (204)
    pub fn ok() -> Response {
        Response {
            status: Some(204),
            headers: vec![],
            body: "".to_string(),
        }
    }

    /// Creates an OK (200) response with the given body
    pub fn ok_with_body(str: String) -> Response {
        Response {
            status: Some(200),
            headers: vec![],
            body: str,
        }
    }

    /// Creates a response carrying the given value as JSON
    pub fn json<T: Serialize>(status: u16, value: &T) -> Result<Response> {
        Ok(Response {
            status: Some(status),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_string(value)?,
        })
    }

    /// Creates an error response with the given code and `{error_code, message}` body.
    ///
    /// The code must be in the 4xx or 5xx range.
    pub fn error(code: u16, error_code: &str, message: String) -> Response {
        assert!((400..600).contains(&code), "Invalid error code");
        let body = ErrorBody {
            error_code: error_code.to_string(),
            message,
        };
        Response {
            status: Some(code),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_string(&body).unwrap_or_default(),
        }
    }

    /// Turn an error bubbling out of a handler into the response the client sees.
    ///
    /// Details of unclassified errors are logged here and replaced by a generic message.
    pub fn from_error(err: &Error) -> Response {
        match err.status_code() {
            500 => error!(error = %err, "Request failed"),
            _ => warn!(error = %err, "Request rejected"),
        }
        Self::error(err.status_code(), err.error_code(), err.public_message())
    }
}

/// Parse an HTTP response from a byte stream
pub fn parse_response<T>(mut buf_reader: BufReader<T>) -> Result<Response>
where
    T: Sized + Read,
{
    let mut chunk = [0; 4096];
    let mut buf = Vec::new();

    let (body_len, parsed_len, mut response) = loop {
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut resp = httparse::Response::new(&mut headers);
        let bytes_read = buf_reader.read(&mut chunk)?;

        if bytes_read == 0 {
            return Err(Error::ConnectionReset);
        }

        buf.extend_from_slice(&chunk[..bytes_read]);

        match resp.parse(&buf)? {
            httparse::Status::Complete(parsed_len) => {
                break (
                    content_length(resp.headers),
                    parsed_len,
                    Response {
                        status: resp.code,
                        headers: owned_headers(resp.headers),
                        body: String::new(),
                    },
                );
            }
            httparse::Status::Partial => continue,
        }
    };

    response.body = read_body(&mut buf_reader, buf, parsed_len, body_len)?;
    Ok(response)
}
