use crate::header::Header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The response structure for sending back to API Gateway, e.g.
/// `{"statusCode":201,"headers":{"X-Test":"a"},"body":"hello"}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: i32,
    /// One value per header name. Sorted by name so that the same response always serializes the same way.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    /// Converts itself to serde_json::Value, which is what the Lambda runtime expects.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// What a handler needs to produce an HTTP response: headers, a status code and the body.
pub trait ResponseWriter {
    /// Returns the live header collection. It can be changed at any time before the response is exported.
    fn header(&mut self) -> &mut Header;

    /// Sets the status code. Any value is accepted and the last call wins.
    fn write_header(&mut self, status_code: i32);

    /// Appends `buf` to the body.
    fn write_body(&mut self, buf: &[u8]);
}

/// Collects whatever the handler writes and turns it into a [`ProxyResponse`].
#[derive(Debug, Clone)]
pub struct ResponseCapture {
    header: Header,
    status_code: i32,
    body: Vec<u8>,
}

impl ResponseCapture {
    pub const DEFAULT_STATUS_CODE: i32 = 200;

    pub fn new() -> Self {
        Self {
            header: Header::new(),
            status_code: Self::DEFAULT_STATUS_CODE,
            body: Vec::new(),
        }
    }

    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Exports the captured state. Headers with multiple values are collapsed into the last value.
    /// A body that is not valid UTF-8 has the invalid sequences replaced with U+FFFD.
    pub fn response(&self) -> ProxyResponse {
        let headers = self
            .header
            .iter()
            .filter_map(|(name, values)| values.last().map(|v| (name.to_owned(), v.clone())))
            .collect();

        ProxyResponse {
            status_code: self.status_code,
            headers,
            body: String::from_utf8_lossy(&self.body).into_owned(),
        }
    }
}

impl Default for ResponseCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter for ResponseCapture {
    fn header(&mut self) -> &mut Header {
        &mut self.header
    }

    fn write_header(&mut self, status_code: i32) {
        self.status_code = status_code;
    }

    fn write_body(&mut self, buf: &[u8]) {
        self.body.extend_from_slice(buf);
    }
}

/// Lets handlers use `write!` for the body. Writes never fail.
impl std::io::Write for ResponseCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
