use crate::error::DecodeError;
use crate::event::{ApiGatewayRequest, RequestContext};
use crate::header::Header;
use hyper::body::Bytes;
use hyper::{Uri, Version};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Cursor;
use tracing::{debug, warn};

/// An HTTP request rebuilt from an API Gateway proxy integration event.
///
/// The body is fully materialised because API GW delivers it as a single JSON string.
/// `Host` is taken out of `header` into `host`, the same way server-side HTTP request models
/// keep the target host apart from the other headers.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// `httpMethod` as API GW sent it, `GET` if it was empty.
    pub method: String,
    /// Always `HTTP/1.1`. API GW does not tell which protocol the client actually used.
    pub proto: &'static str,
    pub proto_major: u8,
    pub proto_minor: u8,
    pub header: Header,
    /// Number of bytes in `body` after base64 decoding, if any.
    pub content_length: u64,
    pub body: Bytes,
    /// Client IP from `requestContext.identity.sourceIp`. Empty if API GW did not provide it.
    pub remote_addr: String,
    pub host: String,
    /// `path` + `?` + the encoded query string. The `?` is only present if there are query params.
    pub request_uri: String,
    /// `request_uri` parsed into its parts with the path percent-encoded, e.g. `/café` becomes `/caf%C3%A9`.
    /// `None` if it is still not a valid URI, e.g. the path is empty.
    pub url: Option<Uri>,
    /// The API GW resource template, e.g. `/orders/{id}`
    pub resource: String,
    pub path_parameters: HashMap<String, String>,
    pub stage_variables: HashMap<String, String>,
    pub request_context: RequestContext,
}

impl ProxyRequest {
    pub fn version(&self) -> Version {
        Version::HTTP_11
    }

    /// Returns a reader over the body bytes.
    pub fn body_reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.body.as_ref())
    }
}

/// Decodes raw API Gateway event JSON into a [`ProxyRequest`].
pub fn new_request(event: &[u8]) -> Result<ProxyRequest, DecodeError> {
    serde_json::from_slice::<ApiGatewayRequest>(event)?.into_request()
}

/// Same as [`new_request`], but for an event already parsed by the Lambda runtime.
pub fn new_request_from_value(event: Value) -> Result<ProxyRequest, DecodeError> {
    serde_json::from_value::<ApiGatewayRequest>(event)?.into_request()
}

impl ApiGatewayRequest {
    /// Converts the event into an HTTP request. Fails only if the body is not valid padded base64.
    pub fn into_request(self) -> Result<ProxyRequest, DecodeError> {
        let method = if self.http_method.is_empty() {
            "GET".to_owned()
        } else {
            self.http_method
        };

        // sorted so that `Host` comes before `host` if API GW sent both
        let mut headers = self.headers.into_iter().collect::<Vec<_>>();
        headers.sort();
        let mut header = Header::new();
        for (name, value) in headers {
            header.add(&name, value);
        }
        let host = header.get("Host").unwrap_or_default().to_owned();
        header.remove("Host");

        let (request_uri, escaped_uri) = if self.query_string_parameters.is_empty() {
            let escaped_path = escape_path(&self.path);
            (self.path, escaped_path)
        } else {
            let query = encode_query(&self.query_string_parameters);
            (
                [self.path.as_str(), "?", query.as_str()].concat(),
                [escape_path(&self.path), "?".to_owned(), query].concat(),
            )
        };

        // an invalid URI is not fatal, the handler still gets the raw `request_uri`
        let url = match escaped_uri.parse::<Uri>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Cannot parse request URI `{}`: {}", request_uri, e);
                None
            }
        };

        let body = if self.is_base64_encoded {
            // padding is mandatory, but `base64::decode` accepts input without it
            if self.body.len() % 4 != 0 {
                return Err(DecodeError::Base64(base64::DecodeError::InvalidLength));
            }
            base64::decode(&self.body)?
        } else {
            self.body.into_bytes()
        };

        let remote_addr = self.request_context.source_ip().to_owned();

        debug!(
            "Decoded {} {}, host: {}, remote: {}, body: {}B",
            method,
            request_uri,
            host,
            remote_addr,
            body.len()
        );

        Ok(ProxyRequest {
            method,
            proto: "HTTP/1.1",
            proto_major: 1,
            proto_minor: 1,
            header,
            content_length: body.len() as u64,
            body: Bytes::from(body),
            remote_addr,
            host,
            request_uri,
            url,
            resource: self.resource,
            path_parameters: self.path_parameters,
            stage_variables: self.stage_variables,
            request_context: self.request_context,
        })
    }
}

/// Encodes query params as `k1=v1&k2=v2` with keys in sorted order.
pub(crate) fn encode_query(params: &HashMap<String, String>) -> String {
    let mut pairs = params.iter().collect::<Vec<_>>();
    pairs.sort();

    pairs
        .into_iter()
        .map(|(k, v)| [query_escape(k), "=".to_owned(), query_escape(v)].concat())
        .collect::<Vec<String>>()
        .join("&")
}

/// Percent-encodes every path segment, leaving the `/` separators as they are.
/// API GW sends the path already decoded, so `%` is a literal character here.
fn escape_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<String>>()
        .join("/")
}

/// Escapes a query string component. Only `A-Za-z0-9-_.~` are left as-is and a space becomes `+`.
fn query_escape(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}
