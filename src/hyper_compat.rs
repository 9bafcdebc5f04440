//! Adapters for handlers written against `hyper::Request<Body>` and `hyper::Response<Body>`.

use crate::request::ProxyRequest;
use crate::response::ResponseWriter;
use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH, HOST};
use hyper::{Body, Method, Request, Response, Uri, Version};
use tracing::warn;

/// The client address from `requestContext.identity.sourceIp`, stored in the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddr(pub String);

impl From<ProxyRequest> for Request<Body> {
    /// Headers and methods `hyper` considers invalid are dropped with a warning, the method becoming `GET`.
    /// The URI is [`ProxyRequest::url`], or `/` if there is none, which only happens for an empty or
    /// otherwise unusable path. [`RemoteAddr`] and [`crate::RequestContext`] are added as extensions.
    fn from(proxy_req: ProxyRequest) -> Self {
        let mut req = Request::new(Body::from(proxy_req.body));
        *req.method_mut() = match Method::from_bytes(proxy_req.method.as_bytes()) {
            Ok(v) => v,
            Err(e) => {
                warn!("Invalid method `{}` replaced with GET: {}", proxy_req.method, e);
                Method::GET
            }
        };
        *req.version_mut() = Version::HTTP_11;
        *req.uri_mut() = match proxy_req.url {
            Some(v) => v,
            None => {
                warn!("No valid URI in `{}`, using /", proxy_req.request_uri);
                Uri::from_static("/")
            }
        };

        let headers = req.headers_mut();
        for (name, values) in proxy_req.header.iter() {
            let name = match HeaderName::from_bytes(name.as_bytes()) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Dropped header `{}`: {}", name, e);
                    continue;
                }
            };
            for value in values {
                match HeaderValue::from_str(value) {
                    Ok(v) => {
                        headers.append(name.clone(), v);
                    }
                    Err(e) => warn!("Dropped value of header `{}`: {}", name, e),
                };
            }
        }

        if !proxy_req.host.is_empty() {
            match HeaderValue::from_str(&proxy_req.host) {
                Ok(v) => {
                    headers.insert(HOST, v);
                }
                Err(e) => warn!("Dropped host `{}`: {}", proxy_req.host, e),
            };
        }

        if !headers.contains_key(CONTENT_LENGTH) && proxy_req.content_length > 0 {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(proxy_req.content_length));
        }

        req.extensions_mut().insert(RemoteAddr(proxy_req.remote_addr));
        req.extensions_mut().insert(proxy_req.request_context);

        req
    }
}

/// Copies the status, headers and the entire body of a `hyper` response into `w`.
/// Fails only if the body stream fails.
pub async fn capture_hyper_response<W: ResponseWriter>(resp: Response<Body>, w: &mut W) -> Result<(), hyper::Error> {
    let (parts, body) = resp.into_parts();

    for (name, value) in parts.headers.iter() {
        w.header().add(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
    }
    w.write_header(parts.status.as_u16() as i32);

    let body = hyper::body::to_bytes(body).await?;
    w.write_body(&body);

    Ok(())
}
