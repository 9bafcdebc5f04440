//! Runs plain HTTP handlers behind AWS API Gateway proxy integration.
//!
//! API Gateway delivers every request to the Lambda as a JSON event and expects a JSON response back.
//! This crate turns the event into a [`ProxyRequest`] and collects the handler output via
//! [`ResponseCapture`], which is then exported as a [`ProxyResponse`] for the Lambda runtime.
//!
//! ```
//! use proxy_integration::{new_request, ResponseCapture, ResponseWriter};
//!
//! let req = new_request(br#"{"httpMethod":"GET","path":"/hello","headers":{"Host":"example.com"}}"#).unwrap();
//! assert_eq!(req.host, "example.com");
//!
//! let mut w = ResponseCapture::new();
//! w.header().set("Content-Type", "text/plain");
//! w.write_body(b"hello");
//!
//! let resp = w.response();
//! assert_eq!(resp.status_code, 200);
//! assert_eq!(resp.body, "hello");
//! ```

pub mod error;
pub mod event;
pub mod header;
pub mod hyper_compat;
pub mod request;
pub mod response;

pub use error::DecodeError;
pub use event::{ApiGatewayRequest, RequestContext};
pub use header::{canonical_header_key, Header};
pub use hyper_compat::{capture_hyper_response, RemoteAddr};
pub use request::{new_request, new_request_from_value, ProxyRequest};
pub use response::{ProxyResponse, ResponseCapture, ResponseWriter};
