use crate::config::Config;
use proxy_integration::{ProxyRequest, ResponseWriter};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The application behind the gateway. It echoes the request back as JSON so that the
/// translation can be checked end-to-end from a browser or curl.
pub(crate) fn serve<W: ResponseWriter>(req: &ProxyRequest, w: &mut W, config: &Config) {
    w.header().set("Server", config.app_name.as_str());

    if req.method == "OPTIONS" {
        return http_options_response(req, w);
    }

    let headers = req
        .header
        .iter()
        .map(|(name, values)| (name, values.join(", ")))
        .collect::<BTreeMap<_, _>>();

    let echo = json!({
        "method": req.method.as_str(),
        "proto": req.proto,
        "uri": req.request_uri,
        "host": req.host,
        "remoteAddr": req.remote_addr,
        "resource": req.resource,
        "stage": req.request_context.stage,
        "requestId": req.request_context.request_id,
        "headers": headers,
        "contentLength": req.content_length,
        "body": String::from_utf8_lossy(&req.body),
    });

    w.header().set("Content-Type", "application/json");
    w.write_header(200);
    w.write_body(echo.to_string().as_bytes());
    info!("Echo: {} {}", req.method, req.request_uri);
}

/// Answers a preflight with 204 and an `Allow` header listing every method the echo accepts.
/// The body stays empty and the request headers are not looked at.
fn http_options_response<W: ResponseWriter>(req: &ProxyRequest, w: &mut W) {
    info!("HTTP OPTIONS");
    debug!("OPTIONS: {:?}", req);

    // allow everything and anything
    w.header().set("Allow", "OPTIONS, GET, HEAD, POST, PUT, PATCH, DELETE");
    w.write_header(204);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxy_integration::{new_request, ResponseCapture};
    use serde_json::Value;

    fn test_config() -> Config {
        Config {
            log_level: tracing::Level::INFO,
            app_name: "test-app".to_owned(),
            invalid_log_level: None,
        }
    }

    #[test]
    fn options() {
        let req = new_request(include_bytes!("../samples/options_request.json")).unwrap();
        let mut w = ResponseCapture::new();
        serve(&req, &mut w, &test_config());
        let resp = w.response();

        assert_eq!(resp.status_code, 204);
        assert_eq!(resp.body, "");
        assert_eq!(resp.headers.get("Server").map(String::as_str), Some("test-app"));
        assert!(resp.headers.contains_key("Allow"));
    }

    #[test]
    fn echo() {
        let req = new_request(include_bytes!("../samples/proxy_request.json")).unwrap();
        let mut w = ResponseCapture::new();
        serve(&req, &mut w, &test_config());
        let resp = w.response();

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.headers.get("Content-Type").map(String::as_str), Some("application/json"));

        let echo: Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(echo["method"], "POST");
        assert_eq!(echo["proto"], "HTTP/1.1");
        assert_eq!(echo["uri"], "/orders/42?expand=items&note=fast+delivery");
        assert_eq!(echo["host"], "abcdef1234.execute-api.us-east-1.amazonaws.com");
        assert_eq!(echo["remoteAddr"], "203.0.113.7");
        assert_eq!(echo["stage"], "prod");
        assert_eq!(echo["contentLength"], 23);
        assert_eq!(echo["body"], r#"{"sku":"A-100","qty":2}"#);
        assert_eq!(echo["headers"]["Content-Type"], "application/json");
        assert!(echo["headers"].get("Host").is_none());
    }
}
