use crate::config::Config;
use crate::Error;
use lambda_runtime::LambdaEvent;
use proxy_integration::{new_request_from_value, ProxyResponse, ResponseCapture};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// A generic error message sent to the caller when the event could not be turned into a request.
/// The details are only logged.
const ERROR_400_MSG: &str = "Bad request. The API Gateway event could not be decoded.";

pub(crate) async fn my_handler(event: LambdaEvent<Value>, config: &Config) -> Result<Value, Error> {
    let (event, ctx) = event.into_parts();
    // these 2 lines are for debugging only to see the raw APIGW request
    debug!("Event: {}", event);
    debug!("Context: {:?}", ctx);

    Ok(handle_event(event, config).to_value()?)
}

/// Decodes the event, runs the app and exports whatever it wrote.
pub(crate) fn handle_event(event: Value, config: &Config) -> ProxyResponse {
    let req = match new_request_from_value(event) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to decode APIGW request: {}", e);
            return gw_error_response(400, ERROR_400_MSG);
        }
    };

    info!("{} {} from {}", req.method, req.request_uri, req.remote_addr);

    let mut w = ResponseCapture::new();
    crate::app::serve(&req, &mut w, config);
    let resp = w.response();

    info!("Status: {}, body: {}B", resp.status_code, resp.body.len());
    resp
}

/// Prepares a plain text response for errors that happen before the app is called.
fn gw_error_response(status_code: i32, body: &str) -> ProxyResponse {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_owned(), "text/plain".to_owned());

    ProxyResponse {
        status_code,
        headers,
        body: body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::init_logging;
    use serde_json::json;

    fn test_config() -> Config {
        Config {
            log_level: tracing::Level::INFO,
            app_name: "test-app".to_owned(),
            invalid_log_level: None,
        }
    }

    #[test]
    fn bad_event_is_400() {
        init_logging();
        let resp = handle_event(json!({"httpMethod": "POST", "body": "%%%", "isBase64Encoded": true}), &test_config());
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.body, ERROR_400_MSG);

        let resp = handle_event(json!({"httpMethod": 1}), &test_config());
        assert_eq!(resp.status_code, 400);
    }

    #[test]
    fn echo_event() {
        init_logging();
        let event: Value = serde_json::from_str(include_str!("../samples/proxy_request.json")).unwrap();
        let resp = handle_event(event, &test_config());

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.headers.get("Server").map(String::as_str), Some("test-app"));
    }

    #[tokio::test]
    async fn lambda_event() {
        let event: Value = serde_json::from_str(include_str!("../samples/options_request.json")).unwrap();
        let resp = my_handler(LambdaEvent::new(event, lambda_runtime::Context::default()), &test_config())
            .await
            .unwrap();

        assert_eq!(resp["statusCode"], 204);
        assert_eq!(resp["body"], "");
        assert_eq!(resp["headers"]["Server"], "test-app");
    }
}
