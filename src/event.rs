use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// The API Gateway proxy integration request with the fields used to build an HTTP request.
/// See `samples/proxy_request.json` for a full request example.
///
/// API GW sends `null` for anything that is not present in the request, e.g. the body of a GET or
/// `queryStringParameters` without a query string. All such fields decode into their empty values.
/// Fields not listed here, e.g. `multiValueHeaders`, are ignored.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "string_map")]
    pub headers: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "string_map")]
    pub path_parameters: HashMap<String, String>,
    #[serde(default, deserialize_with = "string_map")]
    pub query_string_parameters: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(default, deserialize_with = "string_map")]
    pub stage_variables: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_context: RequestContext,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

/// An inner member of ApiGatewayRequest
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    /// Caller details, e.g. `sourceIp` and `userAgent`. Most of the members are `null` for
    /// unauthenticated requests and are kept as empty strings.
    #[serde(default, deserialize_with = "string_map")]
    pub identity: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage: String,
}

impl RequestContext {
    /// Returns the caller IP from `identity.sourceIp` or an empty string if there is none.
    pub fn source_ip(&self) -> &str {
        self.identity.get("sourceIp").map(String::as_str).unwrap_or_default()
    }
}

/// Decodes `null` into the default value of the type.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a nullable map with nullable string values.
fn string_map<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<HashMap<String, Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(map.into_iter().map(|(k, v)| (k, v.unwrap_or_default())).collect())
}
