use crate::{ApiError, ApiResult};
use labora_core::{CoreConfig, CoreError, SessionContext};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

/// Async client for the Labora backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: Arc<CoreConfig>,
    http: Client,
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    pub fn new(config: Arc<CoreConfig>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// `{base}{path}/{segment}` with `segment` percent-encoded.
    pub(crate) fn endpoint_with_segment(&self, path: &str, segment: &str) -> ApiResult<Url> {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(CoreError::MissingField("id").into());
        }
        let mut url = Url::parse(&self.endpoint(path))
            .map_err(|e| CoreError::InvalidInput(format!("invalid endpoint url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CoreError::InvalidInput("endpoint url cannot take path segments".into()))?
            .push(segment);
        Ok(url)
    }

    /// Attaches the session's bearer token.
    pub(crate) fn authorized(
        &self,
        request: RequestBuilder,
        session: &SessionContext,
    ) -> ApiResult<RequestBuilder> {
        Ok(request.bearer_auth(session.token()?))
    }

    /// Sends `request` and returns the raw body of a 2xx response.
    ///
    /// Non-2xx responses become [`ApiError::Api`] carrying the backend's `message` (or `error`)
    /// field, or `fallback` when the body has neither.
    pub(crate) async fn send(
        &self,
        operation: &'static str,
        fallback: &str,
        request: RequestBuilder,
    ) -> ApiResult<String> {
        tracing::debug!(operation, "sending request");
        let response = request.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| fallback.to_string());
            tracing::warn!(operation, status = status.as_u16(), %message, "backend rejected request");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(operation, status = status.as_u16(), "request succeeded");
        Ok(body)
    }

    /// Sends `request` and unwraps `data` from the response envelope.
    ///
    /// `Ok(None)` means the backend answered 2xx with a null or missing `data`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        fallback: &str,
        request: RequestBuilder,
    ) -> ApiResult<Option<T>> {
        let body = self.send(operation, fallback, request).await?;
        decode_envelope(operation, &body)
    }
}

pub(crate) fn decode_envelope<T: DeserializeOwned>(
    what: &'static str,
    body: &str,
) -> ApiResult<Option<T>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|source| ApiError::Decode { what, source })?;
    Ok(envelope.data)
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use labora_core::MaterialStats;
    use std::time::Duration;

    fn client(base: &str) -> ApiClient {
        let config = CoreConfig::new(base, Duration::from_millis(300), Duration::from_secs(5))
            .unwrap();
        ApiClient::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn envelope_unwraps_data() {
        let stats: Option<MaterialStats> =
            decode_envelope("stats", r#"{"data":{"totalMaterials":3}}"#).unwrap();
        assert_eq!(stats.unwrap().total_materials, 3);

        let missing: Option<MaterialStats> = decode_envelope("stats", r#"{"data":null}"#).unwrap();
        assert!(missing.is_none());
        let empty: Option<MaterialStats> = decode_envelope("stats", "").unwrap();
        assert!(empty.is_none());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let result: ApiResult<Option<MaterialStats>> = decode_envelope("stats", "<html>");
        assert!(matches!(result, Err(ApiError::Decode { what: "stats", .. })));
    }

    #[test]
    fn error_message_prefers_message_then_error() {
        assert_eq!(
            error_message(r#"{"message":"Email sudah terdaftar"}"#).as_deref(),
            Some("Email sudah terdaftar")
        );
        assert_eq!(error_message(r#"{"error":"boom"}"#).as_deref(), Some("boom"));
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_message("Internal Server Error"), None);
    }

    #[test]
    fn segments_are_percent_encoded() {
        let client = client("http://localhost:5000/");
        let url = client
            .endpoint_with_segment("/api/materials", "a b/c")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/materials/a%20b%2Fc");

        assert!(matches!(
            client.endpoint_with_segment("/api/materials", " "),
            Err(ApiError::Validation(CoreError::MissingField("id")))
        ));
    }

    #[test]
    fn requests_without_session_are_rejected_locally() {
        let client = client("http://localhost:5000");
        let request = client.http().get(client.endpoint("/api/materials"));
        assert!(matches!(
            client.authorized(request, &SessionContext::new()),
            Err(ApiError::Validation(CoreError::NotAuthenticated))
        ));
    }
}
