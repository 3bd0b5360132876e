use crate::api::docs::{
    BatchUpdateDocumentRequest, BatchUpdateDocumentResponse, DocsRequest, Document,
};
use crate::api::sheets::{
    BatchUpdateSpreadsheetRequest, BatchUpdateSpreadsheetResponse, SheetsRequest, Spreadsheet,
};
use crate::config::ServerConfig;
use crate::errors::EngineError;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

/// Where the bearer token comes from. Resolved fresh on every request so an
/// external refresher can rotate it mid-session; this engine never manages
/// token lifetimes itself.
#[derive(Debug, Clone)]
pub enum TokenSource {
    Env(String),
    File(PathBuf),
}

impl TokenSource {
    pub fn resolve(&self) -> Result<String, EngineError> {
        let token = match self {
            TokenSource::Env(var) => std::env::var(var).map_err(|_| {
                EngineError::PermissionDenied(format!("access token env var '{var}' is not set"))
            })?,
            TokenSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                EngineError::PermissionDenied(format!(
                    "failed to read token file {}: {e}",
                    path.display()
                ))
            })?,
        };
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(EngineError::PermissionDenied(
                "access token is empty".to_string(),
            ));
        }
        Ok(token)
    }
}

/// Authenticated HTTPS client for the Docs and Sheets endpoints.
///
/// Both batch submitters are atomic per call on the remote side: the API
/// applies a whole request list or none of it. No retries happen here;
/// `Unavailable` surfaces to the caller untouched.
pub struct GoogleApiClient {
    http: reqwest::Client,
    token: TokenSource,
    docs_base: String,
    sheets_base: String,
}

impl GoogleApiClient {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            token: config.token_source(),
            docs_base: config.docs_api_base.trim_end_matches('/').to_string(),
            sheets_base: config.sheets_api_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_document(&self, document_id: &str) -> Result<Document, EngineError> {
        let url = format!("{}/v1/documents/{document_id}", self.docs_base);
        self.get_json(&url).await
    }

    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet, EngineError> {
        let url = format!(
            "{}/v4/spreadsheets/{spreadsheet_id}?fields=spreadsheetId,properties.title,sheets(properties,conditionalFormats)",
            self.sheets_base
        );
        self.get_json(&url).await
    }

    pub async fn docs_batch_update(
        &self,
        document_id: &str,
        requests: Vec<DocsRequest>,
    ) -> Result<BatchUpdateDocumentResponse, EngineError> {
        if requests.is_empty() {
            return Err(EngineError::NoOp);
        }
        tracing::debug!(document_id, count = requests.len(), "submitting docs batch");
        let url = format!("{}/v1/documents/{document_id}:batchUpdate", self.docs_base);
        self.post_json(&url, &BatchUpdateDocumentRequest { requests })
            .await
    }

    pub async fn sheets_batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<SheetsRequest>,
    ) -> Result<BatchUpdateSpreadsheetResponse, EngineError> {
        if requests.is_empty() {
            return Err(EngineError::NoOp);
        }
        tracing::debug!(
            spreadsheet_id,
            count = requests.len(),
            "submitting sheets batch"
        );
        let url = format!(
            "{}/v4/spreadsheets/{spreadsheet_id}:batchUpdate",
            self.sheets_base
        );
        self.post_json(&url, &BatchUpdateSpreadsheetRequest { requests })
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, EngineError> {
        let token = self.token.resolve()?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, EngineError> {
        let token = self.token.resolve()?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, EngineError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(status_to_error(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| EngineError::Unavailable(format!("malformed response body: {e}")))
}

fn transport_error(error: reqwest::Error) -> EngineError {
    EngineError::Unavailable(error.to_string())
}

/// Translate a remote HTTP status into the engine taxonomy, preserving the
/// remote error message where the body carries one.
fn status_to_error(status: StatusCode, body: &str) -> EngineError {
    let message = remote_error_message(body)
        .unwrap_or_else(|| format!("http status {}", status.as_u16()));

    match status {
        StatusCode::BAD_REQUEST => EngineError::InvalidArgument(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EngineError::PermissionDenied(message),
        StatusCode::NOT_FOUND => EngineError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => EngineError::Unavailable(message),
        s if s.is_server_error() => EngineError::Unavailable(message),
        _ => EngineError::Unavailable(format!("{message} (status {})", status.as_u16())),
    }
}

fn remote_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn remote_statuses_map_onto_taxonomy() {
        let body = r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#;
        assert_matches!(
            status_to_error(StatusCode::NOT_FOUND, body),
            EngineError::NotFound(m) if m == "Requested entity was not found."
        );
        assert_matches!(
            status_to_error(StatusCode::FORBIDDEN, "{}"),
            EngineError::PermissionDenied(_)
        );
        assert_matches!(
            status_to_error(StatusCode::BAD_REQUEST, "not json"),
            EngineError::InvalidArgument(_)
        );
        assert_matches!(
            status_to_error(StatusCode::SERVICE_UNAVAILABLE, "{}"),
            EngineError::Unavailable(_)
        );
    }
}
