//! HTTP implementation of the query service

use super::types::{QueryAnswer, QueryRequest, FILE_FIELD, QUERY_FIELD, SESSION_FIELD};
use super::{QueryError, QueryService};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// How much of an error body ends up in the error message
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Posts submissions as multipart forms and reads JSON answers
pub struct HttpQueryClient {
    client: Client,
    endpoint: String,
}

impl HttpQueryClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, QueryError> {
        // No request timeout: unresponsive services are left to the transport
        let client = Client::builder()
            .build()
            .map_err(|e| QueryError::invalid_request(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn build_form(request: &QueryRequest) -> Result<Form, QueryError> {
        let mut form = Form::new();

        if let Some(file) = &request.file {
            let part = Part::bytes(file.bytes().to_vec())
                .file_name(file.file_name().to_string())
                .mime_str(file.mime_type())
                .map_err(|e| QueryError::invalid_request(format!("Bad attachment type: {e}")))?;
            form = form.part(FILE_FIELD, part);
        }
        if let Some(query) = &request.query {
            form = form.text(QUERY_FIELD, query.clone());
        }
        if let Some(session_id) = &request.session_id {
            form = form.text(SESSION_FIELD, session_id.clone());
        }

        Ok(form)
    }
}

#[async_trait]
impl QueryService for HttpQueryClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryError> {
        let form = Self::build_form(request)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            has_query = request.query.is_some(),
            has_file = request.file.is_some(),
            has_session = request.session_id.is_some(),
            "Sending query"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| QueryError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
            return Err(QueryError::status(
                status.as_u16(),
                format!("HTTP {status}: {preview}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| QueryError::network(format!("Failed to read response: {e}")))?;

        serde_json::from_slice::<QueryAnswer>(&body)
            .map_err(|e| QueryError::malformed(format!("Unexpected response body: {e}")))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
