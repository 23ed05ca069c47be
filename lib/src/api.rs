use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::catalog::{normalize_listing, Catalog, CategoryDescriptor, QuestionTypeDescriptor};
use crate::data::QuestionRecord;
use crate::error::UploadError;

pub const QUESTION_TYPES_PATH: &str = "question-types";
pub const CATEGORIES_PATH: &str = "categories";
pub const BULK_CREATE_PATH: &str = "questions/bulk";

const GENERIC_FAILURE: &str = "Failed to upload questions";

/// Outcome of an accepted bulk upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadSummary {
    pub created: usize,
    pub request_id: Uuid,
}

impl UploadSummary {
    pub fn message(&self) -> String {
        format!("{} questions added", self.created)
    }
}

#[derive(Deserialize, Debug, Default)]
struct ApiResponse {
    success: Option<bool>,
    #[serde(default)]
    data: Value,
    message: Option<String>,
    detail: Option<Value>,
}

impl ApiResponse {
    fn error_message(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(describe_detail)
            .or_else(|| self.message.clone().filter(|message| !message.trim().is_empty()))
    }

    fn created(&self, submitted: usize) -> usize {
        match &self.data {
            Value::Array(items) => items.len(),
            Value::Object(object) => ["created", "count", "inserted"]
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_u64))
                .map(|count| count as usize)
                .unwrap_or(submitted),
            _ => submitted,
        }
    }
}

/// Renders an error `detail` that is either a string or a list of
/// `{loc, msg}` field errors.
fn describe_detail(detail: &Value) -> Option<String> {
    match detail {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(errors) => {
            let parts: Vec<String> = errors.iter().filter_map(describe_field_error).collect();

            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Object(_) => describe_field_error(detail),
        _ => None,
    }
}

fn describe_field_error(error: &Value) -> Option<String> {
    match error {
        Value::String(text) => Some(text.clone()),
        Value::Object(object) => {
            let message = object
                .get("msg")
                .or_else(|| object.get("message"))
                .and_then(Value::as_str)?;
            let location = object.get("loc").map(|loc| match loc {
                Value::Array(parts) => parts
                    .iter()
                    .map(|part| match part {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("."),
                Value::String(text) => text.clone(),
                other => other.to_string(),
            });

            Some(match location {
                Some(location) if !location.is_empty() => format!("{location}: {message}"),
                _ => message.to_owned(),
            })
        }
        _ => None,
    }
}

/// Client for the question service endpoints the uploader talks to.
#[derive(Clone, Debug)]
pub struct QuestionApi {
    client: Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl QuestionApi {
    pub fn new(mut base_url: Url, token: Option<SecretString>) -> Result<Self, UploadError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("question-uploader/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, UploadError> {
        let url = self.base_url.join(path)?;
        let request = self.client.request(method, url);

        Ok(match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        })
    }

    pub async fn fetch_question_types(&self) -> Result<Vec<QuestionTypeDescriptor>, UploadError> {
        let listing = self.fetch_listing(QUESTION_TYPES_PATH).await?;

        Ok(normalize_listing(listing)?)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<CategoryDescriptor>, UploadError> {
        let listing = self.fetch_listing(CATEGORIES_PATH).await?;

        Ok(normalize_listing(listing)?)
    }

    pub async fn fetch_catalog(&self) -> Result<Catalog, UploadError> {
        let (question_types, categories) =
            tokio::try_join!(self.fetch_question_types(), self.fetch_categories())?;

        tracing::info!(
            question_types = question_types.len(),
            categories = categories.len(),
            "Fetched question catalog"
        );

        Ok(Catalog::new(question_types, categories))
    }

    async fn fetch_listing(&self, path: &str) -> Result<Value, UploadError> {
        let response = self.request(Method::GET, path)?.send().await?;

        if !response.status().is_success() {
            return Err(rejection(response, "Failed to load question catalog").await);
        }

        Ok(response.json().await?)
    }

    /// Posts the whole batch in one request.
    ///
    /// The batch succeeds or fails as a unit; nothing is retried.
    pub async fn create_questions_bulk(
        &self,
        records: &[QuestionRecord],
    ) -> Result<UploadSummary, UploadError> {
        let request_id = Uuid::new_v4();

        tracing::info!(%request_id, count = records.len(), "Submitting question batch");

        let response = self
            .request(Method::POST, BULK_CREATE_PATH)?
            .header("X-Request-Id", request_id.to_string())
            .json(records)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = rejection(response, GENERIC_FAILURE).await;
            tracing::warn!(%request_id, "Question batch rejected: {}", err);

            return Err(err);
        }

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let api_response: ApiResponse = serde_json::from_slice(&body).unwrap_or_default();

        if api_response.success == Some(false) {
            let message = api_response
                .error_message()
                .unwrap_or_else(|| GENERIC_FAILURE.to_owned());
            tracing::warn!(%request_id, "Question batch rejected: {}", message);

            return Err(UploadError::Rejected { status, message });
        }

        let summary = UploadSummary {
            created: api_response.created(records.len()),
            request_id,
        };
        tracing::info!(%request_id, created = summary.created, "Question batch accepted");

        Ok(summary)
    }

    /// Submits converted questions, refusing an empty batch before any request
    /// is made.
    pub async fn submit(&self, records: &[QuestionRecord]) -> Result<UploadSummary, UploadError> {
        if records.is_empty() {
            return Err(UploadError::NoValidQuestions);
        }

        self.create_questions_bulk(records).await
    }
}

/// Fails fast when there is nothing to validate rows against.
pub fn ensure_catalog(catalog: &Catalog) -> Result<(), UploadError> {
    if catalog.is_empty() {
        return Err(UploadError::MissingCatalog);
    }

    Ok(())
}

async fn rejection(response: Response, fallback: &str) -> UploadError {
    let status = response.status().as_u16();
    let message = match response.bytes().await {
        Ok(body) => serde_json::from_slice::<ApiResponse>(&body)
            .ok()
            .and_then(|api_response| api_response.error_message()),
        Err(_) => None,
    };

    UploadError::Rejected {
        status,
        message: message.unwrap_or_else(|| fallback.to_owned()),
    }
}
