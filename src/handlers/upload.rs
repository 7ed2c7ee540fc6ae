use super::common::{created_response, UploadSummary};
use crate::{errors::ServiceError, import::ImportReport};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Raw bytes of an uploaded table.
///
/// Accepts `multipart/form-data` (the `file` field, or else the first field
/// carrying a filename) or the CSV as the request body itself.
#[derive(Debug, Clone)]
pub struct UploadedTable(pub Bytes);

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

#[async_trait]
impl<S> FromRequest<S> for UploadedTable
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&request) {
            let body = Bytes::from_request(request, state)
                .await
                .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
            return Ok(Self(body));
        }

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
        let mut fallback = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServiceError::BadRequest(e.body_text()))?
        {
            let is_file_field = field.name() == Some("file");
            if !is_file_field && (fallback.is_some() || field.file_name().is_none()) {
                continue;
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
            if is_file_field {
                return Ok(Self(bytes));
            }
            fallback = Some(bytes);
        }
        fallback
            .map(Self)
            .ok_or_else(|| ServiceError::BadRequest("upload carries no file".to_string()))
    }
}

impl IntoResponse for ImportReport {
    fn into_response(self) -> Response {
        match self {
            ImportReport::Inserted(inserted) => (
                StatusCode::OK,
                Json(UploadSummary {
                    status: "ok",
                    inserted,
                }),
            )
                .into_response(),
            ImportReport::Acknowledged => created_response(),
        }
    }
}
