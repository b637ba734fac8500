use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::AppError;
use crate::relay::RelayError;
use crate::state::SharedState;

const CACHE_CONTROL: &str = "public, max-age=3600";
const FETCH_FAILED: &str = "Nie udało się pobrać obrazu";

#[derive(Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::InvalidUrl(msg) => {
                tracing::debug!("Rejected image url: {msg}");
                AppError::BadRequest("Nieprawidłowy adres URL obrazu".to_string())
            }
            RelayError::Status(status) => AppError::Upstream(status, FETCH_FAILED.to_string()),
            RelayError::Timeout => AppError::Upstream(
                StatusCode::GATEWAY_TIMEOUT,
                "Przekroczono czas oczekiwania na obraz".to_string(),
            ),
            RelayError::TooLarge { limit } => AppError::Upstream(
                StatusCode::BAD_GATEWAY,
                format!("Obraz przekracza dopuszczalny rozmiar ({limit} B)"),
            ),
            RelayError::Transport(msg) => {
                tracing::warn!("Image fetch failed: {msg}");
                AppError::Upstream(StatusCode::BAD_GATEWAY, FETCH_FAILED.to_string())
            }
        }
    }
}

pub async fn proxy(
    State(state): State<SharedState>,
    query: Result<Query<ProxyQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;

    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Parametr url jest wymagany".to_string()))?;

    let image = state.relay.fetch(&url).await?;

    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(crate::relay::DEFAULT_CONTENT_TYPE));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
            (
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ),
        ],
        image.bytes,
    )
        .into_response())
}
