use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{response::ApiError, AppState};
use crate::core::{
    entitlement::Entitlement, history::HistoryView, plans::all_plans, tools::ToolsPanel,
    ConversionCategory, ConversionRequest, SubscriptionPlan, UploadedFile,
};
use crate::utils::error::{ConvertError, Result};

pub async fn convert_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Response, ApiError> {
    let user_id = state
        .identity
        .resolve(&headers)
        .ok_or(ConvertError::Unauthenticated)?;

    let entitlement = state.service.entitlement_for(&user_id).await?;

    let multipart = multipart.map_err(|e| ConvertError::MalformedForm {
        message: e.body_text(),
    })?;
    let body_limit = state.max_body_bytes as u64;
    let request = read_conversion_form(multipart, &entitlement, body_limit).await?;

    let converted = state
        .service
        .convert(&user_id, &entitlement, request)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", converted.file_name);
    Ok((
        [
            (CONTENT_TYPE, converted.content_type),
            (CONTENT_DISPOSITION, disposition),
        ],
        converted.data,
    )
        .into_response())
}

/// Collects the `file`, `outputFormat` and `conversionType` parts. Unknown parts are skipped.
/// A body cut off at the transport limit is reported as a size error for the caller's plan.
pub async fn read_conversion_form(
    mut multipart: Multipart,
    entitlement: &Entitlement,
    body_limit: u64,
) -> Result<ConversionRequest> {
    let oversized = |e: MultipartError| -> ConvertError {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::info!(limit = body_limit, "Upload hit the request body limit");
            ConvertError::SizeExceeded {
                limit_label: entitlement.size_limit_label().to_string(),
                size_bytes: body_limit,
            }
        } else {
            ConvertError::from(e)
        }
    };
    let mut request = ConversionRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(oversized)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(oversized)?.to_vec();
                request.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            "outputFormat" => {
                request.output_format = Some(field.text().await.map_err(oversized)?)
            }
            "conversionType" => {
                request.conversion_type = Some(field.text().await.map_err(oversized)?)
            }
            other => tracing::debug!("Ignoring form field {}", other),
        }
    }

    Ok(request)
}

pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> std::result::Result<Json<HistoryView>, ApiError> {
    let user_id = state.identity.resolve(&headers);
    let view = state.history.load(user_id.as_ref()).await?;
    Ok(Json(view))
}

pub async fn entitlement_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> std::result::Result<Json<Entitlement>, ApiError> {
    let user_id = state
        .identity
        .resolve(&headers)
        .ok_or(ConvertError::Unauthenticated)?;
    Ok(Json(state.service.entitlement_for(&user_id).await?))
}

pub async fn plans_handler() -> Json<&'static [SubscriptionPlan]> {
    Json(all_plans())
}

#[derive(Debug, Deserialize)]
pub struct ToolsQuery {
    pub category: Option<String>,
}

pub async fn tools_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ToolsQuery>,
) -> std::result::Result<Html<String>, ApiError> {
    let entitlement = match state.identity.resolve(&headers) {
        Some(user_id) => state.service.entitlement_for(&user_id).await?,
        None => Entitlement::from_subscription(None),
    };
    let category = query
        .category
        .as_deref()
        .and_then(ConversionCategory::parse)
        .unwrap_or_default();

    let mut panel = ToolsPanel::new(entitlement, state.ad_network.clone());
    Ok(Html(panel.render(category)))
}

pub async fn health_handler() -> &'static str {
    "OK"
}
