//! Designer endpoint - opaque pass-through to the engine's designer

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use super::state::AppState;
use super::types::{ParamsRejection, RequestParams};
use crate::domain::DesignerRequest;

const DOWNLOAD_FILE_NAME: &str = "schema.xml";

/// `GET|POST /designerapi`
///
/// Failures are logged and answered with an empty 404.
pub async fn designer_api(
    State(state): State<AppState>,
    params: Result<RequestParams, ParamsRejection>,
) -> Response {
    let params = match params {
        Ok(params) => params,
        Err(e) => {
            error!(error = %e, "Designer request could not be read");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let file = if params.is_post() { params.file.clone() } else { None };
    let request = DesignerRequest::new(params.merged()).with_file(file);
    let download = request.is_download();

    match state.engine.engine().designer_api(request).await {
        Ok(body) if download => (
            [
                (header::CONTENT_TYPE, "application/xml".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", DOWNLOAD_FILE_NAME),
                ),
            ],
            body,
        )
            .into_response(),
        Ok(body) => ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response(),
        Err(e) => {
            error!(error = %e, "Designer request failed");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
