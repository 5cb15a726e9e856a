use axum::{
    extract::Extension,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};

use crate::domains::links::export::{render_markdown, EXPORT_FILENAME, EXPORT_LIMIT};
use crate::server::app::AxumAppState;
use crate::server::error::ApiResult;

/// Download the latest links as a Markdown knowledge base.
pub async fn export_markdown_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<impl IntoResponse> {
    let links = state.deps.store.list(EXPORT_LIMIT, 0, None).await?;
    let body = render_markdown(&links);

    Ok((
        [
            (CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILENAME),
            ),
        ],
        body,
    ))
}
