use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::{Html, Response},
    Json,
};
use tracing::debug;

use crate::render::{Page, PageRequest, Tab};
use crate::snapshot;
use crate::types::Snapshot;
use crate::webui::error::{ApiError, ApiResult};

use super::{assets, AppState};

/// The entry document: the whole dashboard, rendered from a fresh read of
/// the snapshot.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(request): Query<PageRequest>,
) -> ApiResult<Html<String>> {
    let snapshot = snapshot::load_async(&state.snapshot_path).await;
    let page = Page::build(state.markdown.as_ref(), snapshot.as_ref(), &request);
    let html = page.to_html().map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Html(html))
}

/// A single tab's pane, for the page script to swap in without a reload.
pub async fn view(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<String>,
    Query(mut request): Query<PageRequest>,
) -> ApiResult<Html<String>> {
    let tab = Tab::from_id(&tab_id)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown view '{tab_id}'")))?;
    request.tab = Some(tab.id().to_string());

    let snapshot = snapshot::load_async(&state.snapshot_path).await;
    let page = Page::build(state.markdown.as_ref(), snapshot.as_ref(), &request);
    let html = page
        .view_html(tab)
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Html(html))
}

pub async fn api_snapshot(State(state): State<Arc<AppState>>) -> ApiResult<Json<Snapshot>> {
    let snapshot = snapshot::load_async(&state.snapshot_path)
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;
    Ok(Json(snapshot))
}

/// Everything else is a static file.
pub async fn asset(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    debug!(path = %uri.path(), "Serving asset");
    assets::serve(&state.web_dir, uri.path()).await
}
