use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use sf_api_types::PagingResponse;
use sf_format::format_paging_summary;
use sf_paging::{PageRange, total_pages};
use std::sync::Arc;
use tracing::debug;

use crate::{ApiResult, AppState, bad_request};

#[derive(Debug, Deserialize)]
pub(crate) struct PagingQuery {
    current_page: Option<u32>,
    total_pages: Option<u32>,
    total_items: Option<usize>,
    page_size: Option<usize>,
    max_buttons: Option<u32>,
}

/// Page items for a pagination control.
///
/// Either `total_pages` or `total_items` (with `page_size`) describes the
/// result set; the latter also yields a "start-end of total" summary. The
/// current page is clamped into range here, before generation, and
/// `max_buttons` is capped by the configured limit so the item list stays
/// small whatever the page count.
pub(crate) async fn paging(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PagingQuery>,
) -> ApiResult<PagingResponse> {
    let (pages, summary_input) = match (query.total_pages, query.total_items) {
        (_, Some(total_items)) => {
            let page_size = query
                .page_size
                .filter(|size| *size > 0)
                .ok_or_else(|| bad_request("page_size must be greater than 0 when total_items is set"))?;
            (total_pages(total_items, page_size), Some((page_size, total_items)))
        }
        (Some(total), None) => (total, None),
        (None, None) => return Err(bad_request("total_pages or total_items is required")),
    };

    let max_buttons = query.max_buttons.unwrap_or(state.config.max_page_buttons);
    if max_buttons > state.config.max_page_buttons_limit {
        return Err(bad_request(&format!(
            "max_buttons must not exceed {}",
            state.config.max_page_buttons_limit
        )));
    }
    let range = PageRange::clamped(query.current_page.unwrap_or(1), pages, max_buttons);
    let current_page = range.current_page();

    debug!(current_page, total_pages = pages, max_buttons, "generated page range");

    Ok(Json(PagingResponse {
        current_page,
        total_pages: pages,
        items: range.into_items(),
        summary: summary_input
            .map(|(page_size, total_items)| format_paging_summary(current_page, page_size, total_items)),
    }))
}
