use axum::Json;
use sf_api_types::{FacetMergeRequest, FacetMergeResponse};
use sf_facets::{RefinementState, merge_category_tree, merge_facets};

use crate::{ApiResult, bad_request};

pub(crate) async fn facets_merge(
    Json(request): Json<FacetMergeRequest>,
) -> ApiResult<FacetMergeResponse> {
    if request
        .fresh
        .iter()
        .chain(request.previous.iter())
        .any(|facet| facet.name.trim().is_empty())
    {
        return Err(bad_request("facet name is required"));
    }

    let state = RefinementState::from_selected(&request.selected);
    let facets = merge_facets(&request.previous, &request.fresh, &state);

    let categories = match (request.cached_categories, request.fresh_categories) {
        (Some(cached), Some(fresh)) => Some(merge_category_tree(&cached, &fresh)),
        (cached, fresh) => fresh.or(cached),
    };

    Ok(Json(FacetMergeResponse {
        facets,
        refinements: state.to_refinements(),
        categories,
    }))
}
