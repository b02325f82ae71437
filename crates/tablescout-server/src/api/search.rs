use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tablescout_core::SearchCenter;
use tablescout_search::{NearbyData, NearbyRequest, RealtimeOutcome, RealtimeSearch};

use crate::middleware::RequestId;

use super::{map_search_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_INITIAL_RADIUS_KM: f64 = 2.0;
const DEFAULT_MAX_RADIUS_KM: f64 = 10.0;
const DEFAULT_MIN_RESULTS: i64 = 3;

#[derive(Debug, Deserialize)]
pub(super) struct RealtimeSearchBody {
    pub latitude: f64,
    pub longitude: f64,
    pub initial_radius: Option<f64>,
    pub max_radius: Option<f64>,
    pub min_results: Option<i64>,
    #[serde(default)]
    pub buffer_zones: bool,
    pub buffer_radius_adjustment: Option<f64>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub limit: Option<i64>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub follow_user_location: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyBody {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub buffer_radius: Option<f64>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub real_time: bool,
}

/// The nearby envelope carries `platforms_searched` beside `data`.
#[derive(Debug, Serialize)]
pub(super) struct NearbyResponse {
    pub success: bool,
    pub data: NearbyData,
    pub platforms_searched: Vec<String>,
    pub meta: ResponseMeta,
}

fn reject_body(request_id: String, rejection: &JsonRejection) -> ApiError {
    ApiError::new(request_id, "validation_error", rejection.body_text())
}

pub(super) async fn realtime_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<RealtimeSearchBody>, JsonRejection>,
) -> Result<Json<ApiResponse<RealtimeOutcome>>, ApiError> {
    let Json(body) = payload.map_err(|e| reject_body(req_id.0.clone(), &e))?;

    tracing::info!(
        user_id = body.user_id.as_deref(),
        session_id = body.session_id.as_deref(),
        follow_user_location = body.follow_user_location,
        "realtime search requested"
    );

    let limit = normalize_limit(body.limit);
    let default_min = DEFAULT_MIN_RESULTS.min(i64::try_from(limit).unwrap_or(i64::MAX));
    let request = RealtimeSearch {
        center: SearchCenter {
            latitude: body.latitude,
            longitude: body.longitude,
        },
        initial_radius_km: body.initial_radius.unwrap_or(DEFAULT_INITIAL_RADIUS_KM),
        max_radius_km: body.max_radius.unwrap_or(DEFAULT_MAX_RADIUS_KM),
        min_results: body.min_results.unwrap_or(default_min),
        buffer_radius_km: body.buffer_radius_adjustment,
        include_zones: body.buffer_zones,
        platforms: body.platforms,
        limit,
    };

    let outcome = state
        .engine
        .realtime(&request)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::ok(outcome, req_id.0)))
}

pub(super) async fn nearby_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<NearbyBody>, JsonRejection>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| reject_body(req_id.0.clone(), &e))?;

    let request = NearbyRequest {
        center: SearchCenter {
            latitude: body.latitude,
            longitude: body.longitude,
        },
        radius_km: body.radius,
        buffer_radius_km: body.buffer_radius,
        platforms: body.platforms,
        limit: normalize_limit(body.limit),
        real_time: body.real_time,
    };

    let outcome = state
        .engine
        .nearby(&request)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(NearbyResponse {
        success: true,
        data: outcome.data,
        platforms_searched: outcome.platforms_searched,
        meta: ResponseMeta::new(req_id.0),
    }))
}
