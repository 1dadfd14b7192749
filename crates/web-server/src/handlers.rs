use crate::{error::AppError, AppState};
use analytics::{Projection, RevenueBreakdown, SalesVelocity};
use axum::{
    extract::{Path, State},
    Json,
};
use dashboard::{AccountOverview, EventAnalytics};
use std::sync::Arc;
use uuid::Uuid;

/// # GET /api/events/:event_id/analytics
/// The combined revenue, velocity, and projection view for one event,
/// computed from a single snapshot.
pub async fn get_event_analytics(
    Path(event_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventAnalytics>, AppError> {
    let analytics = state.service.event_analytics(&state.db_repo, event_id).await?;
    Ok(Json(analytics))
}

/// # GET /api/events/:event_id/analytics/revenue
pub async fn get_event_revenue(
    Path(event_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RevenueBreakdown>, AppError> {
    let analytics = state.service.event_analytics(&state.db_repo, event_id).await?;
    Ok(Json(analytics.revenue))
}

/// # GET /api/events/:event_id/analytics/velocity
pub async fn get_event_velocity(
    Path(event_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SalesVelocity>, AppError> {
    let analytics = state.service.event_analytics(&state.db_repo, event_id).await?;
    Ok(Json(analytics.velocity))
}

/// # GET /api/events/:event_id/analytics/projections
pub async fn get_event_projections(
    Path(event_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Projection>, AppError> {
    let analytics = state.service.event_analytics(&state.db_repo, event_id).await?;
    Ok(Json(analytics.projections))
}

/// # GET /api/dashboard/:user_id
/// Account-wide totals, per-event summaries, and the recent-sales feed.
/// Caller identity is established by the auth layer in front of this
/// service; the id arrives here already authorized.
pub async fn get_account_overview(
    Path(user_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<AccountOverview>, AppError> {
    let overview = state.service.account_overview(&state.db_repo, user_id).await?;
    Ok(Json(overview))
}
