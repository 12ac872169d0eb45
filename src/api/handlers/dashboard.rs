use super::AppState;
use crate::api::models::auth::UserResponse;
use crate::api::models::dashboard::{
    DashboardResponse, InsightsQuery, InsightsResponse, DEFAULT_INSIGHT_LIMIT, MAX_INSIGHT_LIMIT,
};
use crate::auth::SessionUser;
use crate::error::{AppError, Result};
use crate::repositories::{ConnectionRepository, InsightRepository, ProfileRepository};
use axum::{
    extract::{Extension, Query, State},
    Json,
};
use tracing::info;

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<DashboardResponse>> {
    let (profile, connections, insights) = tokio::try_join!(
        ProfileRepository::find(&state.pool, user.id),
        ConnectionRepository::list_for_user(&state.pool, user.id),
        InsightRepository::list_for_user(&state.pool, user.id, DEFAULT_INSIGHT_LIMIT),
    )?;

    info!(
        "Dashboard for {}: {} connections, {} insights",
        user.id,
        connections.len(),
        insights.len()
    );

    Ok(Json(DashboardResponse {
        user: UserResponse::from(user),
        profile,
        connections,
        insights,
    }))
}

pub async fn insights(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<InsightsQuery>,
) -> Result<Json<InsightsResponse>> {
    let limit = insight_limit(query.limit)?;
    let insights = InsightRepository::list_for_user(&state.pool, user.id, limit).await?;
    Ok(Json(InsightsResponse { insights }))
}

fn insight_limit(requested: Option<i64>) -> Result<i64> {
    match requested {
        None => Ok(DEFAULT_INSIGHT_LIMIT),
        Some(n) if (1..=MAX_INSIGHT_LIMIT).contains(&n) => Ok(n),
        Some(_) => Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_INSIGHT_LIMIT
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_limit() {
        assert_eq!(insight_limit(None).unwrap(), 20);
        assert_eq!(insight_limit(Some(1)).unwrap(), 1);
        assert_eq!(insight_limit(Some(100)).unwrap(), 100);
        assert!(insight_limit(Some(0)).is_err());
        assert!(insight_limit(Some(101)).is_err());
        assert!(insight_limit(Some(-5)).is_err());
    }
}
