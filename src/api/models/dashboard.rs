use super::auth::UserResponse;
use crate::repositories::{ConnectionSummary, InsightCard, Profile, RecentUser};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INSIGHT_LIMIT: i64 = 20;
pub const MAX_INSIGHT_LIMIT: i64 = 100;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: UserResponse,
    pub profile: Option<Profile>,
    pub connections: Vec<ConnectionSummary>,
    pub insights: Vec<InsightCard>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<InsightCard>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InsightsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecentUsersResponse {
    pub users: Vec<RecentUser>,
}
