use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Recommendations,
    services::RecommendationService,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Google Books edition, IMDb title, or Spotify track link
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub result: Recommendations,
    pub generated_at: DateTime<Utc>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(service): State<Arc<RecommendationService>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    if request.link.trim().is_empty() {
        return Err(AppError::InvalidInput("Link cannot be empty".to_string()));
    }

    tracing::debug!(%request_id, link = %request.link, "Recommendation requested");

    let result = service.recommend_from_link(&request.link).await?;
    Ok(Json(RecommendationResponse {
        result,
        generated_at: Utc::now(),
    }))
}
