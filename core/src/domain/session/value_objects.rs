use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    image::entities::{ImageSource, ImageSummary},
    recipe::entities::AnalysisResult,
    session::entities::AppStatus,
};

/// Everything an in-flight encode-then-request unit needs, detached from the
/// session lock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeTicket {
    pub epoch: u64,
    pub sources: Vec<ImageSource>,
    pub exclude_titles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub status: AppStatus,
    pub images: Vec<ImageSummary>,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    pub generating_more: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
