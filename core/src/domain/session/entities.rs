use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_uuid_v7},
    image::entities::PendingImage,
    recipe::entities::AnalysisResult,
    session::value_objects::{RecipeTicket, SessionSnapshot},
};

pub const ANALYSIS_FALLBACK_MESSAGE: &str = "Failed to analyze images. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    Idle,
    Analyzing,
    Success,
    Error,
}

/// State of one user's kitchen session.
///
/// Status, result and error only change together through the transition
/// methods below. `epoch` is bumped whenever the session moves on in a way
/// that makes an in-flight request stale; completions carrying an older
/// epoch are discarded.
#[derive(Debug)]
pub struct KitchenSession {
    pub id: Uuid,
    status: AppStatus,
    images: Vec<PendingImage>,
    result: Option<AnalysisResult>,
    error: Option<String>,
    generating_more: bool,
    epoch: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for KitchenSession {
    fn default() -> Self {
        Self::new()
    }
}

impl KitchenSession {
    pub fn new() -> Self {
        let now = Utc::now();

        Self {
            id: generate_uuid_v7(),
            status: AppStatus::Idle,
            images: Vec::new(),
            result: None,
            error: None,
            generating_more: false,
            epoch: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> AppStatus {
        self.status
    }

    pub fn images(&self) -> &[PendingImage] {
        &self.images
    }

    pub fn image(&self, image_id: Uuid) -> Option<&PendingImage> {
        self.images.iter().find(|image| image.id == image_id)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_generating_more(&self) -> bool {
        self.generating_more
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            status: self.status,
            images: self.images.iter().map(PendingImage::summary).collect(),
            result: self.result.clone(),
            error: self.error.clone(),
            generating_more: self.generating_more,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn ensure_accepts_images(&self) -> Result<(), CoreError> {
        if self.status == AppStatus::Analyzing {
            return Err(CoreError::Conflict(
                "images cannot be added while an analysis is running".to_string(),
            ));
        }
        Ok(())
    }

    /// Append freshly stored images. Leaving `success` or `error` drops the
    /// previous result and error.
    pub fn add_images(&mut self, images: Vec<PendingImage>) -> Result<(), CoreError> {
        self.ensure_accepts_images()?;

        self.images.extend(images);
        if matches!(self.status, AppStatus::Success | AppStatus::Error) {
            self.status = AppStatus::Idle;
            self.result = None;
            self.error = None;
            self.invalidate_in_flight();
        }
        self.touch();
        Ok(())
    }

    /// Remove an image, handing it back so its handle can be released.
    /// Unknown ids are ignored. Refused while a request holds the image set.
    pub fn remove_image(&mut self, image_id: Uuid) -> Result<Option<PendingImage>, CoreError> {
        if self.status == AppStatus::Analyzing || self.generating_more {
            return Err(CoreError::Conflict(
                "images cannot be removed while recipes are being requested".to_string(),
            ));
        }

        let Some(index) = self.images.iter().position(|image| image.id == image_id) else {
            return Ok(None);
        };
        self.touch();
        Ok(Some(self.images.remove(index)))
    }

    /// Enter `analyzing`. Returns `None` when there is nothing to analyze.
    pub fn begin_analysis(&mut self) -> Result<Option<RecipeTicket>, CoreError> {
        match self.status {
            AppStatus::Analyzing => {
                return Err(CoreError::Conflict(
                    "an analysis is already running".to_string(),
                ));
            }
            AppStatus::Success => {
                return Err(CoreError::Conflict(
                    "recipes are already available; edit the images or reset first".to_string(),
                ));
            }
            AppStatus::Idle | AppStatus::Error => {}
        }

        if self.images.is_empty() {
            return Ok(None);
        }

        self.status = AppStatus::Analyzing;
        self.error = None;
        self.result = None;
        self.touch();

        Ok(Some(self.ticket(Vec::new())))
    }

    /// Apply the outcome of an analysis. Returns `false` when the outcome
    /// was stale and has been discarded.
    pub fn complete_analysis(
        &mut self,
        epoch: u64,
        outcome: Result<AnalysisResult, CoreError>,
    ) -> bool {
        if epoch != self.epoch || self.status != AppStatus::Analyzing {
            return false;
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
                self.status = AppStatus::Success;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(failure_message(&e));
                self.status = AppStatus::Error;
            }
        }
        self.touch();
        true
    }

    /// Start fetching more recipes, excluding every title already held.
    /// Returns `None` when there are no images or no result yet.
    pub fn begin_generate_more(&mut self) -> Result<Option<RecipeTicket>, CoreError> {
        if self.images.is_empty() {
            return Ok(None);
        }
        let Some(result) = self.result.as_ref() else {
            return Ok(None);
        };
        if self.status != AppStatus::Success {
            return Err(CoreError::Conflict(
                "more recipes can only be generated after a successful analysis".to_string(),
            ));
        }
        if self.generating_more {
            return Err(CoreError::Conflict(
                "more recipes are already being generated".to_string(),
            ));
        }

        let exclude_titles = result.recipe_titles();
        self.generating_more = true;
        self.touch();

        Ok(Some(self.ticket(exclude_titles)))
    }

    /// Apply the outcome of a generate-more request. The flag is cleared
    /// either way; a failure is handed back without leaving `success`.
    /// Returns `Ok(false)` for a stale outcome.
    pub fn complete_generate_more(
        &mut self,
        epoch: u64,
        outcome: Result<AnalysisResult, CoreError>,
    ) -> Result<bool, CoreError> {
        if epoch != self.epoch {
            return Ok(false);
        }

        self.generating_more = false;
        self.touch();

        let more = outcome?;
        if let Some(result) = self.result.as_mut() {
            result.append_recipes(more);
        }
        Ok(true)
    }

    /// Back to an empty `idle` session. The drained images must be released
    /// by the caller.
    pub fn reset(&mut self) -> Vec<PendingImage> {
        self.status = AppStatus::Idle;
        self.result = None;
        self.error = None;
        self.invalidate_in_flight();
        self.touch();

        std::mem::take(&mut self.images)
    }

    /// Leave `success` for `idle` so the image set can be edited. The result
    /// stays in memory until the next analysis replaces it.
    pub fn edit_images(&mut self) {
        if self.status != AppStatus::Success {
            return;
        }

        self.status = AppStatus::Idle;
        self.invalidate_in_flight();
        self.touch();
    }

    /// Untouched since `cutoff` and not waiting on a request.
    pub fn is_expired(&self, cutoff: DateTime<Utc>) -> bool {
        self.updated_at < cutoff && self.status != AppStatus::Analyzing && !self.generating_more
    }

    fn ticket(&self, exclude_titles: Vec<String>) -> RecipeTicket {
        RecipeTicket {
            epoch: self.epoch,
            sources: self.images.iter().map(PendingImage::source).collect(),
            exclude_titles,
        }
    }

    fn invalidate_in_flight(&mut self) {
        self.epoch += 1;
        self.generating_more = false;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// User-facing message for a failed analysis.
pub fn failure_message(error: &CoreError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        ANALYSIS_FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        image::entities::ImageHandle,
        recipe::entities::{Difficulty, Recipe},
    };

    fn pending(name: &str) -> PendingImage {
        let id = generate_uuid_v7();
        PendingImage::new(
            id,
            ImageHandle::for_image(id),
            name.to_string(),
            "image/jpeg".to_string(),
            4,
            "00".to_string(),
        )
    }

    fn result(ingredients: &[&str], titles: &[&str]) -> AnalysisResult {
        AnalysisResult {
            identified_ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            recipes: titles
                .iter()
                .map(|title| Recipe {
                    title: title.to_string(),
                    description: String::new(),
                    prep_time: "5 mins".to_string(),
                    cook_time: "5 mins".to_string(),
                    difficulty: Difficulty::Medium,
                    calories: "200".to_string(),
                    ingredients: vec![],
                    instructions: vec![],
                    tags: vec![],
                })
                .collect(),
        }
    }

    fn successful_session() -> KitchenSession {
        let mut session = KitchenSession::new();
        session.add_images(vec![pending("fridge.jpg")]).unwrap();
        let ticket = session.begin_analysis().unwrap().unwrap();
        assert!(session.complete_analysis(ticket.epoch, Ok(result(&["egg", "flour"], &["Pancakes"]))));
        session
    }

    #[test]
    fn analyze_without_images_is_a_no_op() {
        let mut session = KitchenSession::new();

        assert_eq!(session.begin_analysis().unwrap(), None);
        assert_eq!(session.status(), AppStatus::Idle);
    }

    #[test]
    fn analysis_moves_to_success_with_result() {
        let session = successful_session();

        assert_eq!(session.status(), AppStatus::Success);
        assert_eq!(session.result().unwrap().recipes.len(), 1);
        assert_eq!(session.error(), None);
    }

    #[test]
    fn failed_analysis_moves_to_error_without_result() {
        let mut session = KitchenSession::new();
        session.add_images(vec![pending("a.jpg")]).unwrap();
        let ticket = session.begin_analysis().unwrap().unwrap();

        session.complete_analysis(
            ticket.epoch,
            Err(CoreError::TransportError("connection refused".to_string())),
        );

        assert_eq!(session.status(), AppStatus::Error);
        assert_eq!(session.error(), Some("connection refused"));
        assert!(session.result().is_none());
    }

    #[test]
    fn blank_failure_falls_back_to_generic_message() {
        assert_eq!(
            failure_message(&CoreError::TransportError(String::new())),
            ANALYSIS_FALLBACK_MESSAGE
        );
        assert_eq!(failure_message(&CoreError::EmptyResponse), "No response from AI");
    }

    #[test]
    fn overlapping_analysis_is_rejected() {
        let mut session = KitchenSession::new();
        session.add_images(vec![pending("a.jpg")]).unwrap();
        session.begin_analysis().unwrap().unwrap();

        assert!(matches!(session.begin_analysis(), Err(CoreError::Conflict(_))));
        assert!(matches!(
            session.add_images(vec![pending("b.jpg")]),
            Err(CoreError::Conflict(_))
        ));
        assert_eq!(session.images().len(), 1);
    }

    #[test]
    fn error_state_can_retry_analysis() {
        let mut session = KitchenSession::new();
        session.add_images(vec![pending("a.jpg")]).unwrap();
        let ticket = session.begin_analysis().unwrap().unwrap();
        session.complete_analysis(ticket.epoch, Err(CoreError::EmptyResponse));

        let retry = session.begin_analysis().unwrap();

        assert!(retry.is_some());
        assert_eq!(session.status(), AppStatus::Analyzing);
        assert_eq!(session.error(), None);
    }

    #[test]
    fn adding_images_after_success_clears_result() {
        let mut session = successful_session();

        session.add_images(vec![pending("pantry.jpg")]).unwrap();

        assert_eq!(session.status(), AppStatus::Idle);
        assert!(session.result().is_none());
        assert_eq!(session.images().len(), 2);
    }

    #[test]
    fn remove_image_is_idempotent() {
        let mut session = KitchenSession::new();
        let image = pending("a.jpg");
        let id = image.id;
        session.add_images(vec![image, pending("b.jpg")]).unwrap();

        assert!(session.remove_image(id).unwrap().is_some());
        assert!(session.remove_image(id).unwrap().is_none());
        assert_eq!(session.images().len(), 1);
    }

    #[test]
    fn remove_image_is_refused_while_analyzing() {
        let mut session = KitchenSession::new();
        let image = pending("a.jpg");
        let id = image.id;
        session.add_images(vec![image]).unwrap();
        session.begin_analysis().unwrap();

        let err = session.remove_image(id).unwrap_err();

        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(session.images().len(), 1);
    }

    #[test]
    fn remove_image_is_refused_while_generating_more() {
        let mut session = successful_session();
        let id = session.images()[0].id;
        session.begin_generate_more().unwrap();

        assert!(matches!(session.remove_image(id), Err(CoreError::Conflict(_))));
    }

    #[test]
    fn only_quiet_sessions_expire() {
        let mut session = KitchenSession::new();
        session.add_images(vec![pending("a.jpg")]).unwrap();
        let later = Utc::now() + chrono::Duration::seconds(1);
        let earlier = Utc::now() - chrono::Duration::hours(1);

        assert!(session.is_expired(later));
        assert!(!session.is_expired(earlier));

        session.begin_analysis().unwrap();
        assert!(!session.is_expired(later));
    }

    #[test]
    fn generate_more_excludes_held_titles_and_appends() {
        let mut session = successful_session();

        let ticket = session.begin_generate_more().unwrap().unwrap();
        assert_eq!(ticket.exclude_titles, vec!["Pancakes"]);
        assert!(session.is_generating_more());
        assert!(matches!(session.begin_generate_more(), Err(CoreError::Conflict(_))));

        let applied = session
            .complete_generate_more(ticket.epoch, Ok(result(&["milk"], &["Omelette"])))
            .unwrap();

        assert!(applied);
        assert!(!session.is_generating_more());
        assert_eq!(session.status(), AppStatus::Success);
        let held = session.result().unwrap();
        assert_eq!(held.recipe_titles(), vec!["Pancakes", "Omelette"]);
        assert_eq!(held.identified_ingredients, vec!["egg", "flour"]);
    }

    #[test]
    fn generate_more_failure_keeps_success() {
        let mut session = successful_session();
        let ticket = session.begin_generate_more().unwrap().unwrap();

        let err = session
            .complete_generate_more(ticket.epoch, Err(CoreError::EmptyResponse))
            .unwrap_err();

        assert_eq!(err, CoreError::EmptyResponse);
        assert_eq!(session.status(), AppStatus::Success);
        assert!(!session.is_generating_more());
        assert_eq!(session.result().unwrap().recipes.len(), 1);
    }

    #[test]
    fn generate_more_needs_a_result() {
        let mut session = KitchenSession::new();
        session.add_images(vec![pending("a.jpg")]).unwrap();

        assert_eq!(session.begin_generate_more().unwrap(), None);
        assert!(!session.is_generating_more());
    }

    #[test]
    fn reset_clears_everything_and_discards_in_flight_outcome() {
        let mut session = KitchenSession::new();
        session.add_images(vec![pending("a.jpg"), pending("b.jpg")]).unwrap();
        let ticket = session.begin_analysis().unwrap().unwrap();

        let drained = session.reset();
        let applied = session.complete_analysis(ticket.epoch, Ok(result(&["egg"], &["Pancakes"])));

        assert_eq!(drained.len(), 2);
        assert!(!applied);
        assert_eq!(session.status(), AppStatus::Idle);
        assert!(session.images().is_empty());
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn edit_images_keeps_result_in_memory() {
        let mut session = successful_session();

        session.edit_images();

        assert_eq!(session.status(), AppStatus::Idle);
        assert_eq!(session.result().unwrap().recipes.len(), 1);
        assert_eq!(session.images().len(), 1);
    }

    #[test]
    fn snapshot_serializes_lowercase_status() {
        let session = successful_session();

        let value = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["images"].as_array().unwrap().len(), 1);
        assert_eq!(value["result"]["identifiedIngredients"][0], "egg");
    }
}
