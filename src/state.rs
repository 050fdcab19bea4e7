// src/state.rs
//
// The state machine behind every session: a pure reducer over immutable
// `AppState` snapshots, plus the in-memory store that serializes all
// mutations through a single entry point. Last write wins; there is no
// request correlation, so a stale in-flight response overwrites newer state
// exactly as the original front-end behaved.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::catalog;
use crate::errors::InmueblarError;
use crate::models::{AppState, CostAnalysis, EncodedImage, ImageSource, TransformationStyle};

/// One user action or gateway outcome, folded into the snapshot.
#[derive(Debug, Clone)]
pub enum Action {
    ImageUploaded(EncodedImage),
    AnalysisStarted,
    AnalysisFinished(CostAnalysis),
    AnalysisFailed,
    StyleSelected(TransformationStyle),
    GenerationStarted,
    GenerationFinished(EncodedImage),
    GenerationFailed,
    DemoLoaded,
    Reset,
}

/// Produces the next snapshot. Never mutates in place; callers replace the
/// stored state with the returned value atomically.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::ImageUploaded(image) => {
            next.original_image = Some(ImageSource::Inline(image));
            next.generated_image = None;
            next.analysis = None;
            next.selected_style = TransformationStyle::Original;
        }
        Action::AnalysisStarted => {
            next.analyzing = true;
        }
        Action::AnalysisFinished(analysis) => {
            next.analysis = Some(analysis);
            next.analyzing = false;
        }
        Action::AnalysisFailed => {
            // The prior analysis (none or stale) is preserved untouched.
            next.analyzing = false;
        }
        Action::StyleSelected(style) => {
            next.selected_style = style;
            if style == TransformationStyle::Original {
                next.generated_image = None;
            }
        }
        Action::GenerationStarted => {
            next.generating = true;
        }
        Action::GenerationFinished(image) => {
            next.generated_image = Some(image);
            next.generating = false;
        }
        Action::GenerationFailed => {
            next.generating = false;
        }
        Action::DemoLoaded => {
            next.analysis = Some(catalog::demo_analysis());
            if next.original_image.is_none() {
                next.original_image =
                    Some(ImageSource::Remote(catalog::DEMO_IMAGE_URL.to_string()));
            }
        }
        Action::Reset => {
            next.original_image = None;
            next.generated_image = None;
            next.analysis = None;
        }
    }

    next.updated_at = Utc::now();
    next
}

/// In-memory session registry. Sessions are ephemeral; nothing is persisted.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, AppState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(&self) -> (Uuid, AppState) {
        let id = Uuid::new_v4();
        let state = AppState::new();
        self.sessions.lock().unwrap().insert(id, state.clone());
        (id, state)
    }

    pub fn get(&self, id: Uuid) -> Result<AppState, InmueblarError> {
        self.sessions
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(InmueblarError::SessionNotFound(id))
    }

    /// Reduces the current snapshot and stores the result in one step. This
    /// is the only way session state changes.
    pub fn apply(&self, id: Uuid, action: Action) -> Result<AppState, InmueblarError> {
        let mut sessions = self.sessions.lock().unwrap();
        let state = sessions
            .get(&id)
            .ok_or(InmueblarError::SessionNotFound(id))?;
        let next = reduce(state, action);
        sessions.insert(id, next.clone());
        Ok(next)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg() -> EncodedImage {
        EncodedImage::new("image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0])
    }

    fn uploaded_state() -> AppState {
        reduce(&AppState::new(), Action::ImageUploaded(jpeg()))
    }

    #[test]
    fn upload_resets_derived_state() {
        let mut state = AppState::new();
        state.generated_image = Some(jpeg());
        state.analysis = Some(catalog::demo_analysis());
        state.selected_style = TransformationStyle::Modern;

        let next = reduce(&state, Action::ImageUploaded(jpeg()));

        assert!(next.generated_image.is_none());
        assert!(next.analysis.is_none());
        assert_eq!(next.selected_style, TransformationStyle::Original);
        assert!(next.original_image.is_some());
    }

    #[test]
    fn analysis_success_clears_flag_and_stores_result() {
        let state = reduce(&uploaded_state(), Action::AnalysisStarted);
        assert!(state.analyzing);

        let next = reduce(&state, Action::AnalysisFinished(catalog::demo_analysis()));
        assert!(!next.analyzing);
        assert_eq!(next.analysis.unwrap().total_cost_usd, 1_800.0);
    }

    #[test]
    fn analysis_failure_clears_flag_and_keeps_prior_analysis() {
        let state = reduce(&uploaded_state(), Action::AnalysisStarted);
        let next = reduce(&state, Action::AnalysisFailed);
        assert!(!next.analyzing);
        assert!(next.analysis.is_none());

        // A previous result survives a later failed attempt.
        let with_result = reduce(&state, Action::AnalysisFinished(catalog::demo_analysis()));
        let after_failure = reduce(
            &reduce(&with_result, Action::AnalysisStarted),
            Action::AnalysisFailed,
        );
        assert!(after_failure.analysis.is_some());
    }

    #[test]
    fn selecting_original_clears_generated_image() {
        let mut state = uploaded_state();
        state.generated_image = Some(jpeg());
        state.selected_style = TransformationStyle::Scandinavian;

        let next = reduce(&state, Action::StyleSelected(TransformationStyle::Original));
        assert!(next.generated_image.is_none());
        assert_eq!(next.selected_style, TransformationStyle::Original);
    }

    #[test]
    fn selecting_non_original_keeps_generated_until_replaced() {
        let mut state = uploaded_state();
        state.generated_image = Some(jpeg());

        let next = reduce(&state, Action::StyleSelected(TransformationStyle::Industrial));
        assert!(next.generated_image.is_some());
        assert_eq!(next.selected_style, TransformationStyle::Industrial);
    }

    #[test]
    fn generation_failure_preserves_previous_image() {
        let previous = EncodedImage::new("image/png", vec![1, 2, 3]);
        let mut state = uploaded_state();
        state.generated_image = Some(previous.clone());

        let busy = reduce(&state, Action::GenerationStarted);
        assert!(busy.generating);

        let next = reduce(&busy, Action::GenerationFailed);
        assert!(!next.generating);
        assert_eq!(next.generated_image, Some(previous));
    }

    #[test]
    fn demo_fills_analysis_and_placeholder_image() {
        let next = reduce(&AppState::new(), Action::DemoLoaded);
        assert!(next.analysis.is_some());
        assert_eq!(
            next.original_image,
            Some(ImageSource::Remote(catalog::DEMO_IMAGE_URL.to_string()))
        );
    }

    #[test]
    fn demo_keeps_an_already_uploaded_image() {
        let state = uploaded_state();
        let next = reduce(&state, Action::DemoLoaded);
        assert_eq!(next.original_image, state.original_image);
        assert!(next.analysis.is_some());
    }

    #[test]
    fn reset_returns_to_initial_values() {
        let state = reduce(&uploaded_state(), Action::DemoLoaded);
        let next = reduce(&state, Action::Reset);
        assert!(next.original_image.is_none());
        assert!(next.generated_image.is_none());
        assert!(next.analysis.is_none());
    }

    #[test]
    fn store_round_trips_through_apply() {
        let store = SessionStore::new();
        let (id, initial) = store.create();
        assert!(initial.original_image.is_none());

        let state = store.apply(id, Action::ImageUploaded(jpeg())).unwrap();
        assert!(state.original_image.is_some());
        assert_eq!(
            store.get(id).unwrap().original_image,
            state.original_image
        );
    }

    #[test]
    fn store_rejects_unknown_sessions() {
        let store = SessionStore::new();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.get(missing),
            Err(InmueblarError::SessionNotFound(_))
        ));
        assert!(store.apply(missing, Action::Reset).is_err());
    }
}
