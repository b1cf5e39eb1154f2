//! Application state.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use sdir_analysis::{
    AnalysisConfig, AnalysisOptions, GeminiClient, SceneDecomposer, ScriptAnalyzer,
};
use sdir_models::SessionStore;
use sdir_render::{RenderClient, RenderConfig, RenderCredentials};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analysis_config: AnalysisConfig,
    /// `None` when no analysis backend is configured.
    pub analyzer: Option<ScriptAnalyzer>,
    pub render: RenderClient,
    session: Arc<RwLock<SessionStore>>,
    render_credentials: Arc<RwLock<RenderCredentials>>,
}

impl AppState {
    /// Create application state backed by Gemini.
    ///
    /// A missing Gemini key is not fatal: the server starts, reports not
    /// ready, and refuses analyses.
    pub fn new(
        config: ApiConfig,
        analysis_config: AnalysisConfig,
        render_config: RenderConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let decomposer: Option<Arc<dyn SceneDecomposer>> = match GeminiClient::new(&analysis_config) {
            Ok(client) => {
                info!(model = client.model(), "Analysis backend configured");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!("Analysis backend not configured: {}", e);
                None
            }
        };

        Self::build(config, analysis_config, render_config, decomposer)
    }

    /// Create application state with an explicit decomposer.
    pub fn with_decomposer(
        config: ApiConfig,
        analysis_config: AnalysisConfig,
        render_config: RenderConfig,
        decomposer: Arc<dyn SceneDecomposer>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::build(config, analysis_config, render_config, Some(decomposer))
    }

    fn build(
        config: ApiConfig,
        analysis_config: AnalysisConfig,
        render_config: RenderConfig,
        decomposer: Option<Arc<dyn SceneDecomposer>>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let options = AnalysisOptions::from(&analysis_config);
        let analyzer = decomposer.map(|d| ScriptAnalyzer::new(d, options));
        let render = RenderClient::new(&render_config)?;
        info!(endpoint = %render.endpoint(), "Render backend configured");

        Ok(Self {
            config,
            analysis_config,
            analyzer,
            render,
            session: Arc::new(RwLock::new(SessionStore::new())),
            render_credentials: Arc::new(RwLock::new(render_config.initial_credentials())),
        })
    }

    /// The configured analyzer.
    pub fn analyzer(&self) -> ApiResult<&ScriptAnalyzer> {
        self.analyzer
            .as_ref()
            .ok_or_else(|| ApiError::unavailable("Analysis backend is not configured"))
    }

    /// Read access to the session. Guards must not be held across an await.
    pub fn session(&self) -> RwLockReadGuard<'_, SessionStore> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the session. Guards must not be held across an await.
    pub fn session_mut(&self) -> RwLockWriteGuard<'_, SessionStore> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the processing flag, or `None` if an analysis is in flight.
    pub fn begin_analysis(&self) -> Option<ProcessingGuard> {
        if self.session_mut().begin_processing() {
            Some(ProcessingGuard {
                session: Arc::clone(&self.session),
            })
        } else {
            None
        }
    }

    /// Snapshot of the current render credentials.
    pub fn render_credentials(&self) -> RenderCredentials {
        self.render_credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the render credentials.
    pub fn update_render_credentials(&self, update: impl FnOnce(&mut RenderCredentials)) -> RenderCredentials {
        let mut credentials = self
            .render_credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut credentials);
        credentials.clone()
    }
}

/// Releases the session processing flag when dropped, including when the
/// request future is cancelled.
pub struct ProcessingGuard {
    session: Arc<RwLock<SessionStore>>,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .end_processing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdir_analysis::testing::StubDecomposer;

    fn state() -> AppState {
        AppState::with_decomposer(
            ApiConfig::default(),
            AnalysisConfig::default(),
            RenderConfig::default(),
            Arc::new(StubDecomposer::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_processing_guard_is_exclusive() {
        let state = state();

        let guard = state.begin_analysis();
        assert!(guard.is_some());
        assert!(state.begin_analysis().is_none());
        assert!(state.session().is_processing());

        drop(guard);
        assert!(!state.session().is_processing());
        assert!(state.begin_analysis().is_some());
    }

    #[test]
    fn test_missing_gemini_key_leaves_analyzer_unset() {
        let state = AppState::new(
            ApiConfig::default(),
            AnalysisConfig::default(),
            RenderConfig::default(),
        )
        .unwrap();
        assert!(state.analyzer().is_err());
    }

    #[test]
    fn test_update_render_credentials() {
        let state = state();
        let updated = state.update_render_credentials(|c| {
            c.set_api_key(Some(" key ".to_string()));
            c.use_proxy = true;
        });
        assert_eq!(updated.api_key(), Some("key"));
        assert_eq!(state.render_credentials(), updated);
    }
}
