use crate::config::AppConfig;
use crate::domain::models::GameSession;
use crate::domain::scenario::ScenarioBuilder;
use crate::domain::session::SessionRunner;
use crate::middleware::RateLimiter;
use crate::store::SessionStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Page-local working state for one slot. Lost on restart, like an unsaved form.
pub struct WizardDrafts {
    pub builder: ScenarioBuilder,
    pub runner: SessionRunner,
    /// Finished session whose write to the store failed; retried on the next end request
    pub unsaved_session: Option<GameSession>,
    pub touched: Instant,
}

impl Default for WizardDrafts {
    fn default() -> Self {
        Self {
            builder: ScenarioBuilder::new(),
            runner: SessionRunner::new(),
            unsaved_session: None,
            touched: Instant::now(),
        }
    }
}

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn SessionStore>,
    pub drafts: RwLock<HashMap<Uuid, WizardDrafts>>, // slot -> drafts
    pub feedback_limiter: RateLimiter,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn SessionStore>) -> SharedState {
        Arc::new(Self {
            config: Arc::new(config),
            store,
            drafts: RwLock::new(HashMap::new()),
            feedback_limiter: RateLimiter::new(10, Duration::from_secs(60)),
        })
    }

    pub async fn evict_idle_drafts(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, d| now.duration_since(d.touched) < max_idle);
        before - drafts.len()
    }
}

/// Fetches (or opens) the drafts for `slot` and marks them as recently used.
pub fn slot_drafts(drafts: &mut HashMap<Uuid, WizardDrafts>, slot: Uuid) -> &mut WizardDrafts {
    let entry = drafts.entry(slot).or_default();
    entry.touched = Instant::now();
    entry
}
