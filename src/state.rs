use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::auth::password;
use crate::config::Config;
use crate::db::Store;
use crate::rate_limit::LoginRateLimiter;
use crate::relay::ImageRelay;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub relay: ImageRelay,
    pub login_limiter: LoginRateLimiter,
    /// bcrypt hash verified against on the unknown-email login path.
    timing_dummy_hash: OnceCell<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Result<SharedState, String> {
        let relay = ImageRelay::new(&config.image)?;
        Ok(Arc::new(AppState {
            store,
            config,
            relay,
            login_limiter: LoginRateLimiter::new(),
            timing_dummy_hash: OnceCell::new(),
        }))
    }

    /// Hash of a fixed password at the configured cost, computed on first use.
    pub async fn timing_dummy_hash(&self) -> Result<&str, String> {
        self.timing_dummy_hash
            .get_or_try_init(|| {
                password::hash(
                    password::TIMING_DUMMY_PASSWORD.to_string(),
                    self.config.password_cost,
                )
            })
            .await
            .map(String::as_str)
    }

    pub fn timing_dummy_ready(&self) -> bool {
        self.timing_dummy_hash.initialized()
    }
}
