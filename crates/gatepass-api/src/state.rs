use std::sync::Arc;

use gatepass_bot::BotClient;
use gatepass_gateway::dispatcher::Dispatcher;
use gatepass_store::{ProofStorage, RecordStore};

use crate::review::ReviewGuard;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: RecordStore,
    pub proofs: ProofStorage,
    pub bot: BotClient,
    pub dispatcher: Dispatcher,
    pub jwt_secret: String,
    pub admin: AdminCredentials,
    pub channels: ChannelConfig,
    /// Handle embedded in decline and contact messages.
    pub contact_handle: String,
    pub review_guard: ReviewGuard,
}

#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Telegram channel ids access is granted to.
#[derive(Clone)]
pub struct ChannelConfig {
    pub premium: String,
    pub lifetime: String,
}
