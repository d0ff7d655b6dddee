use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered but refused the call (`ok: false`).
    #[error("bot api error: {0}")]
    Api(String),

    #[error("bot api returned a malformed response")]
    MalformedResponse,
}

/// Telegram Bot API client.
///
/// Thin JSON client over two methods: `sendMessage` and
/// `createChatInviteLink`. No retries and no timeout beyond reqwest's
/// defaults — a failed call is terminal for the request that made it.
#[derive(Clone)]
pub struct BotClient {
    http: reqwest::Client,
    base: String,
}

/// Telegram wraps every response in `{ok, result, description}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatInviteLink {
    invite_link: String,
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CreateInviteLinkPayload<'a> {
    chat_id: &'a str,
    member_limit: u32,
    expire_date: i64,
}

impl BotClient {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(format!("https://api.telegram.org/bot{token}"))
    }

    /// Point the client at a different API root. Used by tests to stand in a
    /// stub server for the real Telegram API.
    pub fn with_base_url(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into(),
        }
    }

    /// Deliver a text message to a chat. `markdown` enables Telegram's
    /// Markdown parse mode.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        markdown: bool,
    ) -> Result<(), BotError> {
        let payload = SendMessagePayload {
            chat_id,
            text,
            parse_mode: markdown.then_some("Markdown"),
        };
        // sendMessage returns the Message object; nothing in it is needed.
        let _: serde_json::Value = self.call("sendMessage", &payload).await?;
        debug!("Sent message to chat {}", chat_id);
        Ok(())
    }

    /// Request a fresh invite link for a channel. The link admits
    /// `member_limit` joins and expires at `expire_at`.
    pub async fn create_invite_link(
        &self,
        chat_id: &str,
        member_limit: u32,
        expire_at: DateTime<Utc>,
    ) -> Result<String, BotError> {
        let payload = CreateInviteLinkPayload {
            chat_id,
            member_limit,
            expire_date: expire_at.timestamp(),
        };
        let link: ChatInviteLink = self.call("createChatInviteLink", &payload).await?;
        debug!("Created invite link for chat {}", chat_id);
        Ok(link.invite_link)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
    ) -> Result<T, BotError> {
        let url = format!("{}/{}", self.base, method);
        let envelope: Envelope<T> = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await?
            .json()
            .await?;

        if !envelope.ok {
            return Err(BotError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "no description".into()),
            ));
        }
        envelope.result.ok_or(BotError::MalformedResponse)
    }
}
