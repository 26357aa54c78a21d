//! Intent-resolution collaborator

use async_trait::async_trait;
use aws_sdk_lexruntimev2::error::DisplayErrorContext;
use aws_sdk_lexruntimev2::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use photo_search_common::{PhotoSearchError, Result, SystemConfig};

/// A named slot and the text the user typed for it, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedSlot {
    pub name: String,
    pub original_value: Option<String>,
}

impl RecognizedSlot {
    pub fn filled(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            original_value: Some(value.into()),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            original_value: None,
        }
    }
}

/// Slots recognized for one utterance, in a stable order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResolution {
    pub slots: Vec<RecognizedSlot>,
}

#[async_trait]
pub trait IntentResolver: Send + Sync {
    async fn recognize_text(&self, text: &str) -> Result<IntentResolution>;
}

/// Amazon Lex V2 `RecognizeText` with a fixed bot and session
#[derive(Debug, Clone)]
pub struct LexIntentResolver {
    client: Client,
    bot_id: String,
    bot_alias_id: String,
    locale_id: String,
    session_id: String,
}

impl LexIntentResolver {
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &SystemConfig) -> Result<Self> {
        let (bot_id, bot_alias_id) = config.lex_bot()?;

        Ok(Self {
            client: Client::new(sdk_config),
            bot_id: bot_id.to_string(),
            bot_alias_id: bot_alias_id.to_string(),
            locale_id: config.lex.locale_id.clone(),
            session_id: config.lex.session_id.clone(),
        })
    }
}

#[async_trait]
impl IntentResolver for LexIntentResolver {
    #[instrument(skip(self), fields(bot_id = %self.bot_id))]
    async fn recognize_text(&self, text: &str) -> Result<IntentResolution> {
        let output = self
            .client
            .recognize_text()
            .bot_id(&self.bot_id)
            .bot_alias_id(&self.bot_alias_id)
            .locale_id(&self.locale_id)
            .session_id(&self.session_id)
            .text(text)
            .send()
            .await
            .map_err(|e| PhotoSearchError::IntentResolution(DisplayErrorContext(&e).to_string()))?;

        // Lex returns slots as a map; sort by name so keyword order is stable
        let mut slots: Vec<RecognizedSlot> = output
            .session_state()
            .and_then(|state| state.intent())
            .and_then(|intent| intent.slots())
            .map(|slots| {
                slots
                    .iter()
                    .map(|(name, slot)| RecognizedSlot {
                        name: name.clone(),
                        original_value: slot
                            .value()
                            .and_then(|value| value.original_value())
                            .map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default();
        slots.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(slots = ?slots, "Lex recognized slots");
        Ok(IntentResolution { slots })
    }
}
