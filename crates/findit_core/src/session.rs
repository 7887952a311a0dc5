//! Session context - the pipeline's entry points
//!
//! One `Session` per application run: it owns the parse cache (initialized
//! empty, never persisted) and the handles to the host collaborators. All
//! state the pipeline mutates lives here rather than in globals, so two
//! sessions never share anything.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::ParseCache;
use crate::error::CaptureError;
use crate::find_parser;
use crate::log_parser;
use crate::remote::RemoteParser;
use crate::reply;
use crate::search;
use crate::store::{self, ItemStore, Saved};
use crate::types::{
    FindOutcome, Intent, Item, LogOutcome, ParsedLogCommand, RemoteParse, Transcript,
};

/// Speech synthesis collaborator. Fire-and-forget; the Core never waits on
/// playback.
pub trait SpeechOutput: Send {
    fn speak(&self, text: &str);
}

/// Speech capture collaborator: one async operation resolving to the final
/// transcript plus its alternatives. The bounded listening window and the
/// discarding of interim fragments live behind this trait.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn listen(&self) -> Result<Transcript, CaptureError>;
}

/// Per-session pipeline state and collaborators
pub struct Session {
    store: Box<dyn ItemStore>,
    speech: Box<dyn SpeechOutput>,
    remote: RemoteParser,
    cache: ParseCache,
}

impl Session {
    pub fn new(
        store: Box<dyn ItemStore>,
        speech: Box<dyn SpeechOutput>,
        remote: RemoteParser,
    ) -> Self {
        Self {
            store,
            speech,
            remote,
            cache: ParseCache::new(),
        }
    }

    /// Current records, in store order
    pub fn items(&self) -> Result<Vec<Item>> {
        self.store.load_all().context("Failed to load records")
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    /// Interpret a log transcript into a command awaiting confirmation.
    ///
    /// Heuristics first; the remote model is only consulted when they find
    /// nothing trustworthy, and its failures never sink the utterance - the
    /// worst case is an `Unresolved` asking the user to rephrase.
    pub async fn handle_log(&mut self, transcript: &Transcript) -> LogOutcome {
        let parsed = log_parser::parse_log_heuristic(transcript);
        let mut notice = None;

        let needs_remote = parsed.as_ref().map_or(true, |p| p.confidence < 0.7);
        if needs_remote {
            match self
                .remote
                .parse_intent(&mut self.cache, &transcript.text, Intent::Log)
                .await
            {
                Ok(RemoteParse::Log { item, location }) => {
                    info!("Remote model resolved log split");
                    return LogOutcome::Confirm {
                        parsed: ParsedLogCommand {
                            name: item,
                            location,
                            confidence: 1.0,
                        },
                        notice: None,
                    };
                }
                Ok(other) => warn!("Remote log parse returned wrong shape: {:?}", other),
                Err(crate::error::RemoteParseError::NoCredential) => {
                    notice = Some(reply::credential_hint());
                }
                Err(e) => debug!("Remote log parse failed: {}", e),
            }
        }

        match parsed {
            Some(parsed) => LogOutcome::Confirm { parsed, notice },
            None => LogOutcome::Unresolved {
                hint: reply::log_guidance(),
                notice,
            },
        }
    }

    /// Commit a confirmed log command and speak the acknowledgement
    pub fn confirm(&mut self, parsed: &ParsedLogCommand) -> Result<Saved> {
        let saved = store::commit_log(self.store.as_mut(), parsed, Utc::now().timestamp_millis())
            .context("Failed to save record")?;
        self.speech.speak(&reply::describe_saved(&saved.item, saved.updated));
        Ok(saved)
    }

    /// Discard a parsed command without saving
    pub fn cancel(&self, parsed: ParsedLogCommand) {
        debug!("Discarded unconfirmed command for {:?}", parsed.name);
    }

    /// Delete a record by name. Returns the removed record, if any.
    pub fn forget(&mut self, name: &str) -> Result<Option<Item>> {
        store::remove_by_name(self.store.as_mut(), name).context("Failed to remove record")
    }

    /// Rewrite a record's location directly, refreshing its timestamp
    pub fn relabel(&mut self, name: &str, new_location: &str) -> Result<Option<Item>> {
        store::relabel(
            self.store.as_mut(),
            name,
            new_location,
            Utc::now().timestamp_millis(),
        )
        .context("Failed to update record")
    }

    /// Resolve a find transcript against the store and speak the result
    pub async fn handle_find(&mut self, transcript: &Transcript) -> Result<FindOutcome> {
        let Some(term) = find_parser::extract_search_term(&transcript.text) else {
            return Ok(FindOutcome::Unresolved {
                hint: reply::find_guidance(),
            });
        };

        let items = self.store.load_all().context("Failed to load records")?;
        let result = search::search(
            &items,
            &term,
            &transcript.alternatives,
            &transcript.text,
            &self.remote,
            &mut self.cache,
        )
        .await;

        let spoken = reply::describe_search(&result, Utc::now().timestamp_millis());
        self.speech.speak(&spoken);
        Ok(FindOutcome::Resolved { result, spoken })
    }

    /// Await a transcript from the capture collaborator, then interpret it
    /// as a log command
    pub async fn capture_and_log(&mut self, source: &dyn TranscriptSource) -> Result<LogOutcome> {
        let transcript = source.listen().await.context("Capture failed")?;
        Ok(self.handle_log(&transcript).await)
    }

    /// Await a transcript from the capture collaborator, then resolve it as
    /// a find query
    pub async fn capture_and_find(&mut self, source: &dyn TranscriptSource) -> Result<FindOutcome> {
        let transcript = source.listen().await.context("Capture failed")?;
        self.handle_find(&transcript).await
    }
}
