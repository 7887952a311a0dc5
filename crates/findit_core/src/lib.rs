//! FindIt Core - Voice command interpretation and fuzzy item search
//!
//! Turns noisy spoken transcripts into "item stored at location" records and
//! resolves spoken questions against them. Layered parsing: fixed correction
//! table, pattern heuristics over the transcript and its alternates, then a
//! rate-limited remote model as last resort. Capture, speech synthesis and
//! persistence are host concerns behind the traits in [`session`] and
//! [`store`].

pub mod cache;
pub mod config;
pub mod corrector;
pub mod error;
pub mod find_parser;
pub mod fuzzy;
pub mod log_parser;
pub mod remote;
pub mod reply;
pub mod search;
pub mod session;
pub mod store;
pub mod types;

pub use cache::ParseCache;
pub use config::RemoteConfig;
pub use error::{CaptureError, RemoteParseError, StoreError};
pub use remote::{ChatBackend, OpenRouterBackend, RemoteParser};
pub use session::{Session, SpeechOutput, TranscriptSource};
pub use store::{ItemStore, MemoryStore};
pub use types::*;
