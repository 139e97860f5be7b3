//! docchat: chat with an uploaded document
//!
//! A retrieval-augmented generation orchestrator. An uploaded PDF (or text
//! file) is split into overlapping paragraph chunks, embedded, and stored in
//! its own vector-store collection. Questions are embedded, matched against
//! that collection, and answered by a generation service with the nearest
//! passages injected as context.

pub mod collections;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod orchestrator;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, ErrorKind, Result};
pub use orchestrator::{Orchestrator, ProviderHealth};
pub use types::{
    AskRequest, AskResponse, ChatTurn, Chunk, CollectionId, Document, IndexResponse, Role,
};
