//! Core types for the orchestrator

pub mod chat;
pub mod collection;
pub mod document;
pub mod query;
pub mod response;

pub use chat::{ChatTurn, Role};
pub use collection::{CollectionHandle, CollectionId, CollectionInfo, ScoredPassage};
pub use document::{Chunk, Document, FileType};
pub use query::AskRequest;
pub use response::{AskResponse, ChatResponse, CollectionResponse, IndexResponse};
