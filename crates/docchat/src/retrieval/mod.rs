//! Retrieval: embedding calls and nearest-neighbor lookup

mod client;

pub use client::RetrievalClient;
