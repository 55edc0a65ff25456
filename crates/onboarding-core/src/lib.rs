//! # Onboarding Core
//!
//! Runtime-agnostic logic for the Onboarding Harness: the typed knowledge
//! schema, the document store abstraction, relevance scoring, and every
//! search operation the specialist assistants call.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. Backends plug in through [`store::DocumentStore`].
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────┐   ┌──────────┐
//! │DocumentStore │──▶│ KnowledgeBase │──▶│  score   │──▶│ Envelope │
//! │ memory/sqlite│   │ typed schema  │   │ rank/topK│   │ ok/error │
//! └──────────────┘   └───────────────┘   └──────────┘   └──────────┘
//! ```

pub mod de;
pub mod envelope;
pub mod knowledge;
pub mod models;
pub mod ops;
pub mod score;
pub mod store;

pub use envelope::{Envelope, RecoveryHints, ToolError};
pub use knowledge::{DocumentKind, KnowledgeBase};
pub use store::{DocumentStore, StoredDocument};
