//! Kotae - bilingual question answering about Kenichi Ohmae
//!
//! A retrieval-augmented chatbot that answers in Japanese or English and keeps
//! track of the conversation, so follow-up questions, short reactions and
//! "say that again in English" requests are handled in context.
//!
//! "Kotae" (答え) is Japanese for "answer."
//!
//! # Architecture
//!
//! - `language` - Japanese/English detection
//! - `intent` - Ordered keyword rules mapping a message to a topic and emotion
//! - `dialogue` - Per-session history, context enhancement and follow-up detection
//! - `retrieval` - Passage retrieval abstraction and a keyword-scored corpus
//! - `rag` - Response generation from the bilingual catalog and retrieved passages
//! - `config` - Settings and the response catalog
//! - `orchestrator` - Wires settings, retriever, engine and sessions together
//! - `cli` - Command line interface and HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use kotae::config::Settings;
//! use kotae::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(Settings::load()?)?;
//!
//!     let (session_id, reply) = orchestrator.chat(None, "リーダーシップとは？").await?;
//!     println!("{}", reply.response);
//!
//!     let (_, reply) = orchestrator.chat(Some(session_id), "Can you say that in English?").await?;
//!     println!("{}", reply.response);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod intent;
pub mod language;
pub mod orchestrator;
pub mod rag;
pub mod retrieval;

pub use error::{KotaeError, Result};
