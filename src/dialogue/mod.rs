//! Dialogue state: sessions, history and context tracking.

pub mod context;
mod session;
mod store;

pub use context::{classify_context, enhance, ContextIntent};
pub use session::{ConversationTurn, Session, MAX_HISTORY};
pub use store::{SessionHandle, SessionStore};
