//! Response generation from retrieved passages and conversation state.
//!
//! [`ChatEngine::respond`] is the core of the chatbot: it classifies the
//! message, picks a response family and records the turn in the session.

pub mod context;
mod picker;
mod response;

pub use context::{extract_context, truncate_chars, RetrievalContext};
pub use picker::{FixedPicker, PhrasePicker, RandomPicker};
pub use response::{
    ChatEngine, ChatResponse, GENERAL_CONFIDENCE, GENERAL_CONTEXT_CHARS, TOPIC_CONFIDENCE,
    TOPIC_CONTEXT_CHARS,
};
