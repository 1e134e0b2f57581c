//! Configuration module for Kotae.
//!
//! Handles loading application settings and the bilingual response catalog.

mod responses;
mod settings;

pub use responses::{
    ApologyResponses, Bilingual, BilingualList, CannedResponses, GeneralResponses,
    RepeatResponses, Responses, TopicResponses, TopicTemplate, Translation,
};
pub use settings::{
    ChatSettings, GeneralSettings, ResponseSettings, RetrievalSettings, ServerSettings, Settings,
};
