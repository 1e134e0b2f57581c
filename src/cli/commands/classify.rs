//! Classify command implementation.

use crate::cli::Output;
use crate::intent;
use crate::language;
use anyhow::Result;

/// Print the intent and language of a message.
pub fn run_classify(message: &str) -> Result<()> {
    let intent = intent::classify(message);
    let language = language::detect(message);

    Output::header("Classification");
    Output::kv("topic", &intent.topic.to_string());
    Output::kv("emotion", &intent.emotion.to_string());
    Output::kv("language", &language.to_string());

    Ok(())
}
