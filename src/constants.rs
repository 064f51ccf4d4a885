// Runtime constants, loaded from the environment where an override makes sense.

use std::env;

pub const DEFAULT_INFERENCE_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.3";

/// Environment variable holding the bearer credential for the inference endpoint.
pub const API_KEY_VAR: &str = "HUGGINGFACE_API_KEY";

pub const ANALYZING_MESSAGE: &str =
    "Thanks for completing the quiz! I'm analyzing your startup profile...";

pub const KICKOFF_MESSAGE: &str = "Based on my startup profile, what are the top 3 areas where AI could help me, and what specific tools would you recommend?";

pub const APOLOGY_MESSAGE: &str =
    "I couldn't generate a proper response. Please try asking a different question.";

// Model prompt delimiters.
pub const INSTRUCTION_END: &str = "[/INST]";
pub const SEQUENCE_END: &str = "</s>";

// Use lazy_static to initialize static variables safely.
lazy_static::lazy_static! {
    pub static ref INFERENCE_URL: String = env::var("ONWAVE_INFERENCE_URL").unwrap_or_else(|_| DEFAULT_INFERENCE_URL.to_string());
}

/// Reads the API key at call time. A missing key is not an error here; the
/// endpoint rejects the request and the resolver falls back.
pub fn api_key() -> String {
    env::var(API_KEY_VAR).unwrap_or_default()
}
