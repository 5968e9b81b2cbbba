// Shared prompt fragments used by every structured call.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to structured-output prompts before the JSON schema.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only, \
    matching the JSON schema below. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt used by chat-style backends.
pub const DEFAULT_SYSTEM: &str = "You are a helpful assistant.";
