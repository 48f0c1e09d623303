// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt suffix that asks for bare JSON. Models still wrap output in
/// prose or fences now and then; `json_recovery` deals with that.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Output ONLY valid JSON. \
Do NOT use markdown code fences. \
Do NOT include explanations or any text outside the JSON.";
