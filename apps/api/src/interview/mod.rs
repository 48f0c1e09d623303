// Interview flow: question generation, answer grading, debrief.
// All LLM calls go through llm_client, no direct endpoint calls here.

pub mod evaluation;
pub mod handlers;
pub mod prep;
pub mod prompts;
pub mod questions;
pub mod summary;
