// Company research: fetch public pages, trim them, distil a profile.
// All LLM calls go through llm_client.

pub mod fetcher;
pub mod profile;
pub mod prompts;
pub mod truncate;
