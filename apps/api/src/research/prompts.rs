// All LLM prompt constants for company research.

/// System prompt for profile extraction. Append `JSON_ONLY_INSTRUCTION`.
pub const PROFILE_SYSTEM: &str = "\
You are an expert interview prep researcher. Your job is to extract information \
that helps candidates prepare for job interviews.

Focus on:
- Core company values and cultural principles (what they care about in employees)
- Mission statements and company goals (to align answers with)
- Notable achievements and projects (to show you've done research)
- Technologies they use (for technical roles)
- Work culture indicators (remote-first, collaboration style, etc.)

Extract concrete, specific information. Avoid generic corporate speak.";

/// Profile extraction prompt. Replace `{company}` and `{content}` before sending.
pub const PROFILE_PROMPT_TEMPLATE: &str = r#"Analyze {company} for interview preparation. Extract these fields:

{
  "name": "exact company name",
  "summary": "concise 2-3 sentence overview focusing on their main business and impact",
  "values": ["specific cultural values they emphasize - look for quotes or explicit statements"],
  "culture": "1-2 sentences on work environment, collaboration style, or hiring priorities",
  "mission": "their mission/vision statement if explicitly stated, or core purpose",
  "headquarters": "city, country",
  "founded": "year as string",
  "notable_projects": ["specific products, initiatives, or achievements with names"],
  "key_technologies": ["technical stack, platforms, or methodologies they use/build"],
  "recent_achievements": ["recent milestones, awards, funding rounds, or major launches"]
}

Be specific. If information is unavailable, use empty string "" or empty array [].

Source text:
{content}

Output only the JSON object."#;
