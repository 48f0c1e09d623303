// All LLM prompt constants for the interview flow.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for question generation. Append `JSON_ONLY_INSTRUCTION`.
pub const QUESTIONS_SYSTEM: &str = "\
You are an expert interview coach who creates tailored interview questions based on company research.

Your questions should:
- Test alignment with company values and culture
- Be realistic and commonly asked in real interviews
- Include both behavioral (STAR method) and technical questions
- Come with evaluation criteria so answers can be scored later";

/// Question generation prompt.
/// Replace: {role}, {company}, {values}, {culture}, {mission}, {technologies}, {candidate_context}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Generate 5 interview questions for a {role} role at {company}.

Company context:
- Values: {values}
- Culture: {culture}
- Mission: {mission}
- Key Technologies: {technologies}
{candidate_context}
Create a JSON array with this structure:
[
  {
    "question": "the interview question",
    "type": "behavioral" or "technical",
    "category": "e.g. leadership, problem-solving, system design, coding",
    "company_alignment": "brief explanation of why this question matters to this company",
    "evaluation_criteria": {
      "excellent": "what makes a great answer",
      "good": "what makes an acceptable answer",
      "poor": "red flags to watch for"
    }
  }
]

Mix: 3 behavioral questions (testing values/culture fit) + 2 technical questions (testing role-specific skills).

Be specific to {company}. Reference their values, tech stack, or notable projects when relevant.

Output only the JSON array."#;

/// System prompt for grading a single answer. Append `JSON_ONLY_INSTRUCTION`.
pub const EVALUATION_SYSTEM: &str = "\
You are an experienced interviewer grading a candidate's answer to one interview question. \
Grade strictly against the evaluation criteria you are given. \
The rating MUST be exactly one of: \"excellent\", \"good\", \"poor\". \
Feedback must be specific to what the candidate actually said.";

/// Answer grading prompt.
/// Replace: {question}, {question_type}, {company_alignment}, {excellent}, {good}, {poor}, {answer}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"QUESTION ({question_type}):
{question}

WHY THIS COMPANY ASKS IT:
{company_alignment}

EVALUATION CRITERIA:
- excellent: {excellent}
- good: {good}
- poor: {poor}

CANDIDATE ANSWER:
{answer}

Return a JSON object with this EXACT schema:
{
  "rating": "excellent" | "good" | "poor",
  "feedback": "2-3 sentences of direct, specific feedback",
  "strengths": ["what the answer did well"],
  "improvements": ["concrete ways to make the answer stronger"]
}"#;

/// System prompt for the end-of-session summary. Append `JSON_ONLY_INSTRUCTION`.
pub const SUMMARY_SYSTEM: &str = "\
You are an interview coach writing a debrief after a mock interview. \
Look across all answers for recurring patterns rather than repeating per-question feedback. \
Be encouraging but honest.";

/// Session summary prompt. Replace: {role}, {company}, {transcript}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"The candidate practised for a {role} role at {company}.

Here is every question they answered, with the grade and feedback each answer received:

{transcript}

Return a JSON object with this EXACT schema:
{
  "overall_feedback": "3-4 sentences on overall interview readiness",
  "key_strengths": ["recurring strengths across answers"],
  "areas_to_improve": ["recurring weaknesses across answers"],
  "next_steps": ["specific things to practise before the real interview"]
}"#;
