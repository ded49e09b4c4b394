// All LLM prompt constants for the tailoring engine.

/// System prompt for resume tailoring — enforces JSON-only output.
pub const TAILOR_SYSTEM: &str = "You are an expert resume strategist and ATS optimizer. \
    Rewrite the candidate's resume so it aligns with the target job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Tailoring prompt template. Replace `{resume_text}` and `{job_text}`
/// before sending.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Rewrite the "Experience", "Projects", and "Skills" sections of the candidate's resume to align with the job description.

CONTENT RULES:
- "executive_summary": do NOT summarize the candidate's profile. List 3-5 specific changes you made to tailor the resume (e.g. "Added keywords 'Python' and 'SQL' to Skills", "Rewrote 'Project Alpha' bullet points to emphasize leadership", "Quantified achievements in 'Software Engineer' role").
- Keep every claim grounded in the original resume. Never invent employers, dates, degrees, or credentials.
- Incorporate keywords from the job description naturally where the resume supports them. Do not keyword-stuff.

Return a JSON object with this EXACT schema (no extra fields):
{
  "executive_summary": ["Change 1", "Change 2", "Change 3"],
  "personal_info": {
    "name": "string",
    "email": "string",
    "phone": "string",
    "linkedin": "string (url)",
    "github": "string (url)",
    "location": "string"
  },
  "skills": ["skill 1", "skill 2"],
  "experience": [
    {
      "company": "string",
      "role": "string",
      "duration": "string",
      "location": "string",
      "points": ["bullet 1", "bullet 2"]
    }
  ],
  "projects": [
    {
      "title": "string",
      "role": "string",
      "duration": "string",
      "points": ["bullet 1", "bullet 2"]
    }
  ],
  "education": [
    {
      "school": "string",
      "degree": "string",
      "duration": "string",
      "location": "string"
    }
  ]
}

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_text}"#;

/// Fills the tailoring template. Placeholders are replaced literally, the
/// same way every other prompt in this codebase is assembled.
pub fn build_tailor_prompt(resume_text: &str, job_text: &str) -> String {
    TAILOR_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{job_text}", job_text)
}
