// All LLM prompt templates for the screening pipeline.
// Placeholders are `{name}` and are filled by `llm_client::prompts::fill_template`.
// `{json_only}` is always filled with `llm_client::prompts::JSON_ONLY_INSTRUCTION`.

/// JD normalization. Replace: {raw_jd_text}, {json_only}
pub const JD_NORMALIZE_PROMPT_TEMPLATE: &str = r#"You are an expert HR data analyst. Read the raw text of a job description below and convert it into a structured JSON object with exactly these keys: "job_title", "required_qualifications", "preferred_qualifications", "responsibilities".

- "job_title": string
- "required_qualifications": list of strings
- "preferred_qualifications": list of strings
- "responsibilities": list of strings

Raw Job Description Text:
```text
{raw_jd_text}
```

{json_only}"#;

/// Resume structuring. Replace: {resume_text}, {json_only}
pub const RESUME_STRUCTURE_PROMPT_TEMPLATE: &str = r#"You are an expert data extraction AI. Read the resume text below and convert it into a structured JSON object. Extract:
- `contact_info`: object with `name`, `email`, `linkedin_url`
- `summary`: string
- `total_experience_years`: number
- `work_experience`: list of jobs
- `education`: list of qualifications
- `skills`: list of strings

Resume Text:
```text
{resume_text}
```

{json_only}"#;

/// Candidate screening. Replace: {job_description_json}, {resume_json},
/// {recommendation_labels}, {json_only}
pub const SCREENING_PROMPT_TEMPLATE: &str = r#"You are an expert HR Technical Recruiter AI. Analyze the candidate's structured resume against the provided job description.

Job Description:
```json
{job_description_json}
```

Candidate's Resume Data:
```json
{resume_json}
```

Provide a JSON response with:
- `match_score`: number from 0 to 100
- `summary`: string
- `strengths`: list of strings
- `weaknesses`: list of strings
- `skills_analysis`: object with `required_skills_found` (list of strings) and `missing_skills` (list of strings)
- `final_recommendation`: exactly one of {recommendation_labels}

{json_only}"#;

/// Cumulative ranking. Replace: {analyses_json}, {json_only}
pub const RANKING_PROMPT_TEMPLATE: &str = r#"You are a Senior Hiring Manager AI. Review the list of analysis reports for all candidates and generate a final cumulative report.

Candidate Analysis Reports:
```json
{analyses_json}
```

Provide a JSON object with:
- `overall_summary`: string
- `candidate_ranking`: a ranked list where each item has `rank` (1 = best), `candidate_name`, `match_score`, `final_recommendation`, `justification_for_rank`

{json_only}"#;
