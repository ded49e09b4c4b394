//! Response validator — bounds the backend's free-form output to the fixed
//! resume schema.
//!
//! LLM output is prose-adjacent text; strict all-or-nothing validation
//! would make the system unusable. Validation therefore degrades
//! field-by-field: a missing or malformed field falls back to its default
//! and is recorded, while a response that is not JSON at all is the one
//! fatal condition.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::resume::TailoredResume;

/// Best-effort validation result: the resume plus the names of the
/// top-level fields that fell back to their defaults. Empty list means the
/// response was fully valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedResume {
    pub resume: TailoredResume,
    pub defaulted_fields: Vec<String>,
}

impl ValidatedResume {
    pub fn is_fully_valid(&self) -> bool {
        self.defaulted_fields.is_empty()
    }
}

/// Parses and validates raw backend output against the resume schema.
pub fn validate_response(raw: &str) -> Result<ValidatedResume, AppError> {
    let text = strip_json_fences(raw);

    let value: Value =
        serde_json::from_str(text).map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    let Value::Object(mut fields) = value else {
        return Err(AppError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    };

    let mut defaulted = Vec::new();

    let resume = TailoredResume {
        executive_summary: take_field(&mut fields, "executive_summary", &mut defaulted),
        personal_info: take_field(&mut fields, "personal_info", &mut defaulted),
        skills: take_field(&mut fields, "skills", &mut defaulted),
        experience: take_field(&mut fields, "experience", &mut defaulted),
        projects: take_field(&mut fields, "projects", &mut defaulted),
        education: take_field(&mut fields, "education", &mut defaulted),
    };

    Ok(ValidatedResume {
        resume,
        defaulted_fields: defaulted,
    })
}

/// Removes `key` from the response object and deserializes it. A missing,
/// null, or wrongly-typed value falls back to `T::default()` and records
/// the field name — failure is field-local, never request-fatal.
fn take_field<T: DeserializeOwned + Default>(
    fields: &mut serde_json::Map<String, Value>,
    key: &str,
    defaulted: &mut Vec<String>,
) -> T {
    match fields.remove(key) {
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(_) => {
                defaulted.push(key.to_string());
                T::default()
            }
        },
        None => {
            defaulted.push(key.to_string());
            T::default()
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// Models wrap JSON in fences despite instructions not to.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::PersonalInfo;

    const FULL_RESPONSE: &str = r#"{
        "executive_summary": ["Added keywords 'Rust' and 'Tokio' to Skills"],
        "personal_info": {
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+44 20 7946 0000",
            "linkedin": "https://linkedin.com/in/ada",
            "github": "https://github.com/ada",
            "location": "London, UK"
        },
        "skills": ["Rust", "Tokio", "PostgreSQL"],
        "experience": [
            {
                "company": "Analytical Engines Ltd",
                "role": "Principal Engineer",
                "duration": "2019 - Present",
                "location": "London",
                "points": ["Designed the difference engine pipeline"]
            }
        ],
        "projects": [
            {
                "title": "Notes on the Analytical Engine",
                "role": "Author",
                "duration": "2021",
                "points": ["Published the first program"]
            }
        ],
        "education": [
            {
                "school": "Home Tutoring",
                "degree": "Mathematics",
                "duration": "1833 - 1842",
                "location": "London"
            }
        ]
    }"#;

    #[test]
    fn test_full_schema_produces_no_defaulted_fields() {
        let validated = validate_response(FULL_RESPONSE).unwrap();
        assert!(validated.is_fully_valid(), "{:?}", validated.defaulted_fields);
        assert_eq!(validated.resume.personal_info.name, "Ada Lovelace");
        assert_eq!(validated.resume.skills.len(), 3);
        assert_eq!(validated.resume.experience[0].role, "Principal Engineer");
    }

    #[test]
    fn test_missing_keys_default_and_present_keys_survive() {
        let raw = r#"{
            "executive_summary": ["One change"],
            "skills": ["Rust"]
        }"#;
        let validated = validate_response(raw).unwrap();

        assert_eq!(
            validated.defaulted_fields,
            vec!["personal_info", "experience", "projects", "education"]
        );
        // Present fields preserved verbatim.
        assert_eq!(validated.resume.executive_summary, vec!["One change"]);
        assert_eq!(validated.resume.skills, vec!["Rust"]);
        // Missing fields hold their documented defaults.
        assert_eq!(validated.resume.personal_info, PersonalInfo::default());
        assert!(validated.resume.experience.is_empty());
    }

    #[test]
    fn test_wrongly_typed_field_is_defaulted_not_fatal() {
        let raw = r#"{
            "executive_summary": "should have been an array",
            "skills": ["Rust"],
            "personal_info": {},
            "experience": [],
            "projects": [],
            "education": []
        }"#;
        let validated = validate_response(raw).unwrap();
        assert_eq!(validated.defaulted_fields, vec!["executive_summary"]);
        assert!(validated.resume.executive_summary.is_empty());
        assert_eq!(validated.resume.skills, vec!["Rust"]);
    }

    #[test]
    fn test_null_field_is_defaulted() {
        let raw = r#"{"skills": null}"#;
        let validated = validate_response(raw).unwrap();
        assert!(validated.defaulted_fields.contains(&"skills".to_string()));
        assert!(validated.resume.skills.is_empty());
    }

    #[test]
    fn test_prose_response_is_malformed() {
        let err = validate_response("I'm sorry, I can't tailor this resume.").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_json_array_response_is_malformed() {
        let err = validate_response(r#"["not", "an", "object"]"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let fenced = format!("```json\n{FULL_RESPONSE}\n```");
        let validated = validate_response(&fenced).unwrap();
        assert!(validated.is_fully_valid());
    }

    #[test]
    fn test_bare_fence_is_accepted() {
        let fenced = format!("```\n{FULL_RESPONSE}\n```");
        let validated = validate_response(&fenced).unwrap();
        assert!(validated.is_fully_valid());
    }

    #[test]
    fn test_partial_entry_subfields_default_silently() {
        // Subfield gaps inside an entry are absorbed by the schema defaults
        // and are NOT reported as defaulted top-level fields.
        let raw = r#"{
            "executive_summary": [],
            "personal_info": {"name": "Ada"},
            "skills": [],
            "experience": [{"company": "Acme"}],
            "projects": [],
            "education": []
        }"#;
        let validated = validate_response(raw).unwrap();
        assert!(validated.is_fully_valid());
        assert_eq!(validated.resume.experience[0].company, "Acme");
        assert_eq!(validated.resume.experience[0].role, "");
    }
}
