//! Tailoring engine — builds the prompt, invokes the selected backend, and
//! validates the structured response.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmBackend;
use crate::tailoring::prompts::{build_tailor_prompt, TAILOR_SYSTEM};
use crate::tailoring::validator::{validate_response, ValidatedResume};

/// One tailoring invocation: (resume text, job text) in, validated resume
/// out. The backend handle is already bound to a model, temperature, and
/// credential — this function owns only the prompt/validate contract.
pub async fn tailor_resume(
    backend: &dyn LlmBackend,
    resume_text: &str,
    job_text: &str,
) -> Result<ValidatedResume, AppError> {
    let prompt = build_tailor_prompt(resume_text, job_text);

    info!(
        provider = backend.name(),
        model = backend.model(),
        "Invoking tailoring backend"
    );

    let raw = backend.complete(TAILOR_SYSTEM, &prompt).await?;

    let validated = validate_response(&raw)?;
    if !validated.is_fully_valid() {
        warn!(
            fields = ?validated.defaulted_fields,
            "Backend omitted or malformed fields; defaults substituted"
        );
    }

    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    /// Backend double that returns a canned response without any I/O.
    struct CannedBackend(&'static str);

    #[async_trait]
    impl LlmBackend for CannedBackend {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &'static str {
            "canned"
        }

        fn model(&self) -> &str {
            "canned-model"
        }
    }

    #[tokio::test]
    async fn test_engine_returns_validated_resume() {
        let backend = CannedBackend(
            r#"{
                "executive_summary": ["Reordered skills to match the posting"],
                "personal_info": {"name": "Ada Lovelace"},
                "skills": ["Rust"],
                "experience": [],
                "projects": [],
                "education": []
            }"#,
        );

        let validated = tailor_resume(&backend, "resume text", "job text")
            .await
            .unwrap();
        assert!(validated.is_fully_valid());
        assert_eq!(validated.resume.personal_info.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_engine_surfaces_malformed_response() {
        let backend = CannedBackend("Here is your tailored resume: it looks great!");
        let err = tailor_resume(&backend, "resume text", "job text")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_engine_reports_degraded_fields() {
        let backend = CannedBackend(r#"{"skills": ["Rust"]}"#);
        let validated = tailor_resume(&backend, "resume text", "job text")
            .await
            .unwrap();
        assert!(!validated.is_fully_valid());
        assert!(validated
            .defaulted_fields
            .contains(&"experience".to_string()));
        assert_eq!(validated.resume.skills, vec!["Rust"]);
    }
}
