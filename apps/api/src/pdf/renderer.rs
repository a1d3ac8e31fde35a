//! Template renderer: binds a sanitized resume record to a named LaTeX
//! template and returns the expanded source text.
//!
//! Both error variants are recoverable: the orchestrator catches them and
//! redirects to the fallback builder instead of surfacing them.

use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, UndefinedBehavior};
use thiserror::Error;

use crate::models::resume::ResumeRecord;
use crate::pdf::sanitizer::sanitize_value;
use crate::pdf::templates::TEMPLATES;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template render failed: {0}")]
    Render(String),
}

/// Renders `record` into the named template, escaping every string leaf for
/// LaTeX first. `is_premium` is exposed to templates for watermark blocks.
pub fn render(
    template_name: &str,
    record: &ResumeRecord,
    is_premium: bool,
) -> Result<String, RenderError> {
    let (_, source) = TEMPLATES
        .iter()
        .find(|(name, _)| *name == template_name)
        .ok_or_else(|| RenderError::TemplateNotFound(template_name.to_string()))?;

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    env.set_syntax(
        SyntaxConfig::builder()
            .block_delimiters("((*", "*))")
            .variable_delimiters("((", "))")
            .comment_delimiters("((#", "#))")
            .build()
            .map_err(|e| RenderError::Render(e.to_string()))?,
    );
    env.add_template(template_name, source)
        .map_err(|e| RenderError::Render(e.to_string()))?;

    // Sanitize every string leaf of the record, then attach the tier flag.
    let record_value =
        serde_json::to_value(record).map_err(|e| RenderError::Render(e.to_string()))?;
    let mut context = sanitize_value(&record_value);
    if let Some(map) = context.as_object_mut() {
        map.insert("is_premium".to_string(), serde_json::Value::Bool(is_premium));
    }

    let template = env
        .get_template(template_name)
        .map_err(|e| RenderError::Render(e.to_string()))?;
    template
        .render(minijinja::Value::from_serialize(&context))
        .map_err(|e| RenderError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo};

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                name: "Jane & Joe Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-0100".to_string(),
                location: "Austin, TX".to_string(),
                linkedin: None,
                github: None,
                website: None,
            },
            summary: "Shipped systems with 100% uptime.".to_string(),
            skills: vec!["Rust".to_string(), "C++".to_string()],
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme_Corp".to_string(),
                location: "Remote".to_string(),
                start_date: "01/2020".to_string(),
                end_date: "Present".to_string(),
                bullet_points: vec!["Cut costs by 40%".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "BSc Computer Science".to_string(),
                institution: "State University".to_string(),
                location: String::new(),
                start_date: "2014".to_string(),
                end_date: "2018".to_string(),
                gpa: Some("3.9".to_string()),
            }],
            projects: vec![],
            certifications: vec![],
        }
    }

    #[test]
    fn test_render_classic_escapes_special_characters() {
        let source = render("classic", &sample_record(), false).unwrap();
        assert!(source.contains(r"Jane \& Joe Doe"));
        assert!(source.contains(r"100\% uptime"));
        assert!(source.contains(r"Acme\_Corp"));
        // No raw ampersand from record data survives into the source.
        assert!(!source.contains("Jane & Joe"));
    }

    #[test]
    fn test_render_free_tier_includes_watermark() {
        let source = render("classic", &sample_record(), false).unwrap();
        assert!(source.contains("Generated by TailorCV"));
    }

    #[test]
    fn test_render_premium_omits_watermark() {
        let source = render("professional", &sample_record(), true).unwrap();
        assert!(!source.contains("Generated by TailorCV"));
    }

    #[test]
    fn test_render_unknown_template_fails() {
        let err = render("nonexistent", &sample_record(), false).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound(_)));
    }

    #[test]
    fn test_render_empty_sections_are_dropped() {
        let record = ResumeRecord::minimal("Only a summary.");
        let source = render("classic", &record, false).unwrap();
        assert!(source.contains("Only a summary."));
        assert!(!source.contains("Professional Experience"));
        assert!(!source.contains("Technical Skills"));
    }

    #[test]
    fn test_render_produces_complete_latex_document() {
        let source = render("classic", &sample_record(), false).unwrap();
        assert!(source.contains(r"\begin{document}"));
        assert!(source.contains(r"\end{document}"));
    }
}
