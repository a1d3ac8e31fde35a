//! Fallback document builder: draws the resume directly with `printpdf`,
//! bypassing the LaTeX toolchain entirely.
//!
//! Building happens in two phases. `compose` is pure: it flattens the record
//! into styled lines in a fixed section order, applying an HTML-safe escape
//! to every text leaf (the drawing path treats angle brackets and friends as
//! markup-adjacent; this is deliberately NOT the LaTeX sanitizer) and
//! substituting documented defaults for missing fields. `build` then draws
//! those lines with a cursor layout. Given well-formed input this path cannot
//! fail, so the orchestrator never needs a fallback for the fallback.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use thiserror::Error;

use crate::models::resume::ResumeRecord;

/// Watermark appended for free-tier output.
pub const WATERMARK_TEXT: &str = "Generated by TailorCV - AI-Powered Resume Generator";

/// Default shown when the record carries no name.
pub const DEFAULT_NAME: &str = "Your Name";

// printpdf's Mm wraps f32, so all geometry stays f32.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 25.4;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("pdf drawing failed: {0}")]
    Draw(String),
}

/// Visual role of a composed line. Determines font, size and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Name,
    Contact,
    SectionHeader,
    Heading,
    Body,
    Bullet,
    Watermark,
}

impl Style {
    fn font_size(self) -> f32 {
        match self {
            Style::Name => 22.0,
            Style::Contact => 10.0,
            Style::SectionHeader => 14.0,
            Style::Heading => 11.0,
            Style::Body => 10.0,
            Style::Bullet => 10.0,
            Style::Watermark => 8.0,
        }
    }

    /// Vertical advance after a line of this style, in mm.
    fn leading(self) -> f32 {
        match self {
            Style::Name => 10.0,
            Style::Contact => 7.0,
            Style::SectionHeader => 8.0,
            Style::Heading => 5.5,
            Style::Body => 5.0,
            Style::Bullet => 5.0,
            Style::Watermark => 4.5,
        }
    }

    /// Extra space inserted before a line of this style, in mm.
    fn space_before(self) -> f32 {
        match self {
            Style::SectionHeader => 4.0,
            Style::Heading => 2.0,
            Style::Watermark => 8.0,
            _ => 0.0,
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, Style::Name | Style::SectionHeader | Style::Heading)
    }

    /// Rough wrap width in characters for Helvetica at this size on the
    /// usable page width. Conservative so wrapped lines never overflow.
    fn wrap_chars(self) -> usize {
        match self {
            Style::Name => 40,
            Style::SectionHeader => 70,
            Style::Heading => 90,
            _ => 100,
        }
    }
}

/// One drawable line of output.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub style: Style,
}

impl Line {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Line {
            text: text.into(),
            style,
        }
    }
}

/// Escapes the characters the drawing layer's text model treats as special.
/// Distinct from the LaTeX sanitizer by design.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Flattens `record` into styled lines: header, summary, skills, experience,
/// education, projects, certifications, then the free-tier watermark.
/// Deterministic for identical input.
pub fn compose(record: &ResumeRecord, is_premium: bool) -> Vec<Line> {
    let mut lines = Vec::new();

    let name = if record.personal_info.name.trim().is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        escape_html(&record.personal_info.name)
    };
    lines.push(Line::new(name, Style::Name));

    let mut contact_parts = Vec::new();
    if !record.personal_info.email.is_empty() {
        contact_parts.push(format!("Email: {}", record.personal_info.email));
    }
    if !record.personal_info.phone.is_empty() {
        contact_parts.push(format!("Phone: {}", record.personal_info.phone));
    }
    if !record.personal_info.location.is_empty() {
        contact_parts.push(format!("Location: {}", record.personal_info.location));
    }
    if let Some(linkedin) = &record.personal_info.linkedin {
        if !linkedin.is_empty() {
            contact_parts.push(linkedin.clone());
        }
    }
    if !contact_parts.is_empty() {
        lines.push(Line::new(
            escape_html(&contact_parts.join(" | ")),
            Style::Contact,
        ));
    }

    if !record.summary.trim().is_empty() {
        lines.push(Line::new("Professional Summary", Style::SectionHeader));
        lines.push(Line::new(escape_html(&record.summary), Style::Body));
    }

    if !record.skills.is_empty() {
        lines.push(Line::new("Technical Skills", Style::SectionHeader));
        for skill in &record.skills {
            lines.push(Line::new(format!("- {}", escape_html(skill)), Style::Bullet));
        }
    }

    if !record.experience.is_empty() {
        lines.push(Line::new("Professional Experience", Style::SectionHeader));
        for exp in &record.experience {
            let title = default_if_empty(&exp.title, "Job Title");
            let company = default_if_empty(&exp.company, "Company");
            lines.push(Line::new(
                escape_html(&format!("{title} at {company}")),
                Style::Heading,
            ));
            let dates = format!("{} - {}", exp.start_date, exp.end_date);
            if dates.trim() != "-" {
                lines.push(Line::new(escape_html(&dates), Style::Body));
            }
            for point in &exp.bullet_points {
                lines.push(Line::new(format!("- {}", escape_html(point)), Style::Bullet));
            }
        }
    }

    if !record.education.is_empty() {
        lines.push(Line::new("Education", Style::SectionHeader));
        for edu in &record.education {
            let degree = default_if_empty(&edu.degree, "Degree");
            let institution = default_if_empty(&edu.institution, "Institution");
            lines.push(Line::new(
                escape_html(&format!("{degree} - {institution}")),
                Style::Heading,
            ));
            let dates = format!("{} - {}", edu.start_date, edu.end_date);
            if dates.trim() != "-" {
                lines.push(Line::new(escape_html(&dates), Style::Body));
            }
            if let Some(gpa) = &edu.gpa {
                if !gpa.is_empty() {
                    lines.push(Line::new(format!("GPA: {}", escape_html(gpa)), Style::Body));
                }
            }
        }
    }

    if !record.projects.is_empty() {
        lines.push(Line::new("Projects", Style::SectionHeader));
        for project in &record.projects {
            lines.push(Line::new(
                escape_html(default_if_empty(&project.name, "Project Name").as_str()),
                Style::Heading,
            ));
            if !project.description.is_empty() {
                lines.push(Line::new(escape_html(&project.description), Style::Body));
            }
            if !project.technologies.is_empty() {
                lines.push(Line::new(
                    escape_html(&format!(
                        "Technologies: {}",
                        project.technologies.join(", ")
                    )),
                    Style::Body,
                ));
            }
        }
    }

    if !record.certifications.is_empty() {
        lines.push(Line::new("Certifications", Style::SectionHeader));
        for cert in &record.certifications {
            let name = default_if_empty(&cert.name, "Certification");
            let issuer = default_if_empty(&cert.issuer, "Issuer");
            let text = if cert.date.is_empty() {
                format!("{name} - {issuer}")
            } else {
                format!("{name} - {issuer} ({})", cert.date)
            };
            lines.push(Line::new(escape_html(&text), Style::Body));
        }
    }

    if !is_premium {
        lines.push(Line::new(WATERMARK_TEXT, Style::Watermark));
    }

    lines
}

fn default_if_empty(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Greedy word wrap at a character budget. Overlong single words are kept
/// intact; the conservative budgets leave slack for them.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Builds the PDF byte stream from `record`. Never returns empty bytes on
/// success; the only failure mode is the drawing library itself.
pub fn build(record: &ResumeRecord, is_premium: bool) -> Result<Vec<u8>, FallbackError> {
    let lines = compose(record, is_premium);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Resume",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| FallbackError::Draw(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| FallbackError::Draw(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for line in &lines {
        let style = line.style;
        y -= style.space_before();
        let font: &IndirectFontRef = if style.is_bold() { &bold } else { &regular };
        for segment in wrap(&line.text, style.wrap_chars()) {
            if y < MARGIN_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            layer.use_text(segment, style.font_size(), Mm(MARGIN_MM), Mm(y), font);
            y -= style.leading();
        }
    }

    let mut bytes = Vec::new();
    doc.save(&mut std::io::BufWriter::new(&mut bytes))
        .map_err(|e| FallbackError::Draw(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::PersonalInfo;

    fn record_with_name(name: &str) -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                name: name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_html_rules() {
        assert_eq!(escape_html("A&B <C>"), "A&amp;B &lt;C&gt;");
        assert_eq!(escape_html(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_compose_free_tier_includes_watermark() {
        let lines = compose(&record_with_name("Jane"), false);
        assert!(lines
            .iter()
            .any(|l| l.style == Style::Watermark && l.text == WATERMARK_TEXT));
    }

    #[test]
    fn test_compose_premium_omits_watermark() {
        let lines = compose(&record_with_name("Jane"), true);
        assert!(!lines.iter().any(|l| l.style == Style::Watermark));
    }

    #[test]
    fn test_compose_defaults_missing_name() {
        let lines = compose(&ResumeRecord::default(), true);
        assert_eq!(lines[0].text, DEFAULT_NAME);
        assert_eq!(lines[0].style, Style::Name);
    }

    #[test]
    fn test_compose_escapes_name_with_html_rule() {
        // The end-to-end scenario from the fallback contract: the name is
        // escaped with the HTML rule, not the LaTeX one.
        let lines = compose(&record_with_name("A&B <C>"), false);
        assert_eq!(lines[0].text, "A&amp;B &lt;C&gt;");
        assert!(!lines[0].text.contains(r"\&"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let record = ResumeRecord {
            summary: "Engineer.".to_string(),
            skills: vec!["Rust".to_string()],
            ..record_with_name("Jane")
        };
        assert_eq!(compose(&record, false), compose(&record, false));
    }

    #[test]
    fn test_compose_fixed_section_order() {
        let record = ResumeRecord {
            summary: "S".to_string(),
            skills: vec!["Rust".to_string()],
            experience: vec![Default::default()],
            education: vec![Default::default()],
            ..record_with_name("Jane")
        };
        let lines = compose(&record, true);
        let headers: Vec<&str> = lines
            .iter()
            .filter(|l| l.style == Style::SectionHeader)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(
            headers,
            vec![
                "Professional Summary",
                "Technical Skills",
                "Professional Experience",
                "Education"
            ]
        );
    }

    #[test]
    fn test_build_produces_nonempty_pdf() {
        let bytes = build(&record_with_name("Jane Doe"), false).unwrap();
        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_build_succeeds_on_empty_record() {
        let bytes = build(&ResumeRecord::default(), true).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_build_paginates_long_records() {
        // Enough bullet lines to overflow the first page, so the page-break
        // path and every Mm/font-size call site get exercised.
        let record = ResumeRecord {
            experience: vec![crate::models::resume::ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                bullet_points: (0..120).map(|i| format!("Achievement {i}")).collect(),
                ..Default::default()
            }],
            ..record_with_name("Jane Doe")
        };
        let single_page = build(&record_with_name("Jane Doe"), true).unwrap();
        let multi_page = build(&record, true).unwrap();
        assert!(multi_page.starts_with(b"%PDF"));
        assert!(multi_page.len() > single_page.len());
    }

    #[test]
    fn test_wrap_splits_long_text() {
        let text = "word ".repeat(60);
        let wrapped = wrap(&text, 40);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.len() <= 40));
    }

    #[test]
    fn test_wrap_keeps_short_text_single_line() {
        assert_eq!(wrap("short text", 100), vec!["short text".to_string()]);
    }
}
