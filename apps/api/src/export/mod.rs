//! Exporter — maps a validated resume onto a fixed single-column PDF page
//! layout.
//!
//! A4, 15 mm margins, per-section font sizes from `ExportConfig`. A cursor
//! walks down the page; content that would pass the bottom margin triggers
//! an automatic break onto a fresh page. There is no other pagination
//! logic. CPU-bound — callers run `render_pdf` inside
//! `tokio::task::spawn_blocking`.

pub mod font_metrics;
pub mod handlers;
pub mod sanitize;

use anyhow::Result;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::models::resume::TailoredResume;
use self::font_metrics::{default_export_config, metrics_for, wrap_words, ExportConfig, FontStyle};
use self::sanitize::sanitize;

/// Vertical advance per text line, in mm.
const LINE_HEIGHT_MM: f32 = 5.0;
/// Gap above a section header.
const SECTION_GAP_MM: f32 = 5.0;
/// Gap after an experience/project/education entry.
const ENTRY_GAP_MM: f32 = 3.0;
/// Bullet indent relative to the left margin.
const BULLET_INDENT_MM: f32 = 5.0;

/// Renders a validated resume to PDF bytes.
///
/// All text passes through the sanitizer, so any input renders; an empty
/// resume yields a page with just the "Resume" placeholder heading.
pub fn render_pdf(resume: &TailoredResume) -> Result<Vec<u8>> {
    let mut writer = PageWriter::new(default_export_config())?;
    let sizes = writer.config.font_sizes;

    // Header: name centered, then one centered contact line.
    let name = sanitize(resume.personal_info.name.trim());
    let name = if name.is_empty() { "Resume".to_string() } else { name };
    writer.centered_line(&name, FontStyle::Bold, sizes.name, 10.0);

    let contact_items: Vec<&str> = [
        resume.personal_info.phone.as_str(),
        resume.personal_info.email.as_str(),
        resume.personal_info.linkedin.as_str(),
        resume.personal_info.github.as_str(),
        resume.personal_info.location.as_str(),
    ]
    .into_iter()
    .filter(|item| !item.trim().is_empty())
    .collect();

    if !contact_items.is_empty() {
        let contact_line = sanitize(&contact_items.join(" | "));
        writer.centered_line(&contact_line, FontStyle::Regular, sizes.body, LINE_HEIGHT_MM);
    }
    writer.advance(LINE_HEIGHT_MM);

    if !resume.skills.is_empty() {
        writer.section_title("SKILLS");
        let skills_line = sanitize(&resume.skills.join(", "));
        writer.paragraph(&skills_line, FontStyle::Regular, sizes.body, 0.0);
    }

    if !resume.experience.is_empty() {
        writer.section_title("EXPERIENCE");
        for entry in &resume.experience {
            writer.job_entry(
                &entry.role,
                &entry.company,
                &entry.duration,
                &entry.location,
                &entry.points,
            );
        }
    }

    if !resume.projects.is_empty() {
        writer.section_title("PROJECTS");
        for entry in &resume.projects {
            // Projects reuse the job layout: title up top, role where the
            // company sits, no trailing location cell.
            writer.job_entry(&entry.title, &entry.role, &entry.duration, "", &entry.points);
        }
    }

    if !resume.education.is_empty() {
        writer.section_title("EDUCATION");
        for entry in &resume.education {
            writer.education_entry(&entry.school, &entry.degree, &entry.duration, &entry.location);
        }
    }

    writer.finish()
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

/// Cursor-based page writer. `y_mm` is measured from the top of the page;
/// printpdf's own origin is bottom-left, so baselines are flipped at write
/// time.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    config: ExportConfig,
    y_mm: f32,
}

impl PageWriter {
    fn new(config: ExportConfig) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            "Tailored Resume",
            Mm(config.page_width_mm),
            Mm(config.page_height_mm),
            "content",
        );

        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| anyhow::anyhow!("Failed to load Helvetica: {e}"))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| anyhow::anyhow!("Failed to load Helvetica-Bold: {e}"))?,
            oblique: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(|e| anyhow::anyhow!("Failed to load Helvetica-Oblique: {e}"))?,
        };

        let layer = doc.get_page(page).get_layer(layer);
        let y_mm = config.margin_mm;

        Ok(Self {
            doc,
            layer,
            fonts,
            config,
            y_mm,
        })
    }

    fn font(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.fonts.regular,
            FontStyle::Bold => &self.fonts.bold,
            FontStyle::Oblique => &self.fonts.oblique,
        }
    }

    fn content_width(&self) -> f32 {
        self.config.page_width_mm - 2.0 * self.config.margin_mm
    }

    fn advance(&mut self, mm: f32) {
        self.y_mm += mm;
    }

    /// Breaks onto a fresh page when fewer than `needed_mm` remain above
    /// the bottom margin.
    fn ensure_space(&mut self, needed_mm: f32) {
        if self.y_mm + needed_mm > self.config.page_height_mm - self.config.margin_mm {
            let (page, layer) = self.doc.add_page(
                Mm(self.config.page_width_mm),
                Mm(self.config.page_height_mm),
                "content",
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y_mm = self.config.margin_mm;
        }
    }

    /// Writes one already-wrapped line at `x_mm` from the left page edge.
    /// Does not move the cursor.
    fn write_line_at(&self, text: &str, style: FontStyle, size_pt: f32, x_mm: f32) {
        let baseline = self.config.page_height_mm
            - (self.y_mm + size_pt * font_metrics::PT_TO_MM);
        self.layer
            .use_text(text, size_pt, Mm(x_mm), Mm(baseline), self.font(style));
    }

    /// Centered single line, advancing the cursor by `advance_mm`.
    fn centered_line(&mut self, text: &str, style: FontStyle, size_pt: f32, advance_mm: f32) {
        self.ensure_space(advance_mm);
        let width_mm = metrics_for(style).measure_mm(text, size_pt);
        let x = ((self.config.page_width_mm - width_mm) / 2.0).max(self.config.margin_mm);
        self.write_line_at(text, style, size_pt, x);
        self.advance(advance_mm);
    }

    /// Two cells on one line: left text at the margin, right text
    /// right-aligned against the opposite margin.
    fn split_line(
        &mut self,
        left: &str,
        left_style: FontStyle,
        left_size: f32,
        right: &str,
        right_style: FontStyle,
        right_size: f32,
    ) {
        self.ensure_space(LINE_HEIGHT_MM);
        self.write_line_at(left, left_style, left_size, self.config.margin_mm);
        if !right.is_empty() {
            let right_width = metrics_for(right_style).measure_mm(right, right_size);
            let x = self.config.page_width_mm - self.config.margin_mm - right_width;
            self.write_line_at(right, right_style, right_size, x.max(self.config.margin_mm));
        }
        self.advance(LINE_HEIGHT_MM);
    }

    /// Word-wrapped paragraph at an indent, one cursor line per wrapped row.
    fn paragraph(&mut self, text: &str, style: FontStyle, size_pt: f32, indent_mm: f32) {
        let width = self.content_width() - indent_mm;
        for line in wrap_words(text, style, size_pt, width) {
            self.ensure_space(LINE_HEIGHT_MM);
            self.write_line_at(&line, style, size_pt, self.config.margin_mm + indent_mm);
            self.advance(LINE_HEIGHT_MM);
        }
    }

    /// Section header with a full-width rule underneath. Reserves enough
    /// room that a header is never stranded at the very bottom of a page.
    fn section_title(&mut self, label: &str) {
        self.ensure_space(SECTION_GAP_MM + 2.0 * LINE_HEIGHT_MM);
        self.advance(SECTION_GAP_MM);

        let size = self.config.font_sizes.section_title;
        self.write_line_at(label, FontStyle::Bold, size, self.config.margin_mm);
        self.advance(LINE_HEIGHT_MM);

        let rule_y = self.config.page_height_mm - self.y_mm + 1.5;
        let rule = Line {
            points: vec![
                (Point::new(Mm(self.config.margin_mm), Mm(rule_y)), false),
                (
                    Point::new(Mm(self.config.page_width_mm - self.config.margin_mm), Mm(rule_y)),
                    false,
                ),
            ],
            is_closed: false,
        };
        self.layer.add_line(rule);
        self.advance(2.0);
    }

    /// One experience or project entry: role/duration row, optional
    /// company/location row, then indented bullet points.
    fn job_entry(
        &mut self,
        role: &str,
        company: &str,
        duration: &str,
        location: &str,
        points: &[String],
    ) {
        let sizes = self.config.font_sizes;

        self.split_line(
            &sanitize(role),
            FontStyle::Bold,
            sizes.job_title,
            &sanitize(duration),
            FontStyle::Oblique,
            sizes.body,
        );

        if !company.trim().is_empty() || !location.trim().is_empty() {
            self.split_line(
                &sanitize(company),
                FontStyle::Oblique,
                sizes.job_title,
                &sanitize(location),
                FontStyle::Oblique,
                sizes.body,
            );
        }

        for point in points {
            let bullet = format!("- {}", sanitize(point));
            self.paragraph(&bullet, FontStyle::Regular, sizes.body, BULLET_INDENT_MM);
        }

        self.advance(ENTRY_GAP_MM);
    }

    /// One education entry: school/duration row, degree/location row.
    fn education_entry(&mut self, school: &str, degree: &str, duration: &str, location: &str) {
        let sizes = self.config.font_sizes;

        self.split_line(
            &sanitize(school),
            FontStyle::Bold,
            sizes.job_title,
            &sanitize(duration),
            FontStyle::Oblique,
            sizes.body,
        );
        self.split_line(
            &sanitize(degree),
            FontStyle::Regular,
            sizes.body,
            &sanitize(location),
            FontStyle::Oblique,
            sizes.body,
        );

        self.advance(ENTRY_GAP_MM);
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| anyhow::anyhow!("PDF serialization failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{
        EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, TailoredResume,
    };

    fn sample_resume() -> TailoredResume {
        TailoredResume {
            executive_summary: vec!["Added keywords 'Rust' and 'Tokio' to Skills".to_string()],
            personal_info: PersonalInfo {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+44 20 7946 0000".to_string(),
                linkedin: "linkedin.com/in/ada".to_string(),
                github: "github.com/ada".to_string(),
                location: "London, UK".to_string(),
            },
            skills: vec!["Rust".to_string(), "Tokio".to_string(), "Axum".to_string()],
            experience: vec![ExperienceEntry {
                company: "Analytical Engines Ltd".to_string(),
                role: "Principal Engineer".to_string(),
                duration: "2019 - Present".to_string(),
                location: "London".to_string(),
                points: vec![
                    "Designed the difference engine pipeline end to end".to_string(),
                    "Mentored a team of four engineers on systems design".to_string(),
                ],
            }],
            projects: vec![ProjectEntry {
                title: "Notes on the Analytical Engine".to_string(),
                role: "Author".to_string(),
                duration: "2021".to_string(),
                points: vec!["Published the first program".to_string()],
            }],
            education: vec![EducationEntry {
                school: "Home Tutoring".to_string(),
                degree: "Mathematics".to_string(),
                duration: "1833 - 1842".to_string(),
                location: "London".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_pdf(&sample_resume()).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF stream");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_empty_resume_still_produces_pdf() {
        let bytes = render_pdf(&TailoredResume::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_overflows_to_additional_pages() {
        let mut resume = sample_resume();
        // Enough entries to overrun a single A4 page several times.
        let entry = resume.experience[0].clone();
        resume.experience = std::iter::repeat(entry).take(40).collect();

        let long = render_pdf(&resume).unwrap();
        let short = render_pdf(&sample_resume()).unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_render_survives_non_ascii_content() {
        let mut resume = sample_resume();
        resume.personal_info.name = "Zoë Müller \u{1F980}".to_string();
        resume.skills.push("日本語".to_string());

        // Lossy transliteration, never an error.
        let bytes = render_pdf(&resume).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
