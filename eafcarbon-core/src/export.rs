//! Report export.
//!
//! A front end that rasterizes its rendered report implements
//! [`ReportExporter`] itself. The exporters here produce single-page documents
//! straight from a [`ReportView`]; failures are reported as [`ExportError`]
//! and never touch calculation state.

use crate::errors::ExportError;
use crate::report::{ReportView, REPORT_FILE_STEM};
use std::fmt::Write as _;
use std::io::Write;

/// A finished document ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Writes the document bytes to `writer`.
    pub fn write_to(&self, mut writer: impl Write) -> Result<(), ExportError> {
        writer.write_all(&self.bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Turns a report view into a downloadable document.
pub trait ReportExporter {
    fn export(&self, report: &ReportView) -> Result<ExportArtifact, ExportError>;
}

/// Exports the report as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl ReportExporter for JsonExporter {
    fn export(&self, report: &ReportView) -> Result<ExportArtifact, ExportError> {
        Ok(ExportArtifact {
            file_name: format!("{REPORT_FILE_STEM}.json"),
            media_type: "application/json",
            bytes: serde_json::to_vec_pretty(report)?,
        })
    }
}

/// Exports the report as a single plain-text page.
///
/// The page has a fixed number of lines; a report that does not fit fails
/// with [`ExportError::PageOverflow`] rather than spilling onto a second page.
#[derive(Debug, Clone, Copy)]
pub struct TextPageExporter {
    pub page_lines: usize,
}

impl Default for TextPageExporter {
    /// 66 lines, a printed letter page at six lines per inch.
    fn default() -> Self {
        Self { page_lines: 66 }
    }
}

impl TextPageExporter {
    fn render(report: &ReportView) -> String {
        let mut page = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(page, "{}", report.title);
        let _ = writeln!(page, "{}", "=".repeat(report.title.chars().count()));
        for figure in &report.summary {
            let _ = writeln!(page, "{}: {}", figure.label, figure.text);
        }
        let sections = [
            ("Largest sources", &report.top),
            ("Emissions per ton of steel", &report.per_ton),
            ("Offsets", &report.offsets),
        ];
        for (heading, rows) in sections {
            if rows.is_empty() {
                continue;
            }
            let _ = writeln!(page, "\n{heading}");
            for row in rows.iter() {
                let _ = writeln!(page, "  {}", row.text);
            }
        }
        if !report.warnings.is_empty() {
            let _ = writeln!(page, "\nWarnings");
            for warning in &report.warnings {
                let _ = writeln!(page, "  {warning}");
            }
        }
        page
    }
}

impl ReportExporter for TextPageExporter {
    fn export(&self, report: &ReportView) -> Result<ExportArtifact, ExportError> {
        let page = Self::render(report);
        let required = page.lines().count();
        if required > self.page_lines {
            return Err(ExportError::PageOverflow {
                required,
                available: self.page_lines,
            });
        }
        Ok(ExportArtifact {
            file_name: format!("{REPORT_FILE_STEM}.txt"),
            media_type: "text/plain; charset=utf-8",
            bytes: page.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calculate;
    use crate::materials::{LIME, NATURAL_GAS, STEAM_RECOVERY};
    use crate::parameters::{IntensityInput, ProcessParameters};

    fn view() -> ReportView {
        let intensities = IntensityInput::new()
            .with(NATURAL_GAS, 20.0)
            .with(LIME, 40.0)
            .with(STEAM_RECOVERY, 30.0);
        ReportView::new(&calculate(&ProcessParameters::default(), &intensities))
    }

    #[test]
    fn test_json_export_round_trips() {
        let report = view();
        let artifact = JsonExporter.export(&report).unwrap();
        assert_eq!(artifact.file_name, "carbon-report.json");
        let decoded: ReportView = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(decoded, report);
    }

    #[test]
    fn test_text_export_fits_default_page() {
        let artifact = TextPageExporter::default().export(&view()).unwrap();
        assert_eq!(artifact.file_name, "carbon-report.txt");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.starts_with("EAF carbon emissions report"));
        assert!(text.contains("Offsets"));
    }

    #[test]
    fn test_text_export_overflow() {
        let exporter = TextPageExporter { page_lines: 5 };
        let err = exporter.export(&view()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::PageOverflow { available: 5, .. }
        ));
    }

    #[test]
    fn test_write_to_buffer() {
        let artifact = JsonExporter.export(&view()).unwrap();
        let mut buffer = Vec::new();
        artifact.write_to(&mut buffer).unwrap();
        assert_eq!(buffer, artifact.bytes);
    }
}
