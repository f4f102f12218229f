use super::Report;

/// Plain-text report file renderer
pub struct TextReporter;

impl TextReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &Report) -> String {
        let mut out = String::new();

        out.push_str(&format!("{} ({})\n", report.title, report.mode()));
        out.push_str(&format!("Generated: {}\n", report.generated));
        out.push_str(&format!("Project: {}\n", report.project.display()));
        out.push('\n');

        out.push_str("Summary:\n");
        for line in &report.summary {
            out.push_str(&format!(" - {}: {}\n", line.label, line.count));
        }

        for section in &report.sections {
            out.push('\n');
            out.push_str(&format!("{} ({}):\n", section.title, section.entries.len()));
            if section.entries.is_empty() {
                out.push_str(" - None\n");
            }
            for entry in &section.entries {
                match &entry.detail {
                    Some(detail) => out.push_str(&format!(" - {} ({})\n", entry.label, detail)),
                    None => out.push_str(&format!(" - {}\n", entry.label)),
                }
            }
        }

        out
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}
