//! Dashboard renderers
//!
//! Markdown for reading in a terminal, CSV for spreadsheets, JSON for
//! anything else. `TerminalPresenter` writes one of them to a stream.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::dashboard::{Dashboard, DashboardSection, LeadSummary, Presenter};

/// Output format for the rendered dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Csv,
    Json,
}

/// Rendering options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub format: ReportFormat,
    /// Skip sections with no leads
    pub hide_empty: bool,
}

fn visible_sections<'a>(
    dashboard: &'a Dashboard,
    hide_empty: bool,
) -> impl Iterator<Item = &'a DashboardSection> {
    dashboard
        .sections
        .iter()
        .filter(move |section| !(hide_empty && section.is_empty()))
}

pub fn render(dashboard: &Dashboard, options: RenderOptions) -> String {
    match options.format {
        ReportFormat::Markdown => generate_dashboard_md(dashboard, options.hide_empty),
        ReportFormat::Csv => generate_dashboard_csv(dashboard, options.hide_empty),
        ReportFormat::Json => generate_dashboard_json(dashboard, options.hide_empty),
    }
}

/// Generate the markdown dashboard
pub fn generate_dashboard_md(dashboard: &Dashboard, hide_empty: bool) -> String {
    let mut report = String::from("# Lead Command Dashboard\n\n");
    report.push_str(&format!("Generated: {}\n\n", dashboard.generated_at));

    // Summary
    report.push_str("## Summary\n\n");
    for section in &dashboard.sections {
        report.push_str(&format!("- **{}:** {} leads\n", section.label, section.count()));
    }
    report.push_str(&format!("- **Total:** {} leads\n", dashboard.total_leads));
    report.push_str("\n---\n\n");

    for section in visible_sections(dashboard, hide_empty) {
        report.push_str(&format!(
            "## {} ({}) [{}]\n\n",
            section.label,
            section.count(),
            section.color
        ));

        if section.is_empty() {
            report.push_str("*No leads in this tier*\n\n");
            continue;
        }

        report.push_str(
            "| # | Name | Phone | Email | Vendor | State/Zip | Tags | Notes | Received | Last called | # Called |\n",
        );
        report.push_str(
            "|---|------|-------|-------|--------|-----------|------|-------|----------|-------------|----------|\n",
        );

        for (i, lead) in section.leads.iter().enumerate() {
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                i + 1,
                escape_md_cell(&lead.name),
                escape_md_cell(&lead.phone),
                escape_md_cell(&lead.email),
                escape_md_cell(&lead.vendor),
                escape_md_cell(&lead.state_zip),
                escape_md_cell(&truncate_str(&lead.tags, 60)),
                escape_md_cell(&truncate_str(&lead.notes, 80)),
                escape_md_cell(&lead.received),
                escape_md_cell(&lead.last_called),
                escape_md_cell(&lead.times_called),
            ));
        }
        report.push('\n');
    }

    report
}

/// Generate the CSV dashboard, one row per lead
pub fn generate_dashboard_csv(dashboard: &Dashboard, hide_empty: bool) -> String {
    let mut csv = String::from(
        "tier,name,phone,email,vendor,state_zip,tags,notes,received,last_called,times_called\n",
    );

    let write_lead = |csv: &mut String, tier: &str, lead: &LeadSummary| {
        let cells: [&str; 11] = [
            tier,
            &lead.name,
            &lead.phone,
            &lead.email,
            &lead.vendor,
            &lead.state_zip,
            &lead.tags,
            &lead.notes,
            &lead.received,
            &lead.last_called,
            &lead.times_called,
        ];
        let row: Vec<String> = cells.iter().map(|cell| escape_csv(cell)).collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    };

    for section in visible_sections(dashboard, hide_empty) {
        for lead in &section.leads {
            write_lead(&mut csv, &section.label, lead);
        }
    }

    csv
}

/// Generate the JSON dashboard
pub fn generate_dashboard_json(dashboard: &Dashboard, hide_empty: bool) -> String {
    let snapshot = Dashboard {
        generated_at: dashboard.generated_at.clone(),
        total_leads: dashboard.total_leads,
        sections: visible_sections(dashboard, hide_empty).cloned().collect(),
    };
    // Plain strings and integers only, serialization cannot fail
    serde_json::to_string_pretty(&snapshot).unwrap_or_default()
}

/// Helper to truncate strings for table display (Unicode-safe)
fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Keep a value on one table row and out of the column separators
fn escape_md_cell(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Helper to escape CSV fields
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Writes each presented dashboard to a stream
///
/// A terminal cannot take output back, so `clear` only forgets that a
/// dashboard was shown; errors go to stderr.
pub struct TerminalPresenter<W: Write> {
    out: W,
    options: RenderOptions,
    showing: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        Self {
            out,
            options,
            showing: false,
        }
    }

    /// Whether a dashboard is currently shown
    pub fn is_showing(&self) -> bool {
        self.showing
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, dashboard: &Dashboard) {
        let rendered = render(dashboard, self.options);
        if let Err(err) = self.out.write_all(rendered.as_bytes()).and_then(|_| self.out.flush()) {
            eprintln!("Failed to write dashboard: {}", err);
            self.showing = false;
            return;
        }
        self.showing = true;
    }

    fn clear(&mut self) {
        self.showing = false;
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{EMPTY_PLACEHOLDER, NO_NAME};

    fn summary(name: &str, tags: &str, notes: &str) -> LeadSummary {
        LeadSummary {
            name: name.to_string(),
            phone: "555-0100".to_string(),
            email: EMPTY_PLACEHOLDER.to_string(),
            vendor: "Acme".to_string(),
            state_zip: "CA 90210".to_string(),
            tags: tags.to_string(),
            notes: notes.to_string(),
            received: "01/05/2024, 02:05 PM".to_string(),
            last_called: EMPTY_PLACEHOLDER.to_string(),
            times_called: "2".to_string(),
        }
    }

    fn section(key: &str, label: &str, leads: Vec<LeadSummary>, catch_all: bool) -> DashboardSection {
        DashboardSection {
            key: key.to_string(),
            label: label.to_string(),
            color: key.to_string(),
            catch_all,
            leads,
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard {
            generated_at: "2024-01-06 09:00".to_string(),
            total_leads: 2,
            sections: vec![
                section(
                    "newMoney",
                    "NEW MONEY",
                    vec![summary("Ada Lovelace", "Appt Set | iPhone", "call, then \"quote\"")],
                    false,
                ),
                section("missingMoney", "MISSING MONEY", vec![], false),
                section(
                    "misc",
                    "MISC / UNCLASSIFIED",
                    vec![summary(NO_NAME, EMPTY_PLACEHOLDER, "line one\nline two")],
                    true,
                ),
            ],
        }
    }

    #[test]
    fn test_markdown_lists_every_section() {
        let md = generate_dashboard_md(&dashboard(), false);
        assert!(md.contains("- **NEW MONEY:** 1 leads"));
        assert!(md.contains("- **Total:** 2 leads"));
        assert!(md.contains("## MISSING MONEY (0) [missingMoney]"));
        assert!(md.contains("*No leads in this tier*"));
        assert!(md.contains("Appt Set \\| iPhone"));
        assert!(md.contains("line one line two"));

        let new_money = md.find("## NEW MONEY").unwrap();
        let misc = md.find("## MISC / UNCLASSIFIED").unwrap();
        assert!(new_money < misc);
    }

    #[test]
    fn test_markdown_hide_empty() {
        let md = generate_dashboard_md(&dashboard(), true);
        assert!(!md.contains("## MISSING MONEY"));
        // The summary still counts every tier
        assert!(md.contains("- **MISSING MONEY:** 0 leads"));
    }

    #[test]
    fn test_csv_rows_and_escaping() {
        let csv = generate_dashboard_csv(&dashboard(), false);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "tier,name,phone,email,vendor,state_zip,tags,notes,received,last_called,times_called"
        );
        assert!(lines[1].starts_with("NEW MONEY,Ada Lovelace,555-0100,"));
        assert!(lines[1].contains("\"call, then \"\"quote\"\"\""));
        assert!(lines[1].contains("\"01/05/2024, 02:05 PM\""));
        assert!(csv.contains("MISC / UNCLASSIFIED,No Name"));
    }

    #[test]
    fn test_json_round_trips_and_hides_empty() {
        let json = generate_dashboard_json(&dashboard(), true);
        let parsed: Dashboard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sections.len(), 2);
        assert!(parsed.sections[1].catch_all);
    }

    #[test]
    fn test_terminal_presenter_writes_and_clears() {
        let options = RenderOptions {
            format: ReportFormat::Csv,
            hide_empty: false,
        };
        let mut presenter = TerminalPresenter::new(Vec::new(), options);
        assert!(!presenter.is_showing());

        presenter.present(&dashboard());
        assert!(presenter.is_showing());

        presenter.clear();
        assert!(!presenter.is_showing());

        let written = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(written.starts_with("tier,name"));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("this is a very long string", 10), "this is...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
