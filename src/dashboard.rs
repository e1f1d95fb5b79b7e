//! Dashboard snapshot handed to the presentation layer
//!
//! A `Dashboard` is an immutable, display-ready view of one pipeline run:
//! one section per configured tier in declared order, then the catch-all
//! section. Presenters receive it by reference and never reach back into
//! pipeline state.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::sorter::format_timestamp_in;
use crate::triage::{TierBucket, TriageStats};
use crate::types::Lead;

/// Shown in place of a blank value
pub const EMPTY_PLACEHOLDER: &str = "—";
/// Shown when a lead has neither first nor last name
pub const NO_NAME: &str = "No Name";

/// Display-ready fields of one lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub vendor: String,
    pub state_zip: String,
    pub tags: String,
    pub notes: String,
    pub received: String,
    pub last_called: String,
    pub times_called: String,
}

impl LeadSummary {
    /// Summarize a lead, formatting timestamps in the local zone
    pub fn from_lead(lead: &Lead) -> Self {
        Self::from_lead_in(lead, &Local)
    }

    pub fn from_lead_in<Tz: TimeZone>(lead: &Lead, tz: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            name: display_name(lead),
            phone: or_placeholder(lead.phone()),
            email: or_placeholder(lead.email()),
            vendor: or_placeholder(lead.vendor()),
            state_zip: state_zip(lead),
            tags: or_placeholder(lead.tags()),
            notes: or_placeholder(lead.notes()),
            received: format_timestamp_in(lead.received_on(), tz),
            last_called: format_timestamp_in(lead.last_called(), tz),
            times_called: format_count(lead.times_called()),
        }
    }
}

/// `first last`, or "No Name" when both are blank
pub fn display_name(lead: &Lead) -> String {
    let full = format!("{} {}", lead.first_name().trim(), lead.last_name().trim());
    let full = full.trim();
    if full.is_empty() {
        NO_NAME.to_string()
    } else {
        full.to_string()
    }
}

fn or_placeholder(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

fn state_zip(lead: &Lead) -> String {
    let joined = format!("{} {}", lead.state().trim(), lead.zip().trim());
    or_placeholder(&joined)
}

/// Call count as a plain integer when it parses as one, otherwise the literal value
fn format_count(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }
    match trimmed.parse::<u64>() {
        Ok(count) => count.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// One tier's group of leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSection {
    pub key: String,
    pub label: String,
    pub color: String,
    pub catch_all: bool,
    pub leads: Vec<LeadSummary>,
}

impl DashboardSection {
    pub fn count(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

/// Complete dashboard for one pair of inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub generated_at: String,
    pub total_leads: usize,
    pub sections: Vec<DashboardSection>,
}

impl Dashboard {
    /// Build the snapshot from assembled buckets, formatting in the local zone
    pub fn from_buckets(buckets: &[TierBucket], stats: &TriageStats) -> Self {
        Self::from_buckets_in(buckets, stats, &Local, Local::now())
    }

    pub fn from_buckets_in<Tz: TimeZone>(
        buckets: &[TierBucket],
        stats: &TriageStats,
        tz: &Tz,
        generated_at: DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: Display,
    {
        let sections = buckets
            .iter()
            .map(|bucket| DashboardSection {
                key: bucket.tier.key.clone(),
                label: bucket.tier.label.clone(),
                color: bucket.tier.color.clone(),
                catch_all: bucket.tier.is_catch_all(),
                leads: bucket
                    .leads
                    .iter()
                    .map(|lead| LeadSummary::from_lead_in(lead, tz))
                    .collect(),
            })
            .collect();

        Self {
            generated_at: generated_at.format("%Y-%m-%d %H:%M").to_string(),
            total_leads: stats.total,
            sections,
        }
    }

    pub fn section(&self, key: &str) -> Option<&DashboardSection> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// The catch-all section, always the last one
    pub fn catch_all(&self) -> Option<&DashboardSection> {
        self.sections.last().filter(|s| s.catch_all)
    }
}

/// The consumed interface of the presentation layer
///
/// `present` replaces whatever was shown before; `clear` removes it.
/// On a failed invocation the pipeline calls `show_error` then `clear`
/// and never `present`.
pub trait Presenter {
    fn present(&mut self, dashboard: &Dashboard);
    fn clear(&mut self);
    fn show_error(&mut self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_display_name() {
        let lead: Lead = [("First name", " Ada "), ("Last name", "")].into_iter().collect();
        assert_eq!(display_name(&lead), "Ada");

        let lead: Lead = [("First name", ""), ("Last name", "Lovelace")].into_iter().collect();
        assert_eq!(display_name(&lead), "Lovelace");

        let lead: Lead = [("First name", "  "), ("Last name", " ")].into_iter().collect();
        assert_eq!(display_name(&lead), NO_NAME);
    }

    #[test]
    fn test_summary_placeholders() {
        let summary = LeadSummary::from_lead_in(&Lead::default(), &Utc);
        assert_eq!(summary.name, NO_NAME);
        assert_eq!(summary.phone, EMPTY_PLACEHOLDER);
        assert_eq!(summary.email, EMPTY_PLACEHOLDER);
        assert_eq!(summary.vendor, EMPTY_PLACEHOLDER);
        assert_eq!(summary.state_zip, EMPTY_PLACEHOLDER);
        assert_eq!(summary.tags, EMPTY_PLACEHOLDER);
        assert_eq!(summary.notes, EMPTY_PLACEHOLDER);
        assert_eq!(summary.received, EMPTY_PLACEHOLDER);
        assert_eq!(summary.last_called, EMPTY_PLACEHOLDER);
        assert_eq!(summary.times_called, EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_summary_values() {
        let lead: Lead = [
            ("First name", "Ada"),
            ("Last name", "Lovelace"),
            ("Phone number", "555-0100"),
            ("Email", "ada@example.com"),
            ("Lead vendor", "Acme"),
            ("State", "CA"),
            ("ZIP code", ""),
            ("Disposition tags", "Appt Set | iPhone"),
            ("Notes", "call after 5"),
            ("Received on", "2024-01-05T14:05:00Z"),
            ("Last called", "last week"),
            ("Num times called", " 03 "),
        ]
        .into_iter()
        .collect();

        let summary = LeadSummary::from_lead_in(&lead, &Utc);
        assert_eq!(summary.name, "Ada Lovelace");
        assert_eq!(summary.state_zip, "CA");
        assert_eq!(summary.tags, "Appt Set | iPhone");
        assert_eq!(summary.received, "01/05/2024, 02:05 PM");
        assert_eq!(summary.last_called, "last week");
        assert_eq!(summary.times_called, "3");
    }

    #[test]
    fn test_format_count_passthrough() {
        assert_eq!(format_count("many"), "many");
        assert_eq!(format_count("-1"), "-1");
        assert_eq!(format_count("7"), "7");
    }
}
