//! Lead Merging and Deduplication
//!
//! Unions two lead exports into one list. Duplicates are detected by an
//! identity key (normalized phone + email); when two rows share a key the
//! richer row wins, keeping the position of the first occurrence.

use std::collections::HashMap;
use tracing::debug;

use crate::normalize::normalize_text;
use crate::types::Lead;

/// Separator between the phone and email halves of an identity key
const KEY_SEPARATOR: &str = "__";

/// Generate the identity key for a lead
///
/// Key is `normalize(phone) + "__" + normalize(email)`, where phone falls back
/// to the alternate `Phone` column. Leads with neither phone nor email all
/// share the key `"__"` and are merged together.
pub fn identity_key(lead: &Lead) -> String {
    format!(
        "{}{}{}",
        normalize_text(lead.phone()),
        KEY_SEPARATOR,
        normalize_text(lead.email())
    )
}

/// Richness score used to pick between two duplicate rows
///
/// `2 * has_notes + 1 * has_tags + 0.01 * tag_token_count`
///
/// Every `|`-delimited piece of a non-blank tag field counts as a token,
/// empty pieces included, so `"y|"` has two.
pub fn richness_score(notes: &str, tags: &str) -> f64 {
    let has_notes = !notes.trim().is_empty();
    let tags = tags.trim();
    let has_tags = !tags.is_empty();
    let token_count = if has_tags { tags.split('|').count() } else { 0 };

    let mut score = 0.0;
    if has_notes {
        score += 2.0;
    }
    if has_tags {
        score += 1.0;
    }
    score + 0.01 * token_count as f64
}

fn lead_score(lead: &Lead) -> f64 {
    richness_score(lead.notes(), lead.tags())
}

/// Merge statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub total_input: usize,
    pub unique_output: usize,
    pub duplicates_removed: usize,
    /// Duplicates that displaced the previously kept row
    pub replaced: usize,
}

/// Merge two lead lists, keeping one lead per identity key
pub fn merge_leads(first: Vec<Lead>, second: Vec<Lead>) -> Vec<Lead> {
    merge_leads_with_stats(first, second).0
}

/// Merge two lead lists and return statistics
///
/// When duplicates are found:
/// - The first occurrence fixes the output position
/// - A later row replaces the kept row only if its richness score is strictly higher
pub fn merge_leads_with_stats(first: Vec<Lead>, second: Vec<Lead>) -> (Vec<Lead>, MergeStats) {
    let total_input = first.len() + second.len();
    let mut merged: Vec<Lead> = Vec::with_capacity(total_input);
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut replaced = 0;

    for lead in first.into_iter().chain(second) {
        let key = identity_key(&lead);

        match positions.get(&key) {
            Some(&idx) => {
                let kept_score = lead_score(&merged[idx]);
                let incoming_score = lead_score(&lead);
                if incoming_score > kept_score {
                    debug!(
                        key = %key,
                        kept_score,
                        incoming_score,
                        "duplicate lead replaces kept row"
                    );
                    merged[idx] = lead;
                    replaced += 1;
                } else {
                    debug!(key = %key, kept_score, incoming_score, "duplicate lead discarded");
                }
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(lead);
            }
        }
    }

    let unique_output = merged.len();
    let stats = MergeStats {
        total_input,
        unique_output,
        duplicates_removed: total_input - unique_output,
        replaced,
    };

    (merged, stats)
}
