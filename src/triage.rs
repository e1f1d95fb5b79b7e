//! Triage Module
//!
//! Groups classified leads into tier buckets for the dashboard.
//!
//! Bucketing Rules:
//! - One bucket per configured tier, in declared order
//! - The catch-all bucket always comes last
//! - Every bucket is emitted, even when empty
//! - Leads inside a bucket are ordered newest-received first

use chrono::{Local, TimeZone};
use tracing::info;

use crate::rules::TierSet;
use crate::sorter::sort_by_received_desc_in;
use crate::types::{Lead, Tier};

/// One tier and the leads assigned to it
#[derive(Debug, Clone, PartialEq)]
pub struct TierBucket {
    pub tier: Tier,
    pub leads: Vec<Lead>,
}

/// Statistics from triage process
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TriageStats {
    pub total: usize,
    /// (tier key, lead count) in bucket order, catch-all last
    pub counts: Vec<(String, usize)>,
}

impl TriageStats {
    pub fn count_for(&self, key: &str) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Classify every lead and bucket it by tier
pub fn assemble_dashboard(leads: Vec<Lead>, tiers: &TierSet) -> Vec<TierBucket> {
    assemble_with_stats(leads, tiers).0
}

/// Bucket leads against a plain tier list
///
/// Keywords that are empty after normalization are ignored.
pub fn assemble(leads: Vec<Lead>, tiers: &[Tier]) -> Vec<TierBucket> {
    assemble_dashboard(leads, &TierSet::compile(tiers.to_vec()))
}

/// Bucket leads and return statistics, sorting timestamps in the local zone
pub fn assemble_with_stats(leads: Vec<Lead>, tiers: &TierSet) -> (Vec<TierBucket>, TriageStats) {
    assemble_with_stats_in(leads, tiers, &Local)
}

pub fn assemble_with_stats_in<Tz: TimeZone>(
    leads: Vec<Lead>,
    tiers: &TierSet,
    tz: &Tz,
) -> (Vec<TierBucket>, TriageStats) {
    let total = leads.len();
    let catch_all_idx = tiers.tiers().len();
    let mut grouped: Vec<Vec<Lead>> = vec![Vec::new(); catch_all_idx + 1];

    for lead in leads {
        let idx = tiers.match_index(&lead).unwrap_or(catch_all_idx);
        grouped[idx].push(lead);
    }

    let buckets: Vec<TierBucket> = tiers
        .all()
        .zip(grouped)
        .map(|(tier, mut leads)| {
            sort_by_received_desc_in(&mut leads, tz);
            TierBucket {
                tier: tier.clone(),
                leads,
            }
        })
        .collect();

    let counts: Vec<(String, usize)> = buckets
        .iter()
        .map(|bucket| (bucket.tier.key.clone(), bucket.leads.len()))
        .collect();

    for (key, count) in &counts {
        info!(tier = %key, count, "tier assembled");
    }

    (buckets, TriageStats { total, counts })
}
