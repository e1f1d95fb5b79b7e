//! Dashboard pipeline
//!
//! input gate → concurrent read → parse → merge → classify/assemble → present
//!
//! Each invocation owns its data end to end, so a new invocation never
//! observes state from an earlier one.

use std::path::Path;
use tracing::{error, info};

use crate::dashboard::{Dashboard, Presenter};
use crate::error::{DashboardError, Result};
use crate::merge::merge_leads_with_stats;
use crate::parser::parse_csv;
use crate::rules::TierSet;
use crate::storage::read_input_pair;
use crate::triage::{assemble_with_stats, TierBucket, TriageStats};

/// Number of lead exports one invocation takes
pub const EXPECTED_INPUTS: usize = 2;

/// Reject any invocation that does not supply exactly two inputs
pub fn check_input_count<P>(inputs: &[P]) -> Result<()> {
    if inputs.len() != EXPECTED_INPUTS {
        return Err(DashboardError::InputCount {
            expected: EXPECTED_INPUTS,
            received: inputs.len(),
        });
    }
    Ok(())
}

/// Parse, merge and bucket two CSV texts
pub fn classify_texts(first: &str, second: &str, tiers: &TierSet) -> (Vec<TierBucket>, TriageStats) {
    let first = parse_csv(first);
    let second = parse_csv(second);
    info!(first = first.len(), second = second.len(), "parsed lead files");

    let (merged, merge_stats) = merge_leads_with_stats(first, second);
    info!(
        unique = merge_stats.unique_output,
        duplicates = merge_stats.duplicates_removed,
        replaced = merge_stats.replaced,
        "merged leads"
    );

    assemble_with_stats(merged, tiers)
}

/// Build the dashboard snapshot for two CSV texts
pub fn build_dashboard(first: &str, second: &str, tiers: &TierSet) -> Dashboard {
    let (buckets, stats) = classify_texts(first, second, tiers);
    Dashboard::from_buckets(&buckets, &stats)
}

/// Run the whole pipeline for a set of input paths
pub async fn run<P: AsRef<Path>>(inputs: &[P], tiers: &TierSet) -> Result<Dashboard> {
    check_input_count(inputs)?;

    let (first, second) = read_input_pair(inputs[0].as_ref(), inputs[1].as_ref()).await?;
    Ok(build_dashboard(&first, &second, tiers))
}

/// Run the pipeline and hand the outcome to a presenter
///
/// On error the presenter shows the message and is cleared; no partial
/// dashboard is ever presented.
pub async fn invoke<P, R>(inputs: &[P], tiers: &TierSet, presenter: &mut R) -> Result<()>
where
    P: AsRef<Path>,
    R: Presenter + ?Sized,
{
    match run(inputs, tiers).await {
        Ok(dashboard) => {
            presenter.present(&dashboard);
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "dashboard invocation failed");
            presenter.show_error(&err.to_string());
            presenter.clear();
            Err(err)
        }
    }
}
