//! Tier Rules Engine
//!
//! Loads tier definitions from Config/tiers.yaml (or the compiled-in defaults),
//! validates them, and classifies leads by their disposition tags.
//!
//! Matching rule: a tier matches when any normalized tag token equals one of
//! its normalized keywords or starts with it. Tiers are tried in declared
//! order and the first match wins; leads matching nothing go to the
//! catch-all tier.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::DashboardError;
use crate::normalize::{normalize_text, normalized_tags};
use crate::types::{Lead, Tier, TiersConfig, CATCH_ALL_KEY};

/// Load tier configuration from a YAML file
pub fn load_tiers(path: &Path) -> Result<TiersConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tiers from {:?}", path))?;

    parse_tiers(&content).with_context(|| format!("Failed to parse tiers from {:?}", path))
}

/// Parse tier configuration from YAML text
pub fn parse_tiers(content: &str) -> Result<TiersConfig> {
    let config: TiersConfig =
        serde_yaml::from_str(content).with_context(|| "Failed to parse tiers YAML")?;
    Ok(config)
}

/// The canonical tier list, used when no configuration file is supplied
pub fn default_tiers() -> Vec<Tier> {
    fn tier(key: &str, label: &str, keywords: &[&str]) -> Tier {
        Tier {
            key: key.to_string(),
            label: label.to_string(),
            color: key.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    vec![
        tier("newMoney", "NEW MONEY", &["Appt Set", "Quoted w F/U"]),
        tier(
            "missingMoney",
            "MISSING MONEY",
            &[
                "Quotes Via SMS",
                "Missed Appt",
                "Quoted and Ghosted",
                "Objection, then sent Quote",
            ],
        ),
        tier(
            "moneyCantHide",
            "MONEY CANT HIDE",
            &["Hit List/Ghosted", "Manual Added Ghosted"],
        ),
        tier(
            "comingForMoney",
            "COMING FOR MONEY",
            &[
                "Positive positive positive",
                "Positive Auto Reply",
                "Auto Ind Medical",
                "Auto Family",
                "Op Reply",
                "TD Reply",
                "OnlySales Reply",
                "Opened Email",
                "Email Replied",
                "positive -smallBusiness",
            ],
        ),
        tier(
            "todaysMoney",
            "TODAY’S MONEY",
            &["New Purchased Lead", "Personal Social Media Leads", "Website Lead"],
        ),
    ]
}

/// Check tier definitions for errors that would make classification ambiguous
///
/// Returns every problem found, not just the first.
pub fn validate_tiers(tiers: &[Tier]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen_keys: HashSet<&str> = HashSet::new();

    for (idx, tier) in tiers.iter().enumerate() {
        let position = idx + 1;

        if tier.key.trim().is_empty() {
            errors.push(format!("Tier #{} has an empty key", position));
        } else if tier.key == CATCH_ALL_KEY {
            errors.push(format!(
                "Tier #{} uses the reserved catch-all key '{}'",
                position, CATCH_ALL_KEY
            ));
        } else if !seen_keys.insert(tier.key.as_str()) {
            errors.push(format!("Tier key '{}' is defined more than once", tier.key));
        }

        if tier.label.trim().is_empty() {
            errors.push(format!("Tier '{}' has an empty label", tier.key));
        }

        for keyword in &tier.keywords {
            if normalize_text(keyword).is_empty() {
                errors.push(format!(
                    "Tier '{}' has a keyword that is empty after normalization: {:?}",
                    tier.key, keyword
                ));
            }
        }
    }

    errors
}

/// Non-fatal findings about a tier list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierWarning {
    /// The same normalized keyword appears more than once
    DuplicateKeyword { tier: String, keyword: String },
    /// A keyword can never decide a match because an earlier keyword is its prefix
    ShadowedKeyword {
        tier: String,
        keyword: String,
        shadowed_by_tier: String,
        shadowed_by: String,
    },
    /// A tier with no keywords never matches anything
    NoKeywords { tier: String },
}

impl std::fmt::Display for TierWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierWarning::DuplicateKeyword { tier, keyword } => {
                write!(f, "Tier '{}' repeats keyword '{}'", tier, keyword)
            }
            TierWarning::ShadowedKeyword {
                tier,
                keyword,
                shadowed_by_tier,
                shadowed_by,
            } => write!(
                f,
                "Keyword '{}' in tier '{}' is unreachable: '{}' in tier '{}' matches first",
                keyword, tier, shadowed_by, shadowed_by_tier
            ),
            TierWarning::NoKeywords { tier } => {
                write!(f, "Tier '{}' has no keywords and will always be empty", tier)
            }
        }
    }
}

/// Audit a tier list for unreachable or redundant keywords
pub fn audit_tiers(tiers: &[Tier]) -> Vec<TierWarning> {
    let mut warnings = Vec::new();
    // (tier key, normalized keyword) in evaluation order
    let mut earlier: Vec<(&str, String)> = Vec::new();

    for tier in tiers {
        if tier.keywords.is_empty() {
            warnings.push(TierWarning::NoKeywords {
                tier: tier.key.clone(),
            });
            continue;
        }

        let mut current: Vec<String> = Vec::new();
        for keyword in &tier.keywords {
            let normalized = normalize_text(keyword);
            if normalized.is_empty() {
                continue;
            }

            if current.contains(&normalized) {
                warnings.push(TierWarning::DuplicateKeyword {
                    tier: tier.key.clone(),
                    keyword: keyword.clone(),
                });
                continue;
            }

            // Within one tier a prefix only overlaps, the tier still wins.
            // Across tiers an earlier prefix takes every token this keyword would.
            if let Some((by_tier, by_keyword)) = earlier
                .iter()
                .find(|(_, prior)| normalized.starts_with(prior.as_str()))
            {
                warnings.push(TierWarning::ShadowedKeyword {
                    tier: tier.key.clone(),
                    keyword: keyword.clone(),
                    shadowed_by_tier: by_tier.to_string(),
                    shadowed_by: by_keyword.clone(),
                });
            }

            current.push(normalized);
        }

        earlier.extend(current.into_iter().map(|k| (tier.key.as_str(), k)));
    }

    warnings
}

/// Tier list with keywords pre-normalized for classification
#[derive(Debug, Clone)]
pub struct TierSet {
    tiers: Vec<Tier>,
    keywords: Vec<Vec<String>>,
    catch_all: Tier,
}

impl TierSet {
    /// Build a tier set, rejecting definitions that fail validation
    pub fn new(tiers: Vec<Tier>) -> Result<Self, DashboardError> {
        let errors = validate_tiers(&tiers);
        if !errors.is_empty() {
            return Err(DashboardError::Config(errors.join("; ")));
        }
        Ok(Self::compile(tiers))
    }

    /// Build a tier set without validation; keywords empty after normalization are dropped
    pub(crate) fn compile(tiers: Vec<Tier>) -> Self {
        let keywords = tiers
            .iter()
            .map(|tier| {
                tier.keywords
                    .iter()
                    .map(|k| normalize_text(k))
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .collect();

        Self {
            tiers,
            keywords,
            catch_all: Tier::catch_all(),
        }
    }

    /// Configured tiers in evaluation order, without the catch-all
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn catch_all(&self) -> &Tier {
        &self.catch_all
    }

    /// Configured tiers followed by the catch-all tier
    pub fn all(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter().chain(std::iter::once(&self.catch_all))
    }

    /// Position of the first configured tier matching the lead, `None` for the catch-all
    pub fn match_index(&self, lead: &Lead) -> Option<usize> {
        let tokens = normalized_tags(lead.tags());
        if tokens.is_empty() {
            return None;
        }

        self.keywords.iter().position(|keywords| {
            keywords.iter().any(|keyword| {
                tokens
                    .iter()
                    .any(|token| token == keyword || token.starts_with(keyword.as_str()))
            })
        })
    }

    /// Assign a lead to exactly one tier and return that tier
    pub fn classify_tier(&self, lead: &Lead) -> &Tier {
        match self.match_index(lead) {
            Some(idx) => &self.tiers[idx],
            None => &self.catch_all,
        }
    }

    /// Key of the tier a lead belongs to
    pub fn classify(&self, lead: &Lead) -> &str {
        &self.classify_tier(lead).key
    }
}

impl Default for TierSet {
    fn default() -> Self {
        Self::compile(default_tiers())
    }
}

/// Classify a lead against an ad-hoc tier list
///
/// Unlike `TierSet::new` this never fails: keywords that normalize to empty
/// are skipped instead of rejected.
pub fn classify_lead(lead: &Lead, tiers: &[Tier]) -> String {
    let skipped = tiers
        .iter()
        .flat_map(|t| &t.keywords)
        .filter(|k| normalize_text(k).is_empty())
        .count();
    if skipped > 0 {
        warn!(skipped, "ignoring keywords that are empty after normalization");
    }

    TierSet::compile(tiers.to_vec()).classify(lead).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(tags: &str) -> Lead {
        [("Disposition tags", tags)].into_iter().collect()
    }

    #[test]
    fn test_exact_and_prefix_match() {
        let set = TierSet::default();
        assert_eq!(set.classify(&tagged("Appt Set")), "newMoney");
        assert_eq!(set.classify(&tagged("Missed Appt | iPhone")), "missingMoney");
        assert_eq!(set.classify(&tagged("missed appt - rescheduled")), "missingMoney");
    }

    #[test]
    fn test_first_tier_wins() {
        let set = TierSet::default();
        // Matches both MISSING MONEY and NEW MONEY; NEW MONEY is declared first
        assert_eq!(set.classify(&tagged("Missed Appt | Appt Set")), "newMoney");
    }

    #[test]
    fn test_unmatched_and_empty_tags_fall_to_catch_all() {
        let set = TierSet::default();
        assert_eq!(set.classify(&tagged("Do Not Call")), CATCH_ALL_KEY);
        assert_eq!(set.classify(&tagged("")), CATCH_ALL_KEY);
        assert_eq!(set.classify(&tagged(" | | ")), CATCH_ALL_KEY);
        assert_eq!(set.classify(&Lead::default()), CATCH_ALL_KEY);
    }

    #[test]
    fn test_keyword_inside_token_is_not_a_match() {
        let set = TierSet::default();
        // Only equality or prefix counts, never an infix
        assert_eq!(set.classify(&tagged("Rescheduled Appt Set")), CATCH_ALL_KEY);
    }

    #[test]
    fn test_invisible_characters_in_tags() {
        let set = TierSet::default();
        assert_eq!(set.classify(&tagged("Website\u{00A0}Lead\u{200B}")), "todaysMoney");
        assert_eq!(set.classify(&tagged("\u{FEFF}HIT LIST/GHOSTED")), "moneyCantHide");
    }

    #[test]
    fn test_tags_read_from_alternate_columns() {
        let set = TierSet::default();
        let lead: Lead = [("Tags", "Opened Email")].into_iter().collect();
        assert_eq!(set.classify(&lead), "comingForMoney");
    }

    #[test]
    fn test_empty_tier_list_classifies_everything_as_catch_all() {
        let set = TierSet::new(Vec::new()).unwrap();
        assert_eq!(set.classify(&tagged("Appt Set")), CATCH_ALL_KEY);
        assert_eq!(set.all().count(), 1);
    }

    #[test]
    fn test_classify_lead_skips_blank_keywords() {
        let tiers = vec![Tier {
            key: "odd".to_string(),
            label: "ODD".to_string(),
            color: "odd".to_string(),
            keywords: vec!["\u{200B}".to_string(), "Callback".to_string()],
        }];
        assert_eq!(classify_lead(&tagged("Anything"), &tiers), CATCH_ALL_KEY);
        assert_eq!(classify_lead(&tagged("Callback Tue"), &tiers), "odd");
    }

    #[test]
    fn test_validate_tiers() {
        assert!(validate_tiers(&default_tiers()).is_empty());

        let mut tiers = default_tiers();
        tiers[1].key = "newMoney".to_string();
        tiers[2].key = CATCH_ALL_KEY.to_string();
        tiers[3].label = " ".to_string();
        tiers[4].keywords.push("  ".to_string());

        let errors = validate_tiers(&tiers);
        assert_eq!(errors.len(), 4, "{:?}", errors);
        assert!(TierSet::new(tiers).is_err());
    }

    #[test]
    fn test_parse_tiers_yaml() {
        let yaml = r#"
tiers:
  - key: hot
    label: HOT
    color: red
    keywords: [Appt Set]
  - key: cold
    label: COLD
    color: blue
"#;
        let config = parse_tiers(yaml).unwrap();
        assert_eq!(config.tiers.len(), 2);
        assert_eq!(config.tiers[0].keywords, vec!["Appt Set".to_string()]);
        assert!(config.tiers[1].keywords.is_empty());
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Config").join("tiers.yaml");
        let config = load_tiers(&path).unwrap();
        assert_eq!(config.tiers, default_tiers());
    }

    #[test]
    fn test_audit_default_tiers() {
        let warnings = audit_tiers(&default_tiers());
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_audit_finds_shadowed_and_duplicate_keywords() {
        let tiers = vec![
            Tier {
                key: "a".to_string(),
                label: "A".to_string(),
                color: "a".to_string(),
                keywords: vec!["Missed".to_string(), "missed ".to_string()],
            },
            Tier {
                key: "b".to_string(),
                label: "B".to_string(),
                color: "b".to_string(),
                keywords: vec!["Missed Appt".to_string()],
            },
            Tier {
                key: "c".to_string(),
                label: "C".to_string(),
                color: "c".to_string(),
                keywords: vec![],
            },
        ];

        let warnings = audit_tiers(&tiers);
        assert_eq!(
            warnings,
            vec![
                TierWarning::DuplicateKeyword {
                    tier: "a".to_string(),
                    keyword: "missed ".to_string(),
                },
                TierWarning::ShadowedKeyword {
                    tier: "b".to_string(),
                    keyword: "Missed Appt".to_string(),
                    shadowed_by_tier: "a".to_string(),
                    shadowed_by: "missed".to_string(),
                },
                TierWarning::NoKeywords {
                    tier: "c".to_string(),
                },
            ]
        );
    }
}
