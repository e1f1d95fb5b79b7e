use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::normalize::normalize_header;

/// Key of the reserved tier every unmatched lead falls into
pub const CATCH_ALL_KEY: &str = "misc";
pub const CATCH_ALL_LABEL: &str = "MISC / UNCLASSIFIED";
pub const CATCH_ALL_COLOR: &str = "misc";

/// Recognized header names, already normalized, in lookup priority order.
pub mod fields {
    pub const FIRST_NAME: &[&str] = &["first name"];
    pub const LAST_NAME: &[&str] = &["last name"];
    pub const PHONE: &[&str] = &["phone number", "phone"];
    pub const EMAIL: &[&str] = &["email"];
    pub const TAGS: &[&str] = &["disposition tags", "disposition", "tags"];
    pub const NOTES: &[&str] = &["notes", "note"];
    pub const VENDOR: &[&str] = &["lead vendor"];
    pub const STATE: &[&str] = &["state"];
    pub const ZIP: &[&str] = &["zip code"];
    pub const RECEIVED: &[&str] = &["received on"];
    pub const LAST_CALLED: &[&str] = &["last called"];
    pub const TIMES_CALLED: &[&str] = &["num times called"];
}

/// One row of a lead export, keyed by normalized header name.
///
/// Values are stored exactly as they appeared in the CSV cell; accessors
/// never trim, so callers decide how much cleanup they need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lead {
    #[serde(flatten)]
    fields: HashMap<String, String>,
}

impl Lead {
    /// Build a lead from already-normalized header keys
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    /// Raw value for one normalized header name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of the first alias holding a non-blank value, or "" when none does.
    pub fn field(&self, aliases: &[&str]) -> &str {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find(|value| !value.trim().is_empty())
            .unwrap_or("")
    }

    pub fn first_name(&self) -> &str {
        self.field(fields::FIRST_NAME)
    }

    pub fn last_name(&self) -> &str {
        self.field(fields::LAST_NAME)
    }

    pub fn phone(&self) -> &str {
        self.field(fields::PHONE)
    }

    pub fn email(&self) -> &str {
        self.field(fields::EMAIL)
    }

    pub fn tags(&self) -> &str {
        self.field(fields::TAGS)
    }

    pub fn notes(&self) -> &str {
        self.field(fields::NOTES)
    }

    pub fn vendor(&self) -> &str {
        self.field(fields::VENDOR)
    }

    pub fn state(&self) -> &str {
        self.field(fields::STATE)
    }

    pub fn zip(&self) -> &str {
        self.field(fields::ZIP)
    }

    pub fn received_on(&self) -> &str {
        self.field(fields::RECEIVED)
    }

    pub fn last_called(&self) -> &str {
        self.field(fields::LAST_CALLED)
    }

    pub fn times_called(&self) -> &str {
        self.field(fields::TIMES_CALLED)
    }
}

/// Collect `(header, value)` pairs, normalizing each header the same way the parser does.
impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Lead {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(key, value)| (normalize_header(key.as_ref()), value.into()))
            .collect();
        Self { fields }
    }
}

/// A priority bucket definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tier {
    pub key: String,
    pub label: String,
    /// Display color token, resolved by the presentation layer
    pub color: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Tier {
    /// The reserved tier appended after every configured tier list
    pub fn catch_all() -> Self {
        Self {
            key: CATCH_ALL_KEY.to_string(),
            label: CATCH_ALL_LABEL.to_string(),
            color: CATCH_ALL_COLOR.to_string(),
            keywords: Vec::new(),
        }
    }

    pub fn is_catch_all(&self) -> bool {
        self.key == CATCH_ALL_KEY
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TiersConfig {
    pub tiers: Vec<Tier>,
}
