//! Request and response shapes for the profile intents.
//!
//! Request fields are optional at the serde level so that absent, `null`
//! and empty values all produce the same 400 naming the field, instead of
//! a generic deserialization error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blockchain::types::{Balance, ExecutionOutcome};
use crate::sponsor::{SponsorError, SponsorResult};

/// One entry of a profile's link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub title: String,
    pub url: String,
}

/// POST /create-profile
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCreationRequest {
    pub user_address: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub description: Option<String>,
    pub social_links: Option<Value>,
}

/// POST /add-link
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLinkRequest {
    pub user_address: Option<String>,
    pub nft_id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// POST /update-link
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    pub user_address: Option<String>,
    pub nft_id: Option<String>,
    pub link_index: Option<Value>,
    pub new_title: Option<String>,
    pub new_url: Option<String>,
}

/// POST /remove-link
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLinkRequest {
    pub user_address: Option<String>,
    pub nft_id: Option<String>,
    pub link_index: Option<Value>,
}

/// POST /update-profile. Overwrites all three text fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub user_address: Option<String>,
    pub nft_id: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub description: Option<String>,
}

/// POST /execute
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub transaction_bytes: Option<String>,
    pub user_signature: Option<String>,
}

/// Unsigned payload handed back to the caller for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBuildResult {
    pub success: bool,
    pub transaction_bytes: String,
}

/// Ledger response to an execution, relayed verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub digest: String,
    pub effects: Value,
    pub object_changes: Value,
    pub events: Value,
}

impl From<ExecutionOutcome> for ExecutionResult {
    fn from(outcome: ExecutionOutcome) -> Self {
        Self {
            success: true,
            digest: outcome.digest,
            effects: outcome.effects,
            object_changes: outcome.object_changes,
            events: outcome.events,
        }
    }
}

/// Node reachability plus optional balance of the configured sponsor address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatus {
    pub network: String,
    pub checkpoint: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
}

/// Collects missing required text fields so one error can name all of them.
#[derive(Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Take a required text field; absent and empty both count as missing.
    pub(crate) fn take(&mut self, name: &'static str, value: &Option<String>) -> String {
        match value {
            Some(v) if !v.is_empty() => v.clone(),
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    /// Record a missing non-text field.
    pub(crate) fn require<T>(&mut self, name: &'static str, value: &Option<T>) {
        if value.is_none() {
            self.missing.push(name);
        }
    }

    pub(crate) fn finish(self) -> SponsorResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(SponsorError::Validation(format!(
                "missing required field{}: {}",
                if self.missing.len() == 1 { "" } else { "s" },
                self.missing.join(", ")
            )))
        }
    }
}

/// Parse a link position: a non-negative JSON integer or a decimal string.
pub fn parse_link_index(value: &Value) -> SponsorResult<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SponsorError::Validation(format!("linkIndex must be a non-negative integer, got {}", value))
    })
}

/// Parse the `socialLinks` array, preserving order.
pub fn parse_social_links(value: &Value) -> SponsorResult<Vec<SocialLink>> {
    let items = value
        .as_array()
        .ok_or_else(|| SponsorError::Validation("socialLinks must be an array".into()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let field = |name: &str| {
                item.get(name)
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        SponsorError::Validation(format!("socialLinks[{}].{} must be a string", i, name))
                    })
            };
            Ok(SocialLink {
                title: field("title")?,
                url: field("url")?,
            })
        })
        .collect()
}
