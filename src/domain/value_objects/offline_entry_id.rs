use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

pub(crate) const OFFLINE_ID_PREFIX: &str = "offline_";

/// Temporary identifier of a queued draft. Always carries the `offline_`
/// prefix, which persisted identifiers are not allowed to use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OfflineEntryId(String);

impl OfflineEntryId {
    pub fn generate() -> Self {
        Self(format!("{OFFLINE_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        let suffix = value
            .strip_prefix(OFFLINE_ID_PREFIX)
            .ok_or_else(|| format!("Offline entry ID must start with {OFFLINE_ID_PREFIX}"))?;
        if suffix.trim().is_empty() {
            return Err("Offline entry ID suffix cannot be empty".to_string());
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfflineEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OfflineEntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OfflineEntryId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OfflineEntryId> for String {
    fn from(id: OfflineEntryId) -> Self {
        id.0
    }
}
