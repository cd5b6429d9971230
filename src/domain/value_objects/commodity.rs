use serde::{Deserialize, Serialize};
use std::fmt;

/// The two commodities recorded on every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commodity {
    Sugar,
    Salt,
}

impl Commodity {
    pub const ALL: [Commodity; 2] = [Commodity::Sugar, Commodity::Salt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Commodity::Sugar => "sugar",
            Commodity::Salt => "salt",
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
