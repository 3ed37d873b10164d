//! Volume capacity quotas, written as a magnitude and a unit (`50 GB`).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

static QUOTA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<magnitude>[0-9]+)\s*(?P<unit>[A-Za-z]+)\s*$").expect("quota pattern compiles")
});

/// Unit suffix of a quota. Parsing ignores ASCII case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(ascii_case_insensitive)]
pub enum QuotaUnit {
    #[strum(to_string = "BYTES", serialize = "B")]
    Bytes,
    #[strum(to_string = "KB")]
    Kb,
    #[strum(to_string = "MB")]
    Mb,
    #[strum(to_string = "GB")]
    Gb,
    #[strum(to_string = "TB")]
    Tb,
    #[strum(to_string = "PB")]
    Pb,
    #[strum(to_string = "EB")]
    Eb,
}

/// A validated capacity limit.
///
/// The value is passed to the storage service as-is; no byte arithmetic is
/// done locally.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct Quota {
    magnitude: u64,
    unit: QuotaUnit,
}

impl Quota {
    pub fn new(magnitude: u64, unit: QuotaUnit) -> Self {
        Quota { magnitude, unit }
    }

    pub fn magnitude(&self) -> u64 {
        self.magnitude
    }

    pub fn unit(&self) -> QuotaUnit {
        self.unit
    }
}

impl Display for Quota {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

impl FromStr for Quota {
    type Err = String;

    /// Accepts `50 GB`, `50GB`, `50 gb`, `1024 BYTES`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = QUOTA_PATTERN
            .captures(s)
            .ok_or_else(|| "expected '<number> <unit>', e.g. '50 GB'".to_string())?;

        let magnitude: u64 = caps["magnitude"]
            .parse()
            .map_err(|_| format!("magnitude '{}' is out of range", &caps["magnitude"]))?;
        if magnitude == 0 {
            return Err("magnitude must be greater than zero".to_string());
        }

        let unit = QuotaUnit::from_str(&caps["unit"]).map_err(|_| {
            format!(
                "unknown unit '{}' (expected B, BYTES, KB, MB, GB, TB, PB or EB)",
                &caps["unit"]
            )
        })?;

        Ok(Quota { magnitude, unit })
    }
}
