use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A weekly submission as it arrives from a caller, before validation.
///
/// Values stay loosely typed so that a non-form caller sending a string or a
/// negative number gets a field-level error instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub consultations: Value,
    #[serde(default)]
    pub checkins: Value,
    #[serde(default)]
    pub income: Value,
    #[serde(default)]
    pub week_label: Option<String>,
    #[serde(default)]
    pub earnings: Option<Value>,
}

/// One append-only row of weekly activity counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub owner: String,
    pub consultations: u64,
    pub checkins: u64,
    pub income: Decimal,
    pub week_label: String,
    pub earnings: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Totals for one group of records.
///
/// `label` is the ISO week label when grouped by week, or the `YYYY-MM-DD`
/// creation date when grouped by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub label: String,
    pub record_count: u64,
    pub total_consultations: u64,
    pub total_checkins: u64,
    pub total_income: Decimal,
    pub total_earnings: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Week,
    Date,
}

/// How `earnings` is filled in when a record is normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningsPolicy {
    /// Always `income / 2`, ignoring any caller-supplied value.
    #[default]
    Always,
    /// Keep a caller-supplied value; derive only when it is absent.
    IfAbsent,
}

impl FromStr for EarningsPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "if_absent" | "if-absent" => Ok(Self::IfAbsent),
            other => Err(format!("unknown earnings policy '{other}'")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
    pub role: crate::gate::Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub name: String,
    pub role: crate::gate::Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    pub owner: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub group_by: GroupBy,
    pub owner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earnings_policy_parses_config_values() {
        assert_eq!("always".parse::<EarningsPolicy>(), Ok(EarningsPolicy::Always));
        assert_eq!(" IF_ABSENT ".parse::<EarningsPolicy>(), Ok(EarningsPolicy::IfAbsent));
        assert!("sometimes".parse::<EarningsPolicy>().is_err());
    }

    #[test]
    fn unsaved_record_omits_store_fields() {
        let record = WeeklyRecord {
            id: None,
            owner: "pachuca".into(),
            consultations: 1,
            checkins: 2,
            income: Decimal::from(10),
            week_label: "2025-W36".into(),
            earnings: Decimal::from(5),
            created_at: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
    }
}
