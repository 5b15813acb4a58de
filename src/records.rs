use crate::errors::LedgerError;
use crate::gate::Identity;
use crate::models::{EarningsPolicy, GroupBy, RawRecord, WeeklyRecord, WeeklySummary};
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

pub fn normalize(
    raw: &RawRecord,
    identity: &Identity,
    policy: EarningsPolicy,
) -> Result<WeeklyRecord, LedgerError> {
    normalize_on(raw, identity, policy, Utc::now().date_naive())
}

/// Validates a raw submission and fills in derived fields as of `today`.
///
/// `today` is a UTC date, the same clock the store stamps `created_at` with.
pub fn normalize_on(
    raw: &RawRecord,
    identity: &Identity,
    policy: EarningsPolicy,
    today: NaiveDate,
) -> Result<WeeklyRecord, LedgerError> {
    let consultations = counter_field("consultations", &raw.consultations)?;
    let checkins = counter_field("checkins", &raw.checkins)?;
    let income = decimal_field("income", &raw.income)?;
    if income.is_sign_negative() && !income.is_zero() {
        return Err(LedgerError::invalid_field("income", "must not be negative"));
    }

    let week_label = match raw.week_label.as_deref().map(str::trim) {
        None | Some("") => iso_week_label(today),
        Some(label) => {
            let monday = parse_week_label(label).ok_or_else(|| {
                LedgerError::invalid_field("week_label", format!("'{label}' is not an ISO week like 2025-W36"))
            })?;
            iso_week_label(monday)
        }
    };

    let supplied = match (policy, raw.earnings.as_ref()) {
        (EarningsPolicy::IfAbsent, Some(value)) if !value.is_null() => {
            Some(decimal_field("earnings", value)?)
        }
        _ => None,
    };
    let earnings = supplied.unwrap_or_else(|| derive_earnings(income));

    Ok(WeeklyRecord {
        id: None,
        owner: identity.name.clone(),
        consultations,
        checkins,
        income,
        week_label,
        earnings,
        created_at: None,
    })
}

pub fn derive_earnings(income: Decimal) -> Decimal {
    income / Decimal::from(2)
}

/// Groups records by week label or creation date and sums each group,
/// ordered by key ascending.
pub fn summarize(records: &[WeeklyRecord], group_by: GroupBy) -> Result<Vec<WeeklySummary>, LedgerError> {
    let mut groups: BTreeMap<String, WeeklySummary> = BTreeMap::new();

    for record in records {
        let key = group_key(record, group_by)?;
        let entry = groups.entry(key.clone()).or_insert_with(|| WeeklySummary {
            label: key,
            record_count: 0,
            total_consultations: 0,
            total_checkins: 0,
            total_income: Decimal::ZERO,
            total_earnings: Decimal::ZERO,
        });
        entry.record_count = entry.record_count.saturating_add(1);
        entry.total_consultations = entry.total_consultations.saturating_add(record.consultations);
        entry.total_checkins = entry.total_checkins.saturating_add(record.checkins);
        entry.total_income = entry.total_income.saturating_add(record.income);
        entry.total_earnings = entry.total_earnings.saturating_add(record.earnings);
    }

    Ok(groups.into_values().collect())
}

fn group_key(record: &WeeklyRecord, group_by: GroupBy) -> Result<String, LedgerError> {
    match group_by {
        GroupBy::Week => Ok(record.week_label.clone()),
        GroupBy::Date => record
            .created_at
            .map(|created_at| date_key(created_at.date_naive()))
            .ok_or_else(|| LedgerError::MissingGroupKey {
                key: "created_at",
                record: record
                    .id
                    .map(|id| format!("#{id}"))
                    .unwrap_or_else(|| "(unsaved)".to_string()),
            }),
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn iso_week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Parses `YYYY-Www` and returns the Monday of that ISO week, if it exists.
pub fn parse_week_label(label: &str) -> Option<NaiveDate> {
    let (year, week) = label.split_once("-W")?;
    if year.len() != 4 || week.is_empty() || week.len() > 2 {
        return None;
    }
    if !year.bytes().chain(week.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, Weekday::Mon)
}

fn counter_field(field: &'static str, value: &Value) -> Result<u64, LedgerError> {
    let number = match value {
        Value::Number(number) => number,
        Value::Null => return Err(LedgerError::invalid_field(field, "is required")),
        _ => return Err(LedgerError::invalid_field(field, "must be a number")),
    };

    if let Some(count) = number.as_u64() {
        return Ok(count);
    }
    if number.as_i64().is_some() {
        return Err(LedgerError::invalid_field(field, "must not be negative"));
    }

    match number.as_f64() {
        Some(count) if count < 0.0 => Err(LedgerError::invalid_field(field, "must not be negative")),
        Some(count) if count.fract() == 0.0 && count <= u64::MAX as f64 => Ok(count as u64),
        _ => Err(LedgerError::invalid_field(field, "must be a whole number")),
    }
}

fn decimal_field(field: &'static str, value: &Value) -> Result<Decimal, LedgerError> {
    let number = match value {
        Value::Number(number) => number,
        Value::Null => return Err(LedgerError::invalid_field(field, "is required")),
        _ => return Err(LedgerError::invalid_field(field, "must be a number")),
    };

    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| LedgerError::invalid_field(field, format!("{text} is out of range")))
}
