use crate::errors::LedgerError;
use crate::gate::{canonical_name, Gate, Identity, Scope};
use crate::models::{EarningsPolicy, GroupBy, RawRecord, WeeklyRecord, WeeklySummary};
use crate::records::{normalize, summarize};
use crate::storage::{RecordFilter, RecordStore};
use std::sync::Arc;
use tracing::info;

/// Gate, aggregator and store wired together. Holds no per-user state; every
/// call takes the caller's identity explicitly.
#[derive(Clone)]
pub struct Ledger {
    gate: Gate,
    store: Arc<dyn RecordStore>,
    policy: EarningsPolicy,
}

impl Ledger {
    pub fn new(gate: Gate, store: Arc<dyn RecordStore>, policy: EarningsPolicy) -> Self {
        Self { gate, store, policy }
    }

    pub fn login(&self, name: &str, password: &str) -> Result<Identity, LedgerError> {
        self.gate.authenticate(name, password)
    }

    pub async fn submit(&self, identity: &Identity, raw: &RawRecord) -> Result<WeeklyRecord, LedgerError> {
        let record = normalize(raw, identity, self.policy)?;
        let stored = self.store.insert(record).await?;
        info!(
            "stored record #{} for {} ({})",
            stored.id.unwrap_or_default(),
            stored.owner,
            stored.week_label
        );
        Ok(stored)
    }

    /// Records visible to `identity`. Admins may narrow to one owner; the
    /// owner argument is ignored for regular identities.
    pub async fn records(&self, identity: &Identity, owner: Option<&str>) -> Result<Vec<WeeklyRecord>, LedgerError> {
        let filter = scoped_filter(identity, owner);
        Ok(self.store.query(&filter).await?)
    }

    pub async fn summary(
        &self,
        identity: &Identity,
        group_by: GroupBy,
        owner: Option<&str>,
    ) -> Result<Vec<WeeklySummary>, LedgerError> {
        let records = self.records(identity, owner).await?;
        summarize(&records, group_by)
    }
}

fn scoped_filter(identity: &Identity, owner: Option<&str>) -> RecordFilter {
    match identity.scope() {
        Scope::Own(name) => RecordFilter::owner(name),
        Scope::All => RecordFilter {
            owner: owner
                .map(canonical_name)
                .filter(|owner| !owner.is_empty()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonFileStore;
    use rust_decimal::Decimal;
    use serde_json::json;

    async fn ledger(dir: &tempfile::TempDir, policy: EarningsPolicy) -> Ledger {
        let store = JsonFileStore::open(dir.path().join("records.json")).await.unwrap();
        Ledger::new(Gate::with_shared_secret("s3cret"), Arc::new(store), policy)
    }

    fn raw(income: i64) -> RawRecord {
        serde_json::from_value(json!({
            "consultations": 2,
            "checkins": 1,
            "income": income,
            "week_label": "2025-W36"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn regular_identity_sees_only_own_records() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir, EarningsPolicy::Always).await;
        let pachuca = ledger.login("Pachuca", "").unwrap();
        let tula = ledger.login("tula", "").unwrap();

        for income in [100, 200, 300] {
            ledger.submit(&pachuca, &raw(income)).await.unwrap();
        }
        ledger.submit(&tula, &raw(40)).await.unwrap();

        let own = ledger.records(&pachuca, Some("tula")).await.unwrap();
        assert_eq!(own.len(), 3);
        assert!(own.iter().all(|record| record.owner == "pachuca"));

        let summary = ledger.summary(&pachuca, GroupBy::Week, None).await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].label, "2025-W36");
        assert_eq!(summary[0].total_income, Decimal::from(600));
        assert_eq!(summary[0].total_earnings, Decimal::from(300));
    }

    #[tokio::test]
    async fn admin_sees_everything_or_one_owner() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir, EarningsPolicy::Always).await;
        let pachuca = ledger.login("pachuca", "").unwrap();
        let tula = ledger.login("tula", "").unwrap();
        let admin = ledger.login("admin", "s3cret").unwrap();

        ledger.submit(&pachuca, &raw(100)).await.unwrap();
        ledger.submit(&tula, &raw(40)).await.unwrap();

        assert_eq!(ledger.records(&admin, None).await.unwrap().len(), 2);
        assert_eq!(ledger.records(&admin, Some("  ")).await.unwrap().len(), 2);

        let only_tula = ledger.records(&admin, Some("Tula")).await.unwrap();
        assert_eq!(only_tula.len(), 1);
        assert_eq!(only_tula[0].owner, "tula");

        let by_date = ledger.summary(&admin, GroupBy::Date, None).await.unwrap();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].total_income, Decimal::from(140));
    }

    #[tokio::test]
    async fn default_week_and_creation_date_share_a_clock() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir, EarningsPolicy::Always).await;
        let pachuca = ledger.login("pachuca", "").unwrap();

        let unlabelled: RawRecord = serde_json::from_value(json!({
            "consultations": 1,
            "checkins": 1,
            "income": 10
        }))
        .unwrap();
        let stored = ledger.submit(&pachuca, &unlabelled).await.unwrap();
        let created_on = stored.created_at.unwrap().date_naive();
        assert_eq!(stored.week_label, crate::records::iso_week_label(created_on));
    }

    #[tokio::test]
    async fn invalid_submissions_are_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir, EarningsPolicy::Always).await;
        let pachuca = ledger.login("pachuca", "").unwrap();

        let bad: RawRecord = serde_json::from_value(json!({
            "consultations": -3,
            "checkins": 1,
            "income": 10
        }))
        .unwrap();
        let err = ledger.submit(&pachuca, &bad).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidField { field: "consultations", .. }));
        assert!(ledger.records(&pachuca, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submit_applies_configured_earnings_policy() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir, EarningsPolicy::IfAbsent).await;
        let pachuca = ledger.login("pachuca", "").unwrap();

        let supplied: RawRecord = serde_json::from_value(json!({
            "consultations": 1,
            "checkins": 1,
            "income": 100,
            "earnings": 75
        }))
        .unwrap();
        let stored = ledger.submit(&pachuca, &supplied).await.unwrap();
        assert_eq!(stored.earnings, Decimal::from(75));
        assert!(stored.id.is_some());
        assert!(stored.created_at.is_some());
    }
}
