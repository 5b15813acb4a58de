use crate::errors::StoreError;
use crate::gate::canonical_name;
use crate::models::WeeklyRecord;
use crate::records::{derive_earnings, iso_week_label, parse_week_label};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{error, info};

/// Version written by this build. Files without a version are rows from the
/// older spreadsheet-style revisions.
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub owner: Option<String>,
}

impl RecordFilter {
    pub fn owner(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
        }
    }

    fn matches(&self, record: &WeeklyRecord) -> bool {
        self.owner.as_deref().is_none_or(|owner| record.owner == owner)
    }
}

/// Append-only storage for weekly records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends a record and returns it with `id` and `created_at` filled in.
    async fn insert(&self, record: WeeklyRecord) -> Result<WeeklyRecord, StoreError>;

    async fn query(&self, filter: &RecordFilter) -> Result<Vec<WeeklyRecord>, StoreError>;
}

#[derive(Debug, Clone, Serialize)]
struct StoreData {
    schema_version: u32,
    next_id: u64,
    records: Vec<WeeklyRecord>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            next_id: 1,
            records: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StoredData {
    #[serde(default)]
    schema_version: u32,
    #[serde(default)]
    next_id: u64,
    #[serde(default, alias = "registros")]
    records: Vec<StoredRecord>,
}

/// A row as found on disk, accepting the column names of older revisions.
#[derive(Debug, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    id: Option<u64>,
    #[serde(alias = "oficina", alias = "trabajador")]
    owner: String,
    #[serde(default, alias = "consultas")]
    consultations: u64,
    #[serde(default, alias = "controles")]
    checkins: u64,
    #[serde(default, alias = "ingreso")]
    income: Decimal,
    #[serde(default, alias = "semana")]
    week_label: String,
    #[serde(default, alias = "ganancia")]
    earnings: Option<Decimal>,
    #[serde(default, alias = "fecha_registro", deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339, or an offset-less ISO timestamp taken as UTC, which is
/// how older revisions wrote `fecha_registro`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{text}'")))
}

impl StoredRecord {
    /// Canonical week for a stored row: the row's own label when it is a real
    /// ISO week, otherwise the week it was created in.
    fn week_label(&self) -> Option<String> {
        parse_week_label(self.week_label.trim())
            .map(iso_week_label)
            .or_else(|| self.created_at.map(|created_at| iso_week_label(created_at.date_naive())))
    }
}

impl StoredData {
    fn migrate(self) -> Result<StoreData, StoreError> {
        let mut next_id = self.records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
        next_id = next_id.max(self.next_id);

        let mut records = Vec::with_capacity(self.records.len());
        for (index, row) in self.records.into_iter().enumerate() {
            let owner = canonical_name(&row.owner);
            if owner.is_empty() {
                return Err(StoreError::new(format!("row {index} has no owner")));
            }
            let week_label = row.week_label().ok_or_else(|| {
                StoreError::new(format!(
                    "row {index} has week '{}' and no creation time to derive one from",
                    row.week_label
                ))
            })?;
            let id = row.id.unwrap_or_else(|| {
                let id = next_id;
                next_id += 1;
                id
            });

            records.push(WeeklyRecord {
                id: Some(id),
                owner,
                consultations: row.consultations,
                checkins: row.checkins,
                earnings: row.earnings.unwrap_or_else(|| derive_earnings(row.income)),
                income: row.income,
                week_label,
                created_at: row.created_at,
            });
        }

        Ok(StoreData {
            schema_version: SCHEMA_VERSION,
            next_id,
            records,
        })
    }
}

/// Keeps every record in one JSON file, rewritten on each insert.
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonFileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let data = load_data(&path).await?;
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn insert(&self, mut record: WeeklyRecord) -> Result<WeeklyRecord, StoreError> {
        let mut data = self.data.lock().await;
        record.id = Some(data.next_id);
        record.created_at = Some(Utc::now());

        let mut updated = data.clone();
        updated.next_id += 1;
        updated.records.push(record.clone());
        persist_data(&self.path, &updated).await?;
        *data = updated;

        Ok(record)
    }

    async fn query(&self, filter: &RecordFilter) -> Result<Vec<WeeklyRecord>, StoreError> {
        let data = self.data.lock().await;
        Ok(data
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}

async fn load_data(path: &Path) -> Result<StoreData, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => {
            let stored: StoredData = serde_json::from_slice(&bytes).map_err(|err| {
                error!("failed to parse data file {}: {err}", path.display());
                StoreError::from(err)
            })?;
            if stored.schema_version < SCHEMA_VERSION {
                info!(
                    "migrating {} from schema {} to {SCHEMA_VERSION}",
                    path.display(),
                    stored.schema_version
                );
            }
            stored.migrate().map_err(|err| {
                error!("failed to migrate data file {}: {err}", path.display());
                err
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            Err(err.into())
        }
    }
}

async fn persist_data(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
