//! Invoice record backend
//!
//! Stores invoice documents in a JSON file and implements the
//! opsdesk-core `RecordService` trait. Rejected submissions carry a
//! structured per-field error map keyed by dotted field path.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use opsdesk_core::{record_id, CoreError, CoreResult, Record, RecordService, ValidationFailure};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Statuses an invoice may carry.
const STATUSES: [&str; 4] = ["draft", "sent", "paid", "void"];

/// Directory both stores persist under: `<config dir>/opsdesk`.
pub fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("opsdesk")
}

/// JSON-file backed invoice store with an in-memory cache.
pub struct JsonRecordService {
    data_dir: PathBuf,
    cache: Mutex<Vec<Record>>,
}

impl JsonRecordService {
    pub fn new() -> Self {
        Self::with_dir(default_data_dir())
    }

    /// Store under an explicit directory. Tests point this at a tempdir.
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            cache: Mutex::new(Vec::new()),
        }
    }

    fn records_file(&self) -> PathBuf {
        self.data_dir.join("invoices.json")
    }

    async fn ensure_data_dir(&self) -> CoreResult<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)
                .await
                .map_err(|e| CoreError::StorageError(e.to_string()))?;
        }
        Ok(())
    }

    async fn load_from_file(&self) -> CoreResult<Vec<Record>> {
        let path = self.records_file();

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;

        let records: Vec<Record> = serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        Ok(records)
    }

    async fn save_to_file(&self, records: &[Record]) -> CoreResult<()> {
        self.ensure_data_dir().await?;

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        fs::write(self.records_file(), content)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;

        Ok(())
    }

    /// Current record set, loading the file on first touch.
    async fn cached_or_load(&self) -> CoreResult<Vec<Record>> {
        {
            let cache = self.cache.lock().await;
            if !cache.is_empty() {
                return Ok(cache.clone());
            }
        }

        let records = self.load_from_file().await?;
        *self.cache.lock().await = records.clone();
        Ok(records)
    }

    async fn store(&self, records: Vec<Record>) -> CoreResult<()> {
        self.save_to_file(&records).await?;
        *self.cache.lock().await = records;
        Ok(())
    }

    /// All invoices, in file order.
    pub async fn list(&self) -> CoreResult<Vec<Record>> {
        self.cached_or_load().await
    }

    /// Write demo invoices on a fresh installation.
    ///
    /// Returns `true` when seed data was written.
    pub async fn seed_if_empty(&self) -> CoreResult<bool> {
        if !self.cached_or_load().await?.is_empty() {
            return Ok(false);
        }
        self.store(seed_invoices()).await?;
        Ok(true)
    }

    /// First invoice number not yet taken, for duplicates and new drafts.
    pub async fn next_invoice_number(&self) -> CoreResult<u64> {
        let records = self.cached_or_load().await?;
        Ok(records
            .iter()
            .filter_map(|doc| doc.get("invoiceNumber").and_then(Value::as_u64))
            .max()
            .map_or(1001, |n| n + 1))
    }
}

impl Default for JsonRecordService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordService for JsonRecordService {
    async fn create(&self, record: &Record) -> CoreResult<Record> {
        let mut records = self.cached_or_load().await?;
        validate(record, None, &records)?;

        let now = Utc::now().to_rfc3339();
        let mut doc = record.clone();
        doc["id"] = json!(format!("inv-{}", Uuid::new_v4().simple()));
        doc["createdOn"] = json!(now);
        doc["modifiedOn"] = json!(now);

        records.push(doc.clone());
        self.store(records).await?;
        Ok(doc)
    }

    async fn update(&self, id: &str, record: &Record) -> CoreResult<Record> {
        let mut records = self.cached_or_load().await?;
        let pos = records
            .iter()
            .position(|doc| record_id(doc) == Some(id))
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;
        validate(record, Some(id), &records)?;

        let mut doc = record.clone();
        doc["id"] = json!(id);
        if doc.get("createdOn").is_none() {
            doc["createdOn"] = records[pos]["createdOn"].clone();
        }
        doc["modifiedOn"] = json!(Utc::now().to_rfc3339());

        records[pos] = doc.clone();
        self.store(records).await?;
        Ok(doc)
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let mut records = self.cached_or_load().await?;
        let original_len = records.len();
        records.retain(|doc| record_id(doc) != Some(id));

        if records.len() == original_len {
            return Err(CoreError::RecordNotFound(id.to_string()));
        }

        self.store(records).await
    }

    async fn fetch(&self, id: &str) -> CoreResult<Record> {
        self.cached_or_load()
            .await?
            .into_iter()
            .find(|doc| record_id(doc) == Some(id))
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))
    }
}

/// Check a submitted invoice. `existing_id` is the stored id on update,
/// excluded from the uniqueness check.
fn validate(doc: &Record, existing_id: Option<&str>, all: &[Record]) -> CoreResult<()> {
    let mut failure = ValidationFailure::new("Submission failed");

    match doc.get("customerName").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => {}
        _ => failure = failure.with_field("customerName", "Required"),
    }

    match doc.get("invoiceNumber").and_then(Value::as_u64) {
        Some(number) if number > 0 => {
            let taken = all.iter().any(|other| {
                record_id(other) != existing_id
                    && other.get("invoiceNumber").and_then(Value::as_u64) == Some(number)
            });
            if taken {
                failure = failure.with_field("invoiceNumber", "Already in use");
            }
        }
        _ => failure = failure.with_field("invoiceNumber", "Must be a positive number"),
    }

    if let Some(status) = doc.get("status").and_then(Value::as_str) {
        if !STATUSES.contains(&status) {
            failure = failure.with_field("status", "Unknown status");
        }
    }

    for path in ["issuedOn", "dueOn"] {
        if let Some(date) = doc.get(path).and_then(Value::as_str) {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                failure = failure.with_field(path, "Use YYYY-MM-DD");
            }
        }
    }

    if let Some(items) = doc.get("lineItems").and_then(Value::as_array) {
        for (index, item) in items.iter().enumerate() {
            for attr in ["quantity", "unitPrice"] {
                if item.get(attr).and_then(Value::as_f64).is_none() {
                    failure = failure.with_field(format!("lineItems.{index}.{attr}"), "Must be a number");
                }
            }
        }
    }

    if let Some(payments) = doc.get("payments").and_then(Value::as_array) {
        for (index, payment) in payments.iter().enumerate() {
            match payment.get("amount").and_then(Value::as_f64) {
                Some(amount) if amount > 0.0 => {}
                _ => {
                    failure = failure
                        .with_field(format!("payments.{index}.amount"), "Must be a positive number");
                }
            }
        }
    }

    if failure.field_errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(failure))
    }
}

/// Demo invoices written on first run.
fn seed_invoices() -> Vec<Record> {
    let stamp = |date: &str| format!("{date}T09:00:00+00:00");
    vec![
        json!({
            "id": "inv-0001",
            "invoiceNumber": 1001,
            "customerName": "Acme Corp",
            "status": "paid",
            "issuedOn": "2026-07-01",
            "dueOn": "2026-07-31",
            "lineItems": [
                {"description": "Consulting", "quantity": 12, "unitPrice": 150.0},
                {"description": "Travel", "quantity": 1, "unitPrice": 420.5},
            ],
            "payments": [
                {"id": "pay-0001", "amount": 2220.5, "receivedOn": "2026-07-20", "method": "bank transfer"},
            ],
            "notes": "Net 30.",
            "createdOn": stamp("2026-07-01"),
            "modifiedOn": stamp("2026-07-20"),
        }),
        json!({
            "id": "inv-0002",
            "invoiceNumber": 1002,
            "customerName": "Globex GmbH",
            "status": "sent",
            "issuedOn": "2026-08-03",
            "dueOn": "2026-09-02",
            "lineItems": [
                {"description": "Design sprint", "quantity": 2, "unitPrice": 1800.0},
            ],
            "payments": [],
            "notes": "",
            "createdOn": stamp("2026-08-03"),
            "modifiedOn": stamp("2026-08-03"),
        }),
        json!({
            "id": "inv-0003",
            "invoiceNumber": 1003,
            "customerName": "Initech",
            "status": "sent",
            "issuedOn": "2026-08-10",
            "dueOn": "2026-09-09",
            "lineItems": [
                {"description": "Hosting", "quantity": 3, "unitPrice": 49.0},
                {"description": "Support", "quantity": 5, "unitPrice": 95.0},
            ],
            "payments": [
                {"id": "pay-0002", "amount": 200.0, "receivedOn": "2026-08-15", "method": "card"},
            ],
            "notes": "Partial payment received.",
            "createdOn": stamp("2026-08-10"),
            "modifiedOn": stamp("2026-08-15"),
        }),
        json!({
            "id": "inv-0004",
            "invoiceNumber": 1004,
            "customerName": "Umbrella LLC",
            "status": "draft",
            "issuedOn": "2026-08-21",
            "dueOn": "2026-09-20",
            "lineItems": [],
            "payments": [],
            "notes": "Waiting for purchase order.",
            "createdOn": stamp("2026-08-21"),
            "modifiedOn": stamp("2026-08-21"),
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Helpers =====

    fn service() -> (JsonRecordService, tempfile::TempDir) {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let service = JsonRecordService::with_dir(tmp.path().to_path_buf());
        (service, tmp)
    }

    fn draft(number: u64, customer: &str) -> Record {
        json!({
            "invoiceNumber": number,
            "customerName": customer,
            "status": "draft",
            "lineItems": [],
            "payments": [],
        })
    }

    fn validation_error(result: CoreResult<Record>) -> ValidationFailure {
        match result {
            Err(CoreError::Validation(failure)) => failure,
            other => panic!("expected a validation failure, got {other:?}"),
        }
    }

    // ===== CRUD =====

    #[tokio::test]
    async fn list_starts_empty() {
        let (service, _tmp) = service();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_assigns_id_and_stamps() {
        let (service, _tmp) = service();
        let doc = service.create(&draft(1001, "Acme Corp")).await.unwrap();

        let id = record_id(&doc).unwrap();
        assert!(id.starts_with("inv-"));
        assert!(doc.get("createdOn").and_then(Value::as_str).is_some());
        assert_eq!(doc["createdOn"], doc["modifiedOn"]);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fetch_returns_the_stored_copy() {
        let (service, _tmp) = service();
        let doc = service.create(&draft(1001, "Acme Corp")).await.unwrap();
        let id = record_id(&doc).unwrap();

        let fetched = service.fetch(id).await.unwrap();
        assert_eq!(fetched, doc);
    }

    #[tokio::test]
    async fn update_preserves_created_on() {
        let (service, _tmp) = service();
        let doc = service.create(&draft(1001, "Acme Corp")).await.unwrap();
        let id = record_id(&doc).unwrap().to_string();
        let created = doc["createdOn"].clone();

        // Working copies submitted by the form carry no audit stamps.
        let submitted = draft(1001, "Acme Corporation");
        let updated = service.update(&id, &submitted).await.unwrap();

        assert_eq!(updated["createdOn"], created);
        assert_eq!(updated["customerName"], json!("Acme Corporation"));
        assert_eq!(record_id(&updated), Some(id.as_str()));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (service, _tmp) = service();
        let result = service.update("inv-missing", &draft(1001, "Acme")).await;
        assert!(matches!(result, Err(CoreError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_and_rejects_unknown() {
        let (service, _tmp) = service();
        let doc = service.create(&draft(1001, "Acme Corp")).await.unwrap();
        let id = record_id(&doc).unwrap().to_string();

        service.delete(&id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
        assert!(matches!(
            service.delete(&id).await,
            Err(CoreError::RecordNotFound(_))
        ));
        assert!(matches!(
            service.fetch(&id).await,
            Err(CoreError::RecordNotFound(_))
        ));
    }

    // ===== Validation =====

    #[tokio::test]
    async fn create_rejects_missing_customer() {
        let (service, _tmp) = service();
        let mut doc = draft(1001, "");
        doc["customerName"] = json!("   ");

        let failure = validation_error(service.create(&doc).await);
        assert_eq!(failure.message, "Submission failed");
        assert_eq!(
            failure.field_errors.get("customerName").map(String::as_str),
            Some("Required")
        );
    }

    #[tokio::test]
    async fn create_rejects_duplicate_invoice_number() {
        let (service, _tmp) = service();
        service.create(&draft(1001, "Acme Corp")).await.unwrap();

        let failure = validation_error(service.create(&draft(1001, "Globex")).await);
        assert_eq!(
            failure.field_errors.get("invoiceNumber").map(String::as_str),
            Some("Already in use")
        );
    }

    #[tokio::test]
    async fn update_keeps_its_own_invoice_number() {
        let (service, _tmp) = service();
        let doc = service.create(&draft(1001, "Acme Corp")).await.unwrap();
        let id = record_id(&doc).unwrap().to_string();

        // Unchanged number on the same record is not a collision.
        service.update(&id, &draft(1001, "Acme Corp")).await.unwrap();
    }

    #[tokio::test]
    async fn create_rejects_malformed_dates_and_amounts() {
        let (service, _tmp) = service();
        let mut doc = draft(1001, "Acme Corp");
        doc["issuedOn"] = json!("08/21/2026");
        doc["payments"] = json!([{"amount": 0}]);

        let failure = validation_error(service.create(&doc).await);
        assert_eq!(
            failure.field_errors.get("issuedOn").map(String::as_str),
            Some("Use YYYY-MM-DD")
        );
        assert_eq!(
            failure.field_errors.get("payments.0.amount").map(String::as_str),
            Some("Must be a positive number")
        );
    }

    // ===== Seeding and persistence =====

    #[tokio::test]
    async fn seed_runs_only_on_an_empty_store() {
        let (service, _tmp) = service();
        assert!(service.seed_if_empty().await.unwrap());
        assert_eq!(service.list().await.unwrap().len(), 4);
        assert!(!service.seed_if_empty().await.unwrap());
    }

    #[tokio::test]
    async fn records_survive_a_new_instance() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let first = JsonRecordService::with_dir(tmp.path().to_path_buf());
        let doc = first.create(&draft(1001, "Acme Corp")).await.unwrap();
        let id = record_id(&doc).unwrap().to_string();
        drop(first);

        let second = JsonRecordService::with_dir(tmp.path().to_path_buf());
        let fetched = second.fetch(&id).await.unwrap();
        assert_eq!(fetched["customerName"], json!("Acme Corp"));
    }

    #[tokio::test]
    async fn next_invoice_number_advances_past_the_highest() {
        let (service, _tmp) = service();
        assert_eq!(service.next_invoice_number().await.unwrap(), 1001);

        service.seed_if_empty().await.unwrap();
        assert_eq!(service.next_invoice_number().await.unwrap(), 1005);
    }
}
