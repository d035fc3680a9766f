//! In-process implementation of the URL repository.
//!
//! Backs the service when `DATABASE_URL=memory://` and the HTTP tests. Contents
//! are lost when the process exits.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    next_id: i64,
    records: BTreeMap<i64, UrlRecord>,
    codes: HashMap<String, i64>,
}

impl Tables {
    fn insert(&mut self, new_record: NewUrlRecord) -> UrlRecord {
        self.next_id += 1;
        let record = UrlRecord::new(
            self.next_id,
            new_record.short_code,
            new_record.original_url,
            0,
        );

        self.codes.insert(record.short_code.clone(), record.id);
        self.records.insert(record.id, record.clone());
        record
    }
}

/// Mutex-guarded maps keyed by id and by short code.
///
/// The code index plays the role of the unique constraint: inserting a taken
/// code fails with [`AppError::Conflict`].
#[derive(Default)]
pub struct InMemoryUrlRepository {
    tables: Mutex<Tables>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::internal("In-memory store poisoned", json!({})))
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn exists(&self, short_code: &str) -> Result<bool, AppError> {
        Ok(self.tables()?.codes.contains_key(short_code))
    }

    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let mut tables = self.tables()?;

        if tables.codes.contains_key(&new_record.short_code) {
            return Err(AppError::duplicate_code(&new_record.short_code));
        }

        Ok(tables.insert(new_record))
    }

    async fn create_bulk(&self, entries: Vec<NewUrlRecord>) -> Result<Vec<UrlRecord>, AppError> {
        let mut tables = self.tables()?;

        let mut batch_codes = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if tables.codes.contains_key(&entry.short_code)
                || !batch_codes.insert(entry.short_code.as_str())
            {
                return Err(AppError::duplicate_code(&entry.short_code));
            }
        }

        Ok(entries
            .into_iter()
            .map(|entry| tables.insert(entry))
            .collect())
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError> {
        let tables = self.tables()?;

        Ok(tables
            .codes
            .get(short_code)
            .and_then(|id| tables.records.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.tables()?.records.get(&id).cloned())
    }

    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables()?;

        match tables.records.get_mut(&id) {
            Some(record) => {
                record.clicks += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<UrlRecord>, AppError> {
        let offset = (page.max(1) - 1).saturating_mul(page_size);
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(page_size).unwrap_or(0);

        Ok(self
            .tables()?
            .records
            .values()
            .rev()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables()?.records.len() as i64)
    }
}
