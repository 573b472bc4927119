//! # Form Storage
//!
//! The persistence boundary for form schemas. The core hands a validated schema to
//! `create`/`update` and gets it back enriched with `id`, `created_at` and `updated_at`.
//! Writes replace the whole schema; there are no partial-field updates.
//!
//! Forms are scoped to the user that created them.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{FormError, FormResult};
use super::types::FormSchema;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: usize,
    pub per_page: usize,
    pub total: usize,
    pub last_page: usize,
}

/// Form repository trait
///
/// Abstracts storage operations for form schemas.
pub trait FormRepository: Send + Sync {
    /// Persist a new schema, assigning its id and timestamps
    fn create(&self, owner: Uuid, schema: FormSchema) -> FormResult<FormSchema>;

    /// Find a schema by id
    fn find(&self, owner: Uuid, id: u64) -> FormResult<Option<FormSchema>>;

    /// Replace a stored schema, keeping `id` and `created_at`
    fn update(&self, owner: Uuid, id: u64, schema: FormSchema) -> FormResult<FormSchema>;

    /// Delete a schema
    fn delete(&self, owner: Uuid, id: u64) -> FormResult<()>;

    /// List schemas, most recently created first. Pages start at 1.
    fn list(&self, owner: Uuid, page: usize, per_page: usize) -> FormResult<Page<FormSchema>>;
}

/// A schema together with the user that owns it
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredForm {
    owner_id: Uuid,
    schema: FormSchema,
}

/// Storage state shared by both repository implementations
#[derive(Debug, Default, Serialize, Deserialize)]
struct FormTable {
    next_id: u64,
    forms: Vec<StoredForm>,
}

impl FormTable {
    fn create(&mut self, owner: Uuid, mut schema: FormSchema) -> FormSchema {
        self.next_id += 1;
        let now = Utc::now();

        schema.id = Some(self.next_id);
        schema.created_at = Some(now);
        schema.updated_at = Some(now);

        self.forms.push(StoredForm {
            owner_id: owner,
            schema: schema.clone(),
        });
        schema
    }

    fn find(&self, owner: Uuid, id: u64) -> Option<&FormSchema> {
        self.forms
            .iter()
            .find(|f| f.owner_id == owner && f.schema.id == Some(id))
            .map(|f| &f.schema)
    }

    fn update(&mut self, owner: Uuid, id: u64, mut schema: FormSchema) -> FormResult<FormSchema> {
        let stored = self
            .forms
            .iter_mut()
            .find(|f| f.owner_id == owner && f.schema.id == Some(id))
            .ok_or(FormError::NotFound)?;

        schema.id = Some(id);
        schema.created_at = stored.schema.created_at;
        schema.updated_at = Some(Utc::now());

        stored.schema = schema.clone();
        Ok(schema)
    }

    fn delete(&mut self, owner: Uuid, id: u64) -> FormResult<()> {
        let len_before = self.forms.len();
        self.forms
            .retain(|f| !(f.owner_id == owner && f.schema.id == Some(id)));

        if self.forms.len() == len_before {
            Err(FormError::NotFound)
        } else {
            Ok(())
        }
    }

    fn list(&self, owner: Uuid, page: usize, per_page: usize) -> Page<FormSchema> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let mut owned: Vec<&FormSchema> = self
            .forms
            .iter()
            .filter(|f| f.owner_id == owner)
            .map(|f| &f.schema)
            .collect();
        // Ids are assigned in creation order, so they break created_at ties.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = owned.len();
        // An offset past usize::MAX is past the end too
        let offset = (page - 1).checked_mul(per_page).unwrap_or(usize::MAX);
        let data = owned
            .into_iter()
            .skip(offset)
            .take(per_page)
            .cloned()
            .collect();

        Page {
            data,
            current_page: page,
            per_page,
            total,
            last_page: total.div_ceil(per_page).max(1),
        }
    }
}

fn lock_poisoned() -> FormError {
    FormError::StorageError("Lock poisoned".to_string())
}

/// In-memory form repository
#[derive(Debug, Default)]
pub struct InMemoryFormRepository {
    table: RwLock<FormTable>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FormRepository for InMemoryFormRepository {
    fn create(&self, owner: Uuid, schema: FormSchema) -> FormResult<FormSchema> {
        let mut table = self.table.write().map_err(|_| lock_poisoned())?;
        Ok(table.create(owner, schema))
    }

    fn find(&self, owner: Uuid, id: u64) -> FormResult<Option<FormSchema>> {
        let table = self.table.read().map_err(|_| lock_poisoned())?;
        Ok(table.find(owner, id).cloned())
    }

    fn update(&self, owner: Uuid, id: u64, schema: FormSchema) -> FormResult<FormSchema> {
        let mut table = self.table.write().map_err(|_| lock_poisoned())?;
        table.update(owner, id, schema)
    }

    fn delete(&self, owner: Uuid, id: u64) -> FormResult<()> {
        let mut table = self.table.write().map_err(|_| lock_poisoned())?;
        table.delete(owner, id)
    }

    fn list(&self, owner: Uuid, page: usize, per_page: usize) -> FormResult<Page<FormSchema>> {
        let table = self.table.read().map_err(|_| lock_poisoned())?;
        Ok(table.list(owner, page, per_page))
    }
}

/// File-backed form repository
///
/// Keeps the table in memory and writes a JSON snapshot after every change. The snapshot
/// is written to a sibling temp file and renamed over the old one, so a crash leaves
/// either the previous or the new snapshot on disk.
#[derive(Debug)]
pub struct FileFormRepository {
    path: PathBuf,
    table: RwLock<FormTable>,
}

impl FileFormRepository {
    /// Open (or start) a snapshot at `path`
    pub fn open(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref().to_path_buf();

        let table = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                FormError::StorageError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                FormError::StorageError(format!("Corrupt snapshot {}: {}", path.display(), e))
            })?
        } else {
            FormTable::default()
        };

        tracing::debug!(path = %path.display(), forms = table.forms.len(), "opened form snapshot");

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Location of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, table: &FormTable) -> FormResult<()> {
        let json = serde_json::to_vec_pretty(table)
            .map_err(|e| FormError::StorageError(format!("Failed to encode snapshot: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| FormError::StorageError(format!("Failed to create {:?}: {}", parent, e)))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                tracing::error!(path = %self.path.display(), error = %e, "form snapshot write failed");
                FormError::StorageError(format!("Failed to write snapshot: {}", e))
            })
    }

    /// Apply a change to a copy of the table and only commit it once it is on disk.
    fn write<T>(&self, change: impl FnOnce(&mut FormTable) -> FormResult<T>) -> FormResult<T> {
        let mut table = self.table.write().map_err(|_| lock_poisoned())?;

        let mut next = FormTable {
            next_id: table.next_id,
            forms: table.forms.clone(),
        };
        let out = change(&mut next)?;
        self.persist(&next)?;

        *table = next;
        Ok(out)
    }
}

impl FormRepository for FileFormRepository {
    fn create(&self, owner: Uuid, schema: FormSchema) -> FormResult<FormSchema> {
        self.write(|table| Ok(table.create(owner, schema)))
    }

    fn find(&self, owner: Uuid, id: u64) -> FormResult<Option<FormSchema>> {
        let table = self.table.read().map_err(|_| lock_poisoned())?;
        Ok(table.find(owner, id).cloned())
    }

    fn update(&self, owner: Uuid, id: u64, schema: FormSchema) -> FormResult<FormSchema> {
        self.write(|table| table.update(owner, id, schema))
    }

    fn delete(&self, owner: Uuid, id: u64) -> FormResult<()> {
        self.write(|table| table.delete(owner, id))
    }

    fn list(&self, owner: Uuid, page: usize, per_page: usize) -> FormResult<Page<FormSchema>> {
        let table = self.table.read().map_err(|_| lock_poisoned())?;
        Ok(table.list(owner, page, per_page))
    }
}
