//! JSON Store Module
//!
//! Flat-file datastore: one JSON document holding every collection, rewritten
//! in full on each mutation.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::db::{Collection, Filter, IdGenerator};
use crate::error::{AppError, Result};

// == JSON Store ==
/// Collections of untyped JSON records persisted to a single file.
///
/// Mutations are serialized by an async mutex and applied to a copy of the
/// document; memory is only updated once the copy is on disk.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: Mutex<Map<String, Value>>,
    ids: IdGenerator,
}

impl JsonStore {
    // == Open ==
    /// Loads the document at `path`, creating it when missing. Absent
    /// collections are added as empty arrays.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let (mut data, mut dirty) = match tokio::fs::read_to_string(&path).await {
            Ok(text) if !text.trim().is_empty() => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => (map, false),
                _ => {
                    return Err(AppError::Internal(format!(
                        "{} must contain a JSON object",
                        path.display()
                    )))
                }
            },
            Ok(_) => (Map::new(), true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Map::new(), true),
            Err(e) => return Err(e.into()),
        };

        for collection in Collection::ALL {
            match data.get(collection.as_str()) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(AppError::Internal(format!(
                        "collection '{}' in {} is not an array",
                        collection,
                        path.display()
                    )))
                }
                None => {
                    data.insert(collection.as_str().to_string(), Value::Array(Vec::new()));
                    dirty = true;
                }
            }
        }

        let ids = IdGenerator::starting_after(max_record_id(&data));
        if dirty {
            write_document(&path, &data).await?;
        }

        info!(path = %path.display(), "datastore opened");
        Ok(Self {
            path,
            data: Mutex::new(data),
            ids,
        })
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next unused record ID.
    pub fn next_id(&self) -> Result<u64> {
        self.ids
            .next_id()
            .ok_or_else(|| AppError::Internal("record id space exhausted".to_string()))
    }

    // == Reads ==
    /// First record in `collection` matching `filter`.
    pub async fn find_one(&self, collection: Collection, filter: &Filter) -> Option<Value> {
        let data = self.data.lock().await;
        records(&data, collection)
            .iter()
            .find(|record| filter.matches(record))
            .cloned()
    }

    /// Every record in `collection` matching `filter`, in stored order.
    pub async fn find_all(&self, collection: Collection, filter: &Filter) -> Vec<Value> {
        let data = self.data.lock().await;
        records(&data, collection)
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    // == Writes ==
    /// Appends `record`, assigning an `id` when it has none. Returns the stored record.
    pub async fn push(&self, collection: Collection, mut record: Map<String, Value>) -> Result<Value> {
        if !record.contains_key("id") {
            record.insert("id".to_string(), Value::from(self.next_id()?));
        }
        let record = Value::Object(record);

        self.mutate(|data| {
            records_mut(data, collection)?.push(record.clone());
            Ok(())
        })
        .await?;

        debug!(%collection, "record created");
        Ok(record)
    }

    /// Shallow-merges `patch` into the record whose `id` equals `id`.
    /// The `id` field itself is never overwritten. Returns the updated record,
    /// or None when no record has that id.
    pub async fn assign(
        &self,
        collection: Collection,
        id: &Value,
        patch: Map<String, Value>,
    ) -> Result<Option<Value>> {
        let filter = Filter::new().eq("id", id.clone());

        let updated = self
            .mutate(|data| {
                let target = records_mut(data, collection)?
                    .iter_mut()
                    .find(|record| filter.matches(record));
                let Some(Value::Object(fields)) = target else {
                    return Ok(None);
                };
                for (key, value) in patch {
                    if key != "id" {
                        fields.insert(key, value);
                    }
                }
                Ok(Some(Value::Object(fields.clone())))
            })
            .await?;

        if updated.is_some() {
            debug!(%collection, %id, "record updated");
        }
        Ok(updated)
    }

    /// Removes every record matching `filter`. Returns the removed records.
    pub async fn remove(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>> {
        let removed = self
            .mutate(|data| {
                let items = records_mut(data, collection)?;
                let (removed, kept): (Vec<Value>, Vec<Value>) =
                    items.drain(..).partition(|record| filter.matches(record));
                *items = kept;
                Ok(removed)
            })
            .await?;

        debug!(%collection, count = removed.len(), "records removed");
        Ok(removed)
    }

    /// Applies `change` to a copy of the document, writes it, then commits it
    /// to memory.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Map<String, Value>) -> Result<T>,
    ) -> Result<T> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let output = change(&mut next)?;
        write_document(&self.path, &next).await?;
        *data = next;
        Ok(output)
    }
}

fn records(data: &Map<String, Value>, collection: Collection) -> &[Value] {
    data.get(collection.as_str())
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn records_mut(data: &mut Map<String, Value>, collection: Collection) -> Result<&mut Vec<Value>> {
    data.entry(collection.as_str())
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| AppError::Internal(format!("collection '{}' is not an array", collection)))
}

fn max_record_id(data: &Map<String, Value>) -> u64 {
    data.values()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|record| match record.get("id")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

/// Writes the whole document to a sibling temp file, then renames it over
/// the original.
async fn write_document(path: &Path, data: &Map<String, Value>) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(data)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
