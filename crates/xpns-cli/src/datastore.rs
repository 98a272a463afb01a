use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use xpns_core::expense::{Expense, ExpenseStore, Ledger};
use xpns_core::storage::KeyValueStore;
use xpns_core::tags::{Tag, TagRegistry};

/// Ledger kept as two JSON-lines files, one record per line.
#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub tags_path: PathBuf,
    pub expenses_path: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let tags_path = data_dir.join("tags.data");
        let expenses_path = data_dir.join("expenses.data");
        for path in [&tags_path, &expenses_path] {
            if !path.exists() {
                fs::write(path, "").with_context(|| format!("failed to create {}", path.display()))?;
            }
        }

        info!(
            data_dir = %data_dir.display(),
            tags = %tags_path.display(),
            expenses = %expenses_path.display(),
            "opened datastore"
        );

        Ok(Self {
            data_dir,
            tags_path,
            expenses_path,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_tags(&self) -> anyhow::Result<Vec<Tag>> {
        load_jsonl(&self.tags_path).context("failed to load tags.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn load_expenses(&self) -> anyhow::Result<Vec<Expense>> {
        load_jsonl(&self.expenses_path).context("failed to load expenses.data")
    }

    #[tracing::instrument(skip(self, tags))]
    pub fn save_tags(&self, tags: &TagRegistry) -> anyhow::Result<()> {
        let tags: Vec<&Tag> = tags.iter().collect();
        save_jsonl_atomic(&self.tags_path, &tags).context("failed to save tags.data")
    }

    #[tracing::instrument(skip(self, expenses))]
    pub fn save_expenses(&self, expenses: &[Expense]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.expenses_path, expenses).context("failed to save expenses.data")
    }
}

impl ExpenseStore for DataStore {
    fn load(&mut self) -> anyhow::Result<Ledger> {
        Ok(Ledger {
            categories: TagRegistry::new(self.load_tags()?),
            expenses: self.load_expenses()?,
        })
    }

    fn save(&mut self, ledger: &Ledger) -> anyhow::Result<()> {
        self.save_tags(&ledger.categories)?;
        let mut expenses = ledger.expenses.clone();
        expenses.sort_by_key(|e| e.date);
        self.save_expenses(&expenses)?;
        debug!(
            tags = ledger.categories.len(),
            expenses = expenses.len(),
            "saved ledger"
        );
        Ok(())
    }

    async fn delete_position(&mut self, expense: &Expense) -> anyhow::Result<()> {
        let mut expenses = self.load_expenses()?;
        let idx = expenses
            .iter()
            .position(|e| e.id == expense.id)
            .ok_or_else(|| anyhow!("expense not found in expenses.data: {}", expense.id))?;
        expenses.remove(idx);
        self.save_expenses(&expenses)?;
        info!(id = %expense.id, remaining = expenses.len(), "deleted expense");
        Ok(())
    }
}

/// Preferences as a flat JSON object, the file counterpart of a browser's
/// `localStorage`.
#[derive(Debug)]
pub struct PrefsFile {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl PrefsFile {
    #[tracing::instrument]
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let items = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).unwrap_or_else(|err| {
                    warn!(file = %path.display(), error = %err, "ignoring unreadable preferences");
                    BTreeMap::new()
                })
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, items })
    }
}

impl KeyValueStore for PrefsFile {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, &self.items)?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.path.display(), err))?;
        debug!(key, value, "stored preference");
        Ok(())
    }
}

#[tracing::instrument(skip(path))]
fn load_jsonl<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    debug!(file = %path.display(), "loading jsonl");
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(record);
    }

    debug!(count = out.len(), "loaded records from jsonl");
    Ok(out)
}

#[tracing::instrument(skip(path, records))]
fn save_jsonl_atomic<T: Serialize>(path: &Path, records: &[T]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = records.len(), "saving jsonl atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for record in records {
        let serialized = serde_json::to_string(record)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;
    Ok(())
}
