use anyhow::{
  Context,
  anyhow
};
use xpns_core::expense::{
  Expense,
  ExpenseStore,
  Ledger
};
use xpns_core::storage::KeyValueStore;

const LEDGER_STORAGE_KEY: &str =
  "xpns.ledger";

fn local_storage()
-> Option<web_sys::Storage> {
  web_sys::window().and_then(
    |window| {
      window
        .local_storage()
        .ok()
        .flatten()
    }
  )
}

fn read_item(
  key: &str
) -> Option<String> {
  local_storage().and_then(
    |storage| {
      storage
        .get_item(key)
        .ok()
        .flatten()
    }
  )
}

fn write_item(
  key: &str,
  value: &str
) -> anyhow::Result<()> {
  let storage = local_storage()
    .ok_or_else(|| {
      anyhow!(
        "localStorage is not \
         available"
      )
    })?;
  storage
    .set_item(key, value)
    .map_err(|err| {
      anyhow!(
        "failed to write {key}: \
         {err:?}"
      )
    })
}

/// Ledger kept as one JSON document in
/// `localStorage`.
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
  fn write(
    &self,
    ledger: &Ledger
  ) -> anyhow::Result<()> {
    let raw =
      serde_json::to_string(ledger)
        .context(
          "failed to serialize \
           ledger"
        )?;
    write_item(
      LEDGER_STORAGE_KEY,
      &raw
    )
  }
}

impl ExpenseStore
  for LocalStorageStore
{
  fn load(
    &mut self
  ) -> anyhow::Result<Ledger> {
    match read_item(
      LEDGER_STORAGE_KEY
    ) {
      | Some(raw) => {
        let ledger: Ledger =
          serde_json::from_str(&raw)
            .context(
              "stored ledger is not \
               valid json"
            )?;
        tracing::info!(
          tags = ledger
            .categories
            .len(),
          expenses =
            ledger.expenses.len(),
          "loaded ledger from \
           localStorage"
        );
        Ok(ledger)
      }
      | None => {
        tracing::info!(
          "no stored ledger, \
           starting empty"
        );
        Ok(Ledger::default())
      }
    }
  }

  fn save(
    &mut self,
    ledger: &Ledger
  ) -> anyhow::Result<()> {
    self.write(ledger)?;
    tracing::debug!(
      expenses =
        ledger.expenses.len(),
      "saved ledger"
    );
    Ok(())
  }

  async fn delete_position(
    &mut self,
    expense: &Expense
  ) -> anyhow::Result<()> {
    let mut ledger = self.load()?;
    ledger
      .remove(expense.id)
      .ok_or_else(|| {
        anyhow!(
          "expense not found in \
           localStorage: {}",
          expense.id
        )
      })?;
    self.write(&ledger)?;
    tracing::info!(
      id = %expense.id,
      "deleted expense"
    );
    Ok(())
  }
}

/// View preferences such as the month
/// display.
#[derive(Debug, Default)]
pub struct LocalStoragePrefs;

impl KeyValueStore
  for LocalStoragePrefs
{
  fn get_item(
    &self,
    key: &str
  ) -> Option<String> {
    read_item(key)
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    write_item(key, value)
  }
}
