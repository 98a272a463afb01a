pub mod classes;
pub mod colors;
pub mod error;
pub mod expense;
pub mod expense_form;
pub mod format;
pub mod keyboard;
pub mod labels;
pub mod shell;
pub mod state;
pub mod storage;
pub mod tag_editor;
pub mod tags;
pub mod views;

pub use error::{ExpensesError, TagError};
pub use expense::{Expense, ExpenseStore, Ledger, MemoryStore};
pub use shell::{Action, Shell, ShellSettings};
pub use storage::{KeyValueStore, MemoryStorage};
