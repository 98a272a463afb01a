use std::fs;

use chrono::NaiveDate;
use tempfile::tempdir;
use xpns_cli::cli::{Command, DisplayArg};
use xpns_cli::commands::dispatch;
use xpns_cli::datastore::{DataStore, PrefsFile};
use xpns_cli::render::Renderer;
use xpns_core::expense::{DEFAULT_CURRENCY, Expense, ExpenseStore, Ledger};
use xpns_core::shell::{Shell, ShellSettings};
use xpns_core::storage::{KeyValueStore, MONTH_DISPLAY_KEY};
use xpns_core::tags::{Tag, TagRegistry};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn sample_ledger() -> Ledger {
    let mut bread = Expense::blank(day(2026, 10, 16), DEFAULT_CURRENCY);
    bread.description = "Bread #Groceries".to_string();
    bread.amount = 2.5;
    bread.tags = vec!["Groceries".to_string()];

    Ledger {
        categories: TagRegistry::new(vec![
            Tag::new("Food", None, "green"),
            Tag::new("Groceries", Some("Food"), "green"),
        ]),
        expenses: vec![bread],
    }
}

fn run(shell: &mut Shell<DataStore, PrefsFile>, command: Command) -> anyhow::Result<String> {
    let mut out = Vec::new();
    dispatch(shell, &Renderer::plain(), command, &mut out)?;
    Ok(String::from_utf8(out).expect("utf8"))
}

fn open_shell(dir: &std::path::Path) -> Shell<DataStore, PrefsFile> {
    let store = DataStore::open(dir).expect("open datastore");
    let prefs = PrefsFile::open(dir.join("prefs.json")).expect("open prefs");
    Shell::new(store, prefs, day(2026, 10, 16), ShellSettings::default()).expect("shell")
}

#[test]
fn datastore_roundtrips_a_ledger() {
    let temp = tempdir().expect("tempdir");
    let mut store = DataStore::open(temp.path()).expect("open datastore");
    let ledger = sample_ledger();

    store.save(&ledger).expect("save");
    let loaded = store.load().expect("load");

    assert_eq!(loaded, ledger);
    let raw = fs::read_to_string(&store.tags_path).expect("read tags");
    assert_eq!(raw.lines().count(), 2);
}

#[test]
fn bad_lines_name_the_file_and_line() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");
    fs::write(&store.expenses_path, "\n{not json}\n").expect("write");

    let err = store.load_expenses().expect_err("invalid json");
    assert!(format!("{err:#}").contains("line 2"));
}

#[tokio::test]
async fn delete_position_rewrites_the_expense_file() {
    let temp = tempdir().expect("tempdir");
    let mut store = DataStore::open(temp.path()).expect("open datastore");
    let ledger = sample_ledger();
    store.save(&ledger).expect("save");

    store
        .delete_position(&ledger.expenses[0])
        .await
        .expect("delete");

    assert!(store.load_expenses().expect("load").is_empty());
    assert!(store.delete_position(&ledger.expenses[0]).await.is_err());
}

#[test]
fn add_then_show_lists_the_expense() {
    let temp = tempdir().expect("tempdir");
    let mut shell = open_shell(temp.path());

    let added = run(
        &mut shell,
        Command::Add {
            date: day(2026, 10, 3),
            amount: "12,50".to_string(),
            description: vec!["Lunch".to_string(), "#Food".to_string()],
            currency: None,
            rate: None,
        },
    )
    .expect("add");
    assert!(added.contains("12,50"));

    let mut reopened = open_shell(temp.path());
    let shown = run(&mut reopened, Command::Show { date: day(2026, 10, 3) }).expect("show");
    assert!(shown.contains("Lunch #Food"));
    assert!(shown.contains("Summe 12,50 (Sa 03.10.)"));
}

#[test]
fn invalid_add_reports_the_fields() {
    let temp = tempdir().expect("tempdir");
    let mut shell = open_shell(temp.path());

    let err = run(
        &mut shell,
        Command::Add {
            date: day(2026, 10, 3),
            amount: "zwölf".to_string(),
            description: vec!["Lunch".to_string()],
            currency: Some("CHF".to_string()),
            rate: None,
        },
    )
    .expect_err("invalid amount");

    let message = err.to_string();
    assert!(message.contains("amount"));
    assert!(message.contains("exchange-rate"));
    assert!(!message.contains("description"));
}

#[test]
fn tag_edit_creates_and_moves_tags() {
    let temp = tempdir().expect("tempdir");
    let mut store = DataStore::open(temp.path()).expect("open datastore");
    store.save(&sample_ledger()).expect("save");
    let mut shell = open_shell(temp.path());

    run(
        &mut shell,
        Command::TagEdit {
            name: "Organic".to_string(),
            parent: Some("Groceries".to_string()),
            root: false,
            color: Some("yellow".to_string()),
        },
    )
    .expect("create tag");

    let err = run(
        &mut shell,
        Command::TagEdit {
            name: "Food".to_string(),
            parent: Some("Organic".to_string()),
            root: false,
            color: None,
        },
    )
    .expect_err("cycle");
    assert!(err.to_string().contains("cycle"));

    let listed = run(&mut shell, Command::Tags).expect("tags");
    let rows: Vec<Vec<&str>> = listed
        .lines()
        .skip(2)
        .map(|line| line.split_whitespace().collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["Food", "bg-success"],
            vec!["Groceries", "bg-success"],
            vec!["Organic", "bg-warning"],
        ]
    );
    assert!(listed.contains("\n    Organic"));

    let tags = store.load_tags().expect("load tags");
    assert_eq!(tags.len(), 3);
}

#[test]
fn expenses_display_is_remembered() {
    let temp = tempdir().expect("tempdir");
    let mut shell = open_shell(temp.path());

    let printed = run(
        &mut shell,
        Command::Expenses {
            month: None,
            display: Some(DisplayArg::Calendar),
        },
    )
    .expect("expenses");
    assert!(printed.starts_with("Oktober 2026"));

    let prefs = PrefsFile::open(temp.path().join("prefs.json")).expect("prefs");
    assert_eq!(prefs.get_item(MONTH_DISPLAY_KEY).as_deref(), Some("calendar"));
}

#[test]
fn deleting_an_unknown_expense_fails() {
    let temp = tempdir().expect("tempdir");
    let mut shell = open_shell(temp.path());
    let err = run(
        &mut shell,
        Command::Delete {
            id: uuid::Uuid::new_v4(),
        },
    )
    .expect_err("unknown id");
    assert!(err.to_string().contains("expense not found"));
}
