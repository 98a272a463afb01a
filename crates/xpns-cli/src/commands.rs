use std::future::Future;
use std::io::Write;

use anyhow::{Context, anyhow, bail};
use tracing::{debug, info};
use xpns_core::expense::ExpenseStore;
use xpns_core::expense_form::DraftField;
use xpns_core::shell::Shell;
use xpns_core::state::ViewMode;
use xpns_core::storage::KeyValueStore;
use xpns_core::tag_editor::TagSubmission;
use xpns_core::views::{AppArea, Frame, MainView, ManageTagsView, MonthArea};

use crate::cli::Command;
use crate::render::Renderer;

#[tracing::instrument(skip(shell, renderer, out))]
pub fn dispatch<S, K, W>(
    shell: &mut Shell<S, K>,
    renderer: &Renderer,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: ExpenseStore,
    K: KeyValueStore,
    W: Write,
{
    match command {
        Command::Tags => {
            shell.set_view_mode(ViewMode::ManageTags);
            renderer.write_tags(out, manage_tags(rendered(shell)?)?)
        }
        Command::TagEdit {
            name,
            parent,
            root,
            color,
        } => edit_tag(shell, out, &name, parent, root, color),
        Command::Colors => renderer.write_colors(out, &shell.colors().sorted_by_name()),
        Command::Expenses { month, display } => {
            if let Some(month) = month {
                shell.set_date(month);
            }
            if let Some(display) = display {
                shell.set_month_display(display.into());
            }
            shell.render();
            let area = month_area(rendered(shell)?)?;
            match &area.main {
                MainView::Overview(view) => renderer.write_overview(out, view),
                MainView::Calendar(view) => renderer.write_calendar(out, view),
                MainView::Chart(view) => renderer.write_chart(out, view),
            }
        }
        Command::Add {
            date,
            amount,
            description,
            currency,
            rate,
        } => {
            shell.set_date(date);
            shell.start_new();
            shell.update_draft(DraftField::Description, description.join(" "));
            shell.update_draft(DraftField::Amount, amount);
            if let Some(currency) = currency {
                shell.update_draft(DraftField::Currency, currency);
            }
            if let Some(rate) = rate {
                shell.update_draft(DraftField::ExchangeRate, rate);
            }

            if let Err(err) = shell.submit_form() {
                shell.handle_error(err)?;
                let state = shell.state();
                let fields: Vec<&str> = state.flagged.iter().map(String::as_str).collect();
                bail!(
                    "{} [{}]",
                    state.alert.as_deref().unwrap_or_default(),
                    fields.join(", ")
                );
            }
            info!(date = %shell.current_day_string(), "added expense");
            renderer.write_day(out, &month_area(rendered(shell)?)?.day_table)
        }
        Command::Delete { id } => {
            shell.start_edit_position(id);
            if shell.state().form.is_none() {
                bail!("expense not found: {id}");
            }
            run_async(shell.remove_expense())?
                .with_context(|| format!("failed to delete {id}"))?;
            writeln!(out, "Ausgabe {id} gelöscht")?;
            Ok(())
        }
        Command::Show { date } => {
            shell.set_date(date);
            shell.render();
            renderer.write_day(out, &month_area(rendered(shell)?)?.day_table)
        }
    }
}

fn edit_tag<S, K, W>(
    shell: &mut Shell<S, K>,
    out: &mut W,
    name: &str,
    parent: Option<String>,
    root: bool,
    color: Option<String>,
) -> anyhow::Result<()>
where
    S: ExpenseStore,
    K: KeyValueStore,
    W: Write,
{
    shell.start_tag_edit(name)?;
    let view = manage_tags(rendered(shell)?)?;
    let editor = match (&view.editor, &view.editor_error) {
        (Some(editor), _) => editor.clone(),
        (None, Some(err)) => bail!("cannot edit tag {name}: {err}"),
        (None, None) => bail!("cannot edit tag {name}"),
    };

    let parent = if root {
        None
    } else {
        parent.or_else(|| editor.tag.parent.clone())
    };
    if let Some(color) = color.as_deref() {
        shell.handle_color_change(color)?;
    }
    let color = color.unwrap_or_else(|| editor.tag.color.clone());
    debug!(?parent, %color, is_new = editor.is_new, "submitting tag");

    let tag = shell.submit_tag_form(TagSubmission { parent, color })?;
    match tag.parent.as_deref() {
        Some(parent) => writeln!(out, "Kategorie {} ({}) unter {parent} gespeichert", tag.name, tag.color)?,
        None => writeln!(out, "Kategorie {} ({}) gespeichert", tag.name, tag.color)?,
    }
    Ok(())
}

fn rendered<S: ExpenseStore, K: KeyValueStore>(shell: &Shell<S, K>) -> anyhow::Result<&Frame> {
    shell.frame().ok_or_else(|| anyhow!("nothing has been rendered yet"))
}

fn month_area(frame: &Frame) -> anyhow::Result<&MonthArea> {
    match &frame.app_area {
        AppArea::MonthDisplay(area) => Ok(area),
        AppArea::ManageTags(_) => Err(anyhow!("expected the month display")),
    }
}

fn manage_tags(frame: &Frame) -> anyhow::Result<&ManageTagsView> {
    match &frame.app_area {
        AppArea::ManageTags(view) => Ok(view),
        AppArea::MonthDisplay(_) => Err(anyhow!("expected the tag screen")),
    }
}

fn run_async<T>(future: impl Future<Output = T>) -> anyhow::Result<T> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    Ok(runtime.block_on(future))
}
