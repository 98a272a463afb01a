use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::Local;
use gloo::events::{
  EventListener,
  EventListenerOptions
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  KeyboardEvent
};
use xpns_core::keyboard::{
  Key,
  KeyInput,
  KeyOutcome
};
use xpns_core::shell::{
  Action,
  Shell,
  ShellSettings
};
use xpns_core::views::{
  APP_AREA_ID,
  AppArea,
  Frame,
  Listener,
  MainView
};
use yew::{
  Callback,
  Html,
  UseStateHandle,
  function_component,
  html,
  use_effect_with,
  use_mut_ref,
  use_state
};

use crate::components::{
  AlertBox,
  ManageTags,
  MonthDisplayArea,
  Navbar
};
use crate::storage::{
  LocalStoragePrefs,
  LocalStorageStore
};

type WebShell = Shell<
  LocalStorageStore,
  LocalStoragePrefs
>;
type SharedShell =
  Rc<RefCell<Option<WebShell>>>;
type SharedQueue =
  Rc<RefCell<ActionQueue>>;

/// Actions waiting for the shell, run
/// one at a time in arrival order.
#[derive(Debug, Default)]
struct ActionQueue {
  pending:  VecDeque<Action>,
  draining: bool
}

impl ActionQueue {
  /// Queues `action`. True when no drain
  /// is running and the caller must
  /// start one.
  fn push(
    &mut self,
    action: Action
  ) -> bool {
    self.pending.push_back(action);
    if self.draining {
      false
    } else {
      self.draining = true;
      true
    }
  }

  /// Next action for the running drain;
  /// `None` ends it.
  fn next(&mut self) -> Option<Action> {
    let action =
      self.pending.pop_front();
    if action.is_none() {
      self.draining = false;
    }
    action
  }

  fn clear(&mut self) {
    self.pending.clear();
    self.draining = false;
  }
}

fn open_shell()
-> anyhow::Result<WebShell> {
  Shell::new(
    LocalStorageStore,
    LocalStoragePrefs,
    Local::now().date_naive(),
    ShellSettings::default()
  )
}

fn report(err: &anyhow::Error) {
  let message = format!("{err:#}");
  tracing::error!(
    error = %message,
    "action failed"
  );
  gloo::dialogs::alert(&message);
}

fn key_input(
  event: &KeyboardEvent
) -> KeyInput {
  let mut input = KeyInput::new(
    Key::from_dom(&event.key())
  );
  if event.ctrl_key() {
    input = input.with_ctrl();
  }
  let target_id = event
    .target()
    .and_then(|target| {
      target
        .dyn_into::<Element>()
        .ok()
    })
    .map(|element| element.id())
    .filter(|id| !id.is_empty());
  if let Some(id) = target_id {
    input = input.on(&id);
  }
  input
}

/// Action for a click on `element_id`,
/// looked up in the frame's bindings.
fn bound_action(
  frame: &Frame,
  element_id: &str
) -> Option<Action> {
  let binding =
    frame.binding(element_id)?;
  match &binding.listener {
    | Listener::Click(action) => {
      Some(action.clone())
    }
    | Listener::Collapse {
      path
    } => {
      Some(collapse_action(frame, path))
    }
    | Listener::Submit
    | Listener::Change => None
  }
}

fn collapse_action(
  frame: &Frame,
  path: &str
) -> Action {
  let expanded = match &frame.app_area
  {
    | AppArea::MonthDisplay(area) => {
      match &area.main {
        | MainView::Overview(view) => {
          view
            .rows
            .iter()
            .any(|row| {
              row.path_id == path
                && row.expanded
            })
        }
        | _ => false
      }
    }
    | AppArea::ManageTags(_) => false
  };

  if expanded {
    Action::RemoveExpandedPath(
      path.to_string()
    )
  } else {
    Action::SaveExpandedPath(
      path.to_string()
    )
  }
}

fn run_action(
  shell: SharedShell,
  queue: SharedQueue,
  frame: UseStateHandle<Option<Frame>>,
  action: Action
) {
  if !queue.borrow_mut().push(action) {
    tracing::debug!(
      "action queued behind a running \
       one"
    );
    return;
  }

  wasm_bindgen_futures::spawn_local(
    async move {
      loop {
        let Some(action) =
          queue.borrow_mut().next()
        else {
          break;
        };
        // the shell leaves the cell while
        // the action runs
        let Some(mut current) =
          shell.borrow_mut().take()
        else {
          tracing::warn!(
            ?action,
            "no shell, discarding \
             queued actions"
          );
          queue.borrow_mut().clear();
          break;
        };

        if let Err(err) =
          current.dispatch(action).await
        {
          if let Err(err) =
            current.handle_error(err)
          {
            report(&err);
          }
        }
        frame.set(
          current.frame().cloned()
        );
        *shell.borrow_mut() =
          Some(current);
      }
    }
  );
}

#[function_component(App)]
pub fn app() -> Html {
  let shell: SharedShell =
    use_mut_ref(|| {
      match open_shell() {
        | Ok(shell) => Some(shell),
        | Err(err) => {
          report(&err);
          None
        }
      }
    });
  let queue: SharedQueue =
    use_mut_ref(ActionQueue::default);
  let frame = {
    let shell = shell.clone();
    use_state(move || {
      shell
        .borrow_mut()
        .as_mut()
        .map(|shell| {
          shell.render().clone()
        })
    })
  };

  {
    let shell = shell.clone();
    let frame = frame.clone();

    use_effect_with((), move |_| {
      let listener = web_sys::window()
        .and_then(|window| {
          window.document()
        })
        .map(|document| {
          EventListener::new_with_options(
            &document,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
              let Some(event) = event
                .dyn_ref::<KeyboardEvent>()
              else {
                return;
              };
              let input =
                key_input(event);
              let Ok(mut guard) =
                shell.try_borrow_mut()
              else {
                return;
              };
              let Some(current) =
                guard.as_mut()
              else {
                tracing::debug!(
                  "shell busy, key \
                   ignored"
                );
                return;
              };

              match current
                .handle_key(&input)
              {
                | Ok(
                  KeyOutcome::Handled
                ) => {
                  event
                    .prevent_default();
                  frame.set(
                    current
                      .frame()
                      .cloned()
                  );
                }
                | Ok(
                  KeyOutcome::PassThrough
                ) => {}
                | Err(err) => {
                  report(&err)
                }
              }
            }
          )
        });

      move || drop(listener)
    });
  }

  let on_action = {
    let shell = shell.clone();
    let queue = queue.clone();
    let frame = frame.clone();
    Callback::from(
      move |action: Action| {
        run_action(
          shell.clone(),
          queue.clone(),
          frame.clone(),
          action
        );
      }
    )
  };

  let on_element = {
    let on_action = on_action.clone();
    let frame = frame.clone();
    Callback::from(
      move |element_id: String| {
        let action =
          (*frame).as_ref().and_then(
            |current| {
              bound_action(
                current,
                &element_id
              )
            }
          );
        match action {
          | Some(action) => {
            on_action.emit(action)
          }
          | None => {
            tracing::debug!(
              element_id = %element_id,
              "no click binding"
            )
          }
        }
      }
    )
  };

  let on_caret = {
    let shell = shell.clone();
    Callback::from(
      move |position: Option<usize>| {
        if let Ok(mut guard) =
          shell.try_borrow_mut()
        {
          if let Some(current) =
            guard.as_mut()
          {
            current
              .set_description_caret(
                position
              );
          }
        }
      }
    )
  };

  let Some(current) = (*frame).clone()
  else {
    return html! {
        <div class="container py-3">
            <div class="alert alert-danger">
                { "Die Ausgaben konnten nicht geladen werden." }
            </div>
        </div>
    };
  };

  let area = match &current.app_area {
    | AppArea::MonthDisplay(area) => {
      html! {
          <MonthDisplayArea
              area={(**area).clone()}
              on_element={on_element.clone()}
              on_action={on_action.clone()}
              on_caret={on_caret.clone()}
          />
      }
    }
    | AppArea::ManageTags(view) => {
      html! {
          <ManageTags
              view={view.clone()}
              on_element={on_element.clone()}
              on_action={on_action.clone()}
          />
      }
    }
  };

  html! {
      <div class="container py-3">
          <Navbar view={current.navbar.clone()} on_element={on_element.clone()} />
          {
              match current.alert.clone() {
                  Some(message) => html! {
                      <AlertBox {message} on_action={on_action.clone()} />
                  },
                  None => html! {},
              }
          }
          <div id={APP_AREA_ID}>
              { area }
          </div>
      </div>
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use xpns_core::expense::Ledger;
  use xpns_core::storage::MemoryStorage;
  use xpns_core::tags::{
    Tag,
    TagRegistry
  };
  use xpns_core::{
    MemoryStore,
    state::ViewMode
  };

  use super::*;

  fn rendered_frame() -> Frame {
    let ledger = Ledger {
      categories: TagRegistry::new(
        vec![
          Tag::new(
            "Food", None, "green"
          ),
          Tag::new(
            "Groceries",
            Some("Food"),
            "green"
          ),
        ]
      ),
      expenses:   Vec::new()
    };
    let mut shell = Shell::new(
      MemoryStore::with_ledger(ledger),
      MemoryStorage::default(),
      NaiveDate::from_ymd_opt(
        2026, 10, 16
      )
      .expect("valid date"),
      ShellSettings::default()
    )
    .expect("shell");
    shell.render().clone()
  }

  #[test]
  fn clicks_resolve_through_bindings() {
    let frame = rendered_frame();
    assert_eq!(
      bound_action(
        &frame,
        "nav-manageTags"
      ),
      Some(Action::SetViewMode(
        ViewMode::ManageTags
      ))
    );
    assert_eq!(
      bound_action(&frame, "nowhere"),
      None
    );
  }

  #[test]
  fn queued_actions_drain_in_order() {
    let mut queue =
      ActionQueue::default();
    assert!(
      queue.push(Action::StartNew)
    );
    assert!(
      !queue.push(Action::DismissAlert)
    );

    assert_eq!(
      queue.next(),
      Some(Action::StartNew)
    );
    assert!(
      !queue.push(Action::CancelLineEdit)
    );
    assert_eq!(
      queue.next(),
      Some(Action::DismissAlert)
    );
    assert_eq!(
      queue.next(),
      Some(Action::CancelLineEdit)
    );
    assert_eq!(queue.next(), None);

    assert!(
      queue.push(Action::StartNew),
      "an idle queue needs a new drain"
    );
    queue.clear();
    assert_eq!(queue.next(), None);
    assert!(
      queue.push(Action::DismissAlert)
    );
  }

  #[test]
  fn collapsed_rows_expand_on_click() {
    let frame = rendered_frame();
    assert_eq!(
      collapse_action(
        &frame,
        "overview-Food"
      ),
      Action::SaveExpandedPath(
        "overview-Food".to_string()
      )
    );
  }
}
