use web_sys::HtmlInputElement;
use xpns_core::expense_form::DraftField;
use xpns_core::shell::Action;
use xpns_core::state::FormMode;
use xpns_core::views::ExpenseFormView;
use xpns_core::views::form::{
  CANCEL_ID,
  FORM_ID,
  PROPOSAL_LIST_ID,
  REMOVE_ID
};
use yew::{
  Callback,
  Html,
  InputEvent,
  NodeRef,
  Properties,
  SubmitEvent,
  TargetCast,
  classes,
  function_component,
  html,
  use_effect_with,
  use_node_ref
};

use super::click_on;

#[derive(Properties, PartialEq)]
pub struct ExpenseFormProps {
  pub form:       ExpenseFormView,
  pub on_element: Callback<String>,
  pub on_action:  Callback<Action>,
  pub on_caret:   Callback<Option<usize>>
}

fn field_input(
  form: &ExpenseFormView,
  field: DraftField,
  label: &str,
  input_type: &str,
  on_action: &Callback<Action>
) -> Html {
  let id = field.element_id();
  let on_action = on_action.clone();
  let oninput = Callback::from(
    move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_action.emit(
        Action::UpdateDraft(
          field,
          input.value()
        )
      );
    }
  );

  html! {
      <div class="mb-2">
          <label for={id} class="form-label">{ label.to_string() }</label>
          <input
              {id}
              type={input_type.to_string()}
              class={classes!("form-control", form.is_flagged(id).then_some("is-invalid error"))}
              value={form.draft.get(field).to_string()}
              {oninput}
          />
      </div>
  }
}

#[function_component(ExpenseForm)]
pub fn expense_form(
  props: &ExpenseFormProps
) -> Html {
  let form = &props.form;
  let description_ref: NodeRef =
    use_node_ref();

  {
    let description_ref =
      description_ref.clone();
    use_effect_with(
      (
        form.draft.description.clone(),
        form.caret
      ),
      move |(_, caret)| {
        if let (Some(input), Some(pos)) = (
          description_ref
            .cast::<HtmlInputElement>(),
          *caret
        ) {
          let pos = pos as u32;
          let _ = input
            .set_selection_range(
              pos, pos
            );
        }
        || ()
      }
    );
  }

  let on_description = {
    let on_action =
      props.on_action.clone();
    let on_caret =
      props.on_caret.clone();
    Callback::from(
      move |e: InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        on_caret.emit(
          input
            .selection_start()
            .ok()
            .flatten()
            .map(|pos| pos as usize)
        );
        on_action.emit(
          Action::UpdateDraft(
            DraftField::Description,
            input.value()
          )
        );
      }
    )
  };

  let onsubmit = {
    let on_action =
      props.on_action.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        on_action
          .emit(Action::SubmitForm);
      }
    )
  };

  let description_id =
    DraftField::Description
      .element_id();
  let title = match form.mode {
    | FormMode::New => "Neue Ausgabe",
    | FormMode::Edit => {
      "Ausgabe bearbeiten"
    }
  };

  html! {
      <form id={FORM_ID} class="card card-body mt-3" {onsubmit}>
          <h5 class="card-title">{ title }</h5>
          <div class="mb-2">
              <label for={description_id} class="form-label">{ "Beschreibung" }</label>
              <input
                  id={description_id}
                  ref={description_ref}
                  type="text"
                  autocomplete="off"
                  list={PROPOSAL_LIST_ID}
                  class={classes!("form-control", form.is_flagged(description_id).then_some("is-invalid error"))}
                  value={form.draft.description.clone()}
                  oninput={on_description}
              />
              <datalist id={PROPOSAL_LIST_ID}>
                  {
                      for form.proposals.iter().map(|proposal| html! {
                          <option value={proposal.value.clone()} selected={proposal.selected} />
                      })
                  }
              </datalist>
          </div>
          { field_input(form, DraftField::Amount, "Betrag", "text", &props.on_action) }
          { field_input(form, DraftField::Currency, "Währung", "text", &props.on_action) }
          { field_input(form, DraftField::Date, "Datum", "date", &props.on_action) }
          { field_input(form, DraftField::ExchangeRate, &format!("Kurs zu {}", form.default_currency), "text", &props.on_action) }
          <div class="d-flex gap-2">
              <button type="submit" class="btn btn-primary">{ "Speichern" }</button>
              <button type="button" id={CANCEL_ID} class="btn btn-secondary" onclick={click_on(&props.on_element, CANCEL_ID)}>
                  { "Abbrechen" }
              </button>
              {
                  if form.can_delete {
                      html! {
                          <button type="button" id={REMOVE_ID} class="btn btn-outline-danger ms-auto" onclick={click_on(&props.on_element, REMOVE_ID)}>
                              { "Löschen" }
                          </button>
                      }
                  } else {
                      html! {}
                  }
              }
          </div>
      </form>
  }
}
