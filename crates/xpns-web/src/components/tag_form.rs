use web_sys::HtmlSelectElement;
use xpns_core::shell::Action;
use xpns_core::tag_editor::{
  COLOR_SELECT_ID,
  FORM_ID,
  PARENT_SELECT_ID,
  TagFormView,
  TagSubmission
};
use xpns_core::views::form::CANCEL_ID;
use yew::{
  Callback,
  Event,
  Html,
  Properties,
  SubmitEvent,
  TargetCast,
  classes,
  function_component,
  html,
  use_node_ref
};

use super::{
  Badge,
  click_on
};

#[derive(Properties, PartialEq)]
pub struct TagFormProps {
  pub view:       TagFormView,
  pub on_element: Callback<String>,
  pub on_action:  Callback<Action>
}

fn class_names(
  list: &xpns_core::classes::ClassList
) -> Vec<String> {
  list
    .iter()
    .map(str::to_string)
    .collect()
}

#[function_component(TagForm)]
pub fn tag_form(
  props: &TagFormProps
) -> Html {
  let view = &props.view;
  let parent_ref = use_node_ref();
  let color_ref = use_node_ref();

  let on_color = {
    let on_action =
      props.on_action.clone();
    Callback::from(move |e: Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      on_action.emit(
        Action::ChangeTagColor(
          select.value()
        )
      );
    })
  };

  let onsubmit = {
    let on_action =
      props.on_action.clone();
    let parent_ref =
      parent_ref.clone();
    let color_ref = color_ref.clone();
    let fallback_color =
      view.preview.applied().to_string();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        let parent = parent_ref
          .cast::<HtmlSelectElement>()
          .map(|select| select.value())
          .filter(|value| {
            !value.is_empty()
          });
        let color = color_ref
          .cast::<HtmlSelectElement>()
          .map(|select| select.value())
          .unwrap_or_else(|| {
            fallback_color.clone()
          });
        on_action.emit(
          Action::SubmitTagForm(
            TagSubmission {
              parent,
              color
            }
          )
        );
      }
    )
  };

  let title = if view.is_new {
    "Neue Kategorie"
  } else {
    "Kategorie bearbeiten"
  };

  html! {
      <form id={FORM_ID} class="card card-body" {onsubmit}>
          <h5 class="card-title">{ title }</h5>
          <div class="mb-3">
              {
                  for view.ancestors.iter().map(|ancestor| html! {
                      <>
                          <Badge text={ancestor.name.clone()} classes={ancestor.classes.clone()} />
                          { " › " }
                      </>
                  })
              }
              <Badge text={view.tag.name.clone()} classes={view.preview.badge.clone()} />
          </div>
          <div class="mb-2">
              <label for={PARENT_SELECT_ID} class="form-label">{ "Übergeordnete Kategorie" }</label>
              <select id={PARENT_SELECT_ID} ref={parent_ref} class="form-select">
                  {
                      for view.parent_options.iter().map(|option| html! {
                          <option
                              value={option.value.clone().unwrap_or_default()}
                              selected={option.selected}
                              disabled={option.disabled}
                          >
                              { option.label.clone() }
                          </option>
                      })
                  }
              </select>
          </div>
          <div class="mb-3">
              <label for={COLOR_SELECT_ID} class={classes!("form-label", class_names(&view.preview.label))}>
                  { "Farbe" }
              </label>
              <select
                  id={COLOR_SELECT_ID}
                  ref={color_ref}
                  class={classes!(class_names(&view.preview.select))}
                  onchange={on_color}
              >
                  {
                      for view.color_options.iter().map(|option| html! {
                          <option
                              value={option.key.clone()}
                              class={classes!(class_names(&option.classes))}
                              selected={option.selected}
                          >
                              { option.name.clone() }
                          </option>
                      })
                  }
              </select>
          </div>
          <div class="d-flex gap-2">
              <button type="submit" class="btn btn-primary">{ "Speichern" }</button>
              <button type="button" id={CANCEL_ID} class="btn btn-secondary" onclick={click_on(&props.on_element, CANCEL_ID)}>
                  { "Abbrechen" }
              </button>
          </div>
      </form>
  }
}
