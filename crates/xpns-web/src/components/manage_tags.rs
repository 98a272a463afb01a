use web_sys::HtmlInputElement;
use xpns_core::shell::Action;
use xpns_core::tag_editor::TAG_CONTAINER_ID;
use xpns_core::views::ManageTagsView;
use xpns_core::views::manage_tags::NEW_TAG_INPUT_ID;
use yew::{
  Callback,
  Html,
  Properties,
  SubmitEvent,
  classes,
  function_component,
  html,
  use_node_ref
};

use super::{
  Badge,
  TagForm,
  click_on
};

#[derive(Properties, PartialEq)]
pub struct ManageTagsProps {
  pub view:       ManageTagsView,
  pub on_element: Callback<String>,
  pub on_action:  Callback<Action>
}

#[function_component(ManageTags)]
pub fn manage_tags(
  props: &ManageTagsProps
) -> Html {
  let view = &props.view;
  let name_ref = use_node_ref();

  let on_new_tag = {
    let on_action =
      props.on_action.clone();
    let name_ref = name_ref.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        let name = name_ref
          .cast::<HtmlInputElement>()
          .map(|input| input.value())
          .unwrap_or_default();
        on_action.emit(
          Action::StartTagEdit(name)
        );
      }
    )
  };

  html! {
      <div class="row g-3">
          <div class="col-md-5">
              <ul id={TAG_CONTAINER_ID} class="list-group">
                  {
                      for view.rows.iter().map(|row| html! {
                          <li
                              id={row.element_id.clone()}
                              class={classes!("list-group-item", "list-group-item-action", row.editing.then_some("active"))}
                              style={format!("padding-left: {}rem", 1.0 + row.depth as f32 * 1.5)}
                              onclick={click_on(&props.on_element, &row.element_id)}
                          >
                              <Badge text={row.name.clone()} classes={row.badge.clone()} />
                          </li>
                      })
                  }
              </ul>
              <form class="input-group mt-2" onsubmit={on_new_tag}>
                  <input
                      id={NEW_TAG_INPUT_ID}
                      ref={name_ref}
                      type="text"
                      class="form-control"
                      placeholder="Neue Kategorie"
                  />
                  <button type="submit" class="btn btn-outline-primary">{ "Anlegen" }</button>
              </form>
          </div>
          <div class="col-md-7">
              {
                  match (&view.editor, &view.editor_error) {
                      (Some(editor), _) => html! {
                          <TagForm
                              view={editor.clone()}
                              on_element={props.on_element.clone()}
                              on_action={props.on_action.clone()}
                          />
                      },
                      (None, Some(err)) => html! {
                          <div class="alert alert-warning">{ err.clone() }</div>
                      },
                      (None, None) => html! {},
                  }
              }
          </div>
      </div>
  }
}
