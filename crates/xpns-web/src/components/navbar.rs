use xpns_core::views::{
  NAVBAR_ID,
  NavbarView
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

use super::click_on;

#[derive(Properties, PartialEq)]
pub struct NavbarProps {
  pub view:       NavbarView,
  pub on_element: Callback<String>
}

#[function_component(Navbar)]
pub fn navbar(
  props: &NavbarProps
) -> Html {
  let on_element = &props.on_element;

  html! {
      <nav id={NAVBAR_ID} class="navbar navbar-expand bg-body-tertiary mb-3 px-3">
          <ul class="navbar-nav me-auto">
              {
                  for props.view.items.iter().map(|item| html! {
                      <li class="nav-item">
                          <a
                              id={item.element_id.clone()}
                              href="#"
                              class={classes!("nav-link", item.active.then_some("active"))}
                              onclick={click_on(on_element, &item.element_id)}
                          >
                              { item.label }
                          </a>
                      </li>
                  })
              }
          </ul>
          <div class="btn-group">
              <button id="nav-prev" class="btn btn-outline-secondary" onclick={click_on(on_element, "nav-prev")}>
                  { "‹" }
              </button>
              <span class="btn btn-outline-secondary disabled">{ props.view.month_label.clone() }</span>
              <button id="nav-next" class="btn btn-outline-secondary" onclick={click_on(on_element, "nav-next")}>
                  { "›" }
              </button>
          </div>
      </nav>
  }
}
