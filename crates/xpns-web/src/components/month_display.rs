use xpns_core::shell::Action;
use xpns_core::views::{
  MainView,
  MonthArea
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

use super::{
  CalendarGrid,
  DayTable,
  ExpenseForm,
  MonthChart,
  OverviewTable,
  click_on
};

#[derive(Properties, PartialEq)]
pub struct MonthDisplayAreaProps {
  pub area:       MonthArea,
  pub on_element: Callback<String>,
  pub on_action:  Callback<Action>,
  pub on_caret:   Callback<Option<usize>>
}

#[function_component(MonthDisplayArea)]
pub fn month_display_area(
  props: &MonthDisplayAreaProps
) -> Html {
  let area = &props.area;
  let on_element = &props.on_element;

  let main = match &area.main {
    | MainView::Overview(view) => {
      html! {
          <OverviewTable view={view.clone()} on_element={on_element.clone()} />
      }
    }
    | MainView::Calendar(view) => {
      html! {
          <CalendarGrid view={view.clone()} on_element={on_element.clone()} />
      }
    }
    | MainView::Chart(view) => {
      html! { <MonthChart view={view.clone()} /> }
    }
  };

  html! {
      <div class="row g-3">
          <div class="col-lg-7">
              <ul class="nav nav-tabs mb-2">
                  {
                      for area.tabs.iter().map(|tab| html! {
                          <li class="nav-item">
                              <a
                                  id={tab.element_id.clone()}
                                  href="#"
                                  class={classes!("nav-link", tab.active.then_some("active"))}
                                  onclick={click_on(on_element, &tab.element_id)}
                              >
                                  <i class={classes!("bi", tab.icon)}></i>
                                  { " " }
                                  { tab.label }
                              </a>
                          </li>
                      })
                  }
              </ul>
              { main }
          </div>
          <div class="col-lg-5">
              <DayTable view={area.day_table.clone()} on_element={on_element.clone()} />
              {
                  match area.form.clone() {
                      Some(form) => html! {
                          <ExpenseForm
                              {form}
                              on_element={on_element.clone()}
                              on_action={props.on_action.clone()}
                              on_caret={props.on_caret.clone()}
                          />
                      },
                      None => html! {},
                  }
              }
          </div>
      </div>
  }
}
