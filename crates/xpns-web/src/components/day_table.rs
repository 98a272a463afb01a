use xpns_core::views::DayExpensesView;
use xpns_core::views::day_expenses::START_NEW_ID;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

use super::{
  Description,
  click_on
};

#[derive(Properties, PartialEq)]
pub struct DayTableProps {
  pub view:       DayExpensesView,
  pub on_element: Callback<String>
}

#[function_component(DayTable)]
pub fn day_table(
  props: &DayTableProps
) -> Html {
  let view = &props.view;
  let on_element = &props.on_element;

  html! {
      <div class="day-expenses">
          <div class="d-flex justify-content-between align-items-center">
              <h5>{ view.heading.clone() }</h5>
              <button
                  id={START_NEW_ID}
                  class="btn btn-sm btn-primary"
                  title={format!("Neue Ausgabe am {}", view.day_label)}
                  onclick={click_on(on_element, START_NEW_ID)}
              >
                  { "Neu" }
              </button>
          </div>
          <table class="table table-hover table-sm">
              <tbody>
                  {
                      for view.rows.iter().map(|row| html! {
                          <tr
                              id={row.element_id.clone()}
                              class={classes!(row.selected.then_some("table-active"))}
                              onclick={click_on(on_element, &row.element_id)}
                          >
                              <td><Description segments={row.segments.clone()} /></td>
                              <td class="text-end">{ format!("{} {}", row.amount, row.currency) }</td>
                              <td class="text-end text-muted">{ row.converted.clone().unwrap_or_default() }</td>
                          </tr>
                      })
                  }
              </tbody>
              <tfoot>
                  <tr class="fw-bold">
                      <td>{ "Summe" }</td>
                      <td class="text-end" colspan="2">{ view.total.clone() }</td>
                  </tr>
              </tfoot>
          </table>
      </div>
  }
}
