use xpns_core::views::CalendarView;
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
pub struct CalendarGridProps {
  pub view:       CalendarView,
  pub on_element: Callback<String>
}

#[function_component(CalendarGrid)]
pub fn calendar_grid(
  props: &CalendarGridProps
) -> Html {
  html! {
      <table class="table table-bordered calendar">
          <thead>
              <tr>
                  { for props.view.weekdays.iter().map(|day| html! { <th>{ day.clone() }</th> }) }
              </tr>
          </thead>
          <tbody>
              {
                  for props.view.weeks.iter().map(|week| html! {
                      <tr>
                          {
                              for week.iter().map(|cell| match cell {
                                  Some(day) => html! {
                                      <td
                                          id={day.element_id.clone()}
                                          class={classes!("calendar-day", day.today.then_some("today fw-bold"), day.selected.then_some("table-primary"))}
                                          onclick={click_on(&props.on_element, &day.element_id)}
                                      >
                                          <div class="fw-bold">{ day.day }</div>
                                          <div class="small text-end">{ day.total.clone().unwrap_or_default() }</div>
                                      </td>
                                  },
                                  None => html! { <td></td> },
                              })
                          }
                      </tr>
                  })
              }
          </tbody>
      </table>
  }
}
