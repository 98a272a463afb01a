use xpns_core::views::OverviewView;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::{
  Badge,
  click_on
};

#[derive(Properties, PartialEq)]
pub struct OverviewTableProps {
  pub view:       OverviewView,
  pub on_element: Callback<String>
}

#[function_component(OverviewTable)]
pub fn overview_table(
  props: &OverviewTableProps
) -> Html {
  let view = &props.view;

  html! {
      <table class="table table-sm">
          <tbody>
              {
                  for view.rows.iter().filter(|row| row.visible).map(|row| {
                      let toggle = if row.has_children {
                          html! {
                              <button
                                  id={row.path_id.clone()}
                                  class="btn btn-link btn-sm p-0 me-1"
                                  onclick={click_on(&props.on_element, &row.path_id)}
                              >
                                  { if row.expanded { "▾" } else { "▸" } }
                              </button>
                          }
                      } else {
                          html! {}
                      };
                      html! {
                          <tr>
                              <td style={format!("padding-left: {}rem", row.depth as f32 * 1.5)}>
                                  { toggle }
                                  <Badge text={row.name.clone()} classes={row.badge.clone()} />
                              </td>
                              <td class="text-end">{ row.total_label.clone() }</td>
                          </tr>
                      }
                  })
              }
              <tr class="text-muted">
                  <td>{ "(ohne Kategorie)" }</td>
                  <td class="text-end">{ view.untagged_label.clone() }</td>
              </tr>
              <tr class="fw-bold">
                  <td>{ "Summe" }</td>
                  <td class="text-end">{ view.total_label.clone() }</td>
              </tr>
          </tbody>
      </table>
  }
}
