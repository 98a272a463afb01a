mod alert;
mod badge;
mod calendar;
mod chart;
mod day_table;
mod expense_form;
mod manage_tags;
mod month_display;
mod navbar;
mod overview;
mod tag_form;

pub use alert::AlertBox;
pub use badge::{
  Badge,
  Description
};
pub use calendar::CalendarGrid;
pub use chart::MonthChart;
pub use day_table::DayTable;
pub use expense_form::ExpenseForm;
pub use manage_tags::ManageTags;
pub use month_display::MonthDisplayArea;
pub use navbar::Navbar;
pub use overview::OverviewTable;
pub use tag_form::TagForm;
use yew::{
  Callback,
  MouseEvent
};

/// Click handler forwarding `element_id`
/// to the app's binding lookup.
pub fn click_on(
  on_element: &Callback<String>,
  element_id: &str
) -> Callback<MouseEvent> {
  let on_element = on_element.clone();
  let element_id =
    element_id.to_string();
  Callback::from(
    move |_: MouseEvent| {
      on_element
        .emit(element_id.clone())
    }
  )
}
