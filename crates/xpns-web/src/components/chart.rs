use xpns_core::views::MonthChartView;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 200.0;

#[derive(Properties, PartialEq)]
pub struct MonthChartProps {
  pub view: MonthChartView
}

fn polyline(
  view: &MonthChartView
) -> String {
  let steps = view
    .points
    .len()
    .saturating_sub(1)
    .max(1) as f64;
  view
    .points
    .iter()
    .enumerate()
    .map(|(idx, point)| {
      let x = idx as f64 / steps * WIDTH;
      let y = if view.max > 0.0 {
        HEIGHT
          - point.cumulative / view.max
            * HEIGHT
      } else {
        HEIGHT
      };
      format!("{x:.1},{y:.1}")
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Running total over the days of the
/// month.
#[function_component(MonthChart)]
pub fn month_chart(
  props: &MonthChartProps
) -> Html {
  html! {
      <figure class="month-chart">
          <svg viewBox={format!("0 0 {WIDTH} {HEIGHT}")} width="100%" preserveAspectRatio="none">
              <polyline points={polyline(&props.view)} fill="none" stroke="currentColor" stroke-width="2" />
          </svg>
          <figcaption class="text-end">{ format!("Summe {}", props.view.total_label) }</figcaption>
      </figure>
  }
}

#[cfg(test)]
mod tests {
  use xpns_core::views::ChartPoint;

  use super::*;

  #[test]
  fn points_span_the_full_width() {
    let view = MonthChartView {
      month_label: "Oktober 2026"
        .to_string(),
      points:      vec![
        ChartPoint {
          day:        1,
          total:      10.0,
          cumulative: 10.0
        },
        ChartPoint {
          day:        2,
          total:      10.0,
          cumulative: 20.0
        },
      ],
      max:         20.0,
      total_label: "20,00".to_string()
    };

    assert_eq!(
      polyline(&view),
      "0.0,100.0 600.0,0.0"
    );
  }
}
