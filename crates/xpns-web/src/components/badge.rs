use xpns_core::classes::ClassList;
use xpns_core::labels::Segment;
use yew::{
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct BadgeProps {
  pub text:    String,
  pub classes: ClassList
}

#[function_component(Badge)]
pub fn badge(
  props: &BadgeProps
) -> Html {
  html! {
      <span class={classes!(props.classes.iter().map(str::to_string).collect::<Vec<_>>())}>
          { props.text.clone() }
      </span>
  }
}

#[derive(Properties, PartialEq)]
pub struct DescriptionProps {
  pub segments: Vec<Segment>
}

/// Expense description with its `#Label`
/// markers drawn as badges.
#[function_component(Description)]
pub fn description(
  props: &DescriptionProps
) -> Html {
  html! {
      <>
          {
              for props.segments.iter().map(|segment| match segment {
                  Segment::Text(text) => html! { <>{ text.clone() }{ " " }</> },
                  Segment::Label(label) => html! {
                      <>
                          <Badge text={format!("#{}", label.name)} classes={label.classes.clone()} />
                          { " " }
                      </>
                  },
              })
          }
      </>
  }
}
