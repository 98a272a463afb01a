use xpns_core::shell::Action;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct AlertBoxProps {
  pub message:   String,
  pub on_action: Callback<Action>
}

#[function_component(AlertBox)]
pub fn alert_box(
  props: &AlertBoxProps
) -> Html {
  let on_action =
    props.on_action.clone();
  let dismiss = Callback::from(
    move |_: MouseEvent| {
      on_action
        .emit(Action::DismissAlert)
    }
  );

  html! {
      <div class="alert alert-danger alert-dismissible" role="alert">
          { props.message.clone() }
          <button type="button" class="btn-close" onclick={dismiss}></button>
      </div>
  }
}
