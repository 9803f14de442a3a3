use yew::prelude::*;

use crate::hooks::use_flip;

#[derive(Properties, PartialEq, Eq, Clone)]
pub struct Props {
    pub value: u64,
}

/// A digit that slides the old value out and the new one in on change.
#[function_component(FlipNumber)]
pub fn flip_number(p: &Props) -> Html {
    let view = use_flip(p.value);
    let animating = view.animating;
    let current = if animating { view.outgoing } else { p.value };

    let current_class = classes!(
        "flip-number__layer",
        "flip-number__layer--current",
        animating.then_some("is-leaving")
    );
    let next_class = classes!(
        "flip-number__layer",
        "flip-number__layer--next",
        animating.then_some("is-entering")
    );
    let glow_class = classes!("flip-number__glow", animating.then_some("is-active"));

    html! {
        <div class="flip-number" data-animating={animating.to_string()}>
            <div class={current_class}>
                <span class="flip-number__digit">{ current }</span>
            </div>
            <div class={next_class} aria-hidden="true">
                <span class="flip-number__digit">{ p.value }</span>
            </div>
            <div class={glow_class} aria-hidden="true" />
        </div>
    }
}
