use countdown_core::CountdownConfig;
use yew::prelude::*;

use crate::components::CountdownTimer;

#[derive(Properties, PartialEq, Clone, Default)]
pub struct AppProps {
    #[prop_or_default]
    pub config: CountdownConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let title = AttrValue::from(props.config.title.clone());
    html! {
        <main id="main" class="countdown-page">
            <CountdownTimer target={Some(props.config.target)} title={Some(title)} />
        </main>
    }
}
