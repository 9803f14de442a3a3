use chrono::{DateTime, Utc};
use countdown_core::CountdownConfig;
use countdown_core::constants::DEFAULT_TITLE;
use yew::prelude::*;

use crate::components::circular_progress::CircularProgress;
use crate::components::flip_number::FlipNumber;
use crate::hooks::use_countdown;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// Instant to count down to; the documented default when absent.
    #[prop_or_default]
    pub target: Option<DateTime<Utc>>,
    #[prop_or_default]
    pub title: Option<AttrValue>,
}

/// Days, hours, minutes and seconds until the target, each in its own ring.
#[function_component(CountdownTimer)]
pub fn countdown_timer(p: &Props) -> Html {
    let target = *use_memo(p.target, |target| {
        target.unwrap_or_else(CountdownConfig::default_target)
    });
    let units = use_countdown(target);
    let title = p
        .title
        .clone()
        .unwrap_or_else(|| AttrValue::from(DEFAULT_TITLE));

    html! {
        <section class="countdown" aria-label={title.clone()}>
            <div class="countdown__aurora" aria-hidden="true" />
            <div class="countdown__content">
                <h1 class="countdown__title">{ title }</h1>
                <div class="countdown__units" role="timer" aria-live="polite">
                    { for units.iter().map(|unit| {
                        let label = unit.label.as_str();
                        html! {
                            <div class="countdown__unit" key={label} data-unit={label}>
                                <CircularProgress
                                    value={unit.value}
                                    max={unit.max}
                                    name={label.to_ascii_lowercase()}
                                >
                                    <FlipNumber value={unit.value} />
                                </CircularProgress>
                                <p class="countdown__label">{ label }</p>
                            </div>
                        }
                    }) }
                </div>
            </div>
        </section>
    }
}
