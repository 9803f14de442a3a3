use countdown_core::ProgressRing;
use countdown_core::constants::{
    RING_RADIUS, RING_SETTLE_DELAY_MS, RING_TRANSITION_MS, RING_VIEWBOX,
};
use yew::prelude::*;

use crate::hooks::use_settled;

const GRADIENT_PREFIX: &str = "countdown-ring-gradient";

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub value: u64,
    pub max: u32,
    /// Distinguishes this ring's gradient from other rings on the page.
    #[prop_or(AttrValue::Static("ring"))]
    pub name: AttrValue,
    #[prop_or_default]
    pub children: Children,
}

/// SVG ring filled to `value / max`, easing toward each new value shortly
/// after it arrives.
#[function_component(CircularProgress)]
pub fn circular_progress(p: &Props) -> Html {
    let animated = use_settled(p.value, RING_SETTLE_DELAY_MS);
    let ring = ProgressRing::new(animated, p.max);
    let circumference = format!("{:.3}", ProgressRing::circumference());
    let offset = format!("{:.3}", ring.dash_offset());
    let center = (RING_VIEWBOX / 2).to_string();
    let radius = RING_RADIUS.to_string();
    let view_box = format!("0 0 {RING_VIEWBOX} {RING_VIEWBOX}");
    let gradient_id = format!("{GRADIENT_PREFIX}-{}", p.name);
    let style = format!(
        "transition-property: stroke-dashoffset, filter; transition-duration: {RING_TRANSITION_MS}ms; transition-timing-function: ease-in-out;"
    );

    html! {
        <div
            class="circular-progress"
            role="progressbar"
            aria-valuemin="0"
            aria-valuemax={p.max.to_string()}
            aria-valuenow={animated.to_string()}
        >
            <svg class="circular-progress__svg" viewBox={view_box}>
                <circle
                    class="circular-progress__track"
                    cx={center.clone()}
                    cy={center.clone()}
                    r={radius.clone()}
                    fill="none"
                />
                <circle
                    class="circular-progress__bar"
                    cx={center.clone()}
                    cy={center}
                    r={radius}
                    fill="none"
                    stroke={format!("url(#{gradient_id})")}
                    stroke-linecap="round"
                    stroke-dasharray={circumference}
                    stroke-dashoffset={offset}
                    style={style}
                />
                <defs>
                    <linearGradient id={gradient_id} x1="0%" y1="0%" x2="100%" y2="100%">
                        <stop offset="0%" class="circular-progress__stop circular-progress__stop--start" />
                        <stop offset="50%" class="circular-progress__stop circular-progress__stop--mid" />
                        <stop offset="100%" class="circular-progress__stop circular-progress__stop--end" />
                    </linearGradient>
                </defs>
            </svg>
            <div class="circular-progress__content">
                { for p.children.iter() }
            </div>
        </div>
    }
}
