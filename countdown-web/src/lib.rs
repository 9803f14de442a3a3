#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod components;
pub mod config;
pub mod dom;
pub mod hooks;
pub mod scheduler;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let root = match dom::mount_root(config::MOUNT_ID) {
        Ok(root) => root,
        Err(err) => {
            dom::report_mount_failure(&err);
            return;
        }
    };
    let config = config::load_page_config(Some(&root));
    log::debug!("mounting countdown for {}", config.target);
    yew::Renderer::<app::App>::with_root_and_props(root, app::AppProps { config }).render();
}
