//! Console logging for the browser build.

use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::Registry;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::prelude::*;

const DEFAULT_FILTER: &str = "info,akshar_editor_core=debug,akshar_editor_browser=debug";

/// Install the console subscriber. `filter` uses `EnvFilter` directive
/// syntax; `None` gives the default. Only the first call takes effect.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(filter: Option<String>) {
    console_error_panic_hook::set_once();

    let console_level = if cfg!(debug_assertions) {
        Level::TRACE
    } else {
        Level::INFO
    };
    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let filter = filter
        .as_deref()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let reg = Registry::default().with(filter).with(wasm_layer);
    let _ = set_global_default(reg);
}
