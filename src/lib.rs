#[macro_use]
extern crate tracing;

mod app;
pub mod logging;

pub use app::App;
pub use logging::log_init;

/// Installs the `color_eyre` report and panic hooks. Must run before anything else in `main`.
pub fn init_errors() -> color_eyre::Result<()> {
    color_eyre::install()
}
