use env_logger::{Builder, Env};
use log::LevelFilter;

/// Filter applied when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger for the runner.
///
/// `RUST_LOG` wins over `--verbose`. A second call leaves the first logger in place.
pub(crate) fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose).to_string());
    let _ = Builder::from_env(env).format_timestamp(None).try_init();
}
