use meteo_bolivia::error::Result;
use meteo_bolivia::{runner, Settings};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    setup_tracing();

    let result = Settings::load().and_then(|settings| runner::run(&settings));
    if let Err(e) = &result {
        error!(error = %e, "run failed");
    }
    result
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
