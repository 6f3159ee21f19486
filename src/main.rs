use std::env;

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("buzzer=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {err}");
    }
}

fn main() {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    std::process::exit(buzzer::cli::run_with_args(&args));
}
