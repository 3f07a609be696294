/// Installs the global tracing subscriber. `RUST_LOG` controls the filter,
/// `LOG_FORMAT=json` switches to structured output.
pub fn init() {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "calorize=debug,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
