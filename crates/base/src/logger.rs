fn builder(default_filter: &str) -> env_logger::Builder {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    builder.format_timestamp_millis();
    builder
}

pub fn init_log() {
    init_log_with("info")
}

/// `RUST_LOG` still wins over `default_filter` when it is set.
pub fn init_log_with(default_filter: &str) {
    builder(default_filter).init();
}

pub fn init_log_test() {
    let _ = builder("info").is_test(true).try_init();
}
