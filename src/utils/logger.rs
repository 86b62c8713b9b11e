use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "RUNKANG_LOG";

fn build_filter(verbose: bool, configured: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = if verbose {
        "debug"
    } else {
        configured.unwrap_or("info")
    };
    EnvFilter::new(format!("runkang_admin={},warn", level))
}

/// CLI 日誌：精簡文字格式
pub fn init_cli_logger(verbose: bool, configured_level: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose, configured_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

/// JSON 日誌，給 mock backend 或收集系統使用
pub fn init_json_logger(configured_level: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(false, configured_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .json(),
        )
        .try_init();
}
