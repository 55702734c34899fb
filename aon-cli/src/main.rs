use tracing_subscriber::EnvFilter;

mod cmd;
mod io;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();
    aon::init();

    if let Err(err) = cmd::run() {
        eprintln!("ERROR: {:#}", err);
        std::process::exit(1);
    }
}

/// Reads the log filter from the environment, warnings only by default.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(aon::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn log_filter_comes_from_the_environment() {
        env::remove_var(aon::LOG_ENV);
        assert_eq!(log_filter().to_string(), "warn");

        env::set_var(aon::LOG_ENV, "aon=debug");
        assert_eq!(log_filter().to_string(), "aon=debug");

        env::set_var(aon::LOG_ENV, "aon=loud");
        assert_eq!(log_filter().to_string(), "warn");

        env::remove_var(aon::LOG_ENV);
    }
}
