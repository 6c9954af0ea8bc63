use std::{fs, path::Path, sync::Mutex};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Filter directive for `level`. A bare level applies to our crates only;
/// anything that already looks like a directive is used as is.
fn directive(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("pennywise_tui={level},engine={level}")
}

/// Sends events to the configured log file. The terminal owns stdout.
pub fn init(config: &AppConfig) -> Result<()> {
    let path = Path::new(&config.log_file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(directive(&config.log_level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_targets_own_crates() {
        assert_eq!(directive("debug"), "pennywise_tui=debug,engine=debug");
        assert_eq!(directive("warn,engine=trace"), "warn,engine=trace");
    }
}
