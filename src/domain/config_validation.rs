//! Configuration validation.
//!
//! Runs before any filing is read so that a bad value fails fast with
//! a config error instead of silently falling back to a default.

use crate::domain::error::FilingscopeError;
use crate::ports::config_port::ConfigPort;

/// Checks the numeric `[source]` keys. `data_dir` is checked when a command
/// actually needs it, since it may come from the command line instead.
pub fn validate_source_config(config: &dyn ConfigPort) -> Result<(), FilingscopeError> {
    validate_count(config, "source", "cache_size")
}

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), FilingscopeError> {
    validate_count(config, "report", "top")?;
    validate_count(config, "report", "transaction_limit")
}

/// An optional key that, when present, must be a non-negative integer.
fn validate_count(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), FilingscopeError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(()),
        Ok(_) => Err(FilingscopeError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        }),
        Err(_) => Err(FilingscopeError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected an integer, got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn source_accepts_zero_cache() {
        assert!(validate_source_config(&config("[source]\ndata_dir = /f\ncache_size = 0\n")).is_ok());
        assert!(validate_source_config(&config("")).is_ok());
    }

    #[test]
    fn non_integer_cache_size_is_invalid() {
        let err =
            validate_source_config(&config("[source]\ndata_dir = /f\ncache_size = lots\n")).unwrap_err();
        assert!(matches!(err, FilingscopeError::ConfigInvalid { ref key, .. } if key == "cache_size"));
    }

    #[test]
    fn report_counts_must_be_non_negative_integers() {
        assert!(validate_report_config(&config("[report]\ntop = 10\ntransaction_limit = 5\n")).is_ok());
        assert!(validate_report_config(&config("")).is_ok());

        let err = validate_report_config(&config("[report]\ntop = ten\n")).unwrap_err();
        assert!(matches!(err, FilingscopeError::ConfigInvalid { ref key, .. } if key == "top"));

        let err = validate_report_config(&config("[report]\ntransaction_limit = -1\n")).unwrap_err();
        assert!(matches!(
            err,
            FilingscopeError::ConfigInvalid { ref key, .. } if key == "transaction_limit"
        ));
    }
}
