use std::env::VarError;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;
use anyhow::anyhow;

pub fn get_env_value_or_default<T, E>(key: &str, default: T) -> T
where
    T: FromStr<Err = E> + Display,
    E: Error + Send + Sync + 'static
{
    std::env::var(key)
        .map_err(|e| {
            log::warn!("no value was found for an optional environment variable {key}, using the default value {default}");
            anyhow!(e)
        })
        .and_then(|v| v.parse()
            .map_err(|e: E| {
                log::warn!("invalid value of the {key} environment variable, using the default value {default}");
                anyhow!(e)
            }))
        .unwrap_or(default)
}

/// Unset and empty variables are the same thing here.
pub(super) fn get_optional_env_string(key: &str) -> anyhow::Result<Option<String>> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(Some(value)),
        Ok(_) | Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(anyhow!("invalid value of the {key} environment variable: {e}")),
    }
}
