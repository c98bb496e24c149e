use crate::utils::error::{ConvertError, Result};
use std::fmt::Display;
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> ConvertError {
    ConvertError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("Invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, value, format!("Unsupported URL scheme: {}", scheme))),
    }
}

/// Download directory: may not exist yet, but must not be a regular file.
pub fn validate_output_dir(field: &str, dir: &str) -> Result<()> {
    if dir.trim().is_empty() {
        return Err(invalid(field, dir, "Directory cannot be empty"));
    }
    let path = Path::new(dir);
    if path.exists() && !path.is_dir() {
        return Err(invalid(field, dir, "Path exists and is not a directory"));
    }
    Ok(())
}

pub fn validate_at_least<T: PartialOrd + Display>(field: &str, value: T, min: T) -> Result<()> {
    if value < min {
        return Err(invalid(field, &value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty"));
    }
    Ok(())
}

pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(field, value, format!("Allowed values: {}", allowed.join(", "))));
    }
    Ok(())
}
