//! Value parsers for CLI arguments.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

const MAX_ROLLBACK_STEPS: u32 = 100;
const MAX_TOKEN_HOURS: i64 = 24 * 30;

pub fn validate_port(port_str: &str) -> Result<u16, String> {
    match port_str.trim().parse::<u16>() {
        Ok(0) => Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )),
    }
}

/// The file must exist, be a regular file and be readable.
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

pub fn validate_rollback_steps(steps_str: &str) -> Result<u32, String> {
    let steps: u32 = steps_str.trim().parse().map_err(|_| {
        format!(
            "Rollback steps must be a valid positive number, got: '{}'",
            steps_str
        )
    })?;

    if !(1..=MAX_ROLLBACK_STEPS).contains(&steps) {
        return Err(format!(
            "Rollback steps must be between 1 and {}",
            MAX_ROLLBACK_STEPS
        ));
    }

    Ok(steps)
}

/// Accepts IP addresses and RFC 1123 style hostnames.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }

    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address format: '{}'", host_str));
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    let valid_labels = host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !valid_labels {
        return Err(format!("Invalid host name: '{}'", host_str));
    }

    Ok(host.to_string())
}

/// Phone numbers may contain spaces, dashes, dots, parentheses and a leading `+`.
pub fn validate_phone_target(target: &str) -> Result<String, String> {
    let trimmed = target.trim();
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();

    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')' | '+'));
    if !allowed || digits < 6 {
        return Err(format!("Not a phone number: '{}'", target));
    }

    Ok(trimmed.to_string())
}

pub fn validate_token_hours(hours_str: &str) -> Result<i64, String> {
    let hours: i64 = hours_str
        .trim()
        .parse()
        .map_err(|_| format!("Token lifetime must be a number of hours, got: '{}'", hours_str))?;

    if !(1..=MAX_TOKEN_HOURS).contains(&hours) {
        return Err(format!(
            "Token lifetime must be between 1 and {} hours",
            MAX_TOKEN_HOURS
        ));
    }

    Ok(hours)
}
