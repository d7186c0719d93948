use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent on every outbound request
pub static USER_AGENT: LazyLock<String> =
    LazyLock::new(|| format!("kelurahan-rs/{}", crate::pkg_version()));

/// Global HTTP client instance
///
/// Initialized lazily on first access and reused across the application so
/// TCP/TLS connections to the gateway are pooled. The 30s client timeout is an
/// upper bound; integrations set a tighter per-request timeout.
///
/// # Example
/// ```ignore
/// use crate::external::client::HTTP_CLIENT;
///
/// let response = HTTP_CLIENT
///     .post("https://api.fonnte.com/send")
///     .timeout(Duration::from_secs(10))
///     .json(&body)
///     .send()
///     .await?;
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .use_rustls_tls()
        .user_agent(USER_AGENT.as_str())
        .build()
        .expect("Failed to build HTTP client")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_initialization() {
        let _ = &*HTTP_CLIENT;
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("kelurahan-rs/"));
        assert!(USER_AGENT.ends_with(crate::pkg_version()));
    }
}
