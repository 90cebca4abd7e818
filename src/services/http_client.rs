use crate::app::config::GatewayConfig;
use crate::error::{ConfigError, GatewayError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

/// Client compartilhado por todos os envios: timeout por tentativa e
/// cabeçalhos JSON/Bearer em cada requisição.
pub fn build_http_client(config: &GatewayConfig) -> Result<Client, GatewayError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
        ConfigError::InvalidValue {
            key: "api_key",
            value: "<redacted>".to_string(),
        }
    })?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .pool_max_idle_per_host(20) // Mantém conexões vivas entre pagamentos
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .build()?;

    Ok(client)
}
