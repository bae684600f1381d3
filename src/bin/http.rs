#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;

    use schedule_normalizer::{NormalizerConfig, ScheduleParser, http_api};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr: SocketAddr = std::env::var(http_api::ENV_HTTP_ADDR)
        .unwrap_or_else(|_| http_api::DEFAULT_HTTP_ADDR.to_string())
        .parse()?;

    let config = NormalizerConfig::resolve(None)?;
    http_api::serve(addr, ScheduleParser::new(config)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
