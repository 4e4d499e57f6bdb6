use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let addr: SocketAddr = "0.0.0.0:8081".parse().unwrap();
    mock_service::run(addr).await;
}
