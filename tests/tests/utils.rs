use std::net::SocketAddr;
use std::sync::OnceLock;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();
    ONCE_LOCK.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("barrage=debug,mock_service=debug")
            .try_init();
    });
}

/// Spawns a fresh mock service on an ephemeral port. One per test: each
/// `#[tokio::test]` has its own runtime, so a shared server would die with
/// the first test that finishes.
#[allow(unused)]
pub async fn spawn_mock() -> SocketAddr {
    let (addr, serve) = mock_service::bind("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    tokio::spawn(serve);
    addr
}

/// Spawns the benchmark API on an ephemeral port.
#[allow(unused)]
pub async fn spawn_api() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, barrage_server::app()).await.unwrap();
    });
    addr
}
