use axum::Router;
use std::net::SocketAddr;

/// Serve `app` on an ephemeral localhost port for the rest of the test.
pub async fn spawn_fixture(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture listener");
    let addr = listener.local_addr().expect("fixture address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fixture server");
    });
    addr
}
