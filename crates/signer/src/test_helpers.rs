//! # テスト用共通ヘルパー
//!
//! ブリッジサービス・チェーンプロバイダのモックサーバー。

use axum::http::StatusCode;
use axum::routing::post;
use axum::Json;

/// ルーターを `127.0.0.1` の空きポートで起動し、ベースURLを返す。
pub async fn start_mock_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}

/// `POST /prepareTransactionBlock` で固定のステータス・ボディを返すモックブリッジを起動する。
pub async fn start_mock_bridge(status: StatusCode, body: serde_json::Value) -> String {
    let app = axum::Router::new().route(
        "/prepareTransactionBlock",
        post(move |Json(_req): Json<serde_json::Value>| {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    start_mock_server(app).await
}

/// `POST /` で固定のJSON-RPCレスポンスを返すモックRPCを起動する。
pub async fn start_mock_rpc(body: serde_json::Value) -> String {
    let app = axum::Router::new().route(
        "/",
        post(move |Json(_req): Json<serde_json::Value>| {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    start_mock_server(app).await
}
