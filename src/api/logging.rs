use std::{net::SocketAddr, time::Instant};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

use crate::info;

/// Logs method, path, status, duration and remote address of each request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    // absent when the router is driven without a socket, e.g. in tests
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(request).await;

    info!(
        "request method={} path={} status={} duration={:?} remote={}",
        method,
        path,
        response.status().as_u16(),
        start.elapsed(),
        remote
    );

    response
}
