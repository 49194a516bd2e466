use warp::Filter;

use super::signaling_websocket;
use crate::signaling::SignalingServer;

/// All HTTP and WebSocket routes, with permissive CORS for browser clients.
pub fn routes(
    server: SignalingServer,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST"]);

    signaling_websocket_route(server.clone())
        .or(health_check(server))
        .with(cors)
}

pub fn signaling_websocket_route(
    server: SignalingServer,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_server(server))
        .map(|ws: warp::ws::Ws, server: SignalingServer| {
            ws.on_upgrade(move |websocket| {
                signaling_websocket::handle_signaling_websocket(websocket, server)
            })
        })
}

pub fn health_check(
    server: SignalingServer,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_server(server))
        .then(|server: SignalingServer| async move {
            let stats = server.stats().await;
            warp::reply::json(&serde_json::json!({
                "status": "healthy",
                "service": "Classroom Signaling Server",
                "version": env!("CARGO_PKG_VERSION"),
                "connections": stats.connections,
                "rooms": stats.rooms,
            }))
        })
}

fn with_server(
    server: SignalingServer,
) -> impl Filter<Extract = (SignalingServer,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || server.clone())
}
