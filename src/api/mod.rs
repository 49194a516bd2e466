pub mod signaling_routes;
pub mod signaling_websocket;
