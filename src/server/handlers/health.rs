use crate::server::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use std::net::UdpSocket;

/// Liveness probe and landing response.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let channels = state.store.read_channels().await.len();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "channels": channels,
    }))
}

/// Advertise the LAN-reachable base address. A cast receiver cannot resolve
/// `localhost`, so the UI swaps in this address when casting.
pub async fn server_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "ip": local_ip(),
        "port": state.config.port,
    }))
}

/// Best-effort guess of the outbound interface address.
///
/// No packet is sent — connecting a UDP socket just asks the OS which
/// interface it would route through.
pub fn local_ip() -> String {
    let Ok(socket) = UdpSocket::bind("0.0.0.0:0") else {
        return "127.0.0.1".to_string();
    };
    if socket.connect("8.8.8.8:80").is_ok() {
        if let Ok(addr) = socket.local_addr() {
            return addr.ip().to_string();
        }
    }
    "127.0.0.1".to_string()
}
