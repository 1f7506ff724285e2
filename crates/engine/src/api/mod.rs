//! Transport layer - the WebSocket boundary

pub mod websocket;

pub use websocket::ws_handler;
