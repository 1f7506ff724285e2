//! Labyrinth Shared - the wire protocol between engine and renderer
//!
//! Intentionally free of business logic so the transport layer stays thin
//! and stable. The renderer is a passive consumer of [`ServerMessage`]s.

mod messages;

pub use messages::{ClientMessage, HudSnapshot, MenuOption, ServerMessage};
