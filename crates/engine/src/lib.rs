//! Labyrinth Engine - the authoritative game core
//!
//! One [`game::GameEngine`] per connected device, driven entirely by inbound
//! action messages and answering with ordered event lists. The transport,
//! persistence, and randomness are all injected at the edges.

pub mod api;
pub mod application;
pub mod game;
pub mod infrastructure;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod test_support;
