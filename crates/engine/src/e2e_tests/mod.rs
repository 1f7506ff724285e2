//! End-to-end flows through the engine's public dispatch surface.
//!
//! Every test drives real action ids and asserts on the emitted event
//! stream, with scripted dice and in-memory stores.

mod helpers;

mod combat_tests;
mod creation_tests;
mod dungeon_tests;
mod town_tests;
