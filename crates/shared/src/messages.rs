//! WebSocket protocol messages (Engine ↔ Renderer)
//!
//! Action ids stay plain strings on the wire (`"town:enter"`,
//! `"combat:aim:head"`); the engine parses them into its typed action sum
//! behind this boundary. Events are the engine's entire output language:
//! the renderer holds no game state of its own.

use serde::{Deserialize, Serialize};

/// Messages from the renderer to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Bind this connection to a device. The device id is the save key; it
    /// comes from the transport, not from gameplay.
    Join { device_id: String },
    /// A player action: a stable id plus an optional payload (free text for
    /// prompts).
    Action {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Heartbeat ping
    Heartbeat,
}

/// One selectable entry in a menu event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuOption {
    /// Action id sent back verbatim when chosen.
    pub id: String,
    pub label: String,
}

impl MenuOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The HUD snapshot delivered with every `update_stats` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudSnapshot {
    pub name: String,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: i32,
    pub xp: i32,
    pub xp_to_next_level: i32,
    pub depth: i32,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<String>,
    pub active_quests: i32,
}

/// Messages from the engine to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A line appended to the rolling narrative.
    Dialogue { text: String },
    /// Present a choice set; exactly one menu is active at a time.
    Menu { options: Vec<MenuOption> },
    /// Request free-text input (name entry and review text only).
    Prompt { id: String, label: String },
    /// Renderer pacing hint; informational.
    Pause,
    /// Set the active background. `None` resets the scene.
    Scene {
        background: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// Current HUD snapshot.
    UpdateStats { state: HudSnapshot },
    /// A combat log line, rendered apart from narrative dialogue.
    CombatUpdate { text: String },
    /// Reset renderer state: log, choices, and scene.
    Clear,
    /// Protocol-level failure (parse errors, unknown message types).
    Error { code: String, message: String },
    /// Heartbeat reply
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_shape() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"action","id":"town:enter"}"#).expect("parses");
        assert_eq!(
            msg,
            ClientMessage::Action {
                id: "town:enter".into(),
                value: None
            }
        );
    }

    #[test]
    fn test_prompt_payload_round_trip() {
        let msg = ClientMessage::Action {
            id: "prompt:submit".into(),
            value: Some("Ada".into()),
        };
        let json = serde_json::to_string(&msg).expect("serializes");
        let back: ClientMessage = serde_json::from_str(&json).expect("parses");
        assert_eq!(back, msg);
    }

    #[test]
    fn test_server_message_tags_are_snake_case() {
        let json = serde_json::to_string(&ServerMessage::UpdateStats {
            state: HudSnapshot::default(),
        })
        .expect("serializes");
        assert!(json.contains(r#""type":"update_stats""#));

        let json = serde_json::to_string(&ServerMessage::CombatUpdate {
            text: "A hit!".into(),
        })
        .expect("serializes");
        assert!(json.contains(r#""type":"combat_update""#));
    }

    #[test]
    fn test_scene_reset_serializes_null_background() {
        let json = serde_json::to_string(&ServerMessage::Scene {
            background: None,
            text: None,
        })
        .expect("serializes");
        assert!(json.contains(r#""background":null"#));
    }
}
