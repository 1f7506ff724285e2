//! Ordered event emission
//!
//! Every phase handler appends to one of these and the session host ships
//! the list in order. Within a handler the sequence is deterministic:
//! dialogue first, then pause, then menu or prompt, then the HUD update,
//! optionally a scene.

use labyrinth_shared::{HudSnapshot, MenuOption, ServerMessage};

#[derive(Debug, Default)]
pub struct Events {
    out: Vec<ServerMessage>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, text: impl Into<String>) {
        self.out.push(ServerMessage::Dialogue { text: text.into() });
    }

    pub fn pause(&mut self) {
        self.out.push(ServerMessage::Pause);
    }

    pub fn menu(&mut self, options: Vec<MenuOption>) {
        self.out.push(ServerMessage::Menu { options });
    }

    /// A single-entry Continue menu closing a result page.
    pub fn continue_menu(&mut self, id: &str, label: &str) {
        self.menu(vec![MenuOption::new(id, label)]);
    }

    pub fn prompt(&mut self, id: impl Into<String>, label: impl Into<String>) {
        self.out.push(ServerMessage::Prompt {
            id: id.into(),
            label: label.into(),
        });
    }

    pub fn stats(&mut self, state: HudSnapshot) {
        self.out.push(ServerMessage::UpdateStats { state });
    }

    pub fn combat(&mut self, text: impl Into<String>) {
        self.out.push(ServerMessage::CombatUpdate { text: text.into() });
    }

    pub fn scene(&mut self, background: Option<&str>) {
        self.out.push(ServerMessage::Scene {
            background: background.map(str::to_string),
            text: None,
        });
    }

    pub fn clear(&mut self) {
        self.out.push(ServerMessage::Clear);
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn into_vec(self) -> Vec<ServerMessage> {
        self.out
    }
}
