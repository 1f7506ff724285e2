//! Town-board quests
//!
//! Both kinds credit on kill; "collect" is flavor (the proof is taken from
//! the corpse). At most three quests run at once, enforced by the engine.

use serde::{Deserialize, Serialize};

/// Maximum simultaneous quests.
pub const QUEST_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestKind {
    Kill,
    Collect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    /// Monster name this quest tracks.
    pub target: String,
    pub kind: QuestKind,
    pub goal: i32,
    pub progress: i32,
    pub reward_gold: i32,
}

impl Quest {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.goal
    }

    pub fn describe(&self) -> String {
        let verb = match self.kind {
            QuestKind::Kill => "Slay",
            QuestKind::Collect => "Bring proof of",
        };
        format!(
            "{} {} ({}/{}) - {} gold",
            verb, self.target, self.progress, self.goal, self.reward_gold
        )
    }
}
