//! Harness for driving the full engine through its public dispatch entry
//! point with scripted dice and in-memory stores.

use std::sync::Arc;

use labyrinth_domain::{
    Attribute, Attributes, Character, ContentTables, Difficulty, DieFormula, Monster, Weapon, Zone,
};
use labyrinth_shared::ServerMessage;

use crate::game::engine::{CombatMenu, Phase, Room};
use crate::game::GameEngine;
use crate::infrastructure::persistence::{MemoryLeaderboard, MemorySaveStore, UnconfiguredReviewSink};
use crate::test_support::SharedDice;

pub const DEVICE: &str = "device-e2e";

pub struct Harness {
    pub engine: GameEngine,
    pub dice: SharedDice,
    pub save_store: Arc<MemorySaveStore>,
    pub leaderboard: Arc<MemoryLeaderboard>,
}

impl Harness {
    pub fn new() -> Self {
        let dice = SharedDice::default();
        let save_store = Arc::new(MemorySaveStore::new());
        let leaderboard = Arc::new(MemoryLeaderboard::new());
        let engine = GameEngine::new(
            DEVICE,
            Arc::new(ContentTables::builtin()),
            save_store.clone(),
            leaderboard.clone(),
            Arc::new(UnconfiguredReviewSink),
            Box::new(dice.clone()),
        );
        Self {
            engine,
            dice,
            save_store,
            leaderboard,
        }
    }

    pub async fn act(&mut self, id: &str) -> Vec<ServerMessage> {
        self.engine.dispatch(id, None).await
    }

    pub async fn act_with(&mut self, id: &str, value: &str) -> Vec<ServerMessage> {
        self.engine.dispatch(id, Some(value.to_string())).await
    }

    /// A seasoned delver: STR 14, CON 12, WIS 17, the rest 10; a Short
    /// Sword equipped, 40 hp, 100 gold.
    pub fn install_hero(&mut self) {
        let mut attrs = Attributes::uniform(10);
        attrs.set(Attribute::Strength, 14);
        attrs.set(Attribute::Constitution, 12);
        attrs.set(Attribute::Wisdom, 17);
        let mut c = Character::new("Tess", Difficulty::Normal, DEVICE, attrs, 40, 100);
        let i = c.add_weapon(Weapon {
            name: "Short Sword".into(),
            damage_die: "1d8".into(),
            price: 25,
            damaged: false,
            labyrinth_drop: false,
        });
        c.equip_weapon(i).expect("valid index");
        self.engine.character = Some(c);
    }

    pub fn enter_town(&mut self) {
        self.engine.phase = Phase::Town;
    }

    /// Drop the hero straight into combat against a bestiary monster.
    /// Player aims torso, the monster guards its head, so zones never
    /// collide unless a test changes them.
    pub fn stage_combat(&mut self, monster_name: &str, depth: i32) {
        let content = ContentTables::builtin();
        let row = content
            .monsters
            .by_name(monster_name)
            .expect("bestiary monster");
        let die = DieFormula::parse(row.damage_die).expect("valid die");
        let monster = Monster::from_row(row, die);

        if let Some(c) = self.engine.character.as_mut() {
            c.combat.reset_for_combat();
        }
        self.engine.depth = depth;
        self.engine.room = Some(Room {
            monster_name: monster.name.clone(),
            chest_present: false,
            chest_opened: false,
            background: "stone_corridor".into(),
            cleared: false,
        });
        self.engine.monster = Some(monster);
        self.engine.phase = Phase::Combat;
        self.engine.combat_menu = CombatMenu::Main;
        self.engine.player_zone = Zone::Torso;
        self.engine.monster_block = Zone::Head;
    }

    pub fn character(&self) -> &Character {
        self.engine.character.as_ref().expect("character installed")
    }
}

/// All dialogue and combat-log text joined for containment asserts.
pub fn narrative(events: &[ServerMessage]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            ServerMessage::Dialogue { text } => Some(text.as_str()),
            ServerMessage::CombatUpdate { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Option ids of the last menu emitted.
pub fn menu_ids(events: &[ServerMessage]) -> Vec<String> {
    events
        .iter()
        .rev()
        .find_map(|e| match e {
            ServerMessage::Menu { options } => {
                Some(options.iter().map(|o| o.id.clone()).collect())
            }
            _ => None,
        })
        .unwrap_or_default()
}

/// The last HUD snapshot emitted, if any.
pub fn last_hud(events: &[ServerMessage]) -> Option<labyrinth_shared::HudSnapshot> {
    events.iter().rev().find_map(|e| match e {
        ServerMessage::UpdateStats { state } => Some(state.clone()),
        _ => None,
    })
}
