//! The phase state machine
//!
//! `GameEngine` owns every piece of session state and routes each inbound
//! action to the current phase's handler. Handlers mutate state and append
//! to an ordered event list; the session host ships the list outbound. At
//! most one persistence call happens per handler, awaited under the
//! session lock.

use std::collections::HashSet;
use std::sync::Arc;

use labyrinth_domain::{
    Attribute, Character, ContentTables, DiceSource, Difficulty, Monster, Quest, Zone,
};
use labyrinth_shared::{HudSnapshot, MenuOption, ServerMessage};

use crate::application::ports::{Leaderboard, ReviewSink, SaveStore};
use crate::game::action::Action;
use crate::game::events::Events;

/// Where the state machine currently sits. Sub-pages of town are their own
/// phases; transient choice context (shop page, gamble stake, combat
/// submenu) lives in dedicated fields instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    MainMenu,
    ReviewRating,
    ReviewText,
    SelectDifficulty,
    Intro,
    CreateName,
    CreateAttributes,
    Town,
    TrainMenu,
    LevelMenu,
    Inventory,
    CompanionMenu,
    Smithy,
    Temple,
    Shop,
    QuestBoard,
    Gamble,
    Labyrinth,
    Combat,
    /// Between the lethal blow and the revival roll.
    Death,
    Victory,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopPage {
    Front,
    Weapons,
    Armor,
    Potions,
    Spells,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleKind {
    Weapon,
    Armor,
    Ring,
}

/// An offer the player still has to confirm.
#[derive(Debug, Clone, Copy)]
pub struct PendingSale {
    pub kind: SaleKind,
    pub index: usize,
    pub offer: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GambleMode {
    Exact,
    Range,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GambleState {
    pub mode: Option<GambleMode>,
    pub stake: Option<i32>,
}

/// Creation progress: one rolled value at a time, placed before the next
/// is rolled.
#[derive(Debug, Clone)]
pub struct CreationState {
    pub name: String,
    pub difficulty: Difficulty,
    pub pending_roll: Option<i32>,
    pub assigned: Vec<(Attribute, i32)>,
}

impl CreationState {
    pub fn unfilled(&self) -> Vec<Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(|a| !self.assigned.iter().any(|(b, _)| b == a))
            .collect()
    }
}

/// The room the player currently stands in. Ephemeral: replaced on every
/// descent, dropped when the player flees or teleports out.
#[derive(Debug, Clone)]
pub struct Room {
    pub monster_name: String,
    pub chest_present: bool,
    pub chest_opened: bool,
    pub background: String,
    /// True once the monster is dead or charmed away; gates the chest.
    pub cleared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatMenu {
    Main,
    Aim,
    Potion,
    Spell,
    LightningPower,
}

pub struct GameEngine {
    pub(crate) device_id: String,
    pub(crate) content: Arc<ContentTables>,
    pub(crate) dice: Box<dyn DiceSource>,
    pub(crate) save_store: Arc<dyn SaveStore>,
    pub(crate) leaderboard: Arc<dyn Leaderboard>,
    pub(crate) review_sink: Arc<dyn ReviewSink>,

    pub(crate) phase: Phase,
    pub(crate) character: Option<Character>,
    /// Current labyrinth level; 0 while the character has yet to descend.
    pub(crate) depth: i32,
    /// Monsters engaged so far; the 50th is always the Dragon.
    pub(crate) encounter_count: i32,
    pub(crate) room: Option<Room>,
    pub(crate) monster: Option<Monster>,

    pub(crate) creation: Option<CreationState>,
    pub(crate) chosen_difficulty: Option<Difficulty>,
    pub(crate) shop_page: ShopPage,
    pub(crate) pending_sale: Option<PendingSale>,
    pub(crate) gamble: GambleState,
    pub(crate) quest_offer: Option<Quest>,
    pub(crate) review_rating: Option<u8>,
    /// Where the next `*:continue` goes. `None` re-renders the phase.
    pub(crate) continue_to: Option<Phase>,
    pub(crate) player_zone: Zone,
    pub(crate) monster_block: Zone,
    pub(crate) combat_menu: CombatMenu,

    dialogue_miss_logged: HashSet<String>,
}

impl GameEngine {
    pub fn new(
        device_id: impl Into<String>,
        content: Arc<ContentTables>,
        save_store: Arc<dyn SaveStore>,
        leaderboard: Arc<dyn Leaderboard>,
        review_sink: Arc<dyn ReviewSink>,
        dice: Box<dyn DiceSource>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            content,
            dice,
            save_store,
            leaderboard,
            review_sink,
            phase: Phase::MainMenu,
            character: None,
            depth: 0,
            encounter_count: 0,
            room: None,
            monster: None,
            creation: None,
            chosen_difficulty: None,
            shop_page: ShopPage::Front,
            pending_sale: None,
            gamble: GambleState::default(),
            quest_offer: None,
            review_rating: None,
            continue_to: None,
            player_zone: Zone::default(),
            monster_block: Zone::default(),
            combat_menu: CombatMenu::Main,
            dialogue_miss_logged: HashSet::new(),
        }
    }

    /// First events after a device joins: title screen and main menu.
    pub async fn welcome(&mut self) -> Vec<ServerMessage> {
        let mut ev = Events::new();
        ev.clear();
        ev.scene(Some("title"));
        self.say_line(&mut ev, "menu.welcome", &[]);
        ev.pause();
        self.render_main_menu(&mut ev).await;
        ev.into_vec()
    }

    /// Route one inbound action through the current phase handler.
    pub async fn dispatch(&mut self, id: &str, value: Option<String>) -> Vec<ServerMessage> {
        let action = Action::parse(id, value);
        tracing::debug!(device = %self.device_id, phase = ?self.phase, action = %id, "Dispatching action");

        let mut ev = Events::new();
        match self.phase {
            Phase::MainMenu | Phase::ReviewRating | Phase::ReviewText => {
                self.handle_main_menu(action, &mut ev).await
            }
            Phase::SelectDifficulty | Phase::Intro | Phase::CreateName | Phase::CreateAttributes => {
                self.handle_creation(action, &mut ev).await
            }
            Phase::Town
            | Phase::TrainMenu
            | Phase::LevelMenu
            | Phase::Inventory
            | Phase::CompanionMenu
            | Phase::Smithy
            | Phase::Temple => self.handle_town(action, &mut ev).await,
            Phase::Shop => self.handle_shop(action, &mut ev).await,
            Phase::QuestBoard => self.handle_quest_board(action, &mut ev).await,
            Phase::Gamble => self.handle_gamble(action, &mut ev).await,
            Phase::Labyrinth => self.handle_labyrinth(action, &mut ev).await,
            Phase::Combat => self.handle_combat(action, &mut ev).await,
            Phase::Death => self.handle_death(action, &mut ev).await,
            Phase::Victory => self.handle_victory(action, &mut ev).await,
            Phase::GameOver => self.handle_game_over(action, &mut ev).await,
        }
        ev.into_vec()
    }

    // ------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------

    /// Emit a dialogue line from the content table, substituting context
    /// fields. Missing keys fall back and are logged once per key.
    pub(crate) fn say_line(&mut self, ev: &mut Events, key: &str, ctx: &[(&str, &str)]) {
        use labyrinth_domain::content::{DialogueTable, FALLBACK_LINE};
        match self.content.dialogue.get(key) {
            Some(template) => ev.say(DialogueTable::render(template, ctx)),
            None => {
                if self.dialogue_miss_logged.insert(key.to_string()) {
                    tracing::warn!(key, "Dialogue key missing, substituting fallback");
                }
                ev.say(FALLBACK_LINE);
            }
        }
    }

    pub(crate) fn hud(&self) -> HudSnapshot {
        match &self.character {
            Some(c) => HudSnapshot {
                name: c.name.clone(),
                level: c.level,
                hp: c.hp,
                max_hp: c.max_hp,
                gold: c.gold,
                xp: c.xp,
                xp_to_next_level: c.xp_to_next_level(),
                depth: self.depth,
                difficulty: c.difficulty.label().to_string(),
                weapon: c.equipped_weapon().map(|w| w.name.clone()),
                armor: c.equipped_armor().map(|a| a.name.clone()),
                active_quests: c.quests.len() as i32,
            },
            None => HudSnapshot::default(),
        }
    }

    pub(crate) fn push_stats(&self, ev: &mut Events) {
        ev.stats(self.hud());
    }

    /// Invalid action for the phase: log, leave state untouched, re-emit
    /// the current menu.
    pub(crate) async fn ignore_and_rerender(&mut self, ev: &mut Events) {
        tracing::debug!(phase = ?self.phase, "Ignoring action invalid for phase");
        let phase = self.phase;
        self.enter_phase(phase, ev).await;
    }

    /// Generic `*:continue`: advance to the stored target, or re-render.
    pub(crate) async fn advance(&mut self, ev: &mut Events) {
        let target = self.continue_to.take().unwrap_or(self.phase);
        self.enter_phase(target, ev).await;
    }

    /// Render a phase's entry menu and make it current.
    pub(crate) async fn enter_phase(&mut self, phase: Phase, ev: &mut Events) {
        self.phase = phase;
        match phase {
            Phase::MainMenu => self.render_main_menu(ev).await,
            Phase::ReviewRating => self.render_review_rating(ev),
            Phase::ReviewText => ev.prompt("review", "Your words for the chronicle"),
            Phase::SelectDifficulty => self.render_difficulty_menu(ev),
            Phase::Intro => self.render_intro(ev),
            Phase::CreateName => ev.prompt("name", "What is your name?"),
            Phase::CreateAttributes => self.render_creation_menu(ev),
            Phase::Town => self.render_town_menu(ev),
            Phase::TrainMenu => self.render_train_menu(ev),
            Phase::LevelMenu => self.render_level_menu(ev),
            Phase::Inventory => self.render_inventory(ev),
            Phase::CompanionMenu => self.render_companion_menu(ev),
            Phase::Smithy => self.render_smithy(ev),
            Phase::Temple => self.render_temple(ev),
            Phase::Shop => self.render_shop(ev),
            Phase::QuestBoard => self.render_quest_board(ev),
            Phase::Gamble => self.render_gamble(ev),
            Phase::Labyrinth => self.render_labyrinth_menu(ev),
            Phase::Combat => self.render_combat_menu(ev),
            Phase::Death => ev.continue_menu("death:continue", "Face the darkness"),
            Phase::Victory => ev.continue_menu("victory:continue", "Continue"),
            Phase::GameOver => ev.continue_menu("gameover:continue", "Continue"),
        }
    }

    /// Town arrival from outside (creation, labyrinth, revival, load):
    /// resets the per-visit services and paints the scene.
    pub(crate) fn arrive_in_town(&mut self, ev: &mut Events) {
        if let Some(c) = self.character.as_mut() {
            c.town_flags.reset();
        }
        ev.scene(Some("town_square"));
        self.say_line(ev, "town.welcome", &[]);
        ev.pause();
        self.phase = Phase::Town;
        self.render_town_menu(ev);
        self.push_stats(ev);
    }

    /// A result page: lines already emitted; pause, offer Continue to
    /// `target`, refresh the HUD.
    pub(crate) fn result_page(&mut self, ev: &mut Events, target: Phase) {
        ev.pause();
        ev.continue_menu("page:continue", "Continue");
        self.continue_to = Some(target);
        self.push_stats(ev);
    }

    // ------------------------------------------------------------------
    // Main menu and review flow
    // ------------------------------------------------------------------

    pub(crate) async fn render_main_menu(&mut self, ev: &mut Events) {
        self.phase = Phase::MainMenu;
        let has_save = match self.save_store.load(&self.device_id).await {
            Ok(record) => record.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "Save store unavailable while rendering main menu");
                false
            }
        };

        let mut options = vec![MenuOption::new("main:new_game", "New game")];
        if has_save {
            options.push(MenuOption::new("main:continue_save", "Continue your run"));
        }
        options.push(MenuOption::new("main:leaderboard", "Hall of dragonslayers"));
        options.push(MenuOption::new("main:review", "Leave a review"));
        options.push(MenuOption::new("main:quit", "Quit"));
        ev.menu(options);
    }

    fn render_review_rating(&mut self, ev: &mut Events) {
        self.continue_to = Some(Phase::MainMenu);
        let mut options: Vec<MenuOption> = (1..=5)
            .map(|n| MenuOption::new(format!("review:rate:{}", n), format!("{} star{}", n, if n == 1 { "" } else { "s" })))
            .collect();
        options.push(MenuOption::new("review:back:continue", "Back"));
        ev.menu(options);
    }

    async fn handle_main_menu(&mut self, action: Action, ev: &mut Events) {
        use crate::game::action::MainAction;

        match (self.phase, action) {
            (_, Action::Continue) => self.advance(ev).await,

            (Phase::MainMenu, Action::Main(MainAction::NewGame)) => {
                self.character = None;
                self.creation = None;
                self.chosen_difficulty = None;
                self.enter_phase(Phase::SelectDifficulty, ev).await;
            }

            (Phase::MainMenu, Action::Main(MainAction::ContinueSave)) => {
                self.load_save(ev).await;
            }

            (Phase::MainMenu, Action::Main(MainAction::Leaderboard)) => {
                self.show_leaderboard(ev).await;
            }

            (Phase::MainMenu, Action::Main(MainAction::Review)) => {
                self.review_rating = None;
                self.enter_phase(Phase::ReviewRating, ev).await;
            }

            (Phase::MainMenu, Action::Main(MainAction::Quit)) => {
                self.say_line(ev, "menu.farewell", &[]);
                ev.pause();
                self.render_main_menu(ev).await;
            }

            (Phase::ReviewRating, Action::ReviewRate(rating)) => {
                self.review_rating = Some(rating);
                self.enter_phase(Phase::ReviewText, ev).await;
            }

            (Phase::ReviewText, Action::PromptSubmit(text)) => {
                self.submit_review(text.unwrap_or_default(), ev).await;
            }

            _ => self.ignore_and_rerender(ev).await,
        }
    }

    async fn load_save(&mut self, ev: &mut Events) {
        match self.save_store.load(&self.device_id).await {
            Ok(Some(record)) => match Character::from_record(record) {
                Ok(character) => {
                    tracing::info!(name = %character.name, "Save loaded");
                    // The engagement counter is rebuilt from defeats so the
                    // 50th-monster Dragon stays on schedule across loads.
                    self.encounter_count = character.stats.monsters_defeated;
                    self.depth = 0;
                    self.room = None;
                    self.monster = None;
                    ev.clear();
                    ev.say(format!("Welcome back, {}.", character.name));
                    self.character = Some(character);
                    self.arrive_in_town(ev);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Save record is unreadable");
                    ev.say("The chronicle of your past run is illegible.");
                    self.render_main_menu(ev).await;
                }
            },
            Ok(None) => {
                ev.say("No saved run for this device.");
                self.render_main_menu(ev).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Save load failed");
                ev.say("The archive is unreachable. Try again later.");
                self.render_main_menu(ev).await;
            }
        }
    }

    async fn show_leaderboard(&mut self, ev: &mut Events) {
        match self.leaderboard.recent(10).await {
            Ok(entries) if entries.is_empty() => {
                ev.say("No one has slain the Dragon. The hall stands empty.");
            }
            Ok(entries) => {
                ev.say("Hall of dragonslayers:");
                for e in entries {
                    ev.say(format!(
                        "  {} - level {} ({}), {} monsters, {} gold earned - {}",
                        e.name,
                        e.level,
                        e.difficulty,
                        e.monsters_defeated,
                        e.gold_earned,
                        e.date.format("%Y-%m-%d"),
                    ));
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Leaderboard read failed");
                ev.say("The hall's ledger is missing.");
            }
        }
        ev.pause();
        ev.continue_menu("page:continue", "Continue");
        self.continue_to = Some(Phase::MainMenu);
    }

    async fn submit_review(&mut self, text: String, ev: &mut Events) {
        const MAX_REVIEW_CHARS: usize = 2000;
        let rating = self.review_rating.take().unwrap_or(3);
        let text: String = text.chars().take(MAX_REVIEW_CHARS).collect();

        match self.review_sink.submit(rating, &text, &self.device_id).await {
            Ok(()) => self.say_line(ev, "review.thanks", &[]),
            Err(e) => {
                tracing::warn!(error = %e, "Review submission failed");
                ev.say(format!("The chronicle refuses your words: {}", e));
            }
        }
        ev.pause();
        ev.continue_menu("page:continue", "Continue");
        self.continue_to = Some(Phase::MainMenu);
    }

    // ------------------------------------------------------------------
    // Post-combat terminal phases
    // ------------------------------------------------------------------

    async fn handle_victory(&mut self, action: Action, ev: &mut Events) {
        match action {
            Action::Continue => {
                self.commit_victory(ev).await;
                self.character = None;
                self.room = None;
                self.monster = None;
                self.depth = 0;
                self.encounter_count = 0;
                ev.clear();
                ev.scene(Some("title"));
                self.render_main_menu(ev).await;
            }
            _ => self.ignore_and_rerender(ev).await,
        }
    }

    async fn handle_game_over(&mut self, action: Action, ev: &mut Events) {
        match action {
            Action::Continue => {
                ev.clear();
                ev.scene(Some("title"));
                self.render_main_menu(ev).await;
            }
            _ => self.ignore_and_rerender(ev).await,
        }
    }
}
