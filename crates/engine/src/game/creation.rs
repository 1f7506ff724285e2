//! Character creation: difficulty, intro, naming, attribute assignment
//!
//! Attribute values are rolled one at a time with the difficulty's dice;
//! each rolled value must be placed on an unfilled attribute before the
//! next roll. Starting HP is `3*CON + 5d4` (the older 3d6 spelling is not
//! used); starting gold favors frail characters through tiered bonus dice.

use labyrinth_domain::{Attribute, Attributes, Character, DiceSource};
use labyrinth_shared::MenuOption;

use crate::game::action::Action;
use crate::game::engine::{CreationState, GameEngine, Phase};
use crate::game::events::Events;

/// `ceil(CHA / 1.5)` spelled in integer math.
fn charisma_gold_dice(charisma: i32) -> u32 {
    ((2 * charisma + 2) / 3).max(0) as u32
}

/// Bonus gold dice for a fragile start; the highest matching band wins.
fn low_hp_bonus_dice(hp: i32) -> u32 {
    match hp {
        i32::MIN..=24 => 15,
        25..=29 => 10,
        30..=39 => 7,
        40..=49 => 5,
        50..=59 => 3,
        _ => 0,
    }
}

pub(crate) fn starting_hp(dice: &mut dyn DiceSource, constitution: i32) -> i32 {
    3 * constitution + dice.roll(5, 4)
}

pub(crate) fn starting_gold(dice: &mut dyn DiceSource, charisma: i32, hp: i32) -> i32 {
    let mut gold = dice.roll(20, 6);
    let cha_dice = charisma_gold_dice(charisma);
    if cha_dice > 0 {
        gold += dice.roll(cha_dice, 6);
    }
    let bonus = low_hp_bonus_dice(hp);
    if bonus > 0 {
        gold += dice.roll(bonus, 6);
    }
    gold
}

impl GameEngine {
    pub(crate) fn render_difficulty_menu(&mut self, ev: &mut Events) {
        ev.say("How kindly should fate roll your bones?");
        ev.menu(vec![
            MenuOption::new("difficulty:easy", "Easy (6d5 per attribute)"),
            MenuOption::new("difficulty:normal", "Normal (5d5 per attribute)"),
            MenuOption::new("difficulty:hard", "Hard (4d5 per attribute)"),
        ]);
    }

    pub(crate) fn render_intro(&mut self, ev: &mut Events) {
        ev.scene(Some("town_gate"));
        self.say_line(ev, "intro.charge", &[]);
        self.say_line(ev, "intro.warning", &[]);
        ev.pause();
        ev.continue_menu("intro:continue", "Continue");
        self.continue_to = Some(Phase::CreateName);
    }

    pub(crate) fn render_creation_menu(&mut self, ev: &mut Events) {
        let Some(creation) = &self.creation else {
            ev.continue_menu("create:roll", "Roll");
            return;
        };
        match creation.pending_roll {
            Some(value) => {
                let options = creation
                    .unfilled()
                    .into_iter()
                    .map(|attr| {
                        MenuOption::new(
                            format!("create:assign:{}", attr.label()),
                            format!("{} <- {}", attr.label(), value),
                        )
                    })
                    .collect();
                ev.menu(options);
            }
            None => ev.continue_menu("create:roll", "Roll the dice"),
        }
    }

    pub(crate) async fn handle_creation(&mut self, action: Action, ev: &mut Events) {
        match (self.phase, action) {
            (_, Action::Continue) => self.advance(ev).await,

            (Phase::SelectDifficulty, Action::DifficultyChosen(difficulty)) => {
                tracing::info!(difficulty = %difficulty, "Difficulty chosen");
                self.chosen_difficulty = Some(difficulty);
                self.enter_phase(Phase::Intro, ev).await;
            }

            (Phase::CreateName, Action::PromptSubmit(name)) => {
                let name = name.unwrap_or_default().trim().to_string();
                if name.is_empty() || name.chars().count() > 24 {
                    ev.say("A name, adventurer. One that fits on a gravestone.");
                    ev.prompt("name", "What is your name?");
                    return;
                }
                let difficulty = self.chosen_difficulty.unwrap_or_default();
                self.creation = Some(CreationState {
                    name,
                    difficulty,
                    pending_roll: None,
                    assigned: Vec::new(),
                });
                self.say_line(ev, "create.greeting", &[]);
                ev.pause();
                self.enter_phase(Phase::CreateAttributes, ev).await;
            }

            (Phase::CreateAttributes, Action::CreateRoll) => self.creation_roll(ev).await,

            (Phase::CreateAttributes, Action::CreateAssign(attr)) => {
                self.creation_assign(attr, ev).await
            }

            _ => self.ignore_and_rerender(ev).await,
        }
    }

    async fn creation_roll(&mut self, ev: &mut Events) {
        let GameEngine { dice, creation, .. } = self;
        let Some(creation) = creation.as_mut() else {
            self.ignore_and_rerender(ev).await;
            return;
        };
        if creation.pending_roll.is_some() {
            // The displayed roll must be placed first.
            self.ignore_and_rerender(ev).await;
            return;
        }
        let die = creation.difficulty.creation_dice();
        let value = die.roll_with(dice.as_mut());
        creation.pending_roll = Some(value);
        ev.say(format!("The dice clatter: {}.", value));
        self.render_creation_menu(ev);
    }

    async fn creation_assign(&mut self, attr: Attribute, ev: &mut Events) {
        let Some(creation) = self.creation.as_mut() else {
            self.ignore_and_rerender(ev).await;
            return;
        };
        let Some(value) = creation.pending_roll else {
            self.ignore_and_rerender(ev).await;
            return;
        };
        if !creation.unfilled().contains(&attr) {
            self.ignore_and_rerender(ev).await;
            return;
        }

        creation.pending_roll = None;
        creation.assigned.push((attr, value));
        ev.say(format!("{} set to {}.", attr.label(), value));

        if creation.unfilled().is_empty() {
            self.finalize_character(ev);
        } else {
            self.render_creation_menu(ev);
        }
    }

    fn finalize_character(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            creation,
            device_id,
            ..
        } = self;
        let Some(done) = creation.take() else {
            return;
        };

        let mut attributes = Attributes::uniform(3);
        for (attr, value) in &done.assigned {
            attributes.set(*attr, *value);
        }

        let hp = starting_hp(dice.as_mut(), attributes.get(Attribute::Constitution));
        let gold = starting_gold(dice.as_mut(), attributes.get(Attribute::Charisma), hp);

        tracing::info!(name = %done.name, hp, gold, "Character created");
        let character = Character::new(done.name, done.difficulty, device_id.clone(), attributes, hp, gold);
        ev.say(format!(
            "{} stands ready: {} hit points and {} gold to a name.",
            character.name, character.max_hp, character.gold
        ));
        ev.pause();

        self.character = Some(character);
        self.depth = 0;
        self.encounter_count = 0;
        self.arrive_in_town(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedDice;

    #[test]
    fn test_charisma_gold_dice_is_ceil_of_two_thirds() {
        assert_eq!(charisma_gold_dice(13), 9); // ceil(13 / 1.5)
        assert_eq!(charisma_gold_dice(12), 8);
        assert_eq!(charisma_gold_dice(3), 2);
    }

    #[test]
    fn test_low_hp_bonus_bands() {
        assert_eq!(low_hp_bonus_dice(24), 15);
        assert_eq!(low_hp_bonus_dice(25), 10);
        assert_eq!(low_hp_bonus_dice(39), 7);
        assert_eq!(low_hp_bonus_dice(49), 5);
        assert_eq!(low_hp_bonus_dice(59), 3);
        assert_eq!(low_hp_bonus_dice(60), 0);
    }

    #[test]
    fn test_starting_hp_pins_the_5d4_formula() {
        let mut dice = ScriptedDice::new(vec![13]);
        assert_eq!(starting_hp(&mut dice, 16), 3 * 16 + 13);
    }

    #[test]
    fn test_starting_gold_adds_tier_bonus() {
        // 20d6 -> 70, CHA dice -> 30, sturdy hp 60 adds nothing.
        let mut dice = ScriptedDice::new(vec![70, 30]);
        assert_eq!(starting_gold(&mut dice, 13, 60), 100);

        // Frail hp 20 rolls the 15d6 band: 70 + 30 + 50.
        let mut dice = ScriptedDice::new(vec![70, 30, 50]);
        assert_eq!(starting_gold(&mut dice, 13, 20), 150);
    }
}
