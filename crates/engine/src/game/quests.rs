//! The quest board
//!
//! Up to three kill-credited quests at once. Offers avoid monsters that are
//! already targets and anything too rare to reasonably encounter.

use labyrinth_domain::{Character, ContentTables, DiceSource, Quest, QuestKind, QUEST_SLOTS};
use labyrinth_shared::MenuOption;

use crate::game::action::{Action, QuestAction};
use crate::game::engine::{GameEngine, Phase};
use crate::game::events::Events;

/// Share of offers that read as kill contracts; the rest ask for proof.
const KILL_OFFER_CHANCE: f64 = 0.6;

pub(crate) fn can_offer(character: &Character) -> bool {
    character.quests.len() < QUEST_SLOTS
}

/// Draw an offer from eligible monsters, or `None` when everything worth
/// hunting is already contracted.
pub(crate) fn generate_offer(
    content: &ContentTables,
    character: &Character,
    dice: &mut dyn DiceSource,
) -> Option<Quest> {
    let candidates: Vec<_> = content
        .monsters
        .quest_targets()
        .into_iter()
        .filter(|r| !character.quests.iter().any(|q| q.target == r.name))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let row = candidates[dice.range(0, candidates.len() as i32 - 1) as usize];
    let kind = if dice.chance(KILL_OFFER_CHANCE) {
        QuestKind::Kill
    } else {
        QuestKind::Collect
    };
    let reward_gold =
        (row.difficulty as f64 * 20.0 + (1.0 / row.wander_chance.max(0.01)) / 2.0).floor() as i32;

    Some(Quest {
        target: row.name.to_string(),
        kind,
        goal: 1,
        progress: 0,
        reward_gold,
    })
}

/// Credit one kill against every matching quest. Completed quests pay out
/// immediately and leave the list. Returns the completed quests.
pub(crate) fn credit_kill(character: &mut Character, monster_name: &str) -> Vec<Quest> {
    for quest in character.quests.iter_mut() {
        if quest.target == monster_name {
            quest.progress += 1;
        }
    }

    let mut completed = Vec::new();
    let mut i = 0;
    while i < character.quests.len() {
        if character.quests[i].is_complete() {
            let quest = character.quests.remove(i);
            character.earn_gold(quest.reward_gold);
            character.stats.quests_completed += 1;
            completed.push(quest);
        } else {
            i += 1;
        }
    }
    completed
}

impl GameEngine {
    pub(crate) fn render_quest_board(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };

        if let Some(offer) = &self.quest_offer {
            ev.say(format!("The board-keeper chalks up: {}", offer.describe()));
            ev.menu(vec![
                MenuOption::new("quest:accept", "Take the contract"),
                MenuOption::new("quest:decline", "Pass"),
            ]);
            return;
        }

        if c.quests.is_empty() {
            ev.say("No contracts hang under your name.");
        } else {
            ev.say("Your open contracts:");
            for quest in &c.quests {
                ev.say(format!("  {}", quest.describe()));
            }
        }

        let mut options = Vec::new();
        if can_offer(c) {
            options.push(MenuOption::new("quest:request", "Ask for work"));
        }
        options.push(MenuOption::new("quest:back", "Back to the square"));
        ev.menu(options);
    }

    pub(crate) async fn handle_quest_board(&mut self, action: Action, ev: &mut Events) {
        match action {
            Action::Continue => self.advance(ev).await,

            Action::Quest(QuestAction::Request) => {
                let GameEngine {
                    dice,
                    character,
                    content,
                    ..
                } = self;
                let Some(c) = character.as_ref() else {
                    return;
                };
                if !can_offer(c) {
                    ev.say("'Three open contracts is the limit. Finish one first.'");
                    self.render_quest_board(ev);
                    return;
                }
                self.quest_offer = generate_offer(content, c, dice.as_mut());
                if self.quest_offer.is_none() {
                    ev.say("'Nothing on the board you aren't already hunting.'");
                }
                self.render_quest_board(ev);
            }

            Action::Quest(QuestAction::Accept) => {
                let Some(offer) = self.quest_offer.take() else {
                    self.ignore_and_rerender(ev).await;
                    return;
                };
                let Some(c) = self.character.as_mut() else {
                    return;
                };
                if can_offer(c) {
                    tracing::info!(target = %offer.target, reward = offer.reward_gold, "Quest accepted");
                    c.quests.push(offer);
                    ev.say("'Bring word when it's done.'");
                } else {
                    ev.say("'Three open contracts is the limit.'");
                }
                self.render_quest_board(ev);
            }

            Action::Quest(QuestAction::Decline) => {
                self.quest_offer = None;
                ev.say("'Suit yourself.'");
                self.render_quest_board(ev);
            }

            Action::Quest(QuestAction::Back) => {
                self.quest_offer = None;
                self.enter_phase(Phase::Town, ev).await;
            }

            _ => self.ignore_and_rerender(ev).await,
        }
    }
}
