//! The gambling den
//!
//! The one corner of the game that rolls a d20: call the exact face for a
//! 10x payout, or call high/low for 2x. The stake leaves the purse up
//! front and winnings include it back.

use labyrinth_domain::DiceSource;
use labyrinth_shared::MenuOption;

use crate::game::action::{Action, GambleAction};
use crate::game::engine::{GambleMode, GameEngine, Phase};
use crate::game::events::Events;

const STAKES: [i32; 4] = [10, 25, 50, 100];
const EXACT_PAYOUT: i32 = 10;
const RANGE_PAYOUT: i32 = 2;

impl GameEngine {
    pub(crate) fn render_gamble(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };

        match (self.gamble.mode, self.gamble.stake) {
            (None, _) => {
                ev.say("Dice rattle in a cup. 'Call a face for ten to one, high or low for two to one.'");
                ev.menu(vec![
                    MenuOption::new("gamble:exact", "Call the exact face (10x)"),
                    MenuOption::new("gamble:range", "Call high or low (2x)"),
                    MenuOption::new("gamble:back", "Walk away"),
                ]);
            }
            (Some(_), None) => {
                let mut options: Vec<MenuOption> = STAKES
                    .iter()
                    .filter(|s| **s <= c.gold)
                    .map(|s| MenuOption::new(format!("gamble:stake:{}", s), format!("{} gold", s)))
                    .collect();
                if options.is_empty() {
                    ev.say("'Minimum stake is 10 gold. Come back solvent.'");
                }
                options.push(MenuOption::new("gamble:back", "Walk away"));
                ev.menu(options);
            }
            (Some(GambleMode::Exact), Some(_)) => {
                let options: Vec<MenuOption> = (1..=20)
                    .map(|n| MenuOption::new(format!("gamble:guess:{}", n), n.to_string()))
                    .collect();
                ev.menu(options);
            }
            (Some(GambleMode::Range), Some(_)) => {
                ev.menu(vec![
                    MenuOption::new("gamble:low", "Low (1-10)"),
                    MenuOption::new("gamble:high", "High (11-20)"),
                ]);
            }
        }
    }

    pub(crate) async fn handle_gamble(&mut self, action: Action, ev: &mut Events) {
        match action {
            Action::Continue => self.advance(ev).await,

            Action::Gamble(GambleAction::Back) => {
                self.gamble = Default::default();
                self.enter_phase(Phase::Town, ev).await;
            }

            Action::Gamble(GambleAction::Exact) if self.gamble.mode.is_none() => {
                self.gamble.mode = Some(GambleMode::Exact);
                self.render_gamble(ev);
            }
            Action::Gamble(GambleAction::Range) if self.gamble.mode.is_none() => {
                self.gamble.mode = Some(GambleMode::Range);
                self.render_gamble(ev);
            }

            Action::Gamble(GambleAction::Stake(stake)) => {
                let affordable = STAKES.contains(&stake)
                    && self.character.as_ref().is_some_and(|c| c.gold >= stake);
                if self.gamble.mode.is_some() && self.gamble.stake.is_none() && affordable {
                    self.gamble.stake = Some(stake);
                    self.render_gamble(ev);
                } else {
                    self.ignore_and_rerender(ev).await;
                }
            }

            Action::Gamble(GambleAction::Guess(guess)) => {
                if self.gamble.mode == Some(GambleMode::Exact)
                    && self.gamble.stake.is_some()
                    && (1..=20).contains(&guess)
                {
                    self.resolve_wager(WagerCall::Exact(guess), ev);
                } else {
                    self.ignore_and_rerender(ev).await;
                }
            }
            Action::Gamble(GambleAction::Low) => {
                if self.gamble.mode == Some(GambleMode::Range) && self.gamble.stake.is_some() {
                    self.resolve_wager(WagerCall::Low, ev);
                } else {
                    self.ignore_and_rerender(ev).await;
                }
            }
            Action::Gamble(GambleAction::High) => {
                if self.gamble.mode == Some(GambleMode::Range) && self.gamble.stake.is_some() {
                    self.resolve_wager(WagerCall::High, ev);
                } else {
                    self.ignore_and_rerender(ev).await;
                }
            }

            _ => self.ignore_and_rerender(ev).await,
        }
    }

    fn resolve_wager(&mut self, call: WagerCall, ev: &mut Events) {
        let Some(stake) = self.gamble.stake else {
            return;
        };
        let GameEngine {
            dice, character, ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };
        if c.spend_gold(stake).is_err() {
            ev.say("'Stake first, glory after.'");
            self.gamble = Default::default();
            self.render_gamble(ev);
            return;
        }

        // The den's one concession to tradition: a d20.
        let face = dice.roll(1, 20);
        let (won, payout) = match call {
            WagerCall::Exact(guess) => (face == guess, stake * EXACT_PAYOUT),
            WagerCall::Low => (face <= 10, stake * RANGE_PAYOUT),
            WagerCall::High => (face > 10, stake * RANGE_PAYOUT),
        };

        ev.say(format!("The die skitters to a stop: {}.", face));
        if won {
            c.earn_gold(payout);
            ev.say(format!("'House pays {}.' The table goes quiet.", payout));
        } else {
            ev.say(format!("Your {} gold joins the house's retirement fund.", stake));
        }

        tracing::debug!(face, stake, won, "Wager resolved");
        self.gamble = Default::default();
        self.result_page(ev, Phase::Gamble);
    }
}

#[derive(Debug, Clone, Copy)]
enum WagerCall {
    Exact(i32),
    Low,
    High,
}
