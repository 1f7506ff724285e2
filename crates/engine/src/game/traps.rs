//! Trap resolution
//!
//! Runs between room generation and the encounter. A failed dodge (or a
//! raw 5) takes the trap's damage plus its rider effect; the damage can be
//! lethal, in which case the revival flow takes over before any monster is
//! engaged.

use labyrinth_domain::content::TrapEffect;
use labyrinth_domain::Attribute;

use crate::game::engine::GameEngine;
use crate::game::events::Events;
use crate::game::rules;

impl GameEngine {
    /// Returns true when the trap killed the player (the death page has
    /// already been emitted).
    pub(crate) fn spring_trap(&mut self, ev: &mut Events) -> bool {
        let GameEngine {
            dice,
            character,
            content,
            ..
        } = self;
        let Some(c) = character.as_mut() else {
            return false;
        };
        let Some(trap) = content.traps.random_pick(dice.as_mut()) else {
            return false;
        };

        let roll = rules::check(
            dice.as_mut(),
            rules::ceil_half(c.attribute(Attribute::Dexterity)),
        );
        let dodged = !roll.is_fumble() && roll.total() >= trap.dc;

        tracing::debug!(trap = trap.name, raw = roll.raw, total = roll.total(), dodged, "Trap sprung");

        if dodged {
            ev.say(format!("{} You twist aside just in time.", trap.flavor));
            return false;
        }

        ev.say(trap.flavor);
        let damage = rules::parse_die_lenient(trap.die).roll_with(dice.as_mut());
        let died = c.take_damage(damage);
        ev.say(format!("The {} tears {} hit points from you.", trap.name, damage));

        match trap.effect {
            TrapEffect::Damage => {}
            TrapEffect::Poison { turns } => {
                c.combat.debuffs.poison_turns = c.combat.debuffs.poison_turns.max(turns);
                ev.say("Venom crawls up the wound.");
            }
            TrapEffect::GoldDust { amount } => {
                let lost = c.lose_gold(amount);
                if lost > 0 {
                    ev.say(format!("{} gold crumbles to grey dust.", lost));
                }
            }
            TrapEffect::RustWeapon => {
                ev.say("Your weapon's edge looks duller, though it cuts the same.");
            }
            TrapEffect::AttributeDown { attribute, amount } => {
                let applied = c.attributes.shift(attribute, -amount);
                if applied < 0 {
                    ev.say(format!("Something gives. {} down by {}.", attribute.label(), -applied));
                }
            }
        }

        if died {
            self.start_death(ev);
            return true;
        }
        self.push_stats(ev);
        false
    }
}
