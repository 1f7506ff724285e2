//! Labyrinth navigation and room generation
//!
//! Each descent bumps the depth, resets the per-depth utilities, and
//! generates a room: a monster (forced Dragon at depth 5 and on the 50th
//! engagement), an optional chest, an optional trap. Rooms are ephemeral;
//! fleeing abandons them.

use labyrinth_domain::{Attribute, DiceSource, Monster};
use labyrinth_shared::MenuOption;

use crate::game::action::{Action, DungeonAction};
use crate::game::engine::{GameEngine, Phase, Room};
use crate::game::events::Events;
use crate::game::rules;

/// Chance a non-Dragon room holds a chest.
const CHEST_CHANCE: f64 = 0.25;
/// Chance a chest also holds a magic ring.
const CHEST_RING_CHANCE: f64 = 0.5;
/// Chance a room is trapped.
const TRAP_CHANCE: f64 = 0.20;
/// Depth of the Dragon's vault.
const DRAGON_DEPTH: i32 = 5;
/// The Nth engaged monster is always the Dragon.
const DRAGON_ENCOUNTER: i32 = 50;

/// Map a monster to the background its lair is drawn with.
fn background_for(monster_name: &str, depth: i32) -> String {
    let name = monster_name.to_ascii_lowercase();
    let undead = ["skeleton", "zombie", "ghoul", "wight", "wraith"];
    let vermin = ["rat", "bat", "spider"];

    if name.contains("dragon") {
        "dragon_vault".to_string()
    } else if undead.iter().any(|k| name.contains(k)) {
        "crypt_hall".to_string()
    } else if vermin.iter().any(|k| name.contains(k)) {
        "warren_tunnels".to_string()
    } else if depth >= 4 {
        "deep_gallery".to_string()
    } else {
        "stone_corridor".to_string()
    }
}

impl GameEngine {
    pub(crate) fn render_labyrinth_menu(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };

        let mut options = vec![
            MenuOption::new("dng:deeper", "Go deeper"),
            MenuOption::new("dng:back", "Climb back to town"),
        ];
        if !c.depth_flags.divine_used {
            options.push(MenuOption::new("dng:divine", "Ask for divine aid"));
        }
        if !c.depth_flags.listen_used {
            options.push(MenuOption::new("dng:listen", "Listen at the dark"));
        }
        if self
            .room
            .as_ref()
            .is_some_and(|r| r.cleared && r.chest_present && !r.chest_opened)
        {
            options.push(MenuOption::new("dng:open_chest", "Open the chest"));
        }
        options.push(MenuOption::new("dng:examine_items", "Examine your gear"));
        if c.potion_count("Healing") > 0 || c.potion_count("Antidote") > 0 {
            options.push(MenuOption::new("dng:use_potion", "Drink a potion"));
        }
        ev.menu(options);
    }

    pub(crate) async fn handle_labyrinth(&mut self, action: Action, ev: &mut Events) {
        match action {
            Action::Continue => self.advance(ev).await,
            Action::Dungeon(DungeonAction::Deeper) => self.descend(ev),
            Action::Dungeon(DungeonAction::Back) => {
                self.room = None;
                self.depth_preserved_note();
                ev.say("You climb back toward lantern light.");
                ev.pause();
                self.arrive_in_town(ev);
            }
            Action::Dungeon(DungeonAction::Divine) => self.dungeon_divine(ev),
            Action::Dungeon(DungeonAction::Listen) => self.dungeon_listen(ev),
            Action::Dungeon(DungeonAction::OpenChest) => self.open_chest(ev),
            Action::Dungeon(DungeonAction::ExamineItems) => {
                self.continue_to = Some(Phase::Labyrinth);
                self.enter_phase(Phase::Inventory, ev).await;
            }
            Action::Dungeon(DungeonAction::UsePotion) => self.render_field_potions(ev),
            Action::Dungeon(DungeonAction::Potion(name)) => self.drink_field_potion(&name, ev),
            _ => self.ignore_and_rerender(ev).await,
        }
    }

    fn depth_preserved_note(&self) {
        tracing::debug!(depth = self.depth, "Leaving the labyrinth; depth persists");
    }

    /// One descent: new depth, fresh per-depth flags, a generated room, the
    /// trap (if any), then the encounter.
    fn descend(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };

        self.depth += 1;
        c.depth_flags.reset();
        self.encounter_count += 1;

        let forced_dragon = self.depth == DRAGON_DEPTH || self.encounter_count == DRAGON_ENCOUNTER;

        let GameEngine { dice, content, .. } = self;
        let row = if forced_dragon {
            content.monsters.by_name("Dragon")
        } else {
            content.monsters.wandering_pick(dice.as_mut())
        };
        let Some(row) = row else {
            tracing::error!("Monster table empty; cannot generate a room");
            return;
        };

        let die = rules::parse_die_lenient(row.damage_die);
        let monster = Monster::from_row(row, die);
        let chest_present = !monster.is_dragon() && dice.chance(CHEST_CHANCE);
        let trapped = dice.chance(TRAP_CHANCE);
        let background = background_for(&monster.name, self.depth);

        tracing::info!(
            depth = self.depth,
            encounter = self.encounter_count,
            monster = %monster.name,
            chest = chest_present,
            trapped,
            "Room generated"
        );

        self.room = Some(Room {
            monster_name: monster.name.clone(),
            chest_present,
            chest_opened: false,
            background: background.clone(),
            cleared: false,
        });
        self.monster = Some(monster);

        ev.scene(Some(&background));
        let depth_str = self.depth.to_string();
        self.say_line(ev, "labyrinth.descend", &[("depth", depth_str.as_str())]);

        if trapped {
            let died = self.spring_trap(ev);
            if died {
                return;
            }
        }

        self.begin_encounter(ev);
    }

    /// Divine aid outside combat mends instead of smiting. Same check, same
    /// once-per-depth budget as the combat action.
    fn dungeon_divine(&mut self, ev: &mut Events) {
        let GameEngine { dice, character, .. } = self;
        let Some(c) = character.as_mut() else {
            return;
        };
        if c.depth_flags.divine_used {
            ev.say("The powers above have answered once on this level already.");
            self.render_labyrinth_menu(ev);
            return;
        }
        c.depth_flags.divine_used = true;

        let roll = rules::check(dice.as_mut(), c.attribute(Attribute::Wisdom) - 10);
        match rules::divine_die(roll) {
            Some(die) => {
                let healed = c.heal(die.roll_with(dice.as_mut()));
                ev.say(format!(
                    "Warmth pours through the cracks in the dark. You recover {} hit points.",
                    healed
                ));
            }
            None => ev.say("Your prayer echoes away unanswered."),
        }
        self.push_stats(ev);
        self.render_labyrinth_menu(ev);
    }

    /// Listening gives one weighted preview of what prowls this level.
    fn dungeon_listen(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            character,
            content,
            ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };
        if c.depth_flags.listen_used {
            ev.say("You have already pressed your ear to this level's stones.");
            self.render_labyrinth_menu(ev);
            return;
        }
        c.depth_flags.listen_used = true;

        let roll = rules::check(dice.as_mut(), c.attribute(Attribute::Perception));
        if !roll.is_fumble() && roll.total() > 25 {
            match content.monsters.wandering_pick(dice.as_mut()) {
                Some(row) => ev.say(format!(
                    "You hold your breath. Somewhere close, a {} is moving.",
                    row.name
                )),
                None => ev.say("Silence."),
            }
        } else {
            ev.say("Only dripping water and your own heartbeat.");
        }
        self.render_labyrinth_menu(ev);
    }

    fn open_chest(&mut self, ev: &mut Events) {
        let can_open = self
            .room
            .as_ref()
            .is_some_and(|r| r.cleared && r.chest_present && !r.chest_opened);
        if !can_open {
            ev.say("No chest waits here for you.");
            self.render_labyrinth_menu(ev);
            return;
        }

        let GameEngine {
            dice,
            character,
            content,
            room,
            ..
        } = self;
        let (Some(c), Some(room)) = (character.as_mut(), room.as_mut()) else {
            return;
        };
        room.chest_opened = true;

        let gold = dice.range(10, 100);
        c.earn_gold(gold);
        ev.say(format!("The lid creaks open on {} gold.", gold));

        if dice.chance(CHEST_RING_CHANCE) {
            if let Some(row) = content.rings.drop_pick(dice.as_mut()) {
                let (ring, rolled) = row.forge(dice.as_mut());
                let name = ring.name.clone();
                let cursed = ring.cursed;
                let attribute = ring.attribute;
                let applied = c.bind_ring(ring, rolled);
                ev.say(format!(
                    "Beneath the coins: a {}. It slides onto your finger and will not move.",
                    name
                ));
                describe_ring_binding(ev, attribute.label(), applied, cursed);
            }
        }

        self.push_stats(ev);
        self.render_labyrinth_menu(ev);
    }

    fn render_field_potions(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };
        let mut options = Vec::new();
        // Only restoratives make sense between fights; battle draughts are
        // per-combat and would be wasted here.
        for name in ["Healing", "Antidote"] {
            let count = c.potion_count(name);
            if count > 0 {
                options.push(MenuOption::new(
                    format!("dng:potion:{}", name),
                    format!("{} x{}", name, count),
                ));
            }
        }
        options.push(MenuOption::new("dng:back:continue", "Never mind"));
        self.continue_to = Some(Phase::Labyrinth);
        ev.menu(options);
    }

    fn drink_field_potion(&mut self, name: &str, ev: &mut Events) {
        let GameEngine { dice, character, .. } = self;
        let Some(c) = character.as_mut() else {
            return;
        };
        match name {
            "Healing" if c.take_potion("Healing") => {
                let healed = c.heal(rules::ceil_half(c.attribute(Attribute::Constitution)) * dice.roll(2, 2));
                ev.say(format!("The draught burns going down. {} hit points return.", healed));
            }
            "Antidote" if c.take_potion("Antidote") => {
                c.combat.debuffs.poison_turns = 0;
                ev.say("The sweet syrup chases the venom out.");
            }
            _ => ev.say("You rummage for a bottle that is not there."),
        }
        self.push_stats(ev);
        self.render_labyrinth_menu(ev);
    }
}

/// Narrate what a freshly bound ring just did.
pub(crate) fn describe_ring_binding(ev: &mut Events, attribute: &str, applied: i32, cursed: bool) {
    if applied > 0 {
        ev.say(format!("Your {} rises by {}.", attribute, applied));
    } else if applied < 0 {
        ev.say(format!("Your {} withers by {}.", attribute, -applied));
    } else {
        ev.say("Nothing seems to change. Yet.");
    }
    if cursed {
        ev.say("A chill follows. This one is cursed.");
    }
}
