//! Combat orchestration
//!
//! One round: the player resolves an action, the companion (if any) swings,
//! the monster answers unless frozen, then poison ticks. Examine is the
//! lone action that does not hand the monster a turn. Ending conditions:
//! monster dead (victory or the Dragon endgame), player dead (revival
//! flow), or an escape (flee, charm, teleport).

use labyrinth_domain::{Attribute, Companion, DiceSource, Zone};
use labyrinth_shared::MenuOption;

use crate::application::ports::LeaderboardEntry;
use crate::game::action::{Action, CombatAction};
use crate::game::engine::{CombatMenu, GameEngine, Phase};
use crate::game::events::Events;
use crate::game::quests;
use crate::game::rules::{self, AttackOutcome, MonsterAttackOutcome};

fn random_zone(dice: &mut dyn DiceSource) -> Zone {
    Zone::ALL[dice.range(0, 2) as usize]
}

impl GameEngine {
    /// Kick off combat against the freshly generated room's monster.
    pub(crate) fn begin_encounter(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            character,
            monster,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return;
        };

        c.combat.reset_for_combat();
        self.monster_block = random_zone(dice.as_mut());
        self.combat_menu = CombatMenu::Main;
        self.phase = Phase::Combat;

        let name = m.name.clone();
        let player_first = rules::player_wins_initiative(dice.as_mut(), c, m);
        self.say_line(ev, "combat.engage", &[("monster", name.as_str())]);

        if !player_first {
            ev.combat(format!("The {} moves first!", name));
            let died = self.monster_turn(ev);
            if died {
                return;
            }
        }

        self.render_combat_menu(ev);
        self.push_stats(ev);
    }

    pub(crate) fn render_combat_menu(&mut self, ev: &mut Events) {
        let (Some(c), Some(m)) = (self.character.as_ref(), self.monster.as_ref()) else {
            return;
        };

        let options = match self.combat_menu {
            CombatMenu::Main => {
                let mut options = vec![
                    MenuOption::new("combat:attack", "Attack"),
                    MenuOption::new("combat:aim", format!("Aim ({})", self.player_zone.label())),
                ];
                if c.healing_potions > 0 || c.potion_uses.values().any(|n| *n > 0) {
                    options.push(MenuOption::new("combat:use_potion", "Use a potion"));
                }
                if c.spell_uses.values().any(|n| *n > 0) {
                    options.push(MenuOption::new("combat:cast_spell", "Cast a spell"));
                }
                if !c.depth_flags.divine_used {
                    options.push(MenuOption::new("combat:divine", "Call for divine aid"));
                }
                if !m.is_dragon() {
                    options.push(MenuOption::new("combat:charm", "Charm"));
                }
                if !c.combat.examine_used {
                    options.push(MenuOption::new("combat:examine", "Examine"));
                }
                options.push(MenuOption::new("combat:run", "Flee"));
                options
            }
            CombatMenu::Aim => {
                let mut options: Vec<MenuOption> = Zone::ALL
                    .into_iter()
                    .map(|z| {
                        MenuOption::new(
                            format!("combat:aim:{}", z.label().to_ascii_lowercase()),
                            z.label(),
                        )
                    })
                    .collect();
                options.push(MenuOption::new("combat:back", "Back"));
                options
            }
            CombatMenu::Potion => {
                let mut options = Vec::new();
                for row in self.content.potions.all() {
                    let count = c.potion_count(row.name);
                    if count > 0 {
                        options.push(MenuOption::new(
                            format!("combat:potion:{}", row.name),
                            format!("{} x{}", row.name, count),
                        ));
                    }
                }
                options.push(MenuOption::new("combat:back", "Back"));
                options
            }
            CombatMenu::Spell => {
                let mut options = Vec::new();
                for row in self.content.spells.all() {
                    let count = c.spell_count(row.name);
                    if count > 0 {
                        options.push(MenuOption::new(
                            format!("combat:spell:{}", row.name),
                            format!("{} x{}", row.name, count),
                        ));
                    }
                }
                options.push(MenuOption::new("combat:back", "Back"));
                options
            }
            CombatMenu::LightningPower => vec![
                MenuOption::new("combat:spell:lightning:full", "Full power (6d6)"),
                MenuOption::new("combat:spell:lightning:half", "Hold back (3d6)"),
                MenuOption::new("combat:back", "Back"),
            ],
        };
        ev.menu(options);
    }

    pub(crate) async fn handle_combat(&mut self, action: Action, ev: &mut Events) {
        match action {
            Action::Continue => self.advance(ev).await,
            Action::Combat(combat_action) => self.combat_action(combat_action, ev),
            _ => self.ignore_and_rerender(ev).await,
        }
    }

    fn combat_action(&mut self, action: CombatAction, ev: &mut Events) {
        match action {
            CombatAction::Back => {
                self.combat_menu = CombatMenu::Main;
                self.render_combat_menu(ev);
            }
            CombatAction::AimMenu => {
                self.combat_menu = CombatMenu::Aim;
                self.render_combat_menu(ev);
            }
            CombatAction::Aim(zone) => {
                self.player_zone = zone;
                ev.combat(format!("You square up, guarding your {}.", zone.label().to_ascii_lowercase()));
                self.combat_menu = CombatMenu::Main;
                self.render_combat_menu(ev);
            }
            CombatAction::UsePotion => {
                self.combat_menu = CombatMenu::Potion;
                self.render_combat_menu(ev);
            }
            CombatAction::CastSpell => {
                self.combat_menu = CombatMenu::Spell;
                self.render_combat_menu(ev);
            }
            CombatAction::Attack => self.player_attack_action(ev),
            CombatAction::Potion(name) => self.combat_potion(&name, ev),
            CombatAction::Spell(name) => {
                if name == "Lightning Bolt" {
                    self.combat_menu = CombatMenu::LightningPower;
                    self.render_combat_menu(ev);
                } else {
                    self.cast_spell(&name, ev);
                }
            }
            CombatAction::LightningFull => self.cast_lightning(true, ev),
            CombatAction::LightningHalf => self.cast_lightning(false, ev),
            CombatAction::Divine => self.combat_divine(ev),
            CombatAction::Charm => self.attempt_charm(ev),
            CombatAction::Run => self.attempt_flee(ev),
            CombatAction::Examine => self.examine_monster(ev),
            CombatAction::AfterExamine => {
                self.combat_menu = CombatMenu::Main;
                self.render_combat_menu(ev);
            }
        }
    }

    // ------------------------------------------------------------------
    // Player actions
    // ------------------------------------------------------------------

    fn player_attack_action(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            character,
            monster,
            player_zone,
            monster_block,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return;
        };

        let mut swings = 1;
        if c.combat.buffs.extra_attack_charges > 0 {
            c.combat.buffs.extra_attack_charges -= 1;
            swings += 1;
            ev.combat("Potion-quick, you move twice in a breath.");
        }

        for _ in 0..swings {
            if !m.is_alive() {
                break;
            }
            let (roll, outcome) =
                rules::resolve_player_attack(dice.as_mut(), c, m, *player_zone, *monster_block);
            match outcome {
                AttackOutcome::Fumble { self_damage } => {
                    ev.combat(format!(
                        "Your swing goes wide and bites back for {} damage.",
                        self_damage
                    ));
                    if c.take_damage(self_damage) {
                        self.start_death(ev);
                        return;
                    }
                }
                AttackOutcome::Blocked => {
                    ev.combat(format!(
                        "The {} reads your aim and turns the blow aside.",
                        m.name
                    ));
                }
                AttackOutcome::Miss => {
                    ev.combat(format!("You miss ({} vs AC {}).", roll.total(), m.effective_ac()));
                }
                AttackOutcome::Hit { damage, critical } => {
                    m.take_damage(damage);
                    if critical {
                        ev.combat(format!("A perfect strike! {} damage.", damage));
                    } else {
                        ev.combat(format!("You hit the {} for {} damage.", m.name, damage));
                    }
                }
            }

            if outcome.wears_gear() {
                let worn = match c.equipped_weapon_mut() {
                    Some(w) if !w.damaged && dice.chance(rules::GEAR_DEGRADE_CHANCE) => {
                        w.damaged = true;
                        Some(w.name.clone())
                    }
                    _ => None,
                };
                if let Some(name) = worn {
                    ev.combat(format!("Your {} cracks along the edge.", name));
                }
            }
        }

        if !m.is_alive() {
            self.finish_victory(ev);
            return;
        }

        if self.companion_attack(ev) {
            return;
        }
        self.after_player_turn(ev);
    }

    /// Returns true when the companion finished the monster off (the
    /// victory page has already been emitted).
    fn companion_attack(&mut self, ev: &mut Events) -> bool {
        let GameEngine {
            dice,
            character,
            monster,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return false;
        };
        let Some(companion) = c.companion.as_mut().filter(|comp| comp.is_alive()) else {
            return false;
        };
        if !m.is_alive() {
            return false;
        }

        let roll = rules::check(dice.as_mut(), companion.strength);
        if roll.is_fumble() {
            let self_damage = dice.roll(1, 4);
            companion.hp = (companion.hp - self_damage).max(0);
            ev.combat(format!(
                "{} stumbles and takes {} damage.",
                companion.name, self_damage
            ));
            if !companion.is_alive() {
                ev.combat(format!("{} sinks to the ground, spent.", companion.name));
            }
        } else if roll.total() < m.effective_ac() {
            ev.combat(format!("{} lunges and misses.", companion.name));
        } else {
            let damage = rules::parse_die_lenient(&companion.damage_die)
                .roll_with(dice.as_mut())
                .max(1);
            m.take_damage(damage);
            ev.combat(format!(
                "{} tears into the {} for {} damage.",
                companion.name, m.name, damage
            ));
        }

        if !m.is_alive() {
            self.finish_victory(ev);
            return true;
        }
        false
    }

    fn combat_potion(&mut self, name: &str, ev: &mut Events) {
        let GameEngine {
            dice, character, ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };

        if !c.take_potion(name) {
            ev.combat("You grope for a bottle that is not there.");
            self.combat_menu = CombatMenu::Main;
            self.render_combat_menu(ev);
            return;
        }

        let mut consumes_turn = true;
        match name {
            "Healing" => {
                let healed =
                    c.heal(rules::ceil_half(c.attribute(Attribute::Constitution)) * dice.roll(2, 2));
                ev.combat(format!("Warmth floods back: {} hit points.", healed));
            }
            "Strength" => {
                c.combat.buffs.damage_bonus += 2;
                ev.combat("Your arms swell with borrowed might (+2 damage).");
            }
            "Intelligence" => {
                c.combat.buffs.damage_bonus += 1;
                ev.combat("The fight slows in your mind's eye (+1 damage).");
            }
            "Speed" => {
                c.combat.buffs.extra_attack_charges += 1;
                ev.combat("The world drags; you alone move at full speed.");
            }
            "Protection" => {
                c.combat.buffs.ac_bonus += 3;
                ev.combat("A shimmer settles over your skin (+3 armor).");
            }
            "Invisibility" => {
                c.combat.buffs.invisibility_one_shot = true;
                ev.combat("You fade from sight. The next blow will find nothing.");
            }
            "Antidote" => {
                c.combat.debuffs.poison_turns = 0;
                consumes_turn = false;
                ev.combat("The antidote scours the venom from your blood.");
            }
            other => {
                tracing::warn!(potion = other, "Unknown potion effect");
                ev.combat("The draught tastes of nothing and does less.");
            }
        }

        self.combat_menu = CombatMenu::Main;
        if consumes_turn {
            self.after_player_turn(ev);
        } else {
            self.render_combat_menu(ev);
            self.push_stats(ev);
        }
    }

    fn cast_lightning(&mut self, full_power: bool, ev: &mut Events) {
        let spell = if full_power {
            ("Lightning Bolt", 6u32)
        } else {
            ("Lightning Bolt", 3u32)
        };
        self.cast_damage_spell(spell.0, spell.1, 6, ev);
    }

    fn cast_spell(&mut self, name: &str, ev: &mut Events) {
        match name {
            "Magic Missile" => self.cast_damage_spell(name, 2, 6, ev),
            "Fireball" => self.cast_damage_spell(name, 4, 6, ev),
            "Freeze" => self.cast_condition_spell(name, ev),
            "Vulnerability" => self.cast_condition_spell(name, ev),
            "Weakness" | "Slowness" => self.cast_condition_spell(name, ev),
            "Summon" => self.cast_summon(ev),
            "Teleport" => self.cast_teleport(ev),
            other => {
                tracing::warn!(spell = other, "Unknown spell");
                ev.combat("The syllables scatter and nothing happens.");
                self.combat_menu = CombatMenu::Main;
                self.render_combat_menu(ev);
            }
        }
    }

    fn cast_damage_spell(&mut self, name: &str, count: u32, sides: u32, ev: &mut Events) {
        let GameEngine {
            dice,
            character,
            monster,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return;
        };
        if !c.take_spell(name) {
            ev.combat("That scroll is spent.");
            self.combat_menu = CombatMenu::Main;
            self.render_combat_menu(ev);
            return;
        }

        let rolled = dice.roll(count, sides);
        let damage = rules::resisted_spell_damage(rolled, m.spell_resistance);
        m.take_damage(damage);
        if damage < rolled {
            ev.combat(format!(
                "{} hits for {} ({} shrugged off).",
                name,
                damage,
                rolled - damage
            ));
        } else {
            ev.combat(format!("{} hits for {} damage.", name, damage));
        }

        self.combat_menu = CombatMenu::Main;
        if !m.is_alive() {
            self.finish_victory(ev);
            return;
        }
        self.after_player_turn(ev);
    }

    fn cast_condition_spell(&mut self, name: &str, ev: &mut Events) {
        let GameEngine {
            character, monster, ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return;
        };
        if !c.take_spell(name) {
            ev.combat("That scroll is spent.");
            self.combat_menu = CombatMenu::Main;
            self.render_combat_menu(ev);
            return;
        }

        match name {
            "Freeze" => {
                m.conditions.freeze_turns += 1;
                ev.combat(format!("Frost locks the {} in place.", m.name));
            }
            "Vulnerability" => {
                m.conditions.ac_penalty += 2;
                ev.combat(format!("Seams open in the {}'s defenses (-2 AC).", m.name));
            }
            _ => {
                m.conditions.damage_penalty += 2;
                ev.combat(format!("The {}'s blows lose their weight (-2 damage).", m.name));
            }
        }

        self.combat_menu = CombatMenu::Main;
        self.after_player_turn(ev);
    }

    fn cast_summon(&mut self, ev: &mut Events) {
        let GameEngine {
            dice, character, ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };
        if c.companion.as_ref().is_some_and(|comp| comp.is_alive()) {
            ev.combat("Your companion growls; there is no room for another.");
            self.combat_menu = CombatMenu::Main;
            self.render_combat_menu(ev);
            return;
        }
        if !c.take_spell("Summon") {
            ev.combat("That scroll is spent.");
            self.combat_menu = CombatMenu::Main;
            self.render_combat_menu(ev);
            return;
        }

        let roll = dice.roll(5, 4);
        let companion = Companion::for_summon_roll(roll);
        ev.combat(format!("The circle flares, and a {} answers.", companion.name));
        c.companion = Some(companion);

        self.combat_menu = CombatMenu::Main;
        self.after_player_turn(ev);
    }

    fn cast_teleport(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };
        if !c.take_spell("Teleport") {
            ev.combat("That scroll is spent.");
            self.combat_menu = CombatMenu::Main;
            self.render_combat_menu(ev);
            return;
        }

        ev.combat("The room folds away between one blink and the next.");
        ev.pause();
        self.monster = None;
        self.room = None;
        self.arrive_in_town(ev);
    }

    fn combat_divine(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            character,
            monster,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return;
        };
        if c.depth_flags.divine_used {
            ev.combat("The powers above have answered once on this level already.");
            self.render_combat_menu(ev);
            return;
        }
        c.depth_flags.divine_used = true;

        let roll = rules::check(dice.as_mut(), c.attribute(Attribute::Wisdom) - 10);
        match rules::divine_die(roll) {
            Some(die) => {
                let damage = die.roll_with(dice.as_mut());
                m.take_damage(damage);
                ev.combat(format!(
                    "Light falls like a blade and sears the {} for {} damage.",
                    m.name, damage
                ));
            }
            None => ev.combat("The heavens keep their silence."),
        }

        if !m.is_alive() {
            self.finish_victory(ev);
            return;
        }
        // The monster always answers a prayer, granted or not.
        self.after_player_turn(ev);
    }

    fn attempt_charm(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            character,
            monster,
            depth,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return;
        };
        if m.is_dragon() {
            // Not offered in the menu; a stale client gets the refusal.
            ev.combat("The Dragon's regard is older than flattery.");
            self.render_combat_menu(ev);
            return;
        }

        let roll = rules::check(
            dice.as_mut(),
            rules::ceil_half(c.attribute(Attribute::Charisma)),
        );
        if rules::charm_succeeds(roll, m) {
            let mult = rules::depth_multiplier(*depth);
            let xp = rules::scale_reward(m.xp, mult) / 4;
            let gold = rules::scale_reward(dice.range(m.gold_min, m.gold_max), mult) / 4;
            let name = m.name.clone();

            ev.combat(format!(
                "The {} tilts its head, loses interest in your death, and wanders off.",
                name
            ));
            let levels = c.gain_xp(xp);
            c.earn_gold(gold);
            ev.combat(format!("You pocket {} gold and {} experience for the story.", gold, xp));
            announce_levels(ev, levels);

            self.monster = None;
            if let Some(room) = self.room.as_mut() {
                room.cleared = true;
            }
            ev.pause();
            self.continue_to = Some(Phase::Labyrinth);
            ev.continue_menu("page:continue", "Continue");
            self.push_stats(ev);
        } else {
            ev.combat(format!("The {} is not amused.", m.name));
            self.after_player_turn(ev);
        }
    }

    fn attempt_flee(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            character,
            monster,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return;
        };

        let roll = rules::check(
            dice.as_mut(),
            rules::ceil_half(c.attribute(Attribute::Dexterity)),
        );
        if rules::flee_succeeds(roll, m) {
            ev.combat("You turn and run until the snarling fades behind you.");
            ev.pause();
            self.monster = None;
            self.room = None;
            self.enter_labyrinth_after_escape(ev);
        } else {
            ev.combat(format!("The {} cuts off your escape.", m.name));
            self.after_player_turn(ev);
        }
    }

    fn enter_labyrinth_after_escape(&mut self, ev: &mut Events) {
        self.phase = Phase::Labyrinth;
        self.render_labyrinth_menu(ev);
        self.push_stats(ev);
    }

    fn examine_monster(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            character,
            monster,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_ref()) else {
            return;
        };
        if c.combat.examine_used {
            ev.combat("You have already taken your measure of this foe.");
            self.render_combat_menu(ev);
            return;
        }
        c.combat.examine_used = true;

        let roll = rules::check(dice.as_mut(), c.attribute(Attribute::Wisdom));
        if rules::examine_succeeds(roll) {
            ev.combat(m.description.clone());
            ev.combat(format!(
                "{}: {}/{} hp, AC {}, dexterity {}.",
                m.name, m.hp, m.max_hp, m.effective_ac(), m.dex
            ));
            if m.spell_resistance > 0 {
                ev.combat("Spellwork slides off it.");
            }
        } else {
            ev.combat("You study it and learn nothing you did not already fear.");
        }

        // Examining does not yield the floor; the monster waits.
        ev.menu(vec![MenuOption::new("combat:after_examine", "Ready yourself")]);
    }

    // ------------------------------------------------------------------
    // Monster turn and round end
    // ------------------------------------------------------------------

    /// The monster's answer plus the end-of-round poison tick, then the
    /// menu again. Call after every turn-consuming player action.
    fn after_player_turn(&mut self, ev: &mut Events) {
        if self.monster_turn(ev) {
            return;
        }
        // The monster may have beaten itself to death on a fumble.
        if self.monster.as_ref().is_some_and(|m| !m.is_alive()) {
            self.finish_victory(ev);
            return;
        }
        if self.poison_tick(ev) {
            return;
        }
        self.combat_menu = CombatMenu::Main;
        self.render_combat_menu(ev);
        self.push_stats(ev);
    }

    /// Returns true when the player died (death page emitted).
    fn monster_turn(&mut self, ev: &mut Events) -> bool {
        let GameEngine {
            dice,
            character,
            monster,
            player_zone,
            ..
        } = self;
        let (Some(c), Some(m)) = (character.as_mut(), monster.as_mut()) else {
            return false;
        };

        if m.conditions.freeze_turns > 0 {
            m.conditions.freeze_turns -= 1;
            ev.combat(format!("The {} strains against the frost and loses its turn.", m.name));
            return false;
        }

        let monster_aim = random_zone(dice.as_mut());
        let invisible = c.combat.buffs.invisibility_one_shot;
        let (_, outcome) =
            rules::resolve_monster_attack(dice.as_mut(), m, c, monster_aim, *player_zone, invisible);

        match outcome {
            MonsterAttackOutcome::ForcedMiss => {
                c.combat.buffs.invisibility_one_shot = false;
                ev.combat(format!("The {} swings through the space where you are not.", m.name));
            }
            MonsterAttackOutcome::Fumble { self_damage } => {
                m.take_damage(self_damage);
                ev.combat(format!(
                    "The {} overreaches and gashes itself for {}.",
                    m.name, self_damage
                ));
            }
            MonsterAttackOutcome::Blocked => {
                ev.combat(format!("You catch the {}'s blow on your guard.", m.name));
            }
            MonsterAttackOutcome::Miss => {
                ev.combat(format!("The {} misses.", m.name));
            }
            MonsterAttackOutcome::Hit { damage, critical } => {
                if critical {
                    ev.combat(format!("The {} finds an opening: {} damage!", m.name, damage));
                } else {
                    ev.combat(format!("The {} hits you for {} damage.", m.name, damage));
                }
                if c.take_damage(damage) {
                    self.start_death(ev);
                    return true;
                }
            }
        }

        if outcome.wears_armor() {
            let worn = match c.equipped_armor_mut() {
                Some(a) if !a.damaged && dice.chance(rules::GEAR_DEGRADE_CHANCE) => {
                    a.damaged = true;
                    Some(a.name.clone())
                }
                _ => None,
            };
            if let Some(name) = worn {
                ev.combat(format!("Straps tear: your {} hangs crooked.", name));
            }
        }

        // Fresh guard for the next round.
        self.monster_block = random_zone(self.dice.as_mut());
        false
    }

    /// Returns true when poison finished the player off.
    fn poison_tick(&mut self, ev: &mut Events) -> bool {
        let GameEngine {
            dice, character, ..
        } = self;
        let Some(c) = character.as_mut() else {
            return false;
        };
        if !c.combat.debuffs.is_poisoned() {
            return false;
        }

        c.combat.debuffs.poison_turns -= 1;
        let damage = dice.roll(1, 4);
        ev.combat(format!("Poison gnaws at you for {} damage.", damage));
        if c.take_damage(damage) {
            self.start_death(ev);
            return true;
        }
        false
    }

    // ------------------------------------------------------------------
    // Endings
    // ------------------------------------------------------------------

    fn finish_victory(&mut self, ev: &mut Events) {
        let GameEngine {
            dice,
            monster,
            depth,
            ..
        } = self;
        let Some(m) = monster.as_ref() else {
            return;
        };

        let name = m.name.clone();
        let was_dragon = m.is_dragon();
        let difficulty = m.difficulty;
        let mult = rules::depth_multiplier(*depth);
        let xp = rules::scale_reward(m.xp, mult);
        let gold = rules::scale_reward(dice.range(m.gold_min, m.gold_max), mult);

        self.say_line(ev, "combat.victory", &[("monster", name.as_str())]);

        let GameEngine {
            dice,
            character,
            content,
            ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };

        let levels = c.gain_xp(xp);
        c.earn_gold(gold);
        c.stats.monsters_defeated += 1;
        ev.combat(format!("{} experience and {} gold.", xp, gold));
        announce_levels(ev, levels);

        // Drop rolls: consumables scale with difficulty, gear is flat.
        let consumable_chance = rules::consumable_drop_chance(difficulty);

        if dice.chance(consumable_chance) {
            if let Some(row) = content.potions.drop_pick(dice.as_mut()) {
                c.add_potion(row.name);
                ev.combat(format!("Among the remains: a {} potion.", row.name));
            }
        }
        if dice.chance(consumable_chance) {
            if let Some(row) = content.spells.drop_pick(dice.as_mut()) {
                c.add_spell(row.name);
                ev.combat(format!("A scroll of {} survived the fight.", row.name));
            }
        }
        if dice.chance(rules::GEAR_DROP_CHANCE) {
            let slot = dice.fraction();
            if slot < 0.4 {
                if let Some(row) = content.rings.drop_pick(dice.as_mut()) {
                    let (ring, rolled) = row.forge(dice.as_mut());
                    let ring_name = ring.name.clone();
                    let cursed = ring.cursed;
                    let attribute = ring.attribute;
                    let applied = c.bind_ring(ring, rolled);
                    ev.combat(format!("A {} glints in the wreckage and binds to your hand.", ring_name));
                    crate::game::labyrinth::describe_ring_binding(
                        ev,
                        attribute.label(),
                        applied,
                        cursed,
                    );
                }
            } else if slot < 0.7 {
                if let Some(row) = content.armors.drop_pick(dice.as_mut()) {
                    c.add_armor(row.to_armor(true));
                    ev.combat(format!("You strip a serviceable {} from the corpse.", row.name));
                }
            } else if let Some(row) = content.weapons.drop_pick(dice.as_mut()) {
                c.add_weapon(row.to_weapon(true));
                ev.combat(format!("A {} lies where it fell. Yours now.", row.name));
            }
        }

        for quest in quests::credit_kill(c, &name) {
            ev.combat(format!(
                "Contract fulfilled: {} ({} gold).",
                quest.target, quest.reward_gold
            ));
        }

        self.monster = None;
        if let Some(room) = self.room.as_mut() {
            room.cleared = true;
        }

        if was_dragon {
            self.dragon_victory(ev);
        } else {
            ev.pause();
            ev.continue_menu("page:continue", "Continue");
            self.continue_to = Some(Phase::Labyrinth);
            self.push_stats(ev);
        }
    }

    fn dragon_victory(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };
        let name = c.name.clone();
        tracing::info!(name = %name, level = c.level, "Dragon slain");

        ev.scene(Some("dragon_hoard"));
        self.say_line(ev, "victory.dragon", &[]);
        self.say_line(ev, "victory.legend", &[("name", name.as_str())]);
        ev.pause();

        self.phase = Phase::Victory;
        ev.continue_menu("victory:continue", "Continue");
        self.push_stats(ev);
    }

    /// Commit the winning run: save first so a fault between the two calls
    /// never loses the character, then append the leaderboard entry.
    pub(crate) async fn commit_victory(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };

        match c.to_record() {
            Ok(record) => {
                if let Err(e) = self.save_store.save(&self.device_id, record).await {
                    tracing::error!(error = %e, "Victory save failed");
                    ev.say("The chronicle could not be written, but the deed stands.");
                }
            }
            Err(e) => tracing::error!(error = %e, "Victory record serialization failed"),
        }

        let entry = LeaderboardEntry {
            name: c.name.clone(),
            level: c.level,
            difficulty: c.difficulty.label().to_string(),
            date: chrono::Utc::now(),
            monsters_defeated: c.stats.monsters_defeated,
            quests_completed: c.stats.quests_completed,
            potions_used: c.stats.potions_used,
            spells_used: c.stats.spells_used,
            gold_earned: c.stats.gold_earned,
            gold_spent: c.stats.gold_spent,
            weapon: c.equipped_weapon().map(|w| w.name.clone()),
            armor: c.equipped_armor().map(|a| a.name.clone()),
            companion: c.companion.as_ref().map(|comp| comp.name.clone()),
        };
        if let Err(e) = self.leaderboard.append(entry).await {
            tracing::error!(error = %e, "Leaderboard append failed");
        }
    }

    /// The lethal moment: the character is at 0 hp and the revival roll
    /// waits behind a Continue.
    pub(crate) fn start_death(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };
        c.death_count += 1;
        tracing::info!(name = %c.name, death_count = c.death_count, "Player downed");

        self.monster = None;
        self.room = None;
        self.say_line(ev, "death.blow", &[]);
        ev.pause();
        self.phase = Phase::Death;
        ev.continue_menu("death:continue", "Face the darkness");
    }

    pub(crate) async fn handle_death(&mut self, action: Action, ev: &mut Events) {
        if !matches!(action, Action::Continue) {
            self.ignore_and_rerender(ev).await;
            return;
        }

        let GameEngine {
            dice, character, ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };

        let dc = 15 + 5 * c.death_count;
        let roll = rules::check(dice.as_mut(), c.attribute(Attribute::Wisdom));
        let revived = !roll.is_fumble() && roll.total() >= dc;
        tracing::info!(raw = roll.raw, total = roll.total(), dc, revived, "Revival roll");

        if revived {
            c.apply_revival();
            self.depth = 0;
            self.say_line(ev, "revival.success", &[]);
            ev.say("Everything you were has been pared down by one.");
            ev.pause();
            self.arrive_in_town(ev);
        } else {
            self.say_line(ev, "revival.failure", &[]);
            if let Err(e) = self.save_store.delete(&self.device_id).await {
                // The in-memory character dies regardless.
                tracing::error!(error = %e, "Death wipe failed");
            }
            self.character = None;
            self.depth = 0;
            self.encounter_count = 0;
            ev.pause();
            self.phase = Phase::GameOver;
            ev.continue_menu("gameover:continue", "Continue");
        }
    }
}

fn announce_levels(ev: &mut Events, levels: i32) {
    if levels > 0 {
        ev.combat(format!(
            "You feel your limits move: level up x{} (+{} stat point{}).",
            levels,
            levels,
            if levels == 1 { "" } else { "s" }
        ));
    }
}
