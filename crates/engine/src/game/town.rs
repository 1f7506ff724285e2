//! The town hub and its services
//!
//! Eat, tavern, pray, sleep, and rest are once per visit; the flags reset
//! when the character arrives from outside. Every service ends on a result
//! page whose Continue returns to the square.

use labyrinth_domain::{Attribute, CombatConditions, DiceSource};
use labyrinth_shared::MenuOption;

use crate::game::action::{
    Action, CompanionAction, InventoryAction, SmithAction, TempleAction, TownAction,
};
use crate::game::engine::{GameEngine, Phase};
use crate::game::events::Events;
use crate::game::rules;

const HEALER_COST: i32 = 40;

impl GameEngine {
    pub(crate) fn render_town_menu(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };

        let mut options = vec![
            MenuOption::new("town:enter", "Enter the labyrinth"),
            MenuOption::new("town:shop", "Visit the shop"),
            MenuOption::new("town:healer", format!("See the healer ({} gold)", HEALER_COST)),
        ];
        if !c.town_flags.ate {
            options.push(MenuOption::new("town:eat", "Eat a proper meal (10 gold)"));
        }
        if !c.town_flags.drank {
            options.push(MenuOption::new("town:tavern", "Drink at the tavern (10 gold)"));
        }
        if !c.town_flags.prayed {
            options.push(MenuOption::new("town:pray", "Pray at the temple"));
        }
        if !c.town_flags.slept {
            options.push(MenuOption::new("town:sleep", "Sleep in a real bed"));
        }
        if !c.town_flags.rested {
            options.push(MenuOption::new("town:rest", "Rest at the bathhouse (10 gold)"));
        }
        options.push(MenuOption::new(
            "town:train",
            format!("Train an attribute ({} gold)", c.training_cost()),
        ));
        if c.unspent_stat_points > 0 {
            options.push(MenuOption::new(
                "town:level",
                format!("Spend stat points ({})", c.unspent_stat_points),
            ));
        }
        options.push(MenuOption::new("town:quests", "Check the quest board"));
        if c.companion.is_some() {
            options.push(MenuOption::new("town:companion", "Tend to your companion"));
        }
        if c.weapons.iter().any(|w| w.damaged) || c.armors.iter().any(|a| a.damaged) {
            options.push(MenuOption::new(
                "town:repair",
                format!("Weaponsmith repairs ({} gold each)", rules::REPAIR_COST),
            ));
        }
        if c.rings.iter().any(|r| r.cursed) {
            options.push(MenuOption::new(
                "town:remove_curses",
                format!("Cleanse curses ({} gold each)", rules::CLEANSE_COST),
            ));
        }
        options.push(MenuOption::new("town:gamble", "Try the gambling den"));
        options.push(MenuOption::new("town:inventory", "Open your pack"));
        options.push(MenuOption::new("town:save", "Record your progress"));
        options.push(MenuOption::new("town:quit", "Abandon the run"));
        ev.menu(options);
    }

    pub(crate) async fn handle_town(&mut self, action: Action, ev: &mut Events) {
        match (self.phase, action) {
            (_, Action::Continue) => self.advance(ev).await,

            (Phase::Town, Action::Town(town_action)) => {
                self.town_action(town_action, ev).await;
            }

            (Phase::TrainMenu, Action::TrainAttr(attr)) => self.train_attribute(attr, ev),
            (Phase::LevelMenu, Action::LevelAttr(attr)) => self.level_attribute(attr, ev),

            (Phase::Inventory, Action::Inventory(InventoryAction::EquipWeapon(i))) => {
                self.equip_from_pack(true, i, ev)
            }
            (Phase::Inventory, Action::Inventory(InventoryAction::EquipArmor(i))) => {
                self.equip_from_pack(false, i, ev)
            }
            (Phase::Inventory, Action::Inventory(InventoryAction::Back)) => {
                let target = self.continue_to.take().unwrap_or(Phase::Town);
                self.enter_phase(target, ev).await;
            }

            (Phase::CompanionMenu, Action::Companion(CompanionAction::Heal)) => {
                self.heal_companion(ev)
            }
            (Phase::CompanionMenu, Action::Companion(CompanionAction::Back)) => {
                self.enter_phase(Phase::Town, ev).await;
            }

            (Phase::Smithy, Action::Smith(SmithAction::Weapon(i))) => self.repair_item(true, i, ev),
            (Phase::Smithy, Action::Smith(SmithAction::Armor(i))) => self.repair_item(false, i, ev),
            (Phase::Smithy, Action::Smith(SmithAction::Back)) => {
                self.enter_phase(Phase::Town, ev).await;
            }

            (Phase::Temple, Action::Temple(TempleAction::Ring(i))) => self.cleanse_ring(i, ev),
            (Phase::Temple, Action::Temple(TempleAction::Back)) => {
                self.enter_phase(Phase::Town, ev).await;
            }

            _ => self.ignore_and_rerender(ev).await,
        }
    }

    async fn town_action(&mut self, action: TownAction, ev: &mut Events) {
        match action {
            TownAction::Enter => {
                ev.scene(Some("labyrinth_gate"));
                self.say_line(ev, "labyrinth.gate", &[]);
                self.phase = Phase::Labyrinth;
                self.render_labyrinth_menu(ev);
                self.push_stats(ev);
            }
            TownAction::Shop => {
                self.pending_sale = None;
                self.shop_page = crate::game::engine::ShopPage::Front;
                self.enter_phase(Phase::Shop, ev).await;
            }
            TownAction::Healer => self.visit_healer(ev),
            TownAction::Eat => self.rest_service(RestService::Eat, ev),
            TownAction::Tavern => self.rest_service(RestService::Tavern, ev),
            TownAction::Pray => self.rest_service(RestService::Pray, ev),
            TownAction::Sleep => self.rest_service(RestService::Sleep, ev),
            TownAction::Rest => self.rest_service(RestService::Rest, ev),
            TownAction::Train => self.enter_phase(Phase::TrainMenu, ev).await,
            TownAction::Level => {
                let has_points = self
                    .character
                    .as_ref()
                    .is_some_and(|c| c.unspent_stat_points > 0);
                if has_points {
                    self.enter_phase(Phase::LevelMenu, ev).await;
                } else {
                    ev.say("You have no banked stat points to spend.");
                    self.result_page(ev, Phase::Town);
                }
            }
            TownAction::Quests => {
                self.quest_offer = None;
                self.enter_phase(Phase::QuestBoard, ev).await;
            }
            TownAction::Companion => self.enter_phase(Phase::CompanionMenu, ev).await,
            TownAction::Repair => self.enter_phase(Phase::Smithy, ev).await,
            TownAction::RemoveCurses => self.enter_phase(Phase::Temple, ev).await,
            TownAction::Gamble => {
                self.gamble = Default::default();
                self.enter_phase(Phase::Gamble, ev).await;
            }
            TownAction::Inventory => {
                self.continue_to = Some(Phase::Town);
                self.enter_phase(Phase::Inventory, ev).await;
            }
            TownAction::Save => self.save_progress(ev).await,
            TownAction::Quit => {
                tracing::info!("Run abandoned at the main menu's door");
                self.character = None;
                self.room = None;
                self.monster = None;
                self.depth = 0;
                self.encounter_count = 0;
                ev.clear();
                ev.scene(Some("title"));
                self.render_main_menu(ev).await;
            }
        }
    }

    fn visit_healer(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };
        if c.spend_gold(HEALER_COST).is_err() {
            ev.say("The healer's mercy is real, but her rent is realer. Come back with 40 gold.");
            self.result_page(ev, Phase::Town);
            return;
        }
        c.full_heal();
        c.combat.debuffs = CombatConditions::default();
        self.say_line(ev, "town.healer", &[]);
        self.result_page(ev, Phase::Town);
    }

    fn rest_service(&mut self, service: RestService, ev: &mut Events) {
        let GameEngine {
            dice, character, ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };

        let flag_used = match service {
            RestService::Eat => c.town_flags.ate,
            RestService::Tavern => c.town_flags.drank,
            RestService::Pray => c.town_flags.prayed,
            RestService::Sleep => c.town_flags.slept,
            RestService::Rest => c.town_flags.rested,
        };
        if flag_used {
            ev.say("Once per visit is all the town can spare you.");
            self.result_page(ev, Phase::Town);
            return;
        }
        if service.cost() > 0 && c.spend_gold(service.cost()).is_err() {
            ev.say(format!("That costs {} gold you do not have.", service.cost()));
            self.result_page(ev, Phase::Town);
            return;
        }

        match service {
            RestService::Eat => c.town_flags.ate = true,
            RestService::Tavern => c.town_flags.drank = true,
            RestService::Pray => c.town_flags.prayed = true,
            RestService::Sleep => c.town_flags.slept = true,
            RestService::Rest => c.town_flags.rested = true,
        }
        ev.say(service.flavor());

        let roll = rules::check(dice.as_mut(), c.attribute(service.attribute()));
        if roll.is_fumble() {
            let damage = dice.roll(1, 4);
            ev.say(format!(
                "It goes badly. You come away {} hit points the worse.",
                damage
            ));
            if c.take_damage(damage) {
                self.start_death(ev);
                return;
            }
        } else if roll.total() > 25 {
            let healed = c.heal((c.max_hp + 2) / 3);
            ev.say(format!("It does you good: {} hit points restored.", healed));
        } else {
            ev.say("Pleasant enough, but your wounds disagree.");
        }
        self.result_page(ev, Phase::Town);
    }

    pub(crate) fn render_train_menu(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };
        ev.say(format!(
            "The drill-master names a price: {} gold a session.",
            c.training_cost()
        ));
        let mut options: Vec<MenuOption> = Attribute::ALL
            .into_iter()
            .map(|attr| {
                MenuOption::new(
                    format!("train:{}", attr.label()),
                    format!("{} ({})", attr.label(), c.attribute(attr)),
                )
            })
            .collect();
        options.push(MenuOption::new("town:back:continue", "Back"));
        self.continue_to = Some(Phase::Town);
        ev.menu(options);
    }

    fn train_attribute(&mut self, attr: Attribute, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };
        let cost = c.training_cost();
        if c.gold < cost {
            ev.say(format!("Training costs {} gold. Your purse says no.", cost));
            self.result_page(ev, Phase::TrainMenu);
            return;
        }
        match c.train(attr) {
            Ok(()) => {
                // Collect the fee only for a session that happened.
                let _ = c.spend_gold(cost);
                self.say_line(ev, "town.trainer", &[]);
                ev.say(format!(
                    "{} rises to {}.",
                    attr.label(),
                    self.character.as_ref().map(|c| c.attribute(attr)).unwrap_or_default()
                ));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Training refused");
                ev.say("'I've taught you everything a body can hold.'");
            }
        }
        self.result_page(ev, Phase::TrainMenu);
    }

    pub(crate) fn render_level_menu(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };
        ev.say(format!(
            "{} stat point{} to place.",
            c.unspent_stat_points,
            if c.unspent_stat_points == 1 { "" } else { "s" }
        ));
        let mut options: Vec<MenuOption> = Attribute::ALL
            .into_iter()
            .map(|attr| {
                MenuOption::new(
                    format!("level:{}", attr.label()),
                    format!("{} ({})", attr.label(), c.attribute(attr)),
                )
            })
            .collect();
        options.push(MenuOption::new("town:back:continue", "Back"));
        self.continue_to = Some(Phase::Town);
        ev.menu(options);
    }

    fn level_attribute(&mut self, attr: Attribute, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };
        match c.spend_point(attr) {
            Ok(()) => {
                ev.say(format!("{} rises to {}.", attr.label(), c.attribute(attr)));
                if c.unspent_stat_points > 0 {
                    self.render_level_menu(ev);
                    self.push_stats(ev);
                } else {
                    self.result_page(ev, Phase::Town);
                }
            }
            Err(_) => {
                ev.say("No points left to spend.");
                self.result_page(ev, Phase::Town);
            }
        }
    }

    pub(crate) fn render_inventory(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };

        let mut options = Vec::new();
        if c.weapons.is_empty() && c.armors.is_empty() && c.rings.is_empty() {
            ev.say("Your pack holds dust and good intentions.");
        }
        for (i, w) in c.weapons.iter().enumerate() {
            let mut tags = Vec::new();
            if c.equipped_weapon == Some(i) {
                tags.push("equipped");
            }
            if w.damaged {
                tags.push("damaged");
            }
            let suffix = if tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", tags.join(", "))
            };
            options.push(MenuOption::new(
                format!("inv:equip_weapon:{}", i),
                format!("{} ({}){}", w.name, w.damage_die, suffix),
            ));
        }
        for (i, a) in c.armors.iter().enumerate() {
            let mut tags = Vec::new();
            if c.equipped_armor == Some(i) {
                tags.push("equipped");
            }
            if a.damaged {
                tags.push("damaged");
            }
            let suffix = if tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", tags.join(", "))
            };
            options.push(MenuOption::new(
                format!("inv:equip_armor:{}", i),
                format!("{} (AC {}){}", a.name, a.armor_class, suffix),
            ));
        }
        for ring in &c.rings {
            ev.say(format!(
                "On your finger: {}{}.",
                ring.name,
                if ring.cursed { " (cursed)" } else { "" }
            ));
        }
        if c.healing_potions > 0 {
            ev.say(format!("Healing potions: {}.", c.healing_potions));
        }
        for (name, count) in c.potion_uses.iter().filter(|(_, n)| **n > 0) {
            ev.say(format!("{} potions: {}.", name, count));
        }
        for (name, count) in c.spell_uses.iter().filter(|(_, n)| **n > 0) {
            ev.say(format!("Scrolls of {}: {}.", name, count));
        }
        options.push(MenuOption::new("inv:back", "Close the pack"));
        ev.menu(options);
    }

    fn equip_from_pack(&mut self, weapon: bool, index: usize, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };
        let result = if weapon {
            c.equip_weapon(index)
        } else {
            c.equip_armor(index)
        };
        match result {
            Ok(()) => ev.say("You settle it into place."),
            Err(_) => ev.say("Your pack holds no such thing."),
        }
        self.render_inventory(ev);
        self.push_stats(ev);
    }

    pub(crate) fn render_companion_menu(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };
        match &c.companion {
            Some(comp) => {
                ev.say(format!(
                    "{} (tier {}): {}/{} hp.",
                    comp.name, comp.tier, comp.hp, comp.max_hp
                ));
                let mut options = Vec::new();
                if c.healing_potions > 0 && comp.hp < comp.max_hp {
                    options.push(MenuOption::new(
                        "companion:heal",
                        "Share a Healing potion (2d4)",
                    ));
                }
                options.push(MenuOption::new("companion:back", "Back"));
                ev.menu(options);
            }
            None => {
                ev.say("No beast walks beside you. The Summon scroll changes that.");
                self.result_page(ev, Phase::Town);
            }
        }
    }

    fn heal_companion(&mut self, ev: &mut Events) {
        let GameEngine {
            dice, character, ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };
        if !c.take_potion("Healing") {
            ev.say("No Healing potion to share.");
            self.render_companion_menu(ev);
            return;
        }
        let amount = dice.roll(2, 4);
        if let Some(comp) = c.companion.as_mut() {
            let healed = comp.heal(amount);
            ev.say(format!("{} laps it up and mends {} hit points.", comp.name, healed));
        }
        self.render_companion_menu(ev);
        self.push_stats(ev);
    }

    pub(crate) fn render_smithy(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };
        let mut options = Vec::new();
        for (i, w) in c.weapons.iter().enumerate().filter(|(_, w)| w.damaged) {
            options.push(MenuOption::new(
                format!("smith:weapon:{}", i),
                format!("Repair {} ({} gold)", w.name, rules::REPAIR_COST),
            ));
        }
        for (i, a) in c.armors.iter().enumerate().filter(|(_, a)| a.damaged) {
            options.push(MenuOption::new(
                format!("smith:armor:{}", i),
                format!("Repair {} ({} gold)", a.name, rules::REPAIR_COST),
            ));
        }
        if options.is_empty() {
            ev.say("The smith squints at your gear and finds nothing to bill you for.");
        }
        options.push(MenuOption::new("smith:back", "Back"));
        ev.menu(options);
    }

    fn repair_item(&mut self, weapon: bool, index: usize, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };
        let damaged = if weapon {
            c.weapons.get(index).map(|w| w.damaged)
        } else {
            c.armors.get(index).map(|a| a.damaged)
        };
        if damaged != Some(true) {
            ev.say("Nothing there needs the forge.");
            self.render_smithy(ev);
            return;
        }
        if c.spend_gold(rules::REPAIR_COST).is_err() {
            ev.say(format!("The smith wants {} gold up front.", rules::REPAIR_COST));
            self.render_smithy(ev);
            return;
        }
        if weapon {
            if let Some(w) = c.weapons.get_mut(index) {
                w.damaged = false;
            }
        } else if let Some(a) = c.armors.get_mut(index) {
            a.damaged = false;
        }
        self.say_line(ev, "smith.repair", &[]);
        self.render_smithy(ev);
        self.push_stats(ev);
    }

    pub(crate) fn render_temple(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };
        let mut options = Vec::new();
        for (i, r) in c.rings.iter().enumerate().filter(|(_, r)| r.cursed) {
            options.push(MenuOption::new(
                format!("temple:ring:{}", i),
                format!("Cleanse {} ({} gold)", r.name, rules::CLEANSE_COST),
            ));
        }
        if options.is_empty() {
            ev.say("The priests sense no malice on you worth their incense.");
        }
        options.push(MenuOption::new("temple:back", "Back"));
        ev.menu(options);
    }

    fn cleanse_ring(&mut self, index: usize, ev: &mut Events) {
        let Some(c) = self.character.as_mut() else {
            return;
        };
        if c.rings.get(index).map(|r| r.cursed) != Some(true) {
            ev.say("That ring carries no curse.");
            self.render_temple(ev);
            return;
        }
        if c.spend_gold(rules::CLEANSE_COST).is_err() {
            ev.say(format!("The rite costs {} gold.", rules::CLEANSE_COST));
            self.render_temple(ev);
            return;
        }
        if let Some(ring) = c.rings.get_mut(index) {
            ring.cursed = false;
        }
        self.say_line(ev, "temple.cleanse", &[]);
        self.render_temple(ev);
        self.push_stats(ev);
    }

    async fn save_progress(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };
        match c.to_record() {
            Ok(record) => match self.save_store.save(&self.device_id, record).await {
                Ok(()) => ev.say("The town scribe copies your deeds into the chronicle."),
                Err(e) => {
                    tracing::error!(error = %e, "Save failed");
                    ev.say("The scribe's inkwell is dry; your progress was not recorded.");
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Record serialization failed");
                ev.say("The scribe cannot make sense of your story today.");
            }
        }
        self.result_page(ev, Phase::Town);
    }
}

#[derive(Debug, Clone, Copy)]
enum RestService {
    Eat,
    Tavern,
    Pray,
    Sleep,
    Rest,
}

impl RestService {
    fn cost(&self) -> i32 {
        match self {
            RestService::Eat | RestService::Tavern | RestService::Rest => 10,
            RestService::Pray | RestService::Sleep => 0,
        }
    }

    fn attribute(&self) -> Attribute {
        match self {
            RestService::Eat | RestService::Tavern => Attribute::Charisma,
            RestService::Pray => Attribute::Wisdom,
            RestService::Sleep | RestService::Rest => Attribute::Constitution,
        }
    }

    fn flavor(&self) -> &'static str {
        match self {
            RestService::Eat => "Stew, bread, and nobody trying to kill you.",
            RestService::Tavern => "The tavern crowd toasts anyone still breathing.",
            RestService::Pray => "You kneel in the incense dark and speak your fears.",
            RestService::Sleep => "A mattress. An actual mattress.",
            RestService::Rest => "Hot water works on knots that steel put there.",
        }
    }
}
