//! Inbound action parsing
//!
//! Wire ids stay stable strings (`"town:enter"`, `"combat:aim:head"`); this
//! module turns them into a typed sum once, at the boundary. Unknown ids
//! survive as `Action::Unknown` so the §7 invalid-action path can log them
//! and re-emit the current menu without mutating state.

use std::str::FromStr;

use labyrinth_domain::{Attribute, Difficulty, Zone};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Any `*:continue` id: advance past a result page.
    Continue,
    /// Free-text submission from an active prompt.
    PromptSubmit(Option<String>),
    Main(MainAction),
    DifficultyChosen(Difficulty),
    CreateRoll,
    CreateAssign(Attribute),
    ReviewRate(u8),
    Town(TownAction),
    TrainAttr(Attribute),
    LevelAttr(Attribute),
    Shop(ShopAction),
    Quest(QuestAction),
    Gamble(GambleAction),
    Companion(CompanionAction),
    Inventory(InventoryAction),
    Smith(SmithAction),
    Temple(TempleAction),
    Dungeon(DungeonAction),
    Combat(CombatAction),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    NewGame,
    ContinueSave,
    Leaderboard,
    Review,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TownAction {
    Enter,
    Shop,
    Healer,
    Tavern,
    Eat,
    Pray,
    Sleep,
    Rest,
    Train,
    Level,
    Quests,
    Companion,
    Repair,
    RemoveCurses,
    Gamble,
    Inventory,
    Save,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShopAction {
    Weapons,
    Armor,
    Potions,
    Spells,
    Sell,
    Back,
    Buy(String),
    SellWeapon(usize),
    SellArmor(usize),
    SellRing(usize),
    ConfirmSale,
    CancelSale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestAction {
    Request,
    Accept,
    Decline,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GambleAction {
    Exact,
    Range,
    Stake(i32),
    Guess(i32),
    Low,
    High,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionAction {
    Heal,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryAction {
    EquipWeapon(usize),
    EquipArmor(usize),
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmithAction {
    Weapon(usize),
    Armor(usize),
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempleAction {
    Ring(usize),
    Back,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DungeonAction {
    Deeper,
    Back,
    Divine,
    Listen,
    OpenChest,
    ExamineItems,
    UsePotion,
    Potion(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CombatAction {
    Attack,
    AimMenu,
    Aim(Zone),
    UsePotion,
    Potion(String),
    CastSpell,
    Spell(String),
    LightningFull,
    LightningHalf,
    Divine,
    Charm,
    Run,
    Examine,
    AfterExamine,
    Back,
}

impl Action {
    pub fn parse(id: &str, value: Option<String>) -> Self {
        if id.ends_with(":continue") || id == "continue" {
            return Action::Continue;
        }
        if id == "prompt:submit" {
            return Action::PromptSubmit(value);
        }

        let unknown = || Action::Unknown(id.to_string());
        let mut parts = id.splitn(3, ':');
        let (head, verb, rest) = (
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
            parts.next(),
        );

        match (head, verb) {
            ("main", "new_game") => Action::Main(MainAction::NewGame),
            ("main", "continue_save") => Action::Main(MainAction::ContinueSave),
            ("main", "leaderboard") => Action::Main(MainAction::Leaderboard),
            ("main", "review") => Action::Main(MainAction::Review),
            ("main", "quit") => Action::Main(MainAction::Quit),

            ("difficulty", d) => match Difficulty::from_str(d) {
                Ok(difficulty) => Action::DifficultyChosen(difficulty),
                Err(_) => unknown(),
            },

            ("create", "roll") => Action::CreateRoll,
            ("create", "assign") => match rest.map(Attribute::from_str) {
                Some(Ok(attr)) => Action::CreateAssign(attr),
                _ => unknown(),
            },

            ("review", "rate") => match rest.and_then(|r| r.parse::<u8>().ok()) {
                Some(n @ 1..=5) => Action::ReviewRate(n),
                _ => unknown(),
            },

            ("town", v) => match v {
                "enter" => Action::Town(TownAction::Enter),
                "shop" => Action::Town(TownAction::Shop),
                "healer" => Action::Town(TownAction::Healer),
                "tavern" => Action::Town(TownAction::Tavern),
                "eat" => Action::Town(TownAction::Eat),
                "pray" => Action::Town(TownAction::Pray),
                "sleep" => Action::Town(TownAction::Sleep),
                "rest" => Action::Town(TownAction::Rest),
                "train" => Action::Town(TownAction::Train),
                "level" => Action::Town(TownAction::Level),
                "quests" => Action::Town(TownAction::Quests),
                "companion" => Action::Town(TownAction::Companion),
                "repair" => Action::Town(TownAction::Repair),
                "remove_curses" => Action::Town(TownAction::RemoveCurses),
                "gamble" => Action::Town(TownAction::Gamble),
                "inventory" => Action::Town(TownAction::Inventory),
                "save" => Action::Town(TownAction::Save),
                "quit" => Action::Town(TownAction::Quit),
                _ => unknown(),
            },

            ("train", attr) => match Attribute::from_str(attr) {
                Ok(attr) => Action::TrainAttr(attr),
                Err(_) => unknown(),
            },
            ("level", attr) => match Attribute::from_str(attr) {
                Ok(attr) => Action::LevelAttr(attr),
                Err(_) => unknown(),
            },

            ("shop", v) => match (v, rest) {
                ("weapons", _) => Action::Shop(ShopAction::Weapons),
                ("armor", _) => Action::Shop(ShopAction::Armor),
                ("potions", _) => Action::Shop(ShopAction::Potions),
                ("spells", _) => Action::Shop(ShopAction::Spells),
                ("sell", None) => Action::Shop(ShopAction::Sell),
                ("back", _) => Action::Shop(ShopAction::Back),
                ("buy", Some(name)) => Action::Shop(ShopAction::Buy(name.to_string())),
                ("sell_weapon", Some(i)) => match i.parse() {
                    Ok(i) => Action::Shop(ShopAction::SellWeapon(i)),
                    Err(_) => unknown(),
                },
                ("sell_armor", Some(i)) => match i.parse() {
                    Ok(i) => Action::Shop(ShopAction::SellArmor(i)),
                    Err(_) => unknown(),
                },
                ("sell_ring", Some(i)) => match i.parse() {
                    Ok(i) => Action::Shop(ShopAction::SellRing(i)),
                    Err(_) => unknown(),
                },
                ("confirm_sale", _) => Action::Shop(ShopAction::ConfirmSale),
                ("cancel_sale", _) => Action::Shop(ShopAction::CancelSale),
                _ => unknown(),
            },

            ("quest", v) => match v {
                "request" => Action::Quest(QuestAction::Request),
                "accept" => Action::Quest(QuestAction::Accept),
                "decline" => Action::Quest(QuestAction::Decline),
                "back" => Action::Quest(QuestAction::Back),
                _ => unknown(),
            },

            ("gamble", v) => match (v, rest) {
                ("exact", _) => Action::Gamble(GambleAction::Exact),
                ("range", _) => Action::Gamble(GambleAction::Range),
                ("stake", Some(n)) => match n.parse() {
                    Ok(n) => Action::Gamble(GambleAction::Stake(n)),
                    Err(_) => unknown(),
                },
                ("guess", Some(n)) => match n.parse() {
                    Ok(n) => Action::Gamble(GambleAction::Guess(n)),
                    Err(_) => unknown(),
                },
                ("low", _) => Action::Gamble(GambleAction::Low),
                ("high", _) => Action::Gamble(GambleAction::High),
                ("back", _) => Action::Gamble(GambleAction::Back),
                _ => unknown(),
            },

            ("companion", v) => match v {
                "heal" => Action::Companion(CompanionAction::Heal),
                "back" => Action::Companion(CompanionAction::Back),
                _ => unknown(),
            },

            ("inv", v) => match (v, rest) {
                ("equip_weapon", Some(i)) => match i.parse() {
                    Ok(i) => Action::Inventory(InventoryAction::EquipWeapon(i)),
                    Err(_) => unknown(),
                },
                ("equip_armor", Some(i)) => match i.parse() {
                    Ok(i) => Action::Inventory(InventoryAction::EquipArmor(i)),
                    Err(_) => unknown(),
                },
                ("back", _) => Action::Inventory(InventoryAction::Back),
                _ => unknown(),
            },

            ("smith", v) => match (v, rest) {
                ("weapon", Some(i)) => match i.parse() {
                    Ok(i) => Action::Smith(SmithAction::Weapon(i)),
                    Err(_) => unknown(),
                },
                ("armor", Some(i)) => match i.parse() {
                    Ok(i) => Action::Smith(SmithAction::Armor(i)),
                    Err(_) => unknown(),
                },
                ("back", _) => Action::Smith(SmithAction::Back),
                _ => unknown(),
            },

            ("temple", v) => match (v, rest) {
                ("ring", Some(i)) => match i.parse() {
                    Ok(i) => Action::Temple(TempleAction::Ring(i)),
                    Err(_) => unknown(),
                },
                ("back", _) => Action::Temple(TempleAction::Back),
                _ => unknown(),
            },

            ("dng", v) => match (v, rest) {
                ("deeper", _) => Action::Dungeon(DungeonAction::Deeper),
                ("back", _) => Action::Dungeon(DungeonAction::Back),
                ("divine", _) => Action::Dungeon(DungeonAction::Divine),
                ("listen", _) => Action::Dungeon(DungeonAction::Listen),
                ("open_chest", _) => Action::Dungeon(DungeonAction::OpenChest),
                ("examine_items", _) => Action::Dungeon(DungeonAction::ExamineItems),
                ("use_potion", _) => Action::Dungeon(DungeonAction::UsePotion),
                ("potion", Some(name)) => Action::Dungeon(DungeonAction::Potion(name.to_string())),
                _ => unknown(),
            },

            ("combat", v) => match (v, rest) {
                ("attack", _) => Action::Combat(CombatAction::Attack),
                ("aim", None) => Action::Combat(CombatAction::AimMenu),
                ("aim", Some(zone)) => match Zone::from_str(zone) {
                    Ok(zone) => Action::Combat(CombatAction::Aim(zone)),
                    Err(_) => unknown(),
                },
                ("use_potion", _) => Action::Combat(CombatAction::UsePotion),
                ("potion", Some(name)) => Action::Combat(CombatAction::Potion(name.to_string())),
                ("cast_spell", _) => Action::Combat(CombatAction::CastSpell),
                ("spell", Some("lightning:full")) => Action::Combat(CombatAction::LightningFull),
                ("spell", Some("lightning:half")) => Action::Combat(CombatAction::LightningHalf),
                ("spell", Some(name)) => Action::Combat(CombatAction::Spell(name.to_string())),
                ("divine", _) => Action::Combat(CombatAction::Divine),
                ("charm", _) => Action::Combat(CombatAction::Charm),
                ("run", _) => Action::Combat(CombatAction::Run),
                ("examine", _) => Action::Combat(CombatAction::Examine),
                ("after_examine", _) => Action::Combat(CombatAction::AfterExamine),
                ("back", _) => Action::Combat(CombatAction::Back),
                _ => unknown(),
            },

            _ => unknown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_continue_suffix_is_continue() {
        assert_eq!(Action::parse("town:continue", None), Action::Continue);
        assert_eq!(Action::parse("combat:continue", None), Action::Continue);
    }

    #[test]
    fn test_aim_zone_parses() {
        assert_eq!(
            Action::parse("combat:aim:head", None),
            Action::Combat(CombatAction::Aim(Zone::Head))
        );
        assert_eq!(
            Action::parse("combat:aim", None),
            Action::Combat(CombatAction::AimMenu)
        );
    }

    #[test]
    fn test_create_assign_carries_attribute() {
        assert_eq!(
            Action::parse("create:assign:Wisdom", None),
            Action::CreateAssign(Attribute::Wisdom)
        );
    }

    #[test]
    fn test_buy_keeps_item_name_with_spaces() {
        assert_eq!(
            Action::parse("shop:buy:Long Sword", None),
            Action::Shop(ShopAction::Buy("Long Sword".into()))
        );
    }

    #[test]
    fn test_lightning_power_variants() {
        assert_eq!(
            Action::parse("combat:spell:lightning:full", None),
            Action::Combat(CombatAction::LightningFull)
        );
        assert_eq!(
            Action::parse("combat:spell:lightning:half", None),
            Action::Combat(CombatAction::LightningHalf)
        );
    }

    #[test]
    fn test_review_rating_bounds() {
        assert_eq!(Action::parse("review:rate:5", None), Action::ReviewRate(5));
        assert!(matches!(
            Action::parse("review:rate:6", None),
            Action::Unknown(_)
        ));
    }

    #[test]
    fn test_garbage_is_unknown() {
        assert!(matches!(
            Action::parse("dance:macarena", None),
            Action::Unknown(_)
        ));
    }
}
