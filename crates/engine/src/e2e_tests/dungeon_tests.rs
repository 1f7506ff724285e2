//! Labyrinth navigation: chests, listening, and the trap gauntlet.

use super::helpers::{menu_ids, narrative, Harness};
use crate::game::engine::{Phase, Room};

fn cleared_room_with_chest() -> Room {
    Room {
        monster_name: "Goblin".into(),
        chest_present: true,
        chest_opened: false,
        background: "stone_corridor".into(),
        cleared: true,
    }
}

#[tokio::test]
async fn test_chest_opens_only_after_the_room_is_cleared() {
    let mut h = Harness::new();
    h.install_hero();
    h.engine.phase = Phase::Labyrinth;
    h.engine.room = Some(Room {
        cleared: false,
        ..cleared_room_with_chest()
    });

    // Uncleared: the menu never offers the chest.
    let events = h.act("nonsense:action").await;
    assert!(!menu_ids(&events).contains(&"dng:open_chest".to_string()));

    // Cleared: there it is.
    h.engine.room = Some(cleared_room_with_chest());
    let events = h.act("nonsense:action").await;
    assert!(menu_ids(&events).contains(&"dng:open_chest".to_string()));

    // 55 gold inside, no ring this time.
    h.dice.queue_ranges([55]);
    h.dice.queue_fractions([1.0]);
    let events = h.act("dng:open_chest").await;
    assert!(narrative(&events).contains("55 gold"));
    assert_eq!(h.character().gold, 155);
    assert!(!menu_ids(&events).contains(&"dng:open_chest".to_string()));
}

#[tokio::test]
async fn test_chest_can_carry_a_ring_that_binds() {
    let mut h = Harness::new();
    h.install_hero();
    h.engine.phase = Phase::Labyrinth;
    h.engine.room = Some(cleared_room_with_chest());

    h.dice.queue_ranges([30, 2]); // 30 gold, then the ring magnitude band
    h.dice.queue_fractions([0.0, 0.0]); // ring present, first ring row
    let events = h.act("dng:open_chest").await;

    let text = narrative(&events);
    assert!(text.contains("will not move"));
    let c = h.character();
    assert_eq!(c.rings.len(), 1);
    assert_eq!(c.rings[0].name, "Ring of Might");
    assert_eq!(c.attribute(labyrinth_domain::Attribute::Strength), 16);
}

#[tokio::test]
async fn test_listen_is_once_per_depth() {
    let mut h = Harness::new();
    h.install_hero();
    h.engine.phase = Phase::Labyrinth;

    // PER 10 + raw 16 = 26 > 25: a name surfaces.
    h.dice.queue_rolls([16]);
    let events = h.act("dng:listen").await;
    assert!(narrative(&events).contains("is moving"));
    assert!(h.character().depth_flags.listen_used);
    assert!(!menu_ids(&events).contains(&"dng:listen".to_string()));

    let events = h.act("dng:listen").await;
    assert!(narrative(&events).contains("already pressed your ear"));
}

#[tokio::test]
async fn test_field_healing_between_fights() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.hp = 10;
        c.add_potion("Healing");
        c.add_potion("Strength");
    }
    h.engine.phase = Phase::Labyrinth;

    let events = h.act("dng:use_potion").await;
    let ids = menu_ids(&events);
    // Battle draughts are per-combat; the field menu offers restoratives only.
    assert!(ids.contains(&"dng:potion:Healing".to_string()));
    assert!(!ids.iter().any(|id| id.contains("Strength")));

    // ceil(12/2) * 2d2 with 2d2 = 3 -> 18 healed.
    h.dice.queue_rolls([3]);
    let events = h.act("dng:potion:Healing").await;
    assert!(narrative(&events).contains("18 hit points return"));
    assert_eq!(h.character().hp, 28);
    assert_eq!(h.character().healing_potions, 0);
}

#[tokio::test]
async fn test_trap_on_descent_can_poison() {
    let mut h = Harness::new();
    h.install_hero();
    h.engine.phase = Phase::Labyrinth;

    // Monster pick ~ Goblin band; chest skipped; trap fires; trap row 2
    // (Poison Needle, dc 18); dodge raw 6 + ceil(14... DEX 10 -> +5 = 11 < 18;
    // 1d4 damage 2; initiative player first.
    h.dice.queue_fractions([0.35, 1.0, 0.0]);
    h.dice.queue_ranges([2]);
    h.dice.queue_rolls([6, 2, 20, 5]);
    let events = h.act("dng:deeper").await;

    let text = narrative(&events);
    assert!(text.contains("needle pricks"));
    assert!(text.contains("Venom"));
    let c = h.character();
    assert_eq!(c.hp, 38);
    assert!(c.combat.debuffs.is_poisoned());
    assert_eq!(h.engine.phase, Phase::Combat);
}
