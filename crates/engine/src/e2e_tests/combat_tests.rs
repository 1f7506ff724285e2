//! Combat scenarios: examine, fumbles, divine budget, forced Dragons,
//! quest credit, and both revival outcomes.

use super::helpers::{menu_ids, narrative, Harness, DEVICE};
use crate::application::ports::SaveStore;
use crate::game::engine::Phase;
use labyrinth_domain::Attribute;

#[tokio::test]
async fn test_examine_reveals_without_yielding_the_turn() {
    let mut h = Harness::new();
    h.install_hero(); // WIS 17
    h.stage_combat("Goblin", 1);

    // 5d4 = 10 -> 27 > 25: success.
    h.dice.queue_rolls([10]);
    let events = h.act("combat:examine").await;
    let text = narrative(&events);
    assert!(text.contains("20/20 hp"));
    assert!(text.contains("AC 15"));
    assert!(menu_ids(&events).contains(&"combat:after_examine".to_string()));

    // No monster turn happened: both sides untouched.
    assert_eq!(h.character().hp, 40);
    assert_eq!(h.engine.monster.as_ref().map(|m| m.hp), Some(20));
    assert!(h.character().combat.examine_used);

    // Back at the menu, Examine is gone.
    let events = h.act("combat:after_examine").await;
    assert!(!menu_ids(&events).contains(&"combat:examine".to_string()));

    // A stale client retrying gets the refusal, not a second look.
    let events = h.act("combat:examine").await;
    assert!(narrative(&events).contains("already taken your measure"));
}

#[tokio::test]
async fn test_attack_fumble_hurts_the_attacker() {
    let mut h = Harness::new();
    h.install_hero();
    h.stage_combat("Goblin", 1);

    // Raw 5 fumble, 1d4 self-injury of 3, then the goblin's answer misses
    // (6 + 5 = 11 vs AC 21).
    h.dice.queue_rolls([5, 3, 6]);
    let events = h.act("combat:attack").await;

    assert!(narrative(&events).contains("bites back"));
    assert_eq!(h.character().hp, 37);
    assert_eq!(h.engine.monster.as_ref().map(|m| m.hp), Some(20));
}

#[tokio::test]
async fn test_divine_once_per_depth_and_monster_still_acts() {
    let mut h = Harness::new();
    h.install_hero(); // WIS 17 -> modifier +7
    h.stage_combat("Goblin", 2);

    // Raw 8 -> total 15: granted, 3d6; smite for 10; goblin misses back.
    h.dice.queue_rolls([8, 10, 6]);
    let events = h.act("combat:divine").await;
    let text = narrative(&events);
    assert!(text.contains("sears"));
    // The monster ALWAYS answers a prayer.
    assert!(text.contains("misses"));
    assert_eq!(h.engine.monster.as_ref().map(|m| m.hp), Some(10));
    assert!(h.character().depth_flags.divine_used);
    assert!(!menu_ids(&events).contains(&"combat:divine".to_string()));

    // Descending to a fresh level refreshes the budget.
    h.engine.phase = Phase::Labyrinth;
    h.engine.monster = None;
    h.engine.room = None;
    h.dice.queue_rolls([20, 5]); // initiative: player first
    let events = h.act("dng:deeper").await;
    assert!(!h.character().depth_flags.divine_used);
    assert!(menu_ids(&events).contains(&"combat:divine".to_string()));
}

#[tokio::test]
async fn test_fiftieth_encounter_is_always_the_dragon() {
    let mut h = Harness::new();
    h.install_hero();
    h.enter_town();
    h.act("town:enter").await;
    h.engine.encounter_count = 49;

    h.dice.queue_rolls([20, 5]); // initiative: player first
    let events = h.act("dng:deeper").await;

    let monster = h.engine.monster.as_ref().expect("monster engaged");
    assert_eq!(monster.name, "Dragon");
    assert_eq!(monster.hp, 135);
    assert_eq!(monster.ac, 31);
    assert_eq!(h.engine.encounter_count, 50);
    // Charm is never offered against the Dragon.
    assert!(!menu_ids(&events).contains(&"combat:charm".to_string()));
}

#[tokio::test]
async fn test_depth_five_is_always_the_dragon() {
    let mut h = Harness::new();
    h.install_hero();
    h.engine.phase = Phase::Labyrinth;
    h.engine.depth = 4;

    h.dice.queue_rolls([20, 5]);
    h.act("dng:deeper").await;

    assert_eq!(h.engine.depth, 5);
    assert_eq!(
        h.engine.monster.as_ref().map(|m| m.name.clone()),
        Some("Dragon".to_string())
    );
}

#[tokio::test]
async fn test_kill_pays_scaled_rewards_and_credits_quests() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.quests.push(labyrinth_domain::Quest {
            target: "Skeleton".into(),
            kind: labyrinth_domain::QuestKind::Kill,
            goal: 1,
            progress: 0,
            reward_gold: 40,
        });
    }
    h.stage_combat("Skeleton", 3);
    if let Some(m) = h.engine.monster.as_mut() {
        m.hp = 1;
    }

    // Attack raw 19 (+14 STR) beats AC 13; 1d8 rolls 4.
    h.dice.queue_rolls([19, 4]);
    h.dice.queue_ranges([10]); // gold draw from the 4..15 band
    let events = h.act("combat:attack").await;
    let text = narrative(&events);

    // Depth 3 doubles the base rewards: 22 xp -> 44, 10 gold -> 20.
    assert!(text.contains("44 experience and 20 gold"));
    assert!(text.contains("Contract fulfilled: Skeleton (40 gold)"));

    let c = h.character();
    assert_eq!(c.gold, 160);
    assert_eq!(c.xp, 44);
    assert!(c.quests.is_empty());
    assert_eq!(c.stats.quests_completed, 1);
    assert_eq!(c.stats.monsters_defeated, 1);

    // The room is cleared and Continue leads back to the labyrinth menu.
    let events = h.act("page:continue").await;
    assert_eq!(h.engine.phase, Phase::Labyrinth);
    assert!(menu_ids(&events).contains(&"dng:deeper".to_string()));
}

#[tokio::test]
async fn test_revival_failure_wipes_the_save() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.attributes.set(Attribute::Wisdom, 10);
        c.death_count = 2;
        c.hp = 5;
    }
    let record = h.character().to_record().expect("serializes");
    h.save_store
        .save(DEVICE, record)
        .await
        .expect("seed save");

    h.stage_combat("Goblin", 1);
    // Player hits (19+14 vs 15, 1d8=4); goblin answers 19+5=24 vs AC 21
    // and rolls 10 damage: lethal.
    h.dice.queue_rolls([19, 4, 19, 10]);
    let events = h.act("combat:attack").await;
    assert!(menu_ids(&events).contains(&"death:continue".to_string()));
    assert_eq!(h.character().death_count, 3);

    // Revival DC is 15 + 5*3 = 30; 12 + 10 = 22 falls short.
    h.dice.queue_rolls([12]);
    let events = h.act("death:continue").await;
    assert!(narrative(&events).contains("Your story ends"));
    assert_eq!(h.engine.phase, Phase::GameOver);
    assert!(h.engine.character.is_none());
    assert_eq!(
        h.save_store.load(DEVICE).await.expect("store readable"),
        None
    );

    let events = h.act("gameover:continue").await;
    let ids = menu_ids(&events);
    assert!(ids.contains(&"main:new_game".to_string()));
    assert!(!ids.contains(&"main:continue_save".to_string()));
}

#[tokio::test]
async fn test_revival_success_costs_one_of_everything() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.attributes.set(Attribute::Wisdom, 10);
        c.hp = 5;
        c.depth_flags.divine_used = true;
    }
    h.stage_combat("Goblin", 3);

    h.dice.queue_rolls([19, 4, 19, 10]);
    h.act("combat:attack").await;
    assert_eq!(h.engine.phase, Phase::Death);

    // DC 15 + 5*1 = 20; 15 + 10 = 25 clears it.
    h.dice.queue_rolls([15]);
    let events = h.act("death:continue").await;

    let c = h.character();
    assert_eq!(c.hp, 1);
    assert_eq!(c.attribute(Attribute::Strength), 13);
    assert_eq!(c.attribute(Attribute::Wisdom), 9);
    assert!(!c.depth_flags.divine_used);
    assert_eq!(h.engine.depth, 0);
    assert_eq!(h.engine.phase, Phase::Town);
    assert!(menu_ids(&events).contains(&"town:enter".to_string()));
}

#[tokio::test]
async fn test_freeze_skips_the_monster_turn() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.add_spell("Freeze");
    }
    h.stage_combat("Goblin", 1);

    let events = h.act("combat:cast_spell").await;
    assert!(menu_ids(&events).contains(&"combat:spell:Freeze".to_string()));

    let events = h.act("combat:spell:Freeze").await;
    // Frozen: no monster attack roll was consumed, no damage taken.
    assert!(narrative(&events).contains("loses its turn"));
    assert_eq!(h.character().hp, 40);
    assert_eq!(
        h.engine.monster.as_ref().map(|m| m.conditions.freeze_turns),
        Some(0)
    );
}

#[tokio::test]
async fn test_charm_pays_quarter_rewards_and_no_quest_credit() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.attributes.set(Attribute::Charisma, 16);
        c.quests.push(labyrinth_domain::Quest {
            target: "Goblin".into(),
            kind: labyrinth_domain::QuestKind::Kill,
            goal: 1,
            progress: 0,
            reward_gold: 25,
        });
    }
    h.stage_combat("Goblin", 3);

    // DC 20 + 1 = 21; raw 14 + ceil(16/2)=8 -> 22: charmed.
    h.dice.queue_rolls([14]);
    h.dice.queue_ranges([12]); // gold band draw
    let events = h.act("combat:charm").await;
    let text = narrative(&events);
    assert!(text.contains("wanders off"));

    let c = h.character();
    // Quarter of the depth-scaled rewards: xp 50/4 = 12, gold 24/4 = 6.
    assert_eq!(c.xp, 12);
    assert_eq!(c.gold, 106);
    // Charm never credits quests.
    assert_eq!(c.quests.len(), 1);
    assert_eq!(c.quests[0].progress, 0);
    assert!(h.engine.monster.is_none());
}
