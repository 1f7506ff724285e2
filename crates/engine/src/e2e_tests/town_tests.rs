//! Town services, the shop economy, gambling, and the save/continue loop.

use super::helpers::{menu_ids, narrative, Harness, DEVICE};
use crate::application::ports::{Leaderboard, SaveStore};
use crate::game::engine::Phase;

#[tokio::test]
async fn test_healer_heals_everything_for_forty_gold() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.hp = 10;
        c.combat.debuffs.poison_turns = 2;
    }
    h.enter_town();

    let events = h.act("town:healer").await;
    assert!(narrative(&events).contains("wounds close"));

    let c = h.character();
    assert_eq!(c.hp, c.max_hp);
    assert_eq!(c.gold, 60);
    assert_eq!(c.combat.debuffs.poison_turns, 0);

    let events = h.act("page:continue").await;
    assert!(menu_ids(&events).contains(&"town:healer".to_string()));
}

#[tokio::test]
async fn test_rest_services_are_once_per_visit() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.hp = 10;
    }
    h.enter_town();

    // CHA 10 + roll 18 = 28 > 25: the meal helps (max_hp 40 -> 14 back).
    h.dice.queue_rolls([18]);
    let events = h.act("town:eat").await;
    assert!(narrative(&events).contains("14 hit points restored"));
    assert_eq!(h.character().hp, 24);
    assert!(h.character().town_flags.ate);

    // The option disappears for the rest of the visit.
    let events = h.act("page:continue").await;
    assert!(!menu_ids(&events).contains(&"town:eat".to_string()));

    // Leaving for the labyrinth and coming back resets the visit.
    h.act("town:enter").await;
    let events = h.act("dng:back").await;
    assert!(!h.character().town_flags.ate);
    assert!(menu_ids(&events).contains(&"town:eat".to_string()));
}

#[tokio::test]
async fn test_buy_then_sell_round_trip() {
    let mut h = Harness::new();
    h.install_hero();
    h.enter_town();

    h.act("town:shop").await;
    h.act("shop:weapons").await;
    let events = h.act("shop:buy:Dagger").await;
    // A weapon is already equipped, so the dagger goes to the pack.
    assert!(narrative(&events).contains("goes into your pack"));
    assert_eq!(h.character().gold, 90);
    assert_eq!(h.character().weapons.len(), 2);

    h.act("shop:back").await;
    let events = h.act("shop:sell").await;
    assert!(menu_ids(&events).contains(&"shop:sell_weapon:1".to_string()));

    // Haggle swing pinned to 1.0: offer = floor(10 * 0.5) = 5.
    h.dice.queue_fractions([0.5]);
    let events = h.act("shop:sell_weapon:1").await;
    assert!(narrative(&events).contains("5 gold"));

    h.act("shop:confirm_sale").await;
    assert_eq!(h.character().gold, 95);
    assert_eq!(h.character().weapons.len(), 1);
}

#[tokio::test]
async fn test_equipped_gear_never_lists_for_sale() {
    let mut h = Harness::new();
    h.install_hero();
    h.enter_town();

    h.act("town:shop").await;
    let events = h.act("shop:sell").await;
    // The only weapon is equipped; nothing sellable.
    assert!(!menu_ids(&events)
        .iter()
        .any(|id| id.starts_with("shop:sell_weapon:")));
    assert!(narrative(&events).contains("Nothing in that pack"));
}

#[tokio::test]
async fn test_gamble_high_call_pays_double() {
    let mut h = Harness::new();
    h.install_hero();
    h.enter_town();

    h.act("town:gamble").await;
    h.act("gamble:range").await;
    let events = h.act("gamble:stake:10").await;
    assert!(menu_ids(&events).contains(&"gamble:high".to_string()));

    // The den rolls a d20: 15 is high.
    h.dice.queue_rolls([15]);
    let events = h.act("gamble:high").await;
    assert!(narrative(&events).contains("House pays 20"));
    assert_eq!(h.character().gold, 110);
}

#[tokio::test]
async fn test_gamble_exact_miss_keeps_the_stake() {
    let mut h = Harness::new();
    h.install_hero();
    h.enter_town();

    h.act("town:gamble").await;
    h.act("gamble:exact").await;
    h.act("gamble:stake:25").await;

    h.dice.queue_rolls([7]);
    let events = h.act("gamble:guess:8").await;
    assert!(narrative(&events).contains("retirement fund"));
    assert_eq!(h.character().gold, 75);
}

#[tokio::test]
async fn test_save_then_quit_then_continue() {
    let mut h = Harness::new();
    h.install_hero();
    h.enter_town();

    let events = h.act("town:save").await;
    assert!(narrative(&events).contains("chronicle"));
    assert!(h
        .save_store
        .load(DEVICE)
        .await
        .expect("store readable")
        .is_some());

    h.act("page:continue").await;
    let events = h.act("town:quit").await;
    assert!(h.engine.character.is_none());
    assert!(menu_ids(&events).contains(&"main:continue_save".to_string()));

    let events = h.act("main:continue_save").await;
    assert_eq!(h.engine.phase, Phase::Town);
    assert_eq!(h.character().name, "Tess");
    assert!(menu_ids(&events).contains(&"town:enter".to_string()));
}

#[tokio::test]
async fn test_victory_continue_commits_save_and_leaderboard() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.stats.monsters_defeated = 50;
        c.stats.gold_earned = 900;
    }
    h.engine.phase = Phase::Victory;

    let events = h.act("victory:continue").await;
    assert!(h.engine.character.is_none());

    let entries = h.leaderboard.recent(10).await.expect("board readable");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Tess");
    assert_eq!(entries[0].monsters_defeated, 50);
    assert_eq!(entries[0].weapon.as_deref(), Some("Short Sword"));

    // The save survives the win, so the menu offers Continue.
    assert!(h
        .save_store
        .load(DEVICE)
        .await
        .expect("store readable")
        .is_some());
    assert!(menu_ids(&events).contains(&"main:continue_save".to_string()));
}

#[tokio::test]
async fn test_review_without_endpoint_fails_visibly() {
    let mut h = Harness::new();
    h.engine.welcome().await;

    h.act("main:review").await;
    let events = h.act("review:rate:4").await;
    assert!(events
        .iter()
        .any(|e| matches!(e, labyrinth_shared::ServerMessage::Prompt { id, .. } if id == "review")));

    let events = h.act_with("prompt:submit", "Lost three characters. Five stars.").await;
    assert!(narrative(&events).contains("refuses your words"));

    // Gameplay is unaffected: back to the main menu.
    let events = h.act("page:continue").await;
    assert!(menu_ids(&events).contains(&"main:new_game".to_string()));
}

#[tokio::test]
async fn test_training_charges_and_caps() {
    let mut h = Harness::new();
    h.install_hero();
    if let Some(c) = h.engine.character.as_mut() {
        c.gold = 2000;
    }
    h.enter_town();

    h.act("town:train").await;
    let events = h.act("train:Strength").await;
    assert!(narrative(&events).contains("Strength rises to 15"));
    assert_eq!(h.character().gold, 2000 - 50);

    // Second session costs 100.
    h.act("page:continue").await;
    h.act("train:Strength").await;
    assert_eq!(h.character().gold, 2000 - 150);

    // Burn the remaining five sessions, then hit the lifetime cap.
    for _ in 0..5 {
        h.act("page:continue").await;
        h.act("train:Constitution").await;
    }
    h.act("page:continue").await;
    let events = h.act("train:Wisdom").await;
    assert!(narrative(&events).contains("everything a body can hold"));
    assert_eq!(h.character().attribute(labyrinth_domain::Attribute::Wisdom), 17);
}

#[tokio::test]
async fn test_save_failure_is_reported_and_play_continues() {
    use crate::application::ports::{MockSaveStore, StoreError};
    use crate::infrastructure::persistence::{MemoryLeaderboard, UnconfiguredReviewSink};
    use crate::test_support::SharedDice;
    use std::sync::Arc;

    let mut store = MockSaveStore::new();
    store
        .expect_save()
        .returning(|_, _| Err(StoreError::Database("disk on fire".into())));
    store.expect_load().returning(|_| Ok(None));

    let mut engine = crate::game::GameEngine::new(
        DEVICE,
        Arc::new(labyrinth_domain::ContentTables::builtin()),
        Arc::new(store),
        Arc::new(MemoryLeaderboard::new()),
        Arc::new(UnconfiguredReviewSink),
        Box::new(SharedDice::default()),
    );

    let mut attrs = labyrinth_domain::Attributes::uniform(10);
    attrs.set(labyrinth_domain::Attribute::Strength, 14);
    engine.character = Some(labyrinth_domain::Character::new(
        "Tess",
        labyrinth_domain::Difficulty::Normal,
        DEVICE,
        attrs,
        40,
        100,
    ));
    engine.phase = Phase::Town;

    let events = engine.dispatch("town:save", None).await;
    assert!(narrative(&events).contains("was not recorded"));

    // The failure is informational; the town menu comes right back.
    let events = engine.dispatch("page:continue", None).await;
    assert!(menu_ids(&events).contains(&"town:enter".to_string()));
}
