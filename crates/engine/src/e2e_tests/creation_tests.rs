//! Full creation flow through the public dispatch entry point.

use super::helpers::{last_hud, menu_ids, narrative, Harness};
use crate::game::engine::Phase;

#[tokio::test]
async fn test_creation_easy_flow_reaches_town() {
    let mut h = Harness::new();
    let events = h.engine.welcome().await;
    assert!(menu_ids(&events).contains(&"main:new_game".to_string()));

    let events = h.act("main:new_game").await;
    assert!(menu_ids(&events).contains(&"difficulty:easy".to_string()));

    let events = h.act("difficulty:easy").await;
    assert!(menu_ids(&events).contains(&"intro:continue".to_string()));

    let events = h.act("intro:continue").await;
    assert!(events
        .iter()
        .any(|e| matches!(e, labyrinth_shared::ServerMessage::Prompt { id, .. } if id == "name")));

    let events = h.act_with("prompt:submit", "Ada").await;
    assert!(menu_ids(&events).contains(&"create:roll".to_string()));

    // Seven rolls assigned in descending order: Str 18 ... Per 12.
    let assignments = [
        (18, "Strength"),
        (17, "Dexterity"),
        (16, "Constitution"),
        (15, "Intelligence"),
        (14, "Wisdom"),
        (13, "Charisma"),
        (12, "Perception"),
    ];
    for (i, (value, attr)) in assignments.iter().enumerate() {
        h.dice.queue_rolls([*value]);
        let events = h.act("create:roll").await;
        let ids = menu_ids(&events);
        assert!(ids.contains(&format!("create:assign:{}", attr)));
        assert_eq!(ids.len(), 7 - i);

        if i == assignments.len() - 1 {
            // Finalization: 5d4 hp roll, then 20d6 and ceil(13/1.5)=9 d6 gold.
            h.dice.queue_rolls([12, 70, 30]);
        }
        h.act(&format!("create:assign:{}", attr)).await;
    }

    assert_eq!(h.engine.phase, Phase::Town);
    let c = h.character();
    assert_eq!(c.name, "Ada");
    assert_eq!(c.max_hp, 3 * 16 + 12);
    assert_eq!(c.hp, 60);
    // hp 60 lands outside every low-hp bonus band.
    assert_eq!(c.gold, 100);
}

#[tokio::test]
async fn test_creation_hud_reports_vitals() {
    let mut h = Harness::new();
    h.engine.welcome().await;
    h.act("main:new_game").await;
    h.act("difficulty:easy").await;
    h.act("intro:continue").await;
    h.act_with("prompt:submit", "Ada").await;

    let order = [
        "Strength",
        "Dexterity",
        "Constitution",
        "Intelligence",
        "Wisdom",
        "Charisma",
        "Perception",
    ];
    let mut final_events = Vec::new();
    for (i, attr) in order.iter().enumerate() {
        h.dice.queue_rolls([18 - i as i32]);
        h.act("create:roll").await;
        if i == order.len() - 1 {
            h.dice.queue_rolls([12, 70, 30]);
        }
        final_events = h.act(&format!("create:assign:{}", attr)).await;
    }

    let hud = last_hud(&final_events).expect("town arrival refreshes the HUD");
    assert_eq!(hud.hp, 60);
    assert_eq!(hud.max_hp, 60);
    assert_eq!(hud.gold, 100);
    assert_eq!(hud.level, 1);
    assert!(menu_ids(&final_events).contains(&"town:enter".to_string()));
}

#[tokio::test]
async fn test_roll_must_be_placed_before_next_roll() {
    let mut h = Harness::new();
    h.engine.welcome().await;
    h.act("main:new_game").await;
    h.act("difficulty:normal").await;
    h.act("intro:continue").await;
    h.act_with("prompt:submit", "Brin").await;

    h.dice.queue_rolls([15]);
    h.act("create:roll").await;

    // A second roll with one pending is refused; the assign menu returns.
    let events = h.act("create:roll").await;
    assert!(menu_ids(&events)
        .iter()
        .all(|id| id.starts_with("create:assign:")));
}

#[tokio::test]
async fn test_invalid_action_for_phase_reemits_menu() {
    let mut h = Harness::new();
    h.engine.welcome().await;
    h.act("main:new_game").await;
    assert_eq!(h.engine.phase, Phase::SelectDifficulty);

    let events = h.act("combat:attack").await;
    assert_eq!(h.engine.phase, Phase::SelectDifficulty);
    assert!(menu_ids(&events).contains(&"difficulty:hard".to_string()));
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    let mut h = Harness::new();
    h.engine.welcome().await;
    h.act("main:new_game").await;
    h.act("difficulty:hard").await;
    h.act("intro:continue").await;

    let events = h.act_with("prompt:submit", "   ").await;
    assert!(narrative(&events).contains("gravestone"));
    assert_eq!(h.engine.phase, Phase::CreateName);
}
