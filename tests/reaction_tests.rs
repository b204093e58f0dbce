//! Reaction scheduler integration tests.
//!
//! These tests drive `Game::fire_event` and the action delegate directly to
//! check registration, once-retirement, scoping, cascades and collapsing.

use std::sync::{Arc, Mutex};

use deckbuilder_reactions::{
    ActionResult, CardDefinition, CardInstanceId, CardKey, CardRegistry, CardType, Cost, EngineConfig, EngineError,
    EventKind, Game, GameAction, GameEvent, PlayerId, ReactionCondition, ReactionId, ReactionOutcome,
    ReactionTemplate, TriggerContext, Zone,
};

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);
const P2: PlayerId = PlayerId::new(2);

type Log = Arc<Mutex<Vec<String>>>;

fn registry() -> Arc<CardRegistry> {
    let registry = CardRegistry::new()
        .with_card(CardDefinition::new("copper", "Copper", Cost::treasure(0)).with_type(CardType::Treasure))
        .unwrap()
        .with_card(CardDefinition::new("estate", "Estate", Cost::treasure(2)).with_type(CardType::Victory))
        .unwrap()
        .with_card(CardDefinition::new("village", "Village", Cost::treasure(3)).with_type(CardType::Action))
        .unwrap()
        .with_card(
            CardDefinition::new("militia", "Militia", Cost::treasure(4))
                .with_type(CardType::Action)
                .with_type(CardType::Attack),
        )
        .unwrap()
        .with_card(
            CardDefinition::new("beggar", "Beggar", Cost::treasure(2))
                .with_type(CardType::Action)
                .with_type(CardType::Reaction),
        )
        .unwrap();
    Arc::new(registry)
}

fn new_game(players: usize) -> Game {
    Game::new(EngineConfig::new(players).with_seed(7), registry()).unwrap()
}

fn spawn(game: &mut Game, key: &str, zone: Zone) -> CardInstanceId {
    game.state_mut().spawn_card(&CardKey::new(key), zone).unwrap()
}

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A template that appends its id to the log whenever it fires.
fn recorder(id: &str, kind: EventKind, owner: PlayerId, log: &Log) -> ReactionTemplate {
    let log = Arc::clone(log);
    let label = id.to_string();
    ReactionTemplate::new(id, kind, owner, move |_game, _ctx| {
        log.lock().unwrap().push(label.clone());
        Box::pin(async { Ok(ReactionOutcome::Resolved) })
    })
}

fn beggar_condition() -> ReactionCondition {
    ReactionCondition::TriggeredByOpponent.and(ReactionCondition::CardHasType(CardType::Attack))
}

/// Unregistering an unknown id on an empty registry does nothing.
#[tokio::test]
async fn test_unregister_unknown_on_empty_registry() {
    let mut game = new_game(2);

    assert!(game.reactions_mut().unregister_trigger("nonexistent:id").is_none());
    assert!(game.reactions().is_empty());
}

/// Unregistering an unknown id leaves other registrations alone.
#[tokio::test]
async fn test_unregister_is_idempotent() {
    let mut game = new_game(2);
    let log = new_log();
    game.register_reaction_template(recorder("a", EventKind::CardPlayed, P0, &log))
        .unwrap();

    game.unregister_trigger(&ReactionId::from("nonexistent:id"));
    assert_eq!(game.reactions().len(), 1);

    game.unregister_trigger(&ReactionId::from("a"));
    game.unregister_trigger(&ReactionId::from("a"));
    assert!(game.reactions().is_empty());
}

/// A repeatable Beggar reacts to every attack an opponent plays, with the
/// event it matched.
#[tokio::test]
async fn test_beggar_reacts_to_each_attack() {
    let mut game = new_game(2);
    let beggar = spawn(&mut game, "beggar", Zone::Hand(P0));
    let militia = spawn(&mut game, "militia", Zone::Play(P1));
    let village = spawn(&mut game, "village", Zone::Play(P1));

    let seen: Arc<Mutex<Vec<TriggerContext>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_in_effect = Arc::clone(&seen);
    let id = ReactionId::for_card(&CardKey::new("beggar"), beggar, EventKind::CardPlayed);
    assert_eq!(id.as_str(), format!("beggar:{}:cardPlayed", beggar.raw()));

    let template = ReactionTemplate::new(id.clone(), EventKind::CardPlayed, P0, move |_game, ctx| {
        seen_in_effect.lock().unwrap().push(ctx);
        Box::pin(async { Ok(ReactionOutcome::Resolved) })
    })
    .with_condition(beggar_condition())
    .with_source(beggar, "beggar");
    game.register_reaction_template(template).unwrap();

    let attack = GameEvent::card_played(P1, militia);
    let report = game.fire_event(attack.clone()).await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.outcome_of(id.as_str()), Some(ReactionOutcome::Resolved));
    {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].event, attack);
        assert_eq!(seen[0].owner, P0);
        assert_eq!(seen[0].reaction_id, id);
    }

    game.fire_event(attack).await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2, "repeatable template fires again");

    let not_attack = game.fire_event(GameEvent::card_played(P1, village)).await.unwrap();
    assert!(not_attack.is_empty());

    let own_attack = spawn(&mut game, "militia", Zone::Play(P0));
    game.fire_event(GameEvent::card_played(P0, own_attack)).await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2, "own attacks are ignored");
    assert!(game.reactions().is_registered(id.as_str()));
}

/// A once template fires for the first matching event only and retires.
#[tokio::test]
async fn test_once_template_fires_once() {
    let mut game = new_game(2);
    let log = new_log();
    let militia = spawn(&mut game, "militia", Zone::Play(P1));

    game.register_reaction_template(recorder("t2", EventKind::CardPlayed, P0, &log).once())
        .unwrap();

    game.fire_event(GameEvent::card_played(P1, militia)).await.unwrap();
    let second = game.fire_event(GameEvent::card_played(P1, militia)).await.unwrap();

    assert_eq!(entries(&log), vec!["t2"]);
    assert!(second.is_empty());
    assert!(!game.reactions().is_registered("t2"));

    // Leaving hand after retirement still unregisters without complaint.
    game.unregister_trigger(&ReactionId::from("t2"));
}

/// A once template whose condition fails stays registered.
#[tokio::test]
async fn test_once_waits_for_matching_event() {
    let mut game = new_game(2);
    let log = new_log();
    let village = spawn(&mut game, "village", Zone::Play(P1));
    let militia = spawn(&mut game, "militia", Zone::Play(P1));

    game.register_reaction_template(
        recorder("once", EventKind::CardPlayed, P0, &log)
            .with_condition(beggar_condition())
            .once(),
    )
    .unwrap();

    game.fire_event(GameEvent::card_played(P1, village)).await.unwrap();
    assert!(game.reactions().is_registered("once"));

    game.fire_event(GameEvent::card_played(P1, militia)).await.unwrap();
    assert!(!game.reactions().is_registered("once"));
    assert_eq!(entries(&log), vec!["once"]);
}

/// Templates only see events of the kind they listen for.
#[tokio::test]
async fn test_scoped_matching_by_event_kind() {
    let mut game = new_game(2);
    let log = new_log();
    let card = spawn(&mut game, "militia", Zone::Discard(P1));

    game.register_reaction_template(recorder("played", EventKind::CardPlayed, P0, &log))
        .unwrap();

    game.fire_event(GameEvent::card_gained(P1, card, Zone::Discard(P1)))
        .await
        .unwrap();
    game.fire_event(GameEvent::card_trashed(P1, card, Zone::Hand(P1)))
        .await
        .unwrap();

    assert!(entries(&log).is_empty());
}

/// Reactions to an event raised inside an effect finish before that effect
/// continues.
#[tokio::test]
async fn test_cascade_is_depth_first() {
    let mut game = new_game(2);
    let log = new_log();
    let victim = spawn(&mut game, "estate", Zone::Hand(P0));
    let gained = spawn(&mut game, "copper", Zone::Discard(P0));

    let outer_log = Arc::clone(&log);
    let outer = ReactionTemplate::new("outer", EventKind::CardGained, P0, move |game, _ctx| {
        let log = Arc::clone(&outer_log);
        Box::pin(async move {
            log.lock().unwrap().push("outer:start".to_string());
            game.run_game_action(GameAction::TrashCard { card: victim }).await?;
            log.lock().unwrap().push("outer:end".to_string());
            Ok(ReactionOutcome::Resolved)
        })
    });
    game.register_reaction_template(outer).unwrap();
    game.register_reaction_template(recorder("inner-1", EventKind::CardTrashed, P0, &log))
        .unwrap();
    game.register_reaction_template(recorder("inner-2", EventKind::CardTrashed, P1, &log))
        .unwrap();
    game.register_reaction_template(recorder("sibling", EventKind::CardGained, P1, &log))
        .unwrap();

    game.fire_event(GameEvent::card_gained(P0, gained, Zone::Discard(P0)))
        .await
        .unwrap();

    assert_eq!(
        entries(&log),
        vec!["outer:start", "inner-1", "inner-2", "outer:end", "sibling"]
    );
    assert_eq!(game.state().trash(), &[victim]);
    assert_eq!(game.reactions().depth(), 0);
}

/// Same-event templates fire in registration order.
#[tokio::test]
async fn test_fifo_order() {
    let mut game = new_game(2);
    let log = new_log();
    for id in ["c", "a", "b"] {
        game.register_reaction_template(recorder(id, EventKind::StartTurn, P0, &log))
            .unwrap();
    }

    game.fire_event(GameEvent::new(EventKind::StartTurn, P0)).await.unwrap();

    assert_eq!(entries(&log), vec!["c", "a", "b"]);
}

/// Two Beggars in two different hands both react to one attack.
#[tokio::test]
async fn test_multiple_instances_fire_independently() {
    let mut game = new_game(3);
    let log = new_log();
    let beggar_p0 = spawn(&mut game, "beggar", Zone::Hand(P0));
    let beggar_p2 = spawn(&mut game, "beggar", Zone::Hand(P2));
    let militia = spawn(&mut game, "militia", Zone::Play(P1));

    for (owner, card) in [(P0, beggar_p0), (P2, beggar_p2)] {
        let id = ReactionId::for_card(&CardKey::new("beggar"), card, EventKind::CardPlayed);
        game.register_reaction_template(
            recorder(id.as_str(), EventKind::CardPlayed, owner, &log)
                .with_condition(beggar_condition())
                .with_source(card, "beggar")
                .allow_multiple_instances(),
        )
        .unwrap();
    }

    let report = game.fire_event(GameEvent::card_played(P1, militia)).await.unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(entries(&log).len(), 2);
}

/// Two copies in the same hand stack when multiple instances are allowed.
#[tokio::test]
async fn test_same_hand_copies_stack_when_allowed() {
    let mut game = new_game(2);
    let log = new_log();
    let first = spawn(&mut game, "beggar", Zone::Hand(P0));
    let second = spawn(&mut game, "beggar", Zone::Hand(P0));
    let militia = spawn(&mut game, "militia", Zone::Play(P1));

    for card in [first, second] {
        let id = ReactionId::for_card(&CardKey::new("beggar"), card, EventKind::CardPlayed);
        game.register_reaction_template(
            recorder(id.as_str(), EventKind::CardPlayed, P0, &log)
                .with_source(card, "beggar")
                .allow_multiple_instances(),
        )
        .unwrap();
    }

    game.fire_event(GameEvent::card_played(P1, militia)).await.unwrap();
    assert_eq!(entries(&log).len(), 2);
}

/// Without `allow_multiple_instances`, copies of one card owned by one player
/// collapse to a single firing per event.
#[tokio::test]
async fn test_single_instance_copies_collapse() {
    let mut game = new_game(2);
    let log = new_log();
    let first = spawn(&mut game, "beggar", Zone::Hand(P0));
    let second = spawn(&mut game, "beggar", Zone::Hand(P0));
    let other_owner = spawn(&mut game, "beggar", Zone::Hand(P1));
    let militia = spawn(&mut game, "militia", Zone::Play(P1));

    for (owner, card) in [(P0, first), (P0, second), (P1, other_owner)] {
        let id = ReactionId::for_card(&CardKey::new("beggar"), card, EventKind::CardPlayed);
        game.register_reaction_template(
            recorder(id.as_str(), EventKind::CardPlayed, owner, &log).with_source(card, "beggar"),
        )
        .unwrap();
    }

    let report = game.fire_event(GameEvent::card_played(P1, militia)).await.unwrap();

    let first_id = format!("beggar:{}:cardPlayed", first.raw());
    let other_id = format!("beggar:{}:cardPlayed", other_owner.raw());
    assert_eq!(entries(&log), vec![first_id, other_id]);
    assert_eq!(report.len(), 2);

    // Collapsing is per event; the template is still registered.
    assert_eq!(game.reactions().len(), 3);
}

/// Registering an id that is already active is rejected and keeps the
/// original registration.
#[tokio::test]
async fn test_duplicate_id_rejected() {
    let mut game = new_game(2);
    let log = new_log();
    game.register_reaction_template(recorder("dup", EventKind::CardPlayed, P0, &log))
        .unwrap();

    let err = game
        .register_reaction_template(recorder("dup", EventKind::CardGained, P1, &log))
        .unwrap_err();

    assert!(matches!(err, EngineError::DuplicateReaction(ref id) if id.as_str() == "dup"));
    let kept = game.reactions().get("dup").unwrap();
    assert_eq!(kept.listening_for, EventKind::CardPlayed);
    assert_eq!(kept.player_id, P0);
}

/// A once template is retired before its effect runs, so an event its own
/// effect causes cannot fire it again.
#[tokio::test]
async fn test_once_retired_before_effect() {
    let mut game = new_game(2);
    let first = spawn(&mut game, "estate", Zone::Hand(P0));
    let second = spawn(&mut game, "estate", Zone::Hand(P0));
    let count = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&count);
    let template = ReactionTemplate::new("chain", EventKind::CardTrashed, P0, move |game, _ctx| {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            *counter.lock().unwrap() += 1;
            assert!(!game.reactions().is_registered("chain"));
            game.run_game_action(GameAction::TrashCard { card: second }).await?;
            Ok(ReactionOutcome::Resolved)
        })
    })
    .once();
    game.register_reaction_template(template).unwrap();

    game.run_game_action(GameAction::TrashCard { card: first }).await.unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
    assert_eq!(game.state().trash().len(), 2);
}

/// A template unregistered by an earlier effect of the same dispatch does not
/// fire.
#[tokio::test]
async fn test_unregister_during_dispatch_skips_template() {
    let mut game = new_game(2);
    let log = new_log();

    let remover = ReactionTemplate::new("remover", EventKind::StartTurn, P0, |game, _ctx| {
        Box::pin(async move {
            game.unregister_trigger(&ReactionId::from("victim"));
            Ok(ReactionOutcome::Resolved)
        })
    });
    game.register_reaction_template(remover).unwrap();
    game.register_reaction_template(recorder("victim", EventKind::StartTurn, P0, &log))
        .unwrap();

    let report = game.fire_event(GameEvent::new(EventKind::StartTurn, P0)).await.unwrap();

    assert!(entries(&log).is_empty());
    assert_eq!(report.len(), 1);
}

/// A template registered during a dispatch only sees later events.
#[tokio::test]
async fn test_registered_during_dispatch_waits_for_next_event() {
    let mut game = new_game(2);
    let log = new_log();

    let late_log = Arc::clone(&log);
    let registrar = ReactionTemplate::new("registrar", EventKind::StartTurn, P0, move |game, _ctx| {
        let late = recorder("late", EventKind::StartTurn, P0, &late_log);
        Box::pin(async move {
            game.register_reaction_template(late)?;
            Ok(ReactionOutcome::Resolved)
        })
    })
    .once();
    game.register_reaction_template(registrar).unwrap();

    game.fire_event(GameEvent::new(EventKind::StartTurn, P0)).await.unwrap();
    assert!(entries(&log).is_empty());

    game.fire_event(GameEvent::new(EventKind::StartTurn, P0)).await.unwrap();
    assert_eq!(entries(&log), vec!["late"]);
}

/// An effect that keeps re-raising its own event hits the depth guard, and
/// the scheduler is usable afterwards.
#[tokio::test]
async fn test_runaway_cascade_is_bounded() {
    let config = EngineConfig::new(2).with_max_reaction_depth(4);
    let mut game = Game::new(config, registry()).unwrap();
    let card = spawn(&mut game, "copper", Zone::Hand(P0));

    let echo = ReactionTemplate::new("echo", EventKind::CardRevealed, P0, |game, ctx| {
        Box::pin(async move {
            let card = ctx.event.card.ok_or(EngineError::InvalidSelection("no card".into()))?;
            game.run_game_action(GameAction::RevealCard { card }).await?;
            Ok(ReactionOutcome::Resolved)
        })
    });
    game.register_reaction_template(echo).unwrap();

    let err = game
        .run_game_action(GameAction::RevealCard { card })
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::CascadeTooDeep(4)));
    assert_eq!(game.reactions().depth(), 0);

    game.unregister_trigger(&ReactionId::from("echo"));
    let result = game.run_game_action(GameAction::RevealCard { card }).await.unwrap();
    assert_eq!(result, ActionResult::Done);
}

/// An effect error aborts the dispatch and reaches the caller.
#[tokio::test]
async fn test_effect_error_propagates() {
    let mut game = new_game(2);
    let log = new_log();

    let failing = ReactionTemplate::new("failing", EventKind::EndTurn, P0, |_game, _ctx| {
        Box::pin(async { Err(EngineError::InvalidSelection("broken effect".into())) })
    });
    game.register_reaction_template(failing).unwrap();
    game.register_reaction_template(recorder("after", EventKind::EndTurn, P0, &log))
        .unwrap();

    let err = game.fire_event(GameEvent::new(EventKind::EndTurn, P0)).await.unwrap_err();

    assert!(matches!(err, EngineError::InvalidSelection(_)));
    assert!(entries(&log).is_empty());
    assert_eq!(game.reactions().depth(), 0);
}

/// A `once` reaction whose effect fails stays retired.
#[tokio::test]
async fn test_failed_once_reaction_stays_retired() {
    let mut game = new_game(2);
    let attempts = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&attempts);
    let failing = ReactionTemplate::new("fragile", EventKind::EndTurn, P0, move |_game, _ctx| {
        *counter.lock().unwrap() += 1;
        Box::pin(async { Err(EngineError::InvalidSelection("broken effect".into())) })
    })
    .once();
    game.register_reaction_template(failing).unwrap();

    assert!(game.fire_event(GameEvent::new(EventKind::EndTurn, P0)).await.is_err());
    assert!(!game.reactions().is_registered("fragile"));

    let report = game.fire_event(GameEvent::new(EventKind::EndTurn, P0)).await.unwrap();
    assert!(report.is_empty());
    assert_eq!(*attempts.lock().unwrap(), 1);
}

/// A game can be moved into a task on a multi-threaded runtime and
/// dispatch there.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_game_dispatches_on_spawned_task() {
    let mut game = new_game(2);
    let log = new_log();
    game.register_reaction_template(recorder("spawned", EventKind::StartTurn, P1, &log))
        .unwrap();

    let handle = tokio::spawn(async move {
        let report = game.start_turn(P1).await?;
        game.run_game_action(GameAction::GainTreasure { player: P1, count: 2 })
            .await?;
        Ok::<_, EngineError>((game, report))
    });
    let (game, report) = handle.await.unwrap().unwrap();

    assert_eq!(report.outcome_of("spawned"), Some(ReactionOutcome::Resolved));
    assert_eq!(game.state().resources[P1].treasure, 2);
    assert_eq!(entries(&log), vec!["spawned"]);
}

/// `compulsory` reaches the effect but never changes whether it runs.
#[tokio::test]
async fn test_compulsory_is_metadata() {
    let mut game = new_game(2);
    let flags = Arc::new(Mutex::new(Vec::new()));

    for (id, compulsory) in [("optional", false), ("forced", true)] {
        let flags = Arc::clone(&flags);
        let mut template = ReactionTemplate::new(id, EventKind::StartTurn, P0, move |_game, ctx| {
            flags.lock().unwrap().push(ctx.compulsory);
            Box::pin(async { Ok(ReactionOutcome::Resolved) })
        });
        if compulsory {
            template = template.compulsory();
        }
        game.register_reaction_template(template).unwrap();
    }

    game.fire_event(GameEvent::new(EventKind::StartTurn, P0)).await.unwrap();

    assert_eq!(*flags.lock().unwrap(), vec![false, true]);
}

mod properties {
    use super::*;
    use futures::executor::block_on;
    use proptest::prelude::*;

    proptest! {
        /// However many matching events fire, a once template fires exactly
        /// once and a repeatable one fires every time.
        #[test]
        fn once_fires_exactly_once(events in 1usize..20) {
            let mut game = new_game(2);
            let log = new_log();
            game.register_reaction_template(recorder("once", EventKind::StartTurn, P0, &log).once()).unwrap();
            game.register_reaction_template(recorder("every", EventKind::StartTurn, P0, &log)).unwrap();

            block_on(async {
                for _ in 0..events {
                    game.fire_event(GameEvent::new(EventKind::StartTurn, P1)).await.unwrap();
                }
            });

            let log = entries(&log);
            prop_assert_eq!(log.iter().filter(|e| *e == "once").count(), 1);
            prop_assert_eq!(log.iter().filter(|e| *e == "every").count(), events);
        }

        /// Unregistering ids that were never registered never changes the
        /// registry.
        #[test]
        fn unknown_unregister_is_noop(ids in proptest::collection::vec("[a-z]{1,8}:[0-9]{1,3}:x", 0..10)) {
            let mut game = new_game(2);
            let log = new_log();
            game.register_reaction_template(recorder("kept:1:cardPlayed", EventKind::CardPlayed, P0, &log)).unwrap();

            for id in &ids {
                game.unregister_trigger(&ReactionId::from(id.as_str()));
            }

            prop_assert_eq!(game.reactions().len(), 1);
            prop_assert!(game.reactions().is_registered("kept:1:cardPlayed"));
        }
    }
}
