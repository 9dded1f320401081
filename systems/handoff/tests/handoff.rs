use bomb_request_core::{PlayerId, Team, BOMB_ITEM};
use bomb_request_simulated_host::{SimulatedHost, SimulatedPlayer};
use bomb_request_system_handoff::{Handoff, HandoffOutcome};

const ALICE: PlayerId = PlayerId::new(1);
const BOB: PlayerId = PlayerId::new(2);
const CAROL: PlayerId = PlayerId::new(3);

fn server() -> SimulatedHost {
    let mut host = SimulatedHost::new();
    host.add_player(SimulatedPlayer::new(ALICE, "alice", Team::Terrorist));
    host.add_player(SimulatedPlayer::new(BOB, "bob", Team::Terrorist));
    host.add_player(SimulatedPlayer::new(CAROL, "carol", Team::Terrorist));
    host
}

#[test]
fn bomb_moves_from_carrier_to_winner() {
    let mut host = server();
    host.add_player(SimulatedPlayer::new(CAROL, "carol", Team::Terrorist).with_item(BOMB_ITEM));

    let outcome = Handoff::default().resolve(&mut host, BOB, &[ALICE, BOB]);

    assert_eq!(outcome, HandoffOutcome::Granted { winner: BOB });
    assert_eq!(host.bomb_carriers(), vec![BOB]);
    assert_eq!(host.bomb_count(), 1);
    assert_eq!(host.client_commands(CAROL), vec!["slot3"]);
    assert_eq!(
        host.chat_lines(BOB),
        vec!["You got the bomb. Removing you from the RB list."]
    );
    assert_eq!(
        host.chat_lines(ALICE),
        vec!["No luck this round. Write !rb to try again."]
    );
    assert!(host.chat_lines(CAROL).is_empty(), "non-candidates are not told");
}

#[test]
fn dropped_bomb_is_removed_before_grant() {
    let mut host = server();
    host.drop_item(BOMB_ITEM);
    host.drop_item("weapon_deagle");

    let outcome = Handoff::default().resolve(&mut host, ALICE, &[ALICE]);

    assert_eq!(outcome, HandoffOutcome::Granted { winner: ALICE });
    assert_eq!(host.dropped_items(), &["weapon_deagle".to_owned()]);
    assert_eq!(host.bomb_count(), 1);
}

#[test]
fn winner_already_carrying_is_a_coincidence() {
    let mut host = SimulatedHost::new();
    host.add_player(SimulatedPlayer::new(ALICE, "alice", Team::Terrorist).with_item(BOMB_ITEM));

    let outcome = Handoff::default().resolve(&mut host, ALICE, &[ALICE]);

    assert_eq!(outcome, HandoffOutcome::Coincidence { winner: ALICE });
    assert_eq!(host.items(ALICE), &[BOMB_ITEM.to_owned()]);
    assert!(host.client_commands(ALICE).is_empty());
    assert_eq!(
        host.chat_lines(ALICE),
        vec!["Now that's a coincidence. You got the bomb already. Removing you from the RB list."]
    );
}

#[test]
fn dead_winner_is_skipped_after_the_bomb_is_stripped() {
    let mut host = server();
    host.add_player(SimulatedPlayer::new(CAROL, "carol", Team::Terrorist).with_item(BOMB_ITEM));
    host.set_alive(ALICE, false);

    let outcome = Handoff::default().resolve(&mut host, ALICE, &[ALICE, BOB]);

    assert_eq!(outcome, HandoffOutcome::Skipped { winner: ALICE });
    assert!(host.bomb_carriers().is_empty());
    assert_eq!(host.bomb_count(), 0);
    assert_eq!(host.client_commands(CAROL), vec!["slot3"]);
    assert!(host.chat_lines(ALICE).is_empty());
    assert_eq!(host.chat_lines(BOB).len(), 1);
}

#[test]
fn winner_on_the_wrong_team_gets_nothing() {
    let mut host = server();
    host.drop_item(BOMB_ITEM);
    host.set_team(BOB, Team::CounterTerrorist);

    let outcome = Handoff::default().resolve(&mut host, BOB, &[BOB]);

    assert_eq!(outcome, HandoffOutcome::Skipped { winner: BOB });
    assert!(host.dropped_items().is_empty());
    assert!(host.items(BOB).is_empty());
}

#[test]
fn unreadable_inventory_is_skipped_while_searching() {
    let mut host = server();
    host.add_player(SimulatedPlayer::new(CAROL, "carol", Team::Terrorist).with_item(BOMB_ITEM));
    host.break_weapon_services(ALICE);

    assert_eq!(Handoff::default().find_carrier(&host), Some(CAROL));
}

#[test]
fn failing_entity_lookup_still_grants() {
    let mut host = server();
    host.break_entity_lookup();

    let outcome = Handoff::default().resolve(&mut host, BOB, &[BOB]);

    assert_eq!(outcome, HandoffOutcome::Granted { winner: BOB });
    assert_eq!(host.bomb_carriers(), vec![BOB]);
}

#[test]
fn failing_grant_reports_skip_and_still_notifies_losers() {
    let mut host = server();
    host.break_weapon_services(BOB);

    let outcome = Handoff::default().resolve(&mut host, BOB, &[ALICE, BOB, CAROL]);

    assert_eq!(outcome, HandoffOutcome::Skipped { winner: BOB });
    assert!(host.chat_lines(BOB).is_empty());
    assert_eq!(host.chat_lines(ALICE).len(), 1);
    assert_eq!(host.chat_lines(CAROL).len(), 1);
}

#[test]
fn disconnected_losers_are_not_messaged() {
    let mut host = server();
    host.disconnect(CAROL);

    let _ = Handoff::default().resolve(&mut host, ALICE, &[ALICE, CAROL]);

    assert!(host.chat_lines(CAROL).is_empty());
}
