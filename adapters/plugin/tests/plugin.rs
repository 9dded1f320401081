use std::{collections::VecDeque, time::Duration};

use bomb_request_core::{
    PlayerId, SteamId, Team, ADMIN_PERMISSION, BOMB_ITEM, ROUND_START_DELAY, VIP_PERMISSION,
};
use bomb_request_plugin::{BombRequest, Config};
use bomb_request_simulated_host::{SimulatedHost, SimulatedPlayer};
use bomb_request_system_selector::{Dice, Selector};
use bomb_request_world::query;

const ALICE: PlayerId = PlayerId::new(1);
const VICTOR: PlayerId = PlayerId::new(2);
const CAROL: PlayerId = PlayerId::new(3);
const ADMIN: PlayerId = PlayerId::new(4);
const BOT: PlayerId = PlayerId::new(5);

const NO_LUCK: &str = "No luck this round. Write !rb to try again.";
const GRANTED: &str = "You got the bomb. Removing you from the RB list.";

/// Dice that replay a fixed script and panic once it runs dry.
#[derive(Debug, Default)]
struct ScriptedDice {
    flips: VecDeque<bool>,
    rolls: VecDeque<usize>,
}

impl ScriptedDice {
    fn new(flips: &[bool], rolls: &[usize]) -> Self {
        Self {
            flips: flips.iter().copied().collect(),
            rolls: rolls.iter().copied().collect(),
        }
    }
}

impl Dice for ScriptedDice {
    fn coin_flip(&mut self) -> bool {
        self.flips.pop_front().expect("unexpected coin flip")
    }

    fn roll(&mut self, _sides: usize) -> usize {
        self.rolls.pop_front().expect("unexpected die roll")
    }
}

fn server() -> SimulatedHost {
    let mut host = SimulatedHost::new();
    host.add_player(SimulatedPlayer::new(ALICE, "alice", Team::Terrorist));
    host.add_player(
        SimulatedPlayer::new(VICTOR, "victor", Team::Terrorist).with_permission(VIP_PERMISSION),
    );
    host.add_player(SimulatedPlayer::new(CAROL, "carol", Team::Terrorist).with_item(BOMB_ITEM));
    host.add_player(
        SimulatedPlayer::new(ADMIN, "admin", Team::CounterTerrorist)
            .with_permission(ADMIN_PERMISSION),
    );
    host.add_player(SimulatedPlayer::new(BOT, "bot", Team::Terrorist).as_bot());
    host
}

/// Loads the plugin and walks the server into the first live round's window.
fn live_plugin(host: &mut SimulatedHost, dice: ScriptedDice) -> BombRequest<ScriptedDice> {
    let mut plugin = BombRequest::with_selector(Config::default(), Selector::with_dice(dice));
    plugin.load(host);
    plugin.on_map_start(host);
    plugin.on_warmup_end(host);
    plugin.on_round_freeze_end(host);
    plugin
}

/// Starts the next round and lets the selection delay elapse.
fn play_next_round(plugin: &mut BombRequest<ScriptedDice>, host: &mut SimulatedHost) {
    plugin.on_round_prestart(host);
    plugin.on_round_start(host);
    plugin.on_tick(host, Duration::from_secs(1));
}

#[test]
fn load_registers_every_alias() {
    let mut host = SimulatedHost::new();
    let mut plugin = BombRequest::new(Config::default());

    plugin.load(&mut host);

    let names: Vec<_> = host
        .registered_commands()
        .iter()
        .map(|registration| registration.name)
        .collect();
    assert_eq!(
        names,
        ["rbhelp", "helprb", "rb", "resetrb", "rbreset", "checkrb", "rblist"]
    );
}

#[test]
fn default_config_uses_the_production_delay() {
    let config = Config::default();

    assert_eq!(
        Duration::from_millis(config.round_start_delay_ms),
        ROUND_START_DELAY
    );
    assert_eq!(config.seed, None);
}

#[test]
fn configured_delay_postpones_the_selection() {
    let mut host = server();
    let config = Config {
        round_start_delay_ms: 2_500,
        ..Config::default()
    };
    let mut plugin =
        BombRequest::with_selector(config, Selector::with_dice(ScriptedDice::default()));
    plugin.on_map_start(&mut host);
    plugin.on_warmup_end(&mut host);
    plugin.on_round_freeze_end(&mut host);
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");

    play_next_round(&mut plugin, &mut host);
    assert_eq!(query::roster(plugin.world()), &[ALICE]);

    plugin.on_tick(&mut host, Duration::from_millis(1_500));
    assert!(query::roster(plugin.world()).is_empty());
    assert_eq!(host.bomb_carriers(), vec![ALICE]);
}

#[test]
fn privileged_member_wins_restricted_draw() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::new(&[true], &[]));
    assert!(plugin.on_chat_command(&mut host, Some(ALICE), "rb"));
    assert!(plugin.on_chat_command(&mut host, Some(VICTOR), "!rb"));
    host.clear_chat();

    play_next_round(&mut plugin, &mut host);

    assert_eq!(host.bomb_carriers(), vec![VICTOR]);
    assert_eq!(host.bomb_count(), 1);
    assert_eq!(host.client_commands(CAROL), vec!["slot3"]);
    assert_eq!(host.chat_lines(VICTOR), vec![GRANTED]);
    assert_eq!(host.chat_lines(ALICE), vec![NO_LUCK]);
    assert!(query::roster(plugin.world()).is_empty());
}

#[test]
fn tails_draws_from_everyone() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::new(&[false], &[0]));
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");
    let _ = plugin.on_chat_command(&mut host, Some(VICTOR), "rb");
    host.clear_chat();

    play_next_round(&mut plugin, &mut host);

    assert_eq!(host.bomb_carriers(), vec![ALICE]);
    assert_eq!(host.chat_lines(VICTOR), vec![NO_LUCK]);
}

#[test]
fn lone_carrier_keeps_the_bomb() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    let _ = plugin.on_chat_command(&mut host, Some(CAROL), "rb");
    host.clear_chat();

    play_next_round(&mut plugin, &mut host);

    assert_eq!(host.items(CAROL), &[BOMB_ITEM.to_owned()]);
    assert!(host.client_commands(CAROL).is_empty());
    assert_eq!(
        host.chat_lines(CAROL),
        vec!["Now that's a coincidence. You got the bomb already. Removing you from the RB list."]
    );
    assert!(query::roster(plugin.world()).is_empty());
}

#[test]
fn selection_waits_for_the_delay() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");

    plugin.on_round_prestart(&mut host);
    plugin.on_round_start(&mut host);
    plugin.on_tick(&mut host, Duration::from_millis(600));
    assert_eq!(query::roster(plugin.world()), &[ALICE]);
    assert_eq!(host.bomb_carriers(), vec![CAROL]);

    plugin.on_tick(&mut host, Duration::from_millis(400));
    assert!(query::roster(plugin.world()).is_empty());
    assert_eq!(host.bomb_carriers(), vec![ALICE]);
}

#[test]
fn enrollment_is_closed_between_prestart_and_freeze_end() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    plugin.on_round_prestart(&mut host);

    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");

    assert!(query::roster(plugin.world()).is_empty());
    assert_eq!(host.chat_lines(ALICE), vec!["Can't use !rb at this moment."]);
}

#[test]
fn failing_inventory_still_empties_the_roster() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");
    host.break_weapon_services(ALICE);
    host.clear_chat();

    play_next_round(&mut plugin, &mut host);

    assert!(query::roster(plugin.world()).is_empty());
    assert!(host.chat_lines(ALICE).is_empty());
}

#[test]
fn disconnect_withdraws_only_the_leaving_member() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");
    let _ = plugin.on_chat_command(&mut host, Some(VICTOR), "rb");

    host.disconnect(ALICE);
    plugin.on_player_disconnect(&mut host, ALICE);

    assert_eq!(query::roster(plugin.world()), &[VICTOR]);
}

#[test]
fn disconnect_sweeps_members_already_gone() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");
    let _ = plugin.on_chat_command(&mut host, Some(VICTOR), "rb");
    let _ = plugin.on_chat_command(&mut host, Some(CAROL), "rb");

    host.disconnect(ALICE);
    host.disconnect(CAROL);
    plugin.on_player_disconnect(&mut host, CAROL);

    assert_eq!(query::roster(plugin.world()), &[VICTOR]);
}

#[test]
fn disconnect_of_bots_and_fake_accounts_is_ignored() {
    let mut host = server();
    host.add_player(
        SimulatedPlayer::new(PlayerId::new(6), "local", Team::Terrorist)
            .with_steam_id(SteamId::new(0)),
    );
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");
    host.disconnect(ALICE);

    plugin.on_player_disconnect(&mut host, BOT);
    plugin.on_player_disconnect(&mut host, PlayerId::new(6));

    assert_eq!(query::roster(plugin.world()), &[ALICE]);
}

#[test]
fn map_change_drops_the_roster_without_selection() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");
    host.clear_chat();

    plugin.on_map_start(&mut host);
    plugin.on_round_start(&mut host);
    plugin.on_tick(&mut host, Duration::from_secs(5));

    assert!(query::roster(plugin.world()).is_empty());
    assert_eq!(host.bomb_carriers(), vec![CAROL]);
    assert!(host.chat_log().is_empty());
}

#[test]
fn admin_reset_clears_roster_before_the_round() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());
    let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");
    host.clear_chat();

    assert!(plugin.on_chat_command(&mut host, Some(ADMIN), "css_resetrb"));
    play_next_round(&mut plugin, &mut host);

    assert_eq!(host.bomb_carriers(), vec![CAROL]);
    assert_eq!(
        host.chat_lines(ALICE),
        vec!["Admin performed Request Bomb list reset, you have been removed from the list."]
    );
    assert_eq!(
        host.chat_lines(ADMIN),
        vec!["Request Bomb list has been reset."]
    );
}

#[test]
fn unknown_commands_are_not_claimed() {
    let mut host = server();
    let mut plugin = live_plugin(&mut host, ScriptedDice::default());

    assert!(!plugin.on_chat_command(&mut host, Some(ALICE), "!guns"));
    assert!(host.chat_log().is_empty());
}

#[test]
fn seeded_sessions_replay_identically() {
    fn run(seed: u64) -> Vec<PlayerId> {
        let mut host = server();
        let config = Config {
            seed: Some(seed),
            ..Config::default()
        };
        let mut plugin = BombRequest::new(config);
        plugin.load(&mut host);
        plugin.on_map_start(&mut host);
        plugin.on_warmup_end(&mut host);

        let mut winners = Vec::new();
        for _ in 0..8 {
            plugin.on_round_freeze_end(&mut host);
            let _ = plugin.on_chat_command(&mut host, Some(ALICE), "rb");
            let _ = plugin.on_chat_command(&mut host, Some(VICTOR), "rb");
            let _ = plugin.on_chat_command(&mut host, Some(CAROL), "rb");
            plugin.on_round_prestart(&mut host);
            plugin.on_round_start(&mut host);
            plugin.on_tick(&mut host, Duration::from_secs(1));
            winners.extend(host.bomb_carriers());
            assert_eq!(host.bomb_count(), 1);
        }
        winners
    }

    assert_eq!(run(7), run(7));
}
