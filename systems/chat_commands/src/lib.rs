#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Chat command surface of the plugin.
//!
//! Commands that change the roster are translated into [`Command`] values for
//! the world; the world's answers come back as events, which [`ChatCommands::announce`]
//! turns into replies. Read-only commands reply directly.

use bomb_request_core::{
    send_notice, Command, CommandRegistration, EnrollmentRejection, Event, GateState, Host,
    Notice, PlayerId, RosterResetReason, ADMIN_PERMISSION, VIP_PERMISSION,
};

/// Prefix the host puts in front of plugin console commands.
const CONSOLE_PREFIX: &str = "css_";

/// Commands players can type in chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChatCommand {
    /// Join the roster.
    Request,
    /// Explain how the roster works.
    Help,
    /// Clear the roster.
    Reset,
    /// Show the roster.
    List,
}

impl ChatCommand {
    /// Every command, in registration order.
    pub const ALL: [Self; 4] = [Self::Help, Self::Request, Self::Reset, Self::List];

    /// Names the command answers to.
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Request => &["rb"],
            Self::Help => &["rbhelp", "helprb"],
            Self::Reset => &["resetrb", "rbreset"],
            Self::List => &["checkrb", "rblist"],
        }
    }

    /// Description shown in the host's command listing.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Request => "Request Bomb - be first to get the bomb in the next round.",
            Self::Help => "Request Bomb - Info.",
            Self::Reset => "Reset RB list",
            Self::List => "Check RB list",
        }
    }

    /// Resolves a typed command, ignoring chat triggers, console prefix and case.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let name = input
            .trim()
            .trim_start_matches(|c: char| c == '!' || c == '/')
            .to_ascii_lowercase();
        let name = name.strip_prefix(CONSOLE_PREFIX).unwrap_or(&name);
        Self::ALL
            .into_iter()
            .find(|command| command.aliases().contains(&name))
    }

    /// Registration descriptors for every alias of every command.
    pub fn registrations() -> impl Iterator<Item = CommandRegistration> {
        Self::ALL.into_iter().flat_map(|command| {
            command
                .aliases()
                .iter()
                .map(move |&name| CommandRegistration {
                    name,
                    description: command.description(),
                })
        })
    }
}

/// Who may run a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Every connected player.
    Anyone,
    /// Holders of the administrator permission.
    Admin,
    /// Holders of the administrator or the privileged permission.
    AdminOrPrivileged,
}

impl ChatCommand {
    /// Access rule guarding the command.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Request | Self::Help => Access::Anyone,
            Self::Reset => Access::Admin,
            Self::List => Access::AdminOrPrivileged,
        }
    }
}

/// Configuration parameters required to construct the chat command system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    admin_permission: &'static str,
    privileged_permission: &'static str,
}

impl Config {
    /// Creates a configuration with the given permission names.
    #[must_use]
    pub const fn new(admin_permission: &'static str, privileged_permission: &'static str) -> Self {
        Self {
            admin_permission,
            privileged_permission,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(ADMIN_PERMISSION, VIP_PERMISSION)
    }
}

/// Read-only session state a command needs.
#[derive(Clone, Copy, Debug)]
pub struct SessionView<'a> {
    /// Current gate flags.
    pub gate: GateState,
    /// Roster members in enrollment order.
    pub roster: &'a [PlayerId],
}

/// System that validates chat commands and produces replies.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChatCommands {
    config: Config,
}

impl ChatCommands {
    /// Creates a new chat command system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reports whether the player holds the privileged permission.
    pub fn is_privileged<H>(&self, host: &H, player: PlayerId) -> bool
    where
        H: Host + ?Sized,
    {
        host.has_permission(player, self.config.privileged_permission)
    }

    /// Reports whether the player may run the command.
    pub fn permits<H>(&self, host: &H, player: PlayerId, command: ChatCommand) -> bool
    where
        H: Host + ?Sized,
    {
        let admin = || host.has_permission(player, self.config.admin_permission);
        match command.access() {
            Access::Anyone => true,
            Access::Admin => admin(),
            Access::AdminOrPrivileged => admin() || self.is_privileged(host, player),
        }
    }

    /// Handles a command typed by `invoker`, pushing world commands into `out`.
    ///
    /// Console invocations (`invoker == None`) and players who are not fully
    /// connected are ignored.
    pub fn handle<H>(
        &self,
        host: &mut H,
        session: SessionView<'_>,
        invoker: Option<PlayerId>,
        command: ChatCommand,
        out: &mut Vec<Command>,
    ) where
        H: Host + ?Sized,
    {
        let Some(invoker) = invoker else {
            tracing::debug!(?command, "ignoring console invocation of client-only command");
            return;
        };
        let Some(snapshot) = host.player(invoker).filter(|snapshot| snapshot.is_connected()) else {
            return;
        };
        if !self.permits(host, invoker, command) {
            send_notice(host, invoker, &Notice::PermissionDenied);
            return;
        }

        match command {
            ChatCommand::Request => out.push(Command::Enroll {
                player: invoker,
                team: snapshot.team,
            }),
            ChatCommand::Help => {
                for notice in [
                    Notice::HelpEnroll,
                    Notice::HelpSelection,
                    Notice::HelpPrivileged,
                    Notice::HelpReset,
                ] {
                    send_notice(host, invoker, &notice);
                }
            }
            ChatCommand::Reset => {
                if session.gate.warmup {
                    send_notice(host, invoker, &Notice::ResetDuringWarmup);
                } else if session.roster.is_empty() {
                    send_notice(host, invoker, &Notice::ResetEmpty);
                } else {
                    tracing::info!(admin = %snapshot.name, "roster reset requested");
                    out.push(Command::ResetRoster {
                        reason: RosterResetReason::Administrator { by: invoker },
                    });
                }
            }
            ChatCommand::List => self.list(host, session, invoker),
        }
    }

    /// Sends the replies owed for world events.
    pub fn announce<H>(&self, host: &mut H, events: &[Event])
    where
        H: Host + ?Sized,
    {
        for event in events {
            match event {
                Event::PlayerEnrolled { player } => {
                    send_notice(host, *player, &Notice::Enrolled);
                }
                Event::EnrollmentRejected { player, reason } => {
                    let notice = match reason {
                        EnrollmentRejection::WrongTeam => Notice::NotTerrorist,
                        EnrollmentRejection::EnrollmentClosed => Notice::EnrollmentClosed,
                        EnrollmentRejection::AlreadyEnrolled => Notice::AlreadyEnrolled,
                    };
                    send_notice(host, *player, &notice);
                }
                Event::RosterReset {
                    reason: RosterResetReason::Administrator { by },
                    members,
                } => {
                    for member in members {
                        send_notice(host, *member, &Notice::RemovedByAdmin);
                    }
                    send_notice(host, *by, &Notice::ResetConfirmed);
                }
                _ => {}
            }
        }
    }

    fn list<H>(&self, host: &mut H, session: SessionView<'_>, invoker: PlayerId)
    where
        H: Host + ?Sized,
    {
        if session.gate.warmup {
            send_notice(host, invoker, &Notice::ListDuringWarmup);
            return;
        }
        if session.roster.is_empty() {
            send_notice(host, invoker, &Notice::ListEmpty);
            return;
        }

        send_notice(host, invoker, &Notice::ListHeader);
        for member in session.roster {
            let Some(snapshot) = host.player(*member).filter(|snapshot| snapshot.is_connected())
            else {
                continue;
            };
            let entry = Notice::ListEntry {
                name: snapshot.name,
                privileged: self.is_privileged(host, *member),
            };
            send_notice(host, invoker, &entry);
        }
    }
}
