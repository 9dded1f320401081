//! Coloured chat lines and the notices the plugin sends to players.

use std::borrow::Cow;

use crate::{Host, PlayerId};

/// Tag printed in front of every plugin chat line.
pub const CHAT_PREFIX: &str = "[BombRequest] \u{2740}";

/// Chat colours understood by the game client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChatColor {
    /// Default chat colour.
    White,
    /// Dark blue used by the prefix.
    DarkBlue,
    /// Positive confirmations.
    Lime,
    /// Rejections.
    Red,
    /// Soft rejections.
    LightRed,
    /// Informational broadcasts.
    Gold,
}

impl ChatColor {
    /// Control character the client interprets as a colour switch.
    #[must_use]
    pub const fn control_code(self) -> char {
        match self {
            Self::White => '\u{01}',
            Self::Red => '\u{07}',
            Self::Lime => '\u{06}',
            Self::DarkBlue => '\u{0C}',
            Self::LightRed => '\u{0F}',
            Self::Gold => '\u{10}',
        }
    }
}

/// Run of text printed in a single colour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatSegment {
    /// Colour applied to the text.
    pub color: ChatColor,
    /// Text of the segment.
    pub text: Cow<'static, str>,
}

/// A complete chat line, without the plugin prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatLine {
    segments: Vec<ChatSegment>,
}

impl ChatLine {
    /// Creates an empty line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Appends a coloured segment.
    #[must_use]
    pub fn push(mut self, color: ChatColor, text: impl Into<Cow<'static, str>>) -> Self {
        self.segments.push(ChatSegment {
            color,
            text: text.into(),
        });
        self
    }

    /// Segments composing the line in print order.
    #[must_use]
    pub fn segments(&self) -> &[ChatSegment] {
        &self.segments
    }

    /// Renders the line with the plugin prefix and client colour codes.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push(' ');
        out.push(ChatColor::DarkBlue.control_code());
        out.push_str(CHAT_PREFIX);
        out.push(ChatColor::White.control_code());
        out.push(' ');
        for segment in &self.segments {
            out.push(segment.color.control_code());
            out.push_str(&segment.text);
        }
        out
    }

    /// Text of the line without prefix or colour codes.
    #[must_use]
    pub fn plain(&self) -> String {
        let text: String = self
            .segments
            .iter()
            .map(|segment| segment.text.as_ref())
            .collect();
        text.trim().to_owned()
    }
}

/// Every message the plugin sends to players.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The player joined the roster.
    Enrolled,
    /// The player was already queued.
    AlreadyEnrolled,
    /// The player is not on the bomb-carrying side.
    NotTerrorist,
    /// Enrollment is closed right now.
    EnrollmentClosed,
    /// The player received the bomb.
    BombGranted,
    /// The player was chosen while already carrying the bomb.
    Coincidence,
    /// The player was not chosen this round.
    NoLuck,
    /// First help line: how to enroll.
    HelpEnroll,
    /// Second help line: random selection.
    HelpSelection,
    /// Third help line: privileged players roll twice.
    HelpPrivileged,
    /// Fourth help line: the roster resets after a handoff.
    HelpReset,
    /// Administrative reset attempted during warmup.
    ResetDuringWarmup,
    /// Administrative reset attempted on an empty roster.
    ResetEmpty,
    /// The player was removed by an administrative reset.
    RemovedByAdmin,
    /// Confirmation to the administrator that the roster was cleared.
    ResetConfirmed,
    /// Listing attempted during warmup.
    ListDuringWarmup,
    /// Listing attempted on an empty roster.
    ListEmpty,
    /// Header printed above the roster listing.
    ListHeader,
    /// One roster member in the listing.
    ListEntry {
        /// Display name of the member.
        name: String,
        /// Whether the member holds the privileged permission.
        privileged: bool,
    },
    /// The invoker lacks the permission the command requires.
    PermissionDenied,
}

impl Notice {
    /// Builds the coloured chat line for the notice.
    #[must_use]
    pub fn line(&self) -> ChatLine {
        use ChatColor::{Gold, LightRed, Lime, Red, White};

        let line = ChatLine::new();
        match self {
            Self::Enrolled => line.push(Lime, " You have added yourself to the Request Bomb list."),
            Self::AlreadyEnrolled => {
                line.push(LightRed, " You are in the Request Bomb list already.")
            }
            Self::NotTerrorist => line.push(Red, " You are not terrorist."),
            Self::EnrollmentClosed => line
                .push(Red, " Can't use")
                .push(White, " !rb")
                .push(Red, " at this moment."),
            Self::BombGranted => line.push(Lime, " You got the bomb. Removing you from the RB list."),
            Self::Coincidence => line.push(
                Lime,
                " Now that's a coincidence. You got the bomb already. Removing you from the RB list.",
            ),
            Self::NoLuck => line
                .push(Gold, " No luck this round. Write")
                .push(White, " !rb")
                .push(Gold, " to try again."),
            Self::HelpEnroll => line
                .push(Lime, " 1. Write")
                .push(White, " !rb")
                .push(Lime, " to get a chance to get the bomb on next round")
                .push(White, " (T's only)"),
            Self::HelpSelection => line
                .push(Lime, " 2. Plugin will randomly (dice roll) select a player from")
                .push(White, " rb list")
                .push(Lime, " who'll receive the bomb"),
            Self::HelpPrivileged => line
                .push(Lime, " *")
                .push(White, " VIP")
                .push(Lime, " players have 2 rolls to be selected, others have 1 roll"),
            Self::HelpReset => line
                .push(Lime, " 3. After receiving the bomb, the")
                .push(White, " rb list")
                .push(Lime, " will reset"),
            Self::ResetDuringWarmup => line.push(Red, " Can't reset RB list during warmup."),
            Self::ResetEmpty => line.push(Red, " There are no players in Request Bomb list."),
            Self::RemovedByAdmin => line.push(
                Gold,
                " Admin performed Request Bomb list reset, you have been removed from the list.",
            ),
            Self::ResetConfirmed => line.push(Lime, " Request Bomb list has been reset."),
            Self::ListDuringWarmup => line.push(Red, " RB list during warmup is always empty."),
            Self::ListEmpty => line.push(Red, " There are no players in RB list."),
            Self::ListHeader => line.push(Gold, " Request Bomb list:"),
            Self::ListEntry { name, privileged } => {
                let tag = if *privileged { "VIP | " } else { "" };
                line.push(Lime, format!(" [*] {tag}{name}"))
            }
            Self::PermissionDenied => line.push(
                Red,
                " You do not have the correct permissions to execute this command.",
            ),
        }
    }
}

/// Sends a notice to a player, skipping players who are no longer connected.
pub fn send_notice<H>(host: &mut H, player: PlayerId, notice: &Notice)
where
    H: Host + ?Sized,
{
    let connected = host
        .player(player)
        .is_some_and(|snapshot| snapshot.is_connected());
    if connected {
        host.print_to_chat(player, &notice.line());
    }
}
