use crate::share::PacketReader;
use serde::Serialize;

/// Upper bound for any plausible player count.
pub const MAX_PLAYERS_LIMIT: u16 = 5000;

/// Server info type.
///
/// String fields are [None] when the reply did not carry them, and
/// `Some("")` when the server sent an empty value.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    /// Server name shown in the browser.
    pub hostname: Option<String>,
    /// Running gamemode.
    pub gamemode: Option<String>,
    /// Current map.
    pub mapname: Option<String>,
    /// Online players.
    pub players: u16,
    /// Max players.
    pub max_players: u16,
    /// Whether a password is required to join, when known.
    ///
    /// Only filled from a `password` rule, which stock SA-MP servers do not send,
    /// so [None] means "unknown", not "open".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passworded: Option<bool>,
    /// Server language, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl std::fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?
        )
    }
}

/// Decode an info reply. Never fails: unreadable fields fall back to defaults.
///
/// Layout after the echoed header:
///
/// ```text
/// hostname | gamemode | mapname | players (u16 LE) | max_players (u16 LE)
/// ```
pub fn decode_server_info(bufs: &[u8]) -> ServerInfo {
    let mut reader = PacketReader::create(bufs);

    let hostname = reader.read_str();
    let gamemode = reader.read_str();
    let mapname = reader.read_str();
    let (players, max_players) = match reader.read_u16_pair() {
        Some((players, max_players))
            if players <= max_players && max_players <= MAX_PLAYERS_LIMIT =>
        {
            (players, max_players)
        }
        Some((players, max_players)) => {
            log::debug!(
                "Implausible player counts {}/{}, resetting to 0",
                players,
                max_players
            );
            (0, 0)
        }
        None => (0, 0),
    };

    ServerInfo {
        hostname,
        gamemode,
        mapname,
        players,
        max_players,
        passworded: None,
        language: None,
    }
}
