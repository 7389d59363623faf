mod info;
mod players;
mod rules;

use crate::{
    conf::Conf,
    packet::Opcode,
    transport::{query, Transport},
    SspErr,
};
pub use info::*;
pub use players::*;
pub use rules::*;
use serde::Serialize;

/// Server info together with its rules.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerStatus {
    #[serde(flatten)]
    pub info: ServerInfo,
    /// Server version as reported by the `version` rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Whether the server runs Open.MP rather than SA-MP.
    pub is_omp: bool,
    pub rules: Rules,
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?
        )
    }
}

fn request<T: Transport + ?Sized>(
    conf: &Conf,
    transport: &T,
    opcode: Opcode,
) -> Result<Vec<u8>, SspErr> {
    query(
        transport,
        conf.endpoint()?,
        opcode,
        conf.socket_conf.max_attempts,
        conf.socket_conf.read_time_out,
    )
}

pub fn get_server_info<T: Transport + ?Sized>(
    conf: &Conf,
    transport: &T,
) -> Result<ServerInfo, SspErr> {
    Ok(decode_server_info(&request(conf, transport, Opcode::Info)?))
}

pub fn get_players<T: Transport + ?Sized>(
    conf: &Conf,
    transport: &T,
) -> Result<PlayerList, SspErr> {
    Ok(decode_player_list(&request(conf, transport, Opcode::Players)?))
}

pub fn get_rules<T: Transport + ?Sized>(conf: &Conf, transport: &T) -> Result<Rules, SspErr> {
    Ok(decode_rules(&request(conf, transport, Opcode::Rules)?))
}

/// Query info, then rules. Servers that ignore the rules opcode still yield a status.
///
/// With [Conf::roster_player_count] set, the online count is then taken from the
/// player list query, keeping the info count when the server does not answer it.
pub fn get_server_status<T: Transport + ?Sized>(
    conf: &Conf,
    transport: &T,
) -> Result<ServerStatus, SspErr> {
    let mut info = get_server_info(conf, transport)?;
    let rules = match get_rules(conf, transport) {
        Ok(rules) => rules,
        Err(err) if err.is_no_response() => {
            log::warn!("No rules from {}: {}", conf, err);
            Rules::default()
        }
        Err(err) => return Err(err),
    };

    if info.language.is_none() {
        info.language = rules.get("language").map(Into::into);
    }

    if info.passworded.is_none() {
        info.passworded = rules.get("password").map(|v| v == "1" || v == "true");
    }

    if conf.roster_player_count {
        apply_roster_count(conf, transport, &mut info)?;
    }

    let version = rules.get("version").map(String::from);
    let is_omp = version
        .as_deref()
        .map(|v| v.get(..3).map_or(false, |p| p.eq_ignore_ascii_case("omp")))
        .unwrap_or(false);

    Ok(ServerStatus {
        info,
        version,
        is_omp,
        rules,
    })
}

/// Replace the info player count with the count byte of the player list.
///
/// Counts above `max_players` are ignored, same as the info clamp.
fn apply_roster_count<T: Transport + ?Sized>(
    conf: &Conf,
    transport: &T,
    info: &mut ServerInfo,
) -> Result<(), SspErr> {
    let bufs = match request(conf, transport, Opcode::Players) {
        Ok(bufs) => bufs,
        Err(err) if err.is_no_response() => {
            log::warn!("No player list from {}, keeping info count: {}", conf, err);
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    match decode_player_count(&bufs) {
        Some(count) if u16::from(count) <= info.max_players => info.players = count.into(),
        Some(count) => log::debug!(
            "Roster count {} exceeds max players {}, keeping info count",
            count,
            info.max_players
        ),
        None => {}
    }

    Ok(())
}

/// Whether the server answers an info query at all.
///
/// Only a silent server yields `Ok(false)`. An invalid host or a socket failure
/// is returned as an error instead of being reported as offline.
pub fn is_online<T: Transport + ?Sized>(conf: &Conf, transport: &T) -> Result<bool, SspErr> {
    match request(conf, transport, Opcode::Info) {
        Ok(_) => Ok(true),
        Err(err) if err.is_no_response() => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::tests::ScriptedTransport;
    use std::time::Duration;

    fn conf(attempts: u32) -> Conf {
        let mut conf = Conf::create_with_port("127.0.0.1", 7777);
        conf.socket_conf.max_attempts = attempts;
        conf.socket_conf.read_time_out = Duration::from_millis(10);
        conf
    }

    const INFO: &[u8] = b"\x05Hello\x04CTF \x03map\x03\x00\x20\x00";

    #[test]
    fn server_info_after_retries() {
        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::timeout(),
            ScriptedTransport::timeout(),
            ScriptedTransport::reply(Opcode::Info, INFO),
        ]);

        let info = get_server_info(&conf(3), &transport).unwrap();

        assert_eq!(info.hostname.as_deref(), Some("Hello"));
        assert_eq!(info.gamemode.as_deref(), Some("CTF"));
        assert_eq!(info.mapname.as_deref(), Some("map"));
        assert_eq!((info.players, info.max_players), (3, 32));
        assert_eq!(transport.sent.borrow().len(), 3);
    }

    #[test]
    fn players_are_decoded() {
        let transport = ScriptedTransport::create(vec![ScriptedTransport::reply(
            Opcode::Players,
            b"\x01\x04Carl\x0a\x00\x00\x00",
        )]);

        let players = get_players(&conf(1), &transport).unwrap();

        assert_eq!(players.len(), 1);
        assert_eq!(players.0[0].score, 10);
        assert_eq!(transport.sent.borrow()[0][10], b'd');
    }

    #[test]
    fn status_merges_rules_into_info() {
        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::reply(Opcode::Info, INFO),
            ScriptedTransport::reply(
                Opcode::Rules,
                b"\x03\x00\x07version\x06omp 1.\x08language\x07English\x08password\x010",
            ),
        ]);

        let status = get_server_status(&conf(1), &transport).unwrap();

        assert_eq!(status.version.as_deref(), Some("omp 1."));
        assert!(status.is_omp);
        assert_eq!(status.info.language.as_deref(), Some("English"));
        assert_eq!(status.info.passworded, Some(false));
        assert_eq!(status.rules.len(), 3);
    }

    #[test]
    fn status_survives_missing_rules() {
        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::reply(Opcode::Info, INFO),
            ScriptedTransport::timeout(),
        ]);

        let status = get_server_status(&conf(1), &transport).unwrap();

        assert_eq!(status.info.players, 3);
        assert!(status.rules.is_empty());
        assert_eq!(status.version, None);
        assert!(!status.is_omp);
    }

    #[test]
    fn samp_version_is_not_omp() {
        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::reply(Opcode::Info, INFO),
            ScriptedTransport::reply(Opcode::Rules, b"\x01\x00\x07version\x080.3.7-R2"),
        ]);

        let status = get_server_status(&conf(1), &transport).unwrap();

        assert_eq!(status.version.as_deref(), Some("0.3.7-R2"));
        assert!(!status.is_omp);

        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::reply(Opcode::Info, INFO),
            ScriptedTransport::reply(Opcode::Rules, b"\x01\x00\x07version\x02OM"),
        ]);

        assert!(!get_server_status(&conf(1), &transport).unwrap().is_omp);
    }

    #[test]
    fn roster_count_replaces_info_count() {
        let mut conf = conf(1);
        conf.roster_player_count = true;

        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::reply(Opcode::Info, INFO),
            ScriptedTransport::reply(Opcode::Rules, b"\x00\x00"),
            ScriptedTransport::reply(Opcode::Players, b"\x05\x04Carl"),
        ]);

        let status = get_server_status(&conf, &transport).unwrap();

        assert_eq!(status.info.players, 5);
        assert_eq!(status.info.max_players, 32);
        assert_eq!(transport.sent.borrow()[2][10], b'd');
    }

    #[test]
    fn roster_count_falls_back_to_info_count() {
        let mut conf = conf(1);
        conf.roster_player_count = true;

        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::reply(Opcode::Info, INFO),
            ScriptedTransport::reply(Opcode::Rules, b"\x00\x00"),
            ScriptedTransport::timeout(),
        ]);
        assert_eq!(get_server_status(&conf, &transport).unwrap().info.players, 3);

        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::reply(Opcode::Info, INFO),
            ScriptedTransport::reply(Opcode::Rules, b"\x00\x00"),
            ScriptedTransport::reply(Opcode::Players, b"\x64"),
        ]);
        assert_eq!(get_server_status(&conf, &transport).unwrap().info.players, 3);
    }

    #[test]
    fn roster_count_is_opt_in() {
        let transport = ScriptedTransport::create(vec![
            ScriptedTransport::reply(Opcode::Info, INFO),
            ScriptedTransport::reply(Opcode::Rules, b"\x00\x00"),
            ScriptedTransport::reply(Opcode::Players, b"\x05"),
        ]);

        let status = get_server_status(&conf(1), &transport).unwrap();

        assert_eq!(status.info.players, 3);
        assert_eq!(transport.sent.borrow().len(), 2);
    }

    #[test]
    fn online_check_distinguishes_silence_from_failure() {
        let transport =
            ScriptedTransport::create(vec![ScriptedTransport::reply(Opcode::Info, b"")]);
        assert!(is_online(&conf(1), &transport).unwrap());

        let transport = ScriptedTransport::create(vec![]);
        assert!(!is_online(&conf(2), &transport).unwrap());
        assert_eq!(transport.sent.borrow().len(), 2);

        let bad_host = Conf::create("999.0.0.1");
        assert!(matches!(
            is_online(&bad_host, &transport),
            Err(SspErr::DataErr(_))
        ));
    }
}
