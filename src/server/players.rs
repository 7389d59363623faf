use crate::share::PacketReader;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    /// Sent as 4 little-endian bytes, read as signed.
    pub score: i32,
}

/// Players in the order the server listed them.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct PlayerList(pub Vec<PlayerRecord>);

impl PlayerList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayerRecord> {
        self.0.iter()
    }
}

impl IntoIterator for PlayerList {
    type Item = PlayerRecord;
    type IntoIter = std::vec::IntoIter<PlayerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::fmt::Display for PlayerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?
        )
    }
}

/// Decode a player list reply.
///
/// Layout after the echoed header: `count (u8) | count * (name | score (i32 LE))`.
/// Decoding stops at the first incomplete record, keeping those before it.
pub fn decode_player_list(bufs: &[u8]) -> PlayerList {
    let mut reader = PacketReader::create(bufs);
    let mut players = Vec::new();

    let count = match reader.read_u8() {
        Some(count) => count,
        None => return PlayerList(players),
    };

    for _ in 0..count {
        let record = reader
            .read_str()
            .and_then(|name| reader.read_i32().map(|score| PlayerRecord { name, score }));

        match record {
            Some(record) => players.push(record),
            None => {
                log::debug!(
                    "Player list truncated after {} of {} records",
                    players.len(),
                    count
                );
                break;
            }
        }
    }

    PlayerList(players)
}

/// Read only the leading count byte of a player list reply.
pub fn decode_player_count(bufs: &[u8]) -> Option<u8> {
    PacketReader::create(bufs).read_u8()
}
