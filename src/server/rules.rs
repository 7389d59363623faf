use crate::share::PacketReader;
use serde::{ser::SerializeMap, Serialize, Serializer};

/// Server rules, in the order the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules(pub Vec<(String, String)>);

impl Rules {
    /// Value of the first rule called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Rules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

impl std::fmt::Display for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?
        )
    }
}

/// Decode a rules reply.
///
/// Layout after the echoed header: `count (u16 LE) | count * (name | value)`.
pub fn decode_rules(bufs: &[u8]) -> Rules {
    let mut reader = PacketReader::create(bufs);
    let mut rules = Vec::new();

    let count = reader.read_u16().unwrap_or(0);

    for _ in 0..count {
        match reader
            .read_str()
            .and_then(|key| reader.read_str().map(|value| (key, value)))
        {
            Some(rule) => rules.push(rule),
            None => {
                log::debug!("Rules truncated after {} of {} pairs", rules.len(), count);
                break;
            }
        }
    }

    Rules(rules)
}
