use std::net::SocketAddrV4;

const MAGIC_BYTES: &[u8] = b"SAMP";

/// Length of the header every reply echoes back: magic, address, port and opcode.
pub const HEADER_LEN: usize = 11;

/// Query operation selected by the last byte of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Server information: hostname, gamemode, map and player counts.
    Info,
    /// Connected players with their scores.
    Players,
    /// Server rules as key/value pairs.
    Rules,
}

impl Opcode {
    pub fn as_byte(self) -> u8 {
        match self {
            Opcode::Info => b'i',
            Opcode::Players => b'd',
            Opcode::Rules => b'r',
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

/// Build request packet buffer.
///
/// Layout: `"SAMP" | 4 IPv4 octets | port (u16 LE) | opcode`.
pub fn build_query_packet(endpoint: SocketAddrV4, opcode: Opcode) -> Vec<u8> {
    [
        MAGIC_BYTES,
        endpoint.ip().octets().as_slice(),
        endpoint.port().to_le_bytes().as_slice(),
        [opcode.as_byte()].as_slice(),
    ]
    .concat()
}
