use crate::{packet::HEADER_LEN, SocketConf, SspErr};
use byteorder::{ByteOrder, LittleEndian};
use std::net::UdpSocket;

pub fn create_udp_socket(socket_conf: &SocketConf) -> Result<UdpSocket, SspErr> {
    let socket = UdpSocket::bind((socket_conf.rep_udp_ipv4, socket_conf.rep_udp_port))?;

    socket.set_read_timeout(Some(socket_conf.read_time_out))?;
    socket.set_write_timeout(socket_conf.write_timeout)?;

    Ok(socket)
}

/// Bounds-checked cursor over a received datagram.
///
/// Every read returns [None] once the requested bytes are not fully present,
/// and never touches memory past the end of the buffer.
pub struct PacketReader<'a> {
    bufs: &'a [u8],
    current_idx: usize,
}

impl<'a> PacketReader<'a> {
    /// Create a reader positioned right after the echoed header.
    pub fn create(bufs: &'a [u8]) -> Self {
        Self::create_with_idx(bufs, HEADER_LEN)
    }

    pub fn create_with_idx(bufs: &'a [u8], current_idx: usize) -> Self {
        Self { bufs, current_idx }
    }

    pub fn remaining(&self) -> usize {
        self.bufs.len().saturating_sub(self.current_idx)
    }

    /// Take `size` bytes at the cursor, or nothing if fewer remain.
    fn take(&mut self, size: usize) -> Option<&'a [u8]> {
        let end = self.current_idx.checked_add(size)?;
        let bufs = self.bufs.get(self.current_idx..end)?;
        self.current_idx = end;

        Some(bufs)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        self.take(2).map(LittleEndian::read_u16)
    }

    /// Read two consecutive u16 values. Both or neither are consumed.
    pub fn read_u16_pair(&mut self) -> Option<(u16, u16)> {
        self.take(4).map(|b| {
            (
                LittleEndian::read_u16(&b[..2]),
                LittleEndian::read_u16(&b[2..]),
            )
        })
    }

    pub fn read_i32(&mut self) -> Option<i32> {
        self.take(4).map(LittleEndian::read_i32)
    }

    /// Read a string prefixed with its size as a single byte.
    ///
    /// A declared size larger than what remains marks the field as absent and
    /// exhausts the reader. Bytes outside printable ASCII are dropped and the
    /// result is trimmed.
    pub fn read_str(&mut self) -> Option<String> {
        let size = self.read_u8()? as usize;

        match self.take(size) {
            Some(bufs) => Some(printable_ascii(bufs)),
            None => {
                log::debug!(
                    "String field truncated: declared {} bytes, {} remain",
                    size,
                    self.remaining()
                );
                self.current_idx = self.bufs.len();

                None
            }
        }
    }
}

fn printable_ascii(bufs: &[u8]) -> String {
    bufs.iter()
        .filter(|&&b| (32..=126).contains(&b))
        .map(|&b| b as char)
        .collect::<String>()
        .trim()
        .into()
}
