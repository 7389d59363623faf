use crate::{
    packet::{build_query_packet, Opcode, HEADER_LEN},
    share::create_udp_socket,
    SocketConf, SspErr,
};
use std::{io, net::SocketAddrV4, time::Duration};

const MAX_DATAGRAM: usize = 4096;

/// Outcome of a single send/receive attempt.
#[derive(Debug)]
pub enum Attempt {
    /// A datagram was received.
    Reply(Vec<u8>),
    /// The attempt failed in a way worth retrying (timeout, refused, unreachable).
    Lost(io::Error),
}

/// One request/reply exchange with a server.
///
/// Returning [Err] aborts the whole query; [Attempt::Lost] lets the retry loop continue.
pub trait Transport {
    fn attempt(
        &self,
        endpoint: SocketAddrV4,
        packet: &[u8],
        timeout: Duration,
    ) -> Result<Attempt, SspErr>;
}

/// Transport over a fresh [std::net::UdpSocket] per attempt.
#[derive(Debug, Clone, Default)]
pub struct UdpTransport {
    socket_conf: SocketConf,
}

impl UdpTransport {
    pub fn create(socket_conf: &SocketConf) -> Self {
        Self {
            socket_conf: socket_conf.clone(),
        }
    }
}

impl Transport for UdpTransport {
    fn attempt(
        &self,
        endpoint: SocketAddrV4,
        packet: &[u8],
        timeout: Duration,
    ) -> Result<Attempt, SspErr> {
        // Dropped at the end of this scope, so no socket outlives its attempt.
        let socket = create_udp_socket(&SocketConf {
            read_time_out: timeout,
            ..self.socket_conf.clone()
        })?;

        // Connecting filters out datagrams from other peers and surfaces ICMP refusals.
        if let Err(err) = socket.connect(endpoint) {
            return Ok(Attempt::Lost(err));
        }

        if let Err(err) = socket.send(packet) {
            return Ok(Attempt::Lost(err));
        }

        let mut bufs = vec![0u8; MAX_DATAGRAM];

        match socket.recv(&mut bufs) {
            Ok(size) => {
                bufs.truncate(size);
                Ok(Attempt::Reply(bufs))
            }
            Err(err) => Ok(Attempt::Lost(err)),
        }
    }
}

/// Send `opcode` to `endpoint` and return the first reply of at least [HEADER_LEN] bytes.
///
/// Each attempt waits at most `timeout`. Replies that are too short count as lost.
pub fn query<T: Transport + ?Sized>(
    transport: &T,
    endpoint: SocketAddrV4,
    opcode: Opcode,
    max_attempts: u32,
    timeout: Duration,
) -> Result<Vec<u8>, SspErr> {
    if max_attempts == 0 {
        return Err(SspErr::DataErr("max_attempts must be at least 1".into()));
    }

    if timeout.is_zero() {
        return Err(SspErr::DataErr("Per-attempt timeout must be positive".into()));
    }

    let packet = build_query_packet(endpoint, opcode);
    let mut last = None;

    for n in 1..=max_attempts {
        log::debug!(
            "Query '{}' to {} (attempt {}/{})",
            opcode,
            endpoint,
            n,
            max_attempts
        );

        match transport.attempt(endpoint, &packet, timeout)? {
            Attempt::Reply(bufs) if bufs.len() >= HEADER_LEN => return Ok(bufs),
            Attempt::Reply(bufs) => {
                log::warn!(
                    "Reply from {} too short ({} bytes), retrying",
                    endpoint,
                    bufs.len()
                );
                last = Some(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Reply too short, expected at least {} bytes, but got: {}",
                        HEADER_LEN,
                        bufs.len()
                    ),
                ));
            }
            Attempt::Lost(err) => {
                log::warn!("Query to {} failed: {}", endpoint, err);
                last = Some(err);
            }
        }
    }

    Err(SspErr::NoResponse {
        attempts: max_attempts,
        last,
    })
}
