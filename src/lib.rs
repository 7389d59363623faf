//! Query SA-MP and Open.MP servers over their UDP query protocol.
//!
//! ```no_run
//! use ssp::{Conf, SspErr};
//!
//! fn main() -> Result<(), SspErr> {
//!     let server = Conf::create_from_str("127.0.0.1:7777")?;
//!
//!     println!("{}", server.get_server_info()?);
//!     println!("{}", server.get_players()?);
//!
//!     Ok(())
//! }
//! ```

mod conf;
mod error;
mod packet;
mod server;
mod share;
mod transport;

pub use conf::*;
pub use error::SspErr;
pub use packet::{build_query_packet, Opcode, HEADER_LEN};
pub use server::*;
pub use transport::{query, Attempt, Transport, UdpTransport};
