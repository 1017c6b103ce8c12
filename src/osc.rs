//! OSC message encoding and the UDP control client.
//!
//! The bridge speaks exactly one message shape: an address pattern built from
//! the column-connect template, carrying a single int32 argument. Datagrams
//! are unicast UDP, fire-and-forget — no acknowledgement, no retry.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use tracing::debug;

/// Default host the control messages are sent to.
pub const DEFAULT_TARGET_HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Default UDP port of the downstream control receiver.
pub const DEFAULT_TARGET_PORT: u16 = 7000;

/// Argument carried by every column-connect message.
pub const CONNECT_ARG: i32 = 1;

/// Default destination endpoint for control messages.
pub fn default_target() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(DEFAULT_TARGET_HOST), DEFAULT_TARGET_PORT)
}

/// Build the address pattern that connects the given column.
pub fn column_connect_address(column: &str) -> String {
    format!("/composition/columns/{column}/connect")
}

/// Encode one OSC message with a single int32 argument.
///
/// Wire layout: NUL-terminated address padded to a 4-byte boundary, the
/// type-tag string `,i` padded likewise, then the argument as big-endian
/// int32. The resulting datagram length is always a multiple of 4.
pub fn encode_message(address: &str, arg: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(address.len() + 12);
    push_padded_string(&mut buf, address);
    push_padded_string(&mut buf, ",i");
    buf.extend_from_slice(&arg.to_be_bytes());
    buf
}

/// Append an OSC string: the bytes, a NUL terminator, and zero padding up to
/// the next 4-byte boundary.
fn push_padded_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

/// Fire-and-forget UDP sender for column-connect messages.
///
/// Bound to an ephemeral local port and connected to a fixed destination for
/// the lifetime of a session. Sends are independent and non-blocking; losing
/// a datagram is acceptable by design of the transport.
pub struct OscSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscSender {
    /// Bind a local socket and connect it to the destination endpoint.
    pub fn connect(target: SocketAddr) -> std::io::Result<Self> {
        let bind_addr: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(target)?;
        Ok(Self { socket, target })
    }

    /// Connect to the default local control endpoint.
    pub fn connect_default() -> std::io::Result<Self> {
        Self::connect(default_target())
    }

    /// Send one message to the connected endpoint.
    pub fn send(&self, address: &str, arg: i32) -> std::io::Result<()> {
        let datagram = encode_message(address, arg);
        self.socket.send(&datagram)?;
        debug!(%address, arg, "sent control message");
        Ok(())
    }

    /// Send the column-connect message for the given column.
    pub fn send_connect(&self, column: &str) -> std::io::Result<()> {
        self.send(&column_connect_address(column), CONNECT_ARG)
    }

    /// The destination endpoint this sender is connected to.
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl std::fmt::Debug for OscSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OscSender")
            .field("target", &self.target)
            .finish()
    }
}
