/// Ssp error uniform error definition.
#[derive(Debug)]
pub enum SspErr {
    /// Invalid input supplied by the caller, such as a malformed address.
    DataErr(String),
    /// Every attempt timed out or returned a datagram too short to be a reply.
    NoResponse {
        /// Number of attempts performed.
        attempts: u32,
        /// Last transport error observed, if any.
        last: Option<std::io::Error>,
    },
    /// Handling errors that occur while creating or configuring sockets.
    IoErr(std::io::Error),
}

impl std::fmt::Display for SspErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SspErr::DataErr(str) => write!(f, "{}", str),
            SspErr::NoResponse { attempts, last } => match last {
                Some(err) => write!(
                    f,
                    "No response from server after {} attempt(s): {}",
                    attempts, err
                ),
                None => write!(f, "No response from server after {} attempt(s)", attempts),
            },
            SspErr::IoErr(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SspErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SspErr::NoResponse {
                last: Some(err), ..
            } => Some(err),
            SspErr::IoErr(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SspErr {
    fn from(err: std::io::Error) -> Self {
        SspErr::IoErr(err)
    }
}

impl SspErr {
    /// Whether the server simply did not answer, as opposed to a local failure.
    pub fn is_no_response(&self) -> bool {
        matches!(self, SspErr::NoResponse { .. })
    }
}
