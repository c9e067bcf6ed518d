use std::fmt;

/// A request refused because of what the user entered, as opposed to a
/// failure of the service itself. Handlers surface the message verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected(pub String);

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Rejected {}

pub fn is_rejection(err: &anyhow::Error) -> bool {
    err.is::<Rejected>()
}
