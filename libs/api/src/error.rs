/// Category of a record source failure. The resolver treats every kind
/// as an internal failure; the kind only feeds logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// I/O or network error talking to the backing store.
    Io,
    /// The caller gave up before the query finished.
    Cancelled,
    /// Anything the backend reports about itself (bad state, corrupt index).
    Backend,
}

impl std::fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceErrorKind::Io => f.write_str("io"),
            SourceErrorKind::Cancelled => f.write_str("cancelled"),
            SourceErrorKind::Backend => f.write_str("backend"),
        }
    }
}

/// Error returned by [`RecordSource`](crate::RecordSource) implementations.
///
/// Carries a `SourceErrorKind` and a human-readable message. `From` impls
/// pick the kind so backends can use `?` freely.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    /// Generic backend error (default kind).
    pub fn new(msg: impl Into<String>) -> Self {
        Self { kind: SourceErrorKind::Backend, message: msg.into() }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: SourceErrorKind::Io, message: msg.into() }
    }

    pub fn cancelled() -> Self {
        Self { kind: SourceErrorKind::Cancelled, message: "query cancelled".into() }
    }

    pub fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == SourceErrorKind::Cancelled
    }
}

impl std::fmt::Debug for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

impl From<String> for SourceError {
    fn from(s: String) -> Self { Self::new(s) }
}

impl From<&str> for SourceError {
    fn from(s: &str) -> Self { Self::new(s) }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self { Self::io(e.to_string()) }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self { Self::new(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = SourceError::new("get records test error");
        assert_eq!(err.to_string(), "get records test error");
        assert_eq!(format!("{err:?}"), "[backend] get records test error");
    }

    #[test]
    fn from_impls_pick_the_kind() {
        let io: SourceError = std::io::Error::other("disk gone").into();
        assert_eq!(io.kind(), SourceErrorKind::Io);

        let json: SourceError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert_eq!(json.kind(), SourceErrorKind::Backend);

        assert!(SourceError::cancelled().is_cancelled());
    }
}
