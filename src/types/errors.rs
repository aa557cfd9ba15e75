use std::fmt;

// === StoreError ===

/// Errors related to the key-value storage backend.
#[derive(Debug)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    Backend(String),
    /// A stored value could not be serialized or deserialized.
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend(msg) => write!(f, "Storage backend error: {}", msg),
            StoreError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === EngineError ===

/// Errors raised by the rule engine itself.
#[derive(Debug)]
pub enum EngineError {
    /// An edit mode was requested while rules are disabled on the site.
    SiteInactive,
    /// A storage operation failed underneath an engine operation.
    Store(StoreError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SiteInactive => write!(f, "PageTrim is disabled on this site"),
            EngineError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::Store(err)
    }
}

// === CommandError ===

/// Errors at the command channel boundary.
#[derive(Debug)]
pub enum CommandError {
    /// The requested action is not part of the command protocol.
    UnknownAction(String),
    /// The payload is missing a field or carries the wrong type.
    InvalidPayload(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownAction(action) => write!(f, "Unknown action: {}", action),
            CommandError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
        }
    }
}

impl std::error::Error for CommandError {}

// === LoadError ===

/// Errors while bringing a page document into the engine.
#[derive(Debug)]
pub enum LoadError {
    /// Reading a local file failed.
    Io(String),
    /// Fetching a remote document failed.
    Fetch(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "Failed to read document: {}", msg),
            LoadError::Fetch(msg) => write!(f, "Failed to fetch document: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}
