use crate::position::Zone;
use crate::ViewType;

/// Returned when an item lookup falls outside the current list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid position {} (len {})", self.index, self.len)
    }
}

impl std::error::Error for IndexError {}

/// Header/footer registration errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The view type is already used by the opposite collection.
    ViewTypeCollision {
        view_type: ViewType,
        registered_to: Zone,
    },
    /// A holder built for one zone was offered to another.
    ZoneMismatch {
        view_type: ViewType,
        expected: Zone,
        found: Zone,
    },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::ViewTypeCollision {
                view_type,
                registered_to,
            } => write!(
                f,
                "view type {view_type} is already registered to a {registered_to}"
            ),
            ConfigurationError::ZoneMismatch {
                view_type,
                expected,
                found,
            } => write!(
                f,
                "holder with view type {view_type} is a {found} holder; expected a {expected} holder"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// A view could not be removed from its parent container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetachError {
    pub reason: String,
}

impl DetachError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DetachError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to detach view: {}", self.reason)
    }
}

impl std::error::Error for DetachError {}

/// A data source failed to produce a page.
#[derive(Debug)]
pub struct LoadError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page load failed: {}", self.message)
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}
