use parking_lot::Mutex;

/// The navigational surface the controllers need from the host shell.
///
/// A location is a `path?query` string; the routing framework behind it is
/// the host's business.
pub trait Navigator: Send + Sync {
    /// Current location.
    fn location(&self) -> String;

    /// Replace the current location.
    fn navigate(&self, to: String);
}

/// Extract the query portion of a location (without the `?`).
pub fn query_of(location: &str) -> &str {
    location.split_once('?').map_or("", |(_, query)| query)
}

/// In-memory navigator for hosts without a routing layer, and for tests.
pub struct MemoryNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(initial.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Locations navigated to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> String {
        self.current.lock().clone()
    }

    fn navigate(&self, to: String) {
        self.history.lock().push(to.clone());
        *self.current.lock() = to;
    }
}
