use rustc_hash::FxHashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Process-wide daemon client configuration. Mutated by project
/// configuration events, read as an immutable snapshot before every
/// request (see `DcdService`).
#[derive(Clone, Debug)]
pub struct DcdConfig {
    /// Port the daemon listens on.
    pub port: u16,
    /// Include directories already announced to the daemon.
    pub include_dirs: FxHashSet<PathBuf>,
    /// Client executable to spawn.
    pub command: String,
    /// Bound on each child-process wait.
    pub timeout: Duration,
}

impl Default for DcdConfig {
    fn default() -> Self {
        Self {
            port: 4242,
            include_dirs: FxHashSet::default(),
            command: "dcd-client".to_string(),
            timeout: Duration::from_millis(50),
        }
    }
}

impl DcdConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
