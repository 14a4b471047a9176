/*!
    Source configuration types.
*/

/// Default number of consecutive "try again" reads tolerated before giving up.
pub const DEFAULT_READ_RETRY_LIMIT: u32 = 64;

/**
    Configuration for opening a video source.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceConfig {
    /// Consecutive transient read failures tolerated before a read error.
    pub read_retry_limit: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            read_retry_limit: DEFAULT_READ_RETRY_LIMIT,
        }
    }
}

impl SourceConfig {
    /**
        Create a new config with default settings.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Set how many consecutive transient read failures are retried.

        Zero means the first transient failure is reported as an error.
    */
    pub fn with_read_retry_limit(mut self, limit: u32) -> Self {
        self.read_retry_limit = limit;
        self
    }
}
