/*!
    Filter configuration types.
*/

/// Chain used when none is given: passes frames through unchanged.
pub const DEFAULT_CHAIN: &str = "null";

/**
    Configuration for a filter graph.

    The graph runs `chain` on every decoded frame and converts its output
    to `pixel_format`.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    /// FFmpeg name of the output pixel format, e.g. `rgb24` or `gray`.
    pub pixel_format: String,
    /// FFmpeg filter chain description, e.g. `scale=320:240,hflip`.
    pub chain: String,
}

impl FilterConfig {
    /**
        Create a config that only converts to `pixel_format`.
    */
    pub fn new(pixel_format: impl Into<String>) -> Self {
        Self {
            pixel_format: pixel_format.into(),
            chain: DEFAULT_CHAIN.to_string(),
        }
    }

    /**
        Run `chain` before the format conversion.
    */
    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = chain.into();
        self
    }
}
