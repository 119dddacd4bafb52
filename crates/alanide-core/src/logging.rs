//! Tracing initialization for hosts and tests

use tracing::Level;

/// Initialize tracing with the given maximum level
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(max_level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .try_init();
}

/// Initialize tracing at INFO, the default for interactive use
pub fn init_default() {
    init(Level::INFO);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_default();
        init(Level::DEBUG);
    }
}
