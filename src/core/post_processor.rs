//! Message transforms applied before an event is persisted.

use std::fmt;

/// Rewrites an event's message before either writer sees it.
pub trait MessagePostProcessor: Send + Sync {
    /// Transform `message`.
    fn serialize(&self, message: String) -> String;
}

/// Leaves the message untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPostProcessor;

impl MessagePostProcessor for IdentityPostProcessor {
    fn serialize(&self, message: String) -> String {
        message
    }
}

/// Adapts a closure into a post-processor.
#[derive(Clone, Copy)]
pub struct FnPostProcessor<F>(pub F);

impl<F> MessagePostProcessor for FnPostProcessor<F>
where
    F: Fn(String) -> String + Send + Sync,
{
    fn serialize(&self, message: String) -> String {
        (self.0)(message)
    }
}

impl<F> fmt::Debug for FnPostProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnPostProcessor")
    }
}

/// Cuts messages to at most `max_chars` characters so they fit a bounded column.
#[derive(Debug, Clone, Copy)]
pub struct TruncatingPostProcessor {
    max_chars: usize,
}

impl TruncatingPostProcessor {
    /// Create a truncating post-processor.
    #[must_use]
    pub const fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl MessagePostProcessor for TruncatingPostProcessor {
    fn serialize(&self, mut message: String) -> String {
        if let Some((cut, _)) = message.char_indices().nth(self.max_chars) {
            message.truncate(cut);
        }
        message
    }
}
