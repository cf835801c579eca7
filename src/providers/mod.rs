//! Generator implementations

pub mod completions;
pub mod unavailable;

// Re-export for convenience
pub use completions::CompletionsClient;
pub use unavailable::Unavailable;
