//! Hot reload: change detection and the background reload worker

pub mod manager;
pub mod notifier;

pub use manager::{ReloadManager, ReloadStats};
pub use notifier::FileWatcherNotifier;
