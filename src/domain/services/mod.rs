pub mod humanize;
pub mod name_resolver;
pub mod notification;
pub mod notifier;
pub mod run_executor;
