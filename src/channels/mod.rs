//! Channel sender implementations

pub mod in_app;
pub mod relay;

pub use in_app::InAppSender;
pub use relay::RelaySender;
