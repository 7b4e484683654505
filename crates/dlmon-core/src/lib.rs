pub mod config;
pub mod logging;

// Engine
pub mod detect;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod poll;
pub mod reconcile;
pub mod report;
pub mod root;
pub mod speed;
pub mod tail;
