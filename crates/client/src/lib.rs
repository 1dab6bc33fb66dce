pub mod config;
pub mod editor;
pub mod error;
pub mod http;
pub mod panel;
pub mod session;
pub mod source;
pub mod wire;
