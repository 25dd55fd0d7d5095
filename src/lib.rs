// Library exports for use in binaries and integration tests
pub mod config;
pub mod error;
pub mod i18n;
pub mod retry;
pub mod routing;
pub mod server;
