//! Analyzer app: session runtime binding the pure workflow core to the
//! REST client, plus configuration and logger setup.
pub mod config;
pub mod effects;
pub mod logging;
pub mod session;
