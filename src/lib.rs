pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod poller;
pub mod review;
