pub mod cli;
pub mod convert;
pub mod fetch;
pub mod logging;
pub mod metrics;
pub mod sink;
