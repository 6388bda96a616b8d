//! Library side of the bank review CLI: logging setup and the staged
//! pipeline functions the run-once commands are built on.

pub mod logging;
pub mod pipeline;
