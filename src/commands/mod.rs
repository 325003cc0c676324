//! Command handlers for the bank-views CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod cashback;
mod demo;
mod main_page;
mod spending;

use crate::reports;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{error, info};

pub use cashback::cashback;
pub use demo::{demo, DemoReports};
pub use main_page::main_page;
pub use spending::spending;

/// The output type for a command. This allows the command to return a consistent message and the
/// report it produced.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// The report produced by the call.
    structure: T,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> &T {
        &self.structure
    }

    /// Print the message to `info!` and the report as JSON to stdout.
    pub fn print(&self) {
        info!("{}", self.message);
        match reports::to_json(&self.structure) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("Unable to print the report: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out() {
        let out: Out<Vec<u32>> = Out::new("done", vec![1, 2]);
        assert_eq!(out.message(), "done");
        assert_eq!(out.structure(), &vec![1, 2]);
    }
}
