//! One-shot listing command.
//!
//! - [`listing`]: builds the initial query from configuration and loads a page
//!
//! Output formatting utilities are in [`output`].

pub mod listing;
pub mod output;
