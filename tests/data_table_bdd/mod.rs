//! Support modules for data table BDD tests.

pub(crate) mod state;

pub(crate) use state::{TableState, property_rows};
