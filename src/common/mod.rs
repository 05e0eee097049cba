//! Common, shared types.

pub mod clock;
pub mod rng;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
