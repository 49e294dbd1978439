/*!
 * Core Module
 * Shared primitives for the simulation engines
 */

pub mod types;

pub use types::{Address, BlockId, Size};
