/*!
 * Core Types
 * Common types used across the simulation engines
 */

/// Offset into a simulated address extent
pub type Address = usize;

/// Size in bytes within a simulated extent
pub type Size = usize;

/// Allocation identifier handed out by the allocators (0 is the free sentinel)
pub type BlockId = u32;
