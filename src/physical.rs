/*!
 * Physical Memory
 * Value holder for the configured physical extent size
 */

use crate::core::types::Size;

/// Configured physical extent; no real memory is ever backed by this
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicalMemory {
    total: Size,
}

impl PhysicalMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, size: Size) {
        self.total = size;
    }

    pub fn size(&self) -> Size {
        self.total
    }
}
