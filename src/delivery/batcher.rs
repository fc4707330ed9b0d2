//! Groups display units into batches that each fit one Slack message.

use super::unit::DisplayUnit;

/// Total size budget for all attachments in one message.
pub const MESSAGE_SIZE_LIMIT: usize = 6000;

/// Units that travel together in a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryBatch {
    units: Vec<DisplayUnit>,
}

impl DeliveryBatch {
    #[must_use]
    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    #[must_use]
    pub fn into_units(self) -> Vec<DisplayUnit> {
        self.units
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn estimated_size(&self) -> usize {
        self.units.iter().map(DisplayUnit::estimated_size).sum()
    }
}

/// Greedily pack `units` into as few batches as possible without reordering
/// or splitting them.
///
/// A unit that is larger than `limit` on its own still gets a batch of its own.
#[must_use]
pub fn batch_units(units: Vec<DisplayUnit>, limit: usize) -> Vec<DeliveryBatch> {
    let mut batches = Vec::new();
    let mut current: Vec<DisplayUnit> = Vec::new();
    let mut current_size = 0;

    for unit in units {
        let size = unit.estimated_size();
        if !current.is_empty() && current_size + size > limit {
            batches.push(DeliveryBatch {
                units: std::mem::take(&mut current),
            });
            current_size = 0;
        }
        current_size += size;
        current.push(unit);
    }

    if !current.is_empty() {
        batches.push(DeliveryBatch { units: current });
    }

    batches
}
