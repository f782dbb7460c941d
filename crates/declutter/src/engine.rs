use foundation::math::Vec2;
use overlay::registry::OverlayRegistry;

use crate::partition::{GreedyPartition, PartitionStrategy};
use crate::rings::{BASELINE_Z, ring_layout};

/// Deterministic counters for one declutter pass.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PassStats {
    /// Overlays that had a projected point when the pass ran.
    pub points: usize,
    pub clusters: usize,
    pub singletons: usize,
    pub placements: usize,
}

/// The declutter pass.
///
/// Reads the projected positions of all live overlays, partitions them into
/// proximity clusters, and writes each member's visual offset and stacking
/// order back through the registry. Geographic coordinates are never
/// touched, only the derived placement.
///
/// Ordering contract: overlays are considered in creation order, so two
/// passes over an unchanged registry produce identical placements.
#[derive(Debug)]
pub struct DeclutterEngine {
    strategy: Box<dyn PartitionStrategy>,
}

impl Default for DeclutterEngine {
    fn default() -> Self {
        Self::new(Box::new(GreedyPartition::default()))
    }
}

impl DeclutterEngine {
    pub fn new(strategy: Box<dyn PartitionStrategy>) -> Self {
        Self { strategy }
    }

    /// Runs one pass over the registry.
    pub fn run(&self, registry: &mut OverlayRegistry) -> PassStats {
        let positioned = registry.positioned();
        let mut stats = PassStats {
            points: positioned.len(),
            ..PassStats::default()
        };
        if positioned.is_empty() {
            return stats;
        }

        let points: Vec<Vec2> = positioned.iter().map(|(_, p)| *p).collect();
        let clusters = self.strategy.partition(&points);
        stats.clusters = clusters.len();

        for cluster in &clusters {
            if let [only] = cluster.members[..] {
                stats.singletons += 1;
                stats.placements += 1;
                let (id, _) = positioned[only];
                registry.apply_placement(id, Vec2::ZERO, BASELINE_Z);
                continue;
            }

            let slots = ring_layout(cluster.members.len());
            for (&member, slot) in cluster.members.iter().zip(&slots) {
                let (id, _) = positioned[member];
                registry.apply_placement(id, slot.offset, slot.z_order);
                stats.placements += 1;
            }
        }

        stats
    }
}
