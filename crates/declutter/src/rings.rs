use foundation::math::Vec2;

/// Radius of the innermost ring (pixels).
pub const BASE_RING_PX: f64 = 26.0;
/// Radius step between consecutive rings (pixels).
pub const STEP_RING_PX: f64 = 18.0;
/// Z-order floor for cluster members.
pub const CLUSTER_BASE_Z: i32 = 1000;
/// Z-order of undisturbed singleton overlays.
pub const BASELINE_Z: i32 = 0;

/// Member capacity of ring `ring`: 6, 10, 14, ...
pub fn ring_capacity(ring: u32) -> usize {
    6 + 4 * ring as usize
}

/// Placement of one cluster member relative to the cluster anchor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RingSlot {
    pub ring: u32,
    pub angle_index: u32,
    pub offset: Vec2,
    pub z_order: i32,
}

/// Anchor-centered radial layout for `count` cluster members.
///
/// Members fill rings inside-out in cluster order. Within a ring holding `n`
/// members, member `i` sits at angle `2π·i/n` and offset
/// `(cos·radius, sin·radius)`. Stacking order is `1000 + ring·100 + i`, so
/// z-order strictly follows (ring, position) and never interleaves rings.
pub fn ring_layout(count: usize) -> Vec<RingSlot> {
    let mut out = Vec::with_capacity(count);
    let mut remaining = count;
    let mut ring = 0u32;

    while remaining > 0 {
        let on_ring = remaining.min(ring_capacity(ring));
        let radius = BASE_RING_PX + STEP_RING_PX * ring as f64;
        for i in 0..on_ring {
            let angle = std::f64::consts::TAU * i as f64 / on_ring as f64;
            out.push(RingSlot {
                ring,
                angle_index: i as u32,
                offset: Vec2::new(angle.cos() * radius, angle.sin() * radius),
                z_order: CLUSTER_BASE_Z + ring as i32 * 100 + i as i32,
            });
        }
        remaining -= on_ring;
        ring += 1;
    }

    out
}
