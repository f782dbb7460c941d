use bridge::protocol::MarkerRecord;
use foundation::geo::LatLng;
use foundation::handles::Handle;
use foundation::math::Vec2;
use foundation::time::Time;

use crate::overlay::{Overlay, OverlayId};
use crate::projection::Projector;

/// Ordered set of live overlays.
///
/// Slots keep creation order for the lifetime of an install; `detach` clears
/// a slot without renumbering, so declutter order stays stable while markers
/// come and go.
///
/// Ownership contract:
/// - only the registry mutates an overlay's projected point (`update_projection`);
/// - only the declutter pass writes placement, through `apply_placement`.
#[derive(Debug, Default)]
pub struct OverlayRegistry {
    slots: Vec<Option<Overlay>>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `marker` to a new overlay slot and returns its id.
    ///
    /// Malformed records (non-finite or out-of-range coordinates) are
    /// skipped: the call returns `None` and the rest of the list is
    /// unaffected.
    pub fn attach(&mut self, marker: MarkerRecord) -> Option<OverlayId> {
        if !LatLng::new(marker.lat, marker.lng).is_valid() {
            return None;
        }
        let id = OverlayId(Handle::new(self.slots.len() as u32, 0));
        self.slots.push(Some(Overlay::new(marker)));
        Some(id)
    }

    /// Clears the overlay's slot, removing it from all future passes.
    /// Idempotent; returns `true` if the slot was live.
    pub fn detach(&mut self, id: OverlayId) -> bool {
        match self.slots.get_mut(id.index() as usize) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.slots.get(id.index() as usize)?.as_ref()
    }

    /// Runs the overlay's tap gate; on a fired activation returns the bound
    /// marker for forwarding to the host. Duplicates inside the refractory
    /// window return `None`.
    pub fn try_activate(&mut self, id: OverlayId, now: Time) -> Option<MarkerRecord> {
        let overlay = self.slots.get_mut(id.index() as usize)?.as_mut()?;
        overlay.tap.try_activate(now).then(|| overlay.marker.clone())
    }

    /// Recomputes every live overlay's projected point.
    ///
    /// An overlay the projector cannot place keeps its previous point (or
    /// stays unpositioned if it never had one). Returns how many overlays
    /// received a fresh point, so the caller knows whether to request a
    /// layout pass.
    pub fn update_projection<P: Projector>(&mut self, projector: &P) -> usize {
        let mut updated = 0;
        for slot in &mut self.slots {
            let Some(overlay) = slot else { continue };
            let geo = LatLng::new(overlay.marker.lat, overlay.marker.lng);
            if let Some(point) = projector.project(geo) {
                overlay.point = Some(point);
                updated += 1;
            }
        }
        updated
    }

    /// Live overlays with a valid projected point, in creation order.
    pub fn positioned(&self) -> Vec<(OverlayId, Vec2)> {
        let mut out = Vec::new();
        for (idx, slot) in self.slots.iter().enumerate() {
            let Some(overlay) = slot else { continue };
            let Some(point) = overlay.point else { continue };
            if !point.is_finite() {
                continue;
            }
            out.push((OverlayId(Handle::new(idx as u32, 0)), point));
        }
        out
    }

    /// Writes a declutter placement. Silently ignored for detached overlays.
    pub fn apply_placement(&mut self, id: OverlayId, offset: Vec2, z_order: i32) {
        if let Some(overlay) = self
            .slots
            .get_mut(id.index() as usize)
            .and_then(|s| s.as_mut())
        {
            overlay.offset = offset;
            overlay.z_order = z_order;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (OverlayId, &Overlay)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref()
                .map(|o| (OverlayId(Handle::new(idx as u32, 0)), o))
        })
    }

    /// Number of live overlays.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tears down every overlay. Reinstalling a marker list starts from an
    /// empty registry rather than patching the old one.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
