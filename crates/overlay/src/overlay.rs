use bridge::protocol::MarkerRecord;
use foundation::handles::Handle;
use foundation::math::Vec2;

use crate::tap::TapGate;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OverlayId(pub Handle);

impl OverlayId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }
}

/// A visual element bound 1:1 to a marker.
///
/// Owns the marker's current projected point (none until the first
/// successful projection) and its declutter placement. The registry
/// exclusively owns position mutation; the declutter pass writes placement
/// through the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub marker: MarkerRecord,
    pub point: Option<Vec2>,
    pub offset: Vec2,
    pub z_order: i32,
    pub tap: TapGate,
}

impl Overlay {
    pub fn new(marker: MarkerRecord) -> Self {
        Self {
            marker,
            point: None,
            offset: Vec2::ZERO,
            z_order: 0,
            tap: TapGate::default(),
        }
    }

    /// Screen position of the visual element: projected point plus the
    /// declutter offset.
    pub fn screen_position(&self) -> Option<Vec2> {
        self.point.map(|p| p + self.offset)
    }
}
