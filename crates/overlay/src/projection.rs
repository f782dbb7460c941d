use foundation::geo::LatLng;
use foundation::math::Vec2;

/// Host-supplied mapping from geographic coordinates to screen pixels.
///
/// The mapping changes whenever the viewport does (pan settle, zoom, bounds
/// change); the host invokes a projection update and the registry re-queries
/// every live overlay. `None` means the surface cannot project yet; callers
/// keep the previous point.
pub trait Projector {
    fn project(&self, geo: LatLng) -> Option<Vec2>;
}
