use bridge::outbound::Outbound;
use bridge::protocol::InitPayload;
use declutter::engine::{DeclutterEngine, PassStats};
use foundation::geo::LatLng;
use foundation::time::Time;
use overlay::overlay::OverlayId;
use overlay::projection::Projector;
use overlay::registry::OverlayRegistry;
use runtime::frame::Frame;
use runtime::metrics::Counters;
use runtime::scheduler::LayoutScheduler;

/// Initial camera handed over by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

/// The embedded marker surface.
///
/// Composition root wiring the overlay registry, the per-frame layout
/// scheduler, the declutter engine, and the outbound host channel. Every
/// entry point runs synchronously inside a host callback; the surface and
/// its registry must stay confined to one logical thread.
#[derive(Debug)]
pub struct Surface {
    api_key: String,
    viewport: Viewport,
    registry: OverlayRegistry,
    scheduler: LayoutScheduler,
    engine: DeclutterEngine,
    outbound: Outbound,
    counters: Counters,
}

impl Surface {
    /// One-shot initialization from the host payload.
    pub fn from_init(payload: InitPayload) -> Self {
        Self::with_engine(payload, DeclutterEngine::default())
    }

    /// Initialization with a non-default partition strategy.
    pub fn with_engine(payload: InitPayload, engine: DeclutterEngine) -> Self {
        let mut surface = Self {
            api_key: String::new(),
            viewport: Viewport {
                center: LatLng::new(0.0, 0.0),
                zoom: 0,
            },
            registry: OverlayRegistry::new(),
            scheduler: LayoutScheduler::new(),
            engine,
            outbound: Outbound::new(),
            counters: Counters::new(),
        };
        surface.install(payload);
        surface
    }

    /// Replaces the marker list wholesale: full teardown, then re-attach.
    /// There is no incremental patching of an installed list.
    pub fn reinstall(&mut self, payload: InitPayload) {
        self.install(payload);
    }

    fn install(&mut self, payload: InitPayload) {
        self.api_key = payload.api_key;
        self.viewport = Viewport {
            center: LatLng::new(payload.center.lat, payload.center.lng),
            zoom: payload.zoom,
        };
        self.registry.clear();

        for (idx, mut marker) in payload.markers.into_iter().enumerate() {
            if marker.id.is_empty() {
                // Positional identity fallback, so pinClick events always
                // carry a usable key.
                marker.id = idx.to_string();
            }
            match self.registry.attach(marker) {
                Some(_) => self.counters.inc("markers.attached"),
                None => self.counters.inc("markers.skipped"),
            }
        }
    }

    /// Host viewport event (ready state, pan settle, zoom, bounds change):
    /// recompute projections, then coalesce one layout pass.
    pub fn on_projection_update<P: Projector>(&mut self, projector: &P) {
        let updated = self.registry.update_projection(projector);
        self.counters.add("projection.updated", updated as u64);
        if updated > 0 {
            self.scheduler.request_pass();
        }
    }

    /// Host pointer event on an overlay.
    ///
    /// A fired activation forwards the full marker as `pinClick` plus a
    /// diagnostic `log`; duplicate signals inside the refractory window are
    /// suppressed and return `false`.
    pub fn on_pointer_activate(&mut self, id: OverlayId, now: Time) -> bool {
        let Some(marker) = self.registry.try_activate(id, now) else {
            self.counters.inc("taps.suppressed");
            return false;
        };

        self.counters.inc("taps.fired");
        self.outbound.log(
            now,
            format!(
                "pin tapped: {} ({}, {})",
                marker.title, marker.lat, marker.lng
            ),
            None,
        );
        self.outbound.pin_click(marker);
        true
    }

    /// Detaches one overlay, removing it from all future passes.
    pub fn detach(&mut self, id: OverlayId) -> bool {
        self.registry.detach(id)
    }

    /// Frame boundary: runs at most one declutter pass, however many
    /// projection updates arrived since the last frame.
    pub fn on_frame(&mut self, frame: Frame) -> Option<PassStats> {
        if !self.scheduler.take_pending() {
            return None;
        }

        let stats = self.engine.run(&mut self.registry);
        self.counters.inc("declutter.passes");
        self.counters.add("declutter.placements", stats.placements as u64);
        self.outbound.log(
            frame.time,
            format!(
                "declutter: {} points -> {} clusters",
                stats.points, stats.clusters
            ),
            None,
        );
        Some(stats)
    }

    /// Encoded outbound lines for the host channel.
    pub fn drain_outbound(&mut self) -> Vec<String> {
        self.outbound.drain()
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    pub fn overlay_count(&self) -> usize {
        self.registry.len()
    }

    /// Opaque credential for the external map provider; never inspected.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::Surface;
    use bridge::protocol::{GeoCenter, InitPayload, MarkerRecord};
    use foundation::geo::LatLng;
    use foundation::math::Vec2;
    use foundation::time::Time;
    use overlay::projection::Projector;
    use pretty_assertions::assert_eq;
    use runtime::frame::Frame;

    /// Maps degrees straight to pixels at 10 px per degree.
    struct TenPxPerDegree;

    impl Projector for TenPxPerDegree {
        fn project(&self, geo: LatLng) -> Option<Vec2> {
            Some(Vec2::new(geo.lng_deg * 10.0, geo.lat_deg * 10.0))
        }
    }

    struct NotReady;

    impl Projector for NotReady {
        fn project(&self, _geo: LatLng) -> Option<Vec2> {
            None
        }
    }

    fn marker(id: &str, lat: f64, lng: f64) -> MarkerRecord {
        MarkerRecord {
            id: id.into(),
            title: id.to_uppercase(),
            lat,
            lng,
            glyph: "pin".into(),
        }
    }

    fn payload(markers: Vec<MarkerRecord>) -> InitPayload {
        InitPayload {
            api_key: "k-demo".into(),
            markers,
            center: GeoCenter { lat: 10.0, lng: 10.0 },
            zoom: 12,
        }
    }

    fn crowded_surface() -> Surface {
        // Two markers two pixels apart, one far away.
        Surface::from_init(payload(vec![
            marker("a", 10.0, 10.0),
            marker("b", 10.1, 10.2),
            marker("c", 50.0, 50.0),
        ]))
    }

    #[test]
    fn burst_of_updates_runs_one_pass_per_frame() {
        let mut surface = crowded_surface();
        for _ in 0..10 {
            surface.on_projection_update(&TenPxPerDegree);
        }

        let frame = Frame::new(0, 1.0 / 60.0);
        assert!(surface.on_frame(frame).is_some());
        assert!(surface.on_frame(frame.next()).is_none());
        assert_eq!(surface.counters().get("declutter.passes"), 1);
    }

    #[test]
    fn pipeline_places_crowded_pair_on_a_ring() {
        let mut surface = crowded_surface();
        surface.on_projection_update(&TenPxPerDegree);
        let stats = surface.on_frame(Frame::new(0, 1.0 / 60.0)).unwrap();

        assert_eq!(stats.points, 3);
        assert_eq!(stats.clusters, 2);

        let offsets: Vec<Vec2> = surface.registry().iter().map(|(_, o)| o.offset).collect();
        assert!((offsets[0].x - 26.0).abs() < 1e-9);
        assert!((offsets[1].x + 26.0).abs() < 1e-9);
        assert_eq!(offsets[2], Vec2::ZERO);
    }

    #[test]
    fn unready_projection_schedules_nothing() {
        let mut surface = crowded_surface();
        surface.on_projection_update(&NotReady);
        assert!(surface.on_frame(Frame::new(0, 1.0 / 60.0)).is_none());
    }

    #[test]
    fn double_tap_emits_one_pin_click() {
        let mut surface = crowded_surface();
        let first = surface.registry().iter().next().map(|(id, _)| id).unwrap();

        assert!(surface.on_pointer_activate(first, Time(1.0)));
        assert!(!surface.on_pointer_activate(first, Time(1.2)));

        let lines = surface.drain_outbound();
        let clicks = lines
            .iter()
            .filter(|l| l.contains("\"type\":\"pinClick\""))
            .count();
        assert_eq!(clicks, 1);
        assert_eq!(surface.counters().get("taps.suppressed"), 1);
    }

    #[test]
    fn activation_forwards_marker_and_log() {
        let mut surface = crowded_surface();
        let first = surface.registry().iter().next().map(|(id, _)| id).unwrap();

        surface.on_pointer_activate(first, Time(1.0));
        let lines = surface.drain_outbound();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"type\":\"log\""));
        assert!(lines[0].contains("pin tapped: A (10, 10)"));
        assert!(lines[1].contains("\"type\":\"pinClick\""));
        assert!(lines[1].contains("\"id\":\"a\""));
    }

    #[test]
    fn malformed_markers_are_skipped_not_fatal() {
        let surface = Surface::from_init(payload(vec![
            marker("a", 10.0, 10.0),
            marker("bad", f64::NAN, 10.0),
            marker("c", 12.0, 12.0),
        ]));
        assert_eq!(surface.overlay_count(), 2);
        assert_eq!(surface.counters().get("markers.skipped"), 1);
    }

    #[test]
    fn missing_ids_fall_back_to_position() {
        let surface = Surface::from_init(payload(vec![
            MarkerRecord {
                id: String::new(),
                title: "No id".into(),
                lat: 1.0,
                lng: 1.0,
                glyph: String::new(),
            },
            marker("named", 2.0, 2.0),
        ]));
        let ids: Vec<String> = surface
            .registry()
            .iter()
            .map(|(_, o)| o.marker.id.clone())
            .collect();
        assert_eq!(ids, vec!["0".to_string(), "named".to_string()]);
    }

    #[test]
    fn reinstall_replaces_the_marker_list() {
        let mut surface = crowded_surface();
        surface.on_projection_update(&TenPxPerDegree);
        surface.on_frame(Frame::new(0, 1.0 / 60.0));

        surface.reinstall(payload(vec![marker("z", 5.0, 5.0)]));
        assert_eq!(surface.overlay_count(), 1);
        assert_eq!(surface.api_key(), "k-demo");

        // New overlays start unpositioned until the next projection event.
        assert!(surface.registry().positioned().is_empty());
        surface.on_projection_update(&TenPxPerDegree);
        assert_eq!(surface.registry().positioned().len(), 1);
    }

    #[test]
    fn pass_logs_are_throttled() {
        let mut surface = crowded_surface();
        let mut frame = Frame::new(0, 1.0 / 60.0);
        for _ in 0..6 {
            surface.on_projection_update(&TenPxPerDegree);
            surface.on_frame(frame);
            frame = frame.next();
        }

        // Six passes in ~0.1s of surface time: one log line passes the
        // 300 ms throttle.
        let logs = surface
            .drain_outbound()
            .into_iter()
            .filter(|l| l.contains("\"type\":\"log\""))
            .count();
        assert_eq!(logs, 1);
        assert_eq!(surface.counters().get("declutter.passes"), 6);
    }
}
