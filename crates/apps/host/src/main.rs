use std::env;
use std::fs;

use bridge::protocol::{decode_init, GeoCenter, InitPayload, MarkerRecord};
use foundation::geo::LatLng;
use foundation::math::Vec2;
use foundation::time::Time;
use overlay::projection::Projector;
use runtime::frame::Frame;
use surface::Surface;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Latitude bound of the Web-Mercator plane (degrees).
const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128;

/// Web-Mercator projection for a fixed viewport.
///
/// Stands in for the embedded map SDK: geographic coordinates map to the
/// world plane at the current zoom, then shift so the configured center
/// lands mid-viewport.
struct MercatorViewport {
    center: LatLng,
    zoom: u8,
    width_px: f64,
    height_px: f64,
}

impl MercatorViewport {
    fn new(center: LatLng, zoom: u8, width_px: f64, height_px: f64) -> Self {
        Self {
            center,
            zoom,
            width_px,
            height_px,
        }
    }

    fn world_px(&self, geo: LatLng) -> Vec2 {
        let world = 256.0 * (1u64 << self.zoom.min(24)) as f64;
        let x = (geo.lng_deg + 180.0) / 360.0 * world;
        let lat_rad = geo.lat_deg.to_radians();
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
            * world;
        Vec2::new(x, y)
    }
}

impl Projector for MercatorViewport {
    fn project(&self, geo: LatLng) -> Option<Vec2> {
        if !geo.is_valid() || geo.lat_deg.abs() > MERCATOR_MAX_LAT_DEG {
            return None;
        }
        let centered = self.world_px(geo) - self.world_px(self.center);
        Some(centered + Vec2::new(self.width_px / 2.0, self.height_px / 2.0))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let payload = match load_payload() {
        Ok(payload) => payload,
        Err(err) => {
            warn!("{err}; using the built-in demo payload");
            demo_payload()
        }
    };

    info!(
        markers = payload.markers.len(),
        zoom = payload.zoom,
        "installing surface"
    );
    let mut surface = Surface::from_init(payload);

    let camera = surface.viewport();
    let viewport = MercatorViewport::new(camera.center, camera.zoom, 1280.0, 720.0);

    // Initial ready state, then a few idle settles, one declutter pass per
    // frame at most.
    let mut frame = Frame::new(0, 1.0 / 60.0);
    for _ in 0..3 {
        surface.on_projection_update(&viewport);
        if let Some(stats) = surface.on_frame(frame) {
            info!(
                points = stats.points,
                clusters = stats.clusters,
                placements = stats.placements,
                "declutter pass"
            );
        }
        frame = frame.next();
    }

    // One tap, duplicated the way real pointer stacks deliver it.
    let first = surface.registry().iter().next().map(|(id, _)| id);
    if let Some(id) = first {
        surface.on_pointer_activate(id, Time(1.0));
        surface.on_pointer_activate(id, Time(1.05));
    }

    // The outbound stream is what a production host would consume.
    for line in surface.drain_outbound() {
        println!("{line}");
    }

    for (name, value) in surface.counters().snapshot() {
        info!(counter = name, value, "session counter");
    }
}

fn load_payload() -> Result<InitPayload, String> {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => return Err("no payload path given".to_string()),
    };
    let raw = fs::read_to_string(&path).map_err(|err| format!("read {path}: {err}"))?;
    decode_init(&raw).map_err(|err| format!("decode {path}: {err}"))
}

/// A small city-scale scene: two markers close enough to collide at the
/// demo zoom, plus an outlier and one record with broken coordinates.
fn demo_payload() -> InitPayload {
    InitPayload {
        api_key: "demo-key".into(),
        markers: vec![
            MarkerRecord {
                id: "harbor".into(),
                title: "Harbor".into(),
                lat: 59.3250,
                lng: 18.0710,
                glyph: "anchor".into(),
            },
            MarkerRecord {
                id: "old-town".into(),
                title: "Old Town".into(),
                lat: 59.3251,
                lng: 18.0712,
                glyph: "castle".into(),
            },
            MarkerRecord {
                id: "airport".into(),
                title: "Airport".into(),
                lat: 59.6519,
                lng: 17.9186,
                glyph: "plane".into(),
            },
            MarkerRecord {
                id: "broken".into(),
                title: "Broken".into(),
                lat: f64::NAN,
                lng: 18.0,
                glyph: String::new(),
            },
        ],
        center: GeoCenter {
            lat: 59.3293,
            lng: 18.0686,
        },
        zoom: 13,
    }
}
