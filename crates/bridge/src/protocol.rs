//! Bridge protocol types for surface-host communication.
//!
//! This module defines the wire format for:
//! - Initialization payload (host → surface, one-shot)
//! - Outbound events (surface → host)
//!
//! Host and surface never share memory; every crossing is a serialized,
//! tagged record, one JSON object per line. The protocol is
//! transport-agnostic (webview channel, stdio, socket).

use serde::{Deserialize, Serialize};

/// One geo-located marker supplied by the host.
///
/// Immutable from the surface's perspective. Identity key is `id`; an absent
/// id is filled with the marker's positional index at install time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub glyph: String,
}

/// Initial map center in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCenter {
    pub lat: f64,
    pub lng: f64,
}

/// One-shot configuration from the host.
///
/// `api_key` is opaque credential material for the external map provider;
/// the surface stores it untouched. Marker-list changes after
/// initialization require a full reinstall, not incremental patching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    pub api_key: String,
    pub markers: Vec<MarkerRecord>,
    pub center: GeoCenter,
    pub zoom: u8,
}

/// Message from surface to host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceMessage {
    /// Diagnostic line; the host may display or discard it.
    Log {
        msg: String,
        extra: Option<serde_json::Value>,
    },

    /// The user activated a marker; the host owns subsequent navigation.
    PinClick { event: MarkerRecord },
}

/// Encodes one outbound message as a single JSON line (no trailing newline).
pub fn encode_line(msg: &SurfaceMessage) -> serde_json::Result<String> {
    serde_json::to_string(msg)
}

/// Decodes the host's initialization payload.
pub fn decode_init(raw: &str) -> serde_json::Result<InitPayload> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> MarkerRecord {
        MarkerRecord {
            id: "m-1".into(),
            title: "Harbor".into(),
            lat: 59.33,
            lng: 18.07,
            glyph: "anchor".into(),
        }
    }

    #[test]
    fn pin_click_is_tagged() {
        let line = encode_line(&SurfaceMessage::PinClick { event: marker() }).unwrap();
        assert!(line.starts_with("{\"type\":\"pinClick\""), "{line}");
        assert!(line.contains("\"id\":\"m-1\""));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn log_serializes_null_extra() {
        let line = encode_line(&SurfaceMessage::Log {
            msg: "ready".into(),
            extra: None,
        })
        .unwrap();
        assert_eq!(line, "{\"type\":\"log\",\"msg\":\"ready\",\"extra\":null}");
    }

    #[test]
    fn decodes_init_payload() {
        let raw = r#"{
            "apiKey": "k-123",
            "markers": [
                {"id": "a", "title": "A", "lat": 1.0, "lng": 2.0, "glyph": "pin"},
                {"title": "No id", "lat": 3.0, "lng": 4.0}
            ],
            "center": {"lat": 1.5, "lng": 3.0},
            "zoom": 12
        }"#;
        let payload = decode_init(raw).unwrap();
        assert_eq!(payload.api_key, "k-123");
        assert_eq!(payload.zoom, 12);
        assert_eq!(payload.markers.len(), 2);
        assert_eq!(payload.markers[1].id, "");
        assert_eq!(payload.markers[1].glyph, "");
    }

    #[test]
    fn round_trips_messages() {
        let msg = SurfaceMessage::PinClick { event: marker() };
        let line = encode_line(&msg).unwrap();
        let back: SurfaceMessage = serde_json::from_str(&line).unwrap();
        assert_eq!(back, msg);
    }
}
