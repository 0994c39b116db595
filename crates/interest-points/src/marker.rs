//! Marker construction for interest points.
//!
//! Desktop markers carry a popup and a title. Touch devices get neither;
//! a tap hands a card payload to the page's mobile card instead.

use lote_common::LatLng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::{InterestPoint, PointId};

/// CSS class applied to every interest-point marker element.
pub const MARKER_CLASS: &str = "interest-point-marker";

/// CSS class flashed on a marker when it is clicked.
pub const CLICK_FEEDBACK_CLASS: &str = "marker-clicked";

/// How long the click feedback class stays on.
pub const CLICK_FEEDBACK_DURATION: Duration = Duration::from_millis(300);

/// `estado` value that tells the mobile card it is showing an interest
/// point rather than a parcel.
pub const INTEREST_POINT_ESTADO: &str = "punto_interes";

/// Viewport width at or below which the page is laid out for touch.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Device class, resolved once when the overlay is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn from_viewport_width(width_px: u32) -> Self {
        if width_px <= MOBILE_BREAKPOINT_PX {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }
}

/// Popup markup shown on hover/tap on desktop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub html: String,
}

/// What the mobile card receives when an interest point is tapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileCardPayload {
    pub name: String,
    pub estado: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: String,
    pub is_interest_point: bool,
}

impl MobileCardPayload {
    pub fn for_point(point: &InterestPoint) -> Self {
        Self {
            name: point.name.clone(),
            estado: INTEREST_POINT_ESTADO.to_string(),
            location: point.position.to_string(),
            latitude: point.position.lat,
            longitude: point.position.lng,
            price: String::new(),
            is_interest_point: true,
        }
    }
}

/// The page's mobile card, which renders tapped points.
pub trait MobileCardPresenter {
    fn present(&mut self, payload: &MobileCardPayload);
}

/// Everything a map needs to render one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub point_id: PointId,
    pub position: LatLng,
    pub css_class: &'static str,
    /// Plain-text tooltip; `None` on mobile.
    pub title: Option<String>,
    /// `None` on mobile.
    pub popup: Option<Popup>,
    /// Card handed to the mobile presenter on tap; `None` on desktop.
    pub mobile_card: Option<MobileCardPayload>,
}

/// Where a selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickSource {
    Marker,
    ListEntry,
}

/// The UI event behind a selection. Only used for visual feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub source: ClickSource,
}

impl ClickEvent {
    pub fn marker() -> Self {
        Self {
            source: ClickSource::Marker,
        }
    }

    pub fn list_entry() -> Self {
        Self {
            source: ClickSource::ListEntry,
        }
    }
}

/// Builds marker specs for one device class.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerFactory {
    device: DeviceClass,
}

impl MarkerFactory {
    pub fn new(device: DeviceClass) -> Self {
        Self { device }
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn create_marker(&self, point: &InterestPoint) -> MarkerSpec {
        let (title, popup, mobile_card) = match self.device {
            DeviceClass::Desktop => (
                Some(point.name.clone()),
                Some(popup_for(point)),
                None,
            ),
            DeviceClass::Mobile => (None, None, Some(MobileCardPayload::for_point(point))),
        };

        MarkerSpec {
            point_id: point.id.clone(),
            position: point.position,
            css_class: MARKER_CLASS,
            title,
            popup,
            mobile_card,
        }
    }
}

fn popup_for(point: &InterestPoint) -> Popup {
    let html = format!(
        "<div class=\"interest-point-popup\"><strong>{}</strong><br><small>{:.6}, {:.6}</small></div>",
        html_escape::encode_text(&point.name),
        point.position.lat,
        point.position.lng,
    );
    Popup { html }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club() -> InterestPoint {
        InterestPoint::new("1", "Club", -25.71, -56.20)
    }

    #[test]
    fn test_desktop_marker_has_popup_and_title() {
        let marker = MarkerFactory::new(DeviceClass::Desktop).create_marker(&club());
        assert_eq!(marker.title.as_deref(), Some("Club"));
        let popup = marker.popup.unwrap();
        assert!(popup.html.contains("<strong>Club</strong>"));
        assert!(popup.html.contains("-25.710000, -56.200000"));
        assert!(marker.mobile_card.is_none());
    }

    #[test]
    fn test_mobile_marker_has_card_only() {
        let marker = MarkerFactory::new(DeviceClass::Mobile).create_marker(&club());
        assert!(marker.title.is_none());
        assert!(marker.popup.is_none());

        let card = marker.mobile_card.unwrap();
        assert_eq!(card.name, "Club");
        assert_eq!(card.estado, INTEREST_POINT_ESTADO);
        assert_eq!(card.price, "");
        assert!(card.is_interest_point);
        assert_eq!(card.latitude, -25.71);
    }

    #[test]
    fn test_popup_escapes_name() {
        let point = InterestPoint::new("x", "<img src=x onerror=alert(1)> & Co", 0.0, 0.0);
        let popup = MarkerFactory::new(DeviceClass::Desktop)
            .create_marker(&point)
            .popup
            .unwrap();
        assert!(!popup.html.contains("<img"));
        assert!(popup.html.contains("&lt;img"));
        assert!(popup.html.contains("&amp; Co"));
    }

    #[test]
    fn test_card_payload_serializes_camel_case() {
        let card = MobileCardPayload::for_point(&club());
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["isInterestPoint"], true);
        assert_eq!(json["estado"], "punto_interes");
    }

    #[test]
    fn test_device_class_breakpoint() {
        assert_eq!(DeviceClass::from_viewport_width(375), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(768), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(1280), DeviceClass::Desktop);
    }
}
