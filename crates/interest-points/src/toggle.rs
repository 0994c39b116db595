//! Visibility switch for the overlay.
//!
//! The page has a primary "show interest points" checkbox and, on some
//! layouts, a second one inside the mobile drawer. Both mirror the same
//! state. A change on one control updates the other's checked state
//! directly; the mirrored control never dispatches a change of its own,
//! so the two cannot ping-pong.

use crate::map::MapSurface;
use crate::overlay::InterestPointsOverlay;

/// Which control the user touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSource {
    Primary,
    Mobile,
}

/// Checked state of the primary control and its optional mobile mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityToggle {
    primary: bool,
    mobile: Option<bool>,
}

impl VisibilityToggle {
    /// Both controls start checked.
    pub fn new(has_mobile_control: bool) -> Self {
        Self {
            primary: true,
            mobile: has_mobile_control.then_some(true),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.primary
    }

    pub fn mobile_checked(&self) -> Option<bool> {
        self.mobile
    }

    /// Record a user change on `source` and mirror it onto the other
    /// control. Returns the visibility to apply, or `None` when the state
    /// did not actually change.
    pub fn on_change(&mut self, source: ToggleSource, checked: bool) -> Option<bool> {
        if source == ToggleSource::Mobile && self.mobile.is_none() {
            tracing::debug!("Change from absent mobile toggle ignored");
            return None;
        }

        let changed = self.primary != checked;
        self.primary = checked;
        if let Some(mobile) = self.mobile.as_mut() {
            *mobile = checked;
        }

        changed.then_some(checked)
    }

    /// Apply a user change to the overlay.
    pub fn dispatch<M: MapSurface + ?Sized>(
        &mut self,
        overlay: &mut InterestPointsOverlay,
        map: &mut M,
        source: ToggleSource,
        checked: bool,
    ) {
        if let Some(visible) = self.on_change(source, checked) {
            overlay.set_visible(map, visible);
        }
    }

    /// Reflect the overlay's actual visibility on both controls without
    /// dispatching anything, e.g. after the overlay was rebuilt.
    pub fn sync_from(&mut self, overlay: &InterestPointsOverlay) {
        let visible = overlay.is_visible();
        self.primary = visible;
        if let Some(mobile) = self.mobile.as_mut() {
            *mobile = visible;
        }
    }
}

impl Default for VisibilityToggle {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_on() {
        let toggle = VisibilityToggle::new(true);
        assert!(toggle.is_checked());
        assert_eq!(toggle.mobile_checked(), Some(true));
        assert_eq!(VisibilityToggle::default().mobile_checked(), None);
    }

    #[test]
    fn test_primary_change_mirrors_mobile() {
        let mut toggle = VisibilityToggle::new(true);
        assert_eq!(toggle.on_change(ToggleSource::Primary, false), Some(false));
        assert_eq!(toggle.mobile_checked(), Some(false));
    }

    #[test]
    fn test_mobile_change_mirrors_primary() {
        let mut toggle = VisibilityToggle::new(true);
        assert_eq!(toggle.on_change(ToggleSource::Mobile, false), Some(false));
        assert!(!toggle.is_checked());
    }

    #[test]
    fn test_repeated_change_is_not_redispatched() {
        let mut toggle = VisibilityToggle::new(true);
        toggle.on_change(ToggleSource::Primary, false);
        assert_eq!(toggle.on_change(ToggleSource::Mobile, false), None);
    }

    #[test]
    fn test_absent_mobile_control_ignored() {
        let mut toggle = VisibilityToggle::new(false);
        assert_eq!(toggle.on_change(ToggleSource::Mobile, false), None);
        assert!(toggle.is_checked());
    }
}
