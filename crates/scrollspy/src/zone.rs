//! Zones and classification
//!
//! Two independent axes: where the reference line sits relative to the
//! element's top edge, and whether the element box is fully inside the
//! viewport.

use std::fmt;
use std::str::FromStr;

use scrollspy_host::{DOMRect, Viewport};

use crate::ObserverError;

/// Vertical position of the scroll reference line relative to the element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertical {
    /// Scroll has not reached the element yet
    Above,
    /// Scroll offset equals the element top exactly
    On,
    /// Scroll has passed the element top
    Below,
}

/// Whether the element box lies fully inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    InView,
    NotInView,
}

/// Action registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Above,
    On,
    Below,
    InView,
    NotInView,
}

impl Zone {
    pub const COUNT: usize = 5;

    /// Every recognized zone, in registry order
    pub const ALL: [Zone; Zone::COUNT] = [Zone::Above, Zone::On, Zone::Below, Zone::InView, Zone::NotInView];

    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Above => "above",
            Zone::On => "on",
            Zone::Below => "below",
            Zone::InView => "inView",
            Zone::NotInView => "notInView",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = ObserverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|z| z.as_str() == s)
            .ok_or_else(|| ObserverError::InvalidZone(s.to_string()))
    }
}

impl From<Vertical> for Zone {
    fn from(v: Vertical) -> Self {
        match v {
            Vertical::Above => Zone::Above,
            Vertical::On => Zone::On,
            Vertical::Below => Zone::Below,
        }
    }
}

impl From<Visibility> for Zone {
    fn from(v: Visibility) -> Self {
        match v {
            Visibility::InView => Zone::InView,
            Visibility::NotInView => Zone::NotInView,
        }
    }
}

/// Result of one classification pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub vertical: Vertical,
    pub visibility: Visibility,
}

impl Classification {
    /// Active zones, vertical axis first
    pub fn zones(&self) -> [Zone; 2] {
        [self.vertical.into(), self.visibility.into()]
    }
}

/// Vertical rule. Equality wins over the ordering checks.
pub fn classify_vertical(scroll_offset: u64, element_top: u64) -> Vertical {
    if scroll_offset == element_top {
        Vertical::On
    } else if scroll_offset > element_top {
        Vertical::Below
    } else {
        Vertical::Above
    }
}

pub fn classify_visibility(element_box: &DOMRect, viewport: &Viewport) -> Visibility {
    if viewport.fully_contains(element_box) {
        Visibility::InView
    } else {
        Visibility::NotInView
    }
}

/// Classify both axes. `element_box` is the current viewport-relative
/// bounding rect, not the remembered top.
pub fn classify(
    scroll_offset: u64,
    element_top: u64,
    element_box: &DOMRect,
    viewport: &Viewport,
) -> Classification {
    Classification {
        vertical: classify_vertical(scroll_offset, element_top),
        visibility: classify_visibility(element_box, viewport),
    }
}

/// Zones that changed in a state transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub vertical: Option<Vertical>,
    pub visibility: Option<Visibility>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.visibility.is_none()
    }

    /// Entered zones, vertical axis first
    pub fn zones(&self) -> Vec<Zone> {
        self.vertical
            .map(Zone::from)
            .into_iter()
            .chain(self.visibility.map(Zone::from))
            .collect()
    }
}

/// Last known zone on each axis. `None` until the first pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneState {
    pub vertical: Option<Vertical>,
    pub visibility: Option<Visibility>,
}

impl ZoneState {
    /// Record a classification and report which axes changed.
    /// Detection only; dispatch is the caller's business.
    pub fn transition(&mut self, next: Classification) -> Transition {
        let transition = Transition {
            vertical: (self.vertical != Some(next.vertical)).then_some(next.vertical),
            visibility: (self.visibility != Some(next.visibility)).then_some(next.visibility),
        };
        self.vertical = Some(next.vertical);
        self.visibility = Some(next.visibility);
        transition
    }

    pub fn is_active(&self, zone: Zone) -> bool {
        match zone {
            Zone::Above | Zone::On | Zone::Below => self.vertical.map(Zone::from) == Some(zone),
            Zone::InView | Zone::NotInView => self.visibility.map(Zone::from) == Some(zone),
        }
    }

    pub fn classification(&self) -> Option<Classification> {
        Some(Classification {
            vertical: self.vertical?,
            visibility: self.visibility?,
        })
    }
}
