//! Cluster icon presentation.
//!
//! The engine decides *when* a cluster icon is shown, where, and with which
//! members; drawing it is left to the host. [`ClusterIcon`] is the state a host
//! renders from and [`IconRenderer`] produces the icon's content.

use crate::config::IconStyle;
use crate::marker::Marker;
use markercluster_types::point::{LatLng, PixelPoint};
use std::fmt;

/// Content shown inside a cluster icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconContent {
    /// Member count, the default label
    Count(usize),
    /// Plain text label
    Text(String),
    /// Pre-rendered markup handed to the host untouched
    Markup(String),
}

impl fmt::Display for IconContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconContent::Count(n) => write!(f, "{}", n),
            IconContent::Text(text) | IconContent::Markup(text) => f.write_str(text),
        }
    }
}

/// Produces icon content from a cluster's members.
pub trait IconRenderer<T> {
    fn render(&self, members: &[&Marker<T>]) -> IconContent;
}

impl<T, F> IconRenderer<T> for F
where
    F: Fn(&[&Marker<T>]) -> IconContent,
{
    fn render(&self, members: &[&Marker<T>]) -> IconContent {
        self(members)
    }
}

/// Labels an icon with its member count.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountRenderer;

impl<T> IconRenderer<T> for CountRenderer {
    fn render(&self, members: &[&Marker<T>]) -> IconContent {
        IconContent::Count(members.len())
    }
}

/// Presentation state of one cluster's icon.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterIcon {
    style: IconStyle,
    visible: bool,
    position: Option<LatLng>,
    origin: Option<PixelPoint>,
    content: Option<IconContent>,
    released: bool,
}

impl ClusterIcon {
    pub fn new(style: IconStyle) -> Self {
        Self {
            style,
            visible: false,
            position: None,
            origin: None,
            content: None,
            released: false,
        }
    }

    pub fn style(&self) -> &IconStyle {
        &self.style
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Geographic position the icon's anchor sits on.
    pub fn position(&self) -> Option<LatLng> {
        self.position
    }

    /// Top-left corner of the icon in world pixels.
    pub fn origin(&self) -> Option<PixelPoint> {
        self.origin
    }

    pub fn content(&self) -> Option<&IconContent> {
        self.content.as_ref()
    }

    /// Whether the icon's resources have been given back to the host.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Place the icon so its anchor lands on `anchor_pixel` and show it.
    pub(crate) fn show(&mut self, position: LatLng, anchor_pixel: PixelPoint, content: IconContent) {
        let origin = self.style.anchor.icon_origin(
            anchor_pixel,
            f64::from(self.style.width),
            f64::from(self.style.height),
        );
        self.position = Some(position);
        self.origin = Some(origin);
        self.content = Some(content);
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    pub(crate) fn release(&mut self) {
        self.visible = false;
        self.position = None;
        self.origin = None;
        self.content = None;
        self.released = true;
    }
}
