//! Icon anchoring.
//!
//! An [`Anchor`] names which point of an icon sits on the geographic position
//! it marks. Each axis is a single bit inside its own 3-bit group, so an anchor
//! packs into one byte and round-trips through [`Anchor::bits`] /
//! [`Anchor::from_bits`].

use crate::point::PixelPoint;
use serde::{Deserialize, Serialize};

/// Horizontal alignment flags (low three bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Horizontal {
    Left = 0b0000_0001,
    #[default]
    Center = 0b0000_0010,
    Right = 0b0000_0100,
}

/// Vertical alignment flags (next three bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Vertical {
    Top = 0b0000_1000,
    #[default]
    Center = 0b0001_0000,
    Bottom = 0b0010_0000,
}

const HORIZONTAL_MASK: u8 = 0b0000_0111;
const VERTICAL_MASK: u8 = 0b0011_1000;

/// Icon anchor: `{Left, Center, Right} x {Top, Center, Bottom}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Anchor {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor::new(Horizontal::Left, Vertical::Top);
    pub const TOP_CENTER: Anchor = Anchor::new(Horizontal::Center, Vertical::Top);
    pub const TOP_RIGHT: Anchor = Anchor::new(Horizontal::Right, Vertical::Top);
    pub const CENTER_LEFT: Anchor = Anchor::new(Horizontal::Left, Vertical::Center);
    pub const CENTER: Anchor = Anchor::new(Horizontal::Center, Vertical::Center);
    pub const CENTER_RIGHT: Anchor = Anchor::new(Horizontal::Right, Vertical::Center);
    pub const BOTTOM_LEFT: Anchor = Anchor::new(Horizontal::Left, Vertical::Bottom);
    pub const BOTTOM_CENTER: Anchor = Anchor::new(Horizontal::Center, Vertical::Bottom);
    pub const BOTTOM_RIGHT: Anchor = Anchor::new(Horizontal::Right, Vertical::Bottom);

    pub const fn new(horizontal: Horizontal, vertical: Vertical) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Packed flag representation: one horizontal bit OR one vertical bit.
    pub const fn bits(&self) -> u8 {
        self.horizontal as u8 | self.vertical as u8
    }

    /// Decode packed flags. Returns `None` unless exactly one bit is set in
    /// each axis group and no bits outside them.
    ///
    /// # Examples
    ///
    /// ```
    /// use markercluster_types::anchor::Anchor;
    ///
    /// let bits = Anchor::BOTTOM_CENTER.bits();
    /// assert_eq!(Anchor::from_bits(bits), Some(Anchor::BOTTOM_CENTER));
    /// assert_eq!(Anchor::from_bits(0b0000_0011 | 0b0000_1000), None);
    /// ```
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits & !(HORIZONTAL_MASK | VERTICAL_MASK) != 0 {
            return None;
        }
        let horizontal = match bits & HORIZONTAL_MASK {
            b if b == Horizontal::Left as u8 => Horizontal::Left,
            b if b == Horizontal::Center as u8 => Horizontal::Center,
            b if b == Horizontal::Right as u8 => Horizontal::Right,
            _ => return None,
        };
        let vertical = match bits & VERTICAL_MASK {
            b if b == Vertical::Top as u8 => Vertical::Top,
            b if b == Vertical::Center as u8 => Vertical::Center,
            b if b == Vertical::Bottom as u8 => Vertical::Bottom,
            _ => return None,
        };
        Some(Self::new(horizontal, vertical))
    }

    /// Offset from the icon's top-left corner to its anchor point.
    pub fn offset(&self, width: f64, height: f64) -> (f64, f64) {
        let dx = match self.horizontal {
            Horizontal::Left => 0.0,
            Horizontal::Center => width / 2.0,
            Horizontal::Right => width,
        };
        let dy = match self.vertical {
            Vertical::Top => 0.0,
            Vertical::Center => height / 2.0,
            Vertical::Bottom => height,
        };
        (dx, dy)
    }

    /// Top-left pixel of an icon of the given size whose anchor sits on `position`.
    pub fn icon_origin(&self, position: PixelPoint, width: f64, height: f64) -> PixelPoint {
        let (dx, dy) = self.offset(width, height);
        position.offset(-dx, -dy)
    }
}
