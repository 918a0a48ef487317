//! Responsive timeline layout.

/// Card arrangement chosen from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Single column with a left rail.
    Mobile,
    /// Center rail with cards alternating sides.
    Desktop,
}

/// Side of the center rail a desktop card sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl LayoutMode {
    /// Widths strictly below `breakpoint_px` are mobile.
    pub fn for_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px < breakpoint_px {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }

    /// `None` on mobile; even positions go left on desktop.
    pub fn side_for(self, position: usize) -> Option<Side> {
        match self {
            Self::Mobile => None,
            Self::Desktop if position % 2 == 0 => Some(Side::Left),
            Self::Desktop => Some(Side::Right),
        }
    }
}
