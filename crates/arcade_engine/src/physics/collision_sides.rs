//! Directional collision filtering
//!
//! Each object states which of its sides accept contacts. A one-way platform,
//! for example, only collides on its top side so objects can jump up through it.

use bitflags::bitflags;

bitflags! {
    /// Sides of an object that accept collisions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollideSides: u8 {
        /// Contacts against the left edge
        const LEFT = 1 << 0;
        /// Contacts against the right edge
        const RIGHT = 1 << 1;
        /// Contacts against the top edge
        const TOP = 1 << 2;
        /// Contacts against the bottom edge
        const BOTTOM = 1 << 3;
        /// Left and right
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Top and bottom
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        /// Every side
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl Default for CollideSides {
    fn default() -> Self {
        Self::ALL
    }
}

/// Resolution axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal pass, always run first
    X,
    /// Vertical pass
    Y,
}

impl Axis {
    /// The other axis
    pub fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Side facing the negative end of this axis
    pub fn near_side(self) -> HitSide {
        match self {
            Self::X => HitSide::Left,
            Self::Y => HitSide::Top,
        }
    }

    /// Side facing the positive end of this axis
    pub fn far_side(self) -> HitSide {
        match self {
            Self::X => HitSide::Right,
            Self::Y => HitSide::Bottom,
        }
    }
}

/// The side of an object that was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitSide {
    /// Left edge
    Left,
    /// Right edge
    Right,
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
}

impl HitSide {
    /// Matching filter flag
    pub fn flag(self) -> CollideSides {
        match self {
            Self::Left => CollideSides::LEFT,
            Self::Right => CollideSides::RIGHT,
            Self::Top => CollideSides::TOP,
            Self::Bottom => CollideSides::BOTTOM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_everything() {
        let sides = CollideSides::default();
        assert!(sides.contains(CollideSides::LEFT | CollideSides::BOTTOM));
        assert_eq!(sides, CollideSides::ALL);
    }

    #[test]
    fn test_one_way_platform_sides() {
        let platform = CollideSides::TOP;
        assert!(platform.contains(HitSide::Top.flag()));
        assert!(!platform.contains(HitSide::Bottom.flag()));
        assert!(!platform.intersects(CollideSides::HORIZONTAL));
    }

    #[test]
    fn test_axis_sides() {
        assert_eq!(Axis::X.near_side(), HitSide::Left);
        assert_eq!(Axis::Y.far_side(), HitSide::Bottom);
        assert_eq!(Axis::X.cross(), Axis::Y);
    }
}
