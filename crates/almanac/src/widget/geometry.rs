//! Size hints and size policies for widget layout.
//!
//! These types describe how widgets want to be sized, in the manner of
//! Qt's QSizePolicy system. Layout negotiation itself lives in the host;
//! the widgets only advertise their preferences.

use crate::geometry::Size;

/// Size policy determines how a widget should behave when space is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SizePolicy {
    /// The widget cannot grow or shrink. It always stays at its size hint.
    Fixed = 0,

    /// The size hint is the minimum size; the widget can grow.
    Minimum = 1,

    /// The size hint is the maximum size; the widget can shrink.
    Maximum = 2,

    /// The size hint is preferred but the widget can both grow and shrink.
    #[default]
    Preferred = 3,

    /// The widget wants to grow and take up as much space as possible.
    Expanding = 4,
}

impl SizePolicy {
    /// Returns true if the policy allows the widget to grow.
    #[inline]
    pub fn can_grow(self) -> bool {
        !matches!(self, Self::Fixed | Self::Maximum)
    }

    /// Returns true if the policy allows the widget to shrink.
    #[inline]
    pub fn can_shrink(self) -> bool {
        !matches!(self, Self::Fixed | Self::Minimum)
    }
}

/// Combined horizontal and vertical size policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePolicyPair {
    /// Horizontal size policy.
    pub horizontal: SizePolicy,
    /// Vertical size policy.
    pub vertical: SizePolicy,
}

impl Default for SizePolicyPair {
    fn default() -> Self {
        Self {
            horizontal: SizePolicy::Preferred,
            vertical: SizePolicy::Preferred,
        }
    }
}

impl SizePolicyPair {
    /// Create a new size policy pair with the specified policies.
    pub fn new(horizontal: SizePolicy, vertical: SizePolicy) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Create a policy with the same value for both dimensions.
    pub fn uniform(policy: SizePolicy) -> Self {
        Self::new(policy, policy)
    }

    /// Create a fixed size policy (widget cannot resize).
    pub fn fixed() -> Self {
        Self::uniform(SizePolicy::Fixed)
    }

    /// Create a preferred size policy (default).
    pub fn preferred() -> Self {
        Self::uniform(SizePolicy::Preferred)
    }

    /// Create an expanding size policy (widget wants more space).
    pub fn expanding() -> Self {
        Self::uniform(SizePolicy::Expanding)
    }
}

/// Size hint containing the preferred, minimum, and maximum sizes for a widget.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeHint {
    /// The preferred size for the widget to display optimally.
    pub preferred: Size,

    /// The minimum acceptable size, if constrained.
    pub minimum: Option<Size>,

    /// The maximum size the widget should be, if constrained.
    pub maximum: Option<Size>,
}

impl SizeHint {
    /// Create a new size hint with the specified preferred size.
    pub fn new(preferred: Size) -> Self {
        Self {
            preferred,
            minimum: None,
            maximum: None,
        }
    }

    /// Create a size hint with explicit width and height.
    pub fn from_dimensions(width: f32, height: f32) -> Self {
        Self::new(Size::new(width, height))
    }

    /// Create a fixed size hint (preferred = minimum = maximum).
    pub fn fixed(size: Size) -> Self {
        Self {
            preferred: size,
            minimum: Some(size),
            maximum: Some(size),
        }
    }

    /// Set minimum dimensions.
    pub fn with_minimum_dimensions(mut self, width: f32, height: f32) -> Self {
        self.minimum = Some(Size::new(width, height));
        self
    }

    /// Set maximum dimensions.
    pub fn with_maximum_dimensions(mut self, width: f32, height: f32) -> Self {
        self.maximum = Some(Size::new(width, height));
        self
    }

    /// Get the effective minimum size (returns zero if not set).
    pub fn effective_minimum(&self) -> Size {
        self.minimum.unwrap_or(Size::ZERO)
    }

    /// Get the effective maximum size (returns a very large size if not set).
    pub fn effective_maximum(&self) -> Size {
        self.maximum.unwrap_or(Size::new(f32::MAX, f32::MAX))
    }

    /// Constrain a size to be within the minimum and maximum bounds.
    pub fn constrain(&self, size: Size) -> Size {
        let min = self.effective_minimum();
        let max = self.effective_maximum();

        Size::new(
            size.width.clamp(min.width, max.width),
            size.height.clamp(min.height, max.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_policy_grow_shrink() {
        assert!(!SizePolicy::Fixed.can_grow());
        assert!(!SizePolicy::Fixed.can_shrink());
        assert!(SizePolicy::Preferred.can_grow());
        assert!(SizePolicy::Preferred.can_shrink());
        assert!(SizePolicy::Minimum.can_grow());
        assert!(!SizePolicy::Minimum.can_shrink());
    }

    #[test]
    fn test_size_hint_constrain() {
        let hint = SizeHint::from_dimensions(100.0, 100.0)
            .with_minimum_dimensions(50.0, 50.0)
            .with_maximum_dimensions(200.0, 200.0);

        assert_eq!(
            hint.constrain(Size::new(150.0, 150.0)),
            Size::new(150.0, 150.0)
        );
        assert_eq!(hint.constrain(Size::new(25.0, 25.0)), Size::new(50.0, 50.0));
        assert_eq!(
            hint.constrain(Size::new(300.0, 300.0)),
            Size::new(200.0, 200.0)
        );
    }

    #[test]
    fn test_fixed_size_hint() {
        let hint = SizeHint::fixed(Size::new(100.0, 50.0));
        assert_eq!(hint.minimum, Some(Size::new(100.0, 50.0)));
        assert_eq!(hint.maximum, Some(Size::new(100.0, 50.0)));
    }
}
