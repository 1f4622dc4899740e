//! Per-node cache aspects and their invalidation rules
//!
//! A node keeps five derived values. Each has one validity bit and one
//! propagation rule:
//!
//! | aspect                 | recomputed by            | invalidation reaches |
//! |------------------------|--------------------------|----------------------|
//! | `RENDERING`            | the draw pass            | node + ancestors     |
//! | `SCENE_POSITION`       | `scene_position`         | node + descendants   |
//! | `SCENE_TRANSFORMATION` | `scene_transformation`   | node + descendants   |
//! | `BOUNDS`               | `bounds`                 | node only            |
//! | `SCENE_BOUNDS`         | `scene_bounds`           | node + descendants   |
//!
//! Scene aspects always travel together when propagating downwards. A node
//! only becomes scene-valid after its parent did, so a node whose scene
//! aspects are all invalid has an invalid subtree and the walk can stop there.

bitflags::bitflags! {
    /// Set of cache aspects; a set bit in a node's flags means "valid"
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CacheFlags: u8 {
        /// Last drawn output is current
        const RENDERING = 1 << 0;
        /// World-space anchor point is current
        const SCENE_POSITION = 1 << 1;
        /// Root-to-node transform is current
        const SCENE_TRANSFORMATION = 1 << 2;
        /// Local box corners are current
        const BOUNDS = 1 << 3;
        /// World-space box corners are current
        const SCENE_BOUNDS = 1 << 4;
    }
}

/// Which nodes an invalidation of an aspect reaches besides the node itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Only the node
    Local,
    /// The node and every ancestor up to its root
    Ancestors,
    /// The node and its whole subtree
    Descendants,
}

impl CacheFlags {
    /// Aspects that depend on the ancestor chain
    pub const SCENE: Self = Self::SCENE_POSITION
        .union(Self::SCENE_TRANSFORMATION)
        .union(Self::SCENE_BOUNDS);

    /// Invalidated by a change of position or local transformation
    pub const MOVED: Self = Self::RENDERING.union(Self::SCENE);

    /// Invalidated by a change of size
    pub const RESIZED: Self = Self::RENDERING
        .union(Self::BOUNDS)
        .union(Self::SCENE_BOUNDS);

    /// Invalidated by a presentation-only change (opacity, hidden, layer)
    pub const PRESENTATION: Self = Self::RENDERING;

    /// Propagation rule of a single aspect
    pub fn propagation(aspect: Self) -> Propagation {
        if aspect == Self::RENDERING {
            Propagation::Ancestors
        } else if aspect == Self::BOUNDS {
            Propagation::Local
        } else {
            Propagation::Descendants
        }
    }

    /// Aspects of `self` whose propagation rule is `rule`
    pub fn reaching(self, rule: Propagation) -> Self {
        self.iter()
            .filter(|aspect| Self::propagation(*aspect) == rule)
            .fold(Self::empty(), |acc, aspect| acc | aspect)
    }

    /// Aspects of `self` that must also be cleared on descendants
    ///
    /// Widened to every scene aspect, since they travel together.
    pub fn descendant_scoped(self) -> Self {
        if self.reaching(Propagation::Descendants).is_empty() {
            Self::empty()
        } else {
            Self::SCENE
        }
    }

    /// Aspects of `self` that must also be cleared on ancestors
    pub fn ancestor_scoped(self) -> Self {
        self.reaching(Propagation::Ancestors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propagation_table() {
        assert_eq!(CacheFlags::propagation(CacheFlags::RENDERING), Propagation::Ancestors);
        assert_eq!(CacheFlags::propagation(CacheFlags::BOUNDS), Propagation::Local);
        assert_eq!(CacheFlags::propagation(CacheFlags::SCENE_POSITION), Propagation::Descendants);
        assert_eq!(CacheFlags::propagation(CacheFlags::SCENE_TRANSFORMATION), Propagation::Descendants);
        assert_eq!(CacheFlags::propagation(CacheFlags::SCENE_BOUNDS), Propagation::Descendants);
    }

    #[test]
    fn test_descendant_scope_widens_to_all_scene_aspects() {
        assert_eq!(CacheFlags::SCENE_BOUNDS.descendant_scoped(), CacheFlags::SCENE);
        assert_eq!(CacheFlags::RESIZED.descendant_scoped(), CacheFlags::SCENE);
        assert!(CacheFlags::PRESENTATION.descendant_scoped().is_empty());
        assert!(CacheFlags::BOUNDS.descendant_scoped().is_empty());
    }

    #[test]
    fn test_presentation_changes_only_touch_rendering() {
        assert!(!CacheFlags::PRESENTATION.intersects(CacheFlags::SCENE | CacheFlags::BOUNDS));
        assert_eq!(CacheFlags::PRESENTATION.ancestor_scoped(), CacheFlags::RENDERING);
    }

    #[test]
    fn test_scopes_follow_propagation_table() {
        for aspect in CacheFlags::all().iter() {
            let rule = CacheFlags::propagation(aspect);
            assert_eq!(aspect.ancestor_scoped() == aspect, rule == Propagation::Ancestors);
            assert_eq!(!aspect.descendant_scoped().is_empty(), rule == Propagation::Descendants);
            if rule == Propagation::Local {
                assert!(aspect.ancestor_scoped().is_empty());
                assert!(aspect.descendant_scoped().is_empty());
            }
        }
        assert_eq!(CacheFlags::RESIZED.reaching(Propagation::Local), CacheFlags::BOUNDS);
        assert_eq!(CacheFlags::MOVED.ancestor_scoped(), CacheFlags::RENDERING);
    }
}
