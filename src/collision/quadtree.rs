// Adaptive quad-tree used as the broadphase spatial index.
//
// The tree is rebuilt from the current body set every frame and discarded at
// the end of the tick, so it never carries state across frames. Values are
// copied handles (typically indices into the world's body list); the tree
// owns its nodes but never the entities behind the handles.

use crate::collision::AABB;
use crate::math::vec2::Vec2;

/// Capability interface the index needs from its stored values: how to get a
/// value's bounding rectangle, and how to decide two values are the same.
///
/// Keeping geometry and identity external lets the tree store plain handles
/// and be reused for any boxed-entity type.
pub trait Locate<T> {
    fn bounding_rect(&self, value: &T) -> AABB;
    fn same(&self, a: &T, b: &T) -> bool;
}

/// Tuning parameters for the quad-tree.
#[derive(Debug, Clone, Copy)]
pub struct QuadtreeConfig {
    /// Max values a leaf holds before a split is attempted.
    pub threshold: usize,
    /// Hard depth cap; at this depth a leaf accepts unlimited values.
    pub max_depth: usize,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        QuadtreeConfig {
            threshold: 16,
            max_depth: 8,
        }
    }
}

/// A tree node: a leaf (`children == None`) holding values directly, or an
/// interior node with exactly four children plus the residual values whose
/// rectangles straddle the center lines and fit no single quadrant.
#[derive(Debug)]
struct Node<T> {
    children: Option<Box<[Node<T>; 4]>>,
    values: Vec<T>,
}

impl<T> Node<T> {
    fn new() -> Self {
        Node {
            children: None,
            values: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Computes the rectangle of child `quadrant` inside `rect`.
/// Quadrants are numbered row-major: 0=top-left, 1=top-right,
/// 2=bottom-left, 3=bottom-right.
fn child_rect(rect: &AABB, quadrant: usize) -> AABB {
    let origin = rect.min;
    let child_size = rect.size() * 0.5;
    match quadrant {
        0 => AABB::from_position_size(origin, child_size),
        1 => AABB::from_position_size(Vec2::new(origin.x + child_size.x, origin.y), child_size),
        2 => AABB::from_position_size(Vec2::new(origin.x, origin.y + child_size.y), child_size),
        3 => AABB::from_position_size(origin + child_size, child_size),
        _ => unreachable!("invalid quadrant index {quadrant}"),
    }
}

/// Determines which quadrant of `node_rect` fully contains `value_rect`.
/// A rectangle touching or crossing either center line belongs to no single
/// quadrant and is kept at the current node.
fn quadrant(node_rect: &AABB, value_rect: &AABB) -> Option<usize> {
    let center = node_rect.center();
    if value_rect.right() < center.x {
        if value_rect.bottom() < center.y {
            Some(0)
        } else if value_rect.top() >= center.y {
            Some(2)
        } else {
            None
        }
    } else if value_rect.left() >= center.x {
        if value_rect.bottom() < center.y {
            Some(1)
        } else if value_rect.top() >= center.y {
            Some(3)
        } else {
            None
        }
    } else {
        None
    }
}

/// Adaptive quad-tree over values of type `T`, generic over the [`Locate`]
/// capability that supplies per-value rectangles and equality.
#[derive(Debug)]
pub struct Quadtree<T, L> {
    rect: AABB,
    root: Node<T>,
    locator: L,
    config: QuadtreeConfig,
    missed_removals: u64,
}

impl<T: Copy, L: Locate<T>> Quadtree<T, L> {
    /// Creates an empty tree covering `rect` with default tuning.
    pub fn new(rect: AABB, locator: L) -> Self {
        Self::with_config(rect, locator, QuadtreeConfig::default())
    }

    pub fn with_config(rect: AABB, locator: L, config: QuadtreeConfig) -> Self {
        assert!(config.threshold >= 1, "threshold must be at least 1");
        Quadtree {
            rect,
            root: Node::new(),
            locator,
            config,
            missed_removals: 0,
        }
    }

    /// The fixed rectangle the tree covers. Never resized.
    pub fn root_rect(&self) -> AABB {
        self.rect
    }

    /// Inserts a value. The value's bounding rectangle must lie within the
    /// tree's root rectangle; inserting an outside value is a caller error
    /// and fails fast.
    pub fn insert(&mut self, value: T) {
        Self::insert_rec(&self.locator, self.config, &mut self.root, 0, self.rect, value);
    }

    fn insert_rec(
        locator: &L,
        config: QuadtreeConfig,
        node: &mut Node<T>,
        depth: usize,
        rect: AABB,
        value: T,
    ) {
        let value_rect = locator.bounding_rect(&value);
        assert!(
            rect.contains(&value_rect),
            "insert precondition violated: value rect {value_rect:?} outside node rect {rect:?}"
        );
        if let Some(children) = node.children.as_deref_mut() {
            // descend only if the value fits entirely inside one quadrant
            match quadrant(&rect, &value_rect) {
                Some(i) => Self::insert_rec(
                    locator,
                    config,
                    &mut children[i],
                    depth + 1,
                    child_rect(&rect, i),
                    value,
                ),
                None => node.values.push(value),
            }
        } else if depth >= config.max_depth || node.values.len() < config.threshold {
            node.values.push(value);
        } else {
            // full leaf above the depth cap: split and retry at this node
            Self::split(locator, node, &rect);
            Self::insert_rec(locator, config, node, depth, rect, value);
        }
    }

    /// Splits a leaf into four children, reassigning its values by quadrant.
    /// Values that fit no single quadrant stay at the node.
    fn split(locator: &L, node: &mut Node<T>, rect: &AABB) {
        assert!(node.is_leaf(), "only leaves can be split");
        let mut children = Box::new([Node::new(), Node::new(), Node::new(), Node::new()]);
        let mut kept = Vec::new();
        for value in node.values.drain(..) {
            match quadrant(rect, &locator.bounding_rect(&value)) {
                Some(i) => children[i].values.push(value),
                None => kept.push(value),
            }
        }
        node.values = kept;
        node.children = Some(children);
    }

    /// Removes a value, descending by the same quadrant rule as insertion.
    /// Removing a value that is not present is non-fatal: it is logged,
    /// counted (see [`Quadtree::missed_removals`]) and leaves the tree
    /// unchanged.
    pub fn remove(&mut self, value: &T) {
        Self::remove_rec(
            &self.locator,
            self.config,
            &mut self.missed_removals,
            &mut self.root,
            self.rect,
            value,
        );
    }

    /// Returns true if the value was searched for in a leaf, which signals
    /// the parent to attempt a merge on the way back up.
    fn remove_rec(
        locator: &L,
        config: QuadtreeConfig,
        missed: &mut u64,
        node: &mut Node<T>,
        rect: AABB,
        value: &T,
    ) -> bool {
        let value_rect = locator.bounding_rect(value);
        assert!(
            rect.contains(&value_rect),
            "remove precondition violated: value rect {value_rect:?} outside node rect {rect:?}"
        );
        if node.is_leaf() {
            Self::remove_value(locator, missed, node, value);
            return true;
        }
        match quadrant(&rect, &value_rect) {
            Some(i) => {
                let mut removed_from_leaf = false;
                if let Some(children) = node.children.as_deref_mut() {
                    removed_from_leaf = Self::remove_rec(
                        locator,
                        config,
                        missed,
                        &mut children[i],
                        child_rect(&rect, i),
                        value,
                    );
                }
                if removed_from_leaf {
                    return Self::try_merge(config, node);
                }
                false
            }
            None => {
                Self::remove_value(locator, missed, node, value);
                false
            }
        }
    }

    fn remove_value(locator: &L, missed: &mut u64, node: &mut Node<T>, value: &T) {
        match node.values.iter().position(|rhs| locator.same(value, rhs)) {
            Some(index) => {
                node.values.swap_remove(index);
            }
            None => {
                *missed += 1;
                tracing::warn!("removal miss: value not present in its expected quadtree node");
            }
        }
    }

    /// Folds an interior node's four leaf children back into it when the
    /// combined value count fits the threshold. Fails (leaving the tree
    /// unchanged) when a child is itself interior or the sum is too large.
    fn try_merge(config: QuadtreeConfig, node: &mut Node<T>) -> bool {
        assert!(!node.is_leaf(), "only interior nodes can be merged");
        let mut total = node.values.len();
        if let Some(children) = node.children.as_deref() {
            for child in children.iter() {
                if !child.is_leaf() {
                    return false;
                }
                total += child.values.len();
            }
        }
        if total > config.threshold {
            return false;
        }
        if let Some(mut children) = node.children.take() {
            node.values.reserve(total - node.values.len());
            for child in children.iter_mut() {
                node.values.append(&mut child.values);
            }
        }
        true
    }

    /// Returns every stored value whose bounding rectangle overlaps
    /// `query_rect`. Children whose rectangles miss the query are pruned.
    pub fn query(&self, query_rect: &AABB) -> Vec<T> {
        let mut values = Vec::new();
        Self::query_rec(&self.locator, &self.root, self.rect, query_rect, &mut values);
        values
    }

    fn query_rec(locator: &L, node: &Node<T>, rect: AABB, query_rect: &AABB, out: &mut Vec<T>) {
        for value in &node.values {
            if query_rect.overlaps(&locator.bounding_rect(value)) {
                out.push(*value);
            }
        }
        if let Some(children) = node.children.as_deref() {
            for (i, child) in children.iter().enumerate() {
                let rect = child_rect(&rect, i);
                if query_rect.overlaps(&rect) {
                    Self::query_rec(locator, child, rect, query_rect, out);
                }
            }
        }
    }

    /// Returns every overlapping pair in the tree, each unordered pair
    /// exactly once and never as a self-pair.
    ///
    /// Three sources per node: pairs within the node's own value list
    /// (enumerated with `j > i` so each is seen once), pairs between a value
    /// held here and any value in a descendant (a straddler can overlap
    /// values arbitrarily deep, and is always the first element of the
    /// emitted pair), and pairs found recursively inside each child.
    /// Uniqueness holds by construction because every value lives in exactly
    /// one node.
    pub fn find_all_intersections(&self) -> Vec<(T, T)> {
        let mut pairs = Vec::new();
        Self::find_intersections_rec(&self.locator, &self.root, &mut pairs);
        pairs
    }

    fn find_intersections_rec(locator: &L, node: &Node<T>, out: &mut Vec<(T, T)>) {
        for (i, first) in node.values.iter().enumerate() {
            for second in &node.values[i + 1..] {
                if locator
                    .bounding_rect(first)
                    .overlaps(&locator.bounding_rect(second))
                {
                    out.push((*first, *second));
                }
            }
        }
        if let Some(children) = node.children.as_deref() {
            for child in children.iter() {
                for value in &node.values {
                    Self::find_descendant_intersections(locator, child, value, out);
                }
            }
            for child in children.iter() {
                Self::find_intersections_rec(locator, child, out);
            }
        }
    }

    fn find_descendant_intersections(locator: &L, node: &Node<T>, value: &T, out: &mut Vec<(T, T)>) {
        let value_rect = locator.bounding_rect(value);
        for other in &node.values {
            if value_rect.overlaps(&locator.bounding_rect(other)) {
                out.push((*value, *other));
            }
        }
        if let Some(children) = node.children.as_deref() {
            for child in children.iter() {
                Self::find_descendant_intersections(locator, child, value, out);
            }
        }
    }

    /// Empties every node and collapses the structure back to a single leaf
    /// root. Called once per tick; the tree holds no state across frames.
    pub fn clear_all(&mut self) {
        Self::clear_rec(&mut self.root);
    }

    fn clear_rec(node: &mut Node<T>) {
        if let Some(children) = node.children.as_deref_mut() {
            for child in children.iter_mut() {
                Self::clear_rec(child);
            }
        }
        // every child is an empty leaf at this point; fold them away
        node.children = None;
        node.values.clear();
    }

    /// Appends the rectangle of every node (root first) for diagnostic
    /// display. Does not mutate the tree.
    pub fn node_rects(&self, out: &mut Vec<AABB>) {
        out.push(self.rect);
        Self::node_rects_rec(&self.root, self.rect, out);
    }

    fn node_rects_rec(node: &Node<T>, rect: AABB, out: &mut Vec<AABB>) {
        if let Some(children) = node.children.as_deref() {
            for (i, child) in children.iter().enumerate() {
                let rect = child_rect(&rect, i);
                out.push(rect);
                Self::node_rects_rec(child, rect, out);
            }
        }
    }

    /// Total number of values stored in the tree.
    pub fn num_objects(&self) -> usize {
        Self::count_values(&self.root)
    }

    fn count_values(node: &Node<T>) -> usize {
        let mut count = node.values.len();
        if let Some(children) = node.children.as_deref() {
            for child in children.iter() {
                count += Self::count_values(child);
            }
        }
        count
    }

    /// Total number of nodes, including the root.
    pub fn num_nodes(&self) -> usize {
        1 + Self::count_descendants(&self.root)
    }

    fn count_descendants(node: &Node<T>) -> usize {
        let mut count = 0;
        if let Some(children) = node.children.as_deref() {
            count += 4;
            for child in children.iter() {
                count += Self::count_descendants(child);
            }
        }
        count
    }

    /// Number of removals that found no matching value. Diagnostic only.
    pub fn missed_removals(&self) -> u64 {
        self.missed_removals
    }
}
