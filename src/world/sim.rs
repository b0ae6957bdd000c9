use crate::collision::quadtree::{Locate, Quadtree, QuadtreeConfig};
use crate::collision::{resolver, AABB};
use crate::integration::integrator;
use crate::objects::body::Body;
use crate::world::boundary::Boundary;

/// Locator handing the spatial index body rectangles by index into the
/// world's body list. Built fresh each tick; identity is index equality.
struct BodyRects<'a> {
    bodies: &'a [Body],
}

impl Locate<usize> for BodyRects<'_> {
    fn bounding_rect(&self, value: &usize) -> AABB {
        self.bodies[*value].bounding_rect()
    }

    fn same(&self, a: &usize, b: &usize) -> bool {
        a == b
    }
}

/// Diagnostics reported by one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Collisions handled this tick. In indexed mode this is the number of
    /// deduplicated colliding pairs; in brute-force mode it counts
    /// resolutions over ordered pairs, so an unordered pair can contribute
    /// up to twice.
    pub collisions: usize,
    /// Bodies stored in the index this tick (zero in brute-force mode).
    pub objects_in_index: usize,
    /// Nodes in the index this tick (zero in brute-force mode).
    pub nodes: usize,
}

/// The simulation world: the mutable body set, the containment boundary, and
/// the configuration of the per-tick spatial index.
///
/// The index itself is not a field — it is rebuilt from the current bounding
/// rectangles inside every [`World::step`] and discarded before the tick
/// ends, since rectangles move every frame anyway.
///
/// The boundary rectangle must lie inside the index rectangle, and every
/// body must fit inside the boundary; both are orchestrator preconditions
/// (validated by the scene builder) and violations fail fast inside the
/// index.
pub struct World {
    pub bodies: Vec<Body>,
    boundary: Boundary,
    index_rect: AABB,
    index_config: QuadtreeConfig,
    use_quadtree: bool,
    pairs: Vec<(usize, usize)>,
    node_rects: Vec<AABB>,
    collect_node_rects: bool,
}

impl World {
    /// Creates an empty world with default index tuning, resolving through
    /// the spatial index.
    pub fn new(boundary_rect: AABB, index_rect: AABB) -> Self {
        Self::with_config(boundary_rect, index_rect, QuadtreeConfig::default(), true)
    }

    pub fn with_config(
        boundary_rect: AABB,
        index_rect: AABB,
        index_config: QuadtreeConfig,
        use_quadtree: bool,
    ) -> Self {
        tracing::debug!(
            ?boundary_rect,
            ?index_rect,
            threshold = index_config.threshold,
            max_depth = index_config.max_depth,
            use_quadtree,
            "creating simulation world"
        );
        World {
            bodies: Vec::new(),
            boundary: Boundary::new(boundary_rect),
            index_rect,
            index_config,
            use_quadtree,
            pairs: Vec::new(),
            node_rects: Vec::new(),
            collect_node_rects: false,
        }
    }

    /// Adds a body to the world and returns its index.
    pub fn add_body(&mut self, body: Body) -> usize {
        let index = self.bodies.len();
        self.bodies.push(body);
        index
    }

    /// Removes every body (the interactive scene-clear operation).
    pub fn clear_bodies(&mut self) {
        self.bodies.clear();
        self.pairs.clear();
        self.node_rects.clear();
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn index_rect(&self) -> AABB {
        self.index_rect
    }

    pub fn use_quadtree(&self) -> bool {
        self.use_quadtree
    }

    /// Switches between index-accelerated and brute-force resolution.
    pub fn set_use_quadtree(&mut self, use_quadtree: bool) {
        self.use_quadtree = use_quadtree;
    }

    /// When enabled, each indexed tick snapshots the index's node
    /// rectangles for diagnostic display (see [`World::node_rects`]).
    pub fn set_collect_node_rects(&mut self, collect: bool) {
        self.collect_node_rects = collect;
    }

    /// Node rectangles captured by the last indexed tick.
    pub fn node_rects(&self) -> &[AABB] {
        &self.node_rects
    }

    /// Colliding pairs found by the last indexed tick.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Advances the simulation by one time step `dt`.
    ///
    /// In strict sequence: integrate motion, apply boundary containment,
    /// rebuild the spatial index from the current bounding rectangles,
    /// enumerate colliding pairs (indexed or brute force), resolve each
    /// pair, discard the index.
    pub fn step(&mut self, dt: f64) -> StepStats {
        let mut stats = StepStats::default();
        if dt <= 0.0 {
            return stats;
        }

        // 1. Integrate motion
        for body in self.bodies.iter_mut() {
            integrator::integrate(body, dt);
        }

        // 2. Boundary containment
        for body in self.bodies.iter_mut() {
            self.boundary.check_containment(body);
        }

        // 3. Detection and resolution
        self.node_rects.clear();
        if self.use_quadtree {
            let locator = BodyRects {
                bodies: &self.bodies,
            };
            let mut index = Quadtree::with_config(self.index_rect, locator, self.index_config);
            for i in 0..self.bodies.len() {
                index.insert(i);
            }
            stats.objects_in_index = index.num_objects();
            stats.nodes = index.num_nodes();
            if self.collect_node_rects {
                index.node_rects(&mut self.node_rects);
            }
            self.pairs = index.find_all_intersections();
            index.clear_all();
            drop(index); // the index never survives the tick

            stats.collisions = self.pairs.len();
            resolver::resolve_pairs(&mut self.bodies, &self.pairs);
        } else {
            self.pairs.clear();
            stats.collisions = resolver::resolve_brute_force(&mut self.bodies);
        }
        stats
    }
}
