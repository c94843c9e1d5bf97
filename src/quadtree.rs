use tracing::{debug, trace};

use crate::error::QuadTreeError;
use crate::geometry::{Point, Rect, Region};

/// Points a node stores directly before it subdivides.
pub const DEFAULT_CAPACITY: usize = 4;

/// Depth at which leaves stop subdividing and grow past capacity instead.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// One of the four children of a subdivided node, in visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Quadrant::NorthWest => 0,
            Quadrant::NorthEast => 1,
            Quadrant::SouthWest => 2,
            Quadrant::SouthEast => 3,
        }
    }

    /// Quadrant of `parent` owning `(x, y)`.
    ///
    /// Cells are half-open towards the parent's center, so a point on a split
    /// line belongs to the east and/or south side. The caller has already
    /// checked that the point lies within `parent`.
    #[inline]
    fn locate(parent: &Rect, x: f32, y: f32) -> Self {
        let (mid_x, mid_y) = parent.center();
        match (x < mid_x, y < mid_y) {
            (true, true) => Quadrant::NorthWest,
            (false, true) => Quadrant::NorthEast,
            (true, false) => Quadrant::SouthWest,
            (false, false) => Quadrant::SouthEast,
        }
    }

    /// Boundary of this quadrant within `parent`. Outer edges are copied from
    /// the parent and siblings meet at the parent's center, so the four cells
    /// tile the parent with no gap.
    fn bounds(self, parent: &Rect) -> Rect {
        let (mid_x, mid_y) = parent.center();
        let (min_x, max_x) = match self {
            Quadrant::NorthWest | Quadrant::SouthWest => (parent.x(), mid_x),
            Quadrant::NorthEast | Quadrant::SouthEast => (mid_x, parent.right()),
        };
        let (min_y, max_y) = match self {
            Quadrant::NorthWest | Quadrant::NorthEast => (parent.y(), mid_y),
            Quadrant::SouthWest | Quadrant::SouthEast => (mid_y, parent.bottom()),
        };
        Rect::from_edges(min_x, min_y, max_x, max_y)
    }
}

/// Counters collected while answering a single query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Point-level containment tests performed.
    pub checks: usize,
    /// Nodes whose boundary overlapped the range.
    pub nodes_visited: usize,
    /// Points appended to the output.
    pub matches: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuadTreeNode<P> {
    boundary: Rect,
    capacity: usize,
    depth: usize,
    points: Vec<Point<P>>,
    children: Option<Box<[QuadTreeNode<P>; 4]>>,
}

impl<P> QuadTreeNode<P> {
    fn new(boundary: Rect, capacity: usize, depth: usize) -> Self {
        QuadTreeNode {
            boundary,
            capacity,
            depth,
            points: Vec::new(),
            children: None,
        }
    }

    pub fn boundary(&self) -> &Rect {
        &self.boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Distance from the root, which sits at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Points stored directly in this node, in insertion order.
    pub fn points(&self) -> &[Point<P>] {
        &self.points
    }

    /// Children in NW, NE, SW, SE order, if the node has subdivided.
    pub fn children(&self) -> Option<&[QuadTreeNode<P>; 4]> {
        self.children.as_deref()
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadTreeNode<P>> {
        self.children().map(|children| &children[quadrant.index()])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Creates the four children if they do not exist yet. Points already
    /// stored here stay here.
    fn subdivide(&mut self) -> &mut [QuadTreeNode<P>; 4] {
        let boundary = self.boundary;
        let capacity = self.capacity;
        let depth = self.depth + 1;
        self.children.get_or_insert_with(|| {
            trace!(
                x = boundary.x(),
                y = boundary.y(),
                width = boundary.width(),
                depth,
                "subdividing node"
            );
            Box::new(Quadrant::ALL.map(|q| QuadTreeNode::new(q.bounds(&boundary), capacity, depth)))
        })
    }

    /// Stores a point already known to lie inside this node's boundary.
    fn insert_within(&mut self, point: Point<P>, max_depth: usize) {
        if self.children.is_none() {
            if self.points.len() < self.capacity {
                self.points.push(point);
                return;
            }
            if self.depth >= max_depth {
                trace!(
                    depth = self.depth,
                    stored = self.points.len() + 1,
                    "depth limit reached, node exceeds capacity"
                );
                self.points.push(point);
                return;
            }
        }

        let quadrant = Quadrant::locate(&self.boundary, point.x, point.y);
        let children = self.subdivide();
        children[quadrant.index()].insert_within(point, max_depth);
    }

    fn query_into<'a>(&'a self, region: &Region, out: &mut Vec<&'a Point<P>>, stats: &mut QueryStats) {
        if !region.overlaps(&self.boundary) {
            return;
        }
        stats.nodes_visited += 1;

        for point in &self.points {
            stats.checks += 1;
            if region.contains(point) {
                stats.matches += 1;
                out.push(point);
            }
        }

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_into(region, out, stats);
            }
        }
    }

    fn clear(&mut self) {
        self.points.clear();
        self.children = None;
    }
}

/// Point quadtree over a fixed rectangular boundary.
///
/// Each node keeps up to `capacity` points. Once full, it splits into four
/// equal quadrants and routes later points down to them; the points it already
/// holds are not redistributed.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadTree<P = ()> {
    root: QuadTreeNode<P>,
    max_depth: usize,
    len: usize,
}

impl<P> QuadTree<P> {
    /// Tree with the default capacity of four points per node.
    pub fn new(boundary: Rect) -> Self {
        QuadTree {
            root: QuadTreeNode::new(boundary, DEFAULT_CAPACITY, 0),
            max_depth: DEFAULT_MAX_DEPTH,
            len: 0,
        }
    }

    pub fn with_capacity(boundary: Rect, capacity: usize) -> Result<Self, QuadTreeError> {
        if capacity == 0 {
            return Err(QuadTreeError::ZeroCapacity);
        }
        Ok(QuadTree {
            root: QuadTreeNode::new(boundary, capacity, 0),
            max_depth: DEFAULT_MAX_DEPTH,
            len: 0,
        })
    }

    /// Sets the depth at which leaves stop subdividing.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn boundary(&self) -> &Rect {
        self.root.boundary()
    }

    pub fn capacity(&self) -> usize {
        self.root.capacity()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn root(&self) -> &QuadTreeNode<P> {
        &self.root
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `point`, returning `false` if it lies outside the tree boundary.
    ///
    /// Every point inside the boundary is accepted; a point on a quadrant
    /// split line goes to exactly one child.
    pub fn insert(&mut self, point: Point<P>) -> bool {
        if !self.root.boundary.contains(&point) {
            debug!(x = point.x, y = point.y, "point outside tree boundary, rejected");
            return false;
        }
        self.root.insert_within(point, self.max_depth);
        self.len += 1;
        true
    }

    /// Points contained by `region`, node-local points before descendants and
    /// children visited NW, NE, SW, SE.
    pub fn query(&self, region: impl Into<Region>) -> Vec<&Point<P>> {
        let mut found = Vec::new();
        self.query_into(region, &mut found);
        found
    }

    pub fn query_with_stats(&self, region: impl Into<Region>) -> (Vec<&Point<P>>, QueryStats) {
        let mut found = Vec::new();
        let stats = self.query_into(region, &mut found);
        (found, stats)
    }

    /// Appends matches to `out` without clearing it and reports how much work
    /// the traversal did.
    pub fn query_into<'a>(&'a self, region: impl Into<Region>, out: &mut Vec<&'a Point<P>>) -> QueryStats {
        let region = region.into();
        let mut stats = QueryStats::default();
        self.root.query_into(&region, out, &mut stats);
        stats
    }

    /// Drops every point and child node. Boundary, capacity and depth limit
    /// are kept.
    pub fn clear(&mut self) {
        debug!(points = self.len, "clearing quadtree");
        self.root.clear();
        self.len = 0;
    }

    /// Pre-order walk over every node, in the same order queries visit them.
    pub fn nodes(&self) -> Nodes<'_, P> {
        Nodes {
            stack: vec![&self.root],
        }
    }

    /// All stored points in node visiting order.
    pub fn points(&self) -> impl Iterator<Item = &Point<P>> + '_ {
        self.nodes().flat_map(|node| node.points.iter())
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Depth of the deepest node; 0 while the root is a leaf.
    pub fn depth(&self) -> usize {
        self.nodes().map(QuadTreeNode::depth).max().unwrap_or(0)
    }
}

/// Iterator returned by [`QuadTree::nodes`].
#[derive(Debug)]
pub struct Nodes<'a, P> {
    stack: Vec<&'a QuadTreeNode<P>>,
}

impl<'a, P> Iterator for Nodes<'a, P> {
    type Item = &'a QuadTreeNode<P>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
