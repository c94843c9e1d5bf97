//! Point quadtree with rectangle and circle range queries.
//!
//! ```
//! use quadview::{Circle, Point, QuadTree, Rect};
//!
//! let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0)?);
//! for (i, v) in [10.0, 20.0, 30.0, 40.0, 50.0].into_iter().enumerate() {
//!     tree.insert(Point::with_data(v, v, i));
//! }
//! assert!(!tree.insert(Point::with_data(-5.0, -5.0, 99)));
//!
//! let hits = tree.query(Rect::new(0.0, 0.0, 15.0, 15.0)?);
//! assert_eq!(hits.len(), 1);
//!
//! let (hits, stats) = tree.query_with_stats(Circle::new(50.0, 50.0, 1.0)?);
//! assert_eq!(hits[0].data, 4);
//! assert!(stats.checks <= tree.len());
//! # Ok::<(), quadview::QuadTreeError>(())
//! ```

mod error;
mod geometry;
mod quadtree;

pub use error::QuadTreeError;
pub use geometry::{Circle, Point, Rect, Region};
pub use quadtree::{
    Nodes, QuadTree, QuadTreeNode, Quadrant, QueryStats, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH,
};
