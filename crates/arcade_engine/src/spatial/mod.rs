//! Spatial partitioning data structures
//!
//! Provides the per-query index used to find candidate pairs for collision
//! and overlap tests in 2D space.

mod quadtree;

pub use quadtree::{OverlapCallback, QuadList, QuadNode, QuadTree};
