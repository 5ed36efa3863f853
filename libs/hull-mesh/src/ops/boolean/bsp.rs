//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG boolean operations.
//! Based on the csg.js algorithm by Evan Wallace.
//!
//! ## Algorithm
//!
//! Each BSP node contains:
//! - A dividing plane
//! - Polygons coplanar with the plane
//! - Front subtree (polygons in front of plane)
//! - Back subtree (polygons behind plane)
//!
//! ## Operations
//!
//! - `clip_to`: Remove polygons from this tree that are inside another tree
//! - `invert`: Flip all polygons and swap front/back subtrees
//! - `into_polygons`: Drain the tree back into a polygon list
//!
//! ## Stack Safety
//!
//! Nodes live in a flat arena and every traversal uses an explicit work
//! stack, so degenerate (list-shaped) trees cannot overflow the call stack
//! of a worker thread.

use super::plane::Plane;
use super::polygon::{Polygon, SplitBuckets};

type NodeId = usize;

/// A node in the BSP tree.
#[derive(Debug, Clone, Default)]
struct BspNode {
    /// Splitting plane, `None` only for an empty root.
    plane: Option<Plane>,
    /// Polygons coplanar with this node's plane
    polygons: Vec<Polygon>,
    /// Front subtree (polygons in front of plane)
    front: Option<NodeId>,
    /// Back subtree (polygons behind plane)
    back: Option<NodeId>,
}

/// A BSP tree over convex polygons, stored as a node arena.
///
/// # Example
///
/// ```rust,ignore
/// let tree = BspTree::new(mesh_to_polygons(&mesh));
/// let outside = tree.clip_polygons(other_polygons);
/// ```
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

const ROOT: NodeId = 0;

impl BspTree {
    /// Creates a new BSP tree from polygons.
    ///
    /// The first polygon of each subset is used as the splitter, which keeps
    /// construction deterministic for a given input order.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut tree = Self {
            nodes: vec![BspNode::default()],
        };

        let mut stack: Vec<(NodeId, Vec<Polygon>)> = vec![(ROOT, polygons)];

        while let Some((id, polys)) = stack.pop() {
            let mut polys = polys.into_iter();
            let Some(first) = polys.next() else {
                continue;
            };

            let plane = *first.plane();
            let mut buckets = SplitBuckets::default();
            buckets.coplanar_front.push(first);
            for poly in polys {
                poly.split(&plane, &mut buckets);
            }

            let SplitBuckets {
                mut coplanar_front,
                coplanar_back,
                front,
                back,
            } = buckets;
            coplanar_front.extend(coplanar_back);

            let node = &mut tree.nodes[id];
            node.plane = Some(plane);
            node.polygons = coplanar_front;

            if !front.is_empty() {
                let child = tree.push_node();
                tree.nodes[id].front = Some(child);
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child = tree.push_node();
                tree.nodes[id].back = Some(child);
                stack.push((child, back));
            }
        }

        tree
    }

    fn push_node(&mut self) -> NodeId {
        self.nodes.push(BspNode::default());
        self.nodes.len() - 1
    }

    /// Inverts this BSP tree (solid becomes empty space and vice versa).
    ///
    /// Every node is visited exactly once, so the arena is walked directly.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for poly in &mut node.polygons {
                poly.flip();
            }
            node.plane = node.plane.map(|p| p.flip());
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Removes the parts of `polygons` that lie inside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        if self.nodes[ROOT].plane.is_none() {
            return polygons;
        }

        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, Vec<Polygon>)> = vec![(ROOT, polygons)];

        while let Some((id, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let node = &self.nodes[id];
            let Some(plane) = node.plane else {
                result.extend(polys);
                continue;
            };

            let mut buckets = SplitBuckets::default();
            for poly in polys {
                poly.split(&plane, &mut buckets);
            }

            let SplitBuckets {
                coplanar_front,
                coplanar_back,
                mut front,
                mut back,
            } = buckets;
            front.extend(coplanar_front);
            back.extend(coplanar_back);

            match node.front {
                Some(child) => stack.push((child, front)),
                None => result.extend(front),
            }

            // Without a back subtree the back side is solid: discard
            if let Some(child) = node.back {
                stack.push((child, back));
            }
        }

        result
    }

    /// Clips this tree's polygons to another tree.
    ///
    /// Removes parts of this tree's polygons that are inside the other tree.
    pub fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            node.polygons = other.clip_polygons(std::mem::take(&mut node.polygons));
        }
    }

    /// Consumes the tree and returns its polygons in arena order.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.nodes
            .into_iter()
            .flat_map(|node| node.polygons)
            .collect()
    }

    /// Returns the number of polygons in this tree.
    #[cfg(test)]
    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|node| node.polygons.len()).sum()
    }

    /// Returns the depth of this tree.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = vec![(ROOT, 1)];

        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let node = &self.nodes[id];
            for child in [node.front, node.back].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }

        max_depth
    }
}
