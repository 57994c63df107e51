//! Binary space partitioning tree over scene primitives.
//!
//! The tree splits space along one axis per branch at the midpoint of the
//! node box and files every primitive into exactly one side by the centre of
//! its bounding box. Nodes live in a flat arena and leaves refer to
//! primitives by index, so the tree never owns scene geometry.

use crate::hittable::{ClosestHit, Culling, HitRecord, Hittable};
use lumen_math::{Aabb, Ray};

/// Relative slack on the pruning test so that rounding in the slab test and
/// in primitive intersection never discards the true nearest hit.
const PRUNE_MARGIN: f32 = 1e-3;

/// Construction limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BspConfig {
    /// Deepest level a node may sit at (the root is level 0)
    pub max_depth: usize,
    /// Leaves above this size are split unless a limit is reached
    pub max_objects_per_leaf: usize,
}

impl Default for BspConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            max_objects_per_leaf: 5,
        }
    }
}

impl BspConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_objects_per_leaf(mut self, max_objects_per_leaf: usize) -> Self {
        self.max_objects_per_leaf = max_objects_per_leaf.max(1);
        self
    }
}

/// Tree node, stored in the arena of its [`BspTree`].
#[derive(Debug, Clone)]
pub enum BspNode {
    /// Internal node split by the plane `axis == split`.
    Branch {
        bounds: Aabb,
        axis: usize,
        split: f32,
        /// Arena index of the child below the split
        left: usize,
        /// Arena index of the child at or above the split
        right: usize,
    },
    /// Leaf holding indices into the scene's primitive list.
    Leaf { bounds: Aabb, objects: Vec<usize> },
}

impl BspNode {
    pub fn bounds(&self) -> &Aabb {
        match self {
            BspNode::Branch { bounds, .. } | BspNode::Leaf { bounds, .. } => bounds,
        }
    }
}

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BspStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub depth: usize,
    pub largest_leaf: usize,
    pub primitive_refs: usize,
}

/// Immutable spatial index built once per render.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<BspNode>,
    root: Option<usize>,
    config: BspConfig,
}

impl BspTree {
    /// Build a tree over primitives given by their bounding boxes.
    ///
    /// `bounds[i]` is the box of primitive `i`; leaves store those indices.
    /// An empty slice produces a tree without a root that never reports a hit.
    pub fn build(bounds: &[Aabb], config: BspConfig) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: None,
            config,
        };

        if let Some((first, rest)) = bounds.split_first() {
            let mut root_bounds = *first;
            for b in rest {
                root_bounds.subsume(b);
            }

            let objects = (0..bounds.len()).collect();
            tree.root = Some(tree.build_node(bounds, root_bounds, objects, 0));
        }

        let stats = tree.stats();
        log::info!(
            "BSP tree built over {} primitives: {} nodes, {} leaves, depth {}, largest leaf {}",
            bounds.len(),
            stats.node_count,
            stats.leaf_count,
            stats.depth,
            stats.largest_leaf
        );

        tree
    }

    /// Recursive top-down construction. Children are pushed before their
    /// parent; the returned value is the arena index of the new node.
    fn build_node(
        &mut self,
        primitives: &[Aabb],
        node_bounds: Aabb,
        objects: Vec<usize>,
        depth: usize,
    ) -> usize {
        if objects.len() <= self.config.max_objects_per_leaf || depth >= self.config.max_depth {
            return self.push_leaf(node_bounds, objects);
        }

        let axis = node_bounds.longest_axis();
        let split = node_bounds.center()[axis];

        let (left_objects, right_objects): (Vec<usize>, Vec<usize>) = objects
            .iter()
            .copied()
            .partition(|&i| primitives[i].center()[axis] < split);

        // A split that separates nothing cannot make progress
        if left_objects.is_empty() || right_objects.is_empty() {
            return self.push_leaf(node_bounds, objects);
        }

        let left_bounds = Self::child_bounds(
            node_bounds.with_axis_max(axis, split),
            primitives,
            &left_objects,
        );
        let right_bounds = Self::child_bounds(
            node_bounds.with_axis_min(axis, split),
            primitives,
            &right_objects,
        );

        let left = self.build_node(primitives, left_bounds, left_objects, depth + 1);
        let right = self.build_node(primitives, right_bounds, right_objects, depth + 1);

        self.nodes.push(BspNode::Branch {
            bounds: node_bounds,
            axis,
            split,
            left,
            right,
        });
        self.nodes.len() - 1
    }

    /// Clipped parent box grown back over primitives that straddle the split.
    fn child_bounds(clipped: Aabb, primitives: &[Aabb], objects: &[usize]) -> Aabb {
        let mut bounds = clipped;
        for &i in objects {
            bounds.subsume(&primitives[i]);
        }
        bounds
    }

    fn push_leaf(&mut self, bounds: Aabb, objects: Vec<usize>) -> usize {
        self.nodes.push(BspNode::Leaf { bounds, objects });
        self.nodes.len() - 1
    }

    /// Nearest hit among `objects` along `ray`.
    ///
    /// `objects` must be the list whose boxes were passed to [`BspTree::build`].
    pub fn find_closest_intersection<'a>(
        &self,
        objects: &'a [Box<dyn Hittable>],
        ray: &Ray,
        culling: Culling,
    ) -> Option<HitRecord<'a>> {
        let root = self.root?;
        let mut closest = ClosestHit::new(ray.origin());
        self.visit(root, objects, ray, culling, &mut closest);
        closest.into_hit()
    }

    fn visit<'a>(
        &self,
        index: usize,
        objects: &'a [Box<dyn Hittable>],
        ray: &Ray,
        culling: Culling,
        closest: &mut ClosestHit<'a>,
    ) {
        let Some(node) = self.nodes.get(index) else {
            return;
        };
        let Some(span) = node.bounds().intersect(ray) else {
            return;
        };

        // Everything in this node lies beyond its entry point
        let entry = span.min.max(0.0);
        let entry_dist_sq = entry * entry * ray.direction().length_squared();
        if entry_dist_sq > closest.dist_sq() * (1.0 + PRUNE_MARGIN) {
            return;
        }

        match node {
            BspNode::Leaf { objects: ids, .. } => {
                for &i in ids {
                    if let Some(rec) = objects.get(i).and_then(|obj| obj.hit(ray, culling)) {
                        closest.offer(i, rec);
                    }
                }
            }
            BspNode::Branch {
                axis,
                split,
                left,
                right,
                ..
            } => {
                let (near, far) = if ray.origin()[*axis] < *split {
                    (*left, *right)
                } else {
                    (*right, *left)
                };
                self.visit(near, objects, ray, culling, closest);
                self.visit(far, objects, ray, culling, closest);
            }
        }
    }

    pub fn root(&self) -> Option<&BspNode> {
        self.root.and_then(|i| self.nodes.get(i))
    }

    pub fn config(&self) -> BspConfig {
        self.config
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, BspNode::Leaf { .. }))
            .count()
    }

    /// Level of the deepest leaf (a lone root leaf has depth 0).
    pub fn depth(&self) -> usize {
        self.leaves().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// All leaves with their level, in depth-first order (left before right).
    pub fn leaves(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        let mut found = Vec::new();
        let mut stack: Vec<(usize, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();

        while let Some((index, depth)) = stack.pop() {
            match self.nodes.get(index) {
                Some(BspNode::Leaf { objects, .. }) => found.push((depth, objects.as_slice())),
                Some(BspNode::Branch { left, right, .. }) => {
                    stack.push((*right, depth + 1));
                    stack.push((*left, depth + 1));
                }
                None => {}
            }
        }

        found.into_iter()
    }

    pub fn stats(&self) -> BspStats {
        let mut stats = BspStats {
            node_count: self.node_count(),
            ..Default::default()
        };
        for (depth, objects) in self.leaves() {
            stats.leaf_count += 1;
            stats.depth = stats.depth.max(depth);
            stats.largest_leaf = stats.largest_leaf.max(objects.len());
            stats.primitive_refs += objects.len();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use lumen_math::Vec3;

    fn spheres_along_x(count: usize) -> Vec<Box<dyn Hittable>> {
        (0..count)
            .map(|i| {
                Box::new(Sphere::new(Vec3::new(i as f32 * 3.0, 0.0, 0.0), 1.0)) as Box<dyn Hittable>
            })
            .collect()
    }

    fn boxes(objects: &[Box<dyn Hittable>]) -> Vec<Aabb> {
        objects.iter().map(|o| o.bounding_box()).collect()
    }

    #[test]
    fn test_bsp_empty() {
        let tree = BspTree::build(&[], BspConfig::default());

        assert!(tree.root().is_none());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.depth(), 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(tree.find_closest_intersection(&[], &ray, Culling::Front).is_none());
    }

    #[test]
    fn test_bsp_single_leaf() {
        let objects = spheres_along_x(3);
        let tree = BspTree::build(&boxes(&objects), BspConfig::default());

        assert!(matches!(tree.root(), Some(BspNode::Leaf { .. })));
        assert_eq!(tree.leaf_count(), 1);

        let ray = Ray::new(Vec3::new(6.0, 0.0, -10.0), Vec3::Z);
        let rec = tree.find_closest_intersection(&objects, &ray, Culling::Front).unwrap();
        assert!((rec.p - Vec3::new(6.0, 0.0, -1.0)).length() < 1e-4);
        assert!((rec.distance - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_bsp_splits_and_every_primitive_lands_once() {
        let objects = spheres_along_x(40);
        let tree = BspTree::build(&boxes(&objects), BspConfig::default());

        assert!(matches!(tree.root(), Some(BspNode::Branch { axis: 0, .. })));

        let mut seen: Vec<usize> = tree.leaves().flat_map(|(_, ids)| ids.to_vec()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..40).collect::<Vec<_>>());

        let stats = tree.stats();
        assert_eq!(stats.primitive_refs, 40);
        assert!(stats.largest_leaf <= 5);
        assert_eq!(stats.node_count, 2 * stats.leaf_count - 1);
    }

    #[test]
    fn test_bsp_node_boxes_contain_children() {
        // Every box must enclose its subtree, including straddling spheres
        let objects: Vec<Box<dyn Hittable>> = (0..30)
            .map(|i| {
                let x = (i % 6) as f32 * 1.5;
                let y = (i / 6) as f32 * 1.5;
                Box::new(Sphere::new(Vec3::new(x, y, 0.0), 1.2)) as Box<dyn Hittable>
            })
            .collect();
        let bounds = boxes(&objects);
        let tree = BspTree::build(&bounds, BspConfig::default().with_max_objects_per_leaf(2));

        for node in &tree.nodes {
            if let BspNode::Leaf { bounds: leaf_box, objects: ids } = node {
                for &i in ids {
                    assert!(leaf_box.min.cmple(bounds[i].min).all());
                    assert!(leaf_box.max.cmpge(bounds[i].max).all());
                }
            }
        }
    }

    #[test]
    fn test_bsp_respects_max_depth() {
        let objects = spheres_along_x(64);
        let config = BspConfig::default()
            .with_max_depth(2)
            .with_max_objects_per_leaf(1);
        let tree = BspTree::build(&boxes(&objects), config);

        assert!(tree.depth() <= 2);
        assert!(tree.leaves().all(|(depth, _)| depth <= 2));
    }

    #[test]
    fn test_bsp_coincident_primitives_degrade_to_leaf() {
        // Same centre everywhere: no split separates them
        let objects: Vec<Box<dyn Hittable>> = (0..10)
            .map(|i| Box::new(Sphere::new(Vec3::ZERO, 1.0 + i as f32 * 0.1)) as Box<dyn Hittable>)
            .collect();
        let tree = BspTree::build(&boxes(&objects), BspConfig::default());

        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.stats().largest_leaf, 10);
    }

    #[test]
    fn test_bsp_far_side_hit_found() {
        // Ray starts on the right side but only hits something on the left
        let objects = spheres_along_x(20);
        let tree = BspTree::build(&boxes(&objects), BspConfig::default());

        let ray = Ray::new(Vec3::new(100.0, 0.0, 0.0), -Vec3::X);
        let rec = tree.find_closest_intersection(&objects, &ray, Culling::Front).unwrap();
        assert!((rec.p.x - 58.0).abs() < 1e-3);

        let ray = Ray::new(Vec3::new(-100.0, 0.0, 0.0), Vec3::X);
        let rec = tree.find_closest_intersection(&objects, &ray, Culling::Front).unwrap();
        assert!((rec.p.x + 1.0).abs() < 1e-3);
    }
}
