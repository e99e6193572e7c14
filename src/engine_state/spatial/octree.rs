//! Arena-backed sparse octree over integer cells.
//!
//! Nodes live in a single `Vec` and refer to their children by index. A node gets a child
//! only once something is inserted under that octant, and removing the last entry below a
//! child hands the child back to a free list. The leaves sit at `max_level` and cover
//! exactly one unit cell.

use cgmath::{MetricSpace, Point3, Vector3};

use super::aabb::Aabb;

pub type NodeId = u32;

const ROOT: NodeId = 0;

/// Anything a ray query can return. Used to pick the nearest of several candidate hits.
pub trait RayHit {
    fn position(&self) -> Point3<f32>;
}

#[derive(Clone, Debug)]
struct OctreeNode<T> {
    bounds: Aabb,
    level: u32,
    children: [Option<NodeId>; 8],
    leaf: Option<(Point3<i32>, T)>,
    empty: bool,
}

impl<T> OctreeNode<T> {
    fn new(bounds: Aabb, level: u32) -> Self {
        OctreeNode {
            bounds,
            level,
            children: [None; 8],
            leaf: None,
            empty: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Octree<T> {
    nodes: Vec<OctreeNode<T>>,
    free_list: Vec<NodeId>,
    max_level: u32,
}

fn cell_center(coord: Point3<i32>) -> Point3<f32> {
    Point3::new(coord.x as f32, coord.y as f32, coord.z as f32)
}

impl<T: Copy> Octree<T> {
    /// Creates an empty tree whose root spans `bounds` and whose leaves are `max_level`
    /// subdivisions down.
    pub fn new(bounds: Aabb, max_level: u32) -> Self {
        Octree {
            nodes: vec![OctreeNode::new(bounds, 0)],
            free_list: Vec::new(),
            max_level,
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.nodes[ROOT as usize].bounds
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT as usize].empty
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Drops every entry and releases all node storage except the root.
    pub fn clear(&mut self) {
        let bounds = self.bounds();
        self.nodes.clear();
        self.free_list.clear();
        self.nodes.push(OctreeNode::new(bounds, 0));
    }

    /// Stores `payload` at the leaf covering `coord`, replacing any previous payload.
    ///
    /// # Returns
    /// `false` if `coord` lies outside the root bounds.
    pub fn insert(&mut self, coord: Point3<i32>, payload: T) -> bool {
        let p = cell_center(coord);
        if !self.bounds().contains(p) {
            return false;
        }
        self.insert_at(ROOT, coord, p, payload)
    }

    fn insert_at(&mut self, id: NodeId, coord: Point3<i32>, p: Point3<f32>, payload: T) -> bool {
        let (bounds, level) = {
            let node = &self.nodes[id as usize];
            (node.bounds, node.level)
        };

        if level == self.max_level {
            let node = &mut self.nodes[id as usize];
            node.leaf = Some((coord, payload));
            node.empty = false;
            return true;
        }

        for octant in 0..8 {
            let child_bounds = bounds.octant(octant);
            if !child_bounds.contains(p) {
                continue;
            }
            let child = match self.nodes[id as usize].children[octant] {
                Some(child) => child,
                None => {
                    let child = self.allocate(child_bounds, level + 1);
                    self.nodes[id as usize].children[octant] = Some(child);
                    child
                }
            };
            if self.insert_at(child, coord, p, payload) {
                self.nodes[id as usize].empty = false;
                return true;
            }
            if self.nodes[child as usize].empty {
                self.release(child);
                self.nodes[id as usize].children[octant] = None;
            }
            return false;
        }
        false
    }

    /// Clears the leaf covering `coord` and prunes every subtree left empty.
    ///
    /// # Returns
    /// `false` if nothing was stored at `coord`.
    pub fn remove(&mut self, coord: Point3<i32>) -> bool {
        let p = cell_center(coord);
        if !self.bounds().contains(p) {
            return false;
        }
        self.remove_at(ROOT, p)
    }

    fn remove_at(&mut self, id: NodeId, p: Point3<f32>) -> bool {
        let (bounds, level, empty) = {
            let node = &self.nodes[id as usize];
            (node.bounds, node.level, node.empty)
        };
        if empty {
            return false;
        }

        if level == self.max_level {
            let node = &mut self.nodes[id as usize];
            node.leaf = None;
            node.empty = true;
            return true;
        }

        let mut removed = false;
        for octant in 0..8 {
            if let Some(child) = self.nodes[id as usize].children[octant] {
                if bounds.octant(octant).contains(p) {
                    removed = self.remove_at(child, p);
                    break;
                }
            }
        }

        if removed {
            let mut all_empty = true;
            for octant in 0..8 {
                if let Some(child) = self.nodes[id as usize].children[octant] {
                    if self.nodes[child as usize].empty {
                        self.release(child);
                        self.nodes[id as usize].children[octant] = None;
                    } else {
                        all_empty = false;
                    }
                }
            }
            if all_empty {
                self.nodes[id as usize].empty = true;
            }
        }
        removed
    }

    /// The payload stored at `coord`, if any.
    pub fn get(&self, coord: Point3<i32>) -> Option<T> {
        let p = cell_center(coord);
        let mut id = ROOT;
        loop {
            let node = &self.nodes[id as usize];
            if !node.bounds.contains(p) || node.empty {
                return None;
            }
            if node.level == self.max_level {
                return node.leaf.map(|(_, payload)| payload);
            }
            let next = (0..8).find_map(|octant| {
                node.children[octant].filter(|_| node.bounds.octant(octant).contains(p))
            });
            id = next?;
        }
    }

    /// Walks every node the ray crosses and hands each occupied leaf to `on_leaf`
    /// together with the leaf's entry parameter. Of all accepted leaf hits the one
    /// closest to `origin` is returned; exact ties keep the first found.
    pub fn ray_query<H, F>(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        mut on_leaf: F,
    ) -> Option<H>
    where
        H: RayHit,
        F: FnMut(Point3<i32>, &T, f32) -> Option<H>,
    {
        self.ray_query_at(ROOT, origin, direction, &mut on_leaf)
    }

    fn ray_query_at<H, F>(
        &self,
        id: NodeId,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        on_leaf: &mut F,
    ) -> Option<H>
    where
        H: RayHit,
        F: FnMut(Point3<i32>, &T, f32) -> Option<H>,
    {
        let node = &self.nodes[id as usize];
        let (t_near, _) = node.bounds.intersect_ray(origin, direction)?;

        if node.level == self.max_level {
            let (coord, payload) = node.leaf.as_ref()?;
            return on_leaf(*coord, payload, t_near);
        }

        let mut nearest: Option<(f32, H)> = None;
        for child in node.children.iter().flatten() {
            if self.nodes[*child as usize].empty {
                continue;
            }
            if let Some(hit) = self.ray_query_at(*child, origin, direction, on_leaf) {
                let distance = hit.position().distance(origin);
                if nearest.as_ref().map_or(true, |(best, _)| distance < *best) {
                    nearest = Some((distance, hit));
                }
            }
        }
        nearest.map(|(_, hit)| hit)
    }

    fn allocate(&mut self, bounds: Aabb, level: u32) -> NodeId {
        let node = OctreeNode::new(bounds, level);
        match self.free_list.pop() {
            Some(id) => {
                self.nodes[id as usize] = node;
                id
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as NodeId
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let children = self.nodes[id as usize].children;
        for child in children.into_iter().flatten() {
            self.release(child);
        }
        let node = &mut self.nodes[id as usize];
        node.children = [None; 8];
        node.leaf = None;
        node.empty = true;
        self.free_list.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Hit(Point3<f32>, Point3<i32>);

    impl RayHit for Hit {
        fn position(&self) -> Point3<f32> {
            self.0
        }
    }

    fn tree() -> Octree<u8> {
        Octree::new(
            Aabb::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(7.5, 7.5, 7.5)),
            3,
        )
    }

    #[test]
    fn insert_allocates_one_path() {
        let mut octree = tree();
        assert_eq!(octree.node_count(), 1);
        assert!(octree.insert(Point3::new(3, 4, 5), 1));
        assert_eq!(octree.node_count(), 4);
        assert_eq!(octree.get(Point3::new(3, 4, 5)), Some(1));
        assert_eq!(octree.get(Point3::new(3, 4, 6)), None);
        assert!(!octree.is_empty());
    }

    #[test]
    fn insert_outside_bounds_is_rejected() {
        let mut octree = tree();
        assert!(!octree.insert(Point3::new(8, 0, 0), 1));
        assert!(!octree.insert(Point3::new(-1, 0, 0), 1));
        assert!(octree.is_empty());
    }

    #[test]
    fn reinsert_replaces_payload() {
        let mut octree = tree();
        octree.insert(Point3::new(1, 1, 1), 1);
        octree.insert(Point3::new(1, 1, 1), 2);
        assert_eq!(octree.get(Point3::new(1, 1, 1)), Some(2));
    }

    #[test]
    fn remove_prunes_back_to_root() {
        let mut octree = tree();
        octree.insert(Point3::new(0, 0, 0), 1);
        octree.insert(Point3::new(7, 7, 7), 1);
        let full = octree.node_count();

        assert!(octree.remove(Point3::new(0, 0, 0)));
        assert!(octree.node_count() < full);
        assert!(!octree.remove(Point3::new(0, 0, 0)));
        assert!(octree.remove(Point3::new(7, 7, 7)));

        assert!(octree.is_empty());
        assert_eq!(octree.node_count(), 1);
    }

    #[test]
    fn freed_nodes_are_reused() {
        let mut octree = tree();
        for _ in 0..10 {
            octree.insert(Point3::new(2, 5, 1), 1);
            octree.remove(Point3::new(2, 5, 1));
        }
        octree.insert(Point3::new(2, 5, 1), 1);
        assert_eq!(octree.node_count(), 4);
        assert!(octree.nodes.len() <= 4);
    }

    #[test]
    fn ray_query_returns_nearest_leaf() {
        let mut octree = tree();
        octree.insert(Point3::new(6, 2, 2), 6);
        octree.insert(Point3::new(3, 2, 2), 3);
        let origin = Point3::new(-2.0, 2.0, 2.0);

        let hit = octree
            .ray_query(origin, Vector3::new(1.0, 0.0, 0.0), |coord, _, t| {
                Some(Hit(origin + Vector3::new(t, 0.0, 0.0), coord))
            })
            .unwrap();
        assert_eq!(hit.1, Point3::new(3, 2, 2));
    }

    #[test]
    fn clear_resets_storage() {
        let mut octree = tree();
        for x in 0..8 {
            octree.insert(Point3::new(x, 0, 0), 0);
        }
        octree.clear();
        assert!(octree.is_empty());
        assert_eq!(octree.node_count(), 1);
        assert_eq!(octree.get(Point3::new(0, 0, 0)), None);
    }
}
