//! # Sliding Window
//!
//! Bookkeeping for the toroidal cube of resident chunks.
//!
//! The window covers `D³` world chunk coordinates starting at `offset`. Two tables are
//! kept: window-local position → pool slot, and pool slot → world chunk coordinate.
//! When the offset moves, slots whose coordinate is still covered keep it; the slots
//! that fell off one face are wrapped around to the opposite face and reported so the
//! caller can reload them.

use cgmath::{EuclideanSpace, Point3, Vector3};

use super::{
    chunk::CHUNK_DIMENSION,
    coordinates::{in_cube, MAX_CHUNK_COORD, MIN_CHUNK_COORD},
};

#[derive(Clone, Debug)]
pub struct SlidingWindow {
    load_distance: i32,
    offset: Point3<i32>,
    local_to_slot: Vec<usize>,
    slot_coords: Vec<Point3<i32>>,
}

impl SlidingWindow {
    /// Creates a window at `offset` where slot `i` holds local position `i`.
    pub fn new(load_distance: i32, offset: Point3<i32>) -> Self {
        let d = load_distance.max(1);
        let len = (d * d * d) as usize;
        let mut window = SlidingWindow {
            load_distance: d,
            offset,
            local_to_slot: (0..len).collect(),
            slot_coords: vec![offset; len],
        };
        for (local, slot) in window.iter_local().collect::<Vec<_>>() {
            window.slot_coords[slot] = local + offset.to_vec();
        }
        window
    }

    /// Window offset that centres a window of `load_distance` on the chunk containing
    /// `position`.
    ///
    /// The offset is clamped so that every chunk of the window lies between
    /// [`MIN_CHUNK_COORD`] and [`MAX_CHUNK_COORD`]; past the edge of the world the window
    /// stops following the camera.
    pub fn offset_for_position(position: Point3<f32>, load_distance: i32) -> Point3<i32> {
        let half = load_distance / 2;
        let highest = MAX_CHUNK_COORD - (load_distance - 1);
        position.map(|c| {
            let chunk = (c / CHUNK_DIMENSION as f32).floor() as i32;
            chunk.saturating_sub(half).clamp(MIN_CHUNK_COORD, highest)
        })
    }

    pub fn load_distance(&self) -> i32 {
        self.load_distance
    }

    pub fn offset(&self) -> Point3<i32> {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.local_to_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local_to_slot.is_empty()
    }

    pub fn local_index(&self, local: Point3<i32>) -> usize {
        let d = self.load_distance;
        ((local.x * d + local.y) * d + local.z) as usize
    }

    pub fn is_valid_local(&self, local: Point3<i32>) -> bool {
        in_cube(local, self.load_distance)
    }

    /// Whether all six neighbours of `local` are inside the window.
    pub fn is_interior(&self, local: Point3<i32>) -> bool {
        let d = self.load_distance;
        (1..d - 1).contains(&local.x) && (1..d - 1).contains(&local.y) && (1..d - 1).contains(&local.z)
    }

    pub fn slot_at_local(&self, local: Point3<i32>) -> Option<usize> {
        self.is_valid_local(local)
            .then(|| self.local_to_slot[self.local_index(local)])
    }

    /// Pool slot currently assigned to world chunk `chunk`, if it is resident.
    pub fn slot_for_chunk(&self, chunk: Point3<i32>) -> Option<usize> {
        self.slot_at_local(self.to_local(chunk))
    }

    pub fn to_local(&self, chunk: Point3<i32>) -> Point3<i32> {
        Point3::new(
            chunk.x - self.offset.x,
            chunk.y - self.offset.y,
            chunk.z - self.offset.z,
        )
    }

    /// World chunk coordinate the window has assigned to `slot`.
    pub fn slot_coordinate(&self, slot: usize) -> Point3<i32> {
        self.slot_coords[slot]
    }

    /// Every `(local position, slot)` pair, X outermost and Z innermost.
    pub fn iter_local(&self) -> impl Iterator<Item = (Point3<i32>, usize)> + '_ {
        let d = self.load_distance;
        (0..d).flat_map(move |x| {
            (0..d).flat_map(move |y| {
                (0..d).map(move |z| {
                    let local = Point3::new(x, y, z);
                    (local, self.local_to_slot[self.local_index(local)])
                })
            })
        })
    }

    /// Moves the window to `new_offset`.
    ///
    /// # Returns
    /// The `(slot, new world chunk coordinate)` of every slot whose coordinate changed.
    /// All other slots keep both their coordinate and their contents.
    pub fn shift(&mut self, new_offset: Point3<i32>) -> Vec<(usize, Point3<i32>)> {
        let delta = new_offset - self.offset;
        if delta == Vector3::new(0, 0, 0) {
            return Vec::new();
        }

        let d = self.load_distance;
        let mut new_map = vec![usize::MAX; self.local_to_slot.len()];
        let mut reassigned = Vec::new();

        for x in 0..d {
            for y in 0..d {
                for z in 0..d {
                    let local = Point3::new(x, y, z);
                    let old_local = local + delta;
                    let source = if self.is_valid_local(old_local) {
                        old_local
                    } else {
                        old_local.map(|c| c.rem_euclid(d))
                    };
                    let slot = self.local_to_slot[self.local_index(source)];

                    let coord = local + new_offset.to_vec();
                    new_map[self.local_index(local)] = slot;
                    if self.slot_coords[slot] != coord {
                        self.slot_coords[slot] = coord;
                        reassigned.push((slot, coord));
                    }
                }
            }
        }

        debug_assert!(is_permutation(&new_map), "window shift lost a slot");

        log::debug!(
            "Window moved from {:?} to {:?}, {} chunks reassigned",
            self.offset,
            new_offset,
            reassigned.len()
        );
        self.local_to_slot = new_map;
        self.offset = new_offset;
        reassigned
    }
}

/// Whether `map` holds each of `0..map.len()` exactly once.
fn is_permutation(map: &[usize]) -> bool {
    let mut seen = vec![false; map.len()];
    map.iter()
        .all(|&slot| slot < seen.len() && !std::mem::replace(&mut seen[slot], true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::coordinates::compose;
    use std::collections::HashSet;

    fn assert_is_permutation(window: &SlidingWindow) {
        let slots: HashSet<usize> = window.iter_local().map(|(_, slot)| slot).collect();
        assert_eq!(slots.len(), window.len());
        for (local, slot) in window.iter_local() {
            assert_eq!(
                window.slot_coordinate(slot),
                local + window.offset().to_vec()
            );
        }
    }

    #[test]
    fn new_window_assigns_identity_slots() {
        let window = SlidingWindow::new(4, Point3::new(-2, -2, -2));
        assert_eq!(window.len(), 64);
        assert_eq!(window.slot_at_local(Point3::new(0, 0, 0)), Some(0));
        assert_eq!(window.slot_coordinate(0), Point3::new(-2, -2, -2));
        assert_eq!(window.slot_for_chunk(Point3::new(1, 1, 1)), Some(63));
        assert_eq!(window.slot_for_chunk(Point3::new(2, 1, 1)), None);
        assert_is_permutation(&window);
    }

    #[test]
    fn offset_uses_floor_division() {
        assert_eq!(
            SlidingWindow::offset_for_position(Point3::new(0.0, 0.0, 0.0), 4),
            Point3::new(-2, -2, -2)
        );
        assert_eq!(
            SlidingWindow::offset_for_position(Point3::new(-0.5, 31.9, 32.0), 4),
            Point3::new(-3, -1, 0)
        );
    }

    #[test]
    fn one_chunk_step_reassigns_one_face() {
        let mut window = SlidingWindow::new(4, Point3::new(0, 0, 0));
        let before: Vec<(Point3<i32>, usize)> = window.iter_local().collect();

        let moved = window.shift(Point3::new(1, 0, 0));
        assert_eq!(moved.len(), 16);
        for (_, coord) in &moved {
            assert_eq!(coord.x, 4);
        }

        // Slots that stayed resident keep their coordinate, one local step lower.
        for (local, slot) in before {
            if local.x > 0 {
                assert_eq!(
                    window.slot_at_local(local - Vector3::new(1, 0, 0)),
                    Some(slot)
                );
            }
        }
        assert_is_permutation(&window);
    }

    #[test]
    fn negative_step_wraps_the_other_face() {
        let mut window = SlidingWindow::new(3, Point3::new(0, 0, 0));
        let moved = window.shift(Point3::new(0, -1, 0));
        assert_eq!(moved.len(), 9);
        assert!(moved.iter().all(|(_, coord)| coord.y == -1));
        assert_is_permutation(&window);
    }

    #[test]
    fn diagonal_step_reassigns_union_of_faces() {
        let mut window = SlidingWindow::new(4, Point3::new(0, 0, 0));
        let moved = window.shift(Point3::new(1, 1, 0));
        // 64 minus the 3x3x4 block that stays covered.
        assert_eq!(moved.len(), 64 - 36);
        assert_is_permutation(&window);
    }

    #[test]
    fn teleport_reassigns_everything() {
        let mut window = SlidingWindow::new(4, Point3::new(0, 0, 0));
        let moved = window.shift(Point3::new(100, -50, 7));
        assert_eq!(moved.len(), 64);
        assert_is_permutation(&window);
    }

    #[test]
    fn offset_stops_at_the_edge_of_the_world() {
        let offset = SlidingWindow::offset_for_position(Point3::new(3.0e10, -3.0e10, f32::NAN), 4);
        assert_eq!(offset, Point3::new(MAX_CHUNK_COORD - 3, MIN_CHUNK_COORD, -2));

        let mut window = SlidingWindow::new(4, Point3::new(-2, -2, -2));
        window.shift(offset);
        assert_is_permutation(&window);
        let last = window.slot_at_local(Point3::new(3, 3, 3)).unwrap();
        assert_eq!(
            compose(window.slot_coordinate(last), Point3::new(15, 15, 15)).x,
            i32::MAX
        );
        let first = window.slot_at_local(Point3::new(0, 0, 0)).unwrap();
        assert_eq!(
            compose(window.slot_coordinate(first), Point3::new(0, 0, 0)).y,
            i32::MIN
        );
    }

    #[test]
    fn permutation_check_rejects_duplicates_and_gaps() {
        assert!(is_permutation(&[2, 0, 1]));
        assert!(!is_permutation(&[0, 0, 1]));
        assert!(!is_permutation(&[0, usize::MAX, 1]));
    }

    #[test]
    fn unchanged_offset_is_a_no_op() {
        let mut window = SlidingWindow::new(2, Point3::new(5, 5, 5));
        assert!(window.shift(Point3::new(5, 5, 5)).is_empty());
    }

    #[test]
    fn interior_excludes_boundary_layer() {
        let window = SlidingWindow::new(4, Point3::new(0, 0, 0));
        assert!(window.is_interior(Point3::new(1, 2, 1)));
        assert!(!window.is_interior(Point3::new(0, 2, 1)));
        assert!(!window.is_interior(Point3::new(1, 3, 1)));
    }
}
