//! Quad tree spatial partitioning structure
//!
//! Built fresh for every `collide`/`overlap` call and dropped afterwards.
//! Each node keeps two lists of object keys, "A" and "B", so one tree can
//! answer "which objects of A touch objects of B" without testing A against
//! itself. Quadrant children are only created when an object lands in them.

use log::trace;

use crate::core::config::WorldBounds;
use crate::ecs::{Entity, World};
use crate::foundation::math::Rect;

/// Pair callback used during traversal
///
/// Receives the two keys of an overlapping pair and returns whether the pair
/// counts as a hit.
pub type OverlapCallback<'a> = dyn FnMut(&mut World, Entity, Entity) -> bool + 'a;

/// Which of a node's two lists receives an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadList {
    /// First operand of a query
    A,
    /// Second operand of a query
    B,
}

const NORTH_WEST: usize = 0;
const NORTH_EAST: usize = 1;
const SOUTH_EAST: usize = 2;
const SOUTH_WEST: usize = 3;

/// Single node in the quad tree
#[derive(Debug, Clone)]
pub struct QuadNode {
    /// World-space bounds of this node
    pub bounds: Rect,

    list_a: Vec<Entity>,
    list_b: Vec<Entity>,

    /// Quadrants in north-west, north-east, south-east, south-west order
    children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    /// Create an empty node
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            list_a: Vec::new(),
            list_b: Vec::new(),
            children: Default::default(),
        }
    }

    /// Keys held in `list`
    pub fn list(&self, list: QuadList) -> &[Entity] {
        match list {
            QuadList::A => &self.list_a,
            QuadList::B => &self.list_b,
        }
    }

    /// Child nodes that have been created
    pub fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().flatten().map(|child| &**child)
    }

    /// Whether no quadrant has been created yet
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    fn can_subdivide(&self, min_node_size: f32) -> bool {
        self.bounds.width > min_node_size || self.bounds.height > min_node_size
    }

    fn quadrant_bounds(&self, quadrant: usize) -> Rect {
        let half_width = self.bounds.width / 2.0;
        let half_height = self.bounds.height / 2.0;
        let mid_x = self.bounds.x + half_width;
        let mid_y = self.bounds.y + half_height;
        match quadrant {
            NORTH_WEST => Rect::new(self.bounds.x, self.bounds.y, half_width, half_height),
            NORTH_EAST => Rect::new(mid_x, self.bounds.y, half_width, half_height),
            SOUTH_EAST => Rect::new(mid_x, mid_y, half_width, half_height),
            _ => Rect::new(self.bounds.x, mid_y, half_width, half_height),
        }
    }

    /// Get a quadrant, creating it with copies of this node's lists
    fn child_mut(&mut self, quadrant: usize) -> &mut QuadNode {
        let bounds = self.quadrant_bounds(quadrant);
        let list_a = &self.list_a;
        let list_b = &self.list_b;
        self.children[quadrant].get_or_insert_with(|| {
            Box::new(QuadNode {
                bounds,
                list_a: list_a.clone(),
                list_b: list_b.clone(),
                children: Default::default(),
            })
        })
    }

    /// Push into `list` here and in every existing descendant
    fn add_to_list(&mut self, entity: Entity, list: QuadList) {
        match list {
            QuadList::A => self.list_a.push(entity),
            QuadList::B => self.list_b.push(entity),
        }
        for child in self.children.iter_mut().flatten() {
            child.add_to_list(entity, list);
        }
    }

    /// Place an object occupying `rect`
    fn add_object(&mut self, entity: Entity, rect: &Rect, list: QuadList, min_node_size: f32) {
        if !self.can_subdivide(min_node_size) || rect.covers(&self.bounds) {
            self.add_to_list(entity, list);
            return;
        }

        let left = self.bounds.x;
        let top = self.bounds.y;
        let right = self.bounds.right();
        let bottom = self.bounds.bottom();
        let mid_x = left + self.bounds.width / 2.0;
        let mid_y = top + self.bounds.height / 2.0;

        // Strictly inside one quadrant
        if rect.x > left && rect.right() < mid_x {
            if rect.y > top && rect.bottom() < mid_y {
                self.child_mut(NORTH_WEST).add_object(entity, rect, list, min_node_size);
                return;
            }
            if rect.y > mid_y && rect.bottom() < bottom {
                self.child_mut(SOUTH_WEST).add_object(entity, rect, list, min_node_size);
                return;
            }
        }
        if rect.x > mid_x && rect.right() < right {
            if rect.y > top && rect.bottom() < mid_y {
                self.child_mut(NORTH_EAST).add_object(entity, rect, list, min_node_size);
                return;
            }
            if rect.y > mid_y && rect.bottom() < bottom {
                self.child_mut(SOUTH_EAST).add_object(entity, rect, list, min_node_size);
                return;
            }
        }

        // Straddles quadrant borders
        if rect.right() > left && rect.x < mid_x && rect.bottom() > top && rect.y < mid_y {
            self.child_mut(NORTH_WEST).add_object(entity, rect, list, min_node_size);
        }
        if rect.right() > mid_x && rect.x < right && rect.bottom() > top && rect.y < mid_y {
            self.child_mut(NORTH_EAST).add_object(entity, rect, list, min_node_size);
        }
        if rect.right() > mid_x && rect.x < right && rect.bottom() > mid_y && rect.y < bottom {
            self.child_mut(SOUTH_EAST).add_object(entity, rect, list, min_node_size);
        }
        if rect.right() > left && rect.x < mid_x && rect.bottom() > mid_y && rect.y < bottom {
            self.child_mut(SOUTH_WEST).add_object(entity, rect, list, min_node_size);
        }
    }

    /// Report overlapping pairs held by this node and its descendants
    fn overlap(&self, world: &mut World, both_lists: bool, callback: &mut OverlapCallback<'_>) -> bool {
        let mut hit = false;

        if both_lists {
            for &entity in &self.list_a {
                if is_collidable(world, entity) && overlap_against(world, entity, &self.list_b, callback) {
                    hit = true;
                }
            }
            for &entity in &self.list_b {
                if !is_collidable(world, entity) {
                    continue;
                }
                for child in self.children.iter().flatten() {
                    if overlap_against(world, entity, &child.list_a, callback) {
                        hit = true;
                    }
                }
            }
        } else {
            for (index, &entity) in self.list_a.iter().enumerate() {
                if is_collidable(world, entity) && overlap_against(world, entity, &self.list_a[index + 1..], callback) {
                    hit = true;
                }
            }
        }

        for child in self.children.iter().flatten() {
            if child.overlap(world, both_lists, callback) {
                hit = true;
            }
        }
        hit
    }

    fn entry_count(&self) -> usize {
        self.list_a.len() + self.list_b.len() + self.children().map(QuadNode::entry_count).sum::<usize>()
    }

    fn node_count(&self) -> usize {
        1 + self.children().map(QuadNode::node_count).sum::<usize>()
    }
}

fn is_collidable(world: &World, entity: Entity) -> bool {
    world.get(entity).is_some_and(|object| object.is_collidable())
}

/// Run `callback` for every candidate whose rectangle touches `entity`'s
fn overlap_against(world: &mut World, entity: Entity, candidates: &[Entity], callback: &mut OverlapCallback<'_>) -> bool {
    let mut hit = false;
    for &other in candidates {
        if other == entity {
            continue;
        }
        let touching = match (world.get(entity), world.get(other)) {
            (Some(first), Some(second)) => {
                first.is_collidable() && second.is_collidable() && first.rect.overlaps(&second.rect)
            }
            _ => false,
        };
        if !touching {
            continue;
        }
        trace!("Candidate pair {:?} / {:?}", entity, other);
        if callback(world, entity, other) {
            hit = true;
        }
    }
    hit
}

/// Quad tree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct QuadTree {
    /// Root node covering the indexed region
    pub root: QuadNode,

    /// Nodes at or below this size on both axes hold objects directly
    min_node_size: f32,
}

impl QuadTree {
    /// Create an empty tree covering `bounds`
    ///
    /// The smallest node size comes from the root and the division count.
    pub fn new(bounds: &WorldBounds) -> Self {
        Self {
            root: QuadNode::new(bounds.rect()),
            min_node_size: bounds.min_node_size(),
        }
    }

    /// Smallest node size
    pub fn min_node_size(&self) -> f32 {
        self.min_node_size
    }

    /// Index `entity` into `list`
    ///
    /// A group contributes its live solid leaves, nested groups included.
    /// Non-solid objects are not indexed.
    pub fn insert(&mut self, world: &World, entity: Entity, list: QuadList) {
        let Some(object) = world.get(entity) else {
            return;
        };
        if let Some(group) = object.as_group() {
            for member in group.members() {
                if world.get(member).is_some_and(|member| member.exists) {
                    self.insert(world, member, list);
                }
            }
        }
        if object.collider.solid {
            self.root.add_object(entity, &object.rect, list, self.min_node_size);
        }
    }

    /// Report every overlapping pair
    ///
    /// With `both_lists` each pair has one key from A and one from B;
    /// otherwise pairs are drawn from list A alone. Returns whether the
    /// callback reported a hit for any pair.
    pub fn overlap(&self, world: &mut World, both_lists: bool, callback: &mut OverlapCallback<'_>) -> bool {
        self.root.overlap(world, both_lists, callback)
    }

    /// Total list entries across all nodes
    pub fn entry_count(&self) -> usize {
        self.root.entry_count()
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::GameObject;
    use crate::foundation::math::Vec2;

    fn bounds() -> WorldBounds {
        WorldBounds::new(0.0, 0.0, 600.0, 600.0)
    }

    fn spawn_box(world: &mut World, x: f32, y: f32, size: f32) -> Entity {
        world.spawn(GameObject::new(Rect::new(x, y, size, size)))
    }

    #[test]
    fn test_min_node_size_from_root() {
        let tree = QuadTree::new(&bounds());
        // (600 + 600) / (2 * 3)
        assert_eq!(tree.min_node_size(), 200.0);
        assert!(tree.root.is_leaf());
    }

    #[test]
    fn test_small_object_descends_to_one_quadrant() {
        let mut world = World::default();
        let entity = spawn_box(&mut world, 10.0, 10.0, 5.0);
        let mut tree = QuadTree::new(&bounds());

        tree.insert(&world, entity, QuadList::A);

        assert!(tree.root.list(QuadList::A).is_empty());
        // 600 -> 300 -> 150, and 150 is under the 200 minimum
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.entry_count(), 1);
    }

    #[test]
    fn test_inverted_bounds_keep_everything_at_root() {
        let mut world = World::default();
        let entity = spawn_box(&mut world, -100.0, 10.0, 5.0);
        let mut tree = QuadTree::new(&WorldBounds::new(0.0, 0.0, -600.0, 300.0));

        tree.insert(&world, entity, QuadList::A);

        assert!(tree.root.is_leaf());
        assert_eq!(tree.root.list(QuadList::A), &[entity]);
    }

    #[test]
    fn test_covering_object_stays_at_root() {
        let mut world = World::default();
        let entity = spawn_box(&mut world, -50.0, -50.0, 700.0);
        let mut tree = QuadTree::new(&bounds());

        tree.insert(&world, entity, QuadList::B);

        assert_eq!(tree.root.list(QuadList::B), &[entity]);
        assert!(tree.root.is_leaf());
    }

    #[test]
    fn test_straddling_object_enters_every_quadrant() {
        let mut world = World::default();
        let entity = spawn_box(&mut world, 290.0, 290.0, 20.0);
        let mut tree = QuadTree::new(&bounds());

        tree.insert(&world, entity, QuadList::A);

        assert_eq!(tree.root.children().count(), 4);
        assert!(tree.root.list(QuadList::A).is_empty());
    }

    #[test]
    fn test_new_child_copies_parent_lists() {
        let mut world = World::default();
        let big = spawn_box(&mut world, -50.0, -50.0, 700.0);
        let small = spawn_box(&mut world, 10.0, 10.0, 5.0);
        let mut tree = QuadTree::new(&bounds());

        tree.insert(&world, big, QuadList::B);
        tree.insert(&world, small, QuadList::A);

        let Some(child) = tree.root.children().next() else {
            panic!("expected a north-west child");
        };
        assert_eq!(child.list(QuadList::B), &[big]);
    }

    #[test]
    fn test_existing_children_receive_covering_objects() {
        let mut world = World::default();
        let small = spawn_box(&mut world, 10.0, 10.0, 5.0);
        let big = spawn_box(&mut world, -50.0, -50.0, 700.0);
        let mut tree = QuadTree::new(&bounds());

        tree.insert(&world, small, QuadList::A);
        tree.insert(&world, big, QuadList::B);

        for child in tree.root.children() {
            assert!(child.list(QuadList::B).contains(&big));
        }
    }

    #[test]
    fn test_group_inserts_solid_leaves_only() {
        let mut world = World::default();
        let group = world.spawn_group(Vec2::zeros());
        let inner = world.spawn_group(Vec2::zeros());
        let solid = spawn_box(&mut world, -50.0, -50.0, 700.0);
        let ghost = world.spawn(GameObject::new(Rect::new(-50.0, -50.0, 700.0, 700.0)).with_collider(
            crate::ecs::components::ColliderComponent::non_solid(),
        ));
        let dead = spawn_box(&mut world, -50.0, -50.0, 700.0);
        world.add(group, inner, false).unwrap();
        world.add(inner, solid, false).unwrap();
        world.add(group, ghost, false).unwrap();
        world.add(group, dead, false).unwrap();
        world.kill(dead);

        let mut tree = QuadTree::new(&bounds());
        tree.insert(&world, group, QuadList::A);

        assert_eq!(tree.root.list(QuadList::A), &[solid]);
    }

    #[test]
    fn test_single_list_reports_each_pair_once() {
        let mut world = World::default();
        let a = spawn_box(&mut world, 10.0, 10.0, 10.0);
        let b = spawn_box(&mut world, 15.0, 15.0, 10.0);
        let far = spawn_box(&mut world, 400.0, 400.0, 10.0);
        let mut tree = QuadTree::new(&bounds());
        for entity in [a, b, far] {
            tree.insert(&world, entity, QuadList::A);
        }

        let mut pairs = Vec::new();
        let hit = tree.overlap(&mut world, false, &mut |_, first, second| {
            pairs.push((first, second));
            true
        });

        assert!(hit);
        assert_eq!(pairs, vec![(a, b)]);
    }

    #[test]
    fn test_both_lists_pairs_a_with_b() {
        let mut world = World::default();
        let a1 = spawn_box(&mut world, 10.0, 10.0, 10.0);
        let a2 = spawn_box(&mut world, 12.0, 12.0, 10.0);
        let b = spawn_box(&mut world, 15.0, 15.0, 10.0);
        let mut tree = QuadTree::new(&bounds());
        tree.insert(&world, a1, QuadList::A);
        tree.insert(&world, a2, QuadList::A);
        tree.insert(&world, b, QuadList::B);

        let mut pairs = Vec::new();
        tree.overlap(&mut world, true, &mut |_, first, second| {
            pairs.push((first, second));
            false
        });

        assert_eq!(pairs, vec![(a1, b), (a2, b)]);
    }

    #[test]
    fn test_parent_b_meets_child_a_before_the_child_pairs_it() {
        let mut world = World::default();
        let big = spawn_box(&mut world, -50.0, -50.0, 700.0);
        let small = spawn_box(&mut world, 10.0, 10.0, 5.0);
        let mut tree = QuadTree::new(&bounds());
        tree.insert(&world, big, QuadList::B);
        tree.insert(&world, small, QuadList::A);

        let Some(middle) = tree.root.children().next() else {
            panic!("expected a north-west child");
        };
        assert!(middle.list(QuadList::A).is_empty());
        assert_eq!(middle.list(QuadList::B), &[big]);
        let Some(leaf) = middle.children().next() else {
            panic!("expected a north-west grandchild");
        };
        assert_eq!(leaf.list(QuadList::A), &[small]);

        let mut pairs = Vec::new();
        let hit = tree.overlap(&mut world, true, &mut |_, first, second| {
            pairs.push((first, second));
            true
        });

        // The middle node checks its B entry against the leaf's A list, then
        // the leaf checks its own A against the B it inherited.
        assert!(hit);
        assert_eq!(pairs, vec![(big, small), (small, big)]);
    }

    #[test]
    fn test_callback_result_is_ored() {
        let mut world = World::default();
        let a = spawn_box(&mut world, 10.0, 10.0, 10.0);
        let b = spawn_box(&mut world, 15.0, 15.0, 10.0);
        let mut tree = QuadTree::new(&bounds());
        tree.insert(&world, a, QuadList::A);
        tree.insert(&world, b, QuadList::B);

        assert!(!tree.overlap(&mut world, true, &mut |_, _, _| false));
        assert!(tree.overlap(&mut world, true, &mut |_, _, _| true));
    }

    #[test]
    fn test_dead_objects_are_skipped_during_traversal() {
        let mut world = World::default();
        let a = spawn_box(&mut world, 10.0, 10.0, 10.0);
        let b = spawn_box(&mut world, 15.0, 15.0, 10.0);
        let mut tree = QuadTree::new(&bounds());
        tree.insert(&world, a, QuadList::A);
        tree.insert(&world, b, QuadList::B);
        world.kill(b);

        let mut calls = 0;
        tree.overlap(&mut world, true, &mut |_, _, _| {
            calls += 1;
            true
        });
        assert_eq!(calls, 0);
    }
}
