//! Insert-only quad tree over axis-aligned rectangles.
//!
//! The tree is rebuilt from scratch every tick, so it never has to track
//! moving entries or support removal. Entries live in an arena owned by the
//! tree and node buckets hold arena indices, which lets a rectangle that
//! straddles a split line sit in several leaves without any of them owning it.

use tracing::trace;
use wizard_duel_core::{QuadTreeConfig, Rect};

/// Spatial index answering "which rectangles touch this region" queries.
///
/// Rectangles that are not fully inside the root bounds are kept in a
/// root-level stray bucket and are checked by every query, so out-of-bounds
/// geometry stays retrievable.
#[derive(Clone, Debug)]
pub struct QuadTree<T> {
    config: QuadTreeConfig,
    root: Node,
    entries: Vec<Entry<T>>,
    strays: Vec<usize>,
}

#[derive(Clone, Copy, Debug)]
struct Entry<T> {
    rect: Rect,
    item: T,
}

#[derive(Clone, Debug)]
struct Node {
    bounds: Rect,
    depth: u32,
    bucket: Vec<usize>,
    children: Option<Box<[Node; 4]>>,
}

impl<T: Copy> QuadTree<T> {
    /// Creates an empty tree covering `bounds`.
    #[must_use]
    pub fn new(bounds: Rect, config: QuadTreeConfig) -> Self {
        debug_assert!(config.capacity > 0, "quad tree capacity must be positive");
        Self {
            config,
            root: Node::leaf(bounds, 0),
            entries: Vec::new(),
            strays: Vec::new(),
        }
    }

    /// Region covered by the root node.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Number of inserted entries, counting each insertion once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deepest level reached by subdivision; zero while the root is a leaf.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.root.deepest()
    }

    /// Total number of nodes, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Drops every entry and collapses the tree back to a single leaf.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.strays.clear();
        self.root = Node::leaf(self.root.bounds, 0);
    }

    /// Inserts `rect`, tagging it with `item`.
    pub fn insert(&mut self, rect: Rect, item: T) {
        let index = self.entries.len();
        self.entries.push(Entry { rect, item });

        if self.root.bounds.contains_rect(&rect) {
            self.root.insert(index, &self.entries, &self.config);
        } else {
            self.strays.push(index);
        }
    }

    /// Returns every item whose rectangle touches `query`.
    ///
    /// Each item appears once, in insertion order, no matter how many leaves
    /// hold it.
    #[must_use]
    pub fn retrieve(&self, query: &Rect) -> Vec<T> {
        self.retrieve_with_bounds(query)
            .into_iter()
            .map(|(_, item)| item)
            .collect()
    }

    /// Same as [`QuadTree::retrieve`] but also yields each item's rectangle.
    #[must_use]
    pub fn retrieve_with_bounds(&self, query: &Rect) -> Vec<(Rect, T)> {
        let mut hits: Vec<usize> = self
            .strays
            .iter()
            .copied()
            .filter(|&index| self.entries[index].rect.touches(query))
            .collect();

        if self.root.bounds.touches(query) {
            self.root.collect(query, &self.entries, &mut hits);
        }

        hits.sort_unstable();
        hits.dedup();
        hits.into_iter()
            .map(|index| {
                let entry = self.entries[index];
                (entry.rect, entry.item)
            })
            .collect()
    }
}

impl Node {
    fn leaf(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            bucket: Vec::new(),
            children: None,
        }
    }

    fn insert<T>(&mut self, index: usize, entries: &[Entry<T>], config: &QuadTreeConfig) {
        if self.children.is_none()
            && self.bucket.len() >= config.capacity
            && self.depth < config.max_depth
        {
            self.subdivide(entries, config);
        }

        match self.children.as_deref_mut() {
            Some(children) => insert_into_children(children, index, entries, config),
            None => self.bucket.push(index),
        }
    }

    fn subdivide<T>(&mut self, entries: &[Entry<T>], config: &QuadTreeConfig) {
        let depth = self.depth + 1;
        let [top_left, top_right, bottom_left, bottom_right] = self.bounds.quadrants();
        let mut children = Box::new([
            Node::leaf(top_left, depth),
            Node::leaf(top_right, depth),
            Node::leaf(bottom_left, depth),
            Node::leaf(bottom_right, depth),
        ]);

        trace!(
            depth = self.depth,
            held = self.bucket.len(),
            "subdividing quad tree node"
        );

        for index in self.bucket.drain(..) {
            insert_into_children(&mut children, index, entries, config);
        }
        self.children = Some(children);
    }

    fn collect<T>(&self, query: &Rect, entries: &[Entry<T>], out: &mut Vec<usize>) {
        match self.children.as_deref() {
            Some(children) => {
                for child in children {
                    if child.bounds.touches(query) {
                        child.collect(query, entries, out);
                    }
                }
            }
            None => out.extend(
                self.bucket
                    .iter()
                    .copied()
                    .filter(|&index| entries[index].rect.touches(query)),
            ),
        }
    }

    fn deepest(&self) -> u32 {
        self.children.as_deref().map_or(self.depth, |children| {
            children
                .iter()
                .map(Node::deepest)
                .max()
                .unwrap_or(self.depth)
        })
    }

    fn count(&self) -> usize {
        1 + self
            .children
            .as_deref()
            .map_or(0, |children| children.iter().map(Node::count).sum())
    }
}

fn insert_into_children<T>(
    children: &mut [Node; 4],
    index: usize,
    entries: &[Entry<T>],
    config: &QuadTreeConfig,
) {
    let rect = entries[index].rect;
    for child in children.iter_mut() {
        if child.bounds.touches(&rect) {
            child.insert(index, entries, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(capacity: usize) -> QuadTree<u32> {
        QuadTree::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            QuadTreeConfig {
                capacity,
                max_depth: 4,
            },
        )
    }

    #[test]
    fn root_stays_a_leaf_until_capacity_is_exceeded() {
        let mut quad = tree(4);
        for id in 0..4 {
            quad.insert(Rect::new(10.0 * id as f32, 10.0, 2.0, 2.0), id);
        }
        assert_eq!(quad.depth(), 0);
        assert_eq!(quad.node_count(), 1);

        quad.insert(Rect::new(70.0, 70.0, 2.0, 2.0), 4);
        assert_eq!(quad.depth(), 1);
        assert_eq!(quad.node_count(), 5);
    }

    #[test]
    fn subdivision_stops_at_max_depth() {
        let mut quad = tree(1);
        for id in 0..32 {
            quad.insert(Rect::new(1.0, 1.0, 1.0, 1.0), id);
        }
        assert_eq!(quad.depth(), 4);
        assert_eq!(quad.retrieve(&Rect::new(0.0, 0.0, 3.0, 3.0)).len(), 32);
    }

    #[test]
    fn straddling_entry_is_reported_once() {
        let mut quad = tree(1);
        quad.insert(Rect::new(10.0, 10.0, 1.0, 1.0), 0);
        quad.insert(Rect::new(45.0, 45.0, 10.0, 10.0), 1);
        quad.insert(Rect::new(80.0, 80.0, 1.0, 1.0), 2);

        assert_eq!(quad.retrieve(&Rect::new(0.0, 0.0, 100.0, 100.0)), vec![0, 1, 2]);
        assert_eq!(quad.retrieve(&Rect::new(52.0, 52.0, 1.0, 1.0)), vec![1]);
        assert_eq!(quad.retrieve(&Rect::new(46.0, 46.0, 1.0, 1.0)), vec![1]);
    }

    #[test]
    fn clear_resets_structure() {
        let mut quad = tree(1);
        for id in 0..8 {
            quad.insert(Rect::new(5.0 * id as f32, 5.0, 1.0, 1.0), id);
        }
        quad.insert(Rect::new(-20.0, -20.0, 5.0, 5.0), 99);
        assert!(quad.depth() > 0);

        quad.clear();
        assert!(quad.is_empty());
        assert_eq!(quad.node_count(), 1);
        assert!(quad.retrieve(&Rect::new(-50.0, -50.0, 200.0, 200.0)).is_empty());
    }

    #[test]
    fn partially_outside_entries_are_strays() {
        let mut quad = tree(4);
        quad.insert(Rect::new(-5.0, -5.0, 10.0, 10.0), 7);
        assert_eq!(quad.strays, vec![0]);
        assert_eq!(quad.retrieve(&Rect::new(-4.0, -4.0, 1.0, 1.0)), vec![7]);
        assert_eq!(quad.retrieve(&Rect::new(2.0, 2.0, 1.0, 1.0)), vec![7]);
    }
}
