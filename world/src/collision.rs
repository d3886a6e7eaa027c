//! Axis-separated collision resolution against solid level geometry.

use wizard_duel_core::{Axis, Coord, QuadTreeConfig, Rect, SolidId};

use crate::quad_tree::QuadTree;

/// Immovable piece of level geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solid {
    /// Identifier assigned when the solid was added.
    pub id: SolidId,
    /// Region occupied by the solid.
    pub rect: Rect,
}

/// Overlap thinner than this across the other axis counts as touching, not
/// blocking.
const CONTACT_SKIN: f32 = 1e-3;

/// Per-tick spatial index over the solids of the arena.
#[derive(Clone, Debug)]
pub struct SolidField {
    tree: QuadTree<SolidId>,
}

impl SolidField {
    /// Indexes `solids` inside a tree rooted at `bounds`.
    #[must_use]
    pub fn build(bounds: Rect, config: QuadTreeConfig, solids: &[Solid]) -> Self {
        let mut field = Self {
            tree: QuadTree::new(bounds, config),
        };
        field.rebuild(solids);
        field
    }

    /// Drops the previous index and indexes `solids` under the same bounds.
    pub fn rebuild(&mut self, solids: &[Solid]) {
        self.tree.clear();
        for solid in solids {
            self.tree.insert(solid.rect, solid.id);
        }
    }

    /// Solids sharing a region of positive area with `rect`, in insertion
    /// order.
    #[must_use]
    pub fn collisions(&self, rect: &Rect) -> Vec<Solid> {
        self.tree
            .retrieve_with_bounds(rect)
            .into_iter()
            .filter(|(bounds, _)| bounds.intersects(rect))
            .map(|(bounds, id)| Solid { id, rect: bounds })
            .collect()
    }

    /// Solids that stop `rect` along `axis`.
    ///
    /// An overlap thinner than the contact skin across the other axis is a
    /// grazing contact left behind by rounding, such as a wizard resting on a
    /// floor while it walks, and is skipped.
    #[must_use]
    pub fn blockers(&self, rect: &Rect, axis: Axis) -> Vec<Solid> {
        self.collisions(rect)
            .into_iter()
            .filter(|solid| overlap_across(rect, &solid.rect, axis) >= CONTACT_SKIN)
            .collect()
    }

    /// Reports whether any solid stops `rect` along `axis`.
    #[must_use]
    pub fn is_blocked(&self, rect: &Rect, axis: Axis) -> bool {
        !self.blockers(rect, axis).is_empty()
    }
}

fn overlap_across(own: &Rect, other: &Rect, axis: Axis) -> f32 {
    match axis {
        Axis::Horizontal => own.bottom().min(other.bottom()) - own.y().max(other.y()),
        Axis::Vertical => own.right().min(other.right()) - own.x().max(other.x()),
    }
}

/// Receives contact notifications while a box is resolved along an axis.
///
/// Every method defaults to doing nothing so listeners only implement the
/// contacts they care about.
pub trait ContactListener {
    /// Called once per overlapping solid.
    fn on_collision(&mut self) {}

    /// Called when a solid to the left pushed the box to the right.
    fn on_left(&mut self) {}

    /// Called when a solid to the right pushed the box to the left.
    fn on_right(&mut self) {}

    /// Called when a solid below pushed the box up.
    fn on_bottom(&mut self) {}

    /// Called when a solid above pushed the box down.
    fn on_top(&mut self) {}
}

impl ContactListener for () {}

/// Position and velocity of a body moved by a [`CollisionBox`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    /// Center of the body.
    pub position: Coord,
    /// Velocity in world units per tick.
    pub velocity: Coord,
}

/// Axis-aligned box centred on the position of the body it moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionBox {
    half_extents: Coord,
    contact_epsilon: f32,
}

impl CollisionBox {
    /// Creates a box extending `half_extents` from its owner's center.
    ///
    /// `contact_epsilon` is the vertical velocity left behind after a vertical
    /// contact.
    #[must_use]
    pub const fn new(half_extents: Coord, contact_epsilon: f32) -> Self {
        Self {
            half_extents,
            contact_epsilon,
        }
    }

    /// Half width and half height of the box.
    #[must_use]
    pub const fn half_extents(&self) -> Coord {
        self.half_extents
    }

    /// Region covered by the box when centred on `center`.
    #[must_use]
    pub fn rect_at(&self, center: Coord) -> Rect {
        Rect::from_center(center, self.half_extents)
    }

    /// Moves `body` by `delta` along `axis` and pushes it out of every solid
    /// it ends up overlapping.
    ///
    /// Overlaps are found once, after the move, and resolved one at a time in
    /// retrieval order so the last push wins. Each push moves the body out by
    /// the penetration depth `(own_half + other_half) - |own_center - other_center|`,
    /// away from the obstacle's center. Horizontal contacts stop horizontal
    /// motion; vertical contacts leave the contact epsilon as vertical
    /// velocity. Returns the number of overlaps resolved.
    pub fn move_axis<L>(
        &self,
        body: &mut Body,
        axis: Axis,
        delta: f32,
        field: &SolidField,
        listener: &mut L,
    ) -> usize
    where
        L: ContactListener + ?Sized,
    {
        *body.position.along_mut(axis) += delta;

        let overlaps = field.blockers(&self.rect_at(body.position), axis);
        let own_half = self.half_extents.along(axis);
        for solid in &overlaps {
            let other_center = solid.rect.center().along(axis);
            let reach = own_half + solid.rect.half_extents().along(axis);
            let pushed_forward = body.position.along(axis) > other_center;

            // Same as adding the penetration depth, but derived from the
            // obstacle's edge so resting contacts stay exactly flush.
            *body.position.along_mut(axis) = if pushed_forward {
                other_center + reach
            } else {
                other_center - reach
            };

            match (axis, pushed_forward) {
                (Axis::Horizontal, true) => {
                    body.velocity.x = 0.0;
                    listener.on_left();
                }
                (Axis::Horizontal, false) => {
                    body.velocity.x = 0.0;
                    listener.on_right();
                }
                (Axis::Vertical, true) => {
                    body.velocity.y = self.contact_epsilon;
                    listener.on_top();
                }
                (Axis::Vertical, false) => {
                    body.velocity.y = self.contact_epsilon;
                    listener.on_bottom();
                }
            }
            listener.on_collision();
        }

        overlaps.len()
    }
}
