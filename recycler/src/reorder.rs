use alloc::vec::Vec;

use crate::{Pool, RenderTarget, SlotId};

/// A rotation of the visible children that restores ascending virtual order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reorder {
    #[default]
    Unchanged,
    /// Append these slots, in order, after the last child.
    MoveToEnd(Vec<SlotId>),
    /// Insert these slots, in order, before `before` (the first visible child).
    MoveToFront { slots: Vec<SlotId>, before: SlotId },
    /// Full placement around a fixed anchor: insert `front`, in order, before `anchor`, then
    /// append `back`, in order. Used when the children are no longer a rotation of virtual
    /// order (after the pool grew or was trimmed).
    Arrange {
        front: Vec<SlotId>,
        anchor: SlotId,
        back: Vec<SlotId>,
    },
}

impl Reorder {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Number of children moved.
    pub fn moves(&self) -> usize {
        match self {
            Self::Unchanged => 0,
            Self::MoveToEnd(slots) => slots.len(),
            Self::MoveToFront { slots, .. } => slots.len(),
            Self::Arrange { front, back, .. } => front.len() + back.len(),
        }
    }
}

impl<E: RenderTarget> Pool<E> {
    /// The slot the reorder is anchored on: the visible slot holding focus, else the first
    /// visible child. Resolved against the current visibility, so a slot that was just hidden
    /// is never chosen.
    pub fn reorder_anchor(&self) -> Option<SlotId> {
        let visible = self.visible_in_order();
        visible
            .iter()
            .copied()
            .find(|&id| self.slot(id).is_some_and(|s| s.target().contains_focus()))
            .or_else(|| visible.first().copied())
    }

    /// Whether the children, read cyclically, are in ascending virtual order.
    ///
    /// Recycling preserves this; growing or trimming the pool can break it.
    pub fn is_ring_ordered(&self) -> bool {
        let mut indexes = Vec::with_capacity(self.len());
        for &id in self.order() {
            match self.slot(id).and_then(|s| s.assigned_index()) {
                Some(index) => indexes.push(index),
                None => return false,
            }
        }
        let n = indexes.len();
        let descents = (0..n)
            .filter(|&i| indexes[i] > indexes[(i + 1) % n])
            .count();
        descents <= 1
    }

    /// Plans the moves that put visible children back in virtual order without moving the
    /// anchor.
    ///
    /// Normally a rotation: the anchor belongs at position `index - window_start` among the
    /// visible children, and the difference from where it is now says how many children to
    /// rotate from one end to the other. Costs `O(window)`, never a sort. When the ring itself
    /// is broken, every other child is placed around the anchor instead.
    pub fn plan_reorder(&self) -> Reorder {
        let visible = self.visible_in_order();
        let Some(anchor) = self.reorder_anchor() else {
            return Reorder::Unchanged;
        };
        let Some(anchor_index) = self.slot(anchor).and_then(|s| s.assigned_index()) else {
            return Reorder::Unchanged;
        };
        if !self.is_ring_ordered() {
            return self.plan_arrange(anchor, anchor_index);
        }
        let Some(current) = visible.iter().position(|&id| id == anchor) else {
            return Reorder::Unchanged;
        };

        let target = anchor_index as i64 - self.window_start() as i64;
        let delta = current as i64 - target;
        let len = visible.len();
        if delta.unsigned_abs() as usize >= len {
            vwarn!(
                delta,
                visible = len,
                anchor_index,
                window_start = self.window_start(),
                "plan_reorder: anchor out of window, skipping"
            );
            return Reorder::Unchanged;
        }

        if delta > 0 {
            Reorder::MoveToEnd(visible[..delta as usize].to_vec())
        } else if delta < 0 {
            let from = len - delta.unsigned_abs() as usize;
            Reorder::MoveToFront {
                slots: visible[from..].to_vec(),
                before: visible[0],
            }
        } else {
            Reorder::Unchanged
        }
    }

    fn plan_arrange(&self, anchor: SlotId, anchor_index: usize) -> Reorder {
        let mut rest: Vec<(usize, SlotId)> = self
            .order()
            .iter()
            .copied()
            .filter(|&id| id != anchor)
            .map(|id| {
                let key = self
                    .slot(id)
                    .and_then(|s| s.assigned_index())
                    .unwrap_or(usize::MAX);
                (key, id)
            })
            .collect();
        rest.sort_unstable();
        let split = rest.partition_point(|&(key, _)| key < anchor_index);
        let back = rest.split_off(split).into_iter().map(|(_, id)| id).collect();
        let front = rest.into_iter().map(|(_, id)| id).collect();
        vdebug!(anchor_index, "plan_reorder: children out of ring order, arranging");
        Reorder::Arrange {
            front,
            anchor,
            back,
        }
    }

    /// Applies `plan` to the mirrored child order. Assignments and content are untouched.
    pub fn apply_reorder(&mut self, plan: &Reorder) {
        match plan {
            Reorder::Unchanged => {}
            Reorder::MoveToEnd(slots) => {
                let order = self.order_mut();
                order.retain(|id| !slots.contains(id));
                order.extend_from_slice(slots);
            }
            Reorder::MoveToFront { slots, before } => {
                let order = self.order_mut();
                order.retain(|id| !slots.contains(id));
                let at = order.iter().position(|id| id == before).unwrap_or(0);
                order.splice(at..at, slots.iter().copied());
            }
            Reorder::Arrange {
                front,
                anchor,
                back,
            } => {
                let order = self.order_mut();
                order.retain(|id| id == anchor);
                order.splice(0..0, front.iter().copied());
                order.extend_from_slice(back);
            }
        }
        vtrace!(moves = plan.moves(), "Pool::apply_reorder");
    }
}
