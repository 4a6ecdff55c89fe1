use alloc::vec::Vec;

use crate::SlotId;
use crate::key::SlotMap;

/// A reusable render target (e.g. a DOM element) owned by a [`Pool`].
///
/// Content is written by the host's update callback; the pool only controls visibility and
/// placement.
pub trait RenderTarget {
    fn set_hidden(&mut self, hidden: bool);

    /// Places the target `y` pixels below the start of the list. The cross axis is untouched.
    fn set_translate_y(&mut self, y: u64);

    /// Takes the target out of normal flow so it can be translated freely.
    fn set_absolute_position(&mut self) {}

    /// Whether the target contains the focused element.
    fn contains_focus(&self) -> bool {
        false
    }
}

/// One recycled render target and the virtual index it currently shows.
#[derive(Clone, Debug)]
pub struct PhysicalSlot<E> {
    target: E,
    hidden: bool,
    assigned: Option<usize>,
    offset: Option<u64>,
    stale: bool,
}

impl<E> PhysicalSlot<E> {
    fn new(target: E) -> Self {
        Self {
            target,
            hidden: true,
            assigned: None,
            offset: None,
            stale: true,
        }
    }

    pub fn target(&self) -> &E {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut E {
        &mut self.target
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn assigned_index(&self) -> Option<usize> {
        self.assigned
    }

    /// Last translate applied to the target, `None` if never positioned since assignment.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Whether the content no longer matches the assigned index.
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Fixed-growth pool of physical slots mapped onto virtual indexes.
///
/// Slots are created lazily and never destroyed during normal operation: when the window
/// shrinks they are hidden, not freed. [`Pool::trim`] is the explicit way to give memory back.
///
/// The pool also mirrors the child order of the host container (`order`), which is what the
/// reorder pass repairs.
#[derive(Clone, Debug)]
pub struct Pool<E> {
    slots: Vec<PhysicalSlot<E>>,
    order: Vec<SlotId>,
    by_index: SlotMap,
    size: usize,
    start: usize,
}

impl<E> Default for Pool<E> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            by_index: SlotMap::new(),
            size: 0,
            start: 0,
        }
    }
}

impl<E> Pool<E> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<E: RenderTarget> Pool<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The logical size slots are validated against.
    pub fn size(&self) -> usize {
        self.size
    }

    /// First virtual index covered by the pool after the last [`Pool::recycle`].
    pub fn window_start(&self) -> usize {
        self.start
    }

    pub fn slot(&self, id: SlotId) -> Option<&PhysicalSlot<E>> {
        self.slots.get(id.0)
    }

    pub fn target_mut(&mut self, id: SlotId) -> Option<&mut E> {
        self.slots.get_mut(id.0).map(|s| &mut s.target)
    }

    /// Slot handles in container child order.
    pub fn order(&self) -> &[SlotId] {
        &self.order
    }

    pub fn slot_for_index(&self, index: usize) -> Option<SlotId> {
        self.by_index.get(&index).copied()
    }

    /// Iterates `(slot, assigned index)` for every assigned slot, in handle order.
    pub fn assignments(&self) -> impl Iterator<Item = (SlotId, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.assigned.map(|v| (SlotId(i), v)))
    }

    /// Non-hidden slots in container child order.
    pub fn visible_in_order(&self) -> Vec<SlotId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| self.is_visible(id))
            .collect()
    }

    pub(crate) fn is_visible(&self, id: SlotId) -> bool {
        let slot = &self.slots[id.0];
        !slot.hidden && slot.assigned.is_some_and(|v| v < self.size)
    }

    /// Grows the pool to at least `n` slots using `create(missing)`.
    ///
    /// New slots are absolute-positioned, hidden, unassigned, and appended after the existing
    /// children. Returns their handles so the owner can attach and observe them. A no-op when
    /// the pool already has `n` slots.
    pub fn ensure_capacity(
        &mut self,
        n: usize,
        create: impl FnOnce(usize) -> Vec<E>,
    ) -> Vec<SlotId> {
        let len = self.slots.len();
        if n <= len {
            return Vec::new();
        }
        let missing = n - len;
        let created = create(missing);
        if created.len() != missing {
            vwarn!(
                requested = missing,
                created = created.len(),
                "Pool::ensure_capacity: factory returned an unexpected number of targets"
            );
        }
        let mut ids = Vec::with_capacity(created.len());
        for mut target in created {
            target.set_absolute_position();
            target.set_hidden(true);
            let id = SlotId(self.slots.len());
            self.slots.push(PhysicalSlot::new(target));
            self.order.push(id);
            ids.push(id);
        }
        vdebug!(from = len, to = self.slots.len(), "Pool::ensure_capacity");
        ids
    }

    /// Changes the logical size, hiding every slot whose index falls outside it.
    pub fn set_size(&mut self, size: usize) {
        self.size = size;
        for slot in &mut self.slots {
            let hidden = slot.assigned.is_none_or(|v| v >= size);
            set_hidden(slot, hidden);
        }
    }

    /// Binds `id` to `index`.
    ///
    /// Unhides the slot unless `index >= size`, in which case it is hidden and its content left
    /// alone. Any other slot holding `index` is released first. Idempotent.
    pub fn assign(&mut self, id: SlotId, index: usize) {
        if id.0 >= self.slots.len() {
            return;
        }
        if self.slots[id.0].assigned != Some(index) {
            if let Some(other) = self.by_index.get(&index).copied() {
                if other != id {
                    self.release(other);
                }
            }
            let slot = &mut self.slots[id.0];
            if let Some(prev) = slot.assigned.take() {
                if self.by_index.get(&prev) == Some(&id) {
                    self.by_index.remove(&prev);
                }
            }
            slot.assigned = Some(index);
            slot.stale = true;
            slot.offset = None;
            self.by_index.insert(index, id);
        }
        let hidden = index >= self.size;
        set_hidden(&mut self.slots[id.0], hidden);
    }

    /// Hides `id` and clears its assignment. Content is left as is. Idempotent.
    pub fn release(&mut self, id: SlotId) {
        let Some(slot) = self.slots.get_mut(id.0) else {
            return;
        };
        if let Some(prev) = slot.assigned.take() {
            if self.by_index.get(&prev) == Some(&id) {
                self.by_index.remove(&prev);
            }
        }
        slot.offset = None;
        set_hidden(slot, true);
    }

    /// Points the pool at the indexes `[start, start + len)`.
    ///
    /// The start is pulled back so a full pool never runs past the end of the list. Slots that
    /// already show an index in range keep it; the rest are handed the uncovered indexes in
    /// ascending order, walking the children cyclically from just after the slot holding the
    /// highest kept index. That keeps the child order a rotation of the virtual order.
    ///
    /// Returns the slots whose assignment changed.
    pub fn recycle(&mut self, start: usize) -> Vec<SlotId> {
        let len = self.slots.len();
        let start = start.min(self.size.saturating_sub(len));
        self.start = start;
        if len == 0 {
            return Vec::new();
        }

        let mut covered = alloc::vec![false; len];
        let mut free = Vec::new();
        let mut highest_kept: Option<usize> = None;
        let mut pivot = 0usize;
        for (pos, id) in self.order.iter().enumerate() {
            match self.slots[id.0].assigned {
                Some(v) if v >= start && v - start < len && !covered[v - start] => {
                    covered[v - start] = true;
                    if highest_kept.is_none_or(|h| v > h) {
                        highest_kept = Some(v);
                        pivot = (pos + 1) % len;
                    }
                }
                _ => free.push(pos),
            }
        }
        free.sort_by_key(|&pos| (pos + len - pivot) % len);

        let free: Vec<SlotId> = free.into_iter().map(|pos| self.order[pos]).collect();
        let missing = (0..len).filter(|&k| !covered[k]).map(|k| start + k);
        let mut changed = Vec::with_capacity(free.len());
        for (id, index) in free.into_iter().zip(missing) {
            self.assign(id, index);
            changed.push(id);
        }
        vtrace!(start, len, reassigned = changed.len(), "Pool::recycle");
        changed
    }

    /// Marks the slot showing `index` for re-render.
    pub fn invalidate(&mut self, index: usize) {
        if let Some(id) = self.slot_for_index(index) {
            self.slots[id.0].stale = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        for slot in &mut self.slots {
            slot.stale = true;
        }
    }

    pub(crate) fn mark_fresh(&mut self, id: SlotId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.stale = false;
        }
    }

    /// Translates a visible slot to `y`. Returns `false` when hidden or already there.
    pub fn position(&mut self, id: SlotId, y: u64) -> bool {
        let Some(slot) = self.slots.get_mut(id.0) else {
            return false;
        };
        if slot.hidden || slot.offset == Some(y) {
            return false;
        }
        slot.offset = Some(y);
        slot.target.set_translate_y(y);
        true
    }

    /// Drops slots until at most `len` remain, highest handles first.
    ///
    /// Returns the removed targets so the owner can detach them.
    pub fn trim(&mut self, len: usize) -> Vec<E> {
        if len >= self.slots.len() {
            return Vec::new();
        }
        let removed: Vec<PhysicalSlot<E>> = self.slots.drain(len..).collect();
        self.order.retain(|id| id.0 < len);
        self.by_index.retain(|_, id| id.0 < len);
        vdebug!(kept = len, removed = removed.len(), "Pool::trim");
        removed.into_iter().map(|s| s.target).collect()
    }

    /// Removes every slot, returning the targets in child order.
    pub fn drain(&mut self) -> Vec<E> {
        let order = core::mem::take(&mut self.order);
        self.by_index.clear();
        let mut slots: Vec<Option<PhysicalSlot<E>>> =
            core::mem::take(&mut self.slots).into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|id| slots.get_mut(id.0).and_then(Option::take))
            .map(|s| s.target)
            .collect()
    }

    pub(crate) fn order_mut(&mut self) -> &mut Vec<SlotId> {
        &mut self.order
    }
}

fn set_hidden<E: RenderTarget>(slot: &mut PhysicalSlot<E>, hidden: bool) {
    if slot.hidden == hidden {
        return;
    }
    slot.hidden = hidden;
    if hidden {
        slot.offset = None;
    }
    slot.target.set_hidden(hidden);
}
