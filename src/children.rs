use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::Bounds;

pub(crate) type ChildId = usize;

/// An item attached to the container, with the metadata the engine keeps for it.
#[derive(Clone, Debug)]
pub(crate) struct Child<I> {
    pub(crate) item: I,
    pub(crate) position: usize,
    pub(crate) full_span: bool,
    pub(crate) span: usize,
    pub(crate) bounds: Bounds,
    /// Provider reported the item as pending removal when it was attached.
    pub(crate) pending_removal: bool,
    /// Removed from the data set since it was attached; never reused from scrap.
    pub(crate) removed: bool,
    /// Content changed since it was attached; re-obtained on the next pass.
    pub(crate) stale: bool,
}

/// Attached items in container order.
///
/// Spans refer to children by [`ChildId`], which stays stable while the child is attached.
#[derive(Clone, Debug)]
pub(crate) struct ChildList<I> {
    slots: Vec<Option<Child<I>>>,
    free: Vec<ChildId>,
    order: VecDeque<ChildId>,
}

impl<I> Default for ChildList<I> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: VecDeque::new(),
        }
    }
}

impl<I> ChildList<I> {
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn insert(&mut self, child: Child<I>, at_head: bool) -> ChildId {
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(child);
                id
            }
            None => {
                self.slots.push(Some(child));
                self.slots.len() - 1
            }
        };
        if at_head {
            self.order.push_front(id);
        } else {
            self.order.push_back(id);
        }
        id
    }

    pub(crate) fn get(&self, id: ChildId) -> &Child<I> {
        match self.slots.get(id) {
            Some(Some(child)) => child,
            _ => unreachable!("child id {id} is not attached"),
        }
    }

    pub(crate) fn get_mut(&mut self, id: ChildId) -> &mut Child<I> {
        match self.slots.get_mut(id) {
            Some(Some(child)) => child,
            _ => unreachable!("child id {id} is not attached"),
        }
    }

    pub(crate) fn first_id(&self) -> Option<ChildId> {
        self.order.front().copied()
    }

    pub(crate) fn last_id(&self) -> Option<ChildId> {
        self.order.back().copied()
    }

    pub(crate) fn first(&self) -> Option<&Child<I>> {
        self.first_id().map(|id| self.get(id))
    }

    pub(crate) fn last(&self) -> Option<&Child<I>> {
        self.last_id().map(|id| self.get(id))
    }

    fn release(&mut self, id: ChildId) -> Option<Child<I>> {
        let child = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        Some(child)
    }

    pub(crate) fn pop_front(&mut self) -> Option<Child<I>> {
        let id = self.order.pop_front()?;
        self.release(id)
    }

    pub(crate) fn pop_back(&mut self) -> Option<Child<I>> {
        let id = self.order.pop_back()?;
        self.release(id)
    }

    /// Detaches every child, in container order.
    pub(crate) fn drain(&mut self) -> Vec<Child<I>> {
        let mut out = Vec::with_capacity(self.order.len());
        while let Some(child) = self.pop_front() {
            out.push(child);
        }
        self.slots.clear();
        self.free.clear();
        out
    }

    pub(crate) fn ids(&self) -> impl DoubleEndedIterator<Item = ChildId> + '_ {
        self.order.iter().copied()
    }

    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = &Child<I>> + '_ {
        self.order.iter().map(|&id| self.get(id))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Child<I>> + '_ {
        self.slots.iter_mut().flatten()
    }

    /// Finds an attached, not removed child at an adapter position.
    pub(crate) fn find_by_position(&self, position: usize) -> Option<ChildId> {
        self.ids().find(|&id| {
            let child = self.get(id);
            !child.removed && child.position == position
        })
    }
}
