use alloc::collections::BTreeMap;

use crate::{AttachPoint, ItemDirection, ItemSize, MeasureConstraints};

/// Supplies, measures and takes back the items the grid lays out.
///
/// The grid never creates or destroys items itself. It asks for the item at an adapter
/// position, measures it through the provider, keeps it while it is attached and hands it back
/// through [`ItemProvider::recycle`] once it leaves the laid-out window.
pub trait ItemProvider {
    type Item;

    fn item_count(&self) -> usize;

    /// Produces the item at `position`. `direction` is the traversal order of the fill asking
    /// for it. Returning `None` ends the fill early.
    fn next_item(&mut self, position: usize, direction: ItemDirection) -> Option<Self::Item>;

    /// Whether the item occupies every span.
    fn is_full_span(&self, item: &Self::Item) -> bool;

    /// Measures the item and returns its decorated extent.
    fn measure(&mut self, item: &mut Self::Item, constraints: MeasureConstraints) -> ItemSize;

    /// Called when the item joins the container, before it is positioned.
    fn attach(&mut self, _item: &Self::Item, _at: AttachPoint) {}

    fn recycle(&mut self, item: Self::Item);

    fn has_focusable(&self, _item: &Self::Item) -> bool {
        false
    }

    /// Items that are about to disappear (removed or changed in the data set). Their extent is
    /// counted as deleted space while deciding whether a span needs more content.
    fn is_pending_removal(&self, _item: &Self::Item) -> bool {
        false
    }
}

/// Item supply for one pass: scrap from the previous pass first, then the provider.
pub(crate) struct ItemSource<'a, P: ItemProvider> {
    pub(crate) provider: &'a mut P,
    scrap: BTreeMap<usize, P::Item>,
    item_count: usize,
}

impl<'a, P: ItemProvider> ItemSource<'a, P> {
    pub(crate) fn new(provider: &'a mut P) -> Self {
        let item_count = provider.item_count();
        Self {
            provider,
            scrap: BTreeMap::new(),
            item_count,
        }
    }

    pub(crate) fn item_count(&self) -> usize {
        self.item_count
    }

    pub(crate) fn add_scrap(&mut self, position: usize, item: P::Item) {
        if let Some(previous) = self.scrap.insert(position, item) {
            self.provider.recycle(previous);
        }
    }

    pub(crate) fn obtain(&mut self, position: usize, direction: ItemDirection) -> Option<P::Item> {
        match self.scrap.remove(&position) {
            Some(item) => Some(item),
            None => self.provider.next_item(position, direction),
        }
    }

    pub(crate) fn recycle(&mut self, item: P::Item) {
        self.provider.recycle(item);
    }

    /// Returns unused scrap to the provider.
    pub(crate) fn finish(mut self) {
        let scrap = core::mem::take(&mut self.scrap);
        for (_, item) in scrap {
            self.provider.recycle(item);
        }
    }
}
