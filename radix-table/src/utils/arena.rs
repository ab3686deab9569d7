use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Stable handle to a value stored in an [`Arena`]. Handles are never invalidated by other
/// allocations, only by freeing the value they point at (after which the slot may be reused).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn for_tests(idx: usize) -> Self {
        Self(idx)
    }
}

/// A paged store of owned values addressed by [`SlotId`], with holes being re-used.
///
/// Values are written into fixed-capacity pages that are never reallocated, so a value does not
/// move for as long as it lives. Freed slots go on a free list and are handed out again before a
/// new page is requested. A poor man's slab, really, sized for payloads that must outlive any
/// rehash of the structure indexing them.
pub struct Arena<V> {
    pages: Vec<Vec<Option<V>>>,
    page_size: usize,
    free_list: Vec<usize>,
    size: usize,
}

impl<V> Arena<V> {
    pub fn new(page_size: usize) -> Self {
        debug_assert!(page_size > 0, "arena pages must hold at least one slot");
        Self {
            pages: vec![],
            page_size,
            free_list: Vec::with_capacity(16),
            size: 0,
        }
    }

    /// Store `value` and return its handle. Only fails when a new page is needed and cannot be
    /// allocated, in which case the arena is unchanged.
    pub fn alloc(&mut self, value: V) -> Result<SlotId> {
        if let Some(idx) = self.free_list.pop() {
            let (page, offset) = self.locate(idx);
            debug_assert!(self.pages[page][offset].is_none());
            self.pages[page][offset] = Some(value);
            self.size += 1;
            return Ok(SlotId(idx));
        }

        let page_full = self
            .pages
            .last()
            .is_none_or(|page| page.len() == self.page_size);
        if page_full {
            self.pages
                .try_reserve(1)
                .map_err(|e| Error::alloc("arena page table entries", 1, e))?;
            let mut page = Vec::new();
            page.try_reserve_exact(self.page_size)
                .map_err(|e| Error::alloc("arena slots", self.page_size, e))?;
            self.pages.push(page);
        }

        let page_idx = self.pages.len() - 1;
        let page = &mut self.pages[page_idx];
        let idx = page_idx * self.page_size + page.len();
        page.push(Some(value));
        self.size += 1;
        Ok(SlotId(idx))
    }

    /// Release the slot and hand back its value.
    ///
    /// # Panics
    ///
    /// If the slot is not currently allocated.
    pub fn free(&mut self, id: SlotId) -> V {
        let (page, offset) = self.locate(id.0);
        let value = self
            .pages
            .get_mut(page)
            .and_then(|p| p.get_mut(offset))
            .and_then(Option::take);
        let Some(value) = value else {
            panic!("arena slot {} freed while not allocated", id.0);
        };
        self.free_list.push(id.0);
        self.size -= 1;
        value
    }

    pub fn get(&self, id: SlotId) -> Option<&V> {
        let (page, offset) = self.locate(id.0);
        self.pages.get(page)?.get(offset)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut V> {
        let (page, offset) = self.locate(id.0);
        self.pages.get_mut(page)?.get_mut(offset)?.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn num_free(&self) -> usize {
        self.free_list.len()
    }

    /// Drop every value and release all pages.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.free_list.clear();
        self.size = 0;
    }

    #[inline]
    fn locate(&self, idx: usize) -> (usize, usize) {
        (idx / self.page_size, idx % self.page_size)
    }
}

impl<V> Index<SlotId> for Arena<V> {
    type Output = V;

    fn index(&self, id: SlotId) -> &Self::Output {
        match self.get(id) {
            Some(v) => v,
            None => panic!("arena slot {} is not allocated", id.0),
        }
    }
}

impl<V> IndexMut<SlotId> for Arena<V> {
    fn index_mut(&mut self, id: SlotId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(v) => v,
            None => panic!("arena slot {} is not allocated", id.0),
        }
    }
}
