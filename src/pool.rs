//! Fixed-size round-robin pool.
//!
//! A [`Pool`] builds all of its items up front and hands them out cyclically.
//! There is no acquire/release: an item handed out by [`Pool::next`] is simply
//! handed out again `len()` calls later, whatever the caller did with it.
//! Typical contents are pre-spawned effect entities or cloned audio handles.

use log::debug;

/// Round-robin collection of pre-built items.
///
/// Invariant: `items` is never empty and `cursor < items.len()`.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Pool<T> {
    /// Build `n` items by calling `generator` exactly `n` times.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`; a pool must hold at least one item.
    pub fn new(n: usize, mut generator: impl FnMut() -> T) -> Self {
        assert!(n > 0, "Pool::new requires at least one item");
        let items: Vec<T> = (0..n).map(|_| generator()).collect();
        debug!("Pool created with {} items", n);
        Self { items, cursor: 0 }
    }

    /// Wrap already-built items. Iteration starts at the first one.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    pub fn from_items(items: Vec<T>) -> Self {
        assert!(!items.is_empty(), "Pool::from_items requires at least one item");
        debug!("Pool wrapped {} items", items.len());
        Self { items, cursor: 0 }
    }

    /// Return the item under the cursor and advance the cursor by one,
    /// wrapping to the start after the last item.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &mut T {
        let i = self.cursor;
        self.cursor = (i + 1) % self.items.len();
        &mut self.items[i]
    }

    /// Index of the item the next call to [`Pool::next`] returns.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// All items in pool order, regardless of the cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Mutable access to all items, e.g. to resync every pooled audio handle.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Pool<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
