use core::fmt;
use std::cmp::Ordering;

/// Identifies an entry pushed into a [`Heap`].
///
/// Handles are not reused until the heap is cleared, even after the entry is popped or
/// cancelled, so a stale handle can never cancel someone else's entry. Handles from before a
/// [`Heap::clear`] must be dropped with it.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct Handle(usize);

/// A min-heap, with a custom comparator, whose entries can be cancelled by handle.
pub struct Heap<T, F> {
    data: Vec<(Handle, T)>,
    /// The position in `data` of each handle, or `None` once it left the heap.
    positions: Vec<Option<usize>>,
    cmp: F,
}
impl<T, F: Fn(&T, &T) -> Ordering> Heap<T, F> {
    pub fn new(cmp: F) -> Self {
        Heap {
            data: Vec::new(),
            positions: Vec::new(),
            cmp,
        }
    }

    pub fn push(&mut self, value: T) -> Handle {
        let handle = Handle(self.positions.len());
        self.positions.push(Some(self.data.len()));
        self.data.push((handle, value));
        self.sift_up(self.data.len() - 1);
        handle
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.remove_at(0))
    }

    pub fn peek(&self) -> Option<&T> {
        self.data.first().map(|(_, v)| v)
    }

    /// Remove the entry of `handle`, if it is still in the heap.
    pub fn cancel(&mut self, handle: Handle) -> Option<T> {
        let index = self.positions.get(handle.0).copied().flatten()?;
        Some(self.remove_at(index))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remove every entry, and start handing out handles from scratch.
    pub fn clear(&mut self) {
        self.data.clear();
        self.positions.clear();
    }

    /// The live entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.data.iter().map(|(h, v)| (*h, v))
    }

    fn remove_at(&mut self, index: usize) -> T {
        assert!(index < self.data.len());
        let last = self.data.len() - 1;
        self.swap(index, last);

        let Some((handle, ret)) = self.data.pop() else {
            unreachable!();
        };
        self.positions[handle.0] = None;

        if index < self.data.len() {
            let i = self.sift_up(index);
            self.sift_down(i);
        }
        ret
    }

    fn less(&self, i: usize, j: usize) -> bool {
        (self.cmp)(&self.data[i].1, &self.data[j].1) == Ordering::Less
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.data.swap(i, j);
        self.positions[self.data[i].0 .0] = Some(i);
        self.positions[self.data[j].0 .0] = Some(j);
    }

    /// Returns the final position of the entry.
    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let p = (i - 1) / 2;
            if self.less(i, p) {
                self.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        while 2 * i + 1 < self.data.len() {
            let l = 2 * i + 1;
            let r = 2 * i + 2;
            let mut j = l;
            if r < self.data.len() && self.less(r, l) {
                j = r;
            }
            if self.less(j, i) {
                self.swap(i, j);
                i = j;
            } else {
                break;
            }
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Heap<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.data.iter().map(|(_, v)| v))
            .finish()
    }
}
