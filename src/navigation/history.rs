use std::cell::RefCell;

use crate::navigation::{Location, Navigator};

#[derive(Debug)]
struct Entries {
    stack: Vec<Location>,
    index: usize,
}

/// In-memory browser history with back/forward traversal.
///
/// Pushing truncates any forward entries, as a browser does.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: RefCell<Entries>,
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: RefCell::new(Entries {
                stack: vec![initial],
                index: 0,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().stack.is_empty()
    }

    /// Steps back one entry; returns false at the oldest entry.
    pub fn back(&self) -> bool {
        let mut entries = self.entries.borrow_mut();
        if entries.index == 0 {
            return false;
        }
        entries.index -= 1;
        true
    }

    /// Steps forward one entry; returns false at the newest entry.
    pub fn forward(&self) -> bool {
        let mut entries = self.entries.borrow_mut();
        if entries.index + 1 >= entries.stack.len() {
            return false;
        }
        entries.index += 1;
        true
    }
}

impl Navigator for MemoryHistory {
    fn location(&self) -> Location {
        let entries = self.entries.borrow();
        entries.stack[entries.index].clone()
    }

    fn push(&self, path: &str, query: &str) {
        let mut entries = self.entries.borrow_mut();
        let next = entries.index + 1;
        entries.stack.truncate(next);
        entries.stack.push(Location::new(path, query));
        entries.index = next;
    }
}
