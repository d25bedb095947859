//! Page Navigation - Ordered page sequence with visibility-aware stepping
//!
//! The assistant keeps its pages in a `PageSequence`. Stepping forward or
//! backward always skips hidden pages, and the state of the Back/Next
//! buttons and the progress dots is derived from the sequence alone, so
//! none of this depends on a running display.

/// What the sequence needs to know about a page
pub trait NavigationEntry {
    /// Whether the page takes part in navigation at all
    fn is_shown(&self) -> bool;

    /// Whether the user may move forward from this page
    fn is_complete(&self) -> bool;

    /// Whether the page is currently applying its settings
    fn is_applying(&self) -> bool;

    fn hides_forward(&self) -> bool {
        false
    }

    fn hides_backward(&self) -> bool {
        false
    }
}

/// Direction of a page transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Visibility and sensitivity of the Back/Next buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationButtons {
    pub back_visible: bool,
    pub back_sensitive: bool,
    pub forward_visible: bool,
    pub forward_sensitive: bool,
}

/// Ordered list of pages plus the page currently on screen
#[derive(Debug)]
pub struct PageSequence<P> {
    pages: Vec<P>,
    current: Option<usize>,
}

impl<P> Default for PageSequence<P> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            current: None,
        }
    }
}

impl<P: PartialEq + Clone + NavigationEntry> PageSequence<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.pages.iter()
    }

    pub fn position(&self, page: &P) -> Option<usize> {
        self.pages.iter().position(|p| p == page)
    }

    pub fn contains(&self, page: &P) -> bool {
        self.position(page).is_some()
    }

    /// Append a page. Returns `false` if it was already part of the sequence.
    pub fn push(&mut self, page: P) -> bool {
        if self.contains(&page) {
            return false;
        }
        self.pages.push(page);
        true
    }

    /// Unlink a page, keeping `current` pointing at the same page.
    ///
    /// Removing the current page leaves the sequence without a current page.
    pub fn remove(&mut self, page: &P) -> Option<P> {
        let index = self.position(page)?;
        let removed = self.pages.remove(index);

        self.current = match self.current {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        Some(removed)
    }

    /// Remove and return every page after `page`.
    pub fn truncate_after(&mut self, page: &P) -> Vec<P> {
        let Some(index) = self.position(page) else {
            return Vec::new();
        };

        let tail = self.pages.split_off(index + 1);
        if matches!(self.current, Some(current) if current > index) {
            self.current = None;
        }
        tail
    }

    pub fn current(&self) -> Option<&P> {
        self.current.and_then(|index| self.pages.get(index))
    }

    /// Make `page` current. Returns `true` when the current page changed.
    pub fn set_current(&mut self, page: &P) -> bool {
        match self.position(page) {
            Some(index) if self.current != Some(index) => {
                self.current = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Nearest shown page after `page`
    pub fn next_shown(&self, page: &P) -> Option<&P> {
        let index = self.position(page)?;
        self.pages[index + 1..].iter().find(|p| p.is_shown())
    }

    /// Nearest shown page before `page`
    pub fn previous_shown(&self, page: &P) -> Option<&P> {
        let index = self.position(page)?;
        self.pages[..index].iter().rev().find(|p| p.is_shown())
    }

    /// Neighbour of `page` in the given direction, skipping hidden pages
    pub fn step(&self, page: &P, direction: Direction) -> Option<&P> {
        match direction {
            Direction::Next => self.next_shown(page),
            Direction::Previous => self.previous_shown(page),
        }
    }

    pub fn first_shown(&self) -> Option<&P> {
        self.pages.iter().find(|p| p.is_shown())
    }

    /// Button state for the current page
    pub fn buttons(&self) -> NavigationButtons {
        let Some(page) = self.current() else {
            return NavigationButtons::default();
        };

        // The last visible page carries its own action widget instead.
        if self.next_shown(page).is_none() {
            return NavigationButtons::default();
        }

        NavigationButtons {
            back_visible: !page.hides_backward(),
            back_sensitive: self.previous_shown(page).is_some(),
            forward_visible: !page.hides_forward(),
            forward_sensitive: page.is_complete() && !page.is_applying(),
        }
    }

    /// One dot per shown page; `true` marks the current one
    pub fn progress(&self) -> Vec<bool> {
        let current = self.current();
        self.pages
            .iter()
            .filter(|p| p.is_shown())
            .map(|p| Some(p) == current)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Clone)]
    struct TestPage {
        name: &'static str,
        shown: Rc<Cell<bool>>,
        complete: Rc<Cell<bool>>,
        applying: Rc<Cell<bool>>,
        hide_forward: bool,
    }

    impl TestPage {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                shown: Rc::new(Cell::new(true)),
                complete: Rc::new(Cell::new(true)),
                applying: Rc::new(Cell::new(false)),
                hide_forward: false,
            }
        }

        fn hidden(name: &'static str) -> Self {
            let page = Self::new(name);
            page.shown.set(false);
            page
        }
    }

    impl PartialEq for TestPage {
        fn eq(&self, other: &Self) -> bool {
            self.name == other.name
        }
    }

    impl NavigationEntry for TestPage {
        fn is_shown(&self) -> bool {
            self.shown.get()
        }

        fn is_complete(&self) -> bool {
            self.complete.get()
        }

        fn is_applying(&self) -> bool {
            self.applying.get()
        }

        fn hides_forward(&self) -> bool {
            self.hide_forward
        }
    }

    fn sequence(pages: &[TestPage]) -> PageSequence<TestPage> {
        let mut seq = PageSequence::new();
        for page in pages {
            seq.push(page.clone());
        }
        seq
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let a = TestPage::new("a");
        let mut seq = sequence(&[a.clone()]);
        assert!(!seq.push(a));
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_next_and_previous_skip_hidden_pages() {
        let a = TestPage::new("a");
        let b = TestPage::hidden("b");
        let c = TestPage::new("c");
        let seq = sequence(&[a.clone(), b.clone(), c.clone()]);

        assert_eq!(seq.next_shown(&a), Some(&c));
        assert_eq!(seq.previous_shown(&c), Some(&a));
        assert_eq!(seq.step(&c, Direction::Previous), Some(&a));
    }

    #[test]
    fn test_walking_off_the_ends_yields_none() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let c = TestPage::hidden("c");
        let seq = sequence(&[a.clone(), b.clone(), c]);

        assert_eq!(seq.previous_shown(&a), None);
        assert_eq!(seq.next_shown(&b), None);
    }

    #[test]
    fn test_visibility_is_read_at_call_time() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let c = TestPage::new("c");
        let seq = sequence(&[a.clone(), b.clone(), c.clone()]);

        assert_eq!(seq.next_shown(&a), Some(&b));
        b.shown.set(false);
        assert_eq!(seq.next_shown(&a), Some(&c));
    }

    #[test]
    fn test_set_current_reports_changes() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let mut seq = sequence(&[a.clone(), b.clone()]);

        assert!(seq.set_current(&a));
        assert!(!seq.set_current(&a));
        assert!(seq.set_current(&b));
        assert_eq!(seq.current(), Some(&b));
        assert!(!seq.set_current(&TestPage::new("missing")));
    }

    #[test]
    fn test_remove_keeps_current_page() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let c = TestPage::new("c");
        let mut seq = sequence(&[a.clone(), b.clone(), c.clone()]);
        seq.set_current(&c);

        assert_eq!(seq.remove(&a), Some(a));
        assert_eq!(seq.current(), Some(&c));

        seq.remove(&c);
        assert_eq!(seq.current(), None);
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_truncate_after() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let c = TestPage::new("c");
        let mut seq = sequence(&[a.clone(), b.clone(), c.clone()]);
        seq.set_current(&b);

        let removed = seq.truncate_after(&b);
        assert_eq!(removed, vec![c]);
        assert_eq!(seq.current(), Some(&b));
        assert!(seq.truncate_after(&TestPage::new("missing")).is_empty());
    }

    #[test]
    fn test_truncate_after_drops_current_in_tail() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let c = TestPage::new("c");
        let mut seq = sequence(&[a.clone(), b.clone(), c.clone()]);
        seq.set_current(&c);

        let removed = seq.truncate_after(&a);
        assert_eq!(removed, vec![b, c]);
        assert_eq!(seq.current(), None);
        assert_eq!(seq.buttons(), NavigationButtons::default());
        assert_eq!(seq.progress(), vec![false]);
    }

    #[test]
    fn test_remove_before_current_shifts_index() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let c = TestPage::new("c");
        let mut seq = sequence(&[a.clone(), b.clone(), c.clone()]);
        seq.set_current(&b);

        seq.remove(&a);
        assert_eq!(seq.current(), Some(&b));
        assert_eq!(seq.next_shown(&b), Some(&c));
        assert_eq!(seq.previous_shown(&b), None);
        assert_eq!(seq.progress(), vec![true, false]);
    }

    #[test]
    fn test_buttons_without_current_page() {
        let seq = sequence(&[TestPage::new("a")]);
        assert_eq!(seq.buttons(), NavigationButtons::default());
    }

    #[test]
    fn test_buttons_on_first_page() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let mut seq = sequence(&[a.clone(), b]);
        seq.set_current(&a);

        let buttons = seq.buttons();
        assert!(buttons.back_visible);
        assert!(!buttons.back_sensitive);
        assert!(buttons.forward_visible);
        assert!(buttons.forward_sensitive);
    }

    #[test]
    fn test_buttons_follow_completion_and_applying() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let c = TestPage::new("c");
        let mut seq = sequence(&[a, b.clone(), c]);
        seq.set_current(&b);

        assert!(seq.buttons().back_sensitive);

        b.complete.set(false);
        assert!(!seq.buttons().forward_sensitive);

        b.complete.set(true);
        b.applying.set(true);
        assert!(!seq.buttons().forward_sensitive);
    }

    #[test]
    fn test_buttons_hidden_on_last_visible_page() {
        let a = TestPage::new("a");
        let b = TestPage::new("b");
        let c = TestPage::hidden("c");
        let mut seq = sequence(&[a, b.clone(), c]);
        seq.set_current(&b);

        let buttons = seq.buttons();
        assert!(!buttons.back_visible);
        assert!(!buttons.forward_visible);
    }

    #[test]
    fn test_page_can_hide_forward_button() {
        let mut a = TestPage::new("a");
        a.hide_forward = true;
        let b = TestPage::new("b");
        let mut seq = sequence(&[a.clone(), b]);
        seq.set_current(&a);

        let buttons = seq.buttons();
        assert!(!buttons.forward_visible);
        assert!(buttons.back_visible);
    }

    #[test]
    fn test_progress_counts_only_shown_pages() {
        let a = TestPage::new("a");
        let b = TestPage::hidden("b");
        let c = TestPage::new("c");
        let mut seq = sequence(&[a, b, c.clone()]);
        seq.set_current(&c);

        assert_eq!(seq.progress(), vec![false, true]);
    }
}
