//! Collapsible navigation state.
//!
//! Two independent, purely cosmetic toggles: the desktop rail expands on
//! pointer-enter and collapses on pointer-leave; the mobile menu opens and
//! closes on tap, and closes itself when an item is selected.

/// Navigation state machine.
#[derive(Debug, Clone, Default)]
pub struct CollapsibleNav {
    expanded: bool,
    mobile_open: bool,
}

impl CollapsibleNav {
    pub fn new() -> Self {
        Self::default()
    }

    /// Desktop rail is expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Mobile menu is open.
    pub fn is_mobile_open(&self) -> bool {
        self.mobile_open
    }

    pub fn pointer_enter(&mut self) {
        self.expanded = true;
    }

    pub fn pointer_leave(&mut self) {
        self.expanded = false;
    }

    pub fn toggle_mobile(&mut self) {
        self.mobile_open = !self.mobile_open;
    }

    /// Selecting a mobile item closes the menu.
    pub fn select_mobile_item(&mut self) {
        self.mobile_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_collapsed_and_closed() {
        let nav = CollapsibleNav::new();
        assert!(!nav.is_expanded());
        assert!(!nav.is_mobile_open());
    }

    #[test]
    fn pointer_events_drive_desktop_expansion() {
        let mut nav = CollapsibleNav::new();
        nav.pointer_enter();
        assert!(nav.is_expanded());
        nav.pointer_leave();
        assert!(!nav.is_expanded());
    }

    #[test]
    fn mobile_menu_toggles_and_closes_on_selection() {
        let mut nav = CollapsibleNav::new();
        nav.toggle_mobile();
        assert!(nav.is_mobile_open());
        nav.select_mobile_item();
        assert!(!nav.is_mobile_open());
        nav.toggle_mobile();
        nav.toggle_mobile();
        assert!(!nav.is_mobile_open());
    }

    #[test]
    fn desktop_and_mobile_state_are_independent() {
        let mut nav = CollapsibleNav::new();
        nav.pointer_enter();
        nav.toggle_mobile();
        nav.pointer_leave();
        assert!(nav.is_mobile_open());
    }
}
