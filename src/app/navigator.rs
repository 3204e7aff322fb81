//! Per-tab navigation stacks

use crate::messages::AppTab;
use crate::screens::Screen;

/// One stack of screens per bottom tab. A stack never drops below its root.
#[derive(Debug)]
pub struct Navigator {
    active: AppTab,
    stacks: [Vec<Screen>; 3],
}

impl Navigator {
    pub fn new(home: Screen, search: Screen, profile: Screen) -> Self {
        Navigator {
            active: AppTab::Home,
            stacks: [vec![home], vec![search], vec![profile]],
        }
    }

    pub fn active(&self) -> AppTab {
        self.active
    }

    pub fn switch(&mut self, tab: AppTab) {
        self.active = tab;
    }

    fn stack(&self) -> &Vec<Screen> {
        &self.stacks[self.active.index()]
    }

    fn stack_mut(&mut self) -> &mut Vec<Screen> {
        &mut self.stacks[self.active.index()]
    }

    pub fn current(&self) -> &Screen {
        let stack = self.stack();
        &stack[stack.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Screen {
        let stack = self.stack_mut();
        let top = stack.len() - 1;
        &mut stack[top]
    }

    pub fn push(&mut self, screen: Screen) {
        self.stack_mut().push(screen);
    }

    /// Pop the active stack. Returns false at the tab root.
    pub fn pop(&mut self) -> bool {
        let stack = self.stack_mut();
        if stack.len() <= 1 {
            return false;
        }
        stack.pop();
        true
    }

    pub fn depth(&self) -> usize {
        self.stack().len()
    }

    /// Every screen on every stack
    pub fn screens_mut(&mut self) -> impl Iterator<Item = &mut Screen> {
        self.stacks.iter_mut().flatten()
    }

    /// The screen waiting on request `id`, wherever it is
    pub fn owner_mut(&mut self, id: u64) -> Option<&mut Screen> {
        self.screens_mut().find(|s| s.view().owns(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::{CourseDetailScreen, HomeScreen, ProfileScreen, SearchScreen};

    fn navigator() -> Navigator {
        Navigator::new(
            Screen::Home(HomeScreen::new()),
            Screen::Search(SearchScreen::new()),
            Screen::Profile(ProfileScreen::new()),
        )
    }

    #[test]
    fn test_pop_stops_at_root() {
        let mut nav = navigator();
        nav.push(Screen::Course(CourseDetailScreen::new(3)));
        assert_eq!(nav.depth(), 2);
        assert!(nav.pop());
        assert!(!nav.pop());
        assert_eq!(nav.depth(), 1);
        assert!(matches!(nav.current(), Screen::Home(_)));
    }

    #[test]
    fn test_stacks_are_per_tab() {
        let mut nav = navigator();
        nav.push(Screen::Course(CourseDetailScreen::new(3)));

        nav.switch(AppTab::Search);
        assert_eq!(nav.depth(), 1);
        assert!(matches!(nav.current(), Screen::Search(_)));

        nav.switch(AppTab::Home);
        assert_eq!(nav.depth(), 2);
        assert!(matches!(nav.current(), Screen::Course(_)));
    }

    #[test]
    fn test_screens_mut_visits_all_stacks() {
        let mut nav = navigator();
        nav.push(Screen::Course(CourseDetailScreen::new(3)));
        assert_eq!(nav.screens_mut().count(), 4);
    }
}
