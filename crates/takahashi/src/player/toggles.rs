/// Which pieces of presentation chrome are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayToggles {
    pub progress: bool,
    pub counter: bool,
    pub timer: bool,
    pub percentage: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            progress: true,
            counter: true,
            timer: true,
            percentage: true,
        }
    }
}

impl DisplayToggles {
    pub fn toggle_progress(&mut self) -> bool {
        self.progress = !self.progress;
        self.progress
    }

    pub fn toggle_counter(&mut self) -> bool {
        self.counter = !self.counter;
        self.counter
    }

    pub fn toggle_timer(&mut self) -> bool {
        self.timer = !self.timer;
        self.timer
    }

    pub fn toggle_percentage(&mut self) -> bool {
        self.percentage = !self.percentage;
        self.percentage
    }

    /// Set all four to the opposite of the progress bar's current value.
    pub fn toggle_all(&mut self) -> bool {
        let visible = !self.progress;
        self.progress = visible;
        self.counter = visible;
        self.timer = visible;
        self.percentage = visible;
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_visible_by_default() {
        let t = DisplayToggles::default();
        assert!(t.progress && t.counter && t.timer && t.percentage);
    }

    #[test]
    fn test_toggle_all_round_trip() {
        let mut t = DisplayToggles::default();
        assert!(!t.toggle_all());
        assert_eq!(
            t,
            DisplayToggles {
                progress: false,
                counter: false,
                timer: false,
                percentage: false,
            }
        );
        assert!(t.toggle_all());
        assert_eq!(t, DisplayToggles::default());
    }

    #[test]
    fn test_toggles_are_independent() {
        let mut t = DisplayToggles::default();
        assert!(!t.toggle_counter());
        assert!(t.progress && t.timer && t.percentage);
        assert!(!t.toggle_timer());
        assert!(!t.toggle_percentage());
        assert!(t.progress);
    }

    #[test]
    fn test_toggle_all_keys_off_progress_bar() {
        // Only the progress bar is hidden, so toggle-all shows everything
        let mut t = DisplayToggles::default();
        t.toggle_progress();
        assert!(t.toggle_all());
        assert_eq!(t, DisplayToggles::default());

        // Only the counter is hidden, so toggle-all hides everything
        let mut t = DisplayToggles::default();
        t.toggle_counter();
        assert!(!t.toggle_all());
        assert!(!t.counter && !t.progress);
    }
}
