//! Detects tessellation changes between frames

/// Remembers the tessellation level the icosphere was last built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellationTracker {
    current: u32,
}

impl TessellationTracker {
    pub fn new(initial: u32) -> Self {
        Self { current: initial }
    }

    /// Level the icosphere was last built with
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Record `requested` and report whether it differs from the last level
    ///
    /// Returns the new level once per change, `None` otherwise.
    pub fn update(&mut self, requested: u32) -> Option<u32> {
        if requested == self.current {
            return None;
        }
        self.current = requested;
        Some(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_level_reports_nothing() {
        let mut tracker = TessellationTracker::new(5);
        assert_eq!(tracker.update(5), None);
    }

    #[test]
    fn test_change_reported_once() {
        let mut tracker = TessellationTracker::new(5);
        assert_eq!(tracker.update(3), Some(3));
        assert_eq!(tracker.update(3), None);
        assert_eq!(tracker.current(), 3);
    }

    #[test]
    fn test_change_back_is_reported() {
        let mut tracker = TessellationTracker::new(5);
        tracker.update(6);
        assert_eq!(tracker.update(5), Some(5));
    }
}
