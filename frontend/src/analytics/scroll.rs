use std::collections::BTreeSet;

pub const SCROLL_MILESTONES: [u8; 5] = [25, 50, 75, 90, 100];

/// Percentage of the page that has been scrolled through, 0..=100.
pub fn scroll_depth_percent(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 100.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Reports each milestone at most once; moving back up never un-reports one.
#[derive(Debug, Clone, Default)]
pub struct ScrollDepthTracker {
    max_depth: f64,
    reported: BTreeSet<u8>,
}

impl ScrollDepthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(&self) -> f64 {
        self.max_depth
    }

    pub fn is_complete(&self) -> bool {
        self.reported.len() == SCROLL_MILESTONES.len()
    }

    /// Returns the milestones newly crossed by this sample, ascending.
    pub fn observe(&mut self, depth: f64) -> Vec<u8> {
        if depth <= self.max_depth {
            return Vec::new();
        }
        self.max_depth = depth;
        let mut crossed = Vec::new();
        for milestone in SCROLL_MILESTONES {
            if depth >= f64::from(milestone) && self.reported.insert(milestone) {
                crossed.push(milestone);
            }
        }
        crossed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downward_excursions_do_not_re_report() {
        let mut tracker = ScrollDepthTracker::new();
        let fired: Vec<u8> = [10.0, 30.0, 60.0, 40.0, 80.0, 100.0]
            .into_iter()
            .flat_map(|depth| tracker.observe(depth))
            .collect();
        assert_eq!(fired, vec![25, 50, 75, 90, 100]);
        assert!(tracker.is_complete());
        assert!(tracker.observe(100.0).is_empty());
    }

    #[test]
    fn max_depth_is_monotonic() {
        let mut tracker = ScrollDepthTracker::new();
        tracker.observe(55.0);
        tracker.observe(20.0);
        assert_eq!(tracker.max_depth(), 55.0);
    }

    #[test]
    fn depth_percent_handles_short_pages() {
        assert_eq!(scroll_depth_percent(0.0, 800.0, 900.0), 100.0);
        assert_eq!(scroll_depth_percent(500.0, 2000.0, 1000.0), 50.0);
        assert_eq!(scroll_depth_percent(5000.0, 2000.0, 1000.0), 100.0);
    }
}
