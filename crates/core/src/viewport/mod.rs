/// Boundary crossing reported by [`ViewportTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Entered,
}

/// Fires each time a watched element moves from outside to inside the
/// viewport. Leaving re-arms the trigger for the next entry.
#[derive(Debug, Clone)]
pub struct ViewportTrigger {
    threshold: f32,
    inside: bool,
    crossings: u32,
}

impl ViewportTrigger {
    /// `threshold` is the visible ratio above which the element counts as
    /// inside; zero means any visible pixel.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            inside: false,
            crossings: 0,
        }
    }

    pub fn observe(&mut self, visible_ratio: f32) -> Option<Crossing> {
        let inside = if self.threshold > 0.0 {
            visible_ratio >= self.threshold
        } else {
            visible_ratio > 0.0
        };
        let entered = inside && !self.inside;
        self.inside = inside;

        if entered {
            self.crossings += 1;
            Some(Crossing::Entered)
        } else {
            None
        }
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn crossings(&self) -> u32 {
        self.crossings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_every_entry() {
        let mut trigger = ViewportTrigger::new(0.0);
        assert_eq!(trigger.observe(0.0), None);
        assert_eq!(trigger.observe(0.2), Some(Crossing::Entered));
        assert_eq!(trigger.observe(0.8), None);
        assert_eq!(trigger.observe(0.0), None);
        assert_eq!(trigger.observe(1.0), Some(Crossing::Entered));
        assert_eq!(trigger.crossings(), 2);
    }

    #[test]
    fn respects_threshold() {
        let mut trigger = ViewportTrigger::new(0.5);
        assert_eq!(trigger.observe(0.4), None);
        assert!(!trigger.is_inside());
        assert_eq!(trigger.observe(0.5), Some(Crossing::Entered));
    }
}
