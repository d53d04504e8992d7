use crate::constants::SWIPE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Advance,
    Retreat,
}

/// Tracks one horizontal press/release pair.
#[derive(Debug, Default)]
pub struct Swipe {
    start_x: Option<f32>,
}

impl Swipe {
    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    pub fn end(&mut self, x: f32) -> Option<Gesture> {
        let start = self.start_x.take()?;
        classify(x - start)
    }
}

/// `delta` is end minus start. Left-to-right goes back, right-to-left goes forward.
pub fn classify(delta: f32) -> Option<Gesture> {
    if delta > SWIPE_THRESHOLD {
        Some(Gesture::Retreat)
    } else if -delta > SWIPE_THRESHOLD {
        Some(Gesture::Advance)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(40.0), Some(Gesture::Retreat));
        assert_eq!(classify(-40.0), Some(Gesture::Advance));
        assert_eq!(classify(20.0), None);
        assert_eq!(classify(-20.0), None);
        assert_eq!(classify(30.0), None);
    }

    #[test]
    fn test_swipe_pair() {
        let mut swipe = Swipe::default();
        swipe.begin(100.0);
        assert_eq!(swipe.end(60.0), Some(Gesture::Advance));
        // Release without a press is ignored.
        assert_eq!(swipe.end(10.0), None);
        swipe.begin(10.0);
        assert_eq!(swipe.end(50.0), Some(Gesture::Retreat));
    }
}
