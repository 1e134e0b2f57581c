//! Selection among interchangeable phrases.

use rand::Rng;

/// Chooses one of `len` equivalent phrases.
///
/// `len` is always at least 1 and the returned index must be below it.
pub trait PhrasePicker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl PhrasePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Always picks the same index (clamped to the set size).
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl PhrasePicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_picker_in_range() {
        for _ in 0..100 {
            assert!(RandomPicker.pick(4) < 4);
        }
        assert_eq!(RandomPicker.pick(1), 0);
    }

    #[test]
    fn test_fixed_picker_clamps() {
        assert_eq!(FixedPicker(2).pick(4), 2);
        assert_eq!(FixedPicker(9).pick(4), 3);
    }
}
