//! Value generators behind `$init` and `$print`
//!
//! [`SliceRange`] follows half-open slice semantics: `a:b:s` yields
//! `a, a+s, a+2s, ...` while the value is below `b` (above `b` for a negative
//! step). [`ValueSpec::emit`] streams the words one `$init` item writes, in
//! order, so a huge item is never collected into a buffer.

use crate::interpreter::errors::RuntimeError;
use crate::memory::Word;
use crate::parser::ast::{SliceRange, ValueSource, ValueSpec};
use rand::{Rng, RngCore};

impl SliceRange {
    /// Number of values in the range
    pub fn len(&self) -> u64 {
        let (start, stop, step) = (self.start as i128, self.stop as i128, self.step as i128);
        let count = if step > 0 {
            (stop - start + step - 1).div_euclid(step)
        } else {
            (start - stop - step - 1).div_euclid(-step)
        };
        count.max(0) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th value; `i` must be below [`len`](Self::len)
    fn nth_value(&self, i: u64) -> Word {
        (self.start as i128 + i as i128 * self.step as i128) as Word
    }

    /// Whether `value` is one of the values of the range
    pub fn contains(&self, value: Word) -> bool {
        let (start, stop, step) = (self.start as i128, self.stop as i128, self.step as i128);
        let value = value as i128;
        if step > 0 {
            start <= value && value < stop && (value - start) % step == 0
        } else {
            stop < value && value <= start && (start - value) % -step == 0
        }
    }

    /// Iterate the values in order
    pub fn values(&self) -> impl Iterator<Item = Word> {
        let range = *self;
        (0..self.len()).map(move |i| range.nth_value(i))
    }

    /// Draw one value uniformly from the range
    pub fn draw(&self, rng: &mut dyn RngCore) -> Result<Word, RuntimeError> {
        self.check_drawable()?;
        Ok(self.nth_value(rng.gen_range(0..self.len())))
    }

    fn check_drawable(&self) -> Result<(), RuntimeError> {
        if self.is_empty() {
            return Err(RuntimeError::EmptyRange {
                range: self.to_string(),
            });
        }
        Ok(())
    }
}

impl ValueSpec {
    /// Number of words this item writes
    pub fn len(&self) -> u128 {
        let per_repeat = match self.source {
            ValueSource::Range(range) => range.len() as u128,
            _ => 1,
        };
        per_repeat * self.repeat as u128
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail now if [`emit`](Self::emit) would fail on a draw
    pub fn validate(&self) -> Result<(), RuntimeError> {
        match self.source {
            ValueSource::Random(range) if self.repeat > 0 => range.check_drawable(),
            ValueSource::FixedRandom(range) => range.check_drawable(),
            _ => Ok(()),
        }
    }

    /// Hand each word this item writes to `sink`, in order
    ///
    /// A range repeated `n` times is walked end to end `n` times. A random
    /// value is drawn per slot; a fixed random value is drawn once per call
    /// and repeated.
    pub fn emit(
        &self,
        rng: &mut dyn RngCore,
        mut sink: impl FnMut(Word),
    ) -> Result<(), RuntimeError> {
        match self.source {
            ValueSource::Literal(n) => std::iter::repeat(n).take(self.repeat).for_each(sink),
            ValueSource::Range(range) => {
                for _ in 0..self.repeat {
                    range.values().for_each(&mut sink);
                }
            }
            ValueSource::Random(range) => {
                for _ in 0..self.repeat {
                    sink(range.draw(rng)?);
                }
            }
            ValueSource::FixedRandom(range) => {
                let value = range.draw(rng)?;
                std::iter::repeat(value).take(self.repeat).for_each(sink);
            }
        }
        Ok(())
    }
}

/// Total number of words an `$init` directive writes, checking every draw
/// can succeed before anything is written
pub fn init_len(specs: &[ValueSpec]) -> Result<u128, RuntimeError> {
    let mut total: u128 = 0;
    for spec in specs {
        spec.validate()?;
        total = total
            .checked_add(spec.len())
            .ok_or_else(|| RuntimeError::IntegerOverflow {
                operation: "$init length".to_string(),
            })?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn range(start: Word, stop: Word, step: Word) -> SliceRange {
        SliceRange { start, stop, step }
    }

    fn spec(source: ValueSource, repeat: usize) -> ValueSpec {
        ValueSpec { source, repeat }
    }

    #[test]
    fn test_range_values() {
        assert_eq!(range(1, 4, 1).values().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(range(0, 10, 3).values().collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        assert_eq!(range(10, 0, -4).values().collect::<Vec<_>>(), vec![10, 6, 2]);
        assert!(range(5, 5, 1).is_empty());
        assert!(range(5, 1, 1).is_empty());
        assert!(range(1, 5, -1).is_empty());
    }

    #[test]
    fn test_range_contains() {
        assert!(range(0, 10, 3).contains(9));
        assert!(!range(0, 10, 3).contains(10));
        assert!(!range(0, 10, 3).contains(4));
        assert!(range(10, 0, -4).contains(2));
        assert!(!range(10, 0, -4).contains(0));
        assert!(!range(10, 0, -4).contains(12));
    }

    #[test]
    fn test_range_len_extremes() {
        assert_eq!(range(i64::MIN, i64::MAX, 1).len(), u64::MAX);
        assert_eq!(range(i64::MAX, i64::MIN, i64::MIN).len(), 2);
    }

    fn collect(spec: &ValueSpec, rng: &mut StdRng) -> Result<Vec<Word>, RuntimeError> {
        let mut out = Vec::new();
        spec.emit(rng, |value| out.push(value))?;
        Ok(out)
    }

    #[test]
    fn test_literal_and_range_repeat() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            collect(&spec(ValueSource::Literal(9), 3), &mut rng).unwrap(),
            vec![9, 9, 9]
        );
        assert_eq!(
            collect(&spec(ValueSource::Range(range(1, 3, 1)), 2), &mut rng).unwrap(),
            vec![1, 2, 1, 2]
        );
        assert!(collect(&spec(ValueSource::Literal(9), 0), &mut rng)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_random_draws_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = collect(&spec(ValueSource::Random(range(0, 20, 5)), 50), &mut rng).unwrap();
        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|v| [0, 5, 10, 15].contains(v)));
    }

    #[test]
    fn test_fixed_random_repeats_one_draw() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = collect(
            &spec(ValueSource::FixedRandom(range(0, 1000, 1)), 10),
            &mut rng,
        )
        .unwrap();
        assert_eq!(values.len(), 10);
        assert!(values.iter().all(|&v| v == values[0]));
    }

    #[test]
    fn test_empty_random_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let random = spec(ValueSource::Random(range(3, 3, 1)), 1);
        assert!(matches!(random.validate(), Err(RuntimeError::EmptyRange { .. })));
        let err = collect(&random, &mut rng).unwrap_err();
        assert!(matches!(err, RuntimeError::EmptyRange { .. }));
        // nothing is drawn for zero repeats
        assert!(spec(ValueSource::Random(range(3, 3, 1)), 0).validate().is_ok());
    }

    #[test]
    fn test_spec_len_without_expanding() {
        assert_eq!(spec(ValueSource::Literal(7), usize::MAX).len(), usize::MAX as u128);
        assert_eq!(
            spec(ValueSource::Range(range(0, i64::MAX, 1)), 3).len(),
            3 * i64::MAX as u128
        );
        assert_eq!(spec(ValueSource::Range(range(5, 2, -1)), 2).len(), 6);
    }

    #[test]
    fn test_init_len_sums_items() {
        let specs = [
            spec(ValueSource::Literal(-1), 2),
            spec(ValueSource::Range(range(5, 2, -1)), 1),
        ];
        assert_eq!(init_len(&specs).unwrap(), 5);

        let bad = [
            spec(ValueSource::Literal(-1), 2),
            spec(ValueSource::FixedRandom(range(0, 0, 1)), 2),
        ];
        assert!(matches!(init_len(&bad), Err(RuntimeError::EmptyRange { .. })));
    }
}
