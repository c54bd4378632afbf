//! This module contains utility functionality needed for this crate. Most
//! prominently, it contains the definition of the [DigitSet] used for storing
//! candidate digits in the solver.

use std::ops::{BitOr, BitOrAssign, Sub, SubAssign};

use crate::BOARD_SIZE;

/// The lowest digit a [DigitSet] can contain.
pub const MIN_DIGIT: usize = 1;

/// The highest digit a [DigitSet] can contain. Equal to the board size.
pub const MAX_DIGIT: usize = BOARD_SIZE;

const ALL_MASK: u16 = ((1 << MAX_DIGIT) - 1) << MIN_DIGIT;

/// A set of Sudoku digits (1 to 9) implemented as a bit mask. Since the range
/// of elements is fixed and small, the set is `Copy`, which keeps solver
/// snapshots plain array copies, and generally performs better than a
/// `HashSet`.
///
/// Inserting or removing a value outside of `[1, 9]` is a precondition
/// violation and panics. [DigitSet::contains] tolerates any input and returns
/// `false` for out-of-range values.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct DigitSet {
    mask: u16
}

fn digit_mask(digit: usize) -> u16 {
    assert!(digit >= MIN_DIGIT && digit <= MAX_DIGIT,
        "digit {} out of range [{}, {}]", digit, MIN_DIGIT, MAX_DIGIT);
    1u16 << digit
}

impl DigitSet {

    /// Creates a new, empty `DigitSet`.
    pub fn new() -> DigitSet {
        DigitSet {
            mask: 0
        }
    }

    /// Creates a new `DigitSet` containing every digit from 1 to 9.
    pub fn all() -> DigitSet {
        DigitSet {
            mask: ALL_MASK
        }
    }

    /// Creates a new `DigitSet` containing only the given digit, which must
    /// be in the range `[1, 9]`.
    pub fn singleton(digit: usize) -> DigitSet {
        DigitSet {
            mask: digit_mask(digit)
        }
    }

    /// Indicates whether this set contains the given digit. Out-of-range
    /// inputs yield `false`.
    pub fn contains(&self, digit: usize) -> bool {
        if digit < MIN_DIGIT || digit > MAX_DIGIT {
            false
        }
        else {
            self.mask & (1u16 << digit) != 0
        }
    }

    /// Inserts the given digit into this set, such that [DigitSet::contains]
    /// returns `true` for it afterwards. Returns `true` if the set changed,
    /// i.e. the digit was not present before.
    pub fn insert(&mut self, digit: usize) -> bool {
        let mask = digit_mask(digit);
        let changed = self.mask & mask == 0;
        self.mask |= mask;
        changed
    }

    /// Removes the given digit from this set, such that [DigitSet::contains]
    /// returns `false` for it afterwards. Returns `true` if the set changed,
    /// i.e. the digit was present before.
    pub fn remove(&mut self, digit: usize) -> bool {
        let mask = digit_mask(digit);
        let changed = self.mask & mask != 0;
        self.mask &= !mask;
        changed
    }

    /// Removes all digits from this set.
    pub fn clear(&mut self) {
        self.mask = 0;
    }

    /// Returns the number of digits contained in this set.
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Indicates whether this set contains no digits.
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Returns an iterator over the digits in this set in ascending order.
    pub fn iter(&self) -> DigitSetIter {
        DigitSetIter {
            mask: self.mask
        }
    }

    /// Adds all digits of `other` to this set. Returns `true` if this set
    /// changed as a result.
    ///
    /// `DigitSet` implements [BitOrAssign] as syntactic sugar for this
    /// operation.
    pub fn union_assign(&mut self, other: DigitSet) -> bool {
        let before = self.mask;
        self.mask |= other.mask;
        before != self.mask
    }

    /// Removes all digits of `other` from this set. Returns `true` if this
    /// set changed as a result.
    ///
    /// `DigitSet` implements [SubAssign] as syntactic sugar for this
    /// operation.
    pub fn difference_assign(&mut self, other: DigitSet) -> bool {
        let before = self.mask;
        self.mask &= !other.mask;
        before != self.mask
    }
}

/// An iterator over the digits contained in a [DigitSet], in ascending order.
pub struct DigitSetIter {
    mask: u16
}

impl Iterator for DigitSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.mask == 0 {
            None
        }
        else {
            let digit = self.mask.trailing_zeros() as usize;
            self.mask &= self.mask - 1;
            Some(digit)
        }
    }
}

impl IntoIterator for DigitSet {
    type Item = usize;
    type IntoIter = DigitSetIter;

    fn into_iter(self) -> DigitSetIter {
        self.iter()
    }
}

impl BitOr for DigitSet {
    type Output = DigitSet;

    fn bitor(mut self, rhs: DigitSet) -> DigitSet {
        self.union_assign(rhs);
        self
    }
}

impl BitOrAssign for DigitSet {
    fn bitor_assign(&mut self, rhs: DigitSet) {
        self.union_assign(rhs);
    }
}

impl Sub for DigitSet {
    type Output = DigitSet;

    fn sub(mut self, rhs: DigitSet) -> DigitSet {
        self.difference_assign(rhs);
        self
    }
}

impl SubAssign for DigitSet {
    fn sub_assign(&mut self, rhs: DigitSet) {
        self.difference_assign(rhs);
    }
}

/// Creates a new [DigitSet] that contains the listed digits. An example usage
/// of this macro looks as follows:
///
/// ```
/// use sudoku_engine::digits;
///
/// let set = digits!(2, 4);
/// assert!(set.contains(2));
/// assert!(!set.contains(3));
/// ```
#[macro_export]
macro_rules! digits {
    ($($digit:expr),* $(,)?) => {
        {
            let mut set = $crate::util::DigitSet::new();
            $(set.insert($digit);)*
            set
        }
    };
}

/// Determines whether the given iterator yields at least two equal digits.
/// All yielded values must lie within `[1, 9]`.
pub(crate) fn contains_duplicate(mut iter: impl Iterator<Item = usize>)
        -> bool {
    let mut seen = DigitSet::new();
    iter.any(|digit| !seen.insert(digit))
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn new_set_is_empty() {
        let set = DigitSet::new();
        assert!(set.is_empty());
        assert!(!set.contains(1));
        assert!(!set.contains(5));
        assert!(!set.contains(9));
        assert_eq!(0, set.len());
    }

    #[test]
    fn all_set_is_full() {
        let set = DigitSet::all();
        assert!(!set.is_empty());
        assert!(set.contains(1));
        assert!(set.contains(5));
        assert!(set.contains(9));
        assert_eq!(9, set.len());
    }

    #[test]
    fn singleton_set_contains_only_given_digit() {
        let set = DigitSet::singleton(3);
        assert!(!set.is_empty());
        assert!(!set.contains(1));
        assert!(set.contains(3));
        assert!(!set.contains(9));
        assert_eq!(1, set.len());
    }

    #[test]
    fn contains_tolerates_out_of_range() {
        let set = DigitSet::all();
        assert!(!set.contains(0));
        assert!(!set.contains(10));
    }

    #[test]
    #[should_panic]
    fn insert_panics_on_out_of_range() {
        let mut set = DigitSet::new();
        set.insert(10);
    }

    #[test]
    fn manipulation() {
        let mut set = DigitSet::new();
        set.insert(2);
        set.insert(4);
        set.insert(6);

        assert!(set.contains(2));
        assert!(set.contains(4));
        assert!(set.contains(6));
        assert_eq!(3, set.len());

        set.remove(4);

        assert!(set.contains(2));
        assert!(!set.contains(4));
        assert!(set.contains(6));
        assert_eq!(2, set.len());

        set.clear();

        assert!(set.is_empty());
        assert!(!set.contains(2));
        assert_eq!(0, set.len());
    }

    #[test]
    fn double_insert() {
        let mut set = DigitSet::new();
        assert!(set.insert(3));
        assert!(set.insert(4));
        assert!(!set.insert(3));

        assert!(set.contains(3));
        assert_eq!(2, set.len());
    }

    #[test]
    fn double_remove() {
        let mut set = DigitSet::all();
        assert!(set.remove(3));
        assert!(set.remove(5));
        assert!(!set.remove(3));

        assert!(!set.contains(3));
        assert_eq!(7, set.len());
    }

    #[test]
    fn iteration_is_ascending() {
        let set = digits!(7, 1, 4, 9);
        let collected: Vec<usize> = set.iter().collect();
        assert_eq!(vec![1, 4, 7, 9], collected);
    }

    #[test]
    fn union() {
        let result = digits!(2, 4) | digits!(3, 4);
        assert_eq!(digits!(2, 3, 4), result);
    }

    #[test]
    fn difference() {
        let result = digits!(2, 4) - digits!(3, 4);
        assert_eq!(digits!(2), result);
    }

    #[test]
    fn union_assign_reports_change() {
        let mut set = digits!(2, 4);
        assert!(set.union_assign(digits!(3)));
        assert!(!set.union_assign(digits!(2, 3)));
    }

    #[test]
    fn contains_duplicate_false() {
        let values = vec![1, 5, 2, 4, 3];
        assert!(!contains_duplicate(values.into_iter()));
    }

    #[test]
    fn contains_duplicate_true() {
        let values = vec![1, 5, 2, 4, 5];
        assert!(contains_duplicate(values.into_iter()));
    }
}
