use std::cmp::Ordering;
use std::fmt;
use std::slice::Iter;

use itertools::Itertools;

/// Constructs a [`VecSet`] from a list of elements, similar to `vec![]`.
#[macro_export]
macro_rules! vecset {
    () => {
        $crate::VecSet::new()
    };
    ($($x:expr),+ $(,)?) => {{
        let mut __set = $crate::VecSet::new();
        $( let _ = __set.insert($x); )*
        __set
    }};
}

///
/// A set that is internally represented by a sorted vector. Mostly useful for
/// a compact representation of sets that are not changed often, and since the
/// representation is canonical two sets with the same elements are equal and
/// hash to the same value.
///
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VecSet<T> {
    /// The internal storage with the invariant that the array is sorted and
    /// contains no duplicates.
    sorted_array: Vec<T>,
}

impl<T: Ord> VecSet<T> {
    pub fn new() -> Self {
        Self {
            sorted_array: Vec::new(),
        }
    }

    /// Returns a new set only containing the given element.
    pub fn singleton(element: T) -> Self {
        Self {
            sorted_array: vec![element],
        }
    }

    /// Returns true iff the set is empty.
    pub fn is_empty(&self) -> bool {
        self.sorted_array.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.sorted_array.len()
    }

    /// Returns true iff the given element is in the set.
    pub fn contains(&self, element: &T) -> bool {
        self.sorted_array.binary_search(element).is_ok()
    }

    /// Inserts the given element into the set, returns true iff the element was
    /// inserted.
    pub fn insert(&mut self, element: T) -> bool {
        // Finds the location where to insert the element to keep the array sorted.
        if let Err(position) = self.sorted_array.binary_search(&element) {
            self.sorted_array.insert(position, element);
            return true;
        }

        false
    }

    /// Returns an iterator over the elements in the set, they are yielded in sorted order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.sorted_array.iter()
    }

    /// Returns the first element of the set, which is also the smallest.
    pub fn first(&self) -> Option<&T> {
        self.sorted_array.first()
    }

    /// Returns true iff the sets share no element, runs in linear time.
    pub fn is_disjoint(&self, other: &VecSet<T>) -> bool {
        let mut left = self.sorted_array.iter().peekable();
        let mut right = other.sorted_array.iter().peekable();

        while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
            match a.cmp(b) {
                Ordering::Less => {
                    left.next();
                }
                Ordering::Greater => {
                    right.next();
                }
                Ordering::Equal => return false,
            }
        }

        true
    }

    /// Returns true iff every element of this set is also in the other set.
    pub fn is_subset(&self, other: &VecSet<T>) -> bool {
        self.sorted_array.iter().all(|element| other.contains(element))
    }
}

impl<T: Ord + Clone> VecSet<T> {
    /// Returns the union of both sets.
    pub fn union(&self, other: &VecSet<T>) -> VecSet<T> {
        Self {
            sorted_array: self
                .sorted_array
                .iter()
                .merge(other.sorted_array.iter())
                .dedup()
                .cloned()
                .collect(),
        }
    }
}

impl<T: Ord> Default for VecSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for VecSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sorted_array: Vec<T> = iter.into_iter().collect();
        sorted_array.sort_unstable();
        sorted_array.dedup();

        Self { sorted_array }
    }
}

impl<'a, T> IntoIterator for &'a VecSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.sorted_array.iter()
    }
}

impl<T> IntoIterator for VecSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.sorted_array.into_iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for VecSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:?}}}", self.sorted_array.iter().format(", "))
    }
}
