//! Bucket sizing for the node arena.

/// Controls how large each newly appended arena bucket is.
///
/// A tree's nodes live in a chain of fixed-size buckets that is only ever appended to, so
/// existing nodes never move. When more room is needed, the next bucket doubles the total
/// capacity, clamped by an optional linear cap, and is never smaller than the request or
/// [`minimum_bucket`](GrowthPolicy::minimum_bucket).
///
/// # Examples
///
/// ```
/// use sealed_rbtree::GrowthPolicy;
///
/// let policy = GrowthPolicy::new().with_minimum_bucket(4).with_linear_cap(64);
///
/// // Empty arena: the first bucket is the minimum.
/// assert_eq!(policy.next_bucket_size(0, 1), 4);
/// // Doubling: a 32 slot arena grows by another 32.
/// assert_eq!(policy.next_bucket_size(32, 1), 32);
/// // Linear cap: a 1000 slot arena grows by 64, not 1000.
/// assert_eq!(policy.next_bucket_size(1000, 1), 64);
/// // A large request always wins.
/// assert_eq!(policy.next_bucket_size(1000, 500), 500);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct GrowthPolicy {
    minimum_bucket: usize,
    linear_cap: Option<usize>,
}

impl GrowthPolicy {
    /// Smallest bucket the default policy allocates.
    pub const DEFAULT_MINIMUM_BUCKET: usize = 16;

    /// Doubling growth with [`DEFAULT_MINIMUM_BUCKET`](Self::DEFAULT_MINIMUM_BUCKET) and no cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            minimum_bucket: Self::DEFAULT_MINIMUM_BUCKET,
            linear_cap: None,
        }
    }

    /// Returns a copy of this policy with a different minimum bucket size.
    ///
    /// # Panics
    ///
    /// Panics if `minimum_bucket` is zero.
    #[must_use]
    pub const fn with_minimum_bucket(self, minimum_bucket: usize) -> Self {
        assert!(minimum_bucket > 0, "`GrowthPolicy::with_minimum_bucket()` - `minimum_bucket` must be > 0!");
        Self {
            minimum_bucket,
            ..self
        }
    }

    /// Returns a copy of this policy that never grows by more than `cap` slots at once, unless a
    /// single reservation asks for more.
    ///
    /// # Panics
    ///
    /// Panics if `cap` is zero.
    #[must_use]
    pub const fn with_linear_cap(self, cap: usize) -> Self {
        assert!(cap > 0, "`GrowthPolicy::with_linear_cap()` - `cap` must be > 0!");
        Self {
            linear_cap: Some(cap),
            ..self
        }
    }

    /// The smallest bucket this policy allocates.
    #[must_use]
    pub const fn minimum_bucket(&self) -> usize {
        self.minimum_bucket
    }

    /// The linear growth cap, if any.
    #[must_use]
    pub const fn linear_cap(&self) -> Option<usize> {
        self.linear_cap
    }

    /// Size of the next bucket for an arena currently holding `current_capacity` slots that
    /// needs at least `needed` more.
    #[must_use]
    pub fn next_bucket_size(&self, current_capacity: usize, needed: usize) -> usize {
        let doubled = current_capacity.max(self.minimum_bucket);
        let grown = match self.linear_cap {
            Some(cap) => doubled.min(cap.max(self.minimum_bucket)),
            None => doubled,
        };
        grown.max(needed)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new()
    }
}
