//! Hardware totals - the (cores, sockets, instances) triple

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Running totals for one measurement category
///
/// Totals only ever grow. There is no subtraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Totals {
    pub cores: u64,
    pub sockets: u64,
    pub instances: u64,
}

impl Totals {
    pub fn new(cores: u64, sockets: u64, instances: u64) -> Self {
        Self {
            cores,
            sockets,
            instances,
        }
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, other: Totals) -> Totals {
        Totals {
            cores: self.cores + other.cores,
            sockets: self.sockets + other.sockets,
            instances: self.instances + other.instances,
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, other: Totals) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Self {
        iter.fold(Totals::default(), Add::add)
    }
}

impl std::fmt::Display for Totals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cores={} sockets={} instances={}",
            self.cores, self.sockets, self.instances
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elementwise_addition() {
        let mut totals = Totals::new(4, 2, 1);
        totals += Totals::new(8, 1, 1);
        assert_eq!(totals, Totals::new(12, 3, 2));
    }

    #[test]
    fn test_sum() {
        let sum: Totals = vec![Totals::new(1, 1, 1), Totals::new(2, 3, 1)]
            .into_iter()
            .sum();
        assert_eq!(sum, Totals::new(3, 4, 2));
    }
}
