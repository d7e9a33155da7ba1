use std::{fmt, sync::OnceLock};

use itertools::Itertools;
use num_integer::Integer;

/// A bijection on `[0, degree)`.
///
/// The image mapping is the primary representation; the cycle decomposition
/// is computed at most once on demand.
#[derive(Clone)]
pub struct Permutation {
    mapping: Vec<usize>,
    cycles: OnceLock<Vec<Vec<usize>>>,
}

impl Permutation {
    /// Create a permutation from mapping notation: index `i` permutes to
    /// `mapping[i]`.
    ///
    /// # Panics
    ///
    /// Panics if the mapping is not a bijection on `[0, mapping.len())`.
    #[must_use]
    pub fn from_mapping(mapping: Vec<usize>) -> Permutation {
        assert!(mapping.iter().all(|&image| image < mapping.len()));
        assert!(mapping.iter().all_unique());

        Permutation {
            mapping,
            cycles: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn identity(degree: usize) -> Permutation {
        Permutation {
            mapping: (0..degree).collect(),
            cycles: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.mapping.len()
    }

    #[must_use]
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    #[must_use]
    pub fn image(&self, index: usize) -> usize {
        self.mapping[index]
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.mapping.iter().enumerate().all(|(i, &image)| i == image)
    }

    /// Compose another permutation into this one, applying `other` after
    /// `self`.
    ///
    /// # Panics
    ///
    /// Panics if the degrees differ.
    pub fn compose_into(&mut self, other: &Permutation) {
        assert_eq!(self.degree(), other.degree());
        for image in &mut self.mapping {
            *image = other.mapping[*image];
        }
        self.cycles = OnceLock::new();
    }

    /// The `exponent`-th power of this permutation.
    #[must_use]
    pub fn pow(&self, exponent: u32) -> Permutation {
        let mut result = Permutation::identity(self.degree());
        for _ in 0..exponent {
            result.compose_into(self);
        }
        result
    }

    /// The permutation undoing this one.
    #[must_use]
    pub fn inverse(&self) -> Permutation {
        let mut mapping = vec![0; self.mapping.len()];
        for (index, &image) in self.mapping.iter().enumerate() {
            mapping[image] = index;
        }
        Permutation {
            mapping,
            cycles: OnceLock::new(),
        }
    }

    /// The cycle decomposition, omitting fixed points.
    pub fn cycles(&self) -> &[Vec<usize>] {
        self.cycles.get_or_init(|| {
            let mut covered = vec![false; self.mapping.len()];
            let mut cycles = Vec::new();

            for start in 0..self.mapping.len() {
                if covered[start] {
                    continue;
                }
                covered[start] = true;
                let mut cycle = vec![start];
                let mut next = self.mapping[start];
                while next != start {
                    covered[next] = true;
                    cycle.push(next);
                    next = self.mapping[next];
                }
                if cycle.len() > 1 {
                    cycles.push(cycle);
                }
            }

            cycles
        })
    }

    /// The multiset of cycle lengths, sorted. Invariant under relabeling of
    /// the underlying points.
    #[must_use]
    pub fn cycle_type(&self) -> Vec<usize> {
        self.cycles()
            .iter()
            .map(Vec::len)
            .sorted_unstable()
            .collect()
    }

    /// The order of the permutation in the symmetric group.
    #[must_use]
    pub fn order(&self) -> u64 {
        self.cycles()
            .iter()
            .fold(1, |acc, cycle| acc.lcm(&(cycle.len() as u64)))
    }

    /// The 1-indexed image list, `[π(0)+1,π(1)+1,…]`, a one-line literal in
    /// the transformation syntax of external algebra systems.
    #[must_use]
    pub fn transformation_string(&self) -> String {
        format!(
            "[{}]",
            self.mapping.iter().map(|image| image + 1).join(",")
        )
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.mapping == other.mapping
    }
}

impl Eq for Permutation {}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycles = self.cycles();
        if cycles.is_empty() {
            return f.write_str("Id");
        }
        for cycle in cycles {
            f.write_str("(")?;
            for (i, item) in cycle.iter().enumerate() {
                write!(f, "{}{item}", if i == 0 { "" } else { ", " })?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
