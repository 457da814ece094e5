//! Carrier populations for coverage experiments.

use rand::seq::SliceRandom;
use rand::Rng;

use saturation_core::Error as ModelError;

use crate::error::Result;

/// Number of carriers in a population of `population` members at
/// frequency `p`: `⌊p·POP⌋`, clamped to `[0, POP]`.
pub fn carrier_count(population: usize, p: f64) -> usize {
    ((p * population as f64).floor().max(0.0) as usize).min(population)
}

/// A population in which each member either carries the theme or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierPopulation {
    carriers: Vec<bool>,
    carrier_count: usize,
}

impl CarrierPopulation {
    /// Flag `⌊p·POP⌋` members chosen uniformly without replacement as carriers.
    ///
    /// The carriers are the first `k` entries of a partially shuffled index
    /// list.
    ///
    /// # Errors
    ///
    /// Fails on an empty population or `p ∉ [0, 1]`.
    pub fn build<R: Rng + ?Sized>(population: usize, p: f64, rng: &mut R) -> Result<Self> {
        if population == 0 {
            return Err(ModelError::InvalidInput {
                parameter: "POP",
                reason: "must be at least 1",
            }
            .into());
        }
        if !(0.0..=1.0).contains(&p) {
            return Err(ModelError::InvalidInput {
                parameter: "p",
                reason: "must be in [0, 1]",
            }
            .into());
        }

        let k = carrier_count(population, p);
        let mut indices: Vec<usize> = (0..population).collect();
        let (chosen, _) = indices.partial_shuffle(rng, k);

        let mut carriers = vec![false; population];
        for &i in chosen.iter() {
            carriers[i] = true;
        }
        Ok(Self {
            carriers,
            carrier_count: k,
        })
    }

    /// Population with the given carrier flags.
    pub fn from_flags(carriers: Vec<bool>) -> Self {
        let carrier_count = carriers.iter().filter(|&&c| c).count();
        Self {
            carriers,
            carrier_count,
        }
    }

    /// Population size.
    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    /// Whether the population has no members.
    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    /// Number of carriers.
    pub fn carrier_count(&self) -> usize {
        self.carrier_count
    }

    /// Whether member `index` carries the theme.
    #[inline]
    pub fn is_carrier(&self, index: usize) -> bool {
        self.carriers[index]
    }

    /// Whether at least `occurrences` carriers appear among the first `n`
    /// draws of `order`. Stops reading `order` as soon as the answer is known.
    pub fn hits_within<I>(&self, order: I, n: u64, occurrences: u64) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        if occurrences == 0 {
            return true;
        }
        let mut hits = 0;
        for member in order.into_iter().take(clamp_draws(n, self.len())) {
            if self.carriers[member] {
                hits += 1;
                if hits >= occurrences {
                    return true;
                }
            }
        }
        false
    }

    /// Number of draws of `order` needed to reach `occurrences` carriers,
    /// looking at no more than `n_max` draws.
    pub fn first_success_draw<I>(&self, order: I, occurrences: u64, n_max: u64) -> Option<u64>
    where
        I: IntoIterator<Item = usize>,
    {
        if occurrences == 0 {
            return Some(0);
        }
        let mut hits = 0;
        for (draw, member) in order.into_iter().take(clamp_draws(n_max, self.len())).enumerate() {
            if self.carriers[member] {
                hits += 1;
                if hits >= occurrences {
                    return Some(draw as u64 + 1);
                }
            }
        }
        None
    }
}

#[inline]
fn clamp_draws(n: u64, population: usize) -> usize {
    usize::try_from(n).map_or(population, |n| n.min(population))
}

/// A draw order generated lazily, one Fisher–Yates step per draw.
///
/// Draw `i` swaps a uniformly chosen not-yet-drawn member into position `i`.
/// The first `n` draws therefore consume the same random numbers whatever
/// number of draws the caller ends up reading, and reading stops cost nothing
/// beyond the draws made.
#[derive(Debug)]
pub struct LazyDraws<'r, R: ?Sized> {
    members: Vec<usize>,
    next: usize,
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> LazyDraws<'r, R> {
    /// Lazy uniform order over `population` members.
    pub fn new(population: usize, rng: &'r mut R) -> Self {
        Self {
            members: (0..population).collect(),
            next: 0,
            rng,
        }
    }
}

impl<R: Rng + ?Sized> Iterator for LazyDraws<'_, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let len = self.members.len();
        if self.next >= len {
            return None;
        }
        let j = self.rng.random_range(self.next..len);
        self.members.swap(self.next, j);
        let member = self.members[self.next];
        self.next += 1;
        Some(member)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.members.len() - self.next;
        (remaining, Some(remaining))
    }
}
