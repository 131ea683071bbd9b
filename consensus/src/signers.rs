//! Signer record: which committee members contributed to an aggregated
//! BLS signature, and how many times.
//!
//! Two bits per validator:
//!
//! ```text
//! 00 → no signature from the validator
//! 01 → 1 signature
//! 10 → 2 signatures
//! 11 → look up the count in `coefficients`
//!
//! index          0  1  2  3  4  5
//! bits           00 11 10 01 00 11
//! coefficients      17          170
//! signatures     0  17 2  1  0  170
//! ```
//!
//! A record moves through three states and never goes back:
//!
//! - **decoded**: fresh off the wire, only `bits`/`coefficients` are set;
//! - **validated**: [`Signers::validate`] accepted the layout for a
//!   committee size;
//! - **power-assigned**: [`Signers::assign_power`] attached the per-index
//!   voting power from the committee.
//!
//! Records built locally with [`Signers::new`] start power-assigned with zero
//! power.
//!
//! Calling an operation in the wrong state is a programming error and panics.
//! Untrusted input can only ever reach [`Signers::validate`], which reports
//! problems as [`SignersError`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tandem_types::{Committee, CommitteeMember, VotingPower, MAX_COMMITTEE_SIZE};

use crate::bitmap::{ValidatorBitmap, SENTINEL};
use crate::SignersError;

/// Smallest count that is stored in the coefficient list.
const MIN_COEFFICIENT: usize = SENTINEL as usize;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Signers {
    bits: ValidatorBitmap,
    coefficients: Vec<u16>,

    #[serde(skip)]
    committee_size: usize,
    #[serde(skip)]
    length: usize,
    #[serde(skip)]
    powers: BTreeMap<usize, VotingPower>,
    #[serde(skip)]
    power: VotingPower,
    #[serde(skip)]
    validated: bool,
    #[serde(skip)]
    power_assigned: bool,
}

impl Signers {
    /// Empty record for a locally built aggregate.
    ///
    /// # Panics
    ///
    /// Panics if `committee_size` exceeds [`MAX_COMMITTEE_SIZE`].
    pub fn new(committee_size: usize) -> Self {
        assert!(
            committee_size <= MAX_COMMITTEE_SIZE,
            "unsupported committee size {committee_size}"
        );
        Self {
            bits: ValidatorBitmap::new(committee_size),
            coefficients: Vec::new(),
            committee_size,
            length: 0,
            powers: BTreeMap::new(),
            power: 0,
            validated: true,
            power_assigned: true,
        }
    }

    /// Record in the decoded state, as if it had just come off the wire.
    pub fn from_parts(bits: ValidatorBitmap, coefficients: Vec<u16>) -> Self {
        Self {
            bits,
            coefficients,
            ..Self::default()
        }
    }

    pub fn bits(&self) -> &ValidatorBitmap {
        &self.bits
    }

    pub fn coefficients(&self) -> &[u16] {
        &self.coefficients
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn is_power_assigned(&self) -> bool {
        self.power_assigned
    }

    /// Check the record's layout against `committee_size` and return the
    /// number of distinct signers.
    pub fn validate(&mut self, committee_size: usize) -> Result<usize, SignersError> {
        if self.validated && self.committee_size != committee_size {
            return Err(SignersError::CommitteeSizeMismatch);
        }
        if committee_size > MAX_COMMITTEE_SIZE
            || !self.bits.valid(committee_size)
            || !self.bits.padding_is_clear(committee_size)
            || self.coefficients.len() > committee_size
        {
            return Err(SignersError::Oversized);
        }

        let mut count_non_zero = 0usize;
        let mut count_long = 0usize;
        let mut sum = 0usize;
        for i in 0..committee_size {
            let value = self.bits.get(i);
            if value > 0 {
                count_non_zero += 1;
            }
            if value == SENTINEL {
                count_long += 1;
            }
            sum += value as usize;
        }

        if sum == 0 {
            return Err(SignersError::Empty);
        }
        if self.coefficients.len() != count_long {
            return Err(SignersError::WrongCoefficientLen);
        }
        // A lone signer must have signed exactly once.
        if count_non_zero == 1 && sum != 1 {
            return Err(SignersError::InvalidSingleSig);
        }
        if self
            .coefficients
            .iter()
            .any(|&c| (c as usize) < MIN_COEFFICIENT || c as usize > committee_size)
        {
            return Err(SignersError::InvalidCoefficient);
        }

        self.committee_size = committee_size;
        self.length = count_non_zero;
        self.validated = true;
        Ok(count_non_zero)
    }

    /// Attach voting power for every present index from `committee`.
    pub fn assign_power(&mut self, committee: &Committee) -> Result<(), SignersError> {
        if !self.validated {
            return Err(SignersError::NotValidated);
        }
        if committee.len() != self.committee_size {
            return Err(SignersError::CommitteeSizeMismatch);
        }
        self.powers = committee.powers_of(self.present_indices());
        self.power = self.powers.values().sum();
        self.power_assigned = true;
        Ok(())
    }

    /// Validate against `committee` and assign power in one step.
    pub fn prepare(&mut self, committee: &Committee) -> Result<usize, SignersError> {
        let length = self.validate(committee.len())?;
        self.assign_power(committee)?;
        Ok(length)
    }

    /// Record one more signature from `member`.
    ///
    /// # Panics
    ///
    /// Panics if the record is not power-assigned, if `member` is outside the
    /// committee, or if the member's count would exceed the committee size.
    pub fn increment(&mut self, member: &CommitteeMember) {
        self.assert_power_assigned();
        assert!(
            member.index < self.committee_size,
            "trying to increment signer information of non-existent committee member {}",
            member.index
        );
        let index = member.index;
        self.add_signatures(index, 1, |s| s.coefficient_position(index));
        if let Entry::Vacant(e) = self.powers.entry(index) {
            e.insert(member.voting_power);
            self.power += member.voting_power;
        }
    }

    /// Fold `other` into `self`, adding its per-index signature counts.
    ///
    /// Voting power of an index already present in `self` is not added again.
    ///
    /// # Panics
    ///
    /// Panics if a resulting count would exceed the committee size; callers
    /// check [`Signers::respects_boundaries`] first.
    pub fn merge(&mut self, other: &Signers) -> Result<(), SignersError> {
        safety_check(self, other)?;
        if !self.power_assigned || !other.power_assigned {
            return Err(SignersError::PowerNotAssigned);
        }

        // Sentinels seen so far in `self`, i.e. the coefficient position of
        // the current index.
        let mut mine = 0;
        for (i, count) in other.counts().enumerate() {
            if count > 0 {
                self.add_signatures(i, count, |_| mine);
                if let Entry::Vacant(e) = self.powers.entry(i) {
                    let p = other.powers[&i];
                    e.insert(p);
                    self.power += p;
                }
            }
            if self.bits.get(i) == SENTINEL {
                mine += 1;
            }
        }
        Ok(())
    }

    /// Whether merging `other` keeps every per-index count within the
    /// committee size.
    ///
    /// # Panics
    ///
    /// Panics if either record is not validated or the committee sizes differ.
    pub fn respects_boundaries(&self, other: &Signers) -> bool {
        assert_safe(self, other);
        let (mut mine, mut theirs) = (self.counts(), other.counts());
        (0..self.committee_size).all(|_| {
            let a = mine.next().unwrap_or(0);
            let b = theirs.next().unwrap_or(0);
            a + b <= self.committee_size
        })
    }

    /// Whether `other` has a signer that `self` lacks.
    ///
    /// # Panics
    ///
    /// Panics if either record is not validated or the committee sizes differ.
    pub fn adds_information(&self, other: &Signers) -> bool {
        assert_safe(self, other);
        (0..self.committee_size).any(|i| self.bits.get(i) == 0 && other.bits.get(i) != 0)
    }

    /// Whether the two signer sets are disjoint single signatures, so the
    /// union never touches the coefficient list.
    ///
    /// # Panics
    ///
    /// Panics if either record is not validated or the committee sizes differ.
    pub fn can_merge_simple(&self, other: &Signers) -> bool {
        assert_safe(self, other);
        (0..self.committee_size).all(|i| self.bits.get(i) + other.bits.get(i) <= 1)
    }

    /// Signer indices, each repeated once per signature instance.
    ///
    /// e.g. counters `[0 1 2 1 0]` flatten to `[1 2 2 3]`: index 2's key has
    /// to be aggregated twice.
    ///
    /// # Panics
    ///
    /// Panics if the record is not validated.
    pub fn flatten(&self) -> Vec<usize> {
        self.assert_validated();
        let mut indexes = Vec::new();
        for (i, count) in self.counts().enumerate() {
            indexes.extend(std::iter::repeat(i).take(count));
        }
        indexes
    }

    /// Signer indices, each once.
    ///
    /// # Panics
    ///
    /// Panics if the record is not validated.
    pub fn flatten_uniq(&self) -> Vec<usize> {
        self.assert_validated();
        self.present_indices().collect()
    }

    /// Whether `index` contributed to the aggregate.
    ///
    /// # Panics
    ///
    /// Panics if the record is not validated.
    pub fn contains(&self, index: usize) -> bool {
        self.assert_validated();
        index < self.committee_size && self.bits.get(index) > 0
    }

    /// Aggregated power of all signers.
    ///
    /// # Panics
    ///
    /// Panics if power has not been assigned.
    pub fn power(&self) -> VotingPower {
        self.assert_power_assigned();
        self.power
    }

    /// # Panics
    ///
    /// Panics if power has not been assigned.
    pub fn powers(&self) -> &BTreeMap<usize, VotingPower> {
        self.assert_power_assigned();
        &self.powers
    }

    /// Number of distinct signers.
    ///
    /// # Panics
    ///
    /// Panics if power has not been assigned.
    pub fn len(&self) -> usize {
        self.assert_power_assigned();
        self.length
    }

    /// # Panics
    ///
    /// Panics if power has not been assigned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Panics
    ///
    /// Panics if power has not been assigned.
    pub fn committee_size(&self) -> usize {
        self.assert_power_assigned();
        self.committee_size
    }

    /// Whether any signer appears more than once.
    ///
    /// # Panics
    ///
    /// Panics if power has not been assigned.
    pub fn is_complex(&self) -> bool {
        self.assert_power_assigned();
        (0..self.committee_size).any(|i| self.bits.get(i) > 1)
    }

    /// Per-index signature counts, resolving sentinels through the
    /// coefficient list.
    fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        let mut cursor = 0;
        (0..self.committee_size).map(move |i| match self.bits.get(i) {
            SENTINEL => {
                let c = self.coefficients[cursor] as usize;
                cursor += 1;
                c
            }
            v => v as usize,
        })
    }

    fn present_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.committee_size).filter(|&i| self.bits.get(i) > 0)
    }

    /// Position in `coefficients` belonging to `index` (or where it would be
    /// inserted).
    fn coefficient_position(&self, index: usize) -> usize {
        (0..index).filter(|&i| self.bits.get(i) == SENTINEL).count()
    }

    /// Add `count` signatures for `index`. `position` yields the index's
    /// coefficient position and is only called when a coefficient is read
    /// or inserted.
    fn add_signatures(
        &mut self,
        index: usize,
        count: usize,
        position: impl FnOnce(&Self) -> usize,
    ) {
        if count == 0 {
            return;
        }
        let previous = self.bits.get(index);
        if previous != SENTINEL && (previous as usize) + count < MIN_COEFFICIENT {
            self.bits.set(index, previous + count as u8);
        } else {
            let position = position(self);
            let current = if previous == SENTINEL {
                self.coefficients[position] as usize
            } else {
                previous as usize
            };
            let updated = current + count;
            assert!(
                updated <= self.committee_size,
                "aggregate signature coefficient {updated} exceeds committee size {}",
                self.committee_size
            );
            // Bounded by the committee size, which fits in 16 bits.
            let coefficient = updated as u16;
            if previous == SENTINEL {
                self.coefficients[position] = coefficient;
            } else {
                self.coefficients.insert(position, coefficient);
                self.bits.set(index, SENTINEL);
            }
        }

        if previous == 0 {
            self.length += 1;
        }
    }

    fn assert_validated(&self) {
        assert!(self.validated, "{}", SignersError::NotValidated);
    }

    fn assert_power_assigned(&self) {
        self.assert_validated();
        assert!(self.power_assigned, "{}", SignersError::PowerNotAssigned);
    }
}

fn safety_check(first: &Signers, second: &Signers) -> Result<(), SignersError> {
    if !first.validated || !second.validated {
        return Err(SignersError::NotValidated);
    }
    if first.committee_size != second.committee_size {
        return Err(SignersError::CommitteeSizeMismatch);
    }
    Ok(())
}

fn assert_safe(first: &Signers, second: &Signers) {
    if let Err(e) = safety_check(first, second) {
        panic!("{e}");
    }
}

/// Compares wire fields, plus total power when both sides have it.
impl PartialEq for Signers {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
            && self.coefficients == other.coefficients
            && (!(self.power_assigned && other.power_assigned) || self.power == other.power)
    }
}

impl Eq for Signers {}

impl fmt::Display for Signers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits: [")?;
        for (i, b) in self.bits.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{b:08b}")?;
        }
        write!(f, "], Coefficients: {:?}", self.coefficients)
    }
}
