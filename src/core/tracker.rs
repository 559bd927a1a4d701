// tracker.rs - Incremental haplotype extension and grouping

use std::collections::HashMap;

use crate::data::{Allele, GenotypeMatrix};

/// Scan direction away from the core locus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Decreasing locus index
    Left,
    /// Increasing locus index
    Right,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Left, Direction::Right];

    /// Next locus index in this direction, `None` past the chromosome edge
    pub fn next_locus(&self, locus: usize, n_loci: usize) -> Option<usize> {
        match self {
            Direction::Left => locus.checked_sub(1),
            Direction::Right => {
                let next = locus + 1;
                (next < n_loci).then_some(next)
            }
        }
    }
}

/// Canonical identifier of one extended haplotype: its lineage before this
/// step plus the allele read at the new locus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ExtensionKey {
    lineage: u32,
    allele: Allele,
}

/// Tracks the lineage of every haplotype in one or more panels as the scan
/// walks away from the core
///
/// Two members share a lineage iff they carry identical alleles at every
/// locus visited so far, so lineages split but never merge. Lineage ids are
/// renumbered densely in member order after each step.
#[derive(Debug, Clone)]
pub struct ExtensionTracker<'a> {
    panels: Vec<&'a GenotypeMatrix>,
    /// (panel, haplotype row) per member
    members: Vec<(usize, usize)>,
    lineage: Vec<u32>,
    n_lineages: usize,
    steps: usize,
}

impl<'a> ExtensionTracker<'a> {
    /// Every haplotype of every panel starts in a single lineage
    pub fn new(panels: Vec<&'a GenotypeMatrix>) -> Self {
        let members: Vec<(usize, usize)> = panels
            .iter()
            .enumerate()
            .flat_map(|(p, panel)| (0..panel.n_haplotypes()).map(move |row| (p, row)))
            .collect();
        let n_members = members.len();
        Self {
            panels,
            members,
            lineage: vec![0; n_members],
            n_lineages: if n_members == 0 { 0 } else { 1 },
            steps: 0,
        }
    }

    /// Lineages already split by the allele carried at the core locus
    pub fn seeded(panels: Vec<&'a GenotypeMatrix>, core: usize) -> Self {
        let mut tracker = Self::new(panels);
        tracker.extend(core);
        tracker.steps = 0;
        tracker
    }

    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    pub fn n_lineages(&self) -> usize {
        self.n_lineages
    }

    /// Loci added since construction (the seeding core locus is not counted)
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn allele_of(&self, member: usize, locus: usize) -> Allele {
        let (panel, row) = self.members[member];
        self.panels[panel].allele(row, locus)
    }

    /// Append one locus to every member's identifier and regroup
    pub fn extend(&mut self, locus: usize) {
        let mut ids: HashMap<ExtensionKey, u32> = HashMap::with_capacity(self.n_lineages * 2);
        for member in 0..self.members.len() {
            let key = ExtensionKey {
                lineage: self.lineage[member],
                allele: self.allele_of(member, locus),
            };
            let next_id = ids.len() as u32;
            self.lineage[member] = *ids.entry(key).or_insert(next_id);
        }
        self.n_lineages = ids.len();
        self.steps += 1;
    }

    /// Members of one panel, in row order
    pub fn panel_members(&self, panel: usize) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, &(p, _))| p == panel)
            .map(|(member, _)| member)
            .collect()
    }

    pub fn all_members(&self) -> Vec<usize> {
        (0..self.members.len()).collect()
    }

    /// Split members by their allele at `locus` into (derived, ancestral);
    /// members missing at that locus are in neither
    pub fn partition_by_allele(&self, locus: usize) -> (Vec<usize>, Vec<usize>) {
        let mut derived = Vec::new();
        let mut ancestral = Vec::new();
        for member in 0..self.members.len() {
            match self.allele_of(member, locus) {
                Allele::Derived => derived.push(member),
                Allele::Ancestral => ancestral.push(member),
                Allele::Missing => {}
            }
        }
        (derived, ancestral)
    }

    /// Group a subset of members by current lineage
    pub fn grouping(&self, subset: &[usize]) -> Grouping {
        let mut index: HashMap<u32, usize> = HashMap::new();
        let mut member_group = Vec::with_capacity(subset.len());
        let mut sizes: Vec<usize> = Vec::new();

        for &member in subset {
            let next = sizes.len();
            let group = *index.entry(self.lineage[member]).or_insert(next);
            if group == next {
                sizes.push(0);
            }
            sizes[group] += 1;
            member_group.push(group);
        }

        Grouping {
            member_group,
            sizes,
        }
    }
}

/// Equivalence classes of a subset at one scan step
///
/// Groups are numbered in order of first appearance within the subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    member_group: Vec<usize>,
    sizes: Vec<usize>,
}

impl Grouping {
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn total(&self) -> usize {
        self.member_group.len()
    }

    pub fn n_groups(&self) -> usize {
        self.sizes.len()
    }

    /// Group of the i-th subset member
    pub fn group_of(&self, position: usize) -> usize {
        self.member_group[position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(rows: &[Vec<i8>]) -> GenotypeMatrix {
        GenotypeMatrix::from_codes(rows).unwrap()
    }

    #[test]
    fn test_direction_bounds() {
        assert_eq!(Direction::Left.next_locus(0, 5), None);
        assert_eq!(Direction::Left.next_locus(3, 5), Some(2));
        assert_eq!(Direction::Right.next_locus(4, 5), None);
        assert_eq!(Direction::Right.next_locus(3, 5), Some(4));
    }

    #[test]
    fn test_seeded_split_by_core_allele() {
        let haps = panel(&[vec![0, 0, 1], vec![0, 1, 1], vec![1, 0, 0], vec![1, 1, 0]]);
        let tracker = ExtensionTracker::seeded(vec![&haps], 1);
        let (derived, ancestral) = tracker.partition_by_allele(1);
        assert_eq!(derived, vec![1, 3]);
        assert_eq!(ancestral, vec![0, 2]);
        assert_eq!(tracker.grouping(&derived).sizes(), &[2]);
        assert_eq!(tracker.grouping(&ancestral).sizes(), &[2]);
        assert_eq!(tracker.steps(), 0);
    }

    #[test]
    fn test_extension_splits_on_divergence() {
        let haps = panel(&[vec![0, 0, 1], vec![0, 1, 1], vec![1, 0, 0], vec![1, 1, 0]]);
        let mut tracker = ExtensionTracker::seeded(vec![&haps], 1);
        let (derived, _) = tracker.partition_by_allele(1);

        tracker.extend(2);
        // haplotypes 1 and 3 differ at locus 2
        assert_eq!(tracker.grouping(&derived).sizes(), &[1, 1]);
        assert_eq!(tracker.steps(), 1);
    }

    #[test]
    fn test_lineages_never_remerge() {
        let haps = panel(&[vec![0, 0, 0, 1], vec![0, 1, 0, 1], vec![0, 1, 1, 1]]);
        let mut tracker = ExtensionTracker::new(vec![&haps]);
        let all = tracker.all_members();
        let mut previous = tracker.grouping(&all);

        for locus in 0..4 {
            tracker.extend(locus);
            let current = tracker.grouping(&all);
            // every new group lies inside exactly one old group
            for a in 0..all.len() {
                for b in 0..all.len() {
                    if current.group_of(a) == current.group_of(b) {
                        assert_eq!(previous.group_of(a), previous.group_of(b));
                    }
                }
            }
            assert!(current.n_groups() >= previous.n_groups());
            previous = current;
        }
        assert_eq!(previous.sizes(), &[1, 1, 1]);
    }

    #[test]
    fn test_missing_is_its_own_allele() {
        let haps = panel(&[vec![1, 0], vec![1, -9], vec![1, 0]]);
        let mut tracker = ExtensionTracker::seeded(vec![&haps], 0);
        tracker.extend(1);
        let grouping = tracker.grouping(&tracker.all_members());
        assert_eq!(grouping.sizes(), &[2, 1]);
        assert_eq!(grouping.group_of(1), 1);
    }

    #[test]
    fn test_missing_at_core_excluded_from_subsets() {
        let haps = panel(&[vec![1], vec![-9], vec![0]]);
        let tracker = ExtensionTracker::seeded(vec![&haps], 0);
        let (derived, ancestral) = tracker.partition_by_allele(0);
        assert_eq!(derived, vec![0]);
        assert_eq!(ancestral, vec![2]);
    }

    #[test]
    fn test_multiple_panels() {
        let pop1 = panel(&[vec![1, 0], vec![1, 1]]);
        let pop2 = panel(&[vec![1, 0], vec![0, 0], vec![1, 1]]);
        let mut tracker = ExtensionTracker::new(vec![&pop1, &pop2]);
        assert_eq!(tracker.n_members(), 5);
        assert_eq!(tracker.panel_members(0), vec![0, 1]);
        assert_eq!(tracker.panel_members(1), vec![2, 3, 4]);

        tracker.extend(0);
        tracker.extend(1);
        // pooled lineages: (1,0) x2, (1,1) x2, (0,0) x1
        let pooled = tracker.grouping(&tracker.all_members());
        assert_eq!(pooled.sizes(), &[2, 2, 1]);
        let second = tracker.grouping(&tracker.panel_members(1));
        assert_eq!(second.sizes(), &[1, 1, 1]);
        assert_eq!(tracker.n_lineages(), 3);
    }
}
