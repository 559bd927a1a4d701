// map.rs - Per-locus physical and genetic positions

/// One row of a map file
#[derive(Debug, Clone, PartialEq)]
pub struct LocusRecord {
    pub chromosome: String,
    pub name: String,
    pub genetic_pos: f64,
    pub physical_pos: i64,
}

/// Locus positions in column order
///
/// Positions are expected to be non-decreasing in locus index; this is a
/// precondition of every scan and is not re-checked here.
#[derive(Debug, Clone, Default)]
pub struct LocusMap {
    chromosomes: Vec<String>,
    names: Vec<String>,
    genetic: Vec<f64>,
    physical: Vec<i64>,
}

impl LocusMap {
    pub fn from_records(records: Vec<LocusRecord>) -> Self {
        let mut map = Self::default();
        for record in records {
            map.chromosomes.push(record.chromosome);
            map.names.push(record.name);
            map.genetic.push(record.genetic_pos);
            map.physical.push(record.physical_pos);
        }
        map
    }

    /// Anonymous loci named `locus_<index>` at the given positions
    pub fn from_positions(physical: &[i64], genetic: &[f64]) -> Result<Self, String> {
        if physical.len() != genetic.len() {
            return Err(format!(
                "Got {} physical positions but {} genetic positions",
                physical.len(),
                genetic.len()
            ));
        }
        let records = physical
            .iter()
            .zip(genetic)
            .enumerate()
            .map(|(i, (&physical_pos, &genetic_pos))| LocusRecord {
                chromosome: "1".to_string(),
                name: format!("locus_{}", i),
                genetic_pos,
                physical_pos,
            })
            .collect();
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn chromosome(&self, locus: usize) -> &str {
        &self.chromosomes[locus]
    }

    pub fn name(&self, locus: usize) -> &str {
        &self.names[locus]
    }

    pub fn genetic_pos(&self, locus: usize) -> f64 {
        self.genetic[locus]
    }

    pub fn physical_pos(&self, locus: usize) -> i64 {
        self.physical[locus]
    }

    /// Index of the first locus carrying this name
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_returns_first_match() {
        let map = LocusMap::from_records(vec![
            LocusRecord {
                chromosome: "2".to_string(),
                name: "rs1".to_string(),
                genetic_pos: 0.1,
                physical_pos: 100,
            },
            LocusRecord {
                chromosome: "2".to_string(),
                name: "rs2".to_string(),
                genetic_pos: 0.2,
                physical_pos: 200,
            },
            LocusRecord {
                chromosome: "2".to_string(),
                name: "rs1".to_string(),
                genetic_pos: 0.3,
                physical_pos: 300,
            },
        ]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.find("rs1"), Some(0));
        assert_eq!(map.find("rs2"), Some(1));
        assert_eq!(map.find("rs9"), None);
        assert_eq!(map.chromosome(1), "2");
        assert_eq!(map.physical_pos(2), 300);
    }

    #[test]
    fn test_from_positions_length_mismatch() {
        assert!(LocusMap::from_positions(&[1, 2], &[0.0]).is_err());
        let map = LocusMap::from_positions(&[10, 20], &[0.0, 0.5]).unwrap();
        assert_eq!(map.name(1), "locus_1");
        assert_eq!(map.genetic_pos(1), 0.5);
    }
}
