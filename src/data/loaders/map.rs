// map.rs - Map file loader (<chr> <locusID> <genetic pos> <physical pos>)

use crate::data::map::{LocusMap, LocusRecord};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

impl LocusMap {
    /// Load a whitespace-separated map file
    pub fn from_map_file(file_path: &Path) -> Result<Self, String> {
        let file = File::open(file_path).map_err(|e| {
            format!("Failed to open map file '{}': {}", file_path.display(), e)
        })?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }
            if parts.len() != 4 {
                return Err(format!(
                    "Line {} of '{}' has {} fields, expected 4 (<chr> <locusID> <genetic pos> <physical pos>)",
                    line_num + 1,
                    file_path.display(),
                    parts.len()
                ));
            }

            let genetic_pos = parts[2].parse::<f64>().map_err(|_| {
                format!(
                    "Invalid genetic position '{}' at line {}",
                    parts[2],
                    line_num + 1
                )
            })?;
            let physical_pos = parts[3].parse::<i64>().map_err(|_| {
                format!(
                    "Invalid physical position '{}' at line {}",
                    parts[3],
                    line_num + 1
                )
            })?;

            records.push(LocusRecord {
                chromosome: parts[0].to_string(),
                name: parts[1].to_string(),
                genetic_pos,
                physical_pos,
            });
        }

        if records.is_empty() {
            return Err(format!("Map file '{}' is empty", file_path.display()));
        }

        println!("✅ Map loaded: {} loci", records.len());
        Ok(Self::from_records(records))
    }
}
