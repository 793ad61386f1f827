//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::models::{Commitment, CropProfile};

/// Newtype wrapper for displaying the crops of a catalog.
///
/// ```rust
/// use bedplan_core::{display::Crops, Catalog};
///
/// let catalog = Catalog::builtin().unwrap();
/// let output = Crops(catalog.crops.clone()).to_string();
/// assert!(output.contains("## Lettuce (`lettuce`)"));
/// ```
pub struct Crops(pub Vec<CropProfile>);

impl Crops {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CropProfile> {
        self.0.iter()
    }
}

impl fmt::Display for Crops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No crops found.");
        }
        for crop in &self.0 {
            write!(f, "{crop}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying committed occupations, grouped by bed.
pub struct Commitments(pub Vec<Commitment>);

impl Commitments {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Commitment> {
        self.0.iter()
    }
}

impl fmt::Display for Commitments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No committed occupations.");
        }
        let mut current_bed = None;
        for commitment in &self.0 {
            if current_bed != Some(&commitment.bed) {
                if current_bed.is_some() {
                    writeln!(f)?;
                }
                writeln!(f, "## Bed {}", commitment.bed)?;
                writeln!(f)?;
                current_bed = Some(&commitment.bed);
            }
            writeln!(f, "- {}", commitment.occupation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{BedId, Occupation};

    fn commitment(id: u64, bed: u32, series_id: &str, start: i32, end: i32) -> Commitment {
        Commitment {
            id,
            bed: BedId::new("main", bed),
            occupation: Occupation::new(series_id, "lettuce", "Lettuce", start, end).unwrap(),
            committed_at: Timestamp::from_second(1_640_995_200).unwrap(),
        }
    }

    #[test]
    fn test_commitments_display_groups_by_bed() {
        let commitments = Commitments(vec![
            commitment(1, 1, "a", 10, 15),
            commitment(2, 1, "b", 20, 25),
            commitment(3, 2, "c", 10, 15),
        ]);
        let output = commitments.to_string();

        assert_eq!(output.matches("## Bed main/1").count(), 1);
        assert_eq!(output.matches("## Bed main/2").count(), 1);
        assert!(output.contains("- Lettuce (`b`): weeks 20 to 25"));
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(Commitments(vec![]).to_string(), "No committed occupations.\n");
        assert_eq!(Crops(vec![]).to_string(), "No crops found.\n");
    }
}
