use std::fmt;

// ---------------------------------------------------------------------------
// Category levels and the resolved category triple
// ---------------------------------------------------------------------------

/// One of the three independent classification slots of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLevel {
    First,
    Second,
    Third,
}

impl CategoryLevel {
    pub const ALL: [CategoryLevel; 3] = [
        CategoryLevel::First,
        CategoryLevel::Second,
        CategoryLevel::Third,
    ];

    /// Element name of the level inside the category reference document.
    pub fn tag(self) -> &'static str {
        match self {
            CategoryLevel::First => "First",
            CategoryLevel::Second => "Second",
            CategoryLevel::Third => "Third",
        }
    }

    /// Element name carrying this level's category name in a measurement document.
    pub fn document_tag(self) -> &'static str {
        match self {
            CategoryLevel::First => "Category1",
            CategoryLevel::Second => "Category2",
            CategoryLevel::Third => "Category3",
        }
    }

    pub fn index(self) -> usize {
        match self {
            CategoryLevel::First => 0,
            CategoryLevel::Second => 1,
            CategoryLevel::Third => 2,
        }
    }
}

impl fmt::Display for CategoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A resolved (name, identifier) pair. Both are empty when the level is unused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub id: String,
}

/// Categories for all three levels, indexed by [`CategoryLevel::index`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTriple(pub [Category; 3]);

impl CategoryTriple {
    pub fn get(&self, level: CategoryLevel) -> &Category {
        &self.0[level.index()]
    }
}

// ---------------------------------------------------------------------------
// Experiment blocks
// ---------------------------------------------------------------------------

/// Measurement modality of an experiment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Reflectance,
    Transmission,
}

impl Protocol {
    /// Single-character tag written to the `protocol` column.
    pub fn tag(self) -> &'static str {
        match self {
            Protocol::Reflectance => "r",
            Protocol::Transmission => "t",
        }
    }

    pub fn element(self) -> &'static str {
        match self {
            Protocol::Reflectance => "Reflectance",
            Protocol::Transmission => "Transmission",
        }
    }
}

/// A dark or white reference reduced to one per-wavelength profile and
/// logically repeated for every observation of the block.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    pub profile: Vec<String>,
    pub observations: usize,
}

impl Baseline {
    /// Row `observation` of the broadcast O×W matrix.
    pub fn row(&self, observation: usize) -> Option<&[String]> {
        (observation < self.observations).then_some(self.profile.as_slice())
    }

    pub fn value(&self, observation: usize, wavelength: usize) -> Option<&str> {
        self.row(observation)?
            .get(wavelength)
            .map(String::as_str)
    }

    /// Materialise the full O×W matrix.
    pub fn to_matrix(&self) -> Vec<Vec<String>> {
        vec![self.profile.clone(); self.observations]
    }
}

/// One reflectance or transmission measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentBlock {
    pub protocol: Protocol,
    pub serial_number: String,
    pub integration_time: String,
    /// Wavelength labels, kept verbatim (length W).
    pub wavelengths: Vec<String>,
    /// Raw readings, one row per observation (O×W).
    pub read: Vec<Vec<String>>,
    pub dark: Baseline,
    pub white: Baseline,
    pub read_date: String,
    pub dark_date: String,
    pub white_date: String,
    pub temperature: String,
    pub xsmooth: String,
    pub temperature_compensated: String,
    pub scans_to_average: String,
    pub x_timing_resolution: String,
}

impl ExperimentBlock {
    pub fn observation_count(&self) -> usize {
        self.read.len()
    }

    pub fn wavelength_count(&self) -> usize {
        self.wavelengths.len()
    }
}

// ---------------------------------------------------------------------------
// SampleRecord – the whole measurement document
// ---------------------------------------------------------------------------

/// Identity of the measured item plus the experiments performed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub name: String,
    pub drink_id: String,
    pub upc: String,
    pub reflectance: Option<ExperimentBlock>,
    pub transmission: Option<ExperimentBlock>,
}

impl SampleRecord {
    /// Present blocks, reflectance first.
    pub fn blocks(&self) -> impl Iterator<Item = &ExperimentBlock> {
        self.reflectance.iter().chain(self.transmission.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_broadcasts_profile() {
        let baseline = Baseline {
            profile: vec!["1".into(), "2".into()],
            observations: 3,
        };
        assert_eq!(baseline.value(2, 1), Some("2"));
        assert_eq!(baseline.value(3, 0), None);
        assert_eq!(baseline.value(0, 2), None);
        assert_eq!(baseline.to_matrix().len(), 3);
    }

    #[test]
    fn category_levels_map_to_tags() {
        let tags: Vec<_> = CategoryLevel::ALL.iter().map(|l| l.document_tag()).collect();
        assert_eq!(tags, ["Category1", "Category2", "Category3"]);
        assert_eq!(CategoryLevel::Third.index(), 2);
        assert_eq!(Protocol::Transmission.tag(), "t");
    }
}
