//! Per-dimension type information and categorical string mapping
//!
//! Raw CSV columns may hold strings. Each distinct string of a dimension is
//! assigned the next integer id (0, 1, 2, ...) the first time it is seen, and
//! the dimension is then marked categorical.

use crate::core::{Result, SVMError};
use std::collections::HashMap;

/// Kind of values a dimension holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datatype {
    Numeric,
    Categorical,
}

/// Two-way string/value mapping of one dimension
#[derive(Debug, Clone, Default)]
struct DimensionMap {
    values: HashMap<String, f64>,
    /// String for each assigned id, in assignment order
    strings: Vec<String>,
}

/// Type and mapping information for the dimensions of a dataset
#[derive(Debug, Clone, Default)]
pub struct DatasetInfo {
    types: Vec<Datatype>,
    maps: HashMap<usize, DimensionMap>,
}

impl DatasetInfo {
    /// All `dimensionality` dimensions start out numeric
    pub fn new(dimensionality: usize) -> Self {
        Self {
            types: vec![Datatype::Numeric; dimensionality],
            maps: HashMap::new(),
        }
    }

    /// Map `string` in `dimension` to its numeric id, assigning one if new
    ///
    /// The empty string maps to NaN and does not consume an id.
    pub fn map_string(&mut self, string: &str, dimension: usize) -> f64 {
        if dimension >= self.types.len() {
            self.types.resize(dimension + 1, Datatype::Numeric);
        }

        let map = self.maps.entry(dimension).or_default();
        if let Some(&value) = map.values.get(string) {
            return value;
        }

        if string.is_empty() {
            map.values.insert(String::new(), f64::NAN);
            return f64::NAN;
        }

        let value = map.strings.len() as f64;
        map.values.insert(string.to_string(), value);
        map.strings.push(string.to_string());
        self.types[dimension] = Datatype::Categorical;
        value
    }

    /// String that was assigned id `value` in `dimension`
    pub fn unmap_string(&self, value: usize, dimension: usize) -> Result<&str> {
        self.maps
            .get(&dimension)
            .and_then(|map| map.strings.get(value))
            .map(String::as_str)
            .ok_or_else(|| {
                SVMError::UnknownMapping(format!(
                    "value '{value}' unknown for dimension {dimension}"
                ))
            })
    }

    /// Id previously assigned to `string` in `dimension`
    pub fn unmap_value(&self, string: &str, dimension: usize) -> Result<f64> {
        self.maps
            .get(&dimension)
            .and_then(|map| map.values.get(string))
            .copied()
            .ok_or_else(|| {
                SVMError::UnknownMapping(format!(
                    "string '{string}' unknown for dimension {dimension}"
                ))
            })
    }

    pub fn datatype(&self, dimension: usize) -> Result<Datatype> {
        self.types.get(dimension).copied().ok_or_else(|| {
            SVMError::InvalidParameter(format!(
                "requested type of dimension {dimension}, but dataset only has {} dimensions",
                self.types.len()
            ))
        })
    }

    /// Override the type of `dimension`, growing the dimensionality if needed
    pub fn set_datatype(&mut self, dimension: usize, datatype: Datatype) {
        if dimension >= self.types.len() {
            self.types.resize(dimension + 1, Datatype::Numeric);
        }
        self.types[dimension] = datatype;
    }

    /// Number of ids assigned in `dimension`
    pub fn num_mappings(&self, dimension: usize) -> usize {
        self.maps
            .get(&dimension)
            .map_or(0, |map| map.strings.len())
    }

    pub fn dimensionality(&self) -> usize {
        self.types.len()
    }

    /// True when any dimension holds mapped strings
    pub fn has_categorical(&self) -> bool {
        self.types.contains(&Datatype::Categorical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_numeric() {
        let info = DatasetInfo::new(3);
        assert_eq!(info.dimensionality(), 3);
        for d in 0..3 {
            assert_eq!(info.datatype(d).unwrap(), Datatype::Numeric);
            assert_eq!(info.num_mappings(d), 0);
        }
        assert!(!info.has_categorical());
    }

    #[test]
    fn test_map_string_assigns_sequential_ids() {
        let mut info = DatasetInfo::new(2);

        assert_eq!(info.map_string("red", 1), 0.0);
        assert_eq!(info.map_string("green", 1), 1.0);
        assert_eq!(info.map_string("red", 1), 0.0);
        assert_eq!(info.map_string("red", 0), 0.0);

        assert_eq!(info.num_mappings(1), 2);
        assert_eq!(info.datatype(1).unwrap(), Datatype::Categorical);
        assert!(info.has_categorical());
    }

    #[test]
    fn test_empty_string_maps_to_nan() {
        let mut info = DatasetInfo::new(1);

        assert!(info.map_string("", 0).is_nan());
        assert_eq!(info.num_mappings(0), 0);
        assert_eq!(info.datatype(0).unwrap(), Datatype::Numeric);
        assert!(info.unmap_value("", 0).unwrap().is_nan());
    }

    #[test]
    fn test_unmap() {
        let mut info = DatasetInfo::new(1);
        info.map_string("a", 0);
        info.map_string("b", 0);

        assert_eq!(info.unmap_string(1, 0).unwrap(), "b");
        assert_eq!(info.unmap_value("a", 0).unwrap(), 0.0);

        assert!(matches!(
            info.unmap_string(5, 0),
            Err(SVMError::UnknownMapping(_))
        ));
        assert!(matches!(
            info.unmap_value("c", 0),
            Err(SVMError::UnknownMapping(_))
        ));
        assert!(matches!(
            info.unmap_value("a", 3),
            Err(SVMError::UnknownMapping(_))
        ));
    }

    #[test]
    fn test_datatype_out_of_range() {
        let mut info = DatasetInfo::new(2);
        assert!(info.datatype(2).is_err());

        info.set_datatype(4, Datatype::Categorical);
        assert_eq!(info.dimensionality(), 5);
        assert_eq!(info.datatype(4).unwrap(), Datatype::Categorical);
        assert_eq!(info.datatype(3).unwrap(), Datatype::Numeric);
    }

    #[test]
    fn test_map_string_grows_dimensionality() {
        let mut info = DatasetInfo::new(0);
        info.map_string("x", 2);
        assert_eq!(info.dimensionality(), 3);
        assert_eq!(info.datatype(2).unwrap(), Datatype::Categorical);
    }
}
