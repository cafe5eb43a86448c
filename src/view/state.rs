//! Filter state of the school search

use serde::Serialize;

use crate::dataset::{District, SchoolRecord};

/// The district filter applied to the school table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "district", rename_all = "snake_case")]
pub enum ViewState {
    /// Every school is shown
    #[default]
    Unfiltered,
    /// Only schools of one district are shown
    FilteredBy(District),
}

impl ViewState {
    /// The selected district, if any
    pub fn district(&self) -> Option<District> {
        match self {
            ViewState::Unfiltered => None,
            ViewState::FilteredBy(district) => Some(*district),
        }
    }

    /// Apply the filter, keeping table order
    pub fn filter<'a>(&self, schools: &'a [SchoolRecord]) -> Vec<&'a SchoolRecord> {
        match self {
            ViewState::Unfiltered => schools.iter().collect(),
            ViewState::FilteredBy(district) => schools
                .iter()
                .filter(|s| district.matches(&s.district))
                .collect(),
        }
    }

    /// The state a selection leads to, or `None` if the selection is rejected
    ///
    /// An absent or empty selection clears the filter. Any value outside the
    /// district set is rejected, whatever the current state.
    pub fn next(selection: Option<&str>) -> Option<ViewState> {
        match selection {
            None | Some("") => Some(ViewState::Unfiltered),
            Some(value) => District::from_name(value).map(ViewState::FilteredBy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample_schools;

    #[test]
    fn test_default_is_unfiltered() {
        assert_eq!(ViewState::default(), ViewState::Unfiltered);
        assert_eq!(ViewState::default().district(), None);
    }

    #[test]
    fn test_unfiltered_is_identity() {
        let schools = sample_schools();
        let subset = ViewState::Unfiltered.filter(&schools);
        assert_eq!(subset.len(), schools.len());
        assert!(subset.iter().zip(&schools).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_filtered_subset_matches_district() {
        let schools = sample_schools();
        for district in District::ALL {
            let subset = ViewState::FilteredBy(district).filter(&schools);
            let expected: Vec<_> = schools.iter().filter(|s| s.district == district.name()).collect();
            assert_eq!(subset, expected);
        }
    }

    #[test]
    fn test_next_state() {
        assert_eq!(ViewState::next(None), Some(ViewState::Unfiltered));
        assert_eq!(ViewState::next(Some("")), Some(ViewState::Unfiltered));
        assert_eq!(
            ViewState::next(Some("Pankow")),
            Some(ViewState::FilteredBy(District::Pankow))
        );
        assert_eq!(ViewState::next(Some("Atlantis")), None);
        assert_eq!(ViewState::next(Some(" Mitte")), None);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(ViewState::FilteredBy(District::Neukoelln)).unwrap();
        assert_eq!(json["state"], "filtered_by");
        assert_eq!(json["district"], "Neukölln");

        let json = serde_json::to_value(ViewState::Unfiltered).unwrap();
        assert_eq!(json["state"], "unfiltered");
    }
}
