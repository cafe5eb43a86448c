//! The enumerated set of Berlin districts
//!
//! The district filter only accepts these twelve names, in the order the
//! dropdown lists them.

use serde::{Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// One of the twelve Berlin districts (Bezirke)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum District {
    Mitte,
    FriedrichshainKreuzberg,
    Pankow,
    CharlottenburgWilmersdorf,
    Spandau,
    SteglitzZehlendorf,
    TempelhofSchoeneberg,
    Neukoelln,
    TreptowKoepenick,
    MarzahnHellersdorf,
    Lichtenberg,
    Reinickendorf,
}

impl District {
    /// All districts in dropdown order
    pub const ALL: [District; 12] = [
        District::Mitte,
        District::FriedrichshainKreuzberg,
        District::Pankow,
        District::CharlottenburgWilmersdorf,
        District::Spandau,
        District::SteglitzZehlendorf,
        District::TempelhofSchoeneberg,
        District::Neukoelln,
        District::TreptowKoepenick,
        District::MarzahnHellersdorf,
        District::Lichtenberg,
        District::Reinickendorf,
    ];

    /// The district name exactly as it appears in the source data
    pub fn name(&self) -> &'static str {
        match self {
            District::Mitte => "Mitte",
            District::FriedrichshainKreuzberg => "Friedrichshain-Kreuzberg",
            District::Pankow => "Pankow",
            District::CharlottenburgWilmersdorf => "Charlottenburg-Wilmersdorf",
            District::Spandau => "Spandau",
            District::SteglitzZehlendorf => "Steglitz-Zehlendorf",
            District::TempelhofSchoeneberg => "Tempelhof-Schöneberg",
            District::Neukoelln => "Neukölln",
            District::TreptowKoepenick => "Treptow-Köpenick",
            District::MarzahnHellersdorf => "Marzahn-Hellersdorf",
            District::Lichtenberg => "Lichtenberg",
            District::Reinickendorf => "Reinickendorf",
        }
    }

    /// Look up a district by its exact name (case-sensitive, untrimmed)
    pub fn from_name(name: &str) -> Option<District> {
        District::ALL.iter().copied().find(|d| d.name() == name)
    }

    /// Whether a record's district field refers to this district
    pub fn matches(&self, field: &str) -> bool {
        self.name() == field
    }
}

impl std::fmt::Display for District {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for District {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Returned when a string is not one of the enumerated districts
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown district: {0}")]
pub struct UnknownDistrict(pub String);

impl FromStr for District {
    type Err = UnknownDistrict;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        District::from_name(s).ok_or_else(|| UnknownDistrict(s.to_string()))
    }
}
