use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Solar event categories that can be overlaid on screenshots and movies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    ActiveRegion,
    CoronalCavity,
    CoronalDimming,
    CoronalHole,
    CoronalJet,
    CoronalMassEjection,
    CoronalRain,
    CoronalWave,
    EmergingFlux,
    Eruption,
    Filament,
    FilamentActivation,
    FilamentEruption,
    Flare,
    Loop,
    Oscillation,
    Plage,
    Sigmoid,
    SpraySurge,
    Sunspot,
}

impl EventType {
    pub const ALL: &'static [EventType] = &[
        EventType::ActiveRegion,
        EventType::CoronalCavity,
        EventType::CoronalDimming,
        EventType::CoronalHole,
        EventType::CoronalJet,
        EventType::CoronalMassEjection,
        EventType::CoronalRain,
        EventType::CoronalWave,
        EventType::EmergingFlux,
        EventType::Eruption,
        EventType::Filament,
        EventType::FilamentActivation,
        EventType::FilamentEruption,
        EventType::Flare,
        EventType::Loop,
        EventType::Oscillation,
        EventType::Plage,
        EventType::Sigmoid,
        EventType::SpraySurge,
        EventType::Sunspot,
    ];

    /// Two-letter code used by the API.
    pub fn code(self) -> &'static str {
        match self {
            EventType::ActiveRegion => "AR",
            EventType::CoronalCavity => "CC",
            EventType::CoronalDimming => "CD",
            EventType::CoronalHole => "CH",
            EventType::CoronalJet => "CJ",
            EventType::CoronalMassEjection => "CE",
            EventType::CoronalRain => "CR",
            EventType::CoronalWave => "CW",
            EventType::EmergingFlux => "EF",
            EventType::Eruption => "ER",
            EventType::Filament => "FI",
            EventType::FilamentActivation => "FA",
            EventType::FilamentEruption => "FE",
            EventType::Flare => "FL",
            EventType::Loop => "LP",
            EventType::Oscillation => "OS",
            EventType::Plage => "PG",
            EventType::Sigmoid => "SG",
            EventType::SpraySurge => "SP",
            EventType::Sunspot => "SS",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventType::ActiveRegion => "Active Region",
            EventType::CoronalCavity => "Coronal Cavity",
            EventType::CoronalDimming => "Coronal Dimming",
            EventType::CoronalHole => "Coronal Hole",
            EventType::CoronalJet => "Coronal Jet",
            EventType::CoronalMassEjection => "Coronal Mass Ejection",
            EventType::CoronalRain => "Coronal Rain",
            EventType::CoronalWave => "Coronal Wave",
            EventType::EmergingFlux => "Emerging Flux",
            EventType::Eruption => "Eruption",
            EventType::Filament => "Filament",
            EventType::FilamentActivation => "Filament Activation",
            EventType::FilamentEruption => "Filament Eruption",
            EventType::Flare => "Flare",
            EventType::Loop => "Loop",
            EventType::Oscillation => "Oscillation",
            EventType::Plage => "Plage",
            EventType::Sigmoid => "Sigmoid",
            EventType::SpraySurge => "Spray Surge",
            EventType::Sunspot => "Sunspot",
        }
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self> {
        EventType::ALL
            .iter()
            .copied()
            .find(|e| e.code() == code)
            .ok_or_else(|| Error::validation("events", format!("{code} is not a valid EventType")))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
