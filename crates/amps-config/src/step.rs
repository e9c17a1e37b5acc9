//! Wizard steps, in presentation order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    RunInfo,
    Particle,
    BackgroundField,
    Boundary,
    ElectricField,
    Temporal,
    Spectrum,
    Output,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 9] = [
        WizardStep::RunInfo,
        WizardStep::Particle,
        WizardStep::BackgroundField,
        WizardStep::Boundary,
        WizardStep::ElectricField,
        WizardStep::Temporal,
        WizardStep::Spectrum,
        WizardStep::Output,
        WizardStep::Review,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::RunInfo => "Run information",
            WizardStep::Particle => "Particle species",
            WizardStep::BackgroundField => "Background magnetic field",
            WizardStep::Boundary => "Domain boundary",
            WizardStep::ElectricField => "Electric field",
            WizardStep::Temporal => "Temporal mode",
            WizardStep::Spectrum => "Energy spectrum",
            WizardStep::Output => "Output",
            WizardStep::Review => "Review and submit",
        }
    }
}

