use serde::Serialize;

use crate::particle::{ParticleCategory, ParticleKind};

/// Energy-flow spectra booked per run, numbered by histogram id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpectrumClass {
    Primary = 1,
    Gamma,
    Electron,
    Muon,
    Neutron,
    AntiNeutron,
    Proton,
    AntiProton,
    PionPlus,
    PionMinus,
    PionZero,
    KaonZeroLong,
    KaonZeroShort,
    KaonZero,
    AntiKaonZero,
    KaonPlus,
    KaonMinus,
    Lambda,
    AntiLambda,
    SigmaPlus,
    AntiSigmaPlus,
    SigmaMinus,
    AntiSigmaMinus,
    SigmaZero,
    AntiSigmaZero,
    OtherBaryon,
    OtherMeson,
    OtherLepton,
}

impl SpectrumClass {
    pub const COUNT: usize = 28;

    pub const ALL: [SpectrumClass; Self::COUNT] = [
        SpectrumClass::Primary,
        SpectrumClass::Gamma,
        SpectrumClass::Electron,
        SpectrumClass::Muon,
        SpectrumClass::Neutron,
        SpectrumClass::AntiNeutron,
        SpectrumClass::Proton,
        SpectrumClass::AntiProton,
        SpectrumClass::PionPlus,
        SpectrumClass::PionMinus,
        SpectrumClass::PionZero,
        SpectrumClass::KaonZeroLong,
        SpectrumClass::KaonZeroShort,
        SpectrumClass::KaonZero,
        SpectrumClass::AntiKaonZero,
        SpectrumClass::KaonPlus,
        SpectrumClass::KaonMinus,
        SpectrumClass::Lambda,
        SpectrumClass::AntiLambda,
        SpectrumClass::SigmaPlus,
        SpectrumClass::AntiSigmaPlus,
        SpectrumClass::SigmaMinus,
        SpectrumClass::AntiSigmaMinus,
        SpectrumClass::SigmaZero,
        SpectrumClass::AntiSigmaZero,
        SpectrumClass::OtherBaryon,
        SpectrumClass::OtherMeson,
        SpectrumClass::OtherLepton,
    ];

    /// Histogram id, 1-based.
    pub fn id(self) -> usize {
        self as usize
    }

    pub fn from_id(id: usize) -> Option<Self> {
        id.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn title(self) -> &'static str {
        match self {
            SpectrumClass::Primary => "energy spectrum of primary",
            SpectrumClass::Gamma => "energy spectrum of emerging gamma",
            SpectrumClass::Electron => "energy spectrum of emerging e+-",
            SpectrumClass::Muon => "energy spectrum of emerging mu+-",
            SpectrumClass::Neutron => "energy spectrum of emerging neutrons",
            SpectrumClass::AntiNeutron => "energy spectrum of emerging antineutrons",
            SpectrumClass::Proton => "energy spectrum of emerging protons",
            SpectrumClass::AntiProton => "energy spectrum of emerging antiprotons",
            SpectrumClass::PionPlus => "energy spectrum of emerging pion+",
            SpectrumClass::PionMinus => "energy spectrum of emerging pion-",
            SpectrumClass::PionZero => "energy spectrum of emerging pion0",
            SpectrumClass::KaonZeroLong => "energy spectrum of emerging KL",
            SpectrumClass::KaonZeroShort => "energy spectrum of emerging KS",
            SpectrumClass::KaonZero => "energy spectrum of emerging K0",
            SpectrumClass::AntiKaonZero => "energy spectrum of emerging antiK0",
            SpectrumClass::KaonPlus => "energy spectrum of emerging K+",
            SpectrumClass::KaonMinus => "energy spectrum of emerging K-",
            SpectrumClass::Lambda => "energy spectrum of emerging Lambda0",
            SpectrumClass::AntiLambda => "energy spectrum of emerging antiLambda0",
            SpectrumClass::SigmaPlus => "energy spectrum of emerging Sigma+",
            SpectrumClass::AntiSigmaPlus => "energy spectrum of emerging antiSigma+",
            SpectrumClass::SigmaMinus => "energy spectrum of emerging Sigma-",
            SpectrumClass::AntiSigmaMinus => "energy spectrum of emerging antiSigma-",
            SpectrumClass::SigmaZero => "energy spectrum of emerging Sigma0",
            SpectrumClass::AntiSigmaZero => "energy spectrum of emerging antiSigma0",
            SpectrumClass::OtherBaryon => "energy spectrum of all others emerging baryons",
            SpectrumClass::OtherMeson => "energy spectrum of all others emerging mesons",
            SpectrumClass::OtherLepton => "energy spectrum of all others emerging leptons (neutrinos)",
        }
    }
}

/// Spectrum a track contributes to when it crosses the flow plane.
///
/// Primaries always land in [`SpectrumClass::Primary`]; secondaries go to
/// their species spectrum, then to the catch-all of their family. Nuclei,
/// gauge bosons other than the photon and unknown codes are not counted.
pub fn classify(parent_id: i32, pdg: i32) -> Option<SpectrumClass> {
    if parent_id == 0 {
        return Some(SpectrumClass::Primary);
    }
    if let Some(kind) = ParticleKind::from_pdg(pdg) {
        let class = match kind {
            ParticleKind::Gamma => Some(SpectrumClass::Gamma),
            ParticleKind::Electron | ParticleKind::Positron => Some(SpectrumClass::Electron),
            ParticleKind::MuonPlus | ParticleKind::MuonMinus => Some(SpectrumClass::Muon),
            ParticleKind::Neutron => Some(SpectrumClass::Neutron),
            ParticleKind::AntiNeutron => Some(SpectrumClass::AntiNeutron),
            ParticleKind::Proton => Some(SpectrumClass::Proton),
            ParticleKind::AntiProton => Some(SpectrumClass::AntiProton),
            ParticleKind::PionPlus => Some(SpectrumClass::PionPlus),
            ParticleKind::PionMinus => Some(SpectrumClass::PionMinus),
            ParticleKind::PionZero => Some(SpectrumClass::PionZero),
            ParticleKind::KaonZeroLong => Some(SpectrumClass::KaonZeroLong),
            ParticleKind::KaonZeroShort => Some(SpectrumClass::KaonZeroShort),
            ParticleKind::KaonZero => Some(SpectrumClass::KaonZero),
            ParticleKind::AntiKaonZero => Some(SpectrumClass::AntiKaonZero),
            ParticleKind::KaonPlus => Some(SpectrumClass::KaonPlus),
            ParticleKind::KaonMinus => Some(SpectrumClass::KaonMinus),
            ParticleKind::Lambda => Some(SpectrumClass::Lambda),
            ParticleKind::AntiLambda => Some(SpectrumClass::AntiLambda),
            ParticleKind::SigmaPlus => Some(SpectrumClass::SigmaPlus),
            ParticleKind::AntiSigmaPlus => Some(SpectrumClass::AntiSigmaPlus),
            ParticleKind::SigmaMinus => Some(SpectrumClass::SigmaMinus),
            ParticleKind::AntiSigmaMinus => Some(SpectrumClass::AntiSigmaMinus),
            ParticleKind::SigmaZero => Some(SpectrumClass::SigmaZero),
            ParticleKind::AntiSigmaZero => Some(SpectrumClass::AntiSigmaZero),
            _ => None,
        };
        if class.is_some() {
            return class;
        }
    }
    match ParticleCategory::from_pdg(pdg) {
        ParticleCategory::Baryon => Some(SpectrumClass::OtherBaryon),
        ParticleCategory::Meson => Some(SpectrumClass::OtherMeson),
        ParticleCategory::Lepton => Some(SpectrumClass::OtherLepton),
        _ => None,
    }
}
