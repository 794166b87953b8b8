use serde::Serialize;

/// Broad particle families, as the transport toolkit reports a particle's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleCategory {
    Lepton,
    Meson,
    Baryon,
    GaugeBoson,
    Nucleus,
    Unknown,
}

impl ParticleCategory {
    /// Category of any PDG Monte Carlo code, following the PDG numbering scheme.
    pub fn from_pdg(pdg: i32) -> Self {
        let code = pdg.unsigned_abs();
        if code >= 1_000_000_000 {
            return ParticleCategory::Nucleus;
        }
        match code {
            11..=18 => return ParticleCategory::Lepton,
            21..=25 => return ParticleCategory::GaugeBoson,
            _ => {}
        }
        let nq1 = (code / 1000) % 10;
        let nq2 = (code / 100) % 10;
        let nq3 = (code / 10) % 10;
        if nq1 != 0 && nq2 != 0 && nq3 != 0 {
            ParticleCategory::Baryon
        } else if nq1 == 0 && nq2 != 0 && nq3 != 0 {
            ParticleCategory::Meson
        } else {
            ParticleCategory::Unknown
        }
    }
}

// Quark charges in units of e/3, indexed by quark flavour 1..=6 (d u s c b t).
const QUARK_THIRDS: [i32; 7] = [0, -1, 2, -1, 2, -1, 2];

/// Charge in units of e of any PDG Monte Carlo code.
///
/// Leptons and gauge bosons are listed, hadrons are summed from their quark
/// content and nuclei (`±10LZZZAAAI`) carry their proton number. Codes the
/// numbering scheme does not describe are neutral.
pub fn charge_from_pdg(pdg: i32) -> f64 {
    let code = pdg.unsigned_abs();
    let sign = if pdg < 0 { -1 } else { 1 };
    if code >= 1_000_000_000 {
        let z = (code / 10_000) % 1000;
        return (sign * z as i32) as f64;
    }
    let thirds = match ParticleCategory::from_pdg(pdg) {
        ParticleCategory::Lepton => match code {
            11 | 13 | 15 | 17 => -3,
            _ => 0,
        },
        ParticleCategory::GaugeBoson => match code {
            24 => 3,
            _ => 0,
        },
        ParticleCategory::Baryon => {
            let nq1 = ((code / 1000) % 10) as usize;
            let nq2 = ((code / 100) % 10) as usize;
            let nq3 = ((code / 10) % 10) as usize;
            quark_thirds(nq1) + quark_thirds(nq2) + quark_thirds(nq3)
        }
        ParticleCategory::Meson => {
            let nq2 = ((code / 100) % 10) as usize;
            let nq3 = ((code / 10) % 10) as usize;
            // positive K and B codes carry the s or b antiquark
            if nq2 == 3 || nq2 == 5 {
                quark_thirds(nq3) - quark_thirds(nq2)
            } else {
                quark_thirds(nq2) - quark_thirds(nq3)
            }
        }
        ParticleCategory::Nucleus | ParticleCategory::Unknown => 0,
    };
    (sign * thirds) as f64 / 3.0
}

fn quark_thirds(flavour: usize) -> i32 {
    QUARK_THIRDS.get(flavour).copied().unwrap_or(0)
}

/// Particle species the application refers to by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParticleKind {
    Electron,
    Positron,
    MuonMinus,
    MuonPlus,
    NeutrinoE,
    AntiNeutrinoE,
    NeutrinoMu,
    AntiNeutrinoMu,
    NeutrinoTau,
    AntiNeutrinoTau,
    Gamma,
    PionPlus,
    PionMinus,
    PionZero,
    KaonPlus,
    KaonMinus,
    KaonZero,
    AntiKaonZero,
    KaonZeroLong,
    KaonZeroShort,
    Proton,
    AntiProton,
    Neutron,
    AntiNeutron,
    Lambda,
    AntiLambda,
    SigmaPlus,
    AntiSigmaPlus,
    SigmaMinus,
    AntiSigmaMinus,
    SigmaZero,
    AntiSigmaZero,
    DPlus,
    DMinus,
    DZero,
    AntiDZero,
    DsPlus,
    DsMinus,
    Alpha,
    AntiAlpha,
}

// (kind, PDG code, toolkit name)
const SPECIES: [(ParticleKind, i32, &str); 40] = [
    (ParticleKind::Electron, 11, "e-"),
    (ParticleKind::Positron, -11, "e+"),
    (ParticleKind::MuonMinus, 13, "mu-"),
    (ParticleKind::MuonPlus, -13, "mu+"),
    (ParticleKind::NeutrinoE, 12, "nu_e"),
    (ParticleKind::AntiNeutrinoE, -12, "anti_nu_e"),
    (ParticleKind::NeutrinoMu, 14, "nu_mu"),
    (ParticleKind::AntiNeutrinoMu, -14, "anti_nu_mu"),
    (ParticleKind::NeutrinoTau, 16, "nu_tau"),
    (ParticleKind::AntiNeutrinoTau, -16, "anti_nu_tau"),
    (ParticleKind::Gamma, 22, "gamma"),
    (ParticleKind::PionPlus, 211, "pi+"),
    (ParticleKind::PionMinus, -211, "pi-"),
    (ParticleKind::PionZero, 111, "pi0"),
    (ParticleKind::KaonPlus, 321, "kaon+"),
    (ParticleKind::KaonMinus, -321, "kaon-"),
    (ParticleKind::KaonZero, 311, "kaon0"),
    (ParticleKind::AntiKaonZero, -311, "anti_kaon0"),
    (ParticleKind::KaonZeroLong, 130, "kaon0L"),
    (ParticleKind::KaonZeroShort, 310, "kaon0S"),
    (ParticleKind::Proton, 2212, "proton"),
    (ParticleKind::AntiProton, -2212, "anti_proton"),
    (ParticleKind::Neutron, 2112, "neutron"),
    (ParticleKind::AntiNeutron, -2112, "anti_neutron"),
    (ParticleKind::Lambda, 3122, "lambda"),
    (ParticleKind::AntiLambda, -3122, "anti_lambda"),
    (ParticleKind::SigmaPlus, 3222, "sigma+"),
    (ParticleKind::AntiSigmaPlus, -3222, "anti_sigma+"),
    (ParticleKind::SigmaMinus, 3112, "sigma-"),
    (ParticleKind::AntiSigmaMinus, -3112, "anti_sigma-"),
    (ParticleKind::SigmaZero, 3212, "sigma0"),
    (ParticleKind::AntiSigmaZero, -3212, "anti_sigma0"),
    (ParticleKind::DPlus, 411, "D+"),
    (ParticleKind::DMinus, -411, "D-"),
    (ParticleKind::DZero, 421, "D0"),
    (ParticleKind::AntiDZero, -421, "anti_D0"),
    (ParticleKind::DsPlus, 431, "Ds+"),
    (ParticleKind::DsMinus, -431, "Ds-"),
    (ParticleKind::Alpha, 1000020040, "alpha"),
    (ParticleKind::AntiAlpha, -1000020040, "anti_alpha"),
];

impl ParticleKind {
    fn entry(self) -> &'static (ParticleKind, i32, &'static str) {
        // SPECIES lists the variants in declaration order
        &SPECIES[self as usize]
    }

    pub fn all() -> impl Iterator<Item = ParticleKind> {
        SPECIES.iter().map(|entry| entry.0)
    }

    pub fn pdg_code(self) -> i32 {
        self.entry().1
    }

    /// Particle name as used by the transport toolkit.
    pub fn name(self) -> &'static str {
        self.entry().2
    }

    /// Charge in units of e.
    pub fn charge(self) -> f64 {
        charge_from_pdg(self.pdg_code())
    }

    pub fn category(self) -> ParticleCategory {
        ParticleCategory::from_pdg(self.pdg_code())
    }

    pub fn from_pdg(pdg: i32) -> Option<Self> {
        SPECIES.iter().find(|entry| entry.1 == pdg).map(|entry| entry.0)
    }

    /// Look up a species by its toolkit name, e.g. `"mu-"`.
    pub fn from_name(name: &str) -> Option<Self> {
        SPECIES.iter().find(|entry| entry.2 == name).map(|entry| entry.0)
    }
}

/// A primary particle handed to the transport engine.
/// Position in mm, energy in MeV (toolkit internal units).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub energy: f64,
}

impl Particle {
    pub fn new(kind: ParticleKind, position: [f64; 3], direction: [f64; 3], energy: f64) -> Self {
        Self {
            kind,
            position,
            direction,
            energy,
        }
    }
}
