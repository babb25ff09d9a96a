use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::army::UnitName;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Deserialize, Serialize)]
pub enum Tribe {
    Roman,
    Teuton,
    Gaul,
}

pub type TribeUnits = [UnitName; 10];

impl Tribe {
    pub const PLAYABLE: [Tribe; 3] = [Tribe::Roman, Tribe::Teuton, Tribe::Gaul];

    /// Unit roster in barracks order.
    pub fn units(&self) -> &'static TribeUnits {
        match self {
            Tribe::Roman => &ROMAN_UNITS,
            Tribe::Teuton => &TEUTON_UNITS,
            Tribe::Gaul => &GAUL_UNITS,
        }
    }

    pub fn has_unit(&self, unit: &UnitName) -> bool {
        self.units().contains(unit)
    }
}

impl FromStr for Tribe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roman" | "romans" => Ok(Tribe::Roman),
            "teuton" | "teutons" => Ok(Tribe::Teuton),
            "gaul" | "gauls" => Ok(Tribe::Gaul),
            other => Err(format!("unknown tribe: {other}")),
        }
    }
}

static ROMAN_UNITS: TribeUnits = [
    UnitName::Legionnaire,
    UnitName::Praetorian,
    UnitName::Imperian,
    UnitName::EquitesLegati,
    UnitName::EquitesImperatoris,
    UnitName::EquitesCaesaris,
    UnitName::BatteringRam,
    UnitName::FireCatapult,
    UnitName::Senator,
    UnitName::Settler,
];

static TEUTON_UNITS: TribeUnits = [
    UnitName::Maceman,
    UnitName::Spearman,
    UnitName::Axeman,
    UnitName::Scout,
    UnitName::Paladin,
    UnitName::TeutonicKnight,
    UnitName::Ram,
    UnitName::Catapult,
    UnitName::Chief,
    UnitName::Settler,
];

static GAUL_UNITS: TribeUnits = [
    UnitName::Phalanx,
    UnitName::Swordsman,
    UnitName::Pathfinder,
    UnitName::TheutatesThunder,
    UnitName::Druidrider,
    UnitName::Haeduan,
    UnitName::Ram,
    UnitName::Trebuchet,
    UnitName::Chieftain,
    UnitName::Settler,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_unit_names() {
        assert!(Tribe::Teuton.has_unit(&UnitName::Ram));
        assert!(Tribe::Gaul.has_unit(&UnitName::Ram));
        assert!(!Tribe::Roman.has_unit(&UnitName::Ram));
        assert!(Tribe::PLAYABLE.iter().all(|t| t.has_unit(&UnitName::Settler)));
    }

    #[test]
    fn test_tribe_from_str() {
        assert_eq!("Gauls".parse::<Tribe>(), Ok(Tribe::Gaul));
        assert!("natars".parse::<Tribe>().is_err());
    }
}
