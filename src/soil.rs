//! Soil conditions and the soil series reference table.
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};
use unicase::UniCase;

/// A qualitative soil class describing drainage and fertility.
///
/// Poorly drained and peat soils favour the spread of Ganoderma.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SoilCondition {
    /// Good: well drained and fertile
    #[strum(serialize = "Baik")]
    Baik,
    /// Moderate
    #[strum(serialize = "Sederhana")]
    Sederhana,
    /// Poor: badly drained or of low fertility
    #[strum(serialize = "Buruk")]
    Buruk,
    /// Peat
    #[strum(serialize = "Gambut")]
    Gambut,
}

impl SoilCondition {
    /// Look up a soil condition from its label, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` if the label does not name a known soil condition.
    pub fn from_label(label: &str) -> Option<Self> {
        label.trim().parse().ok()
    }
}

/// Soil conditions are read with the same case-insensitive matching as [`SoilCondition::from_label`]
impl<'de> Deserialize<'de> for SoilCondition {
    fn deserialize<D>(deserialiser: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserialiser)?;
        Self::from_label(&label).ok_or_else(|| {
            serde::de::Error::custom(format!("Unknown soil condition: {label}"))
        })
    }
}

/// An entry in the soil series reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoilSeries {
    /// The name of the soil series (e.g. "SEGAMAT")
    pub name: &'static str,
    /// The short code for the series (e.g. "SGT")
    pub code: &'static str,
    /// The soil class group, from 1 (best) to 6 (worst)
    pub class: u8,
}

macro_rules! soil_series {
    ($(($name:literal, $code:literal, $class:literal)),* $(,)?) => {
        &[$(SoilSeries { name: $name, code: $code, class: $class }),*]
    };
}

/// Malaysian soil series with their codes and class groups
pub const SOIL_SERIES: &[SoilSeries] = soil_series![
    ("SELANGOR", "SLR", 1),
    ("KANGKONG", "KGR", 1),
    ("BRIAH", "BRH", 2),
    ("TELONG", "TLG", 2),
    ("SEGAMAT", "SGT", 2),
    ("KUANTAN", "KTN", 3),
    ("BENTA", "BNT", 3),
    ("SK. MAS", "SMS", 3),
    ("KATONG", "KTG", 3),
    ("SABAK", "SBK", 3),
    ("YONG PENG", "YPG", 3),
    ("TOM YONG", "TYN", 3),
    ("KEMUNING", "KMG", 3),
    ("JERANGAU", "JRN", 3),
    ("JEMBANG", "JMB", 3),
    ("JELAI", "JLC", 3),
    ("CHAMP", "CPG", 3),
    ("MUSANG", "MUS", 3),
    ("SEMPAKA", "SPA", 3),
    ("KAMPONG KOLAM", "KKL", 3),
    ("MASSA", "MSI", 3),
    ("LENGKAWI", "LKI", 3),
    ("NENASI", "NBI", 4),
    ("BATANG MERBAU", "MRB", 4),
    ("LIMBAT", "LBT", 4),
    ("TEBOK", "TBK", 4),
    ("KALLA", "KLL", 4),
    ("COLLUVIUM", "COL", 4),
    ("BUKIT", "BKT", 4),
    ("ORGANIC ALLUVIUM", "ORA", 4),
    ("LOCAL ALLUVIUM", "LRA", 4),
    ("BUNGOR", "BGR", 4),
    ("CHEROK", "CRK", 4),
    ("SEMUPURNA/IMD", "SPAMD", 4),
    ("BATANG", "BTG", 4),
    ("BESAI", "BSH", 4),
    ("RAU", "RAU", 4),
    ("TAPAH", "TGH", 4),
    ("RASAU", "RAS", 4),
    ("BUNGOR", "RGR", 4),
    ("ROMPIN", "RPN", 4),
    ("RUDUA", "RDA", 4),
    ("MUNCHONG/L", "MUNL", 4),
    ("BUNGOR/S", "BRS", 5),
    ("DURIAN", "DUR", 5),
    ("CHENIAN/S", "CHNS", 5),
    ("DUTALAN", "DTL", 5),
    ("BATU LAPAN", "BNL", 5),
    ("HARRADIL", "HRDL", 5),
    ("MERAPOH/L", "MRPL", 5),
    ("MT. HAIL", "MTH", 5),
    ("MALACCA", "MLC", 5),
    ("HARRADS", "HRDS", 5),
    ("GAJAH MATI", "GMH", 5),
    ("MERAPOH", "MRP", 5),
    ("HARAD/ACAD", "HRA", 5),
    ("KEDAH", "KDH", 5),
    ("TAY", "TAY", 5),
    ("SEREMBAN", "SRB", 5),
    ("KANTIS", "KNT", 5),
    ("KALI BUKIT", "KBUK", 5),
    ("DURIAN ALAM", "DAL", 5),
    ("SEMPORNA/S", "SMP", 5),
    ("BATU/M", "BTM", 5),
    ("PAGOH", "PGH", 5),
    ("ORGANIC CLAY MUCK", "OCM", 5),
    ("SANDY COLLUVIUM", "SCL", 5),
    ("SRANTI", "SRA", 5),
    ("KUALA BERANG", "KBG", 6),
    ("BUKIT TUKU", "BKTK", 6),
    ("KAMP. KUBUR", "KPR", 6),
    ("ULU TIRAM", "ULT", 6),
    ("JABIL", "JBL", 6),
    ("SEDIRANG", "SDR", 6),
    ("MARANG", "MRG", 6),
    ("BINA", "BNA", 6),
    ("KUALA BRANG", "KLG/KBG", 6),
    ("PEAT/D", "PET/D", 6),
];

/// Find a soil series by name or code, ignoring case.
///
/// Codes are checked before names, as some names double as codes (e.g. "RAU").
pub fn find_soil_series(name_or_code: &str) -> Option<&'static SoilSeries> {
    let key = UniCase::new(name_or_code.trim());
    SOIL_SERIES
        .iter()
        .find(|series| UniCase::new(series.code) == key)
        .or_else(|| {
            SOIL_SERIES
                .iter()
                .find(|series| UniCase::new(series.name) == key)
        })
}
