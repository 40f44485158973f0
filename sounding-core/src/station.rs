use std::{collections::BTreeMap, fmt};

use crate::error::SoundingError;

/// Archive (WMO) number of a radiosonde launch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationNumber(u32);

impl StationNumber {
    pub const fn new(num: u32) -> Self {
        StationNumber(num)
    }
}

impl fmt::Display for StationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stations that resolve without any configuration.
const BUILTIN_STATIONS: &[(&str, StationNumber)] = &[
    ("KGSO", StationNumber::new(72317)),
    ("KAMA", StationNumber::new(72363)),
    ("KDDC", StationNumber::new(72451)),
    ("KLIX", StationNumber::new(72233)),
    ("KFWD", StationNumber::new(72249)),
    ("KOUN", StationNumber::new(72357)),
    ("KMAF", StationNumber::new(72265)),
    ("KDRT", StationNumber::new(72261)),
    ("KSHV", StationNumber::new(72248)),
    ("KJAN", StationNumber::new(72235)),
];

/// Station code to archive number lookup.
///
/// The table is closed: codes are never guessed or fetched. Operators extend
/// it through the `[stations]` section of the config file.
#[derive(Debug, Clone)]
pub struct StationTable {
    entries: BTreeMap<String, StationNumber>,
}

impl StationTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN_STATIONS.iter().map(|(code, num)| (code.to_string(), *num)).collect();

        Self { entries }
    }

    /// Add entries, replacing built-in numbers for codes that already exist.
    pub fn with_entries<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (S, StationNumber)>,
        S: Into<String>,
    {
        self.entries.extend(extra.into_iter().map(|(code, num)| (code.into(), num)));
        self
    }

    /// Exact, case-sensitive lookup.
    pub fn resolve(&self, code: &str) -> Result<StationNumber, SoundingError> {
        self.entries.get(code).copied().ok_or_else(|| SoundingError::UnknownStation {
            code: code.to_string(),
            known: self.codes().collect::<Vec<_>>().join(", "),
        })
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for StationTable {
    fn default() -> Self {
        Self::builtin()
    }
}
