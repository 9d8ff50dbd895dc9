use std::{
    collections::HashMap,
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use serde::{
    de::{self, Deserializer},
    ser::{SerializeMap, Serializer},
    Deserialize, Serialize,
};

use crate::errors::JournalError;

/// Default director name printed on summaries.
pub const DIRECTOR_NAME: &str = "Орлов Владимир";

/// A master working at the shop. The roster is fixed; its order is the
/// display and report order everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Master {
    VladimirCh,
    VladimirA,
    Maksim,
    Andrey,
    Danila,
    Artyom,
}

impl Master {
    pub const ROSTER: [Master; 6] = [
        Master::VladimirCh,
        Master::VladimirA,
        Master::Maksim,
        Master::Andrey,
        Master::Danila,
        Master::Artyom,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Master::VladimirCh => "Владимир Ч.",
            Master::VladimirA => "Владимир А.",
            Master::Maksim => "Максим",
            Master::Andrey => "Андрей",
            Master::Danila => "Данила",
            Master::Artyom => "Артём",
        }
    }

    /// ASCII handle accepted by the shell.
    pub fn alias(self) -> &'static str {
        match self {
            Master::VladimirCh => "vladimir-ch",
            Master::VladimirA => "vladimir-a",
            Master::Maksim => "maksim",
            Master::Andrey => "andrey",
            Master::Danila => "danila",
            Master::Artyom => "artyom",
        }
    }

    /// Zero-based position in the roster.
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn from_display_name(name: &str) -> Option<Master> {
        let needle = name.trim().to_lowercase();
        Master::ROSTER
            .into_iter()
            .find(|master| master.display_name().to_lowercase() == needle)
    }
}

impl fmt::Display for Master {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Master {
    type Err = JournalError;

    /// Accepts the display name, the 1-based roster number, or the ASCII alias.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if let Some(master) = Master::from_display_name(trimmed) {
            return Ok(master);
        }
        if let Ok(number) = trimmed.parse::<usize>() {
            let by_number = number
                .checked_sub(1)
                .and_then(|idx| Master::ROSTER.get(idx).copied());
            if let Some(master) = by_number {
                return Ok(master);
            }
        }
        let alias = trimmed.to_ascii_lowercase();
        Master::ROSTER
            .into_iter()
            .find(|master| master.alias() == alias)
            .ok_or_else(|| JournalError::validation(format!("unknown master `{}`", trimmed)))
    }
}

/// One value per roster master, addressed by [`Master`].
///
/// Serialized as a JSON object keyed by display name. Deserialization
/// requires every roster master and rejects unknown names, so a document
/// missing an entry never loads half-populated.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterMap<T> {
    slots: [T; 6],
}

impl<T> RosterMap<T> {
    pub fn from_fn(mut f: impl FnMut(Master) -> T) -> Self {
        Self {
            slots: std::array::from_fn(|idx| f(Master::ROSTER[idx])),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Master, &T)> {
        Master::ROSTER.into_iter().zip(self.slots.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Master, &T) -> U) -> RosterMap<U> {
        RosterMap::from_fn(|master| f(master, &self[master]))
    }
}

impl<T: Default> Default for RosterMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Master> for RosterMap<T> {
    type Output = T;

    fn index(&self, master: Master) -> &T {
        &self.slots[master.position()]
    }
}

impl<T> IndexMut<Master> for RosterMap<T> {
    fn index_mut(&mut self, master: Master) -> &mut T {
        &mut self.slots[master.position()]
    }
}

impl<T: Serialize> Serialize for RosterMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (master, value) in self.iter() {
            map.serialize_entry(master.display_name(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RosterMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw: HashMap<String, T> = HashMap::deserialize(deserializer)?;
        let mut slots: Vec<T> = Vec::with_capacity(Master::ROSTER.len());
        for master in Master::ROSTER {
            let value = raw.remove(master.display_name()).ok_or_else(|| {
                de::Error::custom(format!("missing roster entry `{}`", master.display_name()))
            })?;
            slots.push(value);
        }
        if let Some(unknown) = raw.keys().next() {
            return Err(de::Error::custom(format!("unknown master `{}`", unknown)));
        }
        let slots: [T; 6] = slots
            .try_into()
            .map_err(|_| de::Error::custom("roster size mismatch"))?;
        Ok(Self { slots })
    }
}
