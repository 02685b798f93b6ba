use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CompetitionError, Result};

/// The fixed set of competition classes ("Wettkampfklassen")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassId {
    #[serde(rename = "WK 1")]
    Wk1,
    #[serde(rename = "WK 2")]
    Wk2,
    #[serde(rename = "WK 3")]
    Wk3,
    #[serde(rename = "WK 4")]
    Wk4,
    #[serde(rename = "WK-Inklusion")]
    WkInklusion,
}

impl ClassId {
    pub const ALL: [ClassId; 5] = [
        ClassId::Wk1,
        ClassId::Wk2,
        ClassId::Wk3,
        ClassId::Wk4,
        ClassId::WkInklusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassId::Wk1 => "WK 1",
            ClassId::Wk2 => "WK 2",
            ClassId::Wk3 => "WK 3",
            ClassId::Wk4 => "WK 4",
            ClassId::WkInklusion => "WK-Inklusion",
        }
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassId {
    type Err = CompetitionError;

    /// Accepts the display names as well as loose spellings like "wk1" or "WK Inklusion"
    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        ClassId::ALL
            .into_iter()
            .find(|class| normalize(class.as_str()) == wanted)
            .ok_or_else(|| {
                CompetitionError::configuration(format!(
                    "unknown competition class '{}' (expected one of: {})",
                    s.trim(),
                    ClassId::ALL.map(|c| c.as_str()).join(", ")
                ))
            })
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// A boulder problem or top-rope route number, always 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u8);

impl Slot {
    pub const ALL: [Slot; 3] = [Slot(1), Slot(2), Slot(3)];

    pub fn new(number: u8) -> Result<Self> {
        if (1..=3).contains(&number) {
            Ok(Slot(number))
        } else {
            Err(CompetitionError::configuration(format!(
                "slot {} out of range (expected 1-3)",
                number
            )))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

pub const DEFAULT_ROUTE_HOLDS: u32 = 40;
pub const MIN_ROUTE_HOLDS: u32 = 1;
pub const MAX_ROUTE_HOLDS: u32 = 100;

fn default_holds() -> u32 {
    DEFAULT_ROUTE_HOLDS
}

/// Max-hold count per top-rope route.
///
/// Serialized as `{"Route 1": 40, "Route 2": 40, "Route 3": 40}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHolds {
    #[serde(rename = "Route 1", default = "default_holds")]
    route_1: u32,
    #[serde(rename = "Route 2", default = "default_holds")]
    route_2: u32,
    #[serde(rename = "Route 3", default = "default_holds")]
    route_3: u32,
}

impl Default for RouteHolds {
    fn default() -> Self {
        Self {
            route_1: DEFAULT_ROUTE_HOLDS,
            route_2: DEFAULT_ROUTE_HOLDS,
            route_3: DEFAULT_ROUTE_HOLDS,
        }
    }
}

impl RouteHolds {
    pub fn route_name(route: Slot) -> String {
        format!("Route {}", route.number())
    }

    pub fn get(&self, route: Slot) -> u32 {
        match route.number() {
            1 => self.route_1,
            2 => self.route_2,
            _ => self.route_3,
        }
    }

    /// Store a new max-hold count. Values outside 1..=100 are rejected and the
    /// previous value stays in place.
    pub fn set(&mut self, route: Slot, holds: u32) -> Result<()> {
        if !(MIN_ROUTE_HOLDS..=MAX_ROUTE_HOLDS).contains(&holds) {
            return Err(CompetitionError::configuration(format!(
                "{}: hold count {} out of range ({}-{})",
                Self::route_name(route),
                holds,
                MIN_ROUTE_HOLDS,
                MAX_ROUTE_HOLDS
            )));
        }
        *self.slot_mut(route) = holds;
        Ok(())
    }

    /// Force every route into 1..=100 (used on values read from disk)
    pub fn clamped(mut self) -> Self {
        for route in Slot::ALL {
            let holds = self.slot_mut(route);
            *holds = (*holds).clamp(MIN_ROUTE_HOLDS, MAX_ROUTE_HOLDS);
        }
        self
    }

    fn slot_mut(&mut self, route: Slot) -> &mut u32 {
        match route.number() {
            1 => &mut self.route_1,
            2 => &mut self.route_2,
            _ => &mut self.route_3,
        }
    }
}
