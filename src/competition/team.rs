use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{normalize_members, validate_team};
use crate::error::Result;

/// Stable athlete identifier, assigned when a member first joins a team
pub type AthleteId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: AthleteId,
    pub name: String,
}

impl Athlete {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<Athlete>,
}

impl Team {
    /// Build a validated team with fresh athlete identifiers
    pub fn new(name: &str, members: &[String]) -> Result<Self> {
        let members = normalize_members(members);
        validate_team(name, &members)?;
        Ok(Self {
            name: name.trim().to_string(),
            members: members.into_iter().map(Athlete::new).collect(),
        })
    }

    /// Build the same team with a new member list.
    ///
    /// Members whose name is still present keep their identifier so their
    /// recorded attempts stay attached.
    pub fn with_members(&self, members: &[String]) -> Result<Self> {
        let members = normalize_members(members);
        validate_team(&self.name, &members)?;
        let members = members
            .into_iter()
            .map(|name| match self.member(&name) {
                Some(existing) => existing.clone(),
                None => Athlete::new(name),
            })
            .collect();
        Ok(Self {
            name: self.name.clone(),
            members,
        })
    }

    pub fn member(&self, name: &str) -> Option<&Athlete> {
        let name = name.trim();
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }
}
