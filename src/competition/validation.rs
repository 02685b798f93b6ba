use std::collections::HashSet;

use crate::error::{CompetitionError, Result};

pub const MIN_TEAM_SIZE: usize = 4;
pub const MAX_TEAM_SIZE: usize = 6;

/// Trim member names and drop blank entries.
///
/// Mirrors a "one name per line" input: empty lines are not members.
pub fn normalize_members(members: &[String]) -> Vec<String> {
    members
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate a team before it is stored.
/// Reports all problems at once (not just the first).
pub fn validate_team(name: &str, members: &[String]) -> Result<()> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push("team name must not be empty".to_string());
    }

    if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&members.len()) {
        errors.push(format!(
            "a team needs {} to {} members, got {}",
            MIN_TEAM_SIZE,
            MAX_TEAM_SIZE,
            members.len()
        ));
    }

    let mut seen = HashSet::new();
    for member in members {
        if member.trim().is_empty() {
            errors.push("member names must not be empty".to_string());
        } else if !seen.insert(member.trim()) {
            errors.push(format!("member '{}' listed twice", member.trim()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        let team = if name.trim().is_empty() {
            "(unnamed)"
        } else {
            name.trim()
        };
        Err(CompetitionError::validation(format!(
            "team '{}': {}",
            team,
            errors.join("; ")
        )))
    }
}
