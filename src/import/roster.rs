use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::competition::{ClassId, ClassStore};
use crate::error::{CompetitionError, Result};

const HEADERS: [&str; 3] = ["CompetitionClass", "Team", "Member"];

#[derive(Debug, Serialize, Deserialize)]
struct RosterRow {
    #[serde(rename = "CompetitionClass")]
    class: String,
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Member")]
    member: String,
}

/// Teams read from a roster file, grouped per class in first-appearance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub classes: BTreeMap<ClassId, Vec<(String, Vec<String>)>>,
}

impl Roster {
    fn push(&mut self, class: ClassId, team: String, member: String) {
        let teams = self.classes.entry(class).or_default();
        match teams.iter_mut().find(|(name, _)| *name == team) {
            Some((_, members)) => members.push(member),
            None => teams.push((team, vec![member])),
        }
    }

    pub fn athlete_count(&self) -> usize {
        self.classes
            .values()
            .flat_map(|teams| teams.iter().map(|(_, members)| members.len()))
            .sum()
    }
}

/// Pick the delimiter that occurs most often in the header line
pub fn sniff_delimiter(data: &[u8]) -> u8 {
    let header = data.split(|b| *b == b'\n').next().unwrap_or_default();
    [b',', b';', b'\t']
        .into_iter()
        .map(|d| (d, header.iter().filter(|b| **b == d).count()))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

/// Parse a `CompetitionClass,Team,Member` roster.
///
/// Any malformed row rejects the whole file.
pub fn parse_roster<R: Read>(mut reader: R) -> Result<Roster> {
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| CompetitionError::validation(format!("could not read roster: {}", e)))?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(&buffer))
        .trim(csv::Trim::All)
        .from_reader(&buffer[..]);

    let mut roster = Roster::default();
    for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        // line 1 is the header
        let line = index + 2;
        let row = row.map_err(|e| {
            CompetitionError::validation(format!("roster line {}: {}", line, e))
        })?;

        let class: ClassId = row.class.parse().map_err(|e: CompetitionError| {
            CompetitionError::validation(format!("roster line {}: {}", line, e))
        })?;
        if row.team.is_empty() || row.member.is_empty() {
            return Err(CompetitionError::validation(format!(
                "roster line {}: team and member must not be empty",
                line
            )));
        }
        roster.push(class, row.team, row.member);
    }

    Ok(roster)
}

/// Write every roster of the store as `CompetitionClass,Team,Member` rows
pub fn write_roster<W: Write>(store: &ClassStore, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    let to_error = |e: csv::Error| CompetitionError::persistence(format!("could not write roster: {}", e));

    csv_writer.write_record(HEADERS).map_err(to_error)?;
    for class in store.classes() {
        for team in &class.teams {
            for member in &team.members {
                csv_writer
                    .serialize(RosterRow {
                        class: class.id.to_string(),
                        team: team.name.clone(),
                        member: member.name.clone(),
                    })
                    .map_err(to_error)?;
            }
        }
    }
    csv_writer
        .flush()
        .map_err(|e| CompetitionError::persistence(format!("could not write roster: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_groups_by_class_and_team() {
        let data = "CompetitionClass,Team,Member\n\
                    WK 1,Red,Anna\n\
                    WK 1,Blue,Ben\n\
                    WK 1,Red,Carla\n\
                    WK 2,Green,Dana\n";
        let roster = parse_roster(data.as_bytes()).unwrap();

        let wk1 = &roster.classes[&ClassId::Wk1];
        assert_eq!(wk1.len(), 2);
        assert_eq!(wk1[0], ("Red".to_string(), vec!["Anna".to_string(), "Carla".to_string()]));
        assert_eq!(wk1[1].0, "Blue");
        assert_eq!(roster.classes[&ClassId::Wk2][0].1, vec!["Dana".to_string()]);
        assert_eq!(roster.athlete_count(), 4);
    }

    #[test]
    fn test_parse_semicolon_delimited() {
        let data = "CompetitionClass;Team;Member\nWK-Inklusion; Stars ; Eva \n";
        let roster = parse_roster(data.as_bytes()).unwrap();
        let teams = &roster.classes[&ClassId::WkInklusion];
        assert_eq!(teams[0], ("Stars".to_string(), vec!["Eva".to_string()]));
    }

    #[test]
    fn test_unknown_class_rejected() {
        let data = "CompetitionClass,Team,Member\nWK 1,Red,Anna\nWK 9,Red,Ben\n";
        let err = parse_roster(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CompetitionError::Validation { .. }));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_empty_member_rejected() {
        let data = "CompetitionClass,Team,Member\nWK 1,Red,\n";
        assert!(parse_roster(data.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_column_rejected() {
        let data = "CompetitionClass,Team\nWK 1,Red\n";
        assert!(parse_roster(data.as_bytes()).is_err());
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter(b"a,b,c\n1;2;3;4;5"), b',');
        assert_eq!(sniff_delimiter(b"a;b;c\n"), b';');
        assert_eq!(sniff_delimiter(b"a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter(b"abc"), b',');
    }

    #[test]
    fn test_write_roster() {
        let mut store = ClassStore::new();
        let members: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        store.add_team(ClassId::Wk2, "Red", &members).unwrap();

        let mut out = Vec::new();
        write_roster(&store, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "CompetitionClass,Team,Member");
        assert_eq!(lines[1], "WK 2,Red,A");
        assert_eq!(lines.len(), 5);

        let reparsed = parse_roster(text.as_bytes()).unwrap();
        assert_eq!(reparsed.classes[&ClassId::Wk2][0].1, members);
    }

    #[test]
    fn test_write_empty_store_has_header_only() {
        let mut out = Vec::new();
        write_roster(&ClassStore::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "CompetitionClass,Team,Member\n");
    }
}
