use crate::competition::{ClassId, CompetitionClass, RouteHolds, Slot, Team};

const CELL: usize = 10;

const NOTES: &str = "Scoring notes:\n\
  - Bouldering: each problem is worth 0, 25 (zone) or 50 (top) points.\n\
  - Top-rope: write down the number of the highest hold reached.\n\
  - Speed: every athlete has two runs. Enter both times in seconds under\n    \
    Time 1 and Time 2; the faster run counts.";

/// Join cells into one grid row
fn row(first: &str, first_width: usize, cells: &[String]) -> String {
    let mut line = format!("{:<width$}", first, width = first_width);
    for cell in cells {
        line.push_str(&format!("|{:^width$}", cell, width = CELL));
    }
    line.push('|');
    line
}

/// A blank scoring form for one team: 3 boulders (zone/top), 3 routes with
/// their max-hold counts and two speed times per athlete
pub fn format_run_sheet(class: ClassId, team: &Team, routes: &RouteHolds) -> String {
    let first_width = team
        .members
        .iter()
        .map(|m| m.name.chars().count())
        .chain(std::iter::once("Member".len()))
        .max()
        .unwrap_or(0)
        + 1;

    let disciplines = row(
        "",
        first_width,
        &[
            "Boulder".to_string(),
            String::new(),
            String::new(),
            "Top-rope".to_string(),
            String::new(),
            String::new(),
            "Speed".to_string(),
            String::new(),
        ],
    );

    let mut headings: Vec<String> = Slot::ALL
        .iter()
        .map(|s| format!("Boulder {}", s.number()))
        .collect();
    headings.extend(Slot::ALL.iter().map(|s| RouteHolds::route_name(*s)));
    headings.extend(["Time 1".to_string(), "Time 2".to_string()]);
    let headings = row("Member", first_width, &headings);

    let mut annotations = vec![String::new(); 3];
    annotations.extend(
        Slot::ALL
            .iter()
            .map(|s| format!("max. {}", routes.get(*s))),
    );
    annotations.extend([String::new(), String::new()]);
    let annotations = row("", first_width, &annotations);

    let rule = "-".repeat(headings.chars().count());
    let blank = vec![String::new(); 8];

    let mut lines = vec![
        format!("Run-sheet - {}", class),
        format!("Team: {}", team.name),
        String::new(),
        disciplines,
        headings,
        annotations,
        rule.clone(),
    ];
    for member in &team.members {
        lines.push(row(&member.name, first_width, &blank));
        lines.push(rule.clone());
    }
    lines.push(String::new());
    lines.push(NOTES.to_string());

    lines.join("\n")
}

/// Run-sheets for every team of a class, one page each (separated by form feeds)
pub fn format_run_sheets(class: &CompetitionClass) -> String {
    if class.teams.is_empty() {
        return format!("No teams registered in {}.", class.id);
    }
    class
        .teams
        .iter()
        .map(|team| format_run_sheet(class.id, team, &class.toprope_routes))
        .collect::<Vec<_>>()
        .join("\n\u{c}\n")
}
