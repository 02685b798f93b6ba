use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{ClassResults, SpeedResult, TeamResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn longest_name<'a>(header: &str, names: impl Iterator<Item = &'a str>) -> usize {
    names
        .map(|n| n.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

/// Width of a name column: the longest name, limited by the terminal
fn name_column_width<'a>(
    header: &str,
    names: impl Iterator<Item = &'a str>,
    fixed_width: usize,
    terminal_width: Option<usize>,
) -> usize {
    let longest = longest_name(header, names);

    match terminal_width {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        // Very narrow terminal
        Some(_) => longest.min(20),
        // No terminal (pipe), don't truncate
        None => longest,
    }
}

/// Gold, silver and bronze for the first three places.
/// Without colors the podium is marked with a leading '*'.
fn podium(line: String, place: usize, use_colors: bool) -> String {
    if !use_colors {
        let marker = if place <= 3 { '*' } else { ' ' };
        return format!("{}{}", marker, line);
    }
    match place {
        1 => format!(" {}", line.truecolor(255, 215, 0).bold()),
        2 => format!(" {}", line.truecolor(192, 192, 192).bold()),
        3 => format!(" {}", line.truecolor(205, 127, 50).bold()),
        _ => format!(" {}", line),
    }
}

fn header(line: String, use_colors: bool) -> String {
    if use_colors {
        format!(" {}", line.bold().underline())
    } else {
        format!(" {}", line)
    }
}

/// Team ranking table: place, team, discipline totals and combined score
pub fn format_team_ranking(results: &[TeamResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No teams registered.".to_string();
    }

    // place(4) + 4 numeric columns of 8 + separators
    let fixed_width = 1 + 4 + 4 * (8 + 2) + 2;
    let width = name_column_width(
        "Team",
        results.iter().map(|r| r.team.as_str()),
        fixed_width,
        get_terminal_width(),
    );

    let mut lines = vec![header(
        format!(
            "{:>3} {:<width$}  {:>8}  {:>8}  {:>8}  {:>8}",
            "#",
            "Team",
            "Boulder",
            "Top-rope",
            "Speed",
            "Total",
            width = width
        ),
        use_colors,
    )];

    lines.extend(results.iter().enumerate().map(|(idx, result)| {
        let place = idx + 1;
        let line = format!(
            "{:>2}. {:<width$}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.2}",
            place,
            truncate_name(&result.team, width),
            result.boulder,
            result.top_rope,
            result.speed,
            result.score,
            width = width
        );
        podium(line, place, use_colors)
    }));

    lines.join("\n")
}

/// Individual speed table: place, member, team, best time and points
pub fn format_speed_ranking(results: &[SpeedResult], use_colors: bool) -> String {
    speed_table(results, use_colors, get_terminal_width())
}

fn speed_table(results: &[SpeedResult], use_colors: bool, terminal_width: Option<usize>) -> String {
    if results.is_empty() {
        return "No speed times recorded.".to_string();
    }

    let fixed_width = 1 + 4 + 2 * (8 + 2) + 2;
    // The team column gets at most half of the space left for names
    let longest_team = longest_name("Team", results.iter().map(|r| r.team.as_str()));
    let team_width = match terminal_width {
        Some(width) if width > fixed_width + 10 => longest_team.min((width - fixed_width) / 2),
        Some(_) => longest_team.min(10),
        None => longest_team,
    };
    let member_width = name_column_width(
        "Member",
        results.iter().map(|r| r.member.as_str()),
        fixed_width + team_width,
        terminal_width,
    );

    let mut lines = vec![header(
        format!(
            "{:>3} {:<mw$}  {:<tw$}  {:>8}  {:>6}",
            "#",
            "Member",
            "Team",
            "Time (s)",
            "Points",
            mw = member_width,
            tw = team_width
        ),
        use_colors,
    )];

    lines.extend(results.iter().enumerate().map(|(idx, result)| {
        let place = idx + 1;
        let line = format!(
            "{:>2}. {:<mw$}  {:<tw$}  {:>8.2}  {:>6}",
            place,
            truncate_name(&result.member, member_width),
            truncate_name(&result.team, team_width),
            result.time,
            result.score,
            mw = member_width,
            tw = team_width
        );
        podium(line, place, use_colors)
    }));

    lines.join("\n")
}

/// Both rankings of a class under a title
pub fn format_class_results(results: &ClassResults, use_colors: bool) -> String {
    let title = format!("Results - {}", results.class);
    let title = if use_colors {
        title.bold().to_string()
    } else {
        title
    };

    format!(
        "{}\n\nTeam ranking\n{}\n\nSpeed ranking\n{}",
        title,
        format_team_ranking(&results.teams, use_colors),
        format_speed_ranking(&results.speed, use_colors)
    )
}

/// Per-problem and per-route subtotals of one team (for verbose mode)
pub fn format_team_detail(result: &TeamResult) -> String {
    let join = |values: &[f64; 3]| {
        values
            .iter()
            .map(|v| format!("{:.1}", v))
            .collect::<Vec<_>>()
            .join(" / ")
    };

    format!(
        "{}\n  Boulder: {} = {:.1}\n  Top-rope: {} = {:.1}\n  Speed (best 4): {:.1}\n  Total: {:.2}",
        result.team,
        join(&result.boulder_problems),
        result.boulder,
        join(&result.top_rope_routes),
        result.top_rope,
        result.speed,
        result.score
    )
}

/// Team ranking as tab-separated values for scripting
/// Columns: place, team, boulder, top-rope, speed, total (no headers, no colors)
pub fn format_results_tsv(results: &[TeamResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{:.2}",
                idx + 1,
                r.team,
                r.boulder,
                r.top_rope,
                r.speed,
                r.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Speed ranking as tab-separated values
/// Columns: place, member, team, time, points
pub fn format_speed_tsv(results: &[SpeedResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            format!(
                "{}\t{}\t{}\t{:.2}\t{}",
                idx + 1,
                r.member,
                r.team,
                r.time,
                r.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::ClassId;
    use uuid::Uuid;

    fn team(name: &str, score: f64) -> TeamResult {
        TeamResult {
            team: name.to_string(),
            boulder: 150.0,
            top_rope: 212.5,
            speed: 388.0,
            score,
            boulder_problems: [50.0, 50.0, 50.0],
            top_rope_routes: [100.0, 62.5, 50.0],
        }
    }

    fn speed(member: &str, team: &str, time: f64, rank: usize) -> SpeedResult {
        SpeedResult {
            athlete: Uuid::new_v4(),
            member: member.to_string(),
            team: team.to_string(),
            time,
            rank,
            score: crate::scoring::speed_points(rank),
        }
    }

    #[test]
    fn test_team_ranking_empty() {
        assert_eq!(format_team_ranking(&[], false), "No teams registered.");
    }

    #[test]
    fn test_team_ranking_rows() {
        let results = vec![
            team("Red", 222.6),
            team("Blue", 200.0),
            team("Green", 150.0),
            team("Yellow", 99.99),
        ];
        let output = format_team_ranking(&results, false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Team"));
        assert!(lines[0].contains("Total"));
        assert!(lines[1].starts_with("* 1. Red"));
        assert!(lines[1].ends_with("222.60"));
        assert!(lines[3].starts_with("* 3. Green"));
        // fourth place is not on the podium
        assert!(lines[4].starts_with("  4. Yellow"));
        assert!(lines[4].ends_with("99.99"));
    }

    #[test]
    fn test_speed_ranking_rows() {
        let results = vec![
            speed("Anna", "Red", 10.0, 0),
            speed("Ben", "Blue", 10.5, 1),
        ];
        let output = format_speed_ranking(&results, false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Time (s)"));
        assert!(lines[1].contains("Anna"));
        assert!(lines[1].contains("10.00"));
        assert!(lines[1].ends_with("100"));
        assert!(lines[2].ends_with("98"));
    }

    #[test]
    fn test_speed_table_truncates_long_team_names() {
        let results = vec![
            speed("Anna", "Kletterfreunde Gymnasium am Stadtpark Nord", 10.0, 0),
            speed("Ben", "Blue", 10.5, 1),
        ];
        let output = speed_table(&results, false, Some(60));
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines.iter().all(|l| l.chars().count() <= 60));
        assert!(lines[1].contains("Kletterfreund..."));
        assert!(!output.contains("Stadtpark"));
        assert!(lines[2].contains("Blue"));
    }

    #[test]
    fn test_speed_table_without_terminal_keeps_names() {
        let team = "Kletterfreunde Gymnasium am Stadtpark Nord";
        let output = speed_table(&[speed("Anna", team, 10.0, 0)], false, None);
        assert!(output.contains(team));
    }

    #[test]
    fn test_speed_ranking_empty() {
        assert_eq!(format_speed_ranking(&[], false), "No speed times recorded.");
    }

    #[test]
    fn test_class_results_sections() {
        let results = ClassResults {
            class: ClassId::Wk2,
            teams: vec![team("Red", 10.0)],
            speed: vec![],
        };
        let output = format_class_results(&results, false);
        assert!(output.starts_with("Results - WK 2"));
        assert!(output.contains("Team ranking"));
        assert!(output.contains("No speed times recorded."));
    }

    #[test]
    fn test_team_detail() {
        let output = format_team_detail(&team("Red", 222.6));
        assert!(output.contains("Boulder: 50.0 / 50.0 / 50.0 = 150.0"));
        assert!(output.contains("Top-rope: 100.0 / 62.5 / 50.0 = 212.5"));
        assert!(output.contains("Total: 222.60"));
    }

    #[test]
    fn test_results_tsv() {
        let output = format_results_tsv(&[team("Red", 222.6), team("Blue", 1.0)]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "1\tRed\t150\t212.5\t388\t222.60");
        assert!(lines[1].starts_with("2\tBlue\t"));
    }

    #[test]
    fn test_speed_tsv() {
        let output = format_speed_tsv(&[speed("Anna", "Red", 9.876, 0)]);
        assert_eq!(output, "1\tAnna\tRed\t9.88\t100");
        assert_eq!(format_speed_tsv(&[]), "");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 20), "Short");
        assert_eq!(truncate_name("Kletterfreunde Nord", 10), "Kletter...");
        assert_eq!(truncate_name("Jürgen Müller", 9), "Jürgen...");
        assert_eq!(truncate_name("Hello", 3), "Hel");
    }
}
