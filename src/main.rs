use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::debug;

use climb_score::competition::{ClassId, Slot};
use climb_score::config::{self, Config};
use climb_score::entries::{BoulderAttempt, SpeedRun};
use climb_score::error::CompetitionError;
use climb_score::output;
use climb_score::Session;

const EXIT_SUCCESS: i32 = 0;
const EXIT_VALIDATION: i32 = 1;
const EXIT_PERSISTENCE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

fn parse_class(value: &str) -> Result<ClassId, String> {
    value.parse::<ClassId>().map_err(|e| e.to_string())
}

fn parse_slot(value: &str) -> Result<Slot, String> {
    let number: u8 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number between 1 and 3", value))?;
    Slot::new(number).map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    /// Register a team (replaces a team with the same name)
    Add {
        #[arg(long, value_parser = parse_class)]
        class: ClassId,
        #[arg(long)]
        name: String,
        /// Member name, repeat 4 to 6 times
        #[arg(long = "member", required = true)]
        members: Vec<String>,
    },
    /// Change the members of an existing team
    Edit {
        #[arg(long, value_parser = parse_class)]
        class: ClassId,
        #[arg(long)]
        name: String,
        #[arg(long = "member", required = true)]
        members: Vec<String>,
    },
    /// Show the teams of a class
    List {
        #[arg(long, value_parser = parse_class)]
        class: ClassId,
    },
}

#[derive(Subcommand, Debug)]
enum RouteCommand {
    /// Set the number of holds of a top-rope route
    Set {
        #[arg(long, value_parser = parse_class)]
        class: ClassId,
        #[arg(long, value_parser = parse_slot)]
        route: Slot,
        #[arg(long)]
        holds: u32,
    },
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage teams
    #[command(subcommand)]
    Team(TeamCommand),
    /// Configure top-rope routes
    #[command(subcommand)]
    Route(RouteCommand),
    /// Record a boulder attempt (zone and/or top reached)
    Boulder {
        #[arg(long, value_parser = parse_class)]
        class: ClassId,
        #[arg(long)]
        team: String,
        #[arg(long)]
        member: String,
        #[arg(long, value_parser = parse_slot)]
        problem: Slot,
        #[arg(long)]
        zone: bool,
        #[arg(long)]
        top: bool,
    },
    /// Record the highest hold reached on a top-rope route
    Toprope {
        #[arg(long, value_parser = parse_class)]
        class: ClassId,
        #[arg(long)]
        team: String,
        #[arg(long)]
        member: String,
        #[arg(long, value_parser = parse_slot)]
        route: Slot,
        #[arg(long)]
        hold: u32,
    },
    /// Record a speed run time in seconds (0 clears the run)
    Speed {
        #[arg(long, value_parser = parse_class)]
        class: ClassId,
        #[arg(long)]
        team: String,
        #[arg(long)]
        member: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        run: u8,
        #[arg(long)]
        time: f64,
    },
    /// Replace teams from a CSV roster (CompetitionClass, Team, Member)
    Import { file: PathBuf },
    /// Write all teams as a CSV roster (stdout if no file is given)
    Export { file: Option<PathBuf> },
    /// Show team and speed rankings (default: every class)
    Results {
        #[arg(long, value_parser = parse_class)]
        class: Option<ClassId>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Print blank scoring forms for the teams of a class
    Runsheet {
        #[arg(long, value_parser = parse_class)]
        class: ClassId,
        #[arg(long)]
        team: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "climb-score")]
#[command(about = "School climbing competition scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/climb-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the competition state file (overrides the config)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// RUST_LOG wins over --verbose, which wins over the config's log_level
fn init_logging(verbose: bool, config: &Config) -> anyhow::Result<()> {
    let level = if verbose {
        "debug".to_string()
    } else {
        config
            .log_level
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| "warn".to_string())
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.as_str().into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn exit_code(error: &CompetitionError) -> i32 {
    match error {
        CompetitionError::Validation { .. } => EXIT_VALIDATION,
        CompetitionError::Persistence { .. } => EXIT_PERSISTENCE,
        CompetitionError::Configuration { .. } => EXIT_CONFIG,
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if let Err(e) = init_logging(cli.verbose, &config) {
        eprintln!("{}", e);
    }

    let state_path = cli.state.clone().unwrap_or_else(|| config.state_path());
    debug!("Using state file {}", state_path.display());
    let mut session = Session::open(state_path);

    let use_colors = config.colors.unwrap_or_else(output::should_use_colors);
    let command = cli.command.unwrap_or(Commands::Results {
        class: None,
        tsv: false,
    });

    match run(command, &mut session, cli.verbose, use_colors) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            let code = match e.downcast_ref::<CompetitionError>() {
                Some(err) => exit_code(err),
                // Only file handling outside the session ends up here
                None => EXIT_PERSISTENCE,
            };
            eprintln!("Error: {:#}", e);
            std::process::exit(code);
        }
    }
}

fn run(
    command: Commands,
    session: &mut Session,
    verbose: bool,
    use_colors: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Team(TeamCommand::Add {
            class,
            name,
            members,
        }) => {
            session.add_team(class, &name, &members)?;
            println!("Saved team '{}' in {}.", name.trim(), class);
        }
        Commands::Team(TeamCommand::Edit {
            class,
            name,
            members,
        }) => {
            session.edit_team(class, &name, &members)?;
            println!("Updated team '{}' in {}.", name.trim(), class);
        }
        Commands::Team(TeamCommand::List { class }) => {
            let teams = &session.store().class(class).teams;
            if teams.is_empty() {
                println!("No teams registered in {}.", class);
            }
            for team in teams {
                println!("{}: {}", team.name, team.member_names().join(", "));
            }
        }
        Commands::Route(RouteCommand::Set {
            class,
            route,
            holds,
        }) => {
            session.set_route_max_holds(class, route, holds)?;
            println!("Route {} in {} now has {} holds.", route.number(), class, holds);
        }
        Commands::Boulder {
            class,
            team,
            member,
            problem,
            zone,
            top,
        } => {
            session.record_boulder(class, &team, &member, problem, BoulderAttempt { zone, top })?;
        }
        Commands::Toprope {
            class,
            team,
            member,
            route,
            hold,
        } => {
            let stored = session.record_reached_hold(class, &team, &member, route, hold)?;
            if stored != hold {
                println!(
                    "Hold {} exceeds Route {}; recorded {}.",
                    hold,
                    route.number(),
                    stored
                );
            }
        }
        Commands::Speed {
            class,
            team,
            member,
            run,
            time,
        } => {
            let run = SpeedRun::from_number(run)?;
            session.record_speed_run(class, &team, &member, run, time)?;
        }
        Commands::Import { file } => {
            let reader = File::open(&file)
                .with_context(|| format!("Failed to open roster {}", file.display()))?;
            let roster = climb_score::import::parse_roster(BufReader::new(reader))?;
            session.import_roster(&roster)?;
            println!(
                "Imported {} athletes in {} classes.",
                roster.athlete_count(),
                roster.classes.len()
            );
        }
        Commands::Export { file } => match file {
            Some(path) => {
                let writer = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                session.export_roster(BufWriter::new(writer))?;
            }
            None => session.export_roster(std::io::stdout().lock())?,
        },
        Commands::Results { class, tsv } => {
            let classes = match class {
                Some(class) => vec![class],
                None => ClassId::ALL.to_vec(),
            };
            let sections: Vec<String> = classes
                .into_iter()
                .map(|class| {
                    let results = session.score(class);
                    if tsv {
                        return format!(
                            "{}\n{}",
                            output::format_results_tsv(&results.teams),
                            output::format_speed_tsv(&results.speed)
                        );
                    }
                    let mut text = output::format_class_results(&results, use_colors);
                    if verbose {
                        for team in &results.teams {
                            text.push_str("\n\n");
                            text.push_str(&output::format_team_detail(team));
                        }
                    }
                    text
                })
                .collect();
            println!("{}", sections.join("\n\n"));
        }
        Commands::Runsheet { class, team } => {
            let competition_class = session.store().class(class);
            let sheet = match team {
                Some(name) => {
                    let team = competition_class.team(&name).ok_or_else(|| {
                        CompetitionError::validation(format!("{}: unknown team '{}'", class, name))
                    })?;
                    output::format_run_sheet(class, team, &competition_class.toprope_routes)
                }
                None => output::format_run_sheets(competition_class),
            };
            println!("{}", sheet);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_team_add() {
        let cli = Cli::try_parse_from([
            "climb-score", "team", "add", "--class", "wk1", "--name", "Red", "--member", "A",
            "--member", "B", "--member", "C", "--member", "D",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Team(TeamCommand::Add { class, members, .. })) => {
                assert_eq!(class, ClassId::Wk1);
                assert_eq!(members.len(), 4);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_bad_slot_and_run() {
        assert!(Cli::try_parse_from([
            "climb-score", "boulder", "--class", "WK 1", "--team", "Red", "--member", "A",
            "--problem", "4",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "climb-score", "speed", "--class", "WK 1", "--team", "Red", "--member", "A",
            "--run", "3", "--time", "9.5",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_default_command() {
        let cli = Cli::try_parse_from(["climb-score", "--state", "/tmp/x.json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.state, Some(PathBuf::from("/tmp/x.json")));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&CompetitionError::validation("x")), EXIT_VALIDATION);
        assert_eq!(exit_code(&CompetitionError::persistence("x")), EXIT_PERSISTENCE);
        assert_eq!(exit_code(&CompetitionError::configuration("x")), EXIT_CONFIG);
    }
}
