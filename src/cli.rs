//! Command-line surface. Every command loads the roster, acts on it, prints
//! the outcome and saves again when something changed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::api::attendance::{self, MarkReport};
use crate::api::{export, report, roster::Roster};
use crate::config::Config;
use crate::db;
use crate::model::date::CalendarDate;
use crate::model::employee::Employee;
use crate::model::ledger::{MarkOutcome, UnmarkOutcome};
use crate::model::marking::MarkingKind;
use crate::render::{self, Palette, Style};

#[derive(Parser)]
#[command(name = "hrm")]
#[command(version)]
#[command(about = "Vacation and absence ledger for a small team", long_about = None)]
pub struct Cli {
    /// Data file, overrides HRM_DATA_FILE
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Plain output without colors
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MarkArg {
    Vacation,
    Absence,
}

impl From<MarkArg> for MarkingKind {
    fn from(arg: MarkArg) -> Self {
        match arg {
            MarkArg::Vacation => MarkingKind::Vacation,
            MarkArg::Absence => MarkingKind::Absence,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an employee
    Add {
        name: String,
        department: String,
        /// Vacation days per year, defaults to HRM_ANNUAL_VACATION_DAYS
        #[arg(long)]
        allowance: Option<u32>,
        /// Add even if the name is already taken
        #[arg(long)]
        force: bool,
    },
    /// Mark a weekday as vacation or absence
    Mark {
        /// Employee id or part of the name
        employee: String,
        kind: MarkArg,
        day: u32,
        month: u32,
        year: i32,
    },
    /// Clear the marking of a day
    Unmark {
        employee: String,
        day: u32,
        month: u32,
        year: i32,
    },
    /// Show a month calendar, the current month by default
    Calendar {
        employee: String,
        month: Option<u32>,
        year: Option<i32>,
    },
    /// List all employees
    List,
    /// Show an employee's details
    Search { query: String },
    /// Remove an employee and all their records
    Remove { employee: String },
    /// Manage training records
    Training {
        #[command(subcommand)]
        action: TrainingCommand,
    },
    /// Manage notes
    Note {
        #[command(subcommand)]
        action: NoteCommand,
    },
    /// Yearly overview per employee
    Dashboard {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Vacation and absences per employee in one month
    MonthlyReport {
        month: u32,
        year: i32,
        #[arg(long)]
        json: bool,
    },
    /// Yearly totals per department
    DepartmentStats {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Write CSV files
    Export {
        /// Target directory, overrides HRM_EXPORT_DIR
        #[arg(long)]
        dir: Option<PathBuf>,
        #[command(subcommand)]
        target: ExportTarget,
    },
}

#[derive(Subcommand)]
pub enum TrainingCommand {
    List { employee: String },
    Add {
        employee: String,
        course: String,
        /// dd/mm/yyyy
        completed_on: String,
    },
    Edit {
        employee: String,
        id: u32,
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        completed_on: Option<String>,
    },
    Remove { employee: String, id: u32 },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    List { employee: String },
    Add {
        employee: String,
        text: String,
        /// dd/mm/yyyy, today by default
        #[arg(long)]
        date: Option<String>,
    },
    Edit { employee: String, id: u32, text: String },
    Remove { employee: String, id: u32 },
}

#[derive(Subcommand)]
pub enum ExportTarget {
    /// Calendar of one employee
    Employee { employee: String },
    /// Yearly report of one department
    Department { department: String, year: Option<i32> },
}

struct Session {
    config: Config,
    data_file: PathBuf,
    palette: Box<dyn Palette>,
    roster: Roster,
}

impl Session {
    fn open(config: Config, data_file: PathBuf, color: bool) -> Result<Self> {
        let palette = render::palette(color);
        let loaded = db::load_roster(&data_file)
            .with_context(|| format!("Failed to read {}", data_file.display()))?;
        for skipped in &loaded.skipped {
            eprintln!("{}", palette.paint(Style::Warning, &format!("Skipped: {skipped}")));
        }
        Ok(Self {
            config,
            data_file,
            palette,
            roster: loaded.roster,
        })
    }

    fn save(&self) -> Result<()> {
        db::save_roster(&self.data_file, &self.roster)
            .with_context(|| format!("Failed to write {}", self.data_file.display()))
    }

    fn say(&self, style: Style, text: &str) {
        println!("{}", self.palette.paint(style, text));
    }

    fn employee_id(&self, query: &str) -> Result<u32> {
        Ok(self.roster.find(query)?.id)
    }

    fn employee(&self, query: &str) -> Result<&Employee> {
        Ok(self.roster.find(query)?)
    }

    fn employee_mut(&mut self, query: &str) -> Result<&mut Employee> {
        Ok(self.roster.find_mut(query)?)
    }

    fn print_calendar(&self, employee: &Employee, month: u32, year: i32) -> Result<()> {
        let grid = render::render_month(&employee.ledger, month, year)?;
        print!("{}", render::format_month(&grid, &employee.name, self.palette.as_ref())?);
        Ok(())
    }
}

pub fn run(cli: Cli, config: Config) -> Result<()> {
    let data_file = cli.data_file.unwrap_or_else(|| config.data_file.clone());
    let color = config.color && !cli.no_color;
    let mut session = Session::open(config, data_file, color)?;
    let today = CalendarDate::today();

    match cli.command {
        Commands::Add {
            name,
            department,
            allowance,
            force,
        } => {
            let allowance = allowance.unwrap_or(session.config.annual_vacation_days);
            let employee = session.roster.add(&name, &department, allowance, force)?;
            let text = format!("Added {} (id {}) to {}", employee.name, employee.id, employee.department);
            session.say(Style::Success, &text);
            session.save()?;
        }
        Commands::Mark {
            employee,
            kind,
            day,
            month,
            year,
        } => {
            let id = session.employee_id(&employee)?;
            let date = CalendarDate::new(day, month, year);
            let MarkReport { outcome, conflict } =
                attendance::mark_day(&mut session.roster, id, date, kind.into())?;
            if let Some(peer) = conflict {
                session.say(
                    Style::Warning,
                    &format!("Warning: {} ({}) is also on vacation on {date}", peer.name, peer.department),
                );
            }
            let text = match outcome {
                MarkOutcome::Marked => format!("{date} marked"),
                MarkOutcome::Overwritten { previous } => format!("{date} marked, replacing {previous}"),
            };
            session.say(Style::Success, &text);
            session.save()?;
        }
        Commands::Unmark {
            employee,
            day,
            month,
            year,
        } => {
            let id = session.employee_id(&employee)?;
            let date = CalendarDate::new(day, month, year);
            match attendance::unmark_day(&mut session.roster, id, date)? {
                UnmarkOutcome::Removed(kind) => {
                    session.say(Style::Success, &format!("{kind} removed from {date}"));
                    session.save()?;
                }
                UnmarkOutcome::NothingToRemove => {
                    session.say(Style::Plain, &format!("Nothing marked on {date}"));
                }
            }
        }
        Commands::Calendar {
            employee,
            month,
            year,
        } => {
            let employee = session.employee(&employee)?;
            session.print_calendar(employee, month.unwrap_or(today.month), year.unwrap_or(today.year))?;
        }
        Commands::List => {
            if session.roster.is_empty() {
                session.say(Style::Warning, "No employees yet");
            }
            for e in session.roster.employees() {
                println!("{:<4} {:<20} {}", e.id, e.name, e.department);
            }
        }
        Commands::Search { query } => {
            let employee = session.employee(&query)?;
            session.say(Style::Title, &format!("{} (id {})", employee.name, employee.id));
            println!("Department: {}", employee.department);
            println!(
                "Vacation left in {}: {} of {}",
                today.year,
                employee.remaining_vacation_days(today.year),
                employee.annual_vacation_days
            );
            println!("Trainings: {}  Notes: {}", employee.trainings.len(), employee.notes.len());
            session.print_calendar(employee, today.month, today.year)?;
        }
        Commands::Remove { employee } => {
            let id = session.employee_id(&employee)?;
            let removed = session.roster.remove(id)?;
            session.say(Style::Success, &format!("Removed {} (id {})", removed.name, removed.id));
            session.save()?;
        }
        Commands::Training { action } => training(&mut session, action)?,
        Commands::Note { action } => note(&mut session, action, today)?,
        Commands::Dashboard { year, json } => {
            let dashboard = report::dashboard(&session.roster, year.unwrap_or(today.year));
            if json {
                println!("{}", report::to_json(&dashboard)?);
            } else {
                print!("{}", report::format_dashboard(&dashboard, session.palette.as_ref()));
            }
        }
        Commands::MonthlyReport { month, year, json } => {
            let monthly = report::monthly_report(&session.roster, month, year)?;
            if json {
                println!("{}", report::to_json(&monthly)?);
            } else {
                print!("{}", report::format_monthly_report(&monthly, session.palette.as_ref())?);
            }
        }
        Commands::DepartmentStats { year, json } => {
            let stats = report::department_stats(&session.roster, year.unwrap_or(today.year));
            if json {
                println!("{}", report::to_json(&stats)?);
            } else {
                print!("{}", report::format_department_stats(&stats, session.palette.as_ref()));
            }
        }
        Commands::Export { dir, target } => {
            let dir = dir.unwrap_or_else(|| session.config.export_dir.clone());
            let path = match target {
                ExportTarget::Employee { employee } => {
                    export::export_employee_calendar(session.employee(&employee)?, &dir)?
                }
                ExportTarget::Department { department, year } => export::export_department_report(
                    &session.roster,
                    &department,
                    year.unwrap_or(today.year),
                    &dir,
                )?,
            };
            session.say(Style::Success, &format!("Exported to {}", path.display()));
        }
    }
    Ok(())
}

fn training(session: &mut Session, action: TrainingCommand) -> Result<()> {
    match action {
        TrainingCommand::List { employee } => {
            let employee = session.employee(&employee)?;
            if employee.trainings.is_empty() {
                session.say(Style::Plain, "No trainings recorded");
            }
            for t in &employee.trainings {
                println!("{:<4} {:<30} {}", t.id, t.course, t.completed_on);
            }
            return Ok(());
        }
        TrainingCommand::Add {
            employee,
            course,
            completed_on,
        } => {
            let employee = session.employee_mut(&employee)?;
            let id = employee.add_training(course, completed_on);
            info!(employee_id = employee.id, training_id = id, "Training added");
            session.say(Style::Success, &format!("Training {id} added"));
        }
        TrainingCommand::Edit {
            employee,
            id,
            course,
            completed_on,
        } => {
            let employee = session.employee_mut(&employee)?;
            let employee_id = employee.id;
            employee.edit_training(id, course, completed_on)?;
            info!(employee_id, training_id = id, "Training edited");
            session.say(Style::Success, &format!("Training {id} updated"));
        }
        TrainingCommand::Remove { employee, id } => {
            let employee = session.employee_mut(&employee)?;
            let employee_id = employee.id;
            let removed = employee.remove_training(id)?;
            info!(employee_id, training_id = id, "Training removed");
            session.say(Style::Success, &format!("Training '{}' removed", removed.course));
        }
    }
    session.save()
}

fn note(session: &mut Session, action: NoteCommand, today: CalendarDate) -> Result<()> {
    match action {
        NoteCommand::List { employee } => {
            let employee = session.employee(&employee)?;
            if employee.notes.is_empty() {
                session.say(Style::Plain, "No notes recorded");
            }
            for n in &employee.notes {
                println!("{:<4} {} {}", n.id, n.created_on, n.text);
            }
            return Ok(());
        }
        NoteCommand::Add {
            employee,
            text,
            date,
        } => {
            let employee = session.employee_mut(&employee)?;
            let id = employee.add_note(text, date.unwrap_or_else(|| today.to_string()));
            info!(employee_id = employee.id, note_id = id, "Note added");
            session.say(Style::Success, &format!("Note {id} added"));
        }
        NoteCommand::Edit { employee, id, text } => {
            let employee = session.employee_mut(&employee)?;
            let employee_id = employee.id;
            employee.edit_note(id, text)?;
            info!(employee_id, note_id = id, "Note edited");
            session.say(Style::Success, &format!("Note {id} updated"));
        }
        NoteCommand::Remove { employee, id } => {
            let employee = session.employee_mut(&employee)?;
            let employee_id = employee.id;
            employee.remove_note(id)?;
            info!(employee_id, note_id = id, "Note removed");
            session.say(Style::Success, &format!("Note {id} removed"));
        }
    }
    session.save()
}
