use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use uuid::Uuid;

use crate::calendar::month_view::{Direction, YearMonth};
use crate::calendar::{AvailabilityCalendar, CalendarListener, SelectError, SystemClock};
use crate::clients::range_provider::HttpRangeProvider;
use crate::config::Settings;
use crate::models::date_key::{format_date_key, parse_date};
use crate::models::selection::SelectionState;
use crate::server;
use crate::store::selection_store::{FileSelectionStore, SelectionStore};

#[derive(Parser)]
#[command(name = "roomCalendar", about = "Room availability calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a room's month grid with the session's selection.
    Show {
        #[arg(long)]
        room: String,
        /// Month to show as YYYY-MM; defaults to the current month.
        #[arg(long, value_parser = parse_year_month)]
        month: Option<YearMonth>,
        #[arg(long)]
        session: Option<String>,
    },
    /// Click one or more dates in order.
    Select {
        #[arg(long)]
        room: String,
        #[arg(long)]
        session: Option<String>,
        #[arg(required = true, value_parser = parse_date_arg)]
        dates: Vec<NaiveDate>,
    },
    /// Clear the session's check-in and check-out.
    Reset {
        #[arg(long)]
        session: String,
    },
    /// Browse months and pick dates from a prompt.
    Pick {
        #[arg(long)]
        room: String,
        #[arg(long)]
        session: Option<String>,
    },
    /// Serve booking ranges from a JSON fixture file.
    ServeFixture {
        #[arg(long)]
        file: String,
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

fn parse_year_month(value: &str) -> Result<YearMonth, String> {
    YearMonth::parse(value).ok_or_else(|| format!("Expected YYYY-MM, got {}", value))
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("Expected YYYY-MM-DD, got {}", value))
}

/// Prints outcomes for a terminal user.
struct PrintListener;

impl CalendarListener for PrintListener {
    fn on_date_select(&self, check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) {
        match (check_in, check_out) {
            (Some(check_in), None) => println!("Check-in: {}", format_date_key(check_in)),
            (Some(check_in), Some(check_out)) => println!(
                "Stay: {} to {}",
                format_date_key(check_in),
                format_date_key(check_out)
            ),
            _ => println!("Selection cleared"),
        }
    }

    fn on_validation_error(&self, message: &str) {
        println!("{}", message);
    }
}

pub async fn run(settings: Settings) -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let store = FileSelectionStore::new(&settings.store_location);
    match cli.command {
        Commands::Show {
            room,
            month,
            session,
        } => {
            let session = session_or_new(session);
            let mut calendar = open_calendar(&settings, &store, &room, &session).await?;
            if let Some(month) = month {
                calendar.show_month(month);
            }
            print!("{}", calendar.render());
        }
        Commands::Select {
            room,
            session,
            dates,
        } => {
            let session = session_or_new(session);
            let mut calendar = open_calendar(&settings, &store, &room, &session).await?;
            for date in dates {
                match calendar.select_date(date) {
                    Ok(state) => store.save(&session, &state)?,
                    Err(SelectError::NotInteractive) => {
                        println!("Availability is still loading, try again");
                    }
                    Err(SelectError::Rejected(_)) => {}
                }
            }
        }
        Commands::Reset { session } => {
            store.clear(&session)?;
            println!("Selection cleared");
        }
        Commands::Pick { room, session } => {
            let session = session_or_new(session);
            let mut calendar = open_calendar(&settings, &store, &room, &session).await?;
            pick_loop(&mut calendar, &store, &session)?;
        }
        Commands::ServeFixture { file, addr } => {
            let fixture = server::load_fixture(&file)?;
            server::serve(fixture, addr).await;
        }
    }
    Ok(())
}

fn session_or_new(session: Option<String>) -> String {
    session.unwrap_or_else(|| {
        let id = Uuid::new_v4().to_string();
        println!("New session {}", id);
        id
    })
}

async fn open_calendar(
    settings: &Settings,
    store: &dyn SelectionStore,
    room: &str,
    session: &str,
) -> Result<AvailabilityCalendar, Box<dyn Error>> {
    let selection = store.load(session)?;
    let provider = HttpRangeProvider::new(&settings.api_url, &settings.ranges_path);
    let mut calendar = AvailabilityCalendar::new(
        room,
        Arc::new(SystemClock::new(settings.timezone)),
        Arc::new(PrintListener),
    )
    .with_failure_policy(settings.failure_policy)
    .with_selection(selection);
    calendar.load_occupancy(&provider).await;
    Ok(calendar)
}

const PREV: &str = "Previous month";
const NEXT: &str = "Next month";
const PICK: &str = "Pick a date";
const RESET: &str = "Reset selection";
const DONE: &str = "Done";

fn pick_loop(
    calendar: &mut AvailabilityCalendar,
    store: &dyn SelectionStore,
    session: &str,
) -> Result<(), Box<dyn Error>> {
    loop {
        print!("{}", calendar.render());
        let choice = Select::new("What next?", vec![PICK, PREV, NEXT, RESET, DONE]).prompt()?;
        match choice {
            PREV => {
                calendar.navigate(Direction::Prev);
            }
            NEXT => {
                calendar.navigate(Direction::Next);
            }
            PICK => {
                let input = Text::new("Date (YYYY-MM-DD):").prompt()?;
                let Some(date) = parse_date(&input) else {
                    println!("Not a date: {}", input);
                    continue;
                };
                if let Ok(state) = calendar.select_date(date) {
                    store.save(session, &state)?;
                }
            }
            RESET => {
                let state: SelectionState = calendar.reset();
                store.save(session, &state)?;
            }
            _ => return Ok(()),
        }
    }
}
