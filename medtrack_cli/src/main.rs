use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use medtrack_core::schedule::DueMedication;
use medtrack_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "medtrack")]
#[command(about = "Medication adherence tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today instead of reading the clock
    #[arg(long, global = true, value_parser = parse_date_arg)]
    today: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new medication
    Add {
        /// Medication name
        #[arg(long)]
        name: String,

        /// Dosage, e.g. "100mg"
        #[arg(long)]
        dosage: String,

        /// Time slot (repeatable): Morning, Noon, Afternoon, Evening, Bedtime or any custom label
        #[arg(long = "time", required = true)]
        times: Vec<String>,

        /// Daily, every-other-day, weekly, monthly or custom
        #[arg(long, default_value = "daily")]
        frequency: String,

        /// Description for a custom frequency
        #[arg(long)]
        custom_frequency: Option<String>,
    },

    /// Mark a dose as taken (or not taken)
    Log {
        /// Medication id
        #[arg(long)]
        id: u32,

        /// Time slot label
        #[arg(long)]
        time: String,

        /// Date of the dose (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Record the dose as not taken
        #[arg(long)]
        not_taken: bool,
    },

    /// List medications with today's take/skip summary (default)
    List,

    /// Show medications due and skipped on a date
    Day {
        /// Date to show (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },

    /// Show adherence for every logged date
    Calendar {
        /// Selected date (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        selected: Option<NaiveDate>,
    },

    /// Show the time slot and frequency choices
    Options,

    /// Append calendar adherence rows to a CSV file
    Export {
        /// Output CSV path
        #[arg(long)]
        output: PathBuf,

        /// Selected date (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        selected: Option<NaiveDate>,
    },
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        medtrack_core::logging::init_with_level("debug");
    } else {
        medtrack_core::logging::init();
    }

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let state_path = data_dir.join("state.json");
    tracing::debug!("Using state file {:?}", state_path);

    // The only place the clock is read
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match cli.command {
        Some(Commands::Add {
            name,
            dosage,
            times,
            frequency,
            custom_frequency,
        }) => cmd_add(
            &state_path,
            &name,
            &dosage,
            &times,
            &frequency,
            custom_frequency.as_deref(),
        ),
        Some(Commands::Log {
            id,
            time,
            date,
            not_taken,
        }) => cmd_log(
            &state_path,
            MedicationId(id),
            &time,
            date.unwrap_or(today),
            !not_taken,
            today,
        ),
        Some(Commands::List) | None => cmd_list(&state_path, today),
        Some(Commands::Day { date }) => cmd_day(&state_path, date.unwrap_or(today)),
        Some(Commands::Calendar { selected }) => {
            cmd_calendar(&state_path, selected.unwrap_or(today), &config)
        }
        Some(Commands::Options) => {
            cmd_options(&config);
            Ok(())
        }
        Some(Commands::Export { output, selected }) => {
            cmd_export(&state_path, &output, selected.unwrap_or(today), &config)
        }
    }
}

fn cmd_add(
    state_path: &Path,
    name: &str,
    dosage: &str,
    times: &[String],
    frequency: &str,
    custom_frequency: Option<&str>,
) -> Result<()> {
    let frequency = Frequency::from_parts(frequency, custom_frequency)?;
    let times = times
        .iter()
        .map(TimeSlot::new)
        .collect::<Result<Vec<_>>>()?;

    let medication = StatusStore::update(state_path, |store| {
        store.add_medication(name, dosage, times, frequency)
    })?;

    println!("✓ {} added successfully (id {})", medication.name, medication.id);
    Ok(())
}

fn cmd_log(
    state_path: &Path,
    id: MedicationId,
    time: &str,
    date: NaiveDate,
    taken: bool,
    today: NaiveDate,
) -> Result<()> {
    ensure_not_future(date, today)?;
    let slot = TimeSlot::new(time)?;
    let message = dose_message(&slot, taken);

    let (before, after) = StatusStore::update(state_path, |store| {
        let before = store.medication(id).and_then(|m| m.first_taken);
        let after = store.record_dose(id, date, slot, taken)?;
        Ok((before, after))
    })?;

    println!("✓ {} on {}", message, date);
    if before.is_none() {
        if let Some(first) = after.first_taken {
            println!("  First taken: {}", first);
        }
    }
    Ok(())
}

fn cmd_list(state_path: &Path, today: NaiveDate) -> Result<()> {
    let store = StatusStore::load(state_path)?;
    let medications = store.medications();

    if medications.is_empty() {
        println!("No medications yet. Add one with `medtrack add`.");
        return Ok(());
    }

    println!("Your Medications ({})", medications.len());
    for med in medications {
        println!();
        println!("  [{}] {}", med.id, med.name);
        println!("      {}", med.dosage);
        println!("      Times: {}", join_slots(&med.times));
        println!("      Frequency: {}", med.frequency);
        if let Some(first) = med.first_taken {
            println!("      First taken: {}", first);
        }
        println!("      {}", med.today_summary(today));
    }
    Ok(())
}

fn cmd_day(state_path: &Path, date: NaiveDate) -> Result<()> {
    let store = StatusStore::load(state_path)?;
    let schedule = day_schedule(store.medications(), store.events(), date);

    println!("Medications for {}", date);
    println!();

    if schedule.due.is_empty() {
        println!("No medications to take today!");
    } else {
        println!("Medications to take:");
        for due in &schedule.due {
            print_due(due);
        }
    }

    if !schedule.skipped.is_empty() {
        println!();
        println!("Skipped today:");
        for skipped in &schedule.skipped {
            println!(
                "  [{}] {} ({}) - not scheduled. Next dose {}.",
                skipped.medication.id, skipped.medication.name, skipped.medication.dosage, skipped.next
            );
        }
    }

    let adherence = day_adherence(store.medications(), store.events().for_date(date), date);
    println!();
    println!("{} [{}]", adherence, adherence.tier());
    Ok(())
}

fn print_due(due: &DueMedication<'_>) {
    let med = due.medication;
    println!("  [{}] {} ({})", med.id, med.name, med.dosage);
    for slot in &due.slots {
        println!("      {:<12} {}", slot.slot.as_str(), slot.status);
    }
}

fn cmd_calendar(state_path: &Path, selected: NaiveDate, config: &Config) -> Result<()> {
    let store = StatusStore::load(state_path)?;
    let markings = calendar_markings_with(
        store.medications(),
        store.events(),
        selected,
        &config.adherence.thresholds(),
    );

    println!("Medication Adherence");
    println!();
    for (date, mark) in &markings {
        println!(
            "{} {} {:<6} {}",
            if mark.is_selected { ">" } else { " " },
            date,
            mark.tier,
            mark.adherence()
        );
    }
    Ok(())
}

fn cmd_options(config: &Config) {
    println!("Time slots:");
    for option in &config.schedule.time_options {
        println!("  {}", option);
    }
    println!("  (any other label is kept as a custom time)");
    println!();
    println!("Frequencies:");
    for option in Frequency::OPTIONS {
        println!("  {}", option);
    }
}

fn cmd_export(
    state_path: &Path,
    output: &Path,
    selected: NaiveDate,
    config: &Config,
) -> Result<()> {
    let store = StatusStore::load(state_path)?;
    let markings = calendar_markings_with(
        store.medications(),
        store.events(),
        selected,
        &config.adherence.thresholds(),
    );

    let count = write_report(&markings, output)?;
    println!("✓ Exported {} days to {}", count, output.display());
    Ok(())
}

fn join_slots(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(TimeSlot::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
