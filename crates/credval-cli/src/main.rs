use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credval_core::{NewStudent, RawStudent};
use credval_runner::{render, run_demo, DemoOutcome, Runner};
use credval_storage::RecordStore;

#[derive(Parser)]
#[command(name = "credval", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default config and create the data and report directories
    Init,

    /// Seed the demo network, validate a request mix, save and export
    Demo,

    /// List institutions and their student counts
    Status,

    /// Add one student to an institution and save it
    StudentAdd {
        #[arg(long)]
        institution: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        degree: String,
        #[arg(long)]
        cgpa: String,
        #[arg(long)]
        year: String,
    },

    /// Queue validation requests for the given ids and process them
    Validate {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        requester: Option<String>,
    },

    /// Search students by name across all institutions
    Search {
        name: String,
        /// Case-sensitive whole-name match
        #[arg(long, default_value_t = false)]
        exact: bool,
    },

    /// Print network analytics
    Analytics {
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Export the comprehensive report, or one institution's roster
    Export {
        #[arg(long)]
        institution: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let interrupted = Arc::new(AtomicBool::new(false));
    if let Err(e) = signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&interrupted)) {
        tracing::warn!(error = %e, "could not install interrupt handler");
    }

    match run(cli, &interrupted) {
        Ok(()) => {
            if interrupted.load(Ordering::SeqCst) {
                println!("\nInterrupted by user");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli, interrupted: &AtomicBool) -> anyhow::Result<()> {
    let root = std::env::current_dir()?;

    match cli.cmd {
        Command::Init => {
            Runner::init_repo(&root)?;
            println!("Initialized credval in {}", root.display());
        }
        Command::Demo => {
            let r = Runner::open(root)?;
            let mut stdout = std::io::stdout().lock();
            match run_demo(&r, interrupted, &mut stdout)? {
                DemoOutcome::Completed { .. } => {}
                DemoOutcome::Interrupted => println!("Demo stopped before completion"),
            }
        }
        Command::Status => {
            let r = Runner::open(root)?;
            let system = r.load_system()?;
            println!("Institutions: {}", system.stores().len());
            for store in system.stores() {
                println!("- {} ({} students)", store.name(), store.len());
            }
            println!("Total students: {}", system.total_students());
        }
        Command::StudentAdd { institution, id, name, degree, cgpa, year } => {
            let r = Runner::open(root)?;
            let system = r.load_system()?;
            let store = system
                .store(&institution)
                .ok_or_else(|| anyhow!("institution `{institution}` is not configured"))?;
            let student = NewStudent::try_from(RawStudent {
                student_id: Some(id),
                name: Some(name),
                degree: Some(degree),
                cgpa: Some(cgpa),
                graduation_year: Some(year),
            })?;
            let record = store.add(student)?;
            r.persistence.save(store.as_ref()).context("save institution")?;
            println!("Added {} ({}) to {}", record.name, record.student_id, institution);
        }
        Command::Validate { ids, requester } => {
            let r = Runner::open(root)?;
            let mut system = r.load_system()?;
            let requester = requester.unwrap_or_else(|| r.cfg.requests.default_requester.clone());
            system.submit_bulk(&ids, &requester);
            let batch = system.process_all();
            for result in &batch.results {
                println!("{}", render::request_result(result));
            }
            print!("{}", render::batch(&batch.summary));
        }
        Command::Search { name, exact } => {
            let r = Runner::open(root)?;
            let system = r.load_system()?;
            let hits: Vec<_> = system.stores().iter().flat_map(|s| s.search_by_name(&name, exact)).collect();
            println!("{} match(es) for '{}'", hits.len(), name);
            print!("{}", render::records(&hits));
        }
        Command::Analytics { json } => {
            let r = Runner::open(root)?;
            let system = r.load_system()?;
            let analytics = system.analytics();
            if json {
                println!("{}", serde_json::to_string_pretty(&analytics)?);
            } else {
                print!("{}", render::analytics(&analytics, r.cfg.analytics.recent_graduate_year));
            }
        }
        Command::Export { institution } => {
            let r = Runner::open(root)?;
            let system = r.load_system()?;
            let path = match institution {
                Some(name) => {
                    let store = system
                        .store(&name)
                        .ok_or_else(|| anyhow!("institution `{name}` is not configured"))?;
                    r.export_institution(store.as_ref())?
                }
                None => r.export_report(&system)?,
            };
            println!("Exported {}", path.display());
        }
    }

    Ok(())
}
