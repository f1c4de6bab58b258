use clap::{Parser, Subcommand};
use liftgen_core::*;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "liftgen")]
#[command(about = "Duration-balanced strength workout generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a balanced workout from an AI response
    Generate {
        #[command(flatten)]
        selection: Selection,

        /// File holding the raw AI response, or "-" for stdin
        #[arg(long, default_value = "-", conflicts_with = "offline")]
        input: String,

        /// Skip the AI response entirely and quick-build from the library
        #[arg(long)]
        offline: bool,

        /// Print the workout as JSON
        #[arg(long)]
        json: bool,

        /// Save the result as a template
        #[arg(long)]
        save: bool,
    },

    /// List library seeds
    Library {
        /// Only show one muscle group
        #[arg(long)]
        group: Option<MuscleGroup>,
    },

    /// Print the payload sent to the workout-generation service
    Request {
        #[command(flatten)]
        selection: Selection,
    },

    /// List, delete or duplicate saved templates
    Templates {
        #[command(subcommand)]
        action: Option<TemplateAction>,
    },

    /// Export saved templates to CSV
    Export {
        /// Destination CSV file
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List saved templates (default)
    List,

    /// Delete a saved template
    Delete {
        /// Template id
        id: Uuid,
    },

    /// Save a copy of a template under a new id
    Duplicate {
        /// Template id
        id: Uuid,

        /// Title of the copy (defaults to "<title> Copy")
        #[arg(long)]
        title: Option<String>,
    },
}

/// Muscle group, duration and equipment picked on the command line
#[derive(clap::Args)]
struct Selection {
    /// Comma-separated muscle groups (chest,back,...)
    #[arg(long, value_delimiter = ',')]
    groups: Vec<MuscleGroup>,

    /// Target duration in minutes
    #[arg(long)]
    minutes: Option<u32>,

    /// Available equipment, forwarded upstream
    #[arg(long, value_delimiter = ',')]
    equipment: Vec<String>,

    /// Workout type, forwarded upstream
    #[arg(long = "type")]
    workout_type: Option<String>,
}

impl Selection {
    /// Fill unset choices from config, then validate
    fn into_request(self, config: &Config) -> Result<GenerationRequest> {
        let defaults = &config.generation;
        let groups = if self.groups.is_empty() {
            defaults.muscle_groups.clone()
        } else {
            self.groups
        };
        let minutes = self.minutes.unwrap_or(defaults.default_duration_minutes);

        let mut request = GenerationRequest::new(groups, minutes);
        request.equipment = if self.equipment.is_empty() {
            defaults.equipment.clone()
        } else {
            self.equipment
        };
        request.workout_type = self.workout_type.or_else(|| defaults.workout_type.clone());

        request.validate()?;
        Ok(request)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    liftgen_core::logging::init_with_verbosity(cli.verbose);

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let store = TemplateStore::new(config.templates_path());
    tracing::debug!("Using template store {:?}", store.path());

    match cli.command {
        Commands::Generate {
            selection,
            input,
            offline,
            json,
            save,
        } => {
            let request = selection.into_request(&config)?;
            let response = if offline {
                tracing::info!("Offline mode, skipping AI response");
                None
            } else {
                Some(read_input(&input)?)
            };
            cmd_generate(store, &request, response.as_deref(), json, save)
        }
        Commands::Library { group } => cmd_library(group),
        Commands::Request { selection } => {
            let request = selection.into_request(&config)?;
            println!("{}", serde_json::to_string_pretty(&request.prompt_input())?);
            Ok(())
        }
        Commands::Templates { action } => match action.unwrap_or(TemplateAction::List) {
            TemplateAction::List => cmd_templates(&store),
            TemplateAction::Delete { id } => cmd_delete_template(store, id),
            TemplateAction::Duplicate { id, title } => {
                cmd_duplicate_template(store, id, title.as_deref())
            }
        },
        Commands::Export { output } => cmd_export(&store, &output),
    }
}

fn read_input(input: &str) -> Result<String> {
    let text = if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(input)?
    };
    tracing::info!("Read {} bytes of AI response from {}", text.len(), input);
    Ok(text)
}

fn cmd_generate(
    mut store: TemplateStore,
    request: &GenerationRequest,
    response: Option<&str>,
    json: bool,
    save: bool,
) -> Result<()> {
    let workout = generate(response, request);

    if json {
        println!("{}", serde_json::to_string_pretty(&workout)?);
    } else {
        display_workout(&workout);
    }

    if save {
        let template = WorkoutTemplate::from_workout(&workout, chrono::Utc::now());
        store.append(&template)?;
        tracing::info!("Saved template {} to {:?}", template.id, store.path());
        if !json {
            println!("✓ Saved template {}", template.id);
        }
    }

    Ok(())
}

fn cmd_library(group: Option<MuscleGroup>) -> Result<()> {
    let library = default_library();
    let errors = library.validate();
    if !errors.is_empty() {
        eprintln!("Library validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::LibraryValidation("Invalid library".into()));
    }

    for (pool_group, pool) in library.pools() {
        if group.is_some_and(|g| g != pool_group) {
            continue;
        }
        println!("{}", pool_group);
        for seed in &pool.compound {
            println!("  {:<32} compound   rest {}s", seed.name, seed.canonical_rest_seconds);
        }
        for seed in &pool.isolation {
            println!("  {:<32} isolation  rest {}s", seed.name, seed.canonical_rest_seconds);
        }
    }

    Ok(())
}

fn cmd_templates(store: &TemplateStore) -> Result<()> {
    let templates = store.read_all()?;
    if templates.is_empty() {
        println!("No saved templates.");
        return Ok(());
    }

    for template in &templates {
        println!(
            "{}  {}  {}  [{}] {} exercises, {} min",
            template.id,
            template.created_at.format("%Y-%m-%d %H:%M"),
            template.title,
            template.mode,
            template.exercises.len(),
            template.duration_minutes
        );
    }

    Ok(())
}

fn cmd_delete_template(mut store: TemplateStore, id: Uuid) -> Result<()> {
    if !store.delete(id)? {
        return Err(Error::TemplateNotFound(id));
    }
    println!("✓ Deleted template {}", id);
    Ok(())
}

fn cmd_duplicate_template(mut store: TemplateStore, id: Uuid, title: Option<&str>) -> Result<()> {
    let copy = store
        .duplicate(id, title)?
        .ok_or(Error::TemplateNotFound(id))?;
    println!("✓ Duplicated template as {}", copy.id);
    println!("  Title: {}", copy.title);
    Ok(())
}

fn cmd_export(store: &TemplateStore, output: &Path) -> Result<()> {
    let templates = store.read_all()?;
    if templates.is_empty() {
        println!("No saved templates - nothing to export.");
        return Ok(());
    }

    tracing::debug!("Exporting {} templates", templates.len());
    let rows = export_csv(&templates, output)?;
    println!("✓ Exported {} rows to CSV", rows);
    println!("  CSV: {}", output.display());
    Ok(())
}

fn display_workout(workout: &GeneratedWorkout) {
    if let Some(notice) = workout.source.notice() {
        println!("! {}", notice);
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", workout.title);
    println!("╰─────────────────────────────────────────╯");
    println!();

    for (i, exercise) in workout.exercises.iter().enumerate() {
        println!(
            "  {}. {:<32} {} x {}  rest {}s",
            i + 1,
            exercise.name,
            exercise.set_count(),
            exercise.reps_text(),
            exercise.rest_seconds
        );
    }

    println!();
    println!(
        "  ~{} min (target {} min)",
        workout.display_minutes, workout.target_minutes
    );
    println!();
}
