mod cli;
mod config;
mod domain;
mod infra;
mod workflows;

use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;

use cli::{Cli, Command};
use config::{AppConfig, NamingConfig};
use domain::meta::UploadMeta;
use domain::models::MovieRecord;
use infra::radarr::{LookupQuery, RadarrClient};
use workflows::lookup::find_movie_data;
use workflows::naming::{self, NamingOutcome};
use workflows::renamer;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut clog = colog::default_builder();
    clog.filter(
        None,
        if debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
    );
    clog.init();
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Lookup {
            tmdb_id,
            filename,
            hint,
        } => {
            let query = match (tmdb_id, filename) {
                (Some(id), None) => LookupQuery::TmdbId(id),
                (None, Some(term)) => LookupQuery::Term(term),
                _ => bail!("Specify exactly one of --tmdb-id or --filename"),
            };
            lookup(&config, &query, hint.as_deref())
        }
        Command::Normalize {
            scene_name,
            original,
        } => {
            let normalized = naming::normalize_scene_name(&scene_name, &config.naming);
            if normalized.is_empty() {
                bail!("Scene name {scene_name:?} is empty after normalization");
            }
            println!(
                "{}",
                naming::with_original_extension(&normalized, original.as_deref())
            );
            Ok(())
        }
        Command::Rename { inputs, no_confirm } => {
            let clients = build_clients(&config)?;
            let mut renamed = 0;
            for input_path in &inputs {
                if !input_path.exists() {
                    eprintln!("Error: Input path does not exist: {input_path:?}");
                    continue;
                }

                match process_input_path(input_path, &clients, &config.naming, no_confirm) {
                    Ok(true) => renamed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        eprintln!("Error processing path {input_path:?}: {e}");
                        // Continue processing other paths
                    }
                }
                println!();
            }
            println!("{}", rename_summary(renamed, inputs.len()));
            Ok(())
        }
    }
}

fn build_clients(config: &AppConfig) -> Result<Vec<RadarrClient>> {
    let clients = config
        .radarr_instances()
        .iter()
        .map(RadarrClient::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(clients)
}

fn lookup(config: &AppConfig, query: &LookupQuery, hint: Option<&str>) -> Result<()> {
    let clients = build_clients(config)?;
    let Some(movie_data) = find_movie_data(&clients, query, hint) else {
        bail!("No movie data found for {query:?}");
    };

    println!("{}", serde_json::to_string_pretty(&movie_data)?);
    if let Some(scene_name) = movie_data.movie.as_ref().and_then(naming::scene_name_of) {
        println!("Scene name: {scene_name}");
    }
    Ok(())
}

/// Returns whether the input was renamed.
fn process_input_path(
    input_path: &Path,
    clients: &[RadarrClient],
    naming_config: &NamingConfig,
    skip_confirm: bool,
) -> Result<bool> {
    let Some(name) = input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
    else {
        bail!("Input path has no file name");
    };

    println!("Processing: {input_path:?}");

    let query = LookupQuery::Term(name.clone());
    let Some(movie_data) = find_movie_data(clients, &query, Some(&name)) else {
        eprintln!("Warning: No matching movie found for {input_path:?}");
        return Ok(false);
    };

    if let Some(movie) = &movie_data.movie {
        println!(
            "Found movie: {} ({})",
            movie.title.as_deref().unwrap_or("Unknown"),
            movie
                .year
                .map(|year| year.to_string())
                .unwrap_or_else(|| "?".to_string())
        );
    }

    let mut meta = upload_meta_for(input_path, name, movie_data.movie);

    match naming::apply_preferred_scene_name(&mut meta, naming_config) {
        NamingOutcome::Applied(scene_name) => {
            log::debug!("Using scene name {scene_name}");
        }
        NamingOutcome::Skipped(reason) => {
            println!("Keeping current name ({reason:?}).");
            return Ok(false);
        }
    }

    let directory = input_path.parent().unwrap_or(Path::new("."));
    let (_, target) = renamer::build_dest_path(input_path, directory, &meta);
    let new_path = renamer::find_unique_filename(input_path, directory, &target);

    renamer::rename_file(input_path, &new_path, skip_confirm)
}

fn upload_meta_for(input_path: &Path, name: String, movie: Option<MovieRecord>) -> UploadMeta {
    // A folder keeps its own name, so its contents are never inspected.
    let keep_folder = input_path.is_dir();
    let filelist = if keep_folder {
        Vec::new()
    } else {
        vec![input_path.to_path_buf()]
    };

    UploadMeta {
        filelist,
        keep_folder,
        radarr: movie,
        ..UploadMeta::new(name)
    }
}

fn rename_summary(renamed: usize, total: usize) -> String {
    let skipped = total - renamed;
    format!("Renamed {renamed} of {total} input(s), {skipped} left unchanged.")
}
