use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use choralith::app::App;
use choralith::cache::JsonStore;
use choralith::config::Settings;
use choralith::library::{Indexer, LoftyReader, ScanProgress, format_duration};

mod args;
mod logging;
mod settings;

use args::Command;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, problem) = settings::load_settings();
    logging::init(&settings.log);
    if let Some(msg) = problem {
        warn!("{msg}");
    }

    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let command = match args::parse(env::args().skip(1), cwd) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("choralith: {msg}\n{}", args::USAGE);
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => {
            println!("{}", args::USAGE);
            Ok(())
        }
        Command::Forget(dir) => {
            build_indexer(&settings, true)?.forget(&dir)?;
            info!(root = %dir.display(), "snapshot removed");
            Ok(())
        }
        Command::ClearCache => {
            build_indexer(&settings, true)?.clear()?;
            info!("all snapshots removed");
            Ok(())
        }
        Command::Scan { dir, use_cache } => {
            let indexer = build_indexer(&settings, use_cache && settings.cache.enabled)?;
            scan_and_list(&indexer, &settings, &dir)
        }
    }
}

fn build_indexer(settings: &Settings, use_cache: bool) -> Result<Indexer, Box<dyn std::error::Error>> {
    let source = Arc::new(LoftyReader::new());
    if !use_cache {
        return Ok(Indexer::without_cache(source, settings.scan.clone()));
    }

    let path = settings
        .cache_path()
        .ok_or("no cache location: set cache.path, XDG_CACHE_HOME or HOME")?;
    let store = JsonStore::new(path);
    info!(path = %store.path().display(), "using snapshot cache");
    Ok(Indexer::new(Arc::new(store), source, settings.scan.clone()))
}

fn render_progress(p: &ScanProgress) {
    let mut err = io::stderr().lock();
    let _ = write!(
        err,
        "\r[{}/{}] reused {} / read {}  {}\x1b[K",
        p.current_index,
        p.total,
        p.reused_count,
        p.extracted_count,
        p.current_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
    );
    let _ = err.flush();
}

fn scan_and_list(
    indexer: &Indexer,
    settings: &Settings,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(settings.display.clone());

    let mut drew_progress = false;
    app.begin_scan(dir);
    let outcome = indexer.rescan(dir, |p| {
        render_progress(p);
        drew_progress = true;
        app.apply_progress(p.clone());
    });
    if drew_progress {
        eprintln!();
    }
    app.finish_scan(outcome);

    if let Some(notice) = app.notice.take() {
        return Err(notice.into());
    }

    let mut out = io::stdout().lock();
    for entry in &app.entries {
        let length = if entry.track.duration_seconds > 0.0 {
            format_duration(entry.track.duration())
        } else {
            "--:--".to_string()
        };
        writeln!(out, "{length}  {}", entry.display)?;
    }

    if let Some((reused, extracted)) = app.last_counts {
        info!(
            tracks = app.entries.len(),
            reused,
            extracted,
            "library up to date"
        );
    }
    Ok(())
}
