//! # profview - Main Entry Point
//!
//! Wires the pipeline end to end: load the raw profile, symbolicate it
//! incrementally against local libraries, fold the pipeline events through
//! the status reducer, and print (or export) the selected thread's call tree.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::sync::Arc;

use profview::analysis::{build_tree, render};
use profview::cli::Args;
use profview::domain::ProfileLoadError;
use profview::host::{ElfSymbolSupplier, EventedSupplier, JsonDirStore};
use profview::profile::Profile;
use profview::status::{reduce, AppState, PipelineEvent};
use profview::symbolication::{symbolicate, SymbolStore};
use tokio::sync::mpsc;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_code_for(&e)
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ProfileLoadError>().is_some() {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let args = Args::parse();

    // Every pipeline event flows through one channel; a drain task folds the
    // reducer over them and logs phase changes.
    let (events, mut rx) = mpsc::unbounded_channel::<PipelineEvent>();
    let drain = tokio::spawn(async move {
        let mut state = AppState::default();
        while let Some(event) = rx.recv().await {
            if let PipelineEvent::LibraryFetchStarted(key) = &event {
                info!("Fetching symbols for {key}");
            }
            let prev = state.phase();
            state = reduce(state, &event);
            if state.phase() != prev {
                info!("Pipeline phase: {}", state.phase());
            }
        }
        state
    });

    let _ = events.send(PipelineEvent::ProfileWaitStarted);

    let profile = Arc::new(
        Profile::from_json_file(&args.profile)
            .with_context(|| format!("Failed to load profile {}", args.profile.display()))?,
    );
    if args.thread >= profile.threads.len() {
        return Err(ProfileLoadError::ThreadOutOfRange {
            index: args.thread,
            count: profile.threads.len(),
        }
        .into());
    }
    let _ = events.send(PipelineEvent::ProfileReceived(Arc::clone(&profile)));

    let store = SymbolStore::new(
        EventedSupplier::new(ElfSymbolSupplier::new(&args.symbol_dir), events.clone()),
        JsonDirStore::new(&args.cache_dir),
    );

    let _ = events.send(PipelineEvent::SymbolicationStarted);
    let step_events = events.clone();
    let final_profile = symbolicate(Arc::clone(&profile), &store, move |snapshot| {
        let _ = step_events.send(PipelineEvent::SymbolicationStep(snapshot));
    })
    .await;
    let _ = events.send(PipelineEvent::SymbolicationFinished);

    let thread = &final_profile.threads[args.thread];
    let tree = build_tree(thread);

    if let Some(path) = &args.export {
        let json = serde_json::to_string_pretty(&tree)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !args.quiet {
            println!("Call tree for thread \"{}\" written to {}", thread.name, path.display());
        }
    } else {
        if !args.quiet {
            println!("Call tree for thread \"{}\" ({} samples):", thread.name, thread.samples.len());
        }
        print!("{}", render(&tree, args.depth_limit));
    }

    drop(events);
    let final_state = drain.await?;
    info!("Final pipeline phase: {}", final_state.phase());
    Ok(())
}
