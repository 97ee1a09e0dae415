//! Interactive remote-store browser.
//!
//! With no arguments the session browses a small built-in in-memory store,
//! handy for trying the commands out. `--root DIR` browses a local
//! directory tree through the same interface instead.

use std::env;
use std::process;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use drivesh::{
    DirStore, MemStore, ProgressCallback, RemoteStore, Repl, Result, TransferProgress,
};

const USAGE: &str = "Usage: drivesh [--root DIR] [--chunk-size BYTES]

Interactive browser for a hierarchical file store.

Options:
  --root, -r DIR      browse the local directory DIR instead of the demo store
  --chunk-size BYTES  transfer chunk size (default 65536)
  -h, --help          print this help";

fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

struct ArgParser {
    args: Vec<String>,
    usage: &'static str,
}

impl ArgParser {
    fn new(usage: &'static str) -> Self {
        let args: Vec<String> = env::args().skip(1).collect();

        if args.iter().any(|a| a == "--help" || a == "-h") {
            println!("{usage}");
            process::exit(0);
        }

        Self { args, usage }
    }

    fn take_value(&mut self, names: &[&str]) -> Option<String> {
        let mut i = 0;
        while i < self.args.len() {
            if names.contains(&self.args[i].as_str()) {
                let value = self.args.get(i + 1).cloned();
                if value.is_none() {
                    usage_and_exit(self.usage);
                }
                self.args.drain(i..=i + 1);
                return value;
            }
            i += 1;
        }
        None
    }

    fn remaining(self) -> Vec<String> {
        self.args
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drivesh=info"));
    // Logs go to stderr; stdout belongs to the prompt and listings.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Seed the demo store browsed when no `--root` is given.
async fn demo_store(chunk_size: usize) -> Result<MemStore> {
    let store = MemStore::new().with_chunk_size(chunk_size);
    let root = store.root().await?;
    let docs = store.make_folder(&root, "docs").await?;
    store
        .put_file(&docs, "readme.txt", b"Welcome to drivesh.\n".to_vec())
        .await?;
    store
        .put_file(&root, "notes.txt", b"scratch space\n".to_vec())
        .await?;
    store.make_folder(&root, "inbox").await?;
    Ok(store)
}

/// Progress renderer: one bar per transfer, cleared when the transfer
/// completes so the total line prints on a clean row.
fn transfer_progress_bar() -> ProgressCallback {
    let mut bar: Option<ProgressBar> = None;
    let mut last_done: u64 = 0;

    Box::new(move |progress: &TransferProgress| {
        // A counter going backwards means a new transfer began while the
        // previous one never reported completion (unknown total).
        if progress.done < last_done {
            if let Some(stale) = bar.take() {
                stale.finish_and_clear();
            }
        }
        last_done = progress.done;

        if bar.is_none() {
            let pb = ProgressBar::new(progress.total.max(1));
            pb.set_style(
                ProgressStyle::with_template(
                    "[{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
            );
            bar = Some(pb);
        }

        if let Some(pb) = &bar {
            if progress.total > 0 {
                pb.set_length(progress.total);
                pb.set_position(progress.done.min(progress.total));
            } else {
                pb.set_length(progress.done.max(1));
                pb.set_position(progress.done);
            }
            pb.set_message(progress.filename.clone());
        }

        if progress.is_complete() {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
            last_done = 0;
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut parser = ArgParser::new(USAGE);
    let root_dir = parser.take_value(&["--root", "-r"]);
    let chunk_size = parser
        .take_value(&["--chunk-size"])
        .map(|s| s.parse::<usize>().unwrap_or_else(|_| usage_and_exit(USAGE)))
        .unwrap_or(0);
    if !parser.remaining().is_empty() {
        usage_and_exit(USAGE);
    }

    let store: Arc<dyn RemoteStore> = match root_dir {
        Some(dir) => {
            info!(dir = %dir, "browsing local directory");
            Arc::new(DirStore::open(&dir).await?.with_chunk_size(chunk_size))
        }
        None => {
            info!("no --root given, browsing the built-in demo store");
            Arc::new(demo_store(chunk_size).await?)
        }
    };

    // An eager root listing surfaces a broken store before the prompt
    // comes up, instead of on the first loop iteration.
    let root = store.root().await?;
    store.list_folder(&root).await?;

    let mut repl = Repl::new(store).await?;
    repl.watch_progress(transfer_progress_bar());
    repl.run().await
}
