//! Interactive session loop.
//!
//! One command runs to completion, transfer included, before the next
//! prompt. Every failure inside an iteration is printed and the loop
//! continues; only end-of-input on the prompt ends the session.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::command::{self, Command};
use crate::error::Result;
use crate::nav::Navigator;
use crate::progress::{make_byte_counter, ProgressCallback};
use crate::transfer::{download_to_path, upload_from_path};
use crate::vfs::{format_size, Node, RemoteStore};

const HELP_TEXT: &str = "\
Commands:
* cd <index> -- change directory
* mkfile <filename> -- create new file
* up <index> <src path> -- upload content from <src path> to file <index>
* dl <index> <dest path> -- download content from file <index> and put it into <dest path>
* help -- print this help";

/// The interactive browser session.
pub struct Repl {
    nav: Navigator,
    progress: ProgressCallback,
}

impl Repl {
    /// Start a session over `store`, positioned at its root.
    pub async fn new(store: Arc<dyn RemoteStore>) -> Result<Self> {
        Ok(Self {
            nav: Navigator::new(store).await?,
            progress: make_byte_counter(),
        })
    }

    /// Replace the progress renderer used during transfers.
    pub fn watch_progress(&mut self, callback: ProgressCallback) {
        self.progress = callback;
    }

    /// The session's navigation state.
    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    /// Run the prompt loop until end-of-input.
    pub async fn run(&mut self) -> Result<()> {
        println!("{HELP_TEXT}");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            // A failed listing is printed like any other error, but the
            // prompt still comes up with an empty listing, so `cd 0` can
            // move the session out of a broken folder.
            if let Err(e) = self.nav.list_current().await {
                println!("Error: {e}");
            }
            print!("{}", render_listing(self.nav.listing()));
            println!();

            print!("> ");
            let _ = std::io::stdout().flush();

            match lines.next_line().await? {
                Some(line) => {
                    if let Err(e) = self.step(&line).await {
                        println!("Error: {e}");
                    }
                }
                None => break,
            }
        }
        debug!("input stream closed, session over");
        Ok(())
    }

    async fn step(&mut self, line: &str) -> Result<()> {
        let parsed = command::parse(line)?;
        self.dispatch(parsed).await
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Chdir(0) => self.nav.go_to_parent().await,
            Command::Chdir(index) => self.nav.enter(index),
            Command::Download { index, dest } => {
                let store = Arc::clone(self.nav.store());
                let node = self.nav.entry(index)?.clone();
                let total =
                    download_to_path(&store, &node, &dest, Some(&mut self.progress)).await?;
                println!("\rtotal bytes downloaded: {total}");
                Ok(())
            }
            Command::Upload { index, src } => {
                let store = Arc::clone(self.nav.store());
                let node = self.nav.entry(index)?.clone();
                let total =
                    upload_from_path(&store, &node, &src, 0, Some(&mut self.progress)).await?;
                println!("\rtotal bytes uploaded: {total}");
                Ok(())
            }
            Command::Mkfile(name) => {
                let store = Arc::clone(self.nav.store());
                let folder = self.nav.current().clone();
                store.create_file(&folder, &name).await?;
                Ok(())
            }
            Command::Help => {
                println!("{HELP_TEXT}");
                Ok(())
            }
        }
    }
}

/// Render a listing with the synthetic go-up entry at position 0.
/// Folders are prefixed, files carry a human-readable size.
pub fn render_listing(listing: &[Node]) -> String {
    let mut out = String::from("0. <go up>\n");
    for (i, node) in listing.iter().enumerate() {
        if node.is_folder() {
            out.push_str(&format!("{}. (dir) {}\n", i + 1, node.name));
        } else {
            out.push_str(&format!(
                "{}. {} ({})\n",
                i + 1,
                node.name,
                format_size(node.size)
            ));
        }
    }
    out
}
