// SPDX-License-Identifier: MIT
//
// n-modal — drive the modal dispatch core from the command line.
//
// This is the binary that wires the crates together:
//
//   n-dispatch → modes, key bindings, actions, transition hooks
//   n-editor   → rope text with checkpoints, multi-cursor view
//
// A run loads a file, installs the default bindings, applies an rc file,
// feeds a key sequence and prints where the editor ended up:
//
//   --keys → Vis::keys → bindings / mode input hooks → EditorView
//   stdout ← final mode + text
//
// Logs go to stderr, filtered by N_MODAL_LOG (or RUST_LOG), default `warn`.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use n_dispatch::{Config, Vis, Window, builtin};
use n_editor::{EditorView, SharedView, Text};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "N_MODAL_LOG";

#[derive(Parser, Debug)]
#[command(name = "n-modal", version, about = "Feed keys to a modal editor core")]
struct Cli {
    /// File to load (empty text if omitted)
    file: Option<PathBuf>,

    /// rc file with `map`, `unmap` and `set` directives
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keys to feed, e.g. `ihello<Escape>`
    #[arg(short, long, default_value = "")]
    keys: String,

    /// Print every mode's bindings instead of running keys
    #[arg(long)]
    list: bool,
}

fn init_logging() {
    let filter = env::var(LOG_ENV)
        .or_else(|_| env::var("RUST_LOG"))
        .map_or_else(|_| EnvFilter::new("warn"), EnvFilter::new);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_bindings(vis: &Vis, out: &mut impl Write) -> io::Result<()> {
    for mode in vis.modes().iter() {
        match mode.parent {
            Some(parent) => writeln!(out, "{} (falls back to {}):", mode.name, vis.modes()[parent].name)?,
            None => writeln!(out, "{}:", mode.name)?,
        }
        for (key, binding) in vis.bindings(mode.id) {
            writeln!(out, "  {key:<12} {}", binding.describe())?;
        }
        for (key, binding) in vis.window_bindings(mode.id) {
            writeln!(out, "  {key:<12} {} (window)", binding.describe())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let text = match &cli.file {
        Some(path) => Text::from_file(path).with_context(|| format!("cannot open {}", path.display()))?,
        None => Text::new(),
    };
    let view = SharedView::new(EditorView::new(text));
    let mut vis = Vis::new(Window::new(Box::new(view.clone())));
    vis.on_status(|mode| info!(mode = mode.name, "mode changed"));

    builtin::bind_defaults(&mut vis).context("installing default bindings")?;
    if let Some(rc) = &cli.config {
        Config::load(rc)?.apply(&mut vis)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        print_bindings(&vis, &mut out)?;
        return Ok(());
    }

    debug!(keys = cli.keys.as_str(), "feeding keys");
    vis.keys(&cli.keys);
    vis.keys_flush();

    writeln!(out, "-- {} --", vis.current())?;
    write!(out, "{}", view.borrow().text())?;
    out.flush()?;
    Ok(())
}
