//! main.rs
//! Entry point for lsr

pub(crate) mod config;
pub(crate) mod core;
pub(crate) mod icons;
pub(crate) mod render;
pub(crate) mod utils;

use crate::core::collect_batches;
use crate::utils::cli::{CliAction, handle_args};

use std::io::{BufWriter, Write};

fn main() -> std::io::Result<()> {
    let opts = match handle_args() {
        CliAction::List(opts) => opts,
        CliAction::Exit(code) => std::process::exit(code),
    };

    let (batches, errors) = collect_batches(&opts);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut first = true;
    for batch in &batches {
        if !first {
            writeln!(out)?;
        }
        if let Some(label) = &batch.label {
            writeln!(out, "{}:", label)?;
        }
        render::render_batch(&mut out, &batch.entries, &opts)?;
        first = false;
    }
    out.flush()?;

    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
