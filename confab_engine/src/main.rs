#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Confab **
//! Dialog bank toolkit: check, pack, and unpack NPC dialog banks.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use log::info;

use confab_data::{Id, validate_dialog};
use confab_engine::loader::{load_bank_def, registry_to_def};
use confab_engine::{Mode, load_bank, save_bank};

const USAGE: &str = "usage:
  confab check <bank> [dialog-id]   validate dialogs in a binary bank
  confab pack <defs.ron> <bank>     compile authored RON defs into a bank
  confab unpack <bank> <defs.ron>   lower a bank back to editable RON";

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        },
    }
}

fn run() -> Result<bool> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, bank] if cmd == "check" => check(Path::new(bank), None),
        [cmd, bank, id] if cmd == "check" => {
            let id: Id = id.parse().context("parsing dialog id argument")?;
            check(Path::new(bank), Some(id))
        },
        [cmd, input, output] if cmd == "pack" => {
            pack(Path::new(input), Path::new(output))?;
            Ok(true)
        },
        [cmd, input, output] if cmd == "unpack" => {
            unpack(Path::new(input), Path::new(output))?;
            Ok(true)
        },
        _ => {
            eprintln!("{USAGE}");
            Ok(false)
        },
    }
}

/// Validate every dialog in a bank (or just one), printing a report.
/// Returns whether the checked content is clean.
fn check(path: &Path, only: Option<Id>) -> Result<bool> {
    let registry = load_bank(path, Mode::ReadOnly)?;
    if let Some(id) = only
        && !registry.exists(id)
    {
        bail!("dialog {id} not found in {}", path.display());
    }

    let mut problem_count = 0usize;
    for dialog in registry.iter() {
        if only.is_some_and(|id| id != dialog.id()) {
            continue;
        }
        let errors = validate_dialog(dialog);
        if errors.is_empty() {
            println!(
                "{} dialog {} \"{}\" ({} pages)",
                "ok".green(),
                dialog.id(),
                dialog.title().bold(),
                dialog.page_count()
            );
        } else {
            println!(
                "{} dialog {} \"{}\"",
                "FAIL".red().bold(),
                dialog.id(),
                dialog.title().bold()
            );
            for err in &errors {
                println!("  - {err}");
            }
            problem_count += errors.len();
        }
    }

    if problem_count > 0 {
        println!("{}", format!("{problem_count} problem(s) found").red());
    }
    Ok(problem_count == 0)
}

/// Compile an authored RON bank definition into a binary bank file.
fn pack(input: &Path, output: &Path) -> Result<()> {
    let registry = load_bank_def(input)?;
    save_bank(output, &registry)?;
    info!("packed {} into {}", input.display(), output.display());
    println!(
        "packed {} dialog(s) into {}",
        registry.len(),
        output.display().to_string().bold()
    );
    Ok(())
}

/// Lower a binary bank back to editable RON for inspection.
fn unpack(input: &Path, output: &Path) -> Result<()> {
    let registry = load_bank(input, Mode::ReadOnly)?;
    let def = registry_to_def(&registry);
    let pretty = ron::ser::to_string_pretty(&def, ron::ser::PrettyConfig::default())
        .context("serializing bank definitions")?;
    fs::write(output, pretty).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "unpacked {} dialog(s) into {}",
        registry.len(),
        output.display().to_string().bold()
    );
    Ok(())
}
