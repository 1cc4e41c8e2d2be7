//! Loader utilities for building a registry from authored definitions.
//!
//! Dialog content is authored as RON [`BankDef`] files; the loader parses
//! them, builds validated runtime [`Dialog`]s, and aggregates content
//! diagnostics into a single error so authors see every problem at once.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;

use confab_data::defs::{BankDef, DialogDef, PageDef, ResponseDef};
use confab_data::{Dialog, Id, Page, Response, Target, validate_dialog};

use crate::registry::{Mode, Registry};

/// Load an authored RON bank file into an editable registry.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, or failed validation.
pub fn load_bank_def(path: &Path) -> Result<Registry> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let def: BankDef = ron::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    build_registry(&def)
}

/// Build an editable registry from parsed definitions, validating content.
///
/// Duplicate dialog ids among the definitions resolve last-write-wins, the
/// same as a bulk binary load.
///
/// # Errors
/// Fails when a dialog definition is structurally invalid or its content
/// fails validation; the aggregated diagnostics are listed in the error.
pub fn build_registry(def: &BankDef) -> Result<Registry> {
    let mut registry = Registry::new(Mode::Editable);
    for dialog_def in &def.dialogs {
        let dialog = build_dialog(dialog_def)?;
        let errors = validate_dialog(&dialog);
        if !errors.is_empty() {
            let details = errors
                .iter()
                .map(|err| format!("- {err}"))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("dialog {} failed validation:\n{details}", dialog.id());
        }
        registry.set(dialog.id(), dialog)?;
    }
    info!("{} dialogs built from definitions", registry.len());
    Ok(registry)
}

/// Build a runtime [`Dialog`] from its authored definition.
///
/// # Errors
/// Fails when pages share an id or the entry names no page.
pub fn build_dialog(def: &DialogDef) -> Result<Dialog> {
    let pages = def.pages.iter().map(build_page).collect();
    Dialog::new(Id::from(def.id), def.title.clone(), pages, Id::from(def.entry))
        .with_context(|| format!("building dialog {}", def.id))
}

fn build_page(def: &PageDef) -> Page {
    let responses = def.responses.iter().map(build_response).collect();
    Page::new(Id::from(def.id), def.text.clone(), responses)
}

fn build_response(def: &ResponseDef) -> Response {
    Response {
        target: def.target.map_or(Target::End, Target::from_raw),
        text: def.text.clone(),
        extensions: def.extensions.clone(),
    }
}

/// Lower a runtime dialog back to its authorable definition.
pub fn dialog_to_def(dialog: &Dialog) -> DialogDef {
    DialogDef {
        id: dialog.id().get(),
        title: dialog.title().to_string(),
        entry: dialog.entry().get(),
        pages: dialog
            .pages()
            .map(|page| PageDef {
                id: page.id.get(),
                text: page.text.clone(),
                responses: page
                    .responses
                    .iter()
                    .map(|response| ResponseDef {
                        target: match response.target {
                            Target::Page(id) => Some(id.get()),
                            Target::End => None,
                        },
                        text: response.text.clone(),
                        extensions: response.extensions.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Lower every dialog in a registry to an authorable bank definition.
pub fn registry_to_def(registry: &Registry) -> BankDef {
    BankDef {
        dialogs: registry.iter().map(dialog_to_def).collect(),
    }
}
