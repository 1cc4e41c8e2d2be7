//! Authoring definitions for dialog banks.
//!
//! These serde-backed defs are the human-editable form of the model (RON in
//! practice). Ids are raw `u16` values here; `confab_engine`'s loader builds
//! validated runtime [`Dialog`](crate::Dialog)s from them.

use serde::{Deserialize, Serialize};

/// Top-level authored bank of dialogs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BankDef {
    #[serde(default)]
    pub dialogs: Vec<DialogDef>,
}

/// One authored dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogDef {
    pub id: u16,
    #[serde(default)]
    pub title: String,
    pub entry: u16,
    #[serde(default)]
    pub pages: Vec<PageDef>,
}

/// One authored page of NPC text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDef {
    pub id: u16,
    pub text: String,
    #[serde(default)]
    pub responses: Vec<ResponseDef>,
}

/// An authored response; `target: None` ends the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDef {
    pub target: Option<u16>,
    pub text: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}
