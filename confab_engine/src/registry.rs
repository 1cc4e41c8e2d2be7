//! Sparse, id-addressed registry of dialogs.
//!
//! Storage is a slot vector indexed directly by the numeric id value: holes
//! are meaningful ("no dialog here"), ids stay dense enough in authored
//! content that direct indexing beats a hash map, and ascending-order scans
//! for save come for free.

use confab_data::{Dialog, Id};
use log::{info, warn};
use thiserror::Error;

use crate::codec::{NodeReader, NodeWriter, WireError};
use crate::wire;

/// Whether a registry accepts mutation after construction.
///
/// The mode is fixed for the registry's lifetime. A `ReadOnly` registry is
/// populated once by [`Registry::load`] and can then be shared freely across
/// reader threads; an `Editable` registry targets single-writer authoring
/// tools and performs no internal locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadOnly,
    Editable,
}

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Mutation attempted on a read-only registry. A programmer error:
    /// nothing on the runtime path should ever reach a mutating entry point.
    #[error("registry is read-only")]
    ReadOnly,
    /// An explicit insert collided with an existing dialog id.
    #[error("dialog id {0} is already taken (use set to overwrite)")]
    Duplicate(Id),
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// All dialogs known to the game, addressed directly by [`Id`].
#[derive(Debug)]
pub struct Registry {
    slots: Vec<Option<Dialog>>,
    mode: Mode,
}

impl Registry {
    /// Create an empty registry in the given mode.
    pub fn new(mode: Mode) -> Self {
        Self { slots: Vec::new(), mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Look up a dialog. Absence is an expected condition, not an error.
    pub fn get(&self, id: Id) -> Option<&Dialog> {
        self.slots.get(usize::from(id.get()))?.as_ref()
    }

    /// Cheap presence probe.
    pub fn exists(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    /// Number of dialogs present (holes excluded).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// All present dialogs in ascending slot (id) order.
    pub fn iter(&self) -> impl Iterator<Item = &Dialog> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Insert a dialog at the slot named by its own id.
    ///
    /// # Errors
    /// [`RegistryError::Duplicate`] when the slot is occupied;
    /// [`RegistryError::ReadOnly`] outside editable mode.
    pub fn insert(&mut self, dialog: Dialog) -> Result<(), RegistryError> {
        self.ensure_editable()?;
        let id = dialog.id();
        let slot = self.slot_mut(id);
        if slot.is_some() {
            return Err(RegistryError::Duplicate(id));
        }
        *slot = Some(dialog);
        Ok(())
    }

    /// Insert or replace the dialog at `id`, returning what was there.
    ///
    /// # Errors
    /// [`RegistryError::ReadOnly`] outside editable mode.
    pub fn set(&mut self, id: Id, dialog: Dialog) -> Result<Option<Dialog>, RegistryError> {
        self.ensure_editable()?;
        Ok(self.slot_mut(id).replace(dialog))
    }

    /// Remove and return the dialog at `id`, leaving a hole.
    ///
    /// # Errors
    /// [`RegistryError::ReadOnly`] outside editable mode.
    pub fn remove(&mut self, id: Id) -> Result<Option<Dialog>, RegistryError> {
        self.ensure_editable()?;
        let removed = self
            .slots
            .get_mut(usize::from(id.get()))
            .and_then(Option::take);
        self.compact();
        Ok(removed)
    }

    /// Rebuild the store so every dialog sits at the slot matching its own
    /// declared id, recovering from any slot/id mismatch left behind by
    /// authoring edits (e.g. `set` under a different id).
    ///
    /// # Errors
    /// [`RegistryError::ReadOnly`] outside editable mode.
    pub fn reorganize(&mut self) -> Result<(), RegistryError> {
        self.ensure_editable()?;
        let dialogs: Vec<Dialog> = self.slots.drain(..).flatten().collect();
        for dialog in dialogs {
            let id = dialog.id();
            let slot = self.slot_mut(id);
            if slot.is_some() {
                warn!("reorganize: duplicate dialog id {id}, keeping the later record");
            }
            *slot = Some(dialog);
        }
        self.compact();
        Ok(())
    }

    /// Populate a fresh registry from a serialized stream.
    ///
    /// The registry is fully built before it is returned, so a failing load
    /// publishes nothing. Duplicate ids among the records resolve
    /// last-write-wins.
    ///
    /// # Errors
    /// Wire-level failures: truncated input, invalid strings, or a dialog
    /// record violating the entry-page invariant.
    pub fn load(mode: Mode, reader: &mut impl NodeReader) -> Result<Self, RegistryError> {
        let mut registry = Registry::new(mode);
        let count = reader.node_count()?;
        for _ in 0..count {
            let dialog = wire::read_dialog(reader)?;
            let id = dialog.id();
            let slot = registry.slot_mut(id);
            if slot.is_some() {
                warn!("duplicate dialog id {id} in stream, keeping the later record");
            }
            *slot = Some(dialog);
        }
        registry.compact();
        info!("registry loaded with {} dialogs", registry.len());
        Ok(registry)
    }

    /// Serialize every present dialog in ascending-id order, skipping holes,
    /// so output for unchanged content is deterministic.
    ///
    /// # Errors
    /// [`RegistryError::ReadOnly`] outside editable mode (save belongs to
    /// the authoring surface); otherwise wire-level failures.
    pub fn save(&self, writer: &mut impl NodeWriter) -> Result<(), RegistryError> {
        self.ensure_editable()?;
        writer.begin_nodes(wire::node_len(self.len())?)?;
        for dialog in self.iter() {
            wire::write_dialog(dialog, writer)?;
        }
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), RegistryError> {
        match self.mode {
            Mode::Editable => Ok(()),
            Mode::ReadOnly => Err(RegistryError::ReadOnly),
        }
    }

    fn slot_mut(&mut self, id: Id) -> &mut Option<Dialog> {
        let index = usize::from(id.get());
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        &mut self.slots[index]
    }

    /// Trim trailing holes and give back spare capacity.
    fn compact(&mut self) {
        while self.slots.last().is_some_and(Option::is_none) {
            self.slots.pop();
        }
        self.slots.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BinReader, BinWriter};
    use confab_data::{Page, Response, Target};
    use std::io::Cursor;

    fn dialog(id: u16, title: &str) -> Dialog {
        let page = Page::new(Id::from(1), "Hello", vec![Response::new(Target::End, "Bye")]);
        Dialog::new(Id::from(id), title, vec![page], Id::from(1)).unwrap()
    }

    #[test]
    fn get_and_exists_respect_holes() {
        let mut registry = Registry::new(Mode::Editable);
        registry.insert(dialog(5, "Five")).unwrap();
        registry.insert(dialog(9, "Nine")).unwrap();

        assert!(registry.exists(Id::from(5)));
        assert!(registry.exists(Id::from(9)));
        assert!(!registry.exists(Id::from(7)));
        assert!(registry.get(Id::from(7)).is_none());
        assert!(registry.get(Id::from(400)).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn insert_rejects_duplicates_but_set_overwrites() {
        let mut registry = Registry::new(Mode::Editable);
        registry.insert(dialog(5, "First")).unwrap();
        assert!(matches!(
            registry.insert(dialog(5, "Second")),
            Err(RegistryError::Duplicate(id)) if id == Id::from(5)
        ));
        assert_eq!(registry.get(Id::from(5)).unwrap().title(), "First");

        let previous = registry.set(Id::from(5), dialog(5, "Second")).unwrap();
        assert_eq!(previous.unwrap().title(), "First");
        assert_eq!(registry.get(Id::from(5)).unwrap().title(), "Second");
    }

    #[test]
    fn read_only_mutations_fail_without_side_effects() {
        let mut writer = BinWriter::new(Vec::new());
        {
            let mut editable = Registry::new(Mode::Editable);
            editable.insert(dialog(5, "Keep")).unwrap();
            editable.save(&mut writer).unwrap();
        }
        let mut reader = BinReader::new(Cursor::new(writer.into_inner()));
        let mut registry = Registry::load(Mode::ReadOnly, &mut reader).unwrap();

        assert!(matches!(registry.insert(dialog(6, "New")), Err(RegistryError::ReadOnly)));
        assert!(matches!(
            registry.set(Id::from(5), dialog(5, "Replaced")),
            Err(RegistryError::ReadOnly)
        ));
        assert!(matches!(registry.remove(Id::from(5)), Err(RegistryError::ReadOnly)));
        assert!(matches!(registry.reorganize(), Err(RegistryError::ReadOnly)));
        assert!(matches!(
            registry.save(&mut BinWriter::new(Vec::new())),
            Err(RegistryError::ReadOnly)
        ));

        // prior state untouched
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(Id::from(5)).unwrap().title(), "Keep");
        assert!(!registry.exists(Id::from(6)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut source = Registry::new(Mode::Editable);
        source.insert(dialog(2, "Two")).unwrap();
        source.insert(dialog(40, "Forty")).unwrap();

        let mut writer = BinWriter::new(Vec::new());
        source.save(&mut writer).unwrap();
        let mut reader = BinReader::new(Cursor::new(writer.into_inner()));
        let reloaded = Registry::load(Mode::ReadOnly, &mut reader).unwrap();

        assert_eq!(reloaded.len(), 2);
        for id in [2u16, 40] {
            assert_eq!(reloaded.get(Id::from(id)), source.get(Id::from(id)));
        }
        assert!(!reloaded.exists(Id::from(3)));
    }

    #[test]
    fn duplicate_ids_in_stream_resolve_last_write_wins() {
        let mut writer = BinWriter::new(Vec::new());
        writer.begin_nodes(2).unwrap();
        wire::write_dialog(&dialog(5, "Early"), &mut writer).unwrap();
        wire::write_dialog(&dialog(5, "Late"), &mut writer).unwrap();

        let mut reader = BinReader::new(Cursor::new(writer.into_inner()));
        let registry = Registry::load(Mode::ReadOnly, &mut reader).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(Id::from(5)).unwrap().title(), "Late");
    }

    #[test]
    fn truncated_stream_publishes_nothing() {
        let mut writer = BinWriter::new(Vec::new());
        writer.begin_nodes(3).unwrap(); // promises records that never come
        wire::write_dialog(&dialog(1, "Only"), &mut writer).unwrap();

        let mut reader = BinReader::new(Cursor::new(writer.into_inner()));
        assert!(Registry::load(Mode::ReadOnly, &mut reader).is_err());
    }

    #[test]
    fn reorganize_moves_dialogs_to_declared_slots() {
        let mut registry = Registry::new(Mode::Editable);
        // slot 9 holds a dialog that declares id 3
        registry.set(Id::from(9), dialog(3, "Misfiled")).unwrap();
        assert!(registry.exists(Id::from(9)));
        assert!(!registry.exists(Id::from(3)));

        registry.reorganize().unwrap();
        assert!(registry.exists(Id::from(3)));
        assert!(!registry.exists(Id::from(9)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_leaves_a_hole() {
        let mut registry = Registry::new(Mode::Editable);
        registry.insert(dialog(2, "Two")).unwrap();
        registry.insert(dialog(4, "Four")).unwrap();

        let removed = registry.remove(Id::from(2)).unwrap();
        assert_eq!(removed.unwrap().title(), "Two");
        assert!(!registry.exists(Id::from(2)));
        assert!(registry.exists(Id::from(4)));
        assert!(registry.remove(Id::from(2)).unwrap().is_none());
    }
}
