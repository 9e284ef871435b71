//! SyncEngine implementation
//!
//! The SyncEngine moves state between a mapped object graph and the
//! document held by a [`DocumentStore`]. `load` fills the object from the
//! document, `save` rebuilds the document from the object.

use confsync_document::{Document, DocumentStore, Table, Value};

use super::converter::ObjectConverter;
use crate::error::{Error, Result};
use crate::ledger::RetentionLedger;
use crate::resolver::{FieldDescriptor, MetadataResolver, Translator};
use crate::schema::{Configurable, Object};

/// Engine for synchronizing one object graph with one document
///
/// The engine holds no state between passes other than its store; the
/// [`RetentionLedger`] returned by [`load`](Self::load) is handed back to
/// [`save`](Self::save) by the caller.
#[derive(Debug)]
pub struct SyncEngine<S> {
    store: S,
    translator: Translator,
}

impl<S: DocumentStore> SyncEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            translator: Translator::identity(),
        }
    }

    /// Use `translator` for default values and comments
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The document as of the last load or save
    pub fn document(&self) -> &Document {
        self.store.document()
    }

    fn resolver(&self) -> MetadataResolver {
        MetadataResolver::new(self.store.format(), self.translator.clone())
    }

    /// Read the backing document and populate `object` from it.
    ///
    /// Keys absent from the document leave the matching fields untouched.
    /// Returns the guarded keys that were absent, for the following save.
    ///
    /// # Errors
    ///
    /// Fails with `DocumentParse` or `Store` when the document cannot be
    /// read, `Mapping` when a value does not fit its field, and
    /// `ConverterInstantiation` when a declared converter cannot be built.
    /// Fields populated before the failure keep their new values.
    pub fn load(&mut self, object: &mut dyn Object) -> Result<RetentionLedger> {
        self.store.load()?;

        let resolver = self.resolver();
        let mut ledger = RetentionLedger::new();
        load_object(&resolver, self.store.document(), object, "", &mut ledger)?;

        tracing::debug!(
            object = object.type_name(),
            hidden = ledger.len(),
            "Loaded object from document"
        );
        Ok(ledger)
    }

    /// Rebuild the document from `object` and persist it.
    ///
    /// Leaf fields without a value receive their default, in the document
    /// and in the object. Keys recorded in `ledger` are dropped unless
    /// their guard is `true` in the rebuilt document.
    ///
    /// # Errors
    ///
    /// Fails with `Mapping`, `ConverterInstantiation` or `Store`; the
    /// backing document is not written unless the walk succeeds.
    pub fn save(&mut self, object: &mut dyn Object, ledger: &RetentionLedger) -> Result<()> {
        let resolver = self.resolver();
        self.store.clear();
        save_object(&resolver, self.store.document_mut(), object, "")?;

        let document = self.store.document_mut();
        for (guard, dependent) in ledger.entries() {
            if matches!(document.get(guard), Some(Value::Bool(true))) {
                continue;
            }
            if document.remove(dependent).is_some() {
                tracing::trace!(guard, key = dependent, "Dropped guarded key");
            }
        }

        self.store.save()?;
        tracing::debug!(object = object.type_name(), "Saved object to document");
        Ok(())
    }

    /// Load, let the object correct itself, then save.
    pub fn load_and_correct<T: Configurable>(&mut self, value: &mut T) -> Result<RetentionLedger> {
        let ledger = self.load(value)?;
        value.between_load_and_save();
        self.save(value, &ledger)?;
        Ok(ledger)
    }
}

/// Resolve a guard declared on the field at `full_path`.
///
/// Guards starting with `.` are relative to the field's parent table;
/// anything else is already absolute.
///
/// # Examples
///
/// ```
/// use confsync_core::sync::resolve_guard;
///
/// assert_eq!(resolve_guard(".enabled", "network.proxy.port"), "network.proxy.enabled");
/// assert_eq!(resolve_guard(".enabled", "port"), "enabled");
/// assert_eq!(resolve_guard("debug", "network.proxy.port"), "debug");
/// ```
pub fn resolve_guard(guard: &str, full_path: &str) -> String {
    match guard.strip_prefix('.') {
        Some(relative) => match full_path.rsplit_once('.') {
            Some((parent, _)) => format!("{parent}.{relative}"),
            None => relative.to_string(),
        },
        None => guard.to_string(),
    }
}

fn load_object(
    resolver: &MetadataResolver,
    document: &Document,
    object: &mut dyn Object,
    prefix: &str,
    ledger: &mut RetentionLedger,
) -> Result<()> {
    let descriptors = resolver.resolve_all(object)?;
    ObjectConverter::to_object(document, prefix, object, &descriptors)?;

    for desc in &descriptors {
        let full = format!("{prefix}{}", desc.path);

        if let Some(guard) = desc.only_if
            && !document.contains(&full)
        {
            ledger.record(resolve_guard(guard, &full), full.clone());
        }

        if !desc.break_down {
            continue;
        }
        // An absent sub-document is still walked so that guarded keys
        // below it are recorded
        let table = match document.get(&full) {
            Some(Value::Table(table)) => Some(table),
            Some(other) => {
                tracing::trace!(key = %full, found = %other.value_type(), "Skipping non-table value");
                continue;
            }
            None => None,
        };

        // Empty slot (e.g. `Option::None`): build it from the whole table first
        if let Some(table) = table
            && object.object_mut(desc.index).is_none()
        {
            object
                .write(desc.index, Value::Table(table.clone()), None)
                .map_err(|e| Error::mapping(&full, e))?;
        }
        if let Some(nested) = object.object_mut(desc.index) {
            load_object(resolver, document, nested, &format!("{full}."), ledger)?;
        }
    }
    Ok(())
}

/// Rebuild the keys of `object` under `prefix`, one field at a time in
/// declaration order.
fn save_object(
    resolver: &MetadataResolver,
    document: &mut Document,
    object: &mut dyn Object,
    prefix: &str,
) -> Result<()> {
    let descriptors = resolver.resolve_all(object)?;

    for desc in &descriptors {
        let full = format!("{prefix}{}", desc.path);

        if desc.break_down {
            if let Some(nested) = object.object_mut(desc.index) {
                if !document.contains(&full) {
                    document.set(&full, Table::new())?;
                }
                save_object(resolver, document, nested, &format!("{full}."))?;
            }
        } else {
            ObjectConverter::to_document(object, document, prefix, std::slice::from_ref(desc))?;
            if let Some(default) = &desc.default_value
                && !document.contains(&full)
            {
                apply_default(document, object, desc, &full, default)?;
            }
            align_elements(resolver, document, object, desc, &full)?;
        }

        if let Some(comment) = &desc.comment
            && document.contains(&full)
        {
            document.set_comment(&full, comment);
        }
    }
    Ok(())
}

/// Write `default` into the field, then store the field's own rendering of
/// it so the document holds a typed value.
fn apply_default(
    document: &mut Document,
    object: &mut dyn Object,
    desc: &FieldDescriptor,
    full: &str,
    default: &str,
) -> Result<()> {
    object
        .write(desc.index, Value::from(default), desc.converter.as_ref())
        .map_err(|e| Error::mapping(full, e))?;
    let value = object
        .read(desc.index, desc.converter.as_ref())
        .map_err(|e| Error::mapping(full, e))?
        .unwrap_or_else(|| Value::from(default));

    tracing::trace!(key = full, %value, "Applied default");
    document.set(full, value)?;
    Ok(())
}

/// Pair the elements of a collection field with the tables stored for it.
///
/// Pairs are walked by position up to the shorter of the two sequences;
/// each paired table is rebuilt from its element.
fn align_elements(
    resolver: &MetadataResolver,
    document: &mut Document,
    object: &mut dyn Object,
    desc: &FieldDescriptor,
    full: &str,
) -> Result<()> {
    let stored = match document.get(full) {
        Some(Value::Array(items)) => items.len(),
        _ => return Ok(()),
    };
    let elements = object.objects_mut(desc.index);
    if elements.is_empty() {
        return Ok(());
    }
    if elements.len() != stored {
        tracing::debug!(
            key = full,
            objects = elements.len(),
            stored,
            "Collection length differs from document, extra elements skipped"
        );
    }

    for (k, element) in elements.into_iter().take(stored).enumerate() {
        let slot = format!("{full}[{k}]");
        document.set(&slot, Table::new())?;
        save_object(resolver, document, element, &format!("{slot}."))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use confsync_document::{Format, MemoryDocument};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(".enabled", "network.proxy.port", "network.proxy.enabled")]
    #[case(".enabled", "port", "enabled")]
    #[case("feature.on", "a.b", "feature.on")]
    #[case(".on", "items[1].name", "items[1].on")]
    fn test_resolve_guard(#[case] guard: &str, #[case] full: &str, #[case] expected: &str) {
        assert_eq!(resolve_guard(guard, full), expected);
    }

    #[derive(Debug, Default)]
    struct Flags {
        enabled: Option<bool>,
        level: Option<u8>,
    }

    crate::mapped! {
        Flags {
            enabled: "enabled" [default_value = "false"],
            level: "level" [default_value = "2", only_if = "enabled"],
        }
    }

    #[test]
    fn test_guarded_default_is_hidden() {
        let mut engine = SyncEngine::new(MemoryDocument::new(Format::Toml));
        let mut flags = Flags::default();

        let ledger = engine.load(&mut flags).unwrap();
        assert!(ledger.contains("enabled", "level"));

        engine.save(&mut flags, &ledger).unwrap();
        assert_eq!(engine.store().source(), "enabled = false\n");
        assert_eq!(flags.level, Some(2));
    }

    #[test]
    fn test_default_is_typed_in_document() {
        let mut engine = SyncEngine::new(MemoryDocument::new(Format::Json));
        let mut flags = Flags::default();

        engine.save(&mut flags, &RetentionLedger::new()).unwrap();
        assert_eq!(engine.document().get("level"), Some(&Value::Integer(2)));
        assert_eq!(engine.document().get("enabled"), Some(&Value::Bool(false)));
    }

    #[derive(Debug, Default, Clone)]
    struct Item {
        name: Option<String>,
        weight: Option<i64>,
    }

    #[derive(Debug, Default)]
    struct Bag {
        items: Vec<Item>,
    }

    crate::mapped! {
        Item {
            name: "name",
            weight: "weight" [default_value = "1"],
        }

        Bag {
            items: "items",
        }
    }

    #[test]
    fn test_alignment_stops_at_shorter_sequence() {
        let resolver = MetadataResolver::new(Format::Toml, Translator::identity());
        let mut document = Document::new();
        let stored = vec![Value::Table(Table::new()), Value::Table(Table::new())];
        document.set("items", Value::Array(stored)).unwrap();

        let mut bag = Bag {
            items: vec![Item::default(); 3],
        };
        let descriptors = resolver.resolve_all(&bag).unwrap();
        align_elements(&resolver, &mut document, &mut bag, &descriptors[0], "items").unwrap();

        assert_eq!(document.get("items[0].weight"), Some(&Value::Integer(1)));
        assert_eq!(document.get("items[1].weight"), Some(&Value::Integer(1)));
        assert_eq!(document.get("items").and_then(Value::as_array).map(|items| items.len()), Some(2));
        assert_eq!(bag.items[0].weight, Some(1));
        assert_eq!(bag.items[1].weight, Some(1));
        assert_eq!(bag.items[2].weight, None);
    }

    #[test]
    fn test_collection_defaults_on_save() {
        let mut engine = SyncEngine::new(MemoryDocument::new(Format::Toml));
        let mut bag = Bag {
            items: vec![
                Item {
                    name: Some("a".to_string()),
                    weight: Some(5),
                },
                Item {
                    name: Some("b".to_string()),
                    weight: None,
                },
            ],
        };

        engine.save(&mut bag, &RetentionLedger::new()).unwrap();

        assert_eq!(engine.document().get("items[0].weight"), Some(&Value::Integer(5)));
        assert_eq!(engine.document().get("items[1].weight"), Some(&Value::Integer(1)));
        assert_eq!(bag.items[1].weight, Some(1));
    }

    #[derive(Debug, Default)]
    struct Entry {
        rank: Option<i64>,
        label: Option<String>,
    }

    #[derive(Debug, Default)]
    struct Board {
        entries: Vec<Entry>,
    }

    crate::mapped! {
        Entry {
            rank: "rank" [default_value = "0"],
            label: "label",
        }

        Board {
            entries: "entries",
        }
    }

    #[test]
    fn test_element_defaults_keep_declaration_order() {
        let mut engine = SyncEngine::new(MemoryDocument::new(Format::Json));
        let mut board = Board {
            entries: vec![Entry {
                rank: None,
                label: Some("a".to_string()),
            }],
        };

        engine.save(&mut board, &RetentionLedger::new()).unwrap();
        let first = engine.store().source().to_string();
        engine.save(&mut board, &RetentionLedger::new()).unwrap();

        assert_eq!(engine.store().source(), first);
        let element = engine.document().get("entries[0]").and_then(Value::as_table).unwrap();
        assert_eq!(element.keys().collect::<Vec<_>>(), ["rank", "label"]);
    }
}
