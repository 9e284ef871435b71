//! Metadata resolution
//!
//! Turns the static [`FieldMeta`] of one field into the [`FieldDescriptor`]
//! a walk acts on: the breakdown decision for the active format, translated
//! default and comment, the guard key and a converter instance. Descriptors
//! are rebuilt on every walk and never cached.

use std::fmt;
use std::sync::Arc;

use confsync_document::{Format, ValueType};

use crate::convert::ConverterInstance;
use crate::error::{Error, Result};
use crate::schema::{FieldMeta, Object};

/// Maps declared default and comment text to the text that is written.
#[derive(Clone)]
pub struct Translator(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Translator {
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Returns every text unchanged
    pub fn identity() -> Self {
        Self::new(str::to_string)
    }

    pub fn translate(&self, text: &str) -> String {
        (self.0)(text)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Translator")
    }
}

/// Resolved metadata for one field of one object
#[derive(Debug)]
pub struct FieldDescriptor {
    /// Position of the field in its type's field table
    pub index: usize,
    /// Key relative to the parent table
    pub path: &'static str,
    pub break_down: bool,
    pub default_value: Option<String>,
    pub comment: Option<String>,
    pub only_if: Option<&'static str>,
    pub converter: Option<ConverterInstance>,
}

/// Resolves field descriptors against one document format
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    format: Format,
    translator: Translator,
}

impl MetadataResolver {
    pub fn new(format: Format, translator: Translator) -> Self {
        Self { format, translator }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Resolve the field at `index` of `object`.
    ///
    /// # Errors
    ///
    /// Returns `ConverterInstantiation` when the declared converter cannot
    /// be constructed.
    pub fn resolve(&self, object: &dyn Object, index: usize) -> Result<FieldDescriptor> {
        let meta = object.field(index);
        let format = self.format;
        Ok(FieldDescriptor {
            index,
            path: meta.path(),
            break_down: is_break_down(meta, |ty| format.supports_type(ty)),
            default_value: default_value(meta, &self.translator),
            comment: comment(meta, &self.translator),
            only_if: guard_path(meta),
            converter: resolve_converter(object, index)?,
        })
    }

    /// Resolve every field of `object` in declaration order.
    pub fn resolve_all(&self, object: &dyn Object) -> Result<Vec<FieldDescriptor>> {
        (0..object.field_count())
            .map(|index| self.resolve(object, index))
            .collect()
    }
}

/// Whether the field is walked as a nested table rather than copied as a value.
///
/// True when forced, or when the format cannot hold the field's type and no
/// converter is declared.
pub fn is_break_down(meta: &FieldMeta, natively_representable: impl Fn(ValueType) -> bool) -> bool {
    meta.force_breakdown() || (!meta.has_converter() && !natively_representable(meta.value_type()))
}

pub fn default_value(meta: &FieldMeta, translator: &Translator) -> Option<String> {
    meta.default_value().map(|text| translator.translate(text))
}

pub fn comment(meta: &FieldMeta, translator: &Translator) -> Option<String> {
    meta.comment().map(|text| translator.translate(text))
}

pub fn guard_path(meta: &FieldMeta) -> Option<&'static str> {
    meta.only_if()
}

/// Instantiate the converter declared for the field at `index`.
pub fn resolve_converter(object: &dyn Object, index: usize) -> Result<Option<ConverterInstance>> {
    object.instantiate_converter(index).map_err(|e| {
        let meta = object.field(index);
        Error::ConverterInstantiation {
            path: meta.path().to_string(),
            converter: meta.converter().unwrap_or("<none>"),
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ConvertError, Converter};
    use confsync_document::Value;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Debug, Default)]
    struct Inner {
        flag: bool,
    }

    struct Broken;

    impl Converter for Broken {
        type Field = String;

        fn instantiate() -> std::result::Result<Self, ConvertError> {
            Err(ConvertError::custom("no default constructor"))
        }

        fn to_field(&self, value: Value) -> std::result::Result<String, ConvertError> {
            Ok(value.to_string())
        }

        fn to_document(&self, field: &String) -> std::result::Result<Option<Value>, ConvertError> {
            Ok(Some(Value::from(field.as_str())))
        }
    }

    #[derive(Debug, Default)]
    struct Outer {
        name: String,
        inner: Inner,
        forced: Vec<u8>,
        odd: String,
    }

    crate::mapped! {
        Inner {
            flag: "flag",
        }

        Outer {
            name: "name" [default_value = "greeting", comment = "Display name"],
            inner: "inner" [only_if = "enabled"],
            forced: "forced" [force_breakdown = true],
            odd: "odd" as Broken,
        }
    }

    fn shout() -> Translator {
        Translator::new(|text| text.to_uppercase())
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(2, true)]
    fn test_break_down(#[case] index: usize, #[case] expected: bool) {
        let outer = Outer::default();
        let meta = outer.field(index);
        assert_eq!(
            is_break_down(meta, |ty| Format::Toml.supports_type(ty)),
            expected
        );
    }

    #[test]
    fn test_converter_prevents_break_down() {
        let outer = Outer::default();
        assert!(!is_break_down(outer.field(3), |_| false));
    }

    #[test]
    fn test_translated_text() {
        let outer = Outer::default();
        let meta = outer.field(0);
        assert_eq!(default_value(meta, &shout()).as_deref(), Some("GREETING"));
        assert_eq!(comment(meta, &shout()).as_deref(), Some("DISPLAY NAME"));
        assert_eq!(default_value(outer.field(1), &shout()), None);
    }

    #[test]
    fn test_guard_path() {
        let outer = Outer::default();
        assert_eq!(guard_path(outer.field(1)), Some("enabled"));
        assert_eq!(guard_path(outer.field(0)), None);
    }

    #[test]
    fn test_resolve_fails_on_converter() {
        let outer = Outer::default();
        let resolver = MetadataResolver::new(Format::Toml, Translator::identity());

        assert!(resolver.resolve(&outer, 0).is_ok());
        let err = resolver.resolve_all(&outer).unwrap_err();
        match err {
            Error::ConverterInstantiation {
                path, converter, ..
            } => {
                assert_eq!(path, "odd");
                assert!(converter.ends_with("Broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
