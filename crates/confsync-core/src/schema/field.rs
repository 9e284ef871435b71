//! Field declarations: static metadata plus accessor functions

use std::marker::PhantomData;

use confsync_document::{Value, ValueType};

use super::Object;
use crate::convert::{ConvertError, Converter, ConverterInstance, FieldValue};

/// Static metadata declared for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    path: &'static str,
    value_type: ValueType,
    converter: Option<&'static str>,
    force_breakdown: bool,
    default_value: Option<&'static str>,
    comment: Option<&'static str>,
    only_if: Option<&'static str>,
}

impl FieldMeta {
    fn new(path: &'static str, value_type: ValueType) -> Self {
        Self {
            path,
            value_type,
            converter: None,
            force_breakdown: false,
            default_value: None,
            comment: None,
            only_if: None,
        }
    }

    /// Document key, relative to the parent table
    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Type name of the declared converter
    pub fn converter(&self) -> Option<&'static str> {
        self.converter
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn force_breakdown(&self) -> bool {
        self.force_breakdown
    }

    /// Untranslated default text
    pub fn default_value(&self) -> Option<&'static str> {
        self.default_value
    }

    /// Untranslated comment text
    pub fn comment(&self) -> Option<&'static str> {
        self.comment
    }

    pub fn only_if(&self) -> Option<&'static str> {
        self.only_if
    }
}

/// One declared field of `T`.
///
/// Built with [`Field::new`] for types with a [`FieldValue`] impl, or
/// [`Field::converted`] for types that go through a [`Converter`].
pub struct Field<T> {
    meta: FieldMeta,
    access: Box<dyn FieldAccess<T>>,
}

impl<T: 'static> Field<T> {
    pub fn new<F: FieldValue>(
        path: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        Self {
            meta: FieldMeta::new(path, F::value_type()),
            access: Box::new(ValueAccess { get, get_mut }),
        }
    }

    pub fn converted<C: Converter>(
        path: &'static str,
        get: fn(&T) -> &C::Field,
        get_mut: fn(&mut T) -> &mut C::Field,
    ) -> Self {
        let mut meta = FieldMeta::new(path, ValueType::Custom);
        meta.converter = Some(std::any::type_name::<C>());
        Self {
            meta,
            access: Box::new(ConvertedAccess::<T, C> {
                get,
                get_mut,
                _converter: PhantomData,
            }),
        }
    }

    /// Text written to the document (and the field) when the key has no value.
    /// An empty string declares no default.
    pub fn default_value(mut self, text: &'static str) -> Self {
        self.meta.default_value = Some(text).filter(|t| !t.is_empty());
        self
    }

    pub fn comment(mut self, text: &'static str) -> Self {
        self.meta.comment = Some(text).filter(|t| !t.is_empty());
        self
    }

    /// Keep this field's key only while the boolean at `guard` is true.
    pub fn only_if(mut self, guard: &'static str) -> Self {
        self.meta.only_if = Some(guard).filter(|g| !g.is_empty());
        self
    }

    pub fn force_breakdown(mut self, force: bool) -> Self {
        self.meta.force_breakdown = force;
        self
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    pub(crate) fn instantiate_converter(&self) -> Result<Option<ConverterInstance>, ConvertError> {
        self.access.instantiate_converter()
    }

    pub(crate) fn read(
        &self,
        target: &T,
        converter: Option<&ConverterInstance>,
    ) -> Result<Option<Value>, ConvertError> {
        self.access.read(target, converter)
    }

    pub(crate) fn write(
        &self,
        target: &mut T,
        value: Value,
        converter: Option<&ConverterInstance>,
    ) -> Result<(), ConvertError> {
        self.access.write(target, value, converter)
    }

    pub(crate) fn object_mut<'a>(&self, target: &'a mut T) -> Option<&'a mut dyn Object> {
        self.access.object_mut(target)
    }

    pub(crate) fn objects_mut<'a>(&self, target: &'a mut T) -> Vec<&'a mut dyn Object> {
        self.access.objects_mut(target)
    }
}

trait FieldAccess<T>: Send + Sync {
    fn instantiate_converter(&self) -> Result<Option<ConverterInstance>, ConvertError>;

    fn read(
        &self,
        target: &T,
        converter: Option<&ConverterInstance>,
    ) -> Result<Option<Value>, ConvertError>;

    fn write(
        &self,
        target: &mut T,
        value: Value,
        converter: Option<&ConverterInstance>,
    ) -> Result<(), ConvertError>;

    fn object_mut<'a>(&self, target: &'a mut T) -> Option<&'a mut dyn Object>;

    fn objects_mut<'a>(&self, target: &'a mut T) -> Vec<&'a mut dyn Object>;
}

struct ValueAccess<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T: 'static, F: FieldValue> FieldAccess<T> for ValueAccess<T, F> {
    fn instantiate_converter(&self) -> Result<Option<ConverterInstance>, ConvertError> {
        Ok(None)
    }

    fn read(&self, target: &T, _: Option<&ConverterInstance>) -> Result<Option<Value>, ConvertError> {
        (self.get)(target).to_value()
    }

    fn write(
        &self,
        target: &mut T,
        value: Value,
        _: Option<&ConverterInstance>,
    ) -> Result<(), ConvertError> {
        (self.get_mut)(target).assign(value)
    }

    fn object_mut<'a>(&self, target: &'a mut T) -> Option<&'a mut dyn Object> {
        (self.get_mut)(target).as_object_mut()
    }

    fn objects_mut<'a>(&self, target: &'a mut T) -> Vec<&'a mut dyn Object> {
        (self.get_mut)(target).nested_objects_mut()
    }
}

struct ConvertedAccess<T, C: Converter> {
    get: fn(&T) -> &C::Field,
    get_mut: fn(&mut T) -> &mut C::Field,
    _converter: PhantomData<fn() -> C>,
}

impl<T, C: Converter> ConvertedAccess<T, C> {
    /// Run `f` with the resolved instance, or a fresh one when none was resolved.
    fn with_converter<R>(
        converter: Option<&ConverterInstance>,
        f: impl FnOnce(&C) -> Result<R, ConvertError>,
    ) -> Result<R, ConvertError> {
        match converter.and_then(ConverterInstance::downcast_ref::<C>) {
            Some(converter) => f(converter),
            None => f(&C::instantiate()?),
        }
    }
}

impl<T: 'static, C: Converter> FieldAccess<T> for ConvertedAccess<T, C> {
    fn instantiate_converter(&self) -> Result<Option<ConverterInstance>, ConvertError> {
        C::instantiate().map(|c| Some(ConverterInstance::new(c)))
    }

    fn read(
        &self,
        target: &T,
        converter: Option<&ConverterInstance>,
    ) -> Result<Option<Value>, ConvertError> {
        Self::with_converter(converter, |c| c.to_document((self.get)(target)))
    }

    fn write(
        &self,
        target: &mut T,
        value: Value,
        converter: Option<&ConverterInstance>,
    ) -> Result<(), ConvertError> {
        let field = Self::with_converter(converter, |c| c.to_field(value))?;
        *(self.get_mut)(target) = field;
        Ok(())
    }

    fn object_mut<'a>(&self, _: &'a mut T) -> Option<&'a mut dyn Object> {
        None
    }

    fn objects_mut<'a>(&self, _: &'a mut T) -> Vec<&'a mut dyn Object> {
        Vec::new()
    }
}
