//! Static field tables and the type-erased object view the engine walks
//!
//! Each mapped type owns one [`Schema`], built on first use and shared for
//! the life of the process. The [`mapped!`](crate::mapped) macro generates
//! it along with the [`Mapped`] and
//! [`FieldValue`](crate::convert::FieldValue) impls.

mod field;
mod macros;

pub use field::{Field, FieldMeta};

use confsync_document::Value;

use crate::convert::{ConvertError, ConverterInstance};

/// The ordered field table of one mapped type
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> Schema<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field.
    ///
    /// # Panics
    ///
    /// Panics if another field already uses the same path.
    pub fn field(mut self, field: Field<T>) -> Self {
        let path = field.meta().path();
        assert!(
            self.fields.iter().all(|f| f.meta().path() != path),
            "duplicate field path '{path}' in {}",
            std::any::type_name::<T>()
        );
        self.fields.push(field);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field<T>> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<T>> {
        self.fields.iter()
    }
}

impl<T: 'static> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A type with a static field table
pub trait Mapped: Sized + 'static {
    fn schema() -> &'static Schema<Self>;
}

/// A mapped type that can react to a load before the following save
pub trait Configurable: Mapped {
    /// Called by `load_and_correct` between the load and the save
    fn between_load_and_save(&mut self) {}
}

/// Type-erased access to the fields of a mapped object.
///
/// Indices run from `0` to `field_count()` in declaration order. Every
/// [`Mapped`] type implements this.
pub trait Object {
    fn type_name(&self) -> &'static str;

    fn field_count(&self) -> usize;

    fn field(&self, index: usize) -> &FieldMeta;

    /// Construct the field's converter, if it declares one
    fn instantiate_converter(&self, index: usize) -> Result<Option<ConverterInstance>, ConvertError>;

    /// The field's document value; `None` when the field holds nothing
    fn read(
        &self,
        index: usize,
        converter: Option<&ConverterInstance>,
    ) -> Result<Option<Value>, ConvertError>;

    fn write(
        &mut self,
        index: usize,
        value: Value,
        converter: Option<&ConverterInstance>,
    ) -> Result<(), ConvertError>;

    /// The nested object held by the field, if any
    fn object_mut(&mut self, index: usize) -> Option<&mut dyn Object>;

    /// The nested objects held by a collection field, in order
    fn objects_mut(&mut self, index: usize) -> Vec<&mut dyn Object>;
}

impl<T: Mapped> Object for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn field_count(&self) -> usize {
        T::schema().len()
    }

    fn field(&self, index: usize) -> &FieldMeta {
        T::schema().fields[index].meta()
    }

    fn instantiate_converter(&self, index: usize) -> Result<Option<ConverterInstance>, ConvertError> {
        T::schema().fields[index].instantiate_converter()
    }

    fn read(
        &self,
        index: usize,
        converter: Option<&ConverterInstance>,
    ) -> Result<Option<Value>, ConvertError> {
        T::schema().fields[index].read(self, converter)
    }

    fn write(
        &mut self,
        index: usize,
        value: Value,
        converter: Option<&ConverterInstance>,
    ) -> Result<(), ConvertError> {
        T::schema().fields[index].write(self, value, converter)
    }

    fn object_mut(&mut self, index: usize) -> Option<&mut dyn Object> {
        T::schema().fields[index].object_mut(self)
    }

    fn objects_mut(&mut self, index: usize) -> Vec<&mut dyn Object> {
        T::schema().fields[index].objects_mut(self)
    }
}
