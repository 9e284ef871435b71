//! User-supplied converters for field types the document cannot hold directly

use std::any::Any;
use std::fmt;

use confsync_document::Value;

use super::ConvertError;

/// A bidirectional transform between a document value and a field type.
///
/// A field declared with a converter is never broken down, whatever its
/// type. The engine constructs a fresh converter through
/// [`Converter::instantiate`] every time it inspects the field.
///
/// # Examples
///
/// ```
/// use confsync_core::{ConvertError, Converter};
/// use confsync_document::Value;
///
/// pub struct Port(pub u16);
///
/// pub struct PortConverter;
///
/// impl Converter for PortConverter {
///     type Field = Port;
///
///     fn instantiate() -> Result<Self, ConvertError> {
///         Ok(Self)
///     }
///
///     fn to_field(&self, value: Value) -> Result<Port, ConvertError> {
///         match value {
///             Value::Integer(i) => u16::try_from(i)
///                 .map(Port)
///                 .map_err(|_| ConvertError::custom("port out of range")),
///             Value::String(s) => s.parse().map(Port).map_err(|e| ConvertError::custom(format!("{e}"))),
///             other => Err(ConvertError::custom(format!("unexpected {}", other.value_type()))),
///         }
///     }
///
///     fn to_document(&self, field: &Port) -> Result<Option<Value>, ConvertError> {
///         Ok(Some(Value::Integer(field.0.into())))
///     }
/// }
/// ```
pub trait Converter: Send + Sync + Sized + 'static {
    /// The in-memory field type this converter produces
    type Field: 'static;

    /// Construct the converter; failure surfaces as a converter
    /// instantiation error on the field being inspected.
    fn instantiate() -> Result<Self, ConvertError>;

    /// Convert a document value (or a raw default string) into the field type
    fn to_field(&self, value: Value) -> Result<Self::Field, ConvertError>;

    /// Convert the field into a document value; `None` leaves the key absent
    fn to_document(&self, field: &Self::Field) -> Result<Option<Value>, ConvertError>;
}

/// A type-erased converter, instantiated once per field inspection
pub struct ConverterInstance {
    name: &'static str,
    inner: Box<dyn Any + Send + Sync>,
}

impl ConverterInstance {
    pub fn new<C: Converter>(converter: C) -> Self {
        Self {
            name: std::any::type_name::<C>(),
            inner: Box::new(converter),
        }
    }

    /// Type name of the wrapped converter
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn downcast_ref<C: Converter>(&self) -> Option<&C> {
        self.inner.downcast_ref::<C>()
    }
}

impl fmt::Debug for ConverterInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterInstance")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
