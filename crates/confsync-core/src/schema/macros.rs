/// Declare the field table of a struct.
///
/// Each entry names a struct field, its document key, an optional
/// converter (`as ConverterType`) and optional builder settings in
/// brackets. The struct must implement [`Default`]; nested mapped types
/// are created with it when a document holds a table the object has no
/// value for.
///
/// # Examples
///
/// ```
/// use confsync_core::mapped;
///
/// #[derive(Debug, Default)]
/// struct Proxy {
///     enabled: Option<bool>,
///     port: Option<u16>,
/// }
///
/// #[derive(Debug, Default)]
/// struct Network {
///     timeout: Option<u32>,
///     proxy: Proxy,
/// }
///
/// mapped! {
///     Proxy {
///         enabled: "enabled" [default_value = "false"],
///         port: "port" [default_value = "8080", only_if = ".enabled"],
///     }
///
///     Network {
///         timeout: "timeout" [default_value = "30", comment = "Seconds"],
///         proxy: "proxy",
///     }
/// }
/// ```
#[macro_export]
macro_rules! mapped {
    ($($name:ident { $($body:tt)* })+) => {
        $( $crate::mapped!(@impl $name { $($body)* }); )+
    };

    (@impl $name:ident {
        $(
            $field:ident : $path:literal $(as $conv:ty)?
            $([ $($opt:ident = $val:tt),* $(,)? ])?
        ),* $(,)?
    }) => {
        impl $crate::schema::Mapped for $name {
            fn schema() -> &'static $crate::schema::Schema<Self> {
                static SCHEMA: ::std::sync::OnceLock<$crate::schema::Schema<$name>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::schema::Schema::new()
                        $(
                            .field(
                                $crate::mapped!(@field $name, $field, $path $(, $conv)?)
                                    $($( .$opt($val) )*)?
                            )
                        )*
                })
            }
        }

        impl $crate::convert::FieldValue for $name {
            fn value_type() -> $crate::ValueType {
                $crate::ValueType::Object
            }

            fn to_value(
                &self,
            ) -> ::std::result::Result<::std::option::Option<$crate::Value>, $crate::convert::ConvertError> {
                $crate::convert::object_to_value(self)
            }

            fn from_value(
                value: $crate::Value,
            ) -> ::std::result::Result<Self, $crate::convert::ConvertError> {
                let mut object = <Self as ::std::default::Default>::default();
                $crate::convert::assign_object(&mut object, value)?;
                ::std::result::Result::Ok(object)
            }

            fn assign(
                &mut self,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::convert::ConvertError> {
                $crate::convert::assign_object(self, value)
            }

            fn as_object_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::schema::Object> {
                ::std::option::Option::Some(self)
            }
        }
    };

    (@field $name:ident, $field:ident, $path:literal) => {
        $crate::schema::Field::<$name>::new(
            $path,
            |o: &$name| &o.$field,
            |o: &mut $name| &mut o.$field,
        )
    };

    (@field $name:ident, $field:ident, $path:literal, $conv:ty) => {
        $crate::schema::Field::<$name>::converted::<$conv>(
            $path,
            |o: &$name| &o.$field,
            |o: &mut $name| &mut o.$field,
        )
    };
}
