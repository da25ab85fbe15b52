//! Helper macro generating port error enums with snake-case constructors.
//!
//! Each variant gets a constructor named after it; struct variants take one
//! `impl Into<_>` argument per field, in declaration order.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant {
                    $($field: $field.into()),*
                }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExampleStoreError {
            Missing => "nothing stored",
            Io { message: String } => "io: {message}",
            Quota { used: u64 } => "quota exceeded: {used}",
            Partial { message: String, written: u64 } => "partial: {message} ({written})",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ExampleStoreError::missing().to_string(), "nothing stored");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExampleStoreError::io("disk full");
        assert_eq!(err.to_string(), "io: disk full");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ExampleStoreError::quota(42_u64);
        assert_eq!(err.to_string(), "quota exceeded: 42");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExampleStoreError::partial("receipt", 7_u64);
        assert_eq!(err.to_string(), "partial: receipt (7)");
    }
}
