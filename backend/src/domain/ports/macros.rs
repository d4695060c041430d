//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant gets a snake-case constructor whose fields accept anything
//! convertible into the declared type, plus a stable `kind()` label for
//! structured logs.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (@pattern $name:ident $variant:ident) => { $name::$variant };
    (@pattern $name:ident $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        $name::$variant { .. }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
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

            /// Snake-case variant name, e.g. `not_configured`.
            pub fn kind(&self) -> &'static str {
                ::paste::paste! {
                    match self {
                        $(
                            define_port_error!(@pattern $name $variant $( { $($field : $ty),* } )?) =>
                                stringify!([<$variant:snake>]),
                        )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    define_port_error! {
        pub enum ProviderError {
            NotConfigured => "provider is not configured",
            Status { status: u16, message: String } => "status {status}: {message}",
            Transport { message: String } => "transport: {message}",
        }
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = ProviderError::transport("timed out");
        assert_eq!(err.to_string(), "transport: timed out");
    }

    #[rstest]
    fn mixed_fields_keep_their_types() {
        let err = ProviderError::status(503_u16, "busy");
        assert_eq!(
            err,
            ProviderError::Status {
                status: 503,
                message: "busy".into()
            }
        );
    }

    #[rstest]
    #[case(ProviderError::not_configured(), "not_configured")]
    #[case(ProviderError::status(500_u16, "boom"), "status")]
    #[case(ProviderError::transport("reset"), "transport")]
    fn kinds_are_snake_case_variant_names(#[case] err: ProviderError, #[case] expected: &str) {
        assert_eq!(err.kind(), expected);
    }
}
