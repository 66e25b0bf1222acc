//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally passing an avenue ID where an accident ID is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`, `is_valid()`
/// - `Display`, `FromStr`, `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use ruta_segura_core::define_id;
/// define_id!(ZonaId);
/// define_id!(CalleId);
///
/// let zona = ZonaId::new(1);
/// let calle = CalleId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ZonaId = calle;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            /// Backend IDs are strictly positive.
            #[must_use]
            pub const fn is_valid(&self) -> bool {
                self.0 > 0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UsuarioId);
define_id!(AvenidaId);
define_id!(TipoSiniestroId);
define_id!(SiniestroId);
define_id!(VehiculoId);
define_id!(ReporteDelitoId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_positive_only() {
        assert!(SiniestroId::new(1).is_valid());
        assert!(!SiniestroId::new(0).is_valid());
        assert!(!AvenidaId::new(-3).is_valid());
    }

    #[test]
    fn test_from_str_trims() {
        let id: UsuarioId = " 42 ".parse().unwrap();
        assert_eq!(id.as_i64(), 42);
        assert!("abc".parse::<UsuarioId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = ReporteDelitoId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: ReporteDelitoId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }
}
