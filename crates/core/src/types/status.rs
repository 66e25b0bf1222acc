//! Closed vocabularies the backend validates against.
//!
//! Each enum serializes to the exact lowercase wire value the API accepts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error for a string that is not part of a closed vocabulary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct VocabularyError {
    /// Which vocabulary rejected the value.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Wire value used by the backend.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = VocabularyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == lower)
                    .ok_or_else(|| VocabularyError {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

wire_enum! {
    /// Severity level of an accident, accident type or crime report.
    Gravedad, "severity" {
        Baja => "baja",
        Media => "media",
        Alta => "alta",
    }
}

wire_enum! {
    /// Kind of road an avenue record describes.
    TipoVia, "road type" {
        Avenida => "avenida",
        Ruta => "ruta",
        Calle => "calle",
    }
}

wire_enum! {
    /// Vehicle (or pedestrian / fixed object) involved in an accident.
    TipoVehiculo, "vehicle type" {
        Auto => "auto",
        Moto => "moto",
        Camion => "camion",
        Camioneta => "camioneta",
        Colectivo => "colectivo",
        Bicicleta => "bicicleta",
        Peaton => "peaton",
        ObjetoFijo => "objeto_fijo",
    }
}

wire_enum! {
    /// Role of the person attached to an involved vehicle.
    RolVehiculo, "vehicle role" {
        Conductor => "conductor",
        Peaton => "peaton",
        Pasajero => "pasajero",
        Otro => "otro",
    }
}

/// Safety classification of an avenue, derived from its danger index.
///
/// The backend sends the label alongside the index; [`NivelSeguridad::from_indice`]
/// reproduces its thresholds for rows that arrive without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NivelSeguridad {
    #[serde(rename = "Muy Segura")]
    MuySegura,
    #[serde(rename = "Segura")]
    Segura,
    #[serde(rename = "Moderada")]
    Moderada,
    #[serde(rename = "Peligrosa")]
    Peligrosa,
    #[serde(rename = "Muy Peligrosa")]
    MuyPeligrosa,
}

impl NivelSeguridad {
    /// Index at or below which an avenue counts as a safe route.
    pub const SAFE_ROUTE_MAX: f64 = 10.0;
    /// Index above which an avenue counts as a dangerous zone.
    pub const DANGEROUS_ZONE_MIN: f64 = 25.0;

    /// Classify a danger index: 0, ≤10, ≤25, ≤50, >50.
    #[must_use]
    pub fn from_indice(indice: f64) -> Self {
        if indice <= 0.0 {
            Self::MuySegura
        } else if indice <= Self::SAFE_ROUTE_MAX {
            Self::Segura
        } else if indice <= Self::DANGEROUS_ZONE_MIN {
            Self::Moderada
        } else if indice <= 50.0 {
            Self::Peligrosa
        } else {
            Self::MuyPeligrosa
        }
    }

    /// Display label, as the backend spells it.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MuySegura => "Muy Segura",
            Self::Segura => "Segura",
            Self::Moderada => "Moderada",
            Self::Peligrosa => "Peligrosa",
            Self::MuyPeligrosa => "Muy Peligrosa",
        }
    }
}

impl fmt::Display for NivelSeguridad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(serde_json::to_string(&TipoVehiculo::ObjetoFijo).unwrap(), "\"objeto_fijo\"");
        assert_eq!("Alta".parse::<Gravedad>().unwrap(), Gravedad::Alta);
        let err = "avenue".parse::<TipoVia>().unwrap_err();
        assert_eq!(err.to_string(), "invalid road type: avenue");
    }

    #[test]
    fn test_nivel_seguridad_thresholds() {
        assert_eq!(NivelSeguridad::from_indice(0.0), NivelSeguridad::MuySegura);
        assert_eq!(NivelSeguridad::from_indice(10.0), NivelSeguridad::Segura);
        assert_eq!(NivelSeguridad::from_indice(10.5), NivelSeguridad::Moderada);
        assert_eq!(NivelSeguridad::from_indice(25.0), NivelSeguridad::Moderada);
        assert_eq!(NivelSeguridad::from_indice(50.0), NivelSeguridad::Peligrosa);
        assert_eq!(NivelSeguridad::from_indice(67.5), NivelSeguridad::MuyPeligrosa);
    }

    #[test]
    fn test_nivel_seguridad_serde_uses_labels() {
        let nivel: NivelSeguridad = serde_json::from_str("\"Muy Peligrosa\"").unwrap();
        assert_eq!(nivel, NivelSeguridad::MuyPeligrosa);
        assert_eq!(nivel.to_string(), "Muy Peligrosa");
    }
}
