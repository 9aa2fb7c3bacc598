use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Where the donation goes. Shown on the form but never collected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Destination {
    Oferta,
    Dizimo,
    Doacao,
    Construcao,
    Missoes,
}

impl Destination {
    pub const PLACEHOLDER: &'static str = "Selectione o destino";

    pub fn value(&self) -> &'static str {
        match self {
            Destination::Oferta => "oferta",
            Destination::Dizimo => "dizimo",
            Destination::Doacao => "doacao",
            Destination::Construcao => "construcao",
            Destination::Missoes => "missoes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Destination::Oferta => "Oferta",
            Destination::Dizimo => "Dízimo",
            Destination::Doacao => "Doação",
            Destination::Construcao => "Construção",
            Destination::Missoes => "Missões",
        }
    }

    pub fn all() -> Vec<Destination> {
        Destination::iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_match_display_and_parse() {
        for d in Destination::iter() {
            assert_eq!(d.to_string(), d.value());
            assert_eq!(d.value().parse::<Destination>().unwrap(), d);
        }
        assert!("0".parse::<Destination>().is_err());
    }

    #[test]
    fn labels_are_portuguese() {
        assert_eq!(Destination::all().len(), 5);
        assert_eq!(Destination::Dizimo.label(), "Dízimo");
        assert_eq!(Destination::Missoes.label(), "Missões");
    }
}
