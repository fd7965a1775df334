//! Rating models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rated category. Order matches the survey layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Servicio,
    Comida,
    Infraestructura,
    Musica,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Servicio,
        Category::Comida,
        Category::Infraestructura,
        Category::Musica,
    ];

    /// Wire name, also the `saveRating` query parameter
    pub fn key(&self) -> &'static str {
        match self {
            Self::Servicio => "servicio",
            Self::Comida => "comida",
            Self::Infraestructura => "infraestructura",
            Self::Musica => "musica",
        }
    }

    /// Label shown on the rating screen
    pub fn label(&self) -> &'static str {
        match self {
            Self::Servicio => "Servicio",
            Self::Comida => "Comida",
            Self::Infraestructura => "Infraestructura",
            Self::Musica => "Música",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Servicio => 0,
            Self::Comida => 1,
            Self::Infraestructura => 2,
            Self::Musica => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating must be between {min} and {max}, got {0}", min = Rating::MIN, max = Rating::MAX)]
pub struct InvalidRating(pub u8);

/// A score from 1 to 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, InvalidRating> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Rating::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete survey ready for `saveRating`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSubmission {
    pub codigo_pv: String,
    pub numero_factura: String,
    pub numero_mesa: String,
    pub servicio: Rating,
    pub comida: Rating,
    pub infraestructura: Rating,
    pub musica: Rating,
    pub comentario: String,
}

impl RatingSubmission {
    pub fn rating(&self, category: Category) -> Rating {
        match category {
            Category::Servicio => self.servicio,
            Category::Comida => self.comida,
            Category::Infraestructura => self.infraestructura,
            Category::Musica => self.musica,
        }
    }

    /// Query parameters in the order the API documents them (without `action`)
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("codigo_pv", self.codigo_pv.clone()),
            ("numero_factura", self.numero_factura.clone()),
            ("numero_mesa", self.numero_mesa.clone()),
        ];
        pairs.extend(
            Category::ALL
                .into_iter()
                .map(|c| (c.key(), self.rating(c).to_string())),
        );
        pairs.push(("comentario", self.comentario.clone()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert_eq!(Rating::new(1).unwrap().value(), 1);
        assert_eq!(Rating::new(5).unwrap().value(), 5);
        assert_eq!(Rating::new(6), Err(InvalidRating(6)));
    }

    #[test]
    fn test_rating_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn test_category_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>().unwrap(), category);
        }
        assert!("ambiente".parse::<Category>().is_err());
    }

    #[test]
    fn test_submission_query_pairs_order() {
        let submission = RatingSubmission {
            codigo_pv: "PV01".into(),
            numero_factura: "FE-123".into(),
            numero_mesa: "7".into(),
            servicio: Rating::new(5).unwrap(),
            comida: Rating::new(4).unwrap(),
            infraestructura: Rating::new(3).unwrap(),
            musica: Rating::new(2).unwrap(),
            comentario: "Muy bien".into(),
        };

        let keys: Vec<&str> = submission.query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "codigo_pv",
                "numero_factura",
                "numero_mesa",
                "servicio",
                "comida",
                "infraestructura",
                "musica",
                "comentario"
            ]
        );
        assert_eq!(submission.query_pairs()[3].1, "5");
    }
}
