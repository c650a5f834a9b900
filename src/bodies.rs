use std::{fmt, str::FromStr};

use crate::planet_errors::PlanetError;

/// The planets whose positions are computed. Earth is the observer and is
/// deliberately absent; its Horizons id (3) is rejected by [`Body::from_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Mercury = 1,
    Venus = 2,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
}

impl Body {
    /// Every body, in heliocentric order
    pub const ALL: [Body; 7] = [
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    pub fn from_id(id: i32) -> Result<Self, PlanetError> {
        match id {
            1 => Ok(Body::Mercury),
            2 => Ok(Body::Venus),
            4 => Ok(Body::Mars),
            5 => Ok(Body::Jupiter),
            6 => Ok(Body::Saturn),
            7 => Ok(Body::Uranus),
            8 => Ok(Body::Neptune),
            _ => Err(PlanetError::InvalidBodyId(id)),
        }
    }

    /// Identifier of the body in the JPL Horizons `COMMAND` parameter
    pub fn remote_id(&self) -> i32 {
        *self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }
}

impl From<Body> for i32 {
    fn from(body: Body) -> Self {
        body.remote_id()
    }
}

impl TryFrom<i32> for Body {
    type Error = PlanetError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Body::from_id(id)
    }
}

impl FromStr for Body {
    type Err = PlanetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Body::ALL
            .into_iter()
            .find(|body| body.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PlanetError::UnknownBodyName(s.to_string()))
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod test_bodies {
    use super::*;

    #[test]
    fn test_body_from_id() {
        assert_eq!(Body::from_id(1).unwrap(), Body::Mercury);
        assert_eq!(Body::from_id(2).unwrap(), Body::Venus);
        assert_eq!(Body::from_id(4).unwrap(), Body::Mars);
        assert_eq!(Body::from_id(8).unwrap(), Body::Neptune);
        assert_eq!(Body::from_id(3), Err(PlanetError::InvalidBodyId(3)));
        assert!(Body::from_id(9).is_err());
    }

    #[test]
    fn test_remote_id_round_trip() {
        for body in Body::ALL {
            let id: i32 = body.into();
            assert_eq!(Body::try_from(id).unwrap(), body);
        }
    }

    #[test]
    fn test_all_excludes_earth() {
        assert_eq!(Body::ALL.len(), 7);
        assert!(Body::ALL.iter().all(|body| body.remote_id() != 3));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("jupiter".parse::<Body>().unwrap(), Body::Jupiter);
        assert_eq!(" Saturn ".parse::<Body>().unwrap(), Body::Saturn);
        assert_eq!(
            "Earth".parse::<Body>(),
            Err(PlanetError::UnknownBodyName("Earth".into()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Body::Uranus.to_string(), "Uranus");
    }
}
