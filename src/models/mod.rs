use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default search radius in meters when a request omits one
pub const DEFAULT_RADIUS_M: f64 = 8_000.0;

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Builds coordinates, rejecting non-finite or out-of-range values
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
            Some(Self { lat, lon })
        } else {
            None
        }
    }

    /// Parses a raw "lat,lon" pair, the shortcut the recommend endpoint
    /// accepts in place of a free-text address
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.splitn(2, ',');
        let lat = parts.next()?.trim().parse::<f64>().ok()?;
        let lon = parts.next()?.trim().parse::<f64>().ok()?;
        Self::new(lat, lon)
    }
}

/// Which data source a place came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Online,
    Offline,
}

/// Ordinal price category mapped from the provider's 1-4 tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceLevel {
    Budget,
    Moderate,
    Expensive,
    Luxury,
}

impl PriceLevel {
    /// Maps a 1-4 provider tier; anything else is treated as unknown
    pub fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(PriceLevel::Budget),
            2 => Some(PriceLevel::Moderate),
            3 => Some(PriceLevel::Expensive),
            4 => Some(PriceLevel::Luxury),
            _ => None,
        }
    }
}

/// Canonical representation of a point of interest
///
/// Coordinates are always present and valid; everything else is optional
/// with defined fallbacks (absent popularity ranks lowest, absent price is
/// never penalized by the budget filter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub coords: Coordinates,
    pub address: Option<String>,
    pub popularity: Option<f64>,
    pub price: Option<PriceLevel>,
    pub photo: Option<String>,
    pub source: Source,
}

/// A recommendation request as received at the boundary
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    /// Free-text starting location, or a raw "lat,lon" pair
    pub start: String,
    /// Total budget in currency units for the whole party
    pub budget: f64,
    #[serde(default = "default_people")]
    pub people: u32,
    /// Search radius in meters
    #[serde(default = "default_radius")]
    pub radius: f64,
}

fn default_people() -> u32 {
    1
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_M
}

impl RecommendationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.start.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "starting location missing".to_string(),
            ));
        }
        if self.budget.is_nan() || self.budget <= 0.0 {
            return Err(AppError::InvalidInput(
                "budget must be a positive number".to_string(),
            ));
        }
        if self.people == 0 {
            return Err(AppError::InvalidInput(
                "people must be at least 1".to_string(),
            ));
        }
        if self.radius.is_nan() || self.radius <= 0.0 {
            return Err(AppError::InvalidInput(
                "radius must be a positive number of meters".to_string(),
            ));
        }
        Ok(())
    }

    /// Budget available per person, the quantity the price filter compares
    pub fn budget_per_person(&self) -> f64 {
        self.budget / self.people.max(1) as f64
    }
}

/// A place annotated with its distance from the request center and rank score
#[derive(Debug, Clone, Serialize)]
pub struct RankedPlace {
    pub place: Place,
    pub distance_m: f64,
    pub score: f64,
}

/// Ordered recommendation output; ordering is total and deterministic for a
/// fixed input set
pub type RankedResult = Vec<RankedPlace>;

// ============================================================================
// Raw provider records
// ============================================================================

/// The closed set of raw record shapes the normalizer accepts
#[derive(Debug, Clone)]
pub enum RawRecord {
    Online(FsqPlace),
    Offline(CatalogRow),
}

/// Raw search result from the places API
///
/// Everything is optional at the wire level; normalization decides what is
/// fatal for a record and what falls back to a default.
#[derive(Debug, Clone, Deserialize)]
pub struct FsqPlace {
    #[serde(default, alias = "fsq_place_id")]
    pub fsq_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geocodes: Option<FsqGeocodes>,
    #[serde(default)]
    pub location: Option<FsqLocation>,
    #[serde(default)]
    pub popularity: Option<f64>,
    /// 1-4 price tier
    #[serde(default)]
    pub price: Option<u8>,
    #[serde(default)]
    pub photos: Vec<FsqPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqGeocodes {
    #[serde(default)]
    pub main: Option<FsqLatLng>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqLatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqLocation {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsqPhoto {
    pub prefix: String,
    pub suffix: String,
}

impl FsqPhoto {
    /// Assembles a fetchable URL at original resolution
    pub fn url(&self) -> String {
        format!("{}original{}", self.prefix, self.suffix)
    }
}

impl TryFrom<FsqPlace> for Place {
    type Error = AppError;

    fn try_from(raw: FsqPlace) -> Result<Self, Self::Error> {
        let id = raw
            .fsq_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::MalformedRecord("provider record missing id".to_string()))?;
        let name = raw
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::MalformedRecord("provider record missing name".to_string()))?;

        let coords = raw
            .geocodes
            .and_then(|g| g.main)
            .and_then(|p| Coordinates::new(p.latitude, p.longitude))
            .ok_or_else(|| {
                AppError::MalformedRecord("provider record has no usable coordinates".to_string())
            })?;

        let address = raw.location.and_then(|loc| {
            loc.formatted_address
                .or(loc.address)
                .or(loc.locality)
                .filter(|a| !a.is_empty())
        });

        Ok(Place {
            id,
            name,
            coords,
            address,
            popularity: raw.popularity,
            price: raw.price.and_then(PriceLevel::from_tier),
            photo: raw.photos.first().map(FsqPhoto::url),
            source: Source::Online,
        })
    }
}

/// One row of the offline places dataset
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub price_tier: Option<u8>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl TryFrom<CatalogRow> for Place {
    type Error = AppError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::MalformedRecord("catalog row missing id".to_string()))?;
        let name = row
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::MalformedRecord("catalog row missing name".to_string()))?;

        let coords = match (row.lat, row.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => None,
        }
        .ok_or_else(|| {
            AppError::MalformedRecord("catalog row has no usable coordinates".to_string())
        })?;

        Ok(Place {
            id,
            name,
            coords,
            address: row.address.filter(|a| !a.is_empty()),
            popularity: row.popularity,
            price: row.price_tier.and_then(PriceLevel::from_tier),
            photo: row.photo.filter(|p| !p.is_empty()),
            source: Source::Offline,
        })
    }
}
