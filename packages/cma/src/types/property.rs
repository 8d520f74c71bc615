//! Property types: the subject of a CMA run and the candidates compared
//! against it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A postal address, kept as loose strings since listings are rarely
/// normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Single-line rendering for prompts and report titles.
    pub fn display_line(&self) -> String {
        let parts: Vec<&str> = [
            self.street.as_deref(),
            self.city.as_deref(),
            self.region.as_deref(),
            self.postal_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
        parts.join(", ")
    }
}

/// A geographic coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Whether a property is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Sale,
    Rental,
}

/// A candidate's listing, resolved once at ingestion time.
///
/// The price lives inside the variant so a sale price can never be read
/// off a rental listing by accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Listing {
    Sale { price_cents: Option<i64> },
    Rental { price_cents: Option<i64> },
}

impl Listing {
    pub fn kind(&self) -> ListingKind {
        match self {
            Listing::Sale { .. } => ListingKind::Sale,
            Listing::Rental { .. } => ListingKind::Rental,
        }
    }

    /// The listing price in minor currency units, if present and positive.
    pub fn price_cents(&self) -> Option<i64> {
        let raw = match self {
            Listing::Sale { price_cents } | Listing::Rental { price_cents } => *price_cents,
        };
        raw.filter(|p| *p > 0)
    }
}

/// Structural attributes shared by subjects and candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyAttributes {
    /// Property-type key (e.g. "apartment", "house", "villa")
    pub property_type: Option<String>,

    pub bedrooms: i32,

    /// Fractional bathrooms allowed (half baths)
    pub bathrooms: f64,

    /// Constructed area in the inventory's area unit (typically m²)
    pub constructed_area: f64,

    /// Four-digit construction year, 0 when unknown
    pub year_built: i32,

    pub garages: i32,
}

/// The property a CMA report is generated for.
///
/// Immutable for the duration of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProperty {
    pub id: Uuid,
    pub address: Address,
    pub location: Option<GeoPoint>,
    pub attributes: PropertyAttributes,
    pub listing_kind: ListingKind,
}

impl SubjectProperty {
    pub fn new(id: Uuid, listing_kind: ListingKind) -> Self {
        Self {
            id,
            address: Address::default(),
            location: None,
            attributes: PropertyAttributes::default(),
            listing_kind,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoPoint::new(latitude, longitude));
        self
    }

    pub fn with_attributes(mut self, attributes: PropertyAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A property drawn from the inventory for comparison against a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableCandidate {
    pub id: Uuid,
    pub address: Address,
    pub location: Option<GeoPoint>,
    pub attributes: PropertyAttributes,
    pub listing: Listing,

    /// Hidden listings never qualify as comparables
    pub visible: bool,
}

impl ComparableCandidate {
    pub fn new(id: Uuid, listing: Listing) -> Self {
        Self {
            id,
            address: Address::default(),
            location: None,
            attributes: PropertyAttributes::default(),
            listing,
            visible: true,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoPoint::new(latitude, longitude));
        self
    }

    pub fn with_attributes(mut self, attributes: PropertyAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_price_filters_non_positive() {
        assert_eq!(
            Listing::Sale {
                price_cents: Some(300_000)
            }
            .price_cents(),
            Some(300_000)
        );
        assert_eq!(Listing::Sale { price_cents: Some(0) }.price_cents(), None);
        assert_eq!(
            Listing::Rental {
                price_cents: Some(-5)
            }
            .price_cents(),
            None
        );
        assert_eq!(Listing::Rental { price_cents: None }.price_cents(), None);
    }

    #[test]
    fn address_display_skips_missing_parts() {
        let address = Address {
            street: Some("Calle Mayor 1".into()),
            city: Some("Madrid".into()),
            region: None,
            postal_code: Some("28013".into()),
            country: Some("ES".into()),
        };
        assert_eq!(address.display_line(), "Calle Mayor 1, Madrid, 28013");
    }
}
