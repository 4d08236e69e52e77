//! The cafe record and its insert payload.
//!
//! `Cafe` is serialized by hand rather than derived so the JSON field names
//! and their order are pinned down here, independent of struct layout:
//!
//! ```text
//! {id, name, map_url, img_url, location, seats,
//!  has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price}
//! ```

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::id::CafeId;

/// A persisted cafe.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct Cafe {
    pub id: CafeId,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    /// Free-form capacity descriptor, e.g. "20-30".
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

/// Number of fields in the serialized cafe object.
const CAFE_FIELD_COUNT: usize = 11;

impl Serialize for Cafe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Cafe", CAFE_FIELD_COUNT)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("map_url", &self.map_url)?;
        s.serialize_field("img_url", &self.img_url)?;
        s.serialize_field("location", &self.location)?;
        s.serialize_field("seats", &self.seats)?;
        s.serialize_field("has_toilet", &self.has_toilet)?;
        s.serialize_field("has_wifi", &self.has_wifi)?;
        s.serialize_field("has_sockets", &self.has_sockets)?;
        s.serialize_field("can_take_calls", &self.can_take_calls)?;
        s.serialize_field("coffee_price", &self.coffee_price)?;
        s.end()
    }
}

/// A required field was absent from an insert payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required field: {0}")]
pub struct MissingFieldError(pub &'static str);

/// Fields supplied by a caller to create a cafe.
///
/// Text fields are optional here because they arrive from loosely-typed form
/// input; [`NewCafe::validate`] reports the first one that is absent. Only
/// absence is checked; an empty string is a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCafe {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub location: Option<String>,
    pub seats: Option<String>,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

impl NewCafe {
    /// Check that every required text field is present.
    ///
    /// # Errors
    ///
    /// Returns the name of the first absent field, in column order.
    pub fn validate(&self) -> Result<(), MissingFieldError> {
        let required = [
            ("name", &self.name),
            ("map_url", &self.map_url),
            ("img_url", &self.img_url),
            ("location", &self.location),
            ("seats", &self.seats),
        ];

        match required.iter().find(|(_, value)| value.is_none()) {
            Some((field, _)) => Err(MissingFieldError(*field)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_cafe() -> Cafe {
        Cafe {
            id: CafeId::new(1),
            name: "Science Gallery London".to_string(),
            map_url: "https://g.page/scigallerylon".to_string(),
            img_url: "https://example.com/scigallery.jpg".to_string(),
            location: "London Bridge".to_string(),
            seats: "50+".to_string(),
            has_toilet: true,
            has_wifi: false,
            has_sockets: true,
            can_take_calls: true,
            coffee_price: Some("£2.40".to_string()),
        }
    }

    fn complete_new_cafe() -> NewCafe {
        NewCafe {
            name: Some("Social - Copeland Road".to_string()),
            map_url: Some("https://g.page/CopelandSocial".to_string()),
            img_url: Some("https://example.com/social.jpg".to_string()),
            location: Some("Peckham".to_string()),
            seats: Some("20-30".to_string()),
            ..NewCafe::default()
        }
    }

    #[test]
    fn test_cafe_serializes_fields_in_fixed_order() {
        let json = serde_json::to_string(&sample_cafe()).unwrap();
        let keys = [
            "\"id\"",
            "\"name\"",
            "\"map_url\"",
            "\"img_url\"",
            "\"location\"",
            "\"seats\"",
            "\"has_toilet\"",
            "\"has_wifi\"",
            "\"has_sockets\"",
            "\"can_take_calls\"",
            "\"coffee_price\"",
        ];

        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_cafe_serializes_values() {
        let value = serde_json::to_value(sample_cafe()).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["location"], "London Bridge");
        assert_eq!(value["has_wifi"], false);
        assert_eq!(value["coffee_price"], "£2.40");
        assert_eq!(value.as_object().unwrap().len(), CAFE_FIELD_COUNT);
    }

    #[test]
    fn test_cafe_without_price_serializes_null() {
        let mut cafe = sample_cafe();
        cafe.coffee_price = None;
        let value = serde_json::to_value(cafe).unwrap();
        assert!(value["coffee_price"].is_null());
    }

    #[test]
    fn test_validate_complete_payload() {
        assert!(complete_new_cafe().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let mut cafe = complete_new_cafe();
        cafe.img_url = None;
        cafe.seats = None;
        assert_eq!(cafe.validate(), Err(MissingFieldError("img_url")));
    }

    #[test]
    fn test_validate_accepts_empty_strings() {
        let mut cafe = complete_new_cafe();
        cafe.name = Some(String::new());
        assert!(cafe.validate().is_ok());
    }

    #[test]
    fn test_validate_ignores_optional_price() {
        let cafe = complete_new_cafe();
        assert!(cafe.coffee_price.is_none());
        assert!(cafe.validate().is_ok());
    }

    #[test]
    fn test_missing_field_error_display() {
        let err = MissingFieldError("name");
        assert_eq!(err.to_string(), "missing required field: name");
    }
}
