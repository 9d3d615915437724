//! Platform API payloads and errors.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from the platform HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL and path do not form a valid URL.
    #[error("invalid endpoint URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Network failure, timeout, or client construction error.
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status this call does not accept.
    #[error("{endpoint} returned status {status}: {body}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    /// The body did not match the expected shape.
    #[error("could not decode {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },

    /// Login succeeded but carried no token.
    #[error("login response carried no token")]
    MissingToken,
}

impl ApiError {
    /// HTTP status, when the failure was a rejected response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for platform API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WalletUpdate<'a> {
    pub wallet_address: &'a str,
}

/// A listed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: u64,
    /// Owner identity, as the string form of whatever the API returns.
    #[serde(rename = "userId", default, deserialize_with = "de_opt_id")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub daily_price: Option<f64>,
}

/// Body of a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: String,
    pub property_id: u64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_guests: u32,
}

/// A booking record as returned by the list and detail endpoints.
///
/// Only the fields the run acts on are decoded; dates and owner come back in
/// whatever shape the backend serializer picks and are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: u64,
    #[serde(default)]
    pub property_id: Option<u64>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Accept identifiers sent as JSON numbers or strings.
fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_owner_number_or_string() {
        let props: Vec<Property> = serde_json::from_str(
            r#"[
                {"id": 1, "userId": 5, "title": "Riad", "dailyPrice": 900.0},
                {"id": 2, "userId": "6", "title": "Loft"},
                {"id": 3}
            ]"#,
        )
        .unwrap();

        assert_eq!(props[0].owner_id.as_deref(), Some("5"));
        assert_eq!(props[0].daily_price, Some(900.0));
        assert_eq!(props[1].owner_id.as_deref(), Some("6"));
        assert_eq!(props[2].owner_id, None);
    }

    #[test]
    fn test_booking_request_wire_format() {
        let req = BookingRequest {
            user_id: "7".into(),
            property_id: 3,
            check_in_date: NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2026, 12, 23).unwrap(),
            number_of_guests: 2,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userId"], "7");
        assert_eq!(json["propertyId"], 3);
        assert_eq!(json["checkInDate"], "2026-12-18");
        assert_eq!(json["checkOutDate"], "2026-12-23");
        assert_eq!(json["numberOfGuests"], 2);
    }

    #[test]
    fn test_booking_tolerates_extra_fields() {
        let booking: Booking = serde_json::from_str(
            r#"{"id": 4, "propertyId": 3, "userId": 7, "totalPrice": 4500.0,
                "status": "PENDING_PAYMENT", "checkInDate": "2026-12-18", "nights": 5}"#,
        )
        .unwrap();
        assert_eq!(booking.id, 4);
        assert_eq!(booking.property_id, Some(3));
        assert_eq!(booking.status.as_deref(), Some("PENDING_PAYMENT"));
    }

    #[test]
    fn test_booking_date_shapes_do_not_break_decoding() {
        let bookings: Vec<Booking> = serde_json::from_str(
            r#"[
                {"id": 4, "propertyId": 3, "totalPrice": 4500.0, "status": "PENDING_PAYMENT",
                 "checkInDate": "2026-12-18T00:00:00", "checkOutDate": "2026-12-23T00:00:00"},
                {"id": 5, "propertyId": 3, "totalPrice": 900.0, "status": "CONFIRMED",
                 "checkInDate": [2026, 12, 18], "checkOutDate": [2026, 12, 19], "userId": "7"}
            ]"#,
        )
        .unwrap();

        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].id, 4);
        assert_eq!(bookings[0].total_price, Some(4500.0));
        assert_eq!(bookings[1].status.as_deref(), Some("CONFIRMED"));
    }
}
