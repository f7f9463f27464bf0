use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::attributes::{
    date_attr, get_date, get_decimal, get_optional_map, get_string, number_attr, string_attr,
};
use super::{Car, Delegation, Item, Record, RecordKey, RecordKind, RepositoryResult};

/// A user's rental booking, stored in the user's partition. The booked car
/// and both delegations are embedded as nested maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub user_id: String,
    pub operation: String,
    #[serde(default)]
    pub car: Option<Car>,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_to_payment: Decimal,
    pub status_payment: String,
    pub status_booking: String,
    #[serde(default)]
    pub pick_up_delegation: Option<Delegation>,
    #[serde(default)]
    pub deliver_delegation: Option<Delegation>,
}

impl Record for Booking {
    const KIND: RecordKind = RecordKind::Booking;

    fn key(&self) -> RecordKey {
        RecordKey::new(&self.user_id, &self.operation)
    }

    fn encode(&self) -> RepositoryResult<Item> {
        let mut item = Item::new();
        item.insert("status".to_string(), string_attr(&self.status));
        item.insert("startDate".to_string(), date_attr(&self.start_date));
        item.insert("endDate".to_string(), date_attr(&self.end_date));
        item.insert(
            "totalToPayment".to_string(),
            number_attr(self.total_to_payment),
        );
        item.insert("statusPayment".to_string(), string_attr(&self.status_payment));
        item.insert("statusBooking".to_string(), string_attr(&self.status_booking));

        if let Some(car) = &self.car {
            item.insert("car".to_string(), car.to_nested()?);
        }
        if let Some(delegation) = &self.pick_up_delegation {
            item.insert("pickUpDelegation".to_string(), delegation.to_nested()?);
        }
        if let Some(delegation) = &self.deliver_delegation {
            item.insert("deliverDelegation".to_string(), delegation.to_nested()?);
        }

        Ok(item)
    }

    fn decode(key: RecordKey, item: &Item) -> RepositoryResult<Self> {
        Ok(Self {
            user_id: key.partition_key,
            operation: key.operation,
            car: get_optional_map(item, "car")?
                .map(Car::from_nested)
                .transpose()?,
            status: get_string(item, "status")?,
            start_date: get_date(item, "startDate")?,
            end_date: get_date(item, "endDate")?,
            total_to_payment: get_decimal(item, "totalToPayment")?,
            status_payment: get_string(item, "statusPayment")?,
            status_booking: get_string(item, "statusBooking")?,
            pick_up_delegation: get_optional_map(item, "pickUpDelegation")?
                .map(Delegation::from_nested)
                .transpose()?,
            deliver_delegation: get_optional_map(item, "deliverDelegation")?
                .map(Delegation::from_nested)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn nested_keys(value: &AttributeValue) -> Vec<String> {
        let mut keys: Vec<String> = value
            .as_m()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn sample_booking_json() -> serde_json::Value {
        json!({
            "userId": "USER#001",
            "operation": "booking#2025#001",
            "car": {
                "delegationId": "DELEG#001",
                "operation": "car#2024#001",
                "make": "Toyota",
                "model": "Corolla",
                "year": 2024,
                "color": "Red",
                "rented": true,
                "price": 35
            },
            "status": "ACTIVE",
            "startDate": "2025-10-01",
            "endDate": "2025-10-07",
            "totalToPayment": 456.56,
            "statusPayment": "PAID",
            "statusBooking": "CREATED",
            "pickUpDelegation": {
                "delegationId": "DELEG#001",
                "operation": "profile",
                "name": "Central Rentals"
            },
            "deliverDelegation": {
                "delegationId": "DELEG#002",
                "operation": "profile",
                "name": "Airport Rentals"
            }
        })
    }

    #[test]
    fn test_booking_from_client_json() {
        let booking: Booking = serde_json::from_value(sample_booking_json()).unwrap();

        assert_eq!(booking.total_to_payment, dec!(456.56));
        assert_eq!(
            booking.start_date,
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
        );
        assert_eq!(booking.car.as_ref().unwrap().make, "Toyota");
        assert_eq!(
            booking.deliver_delegation.as_ref().unwrap().delegation_id,
            "DELEG#002"
        );
    }

    #[test]
    fn test_booking_codec_round_trip() {
        let booking: Booking = serde_json::from_value(sample_booking_json()).unwrap();
        let item = booking.encode().unwrap();

        assert_eq!(item.get("startDate").unwrap().as_s().unwrap(), "2025-10-01");
        assert_eq!(item.get("totalToPayment").unwrap().as_n().unwrap(), "456.56");
        assert_eq!(
            nested_keys(item.get("car").unwrap()),
            vec![
                "color",
                "delegationId",
                "make",
                "model",
                "operation",
                "price",
                "rented",
                "year"
            ]
        );

        let decoded = Booking::decode(booking.key(), &item).unwrap();
        assert_eq!(decoded, booking);
    }

    #[test]
    fn test_booking_without_embedded_records() {
        let mut value = sample_booking_json();
        let object = value.as_object_mut().unwrap();
        object.remove("car");
        object.remove("pickUpDelegation");
        object.remove("deliverDelegation");

        let booking: Booking = serde_json::from_value(value).unwrap();
        assert!(booking.car.is_none());

        let item = booking.encode().unwrap();
        assert!(!item.contains_key("car"));
        assert_eq!(Booking::decode(booking.key(), &item).unwrap(), booking);
    }

    #[test]
    fn test_booking_decode_rejects_bad_date() {
        let booking: Booking = serde_json::from_value(sample_booking_json()).unwrap();
        let mut item = booking.encode().unwrap();
        item.insert("endDate".to_string(), string_attr("07/10/2025"));

        assert!(Booking::decode(booking.key(), &item).is_err());
    }
}
