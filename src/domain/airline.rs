//! Airline ticket details attached to a payment for air travel.

use crate::domain::coerce::{
    Fields, FromMapping, Mapping, OrderedFields, bounded, digits, ignore_unknown, present_fields,
    read_sequence, read_string,
};
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Passenger {
    first_name: Option<String>,
    last_name: Option<String>,
}

impl Passenger {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Result<Self> {
        let mut passenger = Self::default();
        passenger.set_first_name(first_name)?;
        passenger.set_last_name(last_name)?;
        Ok(passenger)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) -> Result<()> {
        self.first_name = Some(bounded("first_name", first_name.into(), 64)?);
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) -> Result<()> {
        self.last_name = Some(bounded("last_name", last_name.into(), 64)?);
        Ok(())
    }
}

impl FromMapping for Passenger {
    const TYPE_NAME: &'static str = "Passenger";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut passenger = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                "first_name" => passenger.set_first_name(read_string(value)?)?,
                "last_name" => passenger.set_last_name(read_string(value)?)?,
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(passenger)
    }
}

impl OrderedFields for Passenger {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_opt("first_name", self.first_name.clone())
            .with_opt("last_name", self.last_name.clone())
            .finish()
    }
}

/// One flight segment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Leg {
    departure_airport: Option<String>,
    destination_airport: Option<String>,
    departure_date: Option<NaiveDate>,
}

impl Leg {
    pub fn departure_airport(&self) -> Option<&str> {
        self.departure_airport.as_deref()
    }

    pub fn destination_airport(&self) -> Option<&str> {
        self.destination_airport.as_deref()
    }

    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.departure_date
    }

    pub fn set_departure_airport(&mut self, code: impl Into<String>) -> Result<()> {
        self.departure_airport = Some(iata_code("departure_airport", code.into())?);
        Ok(())
    }

    pub fn set_destination_airport(&mut self, code: impl Into<String>) -> Result<()> {
        self.destination_airport = Some(iata_code("destination_airport", code.into())?);
        Ok(())
    }

    pub fn set_departure_date(&mut self, date: NaiveDate) {
        self.departure_date = Some(date);
    }
}

fn iata_code(field: &str, code: String) -> Result<String> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(code)
    } else {
        Err(PaymentError::invalid(format!(
            "{field} must be a three-letter IATA code, got '{code}'"
        )))
    }
}

impl FromMapping for Leg {
    const TYPE_NAME: &'static str = "Leg";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut leg = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                "departure_airport" => leg.set_departure_airport(read_string(value)?)?,
                "destination_airport" => leg.set_destination_airport(read_string(value)?)?,
                "departure_date" => {
                    let text = read_string(value)?;
                    let date = NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
                        PaymentError::invalid(format!("departure_date '{text}': {e}"))
                    })?;
                    leg.set_departure_date(date);
                }
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(leg)
    }
}

impl OrderedFields for Leg {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_opt("departure_airport", self.departure_airport.clone())
            .with_opt("destination_airport", self.destination_airport.clone())
            .with_opt(
                "departure_date",
                self.departure_date
                    .map(|d| d.format(DATE_FORMAT).to_string()),
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Airline {
    booking_reference: Option<String>,
    ticket_number: Option<String>,
    passengers: Vec<Passenger>,
    legs: Vec<Leg>,
}

impl Airline {
    pub fn booking_reference(&self) -> Option<&str> {
        self.booking_reference.as_deref()
    }

    pub fn ticket_number(&self) -> Option<&str> {
        self.ticket_number.as_deref()
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn set_booking_reference(&mut self, reference: impl Into<String>) -> Result<()> {
        self.booking_reference = Some(bounded("booking_reference", reference.into(), 20)?);
        Ok(())
    }

    pub fn set_ticket_number(&mut self, number: impl Into<String>) -> Result<()> {
        self.ticket_number = Some(digits("ticket_number", number.into(), 1, 150)?);
        Ok(())
    }

    pub fn set_passengers(&mut self, passengers: Vec<Passenger>) {
        self.passengers = passengers;
    }

    pub fn set_legs(&mut self, legs: Vec<Leg>) {
        self.legs = legs;
    }
}

impl FromMapping for Airline {
    const TYPE_NAME: &'static str = "Airline";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut airline = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                "booking_reference" => airline.set_booking_reference(read_string(value)?)?,
                "ticket_number" => airline.set_ticket_number(read_string(value)?)?,
                "passengers" => airline.set_passengers(read_sequence(value)?),
                "legs" => airline.set_legs(read_sequence(value)?),
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(airline)
    }
}

impl OrderedFields for Airline {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_opt("booking_reference", self.booking_reference.clone())
            .with_opt("ticket_number", self.ticket_number.clone())
            .with_sequence("passengers", &self.passengers)
            .with_sequence("legs", &self.legs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coerce::Coerce;
    use serde_json::{Value, json};

    #[test]
    fn test_airline_from_mapping() {
        let raw = json!({
            "booking_reference": "IIIKRV",
            "ticket_number": "12342123413",
            "passengers": [{"first_name": "SERGEI", "last_name": "IVANOV"}],
            "legs": [{
                "departure_airport": "LED",
                "destination_airport": "AMS",
                "departure_date": "2018-06-20"
            }]
        });
        let airline: Airline = raw.clone().coerce().unwrap();

        assert_eq!(airline.passengers().len(), 1);
        assert_eq!(
            airline.legs()[0].departure_date(),
            NaiveDate::from_ymd_opt(2018, 6, 20)
        );
        assert_eq!(Value::Object(airline.to_ordered_fields()), raw);
    }

    #[test]
    fn test_leg_rejects_lowercase_airport() {
        let result: Result<Leg> = json!({"departure_airport": "led"}).coerce();
        assert!(matches!(result, Err(PaymentError::ValidationError(_))));
    }

    #[test]
    fn test_leg_rejects_bad_date() {
        let result: Result<Leg> = json!({"departure_date": "20.06.2018"}).coerce();
        assert!(matches!(result, Err(PaymentError::ValidationError(_))));
    }

    #[test]
    fn test_passengers_must_be_a_sequence() {
        let result: Result<Airline> = json!({"passengers": "IVANOV"}).coerce();
        assert!(matches!(result, Err(PaymentError::TypeMismatch { .. })));
    }
}
