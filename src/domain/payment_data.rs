//! Payment method data, selected by the `type` discriminator.

use crate::domain::coerce::{
    Coerce, Fields, FromMapping, Mapping, OrderedFields, digits, ignore_unknown, non_empty,
    present_fields, read_code, read_string,
};
use crate::domain::discriminator::{DISCRIMINATOR, Registry, expect_discriminator};
use crate::error::{PaymentError, Result};
use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Widest gap between the gateway clock and a cardholder's local clock:
/// UTC+14 down to UTC-12.
const MAX_TIMEZONE_SKEW_HOURS: i64 = 26;
const DST_SHIFT_HOURS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethodType {
    BankCard,
    YandexMoney,
    Webmoney,
    Sberbank,
    Qiwi,
    MobileBalance,
    Cash,
    Alfabank,
    ApplePay,
    GooglePay,
    Installments,
    TinkoffBank,
}

impl PaymentMethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethodType::BankCard => "bank_card",
            PaymentMethodType::YandexMoney => "yandex_money",
            PaymentMethodType::Webmoney => "webmoney",
            PaymentMethodType::Sberbank => "sberbank",
            PaymentMethodType::Qiwi => "qiwi",
            PaymentMethodType::MobileBalance => "mobile_balance",
            PaymentMethodType::Cash => "cash",
            PaymentMethodType::Alfabank => "alfabank",
            PaymentMethodType::ApplePay => "apple_pay",
            PaymentMethodType::GooglePay => "google_pay",
            PaymentMethodType::Installments => "installments",
            PaymentMethodType::TinkoffBank => "tinkoff_bank",
        }
    }
}

/// Bank card details entered by the payer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Card {
    number: Option<String>,
    expiry_year: Option<i32>,
    expiry_month: Option<u32>,
    csc: Option<String>,
    cardholder: Option<String>,
}

impl Card {
    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn expiry_year(&self) -> Option<i32> {
        self.expiry_year
    }

    pub fn expiry_month(&self) -> Option<u32> {
        self.expiry_month
    }

    pub fn csc(&self) -> Option<&str> {
        self.csc.as_deref()
    }

    pub fn cardholder(&self) -> Option<&str> {
        self.cardholder.as_deref()
    }

    pub fn set_number(&mut self, number: impl Into<String>) -> Result<()> {
        self.number = Some(digits("number", number.into(), 12, 19)?);
        Ok(())
    }

    /// Sets the four-digit expiry year, e.g. `"2019"`.
    pub fn set_expiry_year(&mut self, year: &str) -> Result<()> {
        let year = digits("expiry_year", year.to_string(), 4, 4)?;
        self.expiry_year = Some(
            year.parse()
                .map_err(|_| PaymentError::invalid(format!("invalid expiry_year '{year}'")))?,
        );
        Ok(())
    }

    /// Sets the expiry month, `"01"` to `"12"`. A single digit is accepted.
    pub fn set_expiry_month(&mut self, month: &str) -> Result<()> {
        let month = digits("expiry_month", month.to_string(), 1, 2)?;
        match month.parse::<u32>() {
            Ok(m @ 1..=12) => {
                self.expiry_month = Some(m);
                Ok(())
            }
            _ => Err(PaymentError::invalid(format!(
                "expiry_month must be 01 to 12, got '{month}'"
            ))),
        }
    }

    pub fn set_csc(&mut self, csc: impl Into<String>) -> Result<()> {
        self.csc = Some(digits("csc", csc.into(), 3, 4)?);
        Ok(())
    }

    pub fn set_cardholder(&mut self, cardholder: impl Into<String>) -> Result<()> {
        self.cardholder = Some(non_empty("cardholder", cardholder.into())?);
        Ok(())
    }

    /// The instant from which the card counts as expired, if both expiry
    /// fields are set.
    ///
    /// That is the first moment of the month after the expiry month, pushed
    /// forward by the largest time-zone and daylight-saving gap, so a card is
    /// usable through its whole last month wherever the cardholder is.
    pub fn expires_at(&self) -> Option<NaiveDateTime> {
        let (year, month) = (self.expiry_year?, self.expiry_month?);
        let next_month =
            NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_months(Months::new(1))?;
        let grace = TimeDelta::try_hours(MAX_TIMEZONE_SKEW_HOURS + DST_SHIFT_HOURS)?;
        next_month.and_time(NaiveTime::MIN).checked_add_signed(grace)
    }

    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        self.expires_at().is_some_and(|expiry| now >= expiry)
    }
}

impl FromMapping for Card {
    const TYPE_NAME: &'static str = "Card";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut card = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                "number" => card.set_number(read_string(value)?)?,
                "expiry_year" => card.set_expiry_year(&read_code(value)?)?,
                "expiry_month" => card.set_expiry_month(&read_code(value)?)?,
                "csc" => card.set_csc(read_code(value)?)?,
                "cardholder" => card.set_cardholder(read_string(value)?)?,
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(card)
    }
}

impl OrderedFields for Card {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_opt("number", self.number.clone())
            .with_opt("expiry_year", self.expiry_year.map(|y| format!("{y:04}")))
            .with_opt("expiry_month", self.expiry_month.map(|m| format!("{m:02}")))
            .with_opt("csc", self.csc.clone())
            .with_opt("cardholder", self.cardholder.clone())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BankCardData {
    card: Option<Card>,
}

impl BankCardData {
    pub fn new(card: impl Coerce<Card>) -> Result<Self> {
        let mut data = Self::default();
        data.set_card(card)?;
        Ok(data)
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn card_mut(&mut self) -> Option<&mut Card> {
        self.card.as_mut()
    }

    pub fn set_card(&mut self, card: impl Coerce<Card>) -> Result<()> {
        self.card = Some(card.coerce()?);
        Ok(())
    }
}

impl FromMapping for BankCardData {
    const TYPE_NAME: &'static str = "BankCardData";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        expect_discriminator(map, PaymentMethodType::BankCard.as_str())?;
        let mut data = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                DISCRIMINATOR => {}
                "card" => data.set_card(value)?,
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(data)
    }
}

impl From<BankCardData> for PaymentData {
    fn from(data: BankCardData) -> Self {
        PaymentData::BankCard(data)
    }
}

impl Coerce<PaymentData> for BankCardData {
    fn coerce(self) -> Result<PaymentData> {
        Ok(self.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentData {
    BankCard(BankCardData),
    YandexMoney,
    Webmoney,
    Sberbank { phone: Option<String> },
    Qiwi { phone: Option<String> },
    MobileBalance { phone: Option<String> },
    Cash { phone: Option<String> },
    Alfabank { login: Option<String> },
    ApplePay { payment_data: Option<String> },
    GooglePay {
        payment_method_token: Option<String>,
        google_transaction_id: Option<String>,
    },
    Installments,
    TinkoffBank,
}

static PAYMENT_DATA: Registry<PaymentData> = Registry::new(
    "PaymentData",
    &[
        ("bank_card", bank_card),
        ("yandex_money", yandex_money),
        ("webmoney", webmoney),
        ("sberbank", sberbank),
        ("qiwi", qiwi),
        ("mobile_balance", mobile_balance),
        ("cash", cash),
        ("alfabank", alfabank),
        ("apple_pay", apple_pay),
        ("google_pay", google_pay),
        ("installments", installments),
        ("tinkoff_bank", tinkoff_bank),
    ],
);

fn bank_card(map: &Mapping) -> Result<PaymentData> {
    BankCardData::from_mapping(map).map(PaymentData::BankCard)
}

fn yandex_money(_: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::YandexMoney)
}

fn webmoney(_: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::Webmoney)
}

fn installments(_: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::Installments)
}

fn tinkoff_bank(_: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::TinkoffBank)
}

fn sberbank(map: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::Sberbank {
        phone: read_phone(map)?,
    })
}

fn qiwi(map: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::Qiwi {
        phone: read_phone(map)?,
    })
}

fn mobile_balance(map: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::MobileBalance {
        phone: read_phone(map)?,
    })
}

fn cash(map: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::Cash {
        phone: read_phone(map)?,
    })
}

fn alfabank(map: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::Alfabank {
        login: read_token(map, "login")?,
    })
}

fn apple_pay(map: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::ApplePay {
        payment_data: read_token(map, "payment_data")?,
    })
}

fn google_pay(map: &Mapping) -> Result<PaymentData> {
    Ok(PaymentData::GooglePay {
        payment_method_token: read_token(map, "payment_method_token")?,
        google_transaction_id: read_token(map, "google_transaction_id")?,
    })
}

fn read_phone(map: &Mapping) -> Result<Option<String>> {
    match map.get("phone").filter(|v| !v.is_null()) {
        Some(value) => Ok(Some(digits("phone", read_string(value)?, 1, 15)?)),
        None => Ok(None),
    }
}

fn read_token(map: &Mapping, field: &str) -> Result<Option<String>> {
    match map.get(field).filter(|v| !v.is_null()) {
        Some(value) => Ok(Some(non_empty(field, read_string(value)?)?)),
        None => Ok(None),
    }
}

impl PaymentData {
    pub fn payment_method_type(&self) -> PaymentMethodType {
        match self {
            PaymentData::BankCard(_) => PaymentMethodType::BankCard,
            PaymentData::YandexMoney => PaymentMethodType::YandexMoney,
            PaymentData::Webmoney => PaymentMethodType::Webmoney,
            PaymentData::Sberbank { .. } => PaymentMethodType::Sberbank,
            PaymentData::Qiwi { .. } => PaymentMethodType::Qiwi,
            PaymentData::MobileBalance { .. } => PaymentMethodType::MobileBalance,
            PaymentData::Cash { .. } => PaymentMethodType::Cash,
            PaymentData::Alfabank { .. } => PaymentMethodType::Alfabank,
            PaymentData::ApplePay { .. } => PaymentMethodType::ApplePay,
            PaymentData::GooglePay { .. } => PaymentMethodType::GooglePay,
            PaymentData::Installments => PaymentMethodType::Installments,
            PaymentData::TinkoffBank => PaymentMethodType::TinkoffBank,
        }
    }

    pub fn card(&self) -> Option<&Card> {
        match self {
            PaymentData::BankCard(data) => data.card(),
            _ => None,
        }
    }

    pub fn card_mut(&mut self) -> Option<&mut Card> {
        match self {
            PaymentData::BankCard(data) => data.card_mut(),
            _ => None,
        }
    }
}

impl FromMapping for PaymentData {
    const TYPE_NAME: &'static str = "PaymentData";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        PAYMENT_DATA.resolve(map)
    }
}

impl OrderedFields for PaymentData {
    fn to_ordered_fields(&self) -> Mapping {
        let fields = Fields::new().with(DISCRIMINATOR, self.payment_method_type().as_str());
        let fields = match self {
            PaymentData::BankCard(data) => fields.with_nested("card", data.card()),
            PaymentData::Sberbank { phone }
            | PaymentData::Qiwi { phone }
            | PaymentData::MobileBalance { phone }
            | PaymentData::Cash { phone } => fields.with_opt("phone", phone.clone()),
            PaymentData::Alfabank { login } => fields.with_opt("login", login.clone()),
            PaymentData::ApplePay { payment_data } => {
                fields.with_opt("payment_data", payment_data.clone())
            }
            PaymentData::GooglePay {
                payment_method_token,
                google_transaction_id,
            } => fields
                .with_opt("payment_method_token", payment_method_token.clone())
                .with_opt("google_transaction_id", google_transaction_id.clone()),
            PaymentData::YandexMoney
            | PaymentData::Webmoney
            | PaymentData::Installments
            | PaymentData::TinkoffBank => fields,
        };
        fields.finish()
    }
}
