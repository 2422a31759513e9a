//! How the payer confirms the payment, selected by the `type` discriminator.

use crate::domain::coerce::{
    Coerce, Fields, FromMapping, Mapping, OrderedFields, ignore_unknown, non_empty,
    present_fields, read_bool, read_string,
};
use crate::domain::discriminator::{DISCRIMINATOR, Registry, expect_discriminator};
use crate::error::Result;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationType {
    Redirect,
    External,
    Embedded,
    Qr,
    MobileApplication,
}

impl ConfirmationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationType::Redirect => "redirect",
            ConfirmationType::External => "external",
            ConfirmationType::Embedded => "embedded",
            ConfirmationType::Qr => "qr",
            ConfirmationType::MobileApplication => "mobile_application",
        }
    }
}

/// Redirect the payer to the gateway page and back to `return_url`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RedirectConfirmation {
    return_url: Option<String>,
    enforce: Option<bool>,
    locale: Option<String>,
}

impl RedirectConfirmation {
    pub fn new(return_url: impl Into<String>) -> Result<Self> {
        let mut confirmation = Self::default();
        confirmation.set_return_url(return_url)?;
        Ok(confirmation)
    }

    pub fn return_url(&self) -> Option<&str> {
        self.return_url.as_deref()
    }

    pub fn enforce(&self) -> Option<bool> {
        self.enforce
    }

    pub fn set_return_url(&mut self, return_url: impl Into<String>) -> Result<()> {
        self.return_url = Some(non_empty("return_url", return_url.into())?);
        Ok(())
    }

    pub fn set_enforce(&mut self, enforce: bool) {
        self.enforce = Some(enforce);
    }
}

/// Confirmation types that carry nothing but an optional interface locale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocaleConfirmation {
    locale: Option<String>,
}

/// Confirmation in the gateway's mobile application.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MobileApplicationConfirmation {
    return_url: Option<String>,
    locale: Option<String>,
}

impl MobileApplicationConfirmation {
    pub fn return_url(&self) -> Option<&str> {
        self.return_url.as_deref()
    }

    pub fn set_return_url(&mut self, return_url: impl Into<String>) -> Result<()> {
        self.return_url = Some(non_empty("return_url", return_url.into())?);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    Redirect(RedirectConfirmation),
    External(LocaleConfirmation),
    Embedded(LocaleConfirmation),
    Qr(LocaleConfirmation),
    MobileApplication(MobileApplicationConfirmation),
}

static CONFIRMATIONS: Registry<Confirmation> = Registry::new(
    "Confirmation",
    &[
        ("redirect", redirect),
        ("external", external),
        ("embedded", embedded),
        ("qr", qr),
        ("mobile_application", mobile_application),
    ],
);

fn redirect(map: &Mapping) -> Result<Confirmation> {
    RedirectConfirmation::from_mapping(map).map(Confirmation::Redirect)
}

fn external(map: &Mapping) -> Result<Confirmation> {
    read_locale_only(map).map(Confirmation::External)
}

fn embedded(map: &Mapping) -> Result<Confirmation> {
    read_locale_only(map).map(Confirmation::Embedded)
}

fn qr(map: &Mapping) -> Result<Confirmation> {
    read_locale_only(map).map(Confirmation::Qr)
}

fn mobile_application(map: &Mapping) -> Result<Confirmation> {
    let mut confirmation = MobileApplicationConfirmation::default();
    for (key, value) in present_fields(map) {
        match key {
            DISCRIMINATOR => {}
            "return_url" => confirmation.set_return_url(read_string(value)?)?,
            "locale" => confirmation.locale = Some(read_locale(value)?),
            _ => ignore_unknown("MobileApplicationConfirmation", key),
        }
    }
    Ok(Confirmation::MobileApplication(confirmation))
}

fn read_locale_only(map: &Mapping) -> Result<LocaleConfirmation> {
    let mut confirmation = LocaleConfirmation::default();
    for (key, value) in present_fields(map) {
        match key {
            DISCRIMINATOR => {}
            "locale" => confirmation.locale = Some(read_locale(value)?),
            _ => ignore_unknown("Confirmation", key),
        }
    }
    Ok(confirmation)
}

fn read_locale(value: &Value) -> Result<String> {
    non_empty("locale", read_string(value)?)
}

impl Confirmation {
    pub fn external() -> Self {
        Confirmation::External(LocaleConfirmation::default())
    }

    pub fn embedded() -> Self {
        Confirmation::Embedded(LocaleConfirmation::default())
    }

    pub fn qr() -> Self {
        Confirmation::Qr(LocaleConfirmation::default())
    }

    pub fn confirmation_type(&self) -> ConfirmationType {
        match self {
            Confirmation::Redirect(_) => ConfirmationType::Redirect,
            Confirmation::External(_) => ConfirmationType::External,
            Confirmation::Embedded(_) => ConfirmationType::Embedded,
            Confirmation::Qr(_) => ConfirmationType::Qr,
            Confirmation::MobileApplication(_) => ConfirmationType::MobileApplication,
        }
    }

    pub fn locale(&self) -> Option<&str> {
        match self {
            Confirmation::Redirect(c) => c.locale.as_deref(),
            Confirmation::External(c) | Confirmation::Embedded(c) | Confirmation::Qr(c) => {
                c.locale.as_deref()
            }
            Confirmation::MobileApplication(c) => c.locale.as_deref(),
        }
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) -> Result<()> {
        let locale = Some(non_empty("locale", locale.into())?);
        match self {
            Confirmation::Redirect(c) => c.locale = locale,
            Confirmation::External(c) | Confirmation::Embedded(c) | Confirmation::Qr(c) => {
                c.locale = locale
            }
            Confirmation::MobileApplication(c) => c.locale = locale,
        }
        Ok(())
    }
}

impl FromMapping for Confirmation {
    const TYPE_NAME: &'static str = "Confirmation";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        CONFIRMATIONS.resolve(map)
    }
}

impl FromMapping for RedirectConfirmation {
    const TYPE_NAME: &'static str = "RedirectConfirmation";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        expect_discriminator(map, ConfirmationType::Redirect.as_str())?;
        let mut confirmation = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                DISCRIMINATOR => {}
                "return_url" => confirmation.set_return_url(read_string(value)?)?,
                "enforce" => confirmation.set_enforce(read_bool(value)?),
                "locale" => confirmation.locale = Some(read_locale(value)?),
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(confirmation)
    }
}

impl From<RedirectConfirmation> for Confirmation {
    fn from(confirmation: RedirectConfirmation) -> Self {
        Confirmation::Redirect(confirmation)
    }
}

impl Coerce<Confirmation> for RedirectConfirmation {
    fn coerce(self) -> Result<Confirmation> {
        Ok(self.into())
    }
}

impl From<MobileApplicationConfirmation> for Confirmation {
    fn from(confirmation: MobileApplicationConfirmation) -> Self {
        Confirmation::MobileApplication(confirmation)
    }
}

impl Coerce<Confirmation> for MobileApplicationConfirmation {
    fn coerce(self) -> Result<Confirmation> {
        Ok(self.into())
    }
}

impl OrderedFields for Confirmation {
    fn to_ordered_fields(&self) -> Mapping {
        let fields = Fields::new().with(DISCRIMINATOR, self.confirmation_type().as_str());
        let fields = match self {
            Confirmation::Redirect(c) => fields
                .with_opt("return_url", c.return_url.clone())
                .with_opt("enforce", c.enforce),
            Confirmation::MobileApplication(c) => {
                fields.with_opt("return_url", c.return_url.clone())
            }
            Confirmation::External(_) | Confirmation::Embedded(_) | Confirmation::Qr(_) => fields,
        };
        fields.with_opt("locale", self.locale()).finish()
    }
}
