use crate::domain::coerce::{
    Fields, FromMapping, Mapping, OrderedFields, ignore_unknown, non_empty, present_fields,
    read_string,
};
use crate::error::Result;

/// The shop account and gateway the payment is credited to.
///
/// Both fields may be left unset while the object is being built; the
/// owning request requires them at validation time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recipient {
    account_id: Option<String>,
    gateway_id: Option<String>,
}

impl Recipient {
    pub fn new(account_id: impl Into<String>, gateway_id: impl Into<String>) -> Result<Self> {
        let mut recipient = Self::default();
        recipient.set_account_id(account_id)?;
        recipient.set_gateway_id(gateway_id)?;
        Ok(recipient)
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn gateway_id(&self) -> Option<&str> {
        self.gateway_id.as_deref()
    }

    pub fn set_account_id(&mut self, account_id: impl Into<String>) -> Result<()> {
        self.account_id = Some(non_empty("account_id", account_id.into())?);
        Ok(())
    }

    pub fn set_gateway_id(&mut self, gateway_id: impl Into<String>) -> Result<()> {
        self.gateway_id = Some(non_empty("gateway_id", gateway_id.into())?);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.account_id.is_some() && self.gateway_id.is_some()
    }
}

impl FromMapping for Recipient {
    const TYPE_NAME: &'static str = "Recipient";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut recipient = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                "account_id" => recipient.set_account_id(read_string(value)?)?,
                "gateway_id" => recipient.set_gateway_id(read_string(value)?)?,
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(recipient)
    }
}

impl OrderedFields for Recipient {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_opt("account_id", self.account_id.clone())
            .with_opt("gateway_id", self.gateway_id.clone())
            .finish()
    }
}
