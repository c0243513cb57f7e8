use serde::{Deserialize, Serialize};

/// One row of the prospect table as supplied by a loader.
///
/// Every field is nullable. `company` is the only structural requirement:
/// deserializing an object without a `company` key fails, while
/// `"company": null` is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(alias = "Empresa", deserialize_with = "Option::deserialize")]
    pub company: Option<String>,
    #[serde(default, alias = "Nome")]
    pub contact_name: Option<String>,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    /// Mobile number
    #[serde(default, alias = "Celular")]
    pub phone_primary: Option<String>,
    /// Landline number
    #[serde(default, alias = "Telefone")]
    pub phone_secondary: Option<String>,
}

impl RawRecord {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: Some(company.into()),
            ..Default::default()
        }
    }

    pub fn with_contact_name(mut self, name: impl Into<String>) -> Self {
        self.contact_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone_primary(mut self, phone: impl Into<String>) -> Self {
        self.phone_primary = Some(phone.into());
        self
    }

    pub fn with_phone_secondary(mut self, phone: impl Into<String>) -> Self {
        self.phone_secondary = Some(phone.into());
        self
    }
}
