//! # Address Types
//!
//! Address records as the payment provider returns them, and the storefront
//! shapes they are mapped into before being written to the cart and the
//! checkout form.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Address record as returned by the provider (through the storefront backend).
///
/// Keys the storefront does not map are kept in `extra`. The record exactly as
/// received is kept in `raw`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct ProviderAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub country_id: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "street_lines")]
    pub street: Vec<String>,
    #[serde(default)]
    pub postcode: Option<String>,

    /// Provider keys with no storefront counterpart (region_id, email, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,

    /// Null for addresses built in code
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl<'de> Deserialize<'de> for ProviderAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let mut address = ProviderAddress::deserialize(&raw).map_err(de::Error::custom)?;
        address.raw = raw;
        Ok(address)
    }
}

impl Serialize for ProviderAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ProviderAddress::serialize(self, serializer)
    }
}

/// Magento sends street as an array of lines, some providers as a bare string.
fn street_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Street {
        Lines(Vec<String>),
        Single(String),
    }

    Ok(match Option::<Street>::deserialize(deserializer)? {
        Some(Street::Lines(lines)) => lines,
        Some(Street::Single(line)) => vec![line],
        None => Vec::new(),
    })
}

/// Address fields in the storefront's shape.
///
/// This is also what gets written into the checkout form sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub street: Vec<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
}

impl AddressFields {
    /// A billing address is usable once firstname, lastname and zipcode are set.
    pub fn is_complete_billing(&self) -> bool {
        [&self.firstname, &self.lastname, &self.zipcode]
            .iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

/// Storefront address handed to the cart's address setters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAddress {
    #[serde(rename = "cartId", skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,

    #[serde(flatten)]
    pub fields: AddressFields,
}

impl CartAddress {
    /// Map a provider record into the storefront shape.
    ///
    /// `postcode` becomes `zipcode`, `country_id` becomes `country` and
    /// `telephone` becomes `phone`; everything else is copied by name.
    pub fn from_provider(address: &ProviderAddress, cart_id: Option<&str>) -> Self {
        Self {
            cart_id: cart_id.map(String::from),
            fields: AddressFields {
                city: address.city.clone(),
                company: address.company.clone(),
                country: address.country_id.clone(),
                firstname: address.firstname.clone(),
                lastname: address.lastname.clone(),
                phone: address.telephone.clone(),
                region: address.region.clone(),
                street: address.street.clone(),
                zipcode: address.postcode.clone(),
            },
        }
    }
}

/// Address as the cart reports it back after a successful write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAddress {
    #[serde(flatten)]
    pub fields: AddressFields,

    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl SavedAddress {
    /// Drop the display-only `fullName` before the form sees the address.
    pub fn into_form_address(self) -> AddressFields {
        self.fields
    }
}

/// How the "billing same as shipping" flag is decided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressComparison {
    /// The provider returned the exact same record (all keys, all values)
    #[default]
    Exact,
    /// The mapped storefront fields match, provider extras ignored
    MappedFields,
}

impl AddressComparison {
    pub fn same_address(self, shipping: &ProviderAddress, billing: &ProviderAddress) -> bool {
        match self {
            AddressComparison::Exact if !shipping.raw.is_null() && !billing.raw.is_null() => {
                shipping.raw == billing.raw
            }
            AddressComparison::Exact => shipping == billing,
            AddressComparison::MappedFields => {
                CartAddress::from_provider(shipping, None).fields
                    == CartAddress::from_provider(billing, None).fields
            }
        }
    }
}
