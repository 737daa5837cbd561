use serde::{Deserialize, Serialize};

use invoicepad_core::{SettingsField, ValidationError, ValueObject};

pub const DEFAULT_SHOP_NAME: &str = "Satish Traders";
pub const DEFAULT_SHOP_LOGO: &str = "🏪";
pub const DEFAULT_SHOP_ADDRESS: &str = "Moti Chowk Phaltan";
pub const DEFAULT_SHOP_CONTACT: &str = "Phone: (555) 123-4567 | Email: info@satishtraders.com";
pub const DEFAULT_TAX_REGISTRATION_ID: &str = "27XXXXX1234X1Z5";

/// Seller identity printed on every invoice.
///
/// Serialized with the keys of the persisted `businessSettings` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    pub shop_name: String,
    pub shop_logo: String,
    pub shop_address: String,
    pub shop_contact: String,
    #[serde(rename = "shopGst")]
    pub tax_registration_id: String,
}

impl ValueObject for BusinessSettings {}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            shop_name: DEFAULT_SHOP_NAME.to_string(),
            shop_logo: DEFAULT_SHOP_LOGO.to_string(),
            shop_address: DEFAULT_SHOP_ADDRESS.to_string(),
            shop_contact: DEFAULT_SHOP_CONTACT.to_string(),
            tax_registration_id: DEFAULT_TAX_REGISTRATION_ID.to_string(),
        }
    }
}

/// A persisted record that may predate some fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialBusinessSettings {
    pub shop_name: Option<String>,
    pub shop_logo: Option<String>,
    pub shop_address: Option<String>,
    pub shop_contact: Option<String>,
    #[serde(rename = "shopGst")]
    pub tax_registration_id: Option<String>,
}

impl BusinessSettings {
    /// Fill every field missing from `partial` with its default.
    pub fn merged_over_defaults(partial: PartialBusinessSettings) -> Self {
        let defaults = Self::default();
        Self {
            shop_name: partial.shop_name.unwrap_or(defaults.shop_name),
            shop_logo: partial.shop_logo.unwrap_or(defaults.shop_logo),
            shop_address: partial.shop_address.unwrap_or(defaults.shop_address),
            shop_contact: partial.shop_contact.unwrap_or(defaults.shop_contact),
            tax_registration_id: partial
                .tax_registration_id
                .unwrap_or(defaults.tax_registration_id),
        }
    }

    /// Contact text up to the first `|` separator.
    pub fn primary_contact(&self) -> &str {
        self.shop_contact
            .split('|')
            .next()
            .unwrap_or_default()
            .trim()
    }

    fn trimmed(&self) -> Self {
        let logo = self.shop_logo.trim();
        Self {
            shop_name: self.shop_name.trim().to_string(),
            shop_logo: if logo.is_empty() {
                DEFAULT_SHOP_LOGO.to_string()
            } else {
                logo.to_string()
            },
            shop_address: self.shop_address.trim().to_string(),
            shop_contact: self.shop_contact.trim().to_string(),
            tax_registration_id: self.tax_registration_id.trim().to_string(),
        }
    }
}

/// Validate `new` and return the record that becomes current.
///
/// Name, address and contact are required (checked in that order). Fields are
/// stored trimmed and a blank logo falls back to the default glyph. On error
/// the caller keeps `current`.
pub fn update_settings(
    current: &BusinessSettings,
    new: &BusinessSettings,
) -> Result<BusinessSettings, ValidationError> {
    let candidate = new.trimmed();

    let required = [
        (SettingsField::ShopName, &candidate.shop_name),
        (SettingsField::ShopAddress, &candidate.shop_address),
        (SettingsField::ShopContact, &candidate.shop_contact),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        tracing::debug!(%field, shop = %current.shop_name, "settings update rejected");
        return Err(ValidationError::MissingRequiredField { field: *field });
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BusinessSettings {
        BusinessSettings {
            shop_name: "Acme Stores".to_string(),
            shop_logo: "A".to_string(),
            shop_address: "12 Market Road".to_string(),
            shop_contact: "Phone: 123 | Email: a@acme.test".to_string(),
            tax_registration_id: "GST-1".to_string(),
        }
    }

    #[test]
    fn update_trims_and_defaults_logo() {
        let mut new = sample();
        new.shop_name = "  Acme  ".to_string();
        new.shop_logo = "   ".to_string();

        let updated = update_settings(&BusinessSettings::default(), &new).unwrap();
        assert_eq!(updated.shop_name, "Acme");
        assert_eq!(updated.shop_logo, DEFAULT_SHOP_LOGO);
    }

    #[test]
    fn empty_address_is_rejected() {
        let current = BusinessSettings::default();
        let mut new = sample();
        new.shop_address = " ".to_string();

        assert_eq!(
            update_settings(&current, &new),
            Err(ValidationError::MissingRequiredField {
                field: SettingsField::ShopAddress
            })
        );
    }

    #[test]
    fn first_missing_field_wins() {
        let new = BusinessSettings {
            shop_name: String::new(),
            shop_contact: String::new(),
            ..sample()
        };
        assert_eq!(
            update_settings(&sample(), &new),
            Err(ValidationError::MissingRequiredField {
                field: SettingsField::ShopName
            })
        );
    }

    #[test]
    fn tax_registration_id_is_optional() {
        let new = BusinessSettings {
            tax_registration_id: String::new(),
            ..sample()
        };
        assert!(update_settings(&sample(), &new).is_ok());
    }

    #[test]
    fn partial_record_merges_over_defaults() {
        let partial: PartialBusinessSettings =
            serde_json::from_str(r#"{"shopName":"Corner Shop","shopGst":"X1"}"#).unwrap();
        let merged = BusinessSettings::merged_over_defaults(partial);

        assert_eq!(merged.shop_name, "Corner Shop");
        assert_eq!(merged.tax_registration_id, "X1");
        assert_eq!(merged.shop_address, DEFAULT_SHOP_ADDRESS);
        assert_eq!(merged.shop_logo, DEFAULT_SHOP_LOGO);
    }

    #[test]
    fn serializes_with_record_keys() {
        let json = serde_json::to_value(BusinessSettings::default()).unwrap();
        assert_eq!(json["shopName"], DEFAULT_SHOP_NAME);
        assert_eq!(json["shopGst"], DEFAULT_TAX_REGISTRATION_ID);
    }

    #[test]
    fn primary_contact_stops_at_separator() {
        assert_eq!(BusinessSettings::default().primary_contact(), "Phone: (555) 123-4567");
        let plain = BusinessSettings {
            shop_contact: "call us".to_string(),
            ..sample()
        };
        assert_eq!(plain.primary_contact(), "call us");
    }
}
