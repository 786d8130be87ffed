//! Shipping details captured at checkout.

use serde::{Deserialize, Serialize};

/// Longest phone number the order and customer records can hold.
pub const MAX_PHONE_LENGTH: usize = 20;

/// Submitted details that cannot be stored.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingError {
    /// The phone number is longer than [`MAX_PHONE_LENGTH`].
    #[error("phone number must be at most {max} characters")]
    PhoneTooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Contact and delivery details submitted with an order.
///
/// All fields are free text. Missing form fields deserialize as empty strings
/// and values are trimmed by [`ShippingDetails::normalized`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(alias = "zip_code")]
    pub zip: String,
    pub phone: String,
    pub notes: String,
}

impl ShippingDetails {
    /// Return a copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            zip: self.zip.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            notes: self.notes.trim().to_owned(),
        }
    }

    /// Multi-line address printed on the order.
    ///
    /// ```text
    /// {first} {last}
    /// {address}
    /// {city}, {state} {zip}
    /// ```
    #[must_use]
    pub fn shipping_address(&self) -> String {
        format!(
            "{} {}\n{}\n{}, {} {}",
            self.first_name, self.last_name, self.address, self.city, self.state, self.zip
        )
    }

    /// Address saved on the customer profile (shipping address plus phone).
    #[must_use]
    pub fn customer_address(&self) -> String {
        format!("{}\nPhone: {}", self.shipping_address(), self.phone)
    }

    /// Check that every field fits its column.
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::PhoneTooLong` if the trimmed phone number is
    /// longer than [`MAX_PHONE_LENGTH`] characters.
    pub fn validate(&self) -> Result<(), ShippingError> {
        if self.phone.trim().chars().count() > MAX_PHONE_LENGTH {
            return Err(ShippingError::PhoneTooLong {
                max: MAX_PHONE_LENGTH,
            });
        }
        Ok(())
    }

    /// Whether enough was provided to update the customer profile.
    ///
    /// Requires first name, last name, address and phone.
    #[must_use]
    pub fn has_contact_details(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.address,
            &self.phone,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}
