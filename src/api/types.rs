//! Serde types matching the backend's JSON payloads.
//!
//! Almost every field is optional or defaulted: the backend omits fields
//! freely and a missing one should not turn a good reply into a failure.
//! Identifiers go through [`RecordId`], which takes `_id`, `id` or both.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Record identifier.
///
/// The backend sends `_id`, `id`, or both (when virtuals are enabled); `id`
/// wins when both are present and non-empty. Serialized back as `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordId {
  id: String,
}

impl<'de> Deserialize<'de> for RecordId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    struct Keys {
      #[serde(default)]
      id: Option<String>,
      #[serde(default, rename = "_id")]
      underscored: Option<String>,
    }

    let keys = Keys::deserialize(deserializer)?;
    let id = [keys.id, keys.underscored]
      .into_iter()
      .flatten()
      .find(|id| !id.is_empty())
      .unwrap_or_default();
    Ok(Self { id })
  }
}

impl From<&str> for RecordId {
  fn from(id: &str) -> Self {
    Self { id: id.to_string() }
  }
}

impl PartialEq<&str> for RecordId {
  fn eq(&self, other: &&str) -> bool {
    self.id == *other
  }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.id)
  }
}

// ============================================================================
// Auth
// ============================================================================

/// Acknowledgement returned by the OTP endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtpAck {
  #[serde(default)]
  pub message: String,
}

/// Reply to a successful OTP verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
  #[serde(default)]
  pub token: String,
  #[serde(default)]
  pub user: Option<User>,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  #[serde(flatten)]
  pub id: RecordId,
  pub phone: Option<String>,
  pub mobile_number: Option<String>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub full_name: Option<String>,
  pub email: Option<String>,
  pub gender: Option<String>,
  pub pincode: Option<String>,
  pub pan_number: Option<String>,
  pub date_of_birth: Option<String>,
  pub job_type: Option<String>,
  pub monthly_salary: Option<f64>,
  pub loan_amount: Option<f64>,
  pub profile_image: Option<String>,
  pub is_profile_complete: Option<bool>,
  #[serde(default)]
  pub created_at: String,
  #[serde(default)]
  pub updated_at: String,
}

/// Partial profile update; unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub full_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gender: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pincode: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pan_number: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date_of_birth: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub monthly_salary: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub loan_amount: Option<f64>,
}

impl ProfileUpdate {
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

// ============================================================================
// Partners
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
  #[serde(flatten)]
  pub id: RecordId,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub logo: String,
  #[serde(default)]
  pub website: String,
  pub description: Option<String>,
  pub interest_rate: Option<f64>,
  pub processing_fee: Option<f64>,
  pub min_amount: Option<f64>,
  pub max_amount: Option<f64>,
  pub min_tenure: Option<u32>,
  pub max_tenure: Option<u32>,
  #[serde(rename = "type")]
  pub partner_type: Option<String>,
  #[serde(default)]
  pub is_active: bool,
}

// ============================================================================
// FAQs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqCategory {
  #[serde(flatten)]
  pub id: RecordId,
  #[serde(default)]
  pub name: String,
  pub description: Option<String>,
  #[serde(default)]
  pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
  #[serde(flatten)]
  pub id: RecordId,
  #[serde(default)]
  pub question: String,
  #[serde(default)]
  pub answer: String,
  #[serde(default)]
  pub category_id: String,
  pub category: Option<FaqCategory>,
  #[serde(default)]
  pub is_active: bool,
}

// ============================================================================
// Footer
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
  #[serde(flatten)]
  pub id: RecordId,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
  #[serde(flatten)]
  pub id: RecordId,
  #[serde(default)]
  pub platform: String,
  #[serde(default)]
  pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
  #[serde(flatten)]
  pub id: RecordId,
  pub google_play_link: Option<String>,
  pub app_store_link: Option<String>,
  pub qr_code_image: Option<String>,
  #[serde(default)]
  pub footer_links: Vec<FooterLink>,
  #[serde(default)]
  pub social_links: Vec<SocialLink>,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub address: Option<String>,
}

// ============================================================================
// Loans
// ============================================================================

/// Entry of the public loan offer listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanListItem {
  #[serde(flatten)]
  pub id: RecordId,
  #[serde(default)]
  pub image: String,
  #[serde(default)]
  pub price: String,
  #[serde(default)]
  pub url: String,
  #[serde(default)]
  pub logo_url: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub is_active: bool,
}

/// Full loan product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
  #[serde(flatten)]
  pub id: RecordId,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub amount: f64,
  #[serde(default)]
  pub interest_rate: f64,
  #[serde(default)]
  pub tenure: u32,
  #[serde(default)]
  pub bank_name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub eligibility: Vec<String>,
  #[serde(default)]
  pub documents: Vec<String>,
  #[serde(default)]
  pub processing_fee: f64,
  #[serde(default)]
  pub prepayment_charges: f64,
  pub partner_id: Option<String>,
  pub partner: Option<Partner>,
  #[serde(default)]
  pub is_active: bool,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_user_accepts_mongo_id_and_missing_fields() {
    let user: User = serde_json::from_value(json!({
      "_id": "u1",
      "mobileNumber": "9999999999",
      "monthlySalary": 50000
    }))
    .unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.mobile_number.as_deref(), Some("9999999999"));
    assert_eq!(user.monthly_salary, Some(50000.0));
    assert!(user.email.is_none());
  }

  #[test]
  fn test_profile_update_omits_unset_fields() {
    let update = ProfileUpdate {
      email: Some("a@b.in".to_string()),
      ..ProfileUpdate::default()
    };
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({"email": "a@b.in"}));
    assert!(!update.is_empty());
    assert!(ProfileUpdate::default().is_empty());
  }

  #[test]
  fn test_loan_list_item() {
    let item: LoanListItem = serde_json::from_value(json!({
      "_id": "l1",
      "logoUrl": "https://img/logo.png",
      "tags": ["instant"],
      "isActive": true,
      "__v": 0
    }))
    .unwrap();
    assert_eq!(item.id, "l1");
    assert_eq!(item.logo_url, "https://img/logo.png");
    assert_eq!(item.tags, vec!["instant".to_string()]);
    assert!(item.is_active);
  }

  #[test]
  fn test_both_id_keys_are_accepted() {
    let partner: Partner = serde_json::from_value(json!({
      "_id": "p1",
      "id": "p1",
      "name": "Bank One",
      "isActive": true
    }))
    .unwrap();
    assert_eq!(partner.id, "p1");
    assert_eq!(partner.name, "Bank One");
    assert!(partner.is_active);

    let link: FooterLink =
      serde_json::from_value(json!({"_id": "l1", "id": "l1", "title": "Privacy"})).unwrap();
    assert_eq!(link.id, "l1");
  }

  #[test]
  fn test_id_key_variants() {
    let only_id: Faq = serde_json::from_value(json!({"id": "q1"})).unwrap();
    assert_eq!(only_id.id, "q1");

    let empty_id: Faq = serde_json::from_value(json!({"id": "", "_id": "q2"})).unwrap();
    assert_eq!(empty_id.id, "q2");

    let null_id: Loan = serde_json::from_value(json!({"id": null, "_id": "l3"})).unwrap();
    assert_eq!(null_id.id, "l3");

    let missing: Footer = serde_json::from_value(json!({"email": "hi@cready.in"})).unwrap();
    assert_eq!(missing.id, RecordId::default());
  }

  #[test]
  fn test_record_id_serializes_as_id() {
    let category = FaqCategory {
      id: RecordId::from("c1"),
      name: "Loans".to_string(),
      ..FaqCategory::default()
    };
    let value = serde_json::to_value(&category).unwrap();
    assert_eq!(value["id"], json!("c1"));
    assert!(value.get("_id").is_none());

    let back: FaqCategory = serde_json::from_value(value).unwrap();
    assert_eq!(back, category);
  }

  #[test]
  fn test_partner_type_field() {
    let partner: Partner =
      serde_json::from_value(json!({"id": "p1", "name": "Bank", "type": "nbfc"})).unwrap();
    assert_eq!(partner.partner_type.as_deref(), Some("nbfc"));
  }
}
