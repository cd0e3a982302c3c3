//! Typed wrappers binding each backend capability to an endpoint, a method
//! and a cache policy.

use std::path::Path;
use std::time::Duration;

use super::client::ApiClient;
use super::envelope::{ApiResponse, Body, CachePolicy, Method, RequestOptions};
use super::types::{
  AuthSession, Faq, FaqCategory, Footer, Loan, LoanListItem, OtpAck, Partner, ProfileUpdate, User,
};

pub mod paths {
  pub const SEND_OTP: &str = "/api/users/send-otp";
  pub const VERIFY_OTP: &str = "/api/users/verify-otp";
  pub const USER_PROFILE: &str = "/api/users/profile";
  pub const PROFILE_IMAGE: &str = "/api/users/profile/image";
  pub const PARTNERS: &str = "/api/partners";
  pub const ACTIVE_PARTNERS: &str = "/api/partners?active=true&page=1&limit=100";
  pub const FAQS: &str = "/api/faqs";
  pub const FAQ_CATEGORIES: &str = "/api/faq-categories";
  pub const FOOTER: &str = "/api/footer";
  pub const LOAN_LIST: &str = "/api/loan-lists?active=true";
  pub const LOANS: &str = "/api/loans";
}

const PROFILE_TTL: Duration = Duration::from_secs(10 * 60);
const PARTNERS_TTL: Duration = Duration::from_secs(30 * 60);
const FAQS_TTL: Duration = Duration::from_secs(60 * 60);
const FOOTER_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const LOANS_TTL: Duration = Duration::from_secs(15 * 60);

const IMAGE_FILE_NAME: &str = "profile-image.jpg";

impl ApiClient {
  // ==========================================================================
  // Auth
  // ==========================================================================

  pub async fn send_otp(&self, phone: &str) -> ApiResponse<OtpAck> {
    let body = serde_json::json!({ "mobileNumber": phone });
    self
      .request(
        paths::SEND_OTP,
        RequestOptions::new(Method::Post).body(Body::Json(body.to_string())),
        CachePolicy::no_cache(),
      )
      .await
  }

  /// Verify the OTP; on success the returned token becomes the session token.
  pub async fn verify_otp(&self, phone: &str, otp: &str) -> ApiResponse<AuthSession> {
    let body = serde_json::json!({ "mobileNumber": phone, "otp": otp });
    let response: ApiResponse<AuthSession> = self
      .request(
        paths::VERIFY_OTP,
        RequestOptions::new(Method::Post).body(Body::Json(body.to_string())),
        CachePolicy::no_cache(),
      )
      .await;

    if response.success {
      if let Some(session) = response.data.as_ref().filter(|s| !s.token.is_empty()) {
        self.set_token(&session.token);
      }
    }

    response
  }

  // ==========================================================================
  // Profile
  // ==========================================================================

  pub async fn get_user_profile(&self) -> ApiResponse<User> {
    self
      .request(
        paths::USER_PROFILE,
        RequestOptions::get(),
        CachePolicy::ttl(PROFILE_TTL),
      )
      .await
  }

  /// Apply a partial update. A successful write evicts the cached profile read.
  pub async fn update_user_profile(&self, updates: &ProfileUpdate) -> ApiResponse<User> {
    let body = match Body::json(updates) {
      Ok(body) => body,
      Err(e) => return ApiResponse::failure("Could not encode profile update", e.to_string()),
    };

    let response = self
      .request(
        paths::USER_PROFILE,
        RequestOptions::new(Method::Put).body(body),
        CachePolicy::no_cache(),
      )
      .await;

    if response.success {
      self.invalidate_profile();
    }
    response
  }

  /// Upload a new profile picture. A successful upload evicts the cached profile read.
  pub async fn update_profile_image(&self, image: &Path) -> ApiResponse<User> {
    let bytes = match tokio::fs::read(image).await {
      Ok(bytes) => bytes,
      Err(e) => {
        return ApiResponse::failure(
          format!("Could not read image {}", image.display()),
          e.to_string(),
        )
      }
    };

    let response = self
      .request(
        paths::PROFILE_IMAGE,
        RequestOptions::new(Method::Put).body(Body::Image {
          file_name: IMAGE_FILE_NAME.to_string(),
          bytes,
        }),
        CachePolicy::no_cache(),
      )
      .await;

    if response.success {
      self.invalidate_profile();
    }
    response
  }

  fn invalidate_profile(&self) {
    self.clear_cache(paths::USER_PROFILE, &RequestOptions::get());
  }

  // ==========================================================================
  // Partners
  // ==========================================================================

  pub async fn get_all_partners(&self) -> ApiResponse<Vec<Partner>> {
    self
      .request(
        paths::ACTIVE_PARTNERS,
        RequestOptions::get(),
        CachePolicy::ttl(PARTNERS_TTL),
      )
      .await
  }

  pub async fn get_partner_by_id(&self, id: &str) -> ApiResponse<Partner> {
    self
      .request(
        &format!("{}/{}", paths::PARTNERS, id),
        RequestOptions::get(),
        CachePolicy::ttl(PARTNERS_TTL),
      )
      .await
  }

  // ==========================================================================
  // FAQs
  // ==========================================================================

  pub async fn get_all_faqs(&self) -> ApiResponse<Vec<Faq>> {
    self
      .request(paths::FAQS, RequestOptions::get(), CachePolicy::ttl(FAQS_TTL))
      .await
  }

  pub async fn get_faq_by_id(&self, id: &str) -> ApiResponse<Faq> {
    self
      .request(
        &format!("{}/{}", paths::FAQS, id),
        RequestOptions::get(),
        CachePolicy::ttl(FAQS_TTL),
      )
      .await
  }

  pub async fn get_faq_categories(&self) -> ApiResponse<Vec<FaqCategory>> {
    self
      .request(
        paths::FAQ_CATEGORIES,
        RequestOptions::get(),
        CachePolicy::ttl(FAQS_TTL),
      )
      .await
  }

  pub async fn get_faq_category_by_id(&self, id: &str) -> ApiResponse<FaqCategory> {
    self
      .request(
        &format!("{}/{}", paths::FAQ_CATEGORIES, id),
        RequestOptions::get(),
        CachePolicy::ttl(FAQS_TTL),
      )
      .await
  }

  // ==========================================================================
  // Footer and loans
  // ==========================================================================

  pub async fn get_footer(&self) -> ApiResponse<Footer> {
    self
      .make_request(paths::FOOTER, RequestOptions::get(), CachePolicy::ttl(FOOTER_TTL))
      .await
  }

  pub async fn get_loan_list(&self) -> ApiResponse<Vec<LoanListItem>> {
    self
      .make_request(
        paths::LOAN_LIST,
        RequestOptions::get(),
        CachePolicy::ttl(LOANS_TTL),
      )
      .await
  }

  pub async fn get_loan_by_id(&self, id: &str) -> ApiResponse<Loan> {
    self
      .request(
        &format!("{}/{}", paths::LOANS, id),
        RequestOptions::get(),
        CachePolicy::ttl(LOANS_TTL),
      )
      .await
  }

  // ==========================================================================
  // Pull-to-refresh
  //
  // These go through the same cache-aware path as the plain getters: a live
  // cache entry is not bypassed, only re-validated by the next online fetch.
  // ==========================================================================

  pub async fn refresh_profile(&self) -> ApiResponse<User> {
    self.get_user_profile().await
  }

  pub async fn refresh_partners(&self) -> ApiResponse<Vec<Partner>> {
    self.get_all_partners().await
  }

  pub async fn refresh_faqs(&self) -> ApiResponse<Vec<Faq>> {
    self.get_all_faqs().await
  }

  pub async fn refresh_footer(&self) -> ApiResponse<Footer> {
    self.get_footer().await
  }

  pub async fn refresh_loan_list(&self) -> ApiResponse<Vec<LoanListItem>> {
    self.get_loan_list().await
  }
}
