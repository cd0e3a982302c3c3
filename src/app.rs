use crate::api::{ApiClient, ApiResponse, ProfileUpdate};
use crate::cache::{CacheStore, SystemClock};
use crate::commands::{
  ById, CacheCommand, Command, OtpCommand, ProfileArgs, ProfileCommand, RefreshTarget,
};
use crate::config::Config;
use crate::db::{Database, KeyValueStore, MemoryStore};
use crate::network::{ConnectivityProbe, NetworkObserver, NetworkState, SocketProbe, StaticProbe};
use crate::telemetry::{ErrorSink, TracingSink};
use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runtime switches that do not live in the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
  pub offline: bool,
  pub ephemeral: bool,
}

/// Wires storage, cache, connectivity and the API client together and
/// executes one command.
pub struct App {
  client: ApiClient,
  network: Arc<NetworkObserver>,
}

impl App {
  pub fn new(config: &Config, flags: Flags) -> Result<Self> {
    let base_url = config.api.base_url()?;

    let storage: Arc<dyn KeyValueStore> = if flags.ephemeral {
      Arc::new(MemoryStore::new())
    } else {
      Arc::new(Database::open(config.storage.path.as_deref())?)
    };
    let sink: Arc<dyn ErrorSink> = Arc::new(TracingSink);

    let cache = Arc::new(
      CacheStore::new(storage.clone(), Arc::new(SystemClock), sink.clone())
        .with_default_ttl(config.cache.default_ttl()),
    );

    let probe: Arc<dyn ConnectivityProbe> = if flags.offline {
      Arc::new(StaticProbe::new(NetworkState::offline()))
    } else {
      Arc::new(SocketProbe::for_url(&base_url, config.api.timeout())?)
    };
    let network = Arc::new(NetworkObserver::new(probe));

    let client = ApiClient::new(
      base_url,
      config.api.timeout(),
      storage,
      cache,
      network.clone(),
      sink,
    )?;
    client.initialize();

    Ok(Self { client, network })
  }

  /// Execute `command`, printing its result as JSON on stdout.
  ///
  /// Returns whether the command succeeded; API failures are reported in
  /// the printed envelope rather than as an `Err`.
  pub async fn run(&self, command: Command) -> Result<bool> {
    let client = &self.client;

    match command {
      Command::Otp(OtpCommand::Send { phone }) => emit(&client.send_otp(&phone).await),
      Command::Otp(OtpCommand::Verify { phone, otp }) => {
        emit(&client.verify_otp(&phone, &otp).await)
      }

      Command::Profile(ProfileCommand::Show) => emit(&client.get_user_profile().await),
      Command::Profile(ProfileCommand::Update(args)) => {
        let updates = profile_update(args);
        if updates.is_empty() {
          return Err(eyre!("Nothing to update; pass at least one field"));
        }
        emit(&client.update_user_profile(&updates).await)
      }
      Command::Profile(ProfileCommand::Image { path }) => {
        emit(&client.update_profile_image(&path).await)
      }

      Command::Partners(ById { id: Some(id) }) => emit(&client.get_partner_by_id(&id).await),
      Command::Partners(ById { id: None }) => emit(&client.get_all_partners().await),
      Command::Faqs(ById { id: Some(id) }) => emit(&client.get_faq_by_id(&id).await),
      Command::Faqs(ById { id: None }) => emit(&client.get_all_faqs().await),
      Command::FaqCategories(ById { id: Some(id) }) => {
        emit(&client.get_faq_category_by_id(&id).await)
      }
      Command::FaqCategories(ById { id: None }) => emit(&client.get_faq_categories().await),
      Command::Footer => emit(&client.get_footer().await),
      Command::Loans(ById { id: Some(id) }) => emit(&client.get_loan_by_id(&id).await),
      Command::Loans(ById { id: None }) => emit(&client.get_loan_list().await),

      Command::Refresh { what } => match what {
        RefreshTarget::Profile => emit(&client.refresh_profile().await),
        RefreshTarget::Partners => emit(&client.refresh_partners().await),
        RefreshTarget::Faqs => emit(&client.refresh_faqs().await),
        RefreshTarget::Footer => emit(&client.refresh_footer().await),
        RefreshTarget::Loans => emit(&client.refresh_loan_list().await),
      },

      Command::Prefetch => self.prefetch().await,

      Command::Cache(CacheCommand::Info) => {
        print_json(&client.cache_info())?;
        Ok(true)
      }
      Command::Cache(CacheCommand::Clear) => {
        client.cache().clear();
        print_json(&serde_json::json!({ "cleared": true }))?;
        Ok(true)
      }
      Command::Cache(CacheCommand::Cleanup) => {
        let removed = client.cache().cleanup();
        print_json(&serde_json::json!({ "removed": removed }))?;
        Ok(true)
      }

      Command::Network { watch: false, .. } => {
        let state = self.network.refresh().await;
        print_json(&state)?;
        Ok(state.is_online())
      }
      Command::Network { watch: true, interval } => {
        self.watch_network(Duration::from_secs(interval.max(1))).await
      }

      Command::Logout => {
        client.logout();
        print_json(&serde_json::json!({ "loggedOut": true }))?;
        Ok(true)
      }
    }
  }

  /// Fetch every public listing concurrently so they are available offline.
  async fn prefetch(&self) -> Result<bool> {
    let client = &self.client;
    let (partners, faqs, categories, footer, loans) = futures::join!(
      client.get_all_partners(),
      client.get_all_faqs(),
      client.get_faq_categories(),
      client.get_footer(),
      client.get_loan_list(),
    );

    let summary = serde_json::json!({
      "partners": outcome(&partners),
      "faqs": outcome(&faqs),
      "faqCategories": outcome(&categories),
      "footer": outcome(&footer),
      "loans": outcome(&loans),
    });
    print_json(&summary)?;

    Ok(partners.success && faqs.success && categories.success && footer.success && loans.success)
  }

  async fn watch_network(&self, interval: Duration) -> Result<bool> {
    let id = self.network.subscribe(|state| {
      if let Err(e) = print_json(state) {
        tracing::warn!(error = %e, "failed to print network state");
      }
    });
    let watcher = self.network.spawn_watcher(interval);
    info!(interval_secs = interval.as_secs(), "watching network");

    let result = tokio::signal::ctrl_c()
      .await
      .map_err(|e| eyre!("Failed to listen for Ctrl-C: {}", e));

    watcher.abort();
    self.network.unsubscribe(id);
    result.map(|_| true)
  }
}

fn profile_update(args: ProfileArgs) -> ProfileUpdate {
  ProfileUpdate {
    full_name: args.full_name,
    email: args.email,
    gender: args.gender,
    pincode: args.pincode,
    pan_number: args.pan_number,
    date_of_birth: args.date_of_birth,
    job_type: args.job_type,
    monthly_salary: args.monthly_salary,
    loan_amount: args.loan_amount,
  }
}

fn outcome<T>(response: &ApiResponse<T>) -> serde_json::Value {
  serde_json::json!({
    "success": response.success,
    "fromCache": response.from_cache,
    "message": response.message,
  })
}

fn emit<T: Serialize>(response: &ApiResponse<T>) -> Result<bool> {
  print_json(response)?;
  Ok(response.success)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  let json =
    serde_json::to_string_pretty(value).map_err(|e| eyre!("Failed to encode output: {}", e))?;
  println!("{}", json);
  Ok(())
}
