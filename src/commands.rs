//! Command line surface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cready")]
#[command(about = "Offline-aware client for the Cready loan-discovery API")]
#[command(version)]
pub struct Cli {
  /// Path to config file (default: $XDG_CONFIG_HOME/cready/config.yaml)
  #[arg(short, long, global = true)]
  pub config: Option<PathBuf>,

  /// Mirror logs to stderr
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Act as if the device had no connectivity; reads are served from cache only
  #[arg(long, global = true)]
  pub offline: bool,

  /// Keep token and cache in memory for this run only
  #[arg(long, global = true)]
  pub ephemeral: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
  /// Log in with a one-time password
  #[command(subcommand)]
  Otp(OtpCommand),

  /// Show or edit the signed-in user's profile
  #[command(subcommand)]
  Profile(ProfileCommand),

  /// Lending partners
  #[command(visible_alias = "p")]
  Partners(ById),

  /// Frequently asked questions
  #[command(visible_alias = "f")]
  Faqs(ById),

  /// FAQ categories
  FaqCategories(ById),

  /// Site footer (links, contact details)
  Footer,

  /// Loan offers
  #[command(visible_alias = "l")]
  Loans(ById),

  /// Re-fetch one resource
  Refresh {
    #[arg(value_enum)]
    what: RefreshTarget,
  },

  /// Warm the cache with every public listing
  Prefetch,

  /// Inspect or maintain the response cache
  #[command(subcommand)]
  Cache(CacheCommand),

  /// Show connectivity
  Network {
    /// Keep running and print every change
    #[arg(short, long)]
    watch: bool,

    /// Seconds between probes while watching
    #[arg(long, default_value_t = 5)]
    interval: u64,
  },

  /// Forget the token and clear the cache
  Logout,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum OtpCommand {
  /// Request an OTP for a mobile number
  Send { phone: String },
  /// Verify an OTP and store the session token
  Verify { phone: String, otp: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ProfileCommand {
  Show,
  Update(ProfileArgs),
  /// Upload a new profile picture (JPEG)
  Image { path: PathBuf },
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ProfileArgs {
  #[arg(long)]
  pub full_name: Option<String>,
  #[arg(long)]
  pub email: Option<String>,
  #[arg(long)]
  pub gender: Option<String>,
  #[arg(long)]
  pub pincode: Option<String>,
  #[arg(long)]
  pub pan_number: Option<String>,
  /// YYYY-MM-DD
  #[arg(long)]
  pub date_of_birth: Option<String>,
  #[arg(long)]
  pub job_type: Option<String>,
  #[arg(long)]
  pub monthly_salary: Option<f64>,
  #[arg(long)]
  pub loan_amount: Option<f64>,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ById {
  /// Fetch a single item instead of the listing
  #[arg(long)]
  pub id: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CacheCommand {
  /// Size and keys of the cache
  Info,
  /// Drop every cached response
  Clear,
  /// Drop expired entries only
  Cleanup,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTarget {
  Profile,
  Partners,
  Faqs,
  Footer,
  Loans,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("cready").chain(args.iter().copied())).unwrap()
  }

  #[test]
  fn test_global_flags_after_subcommand() {
    let cli = parse(&["footer", "--offline", "-v"]);
    assert!(cli.offline);
    assert!(cli.verbose);
    assert!(!cli.ephemeral);
    assert_eq!(cli.command, Command::Footer);
  }

  #[test]
  fn test_otp_verify() {
    let cli = parse(&["otp", "verify", "9999999999", "1234"]);
    assert_eq!(
      cli.command,
      Command::Otp(OtpCommand::Verify {
        phone: "9999999999".to_string(),
        otp: "1234".to_string()
      })
    );
  }

  #[test]
  fn test_alias_and_id() {
    let cli = parse(&["p", "--id", "p1"]);
    assert_eq!(
      cli.command,
      Command::Partners(ById {
        id: Some("p1".to_string())
      })
    );
  }

  #[test]
  fn test_profile_update_flags() {
    let cli = parse(&["profile", "update", "--email", "a@b.in", "--monthly-salary", "50000"]);
    let Command::Profile(ProfileCommand::Update(args)) = cli.command else {
      panic!("expected profile update");
    };
    assert_eq!(args.email.as_deref(), Some("a@b.in"));
    assert_eq!(args.monthly_salary, Some(50000.0));
    assert!(args.full_name.is_none());
  }

  #[test]
  fn test_refresh_target() {
    let cli = parse(&["refresh", "loans"]);
    assert_eq!(
      cli.command,
      Command::Refresh {
        what: RefreshTarget::Loans
      }
    );
    assert!(Cli::try_parse_from(["cready", "refresh", "everything"]).is_err());
  }

  #[test]
  fn test_network_defaults() {
    let cli = parse(&["network"]);
    assert_eq!(
      cli.command,
      Command::Network {
        watch: false,
        interval: 5
      }
    );
  }
}
