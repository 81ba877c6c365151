use clap::{Args, Subcommand};
use lsl_proto::constants::CLIENT_TOKEN_CACHE;
use lsl_proto::v1::GrantStatus;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default)]
/// The CLI output mode, either text or json, falls back to text if you ask for something other than text/json
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

impl From<OutputMode> for clap::builder::OsStr {
    fn from(output_mode: OutputMode) -> Self {
        match output_mode {
            OutputMode::Text => "text".into(),
            OutputMode::Json => "json".into(),
        }
    }
}

impl std::str::FromStr for OutputMode {
    type Err = String;
    fn from_str(s: &str) -> Result<OutputMode, std::string::String> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputMode::Json),
            _ => Ok(OutputMode::Text),
        }
    }
}

impl OutputMode {
    pub fn print_message<T>(self, input: T)
    where
        T: serde::Serialize + fmt::Debug + fmt::Display,
    {
        match self {
            OutputMode::Json => {
                println!(
                    "{}",
                    serde_json::to_string(&input).unwrap_or(format!("{input:?}"))
                );
            }
            OutputMode::Text => {
                println!("{input}");
            }
        }
    }

    /// Lists print as one json array, or one entry after another as text.
    pub fn print_list<T>(self, input: &[T])
    where
        T: serde::Serialize + fmt::Debug + fmt::Display,
    {
        match self {
            OutputMode::Json => {
                println!(
                    "{}",
                    serde_json::to_string(input).unwrap_or(format!("{input:?}"))
                );
            }
            OutputMode::Text => {
                for item in input {
                    println!("{item}");
                }
            }
        }
    }
}

/// Options every command accepts.
#[derive(Debug, Args, Clone)]
pub struct CommonOpt {
    /// Enable debugging of the lsl tool
    #[clap(short, long, env = "LSL_DEBUG", global = true)]
    pub debug: bool,
    /// The URL of the Local Supports Local backend
    #[clap(short = 'H', long = "url", env = "LSL_URL", global = true,
    value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub addr: Option<String>,
    /// Path to a CA certificate file
    #[clap(
        value_parser,
        short = 'C',
        long = "ca",
        env = "LSL_CA_PATH",
        global = true
    )]
    pub ca_path: Option<PathBuf>,
    /// Select the instance name you wish to connect to
    #[clap(short = 'I', long = "instance", env = "LSL_INSTANCE", global = true,
    value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub instance: Option<String>,
    /// Path to a file to cache tokens in, defaults to ~/.cache/lsl_tokens
    #[clap(
        long,
        env = "LSL_TOKEN_CACHE_PATH",
        hide = true,
        global = true,
        value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub token_cache_path: Option<String>,
    /// Output format, text or json
    #[clap(short, long = "output", env = "LSL_OUTPUT", global = true, default_value = OutputMode::default())]
    pub output_mode: OutputMode,
    /// Skip hostname verification
    #[clap(
        long = "skip-hostname-verification",
        env = "LSL_SKIP_HOSTNAME_VERIFICATION",
        default_value_t = false,
        global = true
    )]
    pub skip_hostname_verification: bool,
    /// Don't verify CA
    #[clap(
        long = "accept-invalid-certs",
        env = "LSL_ACCEPT_INVALID_CERTS",
        default_value_t = false,
        global = true
    )]
    pub accept_invalid_certs: bool,
}

impl CommonOpt {
    pub fn get_token_cache_path(&self) -> String {
        match &self.token_cache_path {
            None => CLIENT_TOKEN_CACHE.to_string(),
            Some(val) => val.clone(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct Confirmed {
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

#[derive(Debug, Args, Clone)]
pub struct LoginOpt {
    #[clap(short, long)]
    pub email: String,
    /// Supply the password rather than being prompted for it
    #[clap(short, long, env = "LSL_PASSWORD", hide = true,
    value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub password: Option<String>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum SessionOpt {
    /// Exchange the cached refresh token for a new access token
    #[clap(name = "refresh")]
    Refresh,
    /// Show the cached tokens for every instance
    #[clap(name = "show")]
    Show,
}

#[derive(Debug, Args, Clone)]
pub struct ProfileUpdateOpt {
    #[clap(long)]
    pub first_name: Option<String>,
    #[clap(long)]
    pub last_name: Option<String>,
    #[clap(long)]
    pub phone: Option<String>,
    #[clap(long)]
    pub brokerage: Option<String>,
    #[clap(long)]
    pub license_number: Option<String>,
    /// The amount donated for every closed transaction
    #[clap(long)]
    pub donation_amount: Option<f64>,
    #[clap(long)]
    pub bio: Option<String>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ProfileOpt {
    /// Show your profile
    #[clap(name = "show")]
    Show,
    /// Change fields of your profile, unset options are left alone
    #[clap(name = "update")]
    Update(ProfileUpdateOpt),
    /// Upload a png, jpg or gif headshot
    #[clap(name = "upload-headshot")]
    UploadHeadshot { path: PathBuf },
    /// Show your transaction and donation totals
    #[clap(name = "stats")]
    Stats,
}

#[derive(Debug, Subcommand, Clone)]
pub enum TransactionOpt {
    /// Report the number of transactions closed in a month
    #[clap(name = "submit")]
    Submit {
        count: u32,
        /// Defaults to last month
        #[clap(long)]
        month: Option<u8>,
        /// Defaults to the year last month fell in
        #[clap(long)]
        year: Option<i32>,
    },
    /// List every month you have reported
    #[clap(name = "history")]
    History,
    /// Show whether last month has been reported
    #[clap(name = "current-month")]
    CurrentMonth,
    /// List months that still need reporting
    #[clap(name = "pending")]
    Pending,
}

#[derive(Debug, Subcommand, Clone)]
pub enum DonationOpt {
    /// Pay the donation owed for a reported month
    #[clap(name = "pay")]
    Pay {
        /// The transaction to pay for, defaults to the first one still owed
        #[clap(long)]
        transaction: Option<i64>,
        #[clap(long)]
        method: Option<String>,
    },
    #[clap(name = "stats")]
    Stats,
    #[clap(name = "history")]
    History,
    /// List reported months with no donation yet
    #[clap(name = "pending")]
    Pending,
    /// Fetch the thank you image for a donation
    #[clap(name = "share")]
    Share { id: i64 },
}

#[derive(Debug, Subcommand, Clone)]
pub enum NotificationOpt {
    #[clap(name = "list")]
    List {
        #[clap(long)]
        unread_only: bool,
        #[clap(long)]
        limit: Option<u32>,
    },
    /// Mark a notification as read
    #[clap(name = "read")]
    Read { id: i64 },
    #[clap(name = "unread-count")]
    UnreadCount,
    #[clap(name = "mark-all-read")]
    MarkAllRead,
}

#[derive(Debug, Subcommand, Clone)]
pub enum GrantOpt {
    /// Apply for a grant, for yourself or for someone else
    #[clap(name = "apply")]
    Apply,
    /// List grant applications (admin only)
    #[clap(name = "list")]
    List {
        #[clap(long)]
        status: Option<GrantStatus>,
        #[clap(long, default_value_t = 1)]
        page: u32,
    },
    /// Show a single grant application (admin only)
    #[clap(name = "get")]
    Get { id: i64 },
    /// Change the status of a grant application (admin only)
    #[clap(name = "set-status")]
    SetStatus {
        id: i64,
        status: GrantStatus,
        #[clap(long)]
        notes: Option<String>,
        #[clap(flatten)]
        confirm: Confirmed,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub enum AdminOpt {
    #[clap(name = "stats")]
    Stats,
    /// List realtors, filtered by approval status
    #[clap(name = "realtors")]
    Realtors {
        #[clap(long, default_value = "all", value_parser = ["all", "approved", "pending", "denied"])]
        filter: String,
        #[clap(long, default_value_t = 1)]
        page: u32,
    },
    /// List realtors waiting for approval
    #[clap(name = "pending")]
    Pending,
    #[clap(name = "approve")]
    Approve {
        id: i64,
        #[clap(flatten)]
        confirm: Confirmed,
    },
    #[clap(name = "deny")]
    Deny {
        id: i64,
        #[clap(long)]
        reason: Option<String>,
        #[clap(flatten)]
        confirm: Confirmed,
    },
    /// List every realtor's reported transactions
    #[clap(name = "transactions")]
    Transactions,
    /// List every realtor's donations
    #[clap(name = "donations")]
    Donations,
    /// Email every approved realtor a reminder to report this month
    #[clap(name = "send-reminders")]
    SendReminders {
        #[clap(flatten)]
        confirm: Confirmed,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub enum LslClientOpt {
    /// Login with your email and password
    Login(LoginOpt),
    /// Logout of an active cli session
    Logout,
    /// Register as a new realtor
    Register,
    /// Show the account the cached session belongs to
    Whoami,
    /// Manage the cached session
    Session {
        #[clap(subcommand)]
        commands: SessionOpt,
    },
    /// View and change your realtor profile
    Profile {
        #[clap(subcommand)]
        commands: ProfileOpt,
    },
    /// Report closed transactions
    Transaction {
        #[clap(subcommand)]
        commands: TransactionOpt,
    },
    /// Pay and review donations
    Donation {
        #[clap(subcommand)]
        commands: DonationOpt,
    },
    Notification {
        #[clap(subcommand)]
        commands: NotificationOpt,
    },
    /// Grant applications
    Grant {
        #[clap(subcommand)]
        commands: GrantOpt,
    },
    /// Foundation administration
    Admin {
        #[clap(subcommand)]
        commands: AdminOpt,
    },
    /// Show transactions and donations, everyone's for admins
    History {
        #[clap(long, default_value = "donations", value_parser = ["donations", "transactions"])]
        tab: String,
    },
    /// Summary of what you owe and your latest notifications
    Dashboard,
    /// Print the program version and exit
    Version,
}

#[derive(Debug, clap::Parser, Clone)]
#[clap(about = "Local Supports Local Client Utility")]
pub struct LslClientParser {
    #[clap(subcommand)]
    pub commands: LslClientOpt,

    #[clap(flatten)]
    pub copt: CommonOpt,
}
