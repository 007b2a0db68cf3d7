//! Clap derive structures for the `passdeck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can render man pages from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// passdeck -- wallet pass dashboard for the terminal
#[derive(Debug, Parser)]
#[command(
    name = "passdeck",
    version,
    about = "Design wallet pass templates and issue passes from the command line",
    long_about = "Manage Apple/Google wallet pass templates, issued passes, customers\n\
        and campaigns on a passdeck backend.\n\n\
        Template validation, card previews and color checks also work offline.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "PASSDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "PASSDECK_URL", global = true)]
    pub url: Option<String>,

    /// Login email (overrides profile)
    #[arg(long, env = "PASSDECK_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PASSDECK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PASSDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PASSDECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and keep the session for later commands
    Login(LoginArgs),

    /// Forget the saved session
    Logout,

    /// Create an account, then log in
    Register(RegisterArgs),

    /// Show the signed-in user
    Whoami,

    /// Manage pass templates
    #[command(alias = "tpl", alias = "t")]
    Templates(TemplatesArgs),

    /// Issue and manage wallet passes
    #[command(alias = "pass")]
    Passes(PassesArgs),

    /// Manage customers
    #[command(alias = "cust")]
    Customers(CustomersArgs),

    /// Manage campaigns
    Campaigns(CampaignsArgs),

    /// Color utilities (works offline)
    Colors(ColorsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,

    /// Also store the password in the system keyring
    #[arg(long)]
    pub save_password: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name for the new account
    #[arg(long)]
    pub full_name: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TEMPLATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplatesCommand {
    /// List templates
    #[command(alias = "ls")]
    List {
        /// Keep archived templates the backend returns
        ///
        /// The backend's template listing already excludes archived
        /// templates, so this only has an effect against servers that
        /// include them.
        #[arg(long, short = 'a')]
        archived: bool,

        /// Only templates of this pass type
        #[arg(long, value_enum)]
        pass_type: Option<PassTypeArg>,

        /// Case-insensitive name search
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show a template with all its fields
    Get {
        /// Template ID
        id: String,
    },

    /// Create a template
    Create {
        /// Template name
        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Pass type
        #[arg(long, value_enum, default_value = "generic")]
        pass_type: PassTypeArg,

        /// Start from the designer layout (designer colors, one primary field)
        #[arg(long)]
        designer: bool,

        /// Read the template draft from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = &["name", "designer"])]
        from_file: Option<PathBuf>,

        /// Validation rules to apply before saving
        #[arg(long, value_enum, default_value = "lenient")]
        policy: PolicyArg,
    },

    /// Replace a template's content
    Update {
        /// Template ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// Set active flag
        #[arg(long, action = clap::ArgAction::Set)]
        active: Option<bool>,

        /// Set archived flag
        #[arg(long, action = clap::ArgAction::Set)]
        archived: Option<bool>,

        /// Read the full template draft from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = &["name", "description"])]
        from_file: Option<PathBuf>,

        /// Validation rules to apply before saving
        #[arg(long, value_enum, default_value = "lenient")]
        policy: PolicyArg,
    },

    /// Copy a template as "<name> (Copy)"
    #[command(alias = "dup")]
    Duplicate {
        /// Template ID
        id: String,
    },

    /// Delete a template
    #[command(alias = "rm")]
    Delete {
        /// Template ID
        id: String,
    },

    /// Validate a template draft file without contacting the backend
    Validate {
        /// JSON template draft
        file: PathBuf,

        /// Validation rules
        #[arg(long, value_enum, default_value = "strict")]
        policy: PolicyArg,
    },

    /// Render a card preview of a stored template or a draft file
    Preview {
        /// Template ID
        #[arg(required_unless_present = "file")]
        id: Option<String>,

        /// JSON template draft (offline)
        #[arg(long, short = 'F', conflicts_with = "id")]
        file: Option<PathBuf>,
    },

    /// Add or remove template fields
    Fields(FieldsArgs),
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    #[command(subcommand)]
    pub command: FieldsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FieldsCommand {
    /// List a template's fields by group
    #[command(alias = "ls")]
    List {
        /// Template ID
        id: String,
    },

    /// Append a field to a group
    Add {
        /// Template ID
        id: String,

        /// Field group
        #[arg(long, short = 'g', value_enum)]
        group: FieldGroupArg,

        /// Field label
        #[arg(long, short = 'l')]
        label: String,

        /// Default value
        #[arg(long)]
        value: String,

        /// Field key (generated when omitted)
        #[arg(long)]
        key: Option<String>,

        /// Value type
        #[arg(long = "type", value_enum, default_value = "text")]
        field_type: FieldTypeArg,

        /// Text alignment
        #[arg(long, value_enum, default_value = "left")]
        align: AlignmentArg,
    },

    /// Remove a field by its position in a group
    #[command(alias = "rm")]
    Remove {
        /// Template ID
        id: String,

        /// Field group
        #[arg(long, short = 'g', value_enum)]
        group: FieldGroupArg,

        /// Zero-based position within the group
        index: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FieldGroupArg {
    Header,
    Primary,
    Secondary,
    Auxiliary,
    Back,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FieldTypeArg {
    Text,
    Number,
    Date,
    Currency,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AlignmentArg {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PassTypeArg {
    Generic,
    Coupon,
    EventTicket,
    BoardingPass,
    StoreCard,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Keys, labels and values present; keys unique per group
    Lenient,
    /// Lenient rules plus name length, hex colors and a primary field
    Strict,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PASSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PassesArgs {
    #[command(subcommand)]
    pub command: PassesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PassesCommand {
    /// List issued passes
    #[command(alias = "ls")]
    List {
        /// Only passes from this template
        #[arg(long)]
        template: Option<String>,

        /// Only passes held by this customer
        #[arg(long)]
        customer: Option<String>,

        /// Only passes in this campaign
        #[arg(long)]
        campaign: Option<String>,

        /// Max results
        #[arg(long, short = 'l')]
        limit: Option<u32>,

        /// Results to skip
        #[arg(long)]
        skip: Option<u32>,
    },

    /// Show a pass
    Get {
        /// Pass ID
        id: String,
    },

    /// Issue a pass from a template
    Create {
        /// Template ID
        #[arg(long, short = 't')]
        template: String,

        /// Customer ID
        #[arg(long, short = 'c')]
        customer: String,

        /// Campaign ID
        #[arg(long)]
        campaign: Option<String>,

        /// Field value override (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,

        /// Expiration date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        expires: Option<String>,
    },

    /// Void a pass (irreversible)
    Void {
        /// Pass ID
        id: String,
    },

    /// Ask wallets to re-fetch a pass
    Refresh {
        /// Pass ID
        id: String,
    },

    /// Mark a pass redeemed
    Redeem {
        /// Pass ID
        id: String,
    },

    /// Download the wallet bundle for a pass
    Download {
        /// Pass ID
        id: String,

        /// Target wallet
        #[arg(long, short = 'w', value_enum, default_value = "apple")]
        wallet: WalletArg,

        /// Output path (defaults to the server-suggested filename)
        #[arg(long, short = 'O')]
        out: Option<PathBuf>,
    },

    /// Render an issued pass through its template
    Preview {
        /// Pass ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WalletArg {
    Apple,
    Google,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CUSTOMERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers
    #[command(alias = "ls")]
    List {
        /// Search by name or email
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show a customer
    Get {
        /// Customer ID
        id: String,
    },

    /// Create a customer
    Create {
        /// Email address
        #[arg(long)]
        email: String,

        #[command(flatten)]
        details: CustomerDetails,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Update a customer
    Update {
        /// Customer ID
        id: String,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        #[command(flatten)]
        details: CustomerDetails,
    },

    /// Delete a customer
    #[command(alias = "rm")]
    Delete {
        /// Customer ID
        id: String,
    },

    /// Add or remove customer tags
    Tag(TagArgs),
}

#[derive(Debug, Args)]
pub struct CustomerDetails {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Email opt-in
    #[arg(long, action = clap::ArgAction::Set)]
    pub email_opt_in: Option<bool>,

    /// SMS opt-in
    #[arg(long, action = clap::ArgAction::Set)]
    pub sms_opt_in: Option<bool>,

    /// Push opt-in
    #[arg(long, action = clap::ArgAction::Set)]
    pub push_opt_in: Option<bool>,
}

#[derive(Debug, Args)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// Add a tag
    Add {
        /// Customer ID
        id: String,
        /// Tag text
        tag: String,
    },

    /// Remove every occurrence of a tag
    #[command(alias = "rm")]
    Remove {
        /// Customer ID
        id: String,
        /// Tag text
        tag: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CAMPAIGNS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CampaignsArgs {
    #[command(subcommand)]
    pub command: CampaignsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CampaignsCommand {
    /// List campaigns
    #[command(alias = "ls")]
    List,

    /// Show a campaign
    Get {
        /// Campaign ID
        id: String,
    },

    /// Create a campaign
    Create {
        /// Campaign name
        #[arg(long)]
        name: String,

        #[command(flatten)]
        details: CampaignDetails,
    },

    /// Update a campaign
    Update {
        /// Campaign ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        details: CampaignDetails,
    },

    /// Delete a campaign
    #[command(alias = "rm")]
    Delete {
        /// Campaign ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CampaignDetails {
    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Template the campaign issues from
    #[arg(long)]
    pub template: Option<String>,

    /// Campaign type (e.g. standard)
    #[arg(long = "type")]
    pub campaign_type: Option<String>,

    /// Status (e.g. draft, active, completed)
    #[arg(long)]
    pub status: Option<String>,

    /// Notification text pushed to pass holders
    #[arg(long)]
    pub notification: Option<String>,

    /// Start date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub end: Option<String>,

    /// Set active flag
    #[arg(long, action = clap::ArgAction::Set)]
    pub active: Option<bool>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COLORS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ColorsArgs {
    #[command(subcommand)]
    pub command: ColorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ColorsCommand {
    /// Pick black or white text for background colors
    Contrast {
        /// Background colors as #RRGGBB
        #[arg(required = true)]
        colors: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, email, password_env, ca_cert, insecure, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
