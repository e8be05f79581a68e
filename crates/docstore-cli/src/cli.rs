use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit log events as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Override the connection string
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub uri: Option<String>,

    /// Override the database name
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,

    /// Check that the server answers
    Ping,

    /// List documents matching a filter
    #[command(arg_required_else_help = true)]
    Find {
        /// Collection name
        collection: String,

        /// Filter as extended JSON
        #[arg(required = false, short, long)]
        filter: Option<String>,

        /// Print at most this many documents
        #[arg(required = false, short, long)]
        limit: Option<usize>,
    },

    /// Fetch one document by identifier
    #[command(arg_required_else_help = true)]
    Get {
        /// Collection name
        collection: String,

        /// ObjectId as a 24-character hex string
        id: String,
    },

    /// Insert a document and print it with its identifier
    #[command(arg_required_else_help = true)]
    Insert {
        /// Collection name
        collection: String,

        /// Document as extended JSON
        document: String,
    },

    /// Update documents by filter or identifier
    #[command(arg_required_else_help = true)]
    Update {
        /// Collection name
        collection: String,

        /// Filter as extended JSON
        #[arg(short, long, conflicts_with = "id", required_unless_present = "id")]
        filter: Option<String>,

        /// Identifier of the single document to update
        #[arg(long)]
        id: Option<String>,

        /// Update document or pipeline as extended JSON
        #[arg(short, long, required = true)]
        update: String,

        /// Update every matching document instead of the first
        #[arg(short, long, requires = "filter")]
        many: bool,
    },

    /// Delete documents by filter or identifier
    #[command(arg_required_else_help = true)]
    Delete {
        /// Collection name
        collection: String,

        /// Filter as extended JSON
        #[arg(short, long, conflicts_with = "id", required_unless_present = "id")]
        filter: Option<String>,

        /// Identifier of the single document to delete
        #[arg(long)]
        id: Option<String>,

        /// Delete every matching document instead of the first
        #[arg(short, long, requires = "filter")]
        many: bool,
    },

    /// Run an aggregation pipeline
    #[command(arg_required_else_help = true)]
    Aggregate {
        /// Collection name
        collection: String,

        /// Pipeline as an extended JSON array of stages
        pipeline: String,
    },

    /// Count documents matching a filter
    #[command(arg_required_else_help = true)]
    Count {
        /// Collection name
        collection: String,

        /// Filter as extended JSON
        #[arg(required = false, short, long)]
        filter: Option<String>,
    },
}
