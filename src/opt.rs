//! Command-line options.

use std::path::PathBuf;

use clap::{Parser, crate_version};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::console_utils::LogStyle;

/// Application subcommands.
#[derive(Parser)]
pub enum SubCommands {
    /// Render a single CloudFormation template
    ///
    /// Every intrinsic call that can be resolved from the supplied inputs and
    /// the template's own Parameters defaults is replaced by its value;
    /// everything else is left in place unchanged.
    Render(RenderOpts),

    /// Render and validate one or more templates against a rule collection
    Validate(ValidateOpts),

    /// Emit the tool version
    Version,
}

#[allow(missing_docs)]
#[derive(Parser)]
#[clap(version = crate_version!())]
pub struct App {
    /// Subcommand.
    #[clap(subcommand)]
    pub subcommand: SubCommands,

    /// Enable verbose logging.
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Logging style
    #[clap(long, env = "CFN_CHECK_LOG_STYLE", default_value = "plain", global = true)]
    pub log_style: LogStyle,

    /// The log level to use; overrides the verbosity flags when given
    #[clap(long, global = true)]
    pub log_level: Option<tracing::Level>,
}

/// Options for the `render` command.
#[derive(Parser, Debug, Clone)]
pub struct RenderOpts {
    /// Path to the template to render
    pub path: PathBuf,

    /// Path to output the rendered template to; stdout when omitted
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// `<key>=<value>` overrides for template Parameters
    #[arg(short, long, num_args = 1..)]
    pub parameters: Vec<String>,

    /// `<key>=<value>` values for `!Ref` targets outside Parameters and
    /// Resources
    #[arg(short, long, num_args = 1..)]
    pub references: Vec<String>,

    /// `<MapName>=<TopLevelKey>` choices specifying which Mappings entry to
    /// use
    #[arg(short, long, num_args = 1..)]
    pub mappings: Vec<String>,

    /// `<Logical.Attribute>=<value>` values for `!GetAtt` calls to use
    #[arg(short, long, num_args = 1..)]
    pub attributes: Vec<String>,

    /// Availability zone names for `!GetAZs` calls to use
    #[arg(short = 'z', long, num_args = 1..)]
    pub availability_zones: Vec<String>,

    /// `<filepath>=<export>` pairs for `!ImportValue`; the file is loaded and
    /// searched for the export
    #[arg(long, num_args = 1..)]
    pub import_values: Vec<String>,

    /// Intrinsic tag names to recognize; defaults to the full CloudFormation
    /// set
    #[arg(long, num_args = 1..)]
    pub tags: Vec<String>,
}

/// Options for the `validate` command.
#[derive(Parser, Debug, Clone)]
pub struct ValidateOpts {
    /// Template file, or a directory to search for templates
    pub path: PathBuf,

    /// Glob pattern used to find template files under a directory; defaults
    /// to any `.yml` or `.yaml` file
    #[arg(long)]
    pub file_pattern: Option<String>,

    /// Name of the rule collection to run
    #[arg(long, default_value = "cloudformation")]
    pub rules: String,

    /// Flags enabling flag-gated rules
    #[arg(short = 'F', long, num_args = 1..)]
    pub flags: Vec<String>,
}
