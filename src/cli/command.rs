//! cli::command
//!
//! The command tree model.
//!
//! # Design
//!
//! A [`Command`] is either a leaf carrying an [`Action`] or a group carrying
//! child commands. The discriminant is explicit in [`CommandKind`], so a group
//! can never be mistaken for a leaf with a missing action.
//!
//! Trees are built once at process start by the command constructors and are
//! read-only afterwards.
//!
//! # Example
//!
//! ```
//! use curveadm::cli::command::{Command, Flag, Positional};
//!
//! fn noop(
//!     _args: &curveadm::cli::ParsedArgs,
//!     _ctx: &curveadm::context::AdministrationContext,
//! ) -> anyhow::Result<()> {
//!     Ok(())
//! }
//!
//! let add = Command::leaf("add", "Add cluster", noop)
//!     .usage("add CLUSTER [OPTIONS]")
//!     .arg(Positional::required("name", "CLUSTER", "Cluster name"))
//!     .flag(Flag::string("description", "Description for cluster").short('d'));
//! let cluster = Command::group("cluster", "Manage clusters", vec![add]);
//!
//! assert!(cluster.is_group());
//! assert_eq!(cluster.find_child("add").unwrap().name(), "add");
//! assert!(cluster.find_child("ad").is_none());
//! ```

use std::fmt;

use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;

/// Function run when a leaf command is invoked.
pub type Action = fn(&ParsedArgs, &AdministrationContext) -> anyhow::Result<()>;

/// Value type of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// `--flag` or `--flag=<bool>`
    Bool,
    /// `--flag <value>`
    String,
    /// `--flag <value>`, repeatable
    StringList,
    /// `--flag <unsigned integer>`
    Uint,
}

/// A named option of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub(crate) name: &'static str,
    pub(crate) short: Option<char>,
    pub(crate) kind: FlagKind,
    pub(crate) default: Option<&'static str>,
    pub(crate) help: &'static str,
    pub(crate) value_name: Option<&'static str>,
    pub(crate) required: bool,
    pub(crate) persistent: bool,
}

impl Flag {
    fn new(name: &'static str, kind: FlagKind, help: &'static str) -> Self {
        Self {
            name,
            short: None,
            kind,
            default: None,
            help,
            value_name: None,
            required: false,
            persistent: false,
        }
    }

    /// Boolean switch.
    pub fn bool(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FlagKind::Bool, help)
    }

    /// Single string value.
    pub fn string(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FlagKind::String, help)
    }

    /// Repeatable string value.
    pub fn list(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FlagKind::StringList, help)
    }

    /// Unsigned integer value.
    pub fn uint(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FlagKind::Uint, help)
    }

    /// Single-character alias.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Value used when the flag is absent.
    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Placeholder shown in help, e.g. `FILE`.
    pub fn value_name(mut self, value_name: &'static str) -> Self {
        self.value_name = Some(value_name);
        self
    }

    /// The flag must be supplied.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Inherited by every descendant of the declaring command.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn short_alias(&self) -> Option<char> {
        self.short
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Placeholder for value-taking flags; `None` for switches.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self.kind {
            FlagKind::Bool => None,
            FlagKind::Uint => Some(self.value_name.unwrap_or("uint")),
            FlagKind::String | FlagKind::StringList => Some(self.value_name.unwrap_or("string")),
        }
    }
}

/// A positional argument of a leaf command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positional {
    pub(crate) name: &'static str,
    pub(crate) value_name: &'static str,
    pub(crate) help: &'static str,
    pub(crate) required: bool,
    pub(crate) multiple: bool,
}

impl Positional {
    /// Mandatory single value.
    pub fn required(name: &'static str, value_name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            value_name,
            help,
            required: true,
            multiple: false,
        }
    }

    /// Optional single value.
    pub fn optional(name: &'static str, value_name: &'static str, help: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, value_name, help)
        }
    }

    /// Accept any number of values (one or more when required).
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Leaf or group.
#[derive(Clone)]
pub enum CommandKind {
    /// Runs an action.
    Leaf(Action),
    /// Namespaces child commands. Insertion order is help order.
    Group(Vec<Command>),
}

impl fmt::Debug for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Leaf(_) => f.write_str("Leaf"),
            CommandKind::Group(children) => f.debug_tuple("Group").field(children).finish(),
        }
    }
}

/// A node of the command tree.
#[derive(Debug, Clone)]
pub struct Command {
    name: &'static str,
    usage: Option<&'static str>,
    about: &'static str,
    long_about: Option<&'static str>,
    example: Option<&'static str>,
    flags: Vec<Flag>,
    positionals: Vec<Positional>,
    kind: CommandKind,
}

impl Command {
    /// A command that runs `action`.
    pub fn leaf(name: &'static str, about: &'static str, action: Action) -> Self {
        Self::with_kind(name, about, CommandKind::Leaf(action))
    }

    /// A command that only namespaces `children`.
    pub fn group(name: &'static str, about: &'static str, children: Vec<Command>) -> Self {
        Self::with_kind(name, about, CommandKind::Group(children))
    }

    fn with_kind(name: &'static str, about: &'static str, kind: CommandKind) -> Self {
        Self {
            name,
            usage: None,
            about,
            long_about: None,
            example: None,
            flags: Vec::new(),
            positionals: Vec::new(),
            kind,
        }
    }

    /// Usage line without the parent path, e.g. `add CLUSTER [OPTIONS]`.
    pub fn usage(mut self, usage: &'static str) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Longer description shown in this command's own help.
    pub fn long_about(mut self, long_about: &'static str) -> Self {
        self.long_about = Some(long_about);
        self
    }

    /// Example block shown in help.
    pub fn example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }

    /// Declare a flag.
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Declare several flags.
    pub fn flags(mut self, flags: impl IntoIterator<Item = Flag>) -> Self {
        self.flags.extend(flags);
        self
    }

    /// Declare a positional argument. Only meaningful on leaves.
    pub fn arg(mut self, positional: Positional) -> Self {
        self.positionals.push(positional);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn about(&self) -> &'static str {
        self.about
    }

    pub fn long_about_text(&self) -> Option<&'static str> {
        self.long_about
    }

    pub fn example_text(&self) -> Option<&'static str> {
        self.example
    }

    /// Usage line without the parent path.
    pub fn usage_text(&self) -> String {
        match (self.usage, &self.kind) {
            (Some(usage), _) => usage.to_string(),
            (None, CommandKind::Group(_)) => format!("{} COMMAND [ARGS...]", self.name),
            (None, CommandKind::Leaf(_)) => {
                let mut usage = format!("{} [OPTIONS]", self.name);
                for positional in &self.positionals {
                    let rendered = match (positional.required, positional.multiple) {
                        (true, false) => positional.value_name.to_string(),
                        (true, true) => format!("{}...", positional.value_name),
                        (false, false) => format!("[{}]", positional.value_name),
                        (false, true) => format!("[{}...]", positional.value_name),
                    };
                    usage.push(' ');
                    usage.push_str(&rendered);
                }
                usage
            }
        }
    }

    pub fn flag_list(&self) -> &[Flag] {
        &self.flags
    }

    pub fn positionals(&self) -> &[Positional] {
        &self.positionals
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, CommandKind::Group(_))
    }

    /// The action of a leaf; `None` for groups.
    pub fn action(&self) -> Option<Action> {
        match self.kind {
            CommandKind::Leaf(action) => Some(action),
            CommandKind::Group(_) => None,
        }
    }

    /// Children in insertion order; empty for leaves.
    pub fn children(&self) -> &[Command] {
        match &self.kind {
            CommandKind::Group(children) => children,
            CommandKind::Leaf(_) => &[],
        }
    }

    /// Exact-name lookup among direct children.
    pub fn find_child(&self, name: &str) -> Option<&Command> {
        self.children().iter().find(|child| child.name == name)
    }
}
