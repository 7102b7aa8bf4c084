//! cli::presentation
//!
//! Rendering of version, help, usage and flag errors.
//!
//! # Design
//!
//! Each rendering routine is a plain function pointer stored in
//! [`Presentation`]. The root starts with neutral defaults and the registry
//! replaces all four with the curveadm templates after the tree is
//! assembled. Swapping a template never changes dispatch semantics.

use crate::cli::command::{Command, Flag, FlagKind, Positional};
use crate::cli::errors::FlagError;

/// Data available to the version template.
#[derive(Debug, Clone, Copy)]
pub struct VersionView<'a> {
    pub name: &'a str,
    pub version: &'a str,
}

/// Data available to the help and usage templates.
#[derive(Debug, Clone)]
pub struct HelpView<'a> {
    /// Space-separated path, e.g. `curveadm cluster`.
    pub command_path: String,
    /// Parent path followed by the command's usage.
    pub use_line: String,
    pub about: &'a str,
    pub long_about: Option<&'a str>,
    pub example: Option<&'a str>,
    /// Direct children as (name, short description), in insertion order.
    pub commands: Vec<(&'a str, &'a str)>,
    /// Flags declared on this command.
    pub local_flags: Vec<&'a Flag>,
    /// Persistent flags inherited from ancestors.
    pub inherited_flags: Vec<&'a Flag>,
    pub positionals: &'a [Positional],
}

impl<'a> HelpView<'a> {
    /// Build the view of `cmd` reached through `ancestors` (root first).
    pub fn new(ancestors: &[&'a Command], cmd: &'a Command) -> Self {
        let parent_path: Vec<&str> = ancestors.iter().map(|c| c.name()).collect();
        let mut path = parent_path.clone();
        path.push(cmd.name());

        let use_line = if parent_path.is_empty() {
            cmd.usage_text()
        } else {
            format!("{} {}", parent_path.join(" "), cmd.usage_text())
        };

        let inherited_flags = ancestors
            .iter()
            .copied()
            .flat_map(|ancestor: &'a Command| ancestor.flag_list())
            .filter(|flag| flag.is_persistent())
            .collect();

        Self {
            command_path: path.join(" "),
            use_line,
            about: cmd.about(),
            long_about: cmd.long_about_text(),
            example: cmd.example_text(),
            commands: cmd.children().iter().map(|c| (c.name(), c.about())).collect(),
            local_flags: cmd.flag_list().iter().collect(),
            inherited_flags,
            positionals: cmd.positionals(),
        }
    }

    /// Local flags followed by inherited ones.
    pub fn all_flags(&self) -> impl Iterator<Item = &'a Flag> + '_ {
        self.local_flags
            .iter()
            .chain(self.inherited_flags.iter())
            .copied()
    }
}

pub type VersionTemplate = fn(&VersionView<'_>) -> String;
pub type HelpTemplate = fn(&HelpView<'_>) -> String;
pub type UsageTemplate = fn(&HelpView<'_>) -> String;
pub type FlagErrorFunc = fn(&FlagError) -> String;

/// The four replaceable rendering routines of the root.
#[derive(Debug, Clone, Copy)]
pub struct Presentation {
    pub version: VersionTemplate,
    pub help: HelpTemplate,
    pub usage: UsageTemplate,
    pub flag_error: FlagErrorFunc,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            version: default_version,
            help: default_help,
            usage: default_usage,
            flag_error: default_flag_error,
        }
    }
}

/// `<name> version <version>`
pub fn default_version(view: &VersionView<'_>) -> String {
    format!("{} version {}\n", view.name, view.version)
}

/// About text, usage and command list.
pub fn default_help(view: &HelpView<'_>) -> String {
    let mut out = format!("{}\n\n{}", view.about, default_usage(view));
    if !view.commands.is_empty() {
        out.push_str("\nCommands:\n");
        out.push_str(&format_commands(&view.commands));
    }
    out
}

/// `Usage: <use line>` followed by flags.
pub fn default_usage(view: &HelpView<'_>) -> String {
    let mut out = format!("Usage: {}\n", view.use_line);
    let flags: Vec<&Flag> = view.all_flags().collect();
    if !flags.is_empty() {
        out.push_str("\nFlags:\n");
        out.push_str(&format_flags(&flags));
    }
    out
}

/// The parser message, unchanged.
pub fn default_flag_error(err: &FlagError) -> String {
    err.message.clone()
}

/// `CurveAdm v<version>`
pub fn curveadm_version(view: &VersionView<'_>) -> String {
    format!("CurveAdm v{}\n", view.version)
}

/// The curveadm help layout.
pub fn curveadm_help(view: &HelpView<'_>) -> String {
    let mut out = format!("Usage:  {}\n\n", view.use_line);
    out.push_str(view.long_about.unwrap_or(view.about));
    out.push('\n');

    if !view.commands.is_empty() {
        out.push_str("\nCommands:\n");
        out.push_str(&format_commands(&view.commands));
    }

    let flags: Vec<&Flag> = view.all_flags().collect();
    if !flags.is_empty() {
        out.push_str("\nOptions:\n");
        out.push_str(&format_flags(&flags));
    }

    if let Some(example) = view.example {
        out.push('\n');
        out.push_str(example.trim_end());
        out.push('\n');
    }

    if !view.commands.is_empty() {
        out.push_str(&format!(
            "\nRun '{} COMMAND --help' for more information on a command.\n",
            view.command_path
        ));
    }
    out
}

/// The curveadm usage layout, printed after flag errors.
pub fn curveadm_usage(view: &HelpView<'_>) -> String {
    let mut out = format!("Usage:  {}\n", view.use_line);
    let flags: Vec<&Flag> = view.all_flags().collect();
    if !flags.is_empty() {
        out.push_str("\nOptions:\n");
        out.push_str(&format_flags(&flags));
    }
    out
}

/// Branded flag error with a help hint and the command's usage.
pub fn curveadm_flag_error(err: &FlagError) -> String {
    format!(
        "curveadm: {}\nSee '{} --help'.\n\n{}",
        err.message,
        err.command_path,
        err.usage.trim_end()
    )
}

fn format_commands(commands: &[(&str, &str)]) -> String {
    let width = commands.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    commands
        .iter()
        .map(|(name, about)| format!("  {:<width$}  {}\n", name, about, width = width))
        .collect()
}

fn flag_signature(flag: &Flag) -> String {
    let mut sig = match flag.short_alias() {
        Some(short) => format!("-{}, --{}", short, flag.name()),
        None => format!("    --{}", flag.name()),
    };
    if let Some(placeholder) = flag.placeholder() {
        sig.push(' ');
        sig.push_str(placeholder);
    }
    sig
}

fn flag_description(flag: &Flag) -> String {
    let mut text = flag.help().to_string();
    match (flag.kind(), flag.default) {
        (FlagKind::Bool, _) | (_, None) => {}
        (FlagKind::Uint, Some(default)) => text.push_str(&format!(" (default {})", default)),
        (_, Some(default)) => text.push_str(&format!(" (default \"{}\")", default)),
    }
    if flag.kind() == FlagKind::StringList {
        text.push_str(" (repeatable)");
    }
    if flag.required {
        text.push_str(" (required)");
    }
    text
}

fn format_flags(flags: &[&Flag]) -> String {
    let signatures: Vec<String> = flags.iter().map(|f| flag_signature(f)).collect();
    let width = signatures.iter().map(String::len).max().unwrap_or(0);
    signatures
        .iter()
        .zip(flags)
        .map(|(sig, flag)| {
            format!(
                "  {:<width$}   {}\n",
                sig,
                flag_description(flag),
                width = width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::FlagErrorKind;
    use crate::cli::parse::ParsedArgs;
    use crate::context::AdministrationContext;

    fn noop(_: &ParsedArgs, _: &AdministrationContext) -> anyhow::Result<()> {
        Ok(())
    }

    fn tree() -> Command {
        Command::group(
            "curveadm",
            "Deploy and manage CurveBS/CurveFS cluster",
            vec![
                Command::group(
                    "cluster",
                    "Manage clusters",
                    vec![
                        Command::leaf("add", "Add cluster", noop)
                            .usage("add CLUSTER [OPTIONS]")
                            .flag(Flag::string("topology", "Topology file").short('f')),
                        Command::leaf("ls", "List clusters", noop),
                    ],
                ),
                Command::leaf("deploy", "Deploy cluster", noop),
            ],
        )
        .usage("curveadm [OPTIONS] COMMAND [ARGS...]")
        .flag(Flag::bool("help", "Print usage").short('h').persistent())
        .flag(Flag::bool("upgrade", "Upgrade curveadm").short('u'))
    }

    #[test]
    fn version_templates() {
        let view = VersionView {
            name: "curveadm",
            version: "0.3.0",
        };
        assert_eq!(curveadm_version(&view), "CurveAdm v0.3.0\n");
        assert_eq!(default_version(&view), "curveadm version 0.3.0\n");
    }

    #[test]
    fn root_help_lists_children_in_order() {
        let root = tree();
        let help = curveadm_help(&HelpView::new(&[], &root));

        assert!(help.starts_with("Usage:  curveadm [OPTIONS] COMMAND [ARGS...]\n"));
        let cluster = help.find("  cluster").unwrap();
        let deploy = help.find("  deploy").unwrap();
        assert!(cluster < deploy);
        assert!(help.contains("Manage clusters"));
        assert!(help.contains("-u, --upgrade"));
        assert!(help.contains("Run 'curveadm COMMAND --help'"));
    }

    #[test]
    fn nested_help_inherits_persistent_flags_only() {
        let root = tree();
        let cluster = root.find_child("cluster").unwrap();
        let add = cluster.find_child("add").unwrap();
        let view = HelpView::new(&[&root, cluster], add);

        assert_eq!(view.command_path, "curveadm cluster add");
        assert_eq!(view.use_line, "curveadm cluster add CLUSTER [OPTIONS]");

        let help = curveadm_help(&view);
        assert!(help.contains("-f, --topology string"));
        assert!(help.contains("-h, --help"));
        assert!(!help.contains("--upgrade"));
        assert!(!help.contains("Run '"));
    }

    #[test]
    fn flag_error_is_branded_and_carries_usage() {
        let root = tree();
        let cluster = root.find_child("cluster").unwrap();
        let usage = curveadm_usage(&HelpView::new(&[&root], cluster));
        let source = clap::Command::new("x")
            .try_get_matches_from(["x", "--nope"])
            .unwrap_err();
        let err = FlagError {
            kind: FlagErrorKind::UnknownFlag,
            message: "unexpected argument '--nope' found".to_string(),
            command_path: "curveadm cluster".to_string(),
            usage,
            source,
        };

        let rendered = curveadm_flag_error(&err);
        assert!(rendered.starts_with("curveadm: unexpected argument '--nope' found\n"));
        assert!(rendered.contains("See 'curveadm cluster --help'."));
        assert!(rendered.contains("Usage:  curveadm cluster COMMAND [ARGS...]"));
        assert_eq!(default_flag_error(&err), "unexpected argument '--nope' found");
    }

    #[test]
    fn defaults_and_repeatable_are_described() {
        let host = Flag::string("host", "Specify service host").default_value("*");
        let skip = Flag::list("skip", "Skip role");
        let tail = Flag::uint("tail", "Number of entries").default_value("10");
        let rendered = format_flags(&[&host, &skip, &tail]);
        assert!(rendered.contains("Specify service host (default \"*\")"));
        assert!(rendered.contains("Skip role (repeatable)"));
        assert!(rendered.contains("Number of entries (default 10)"));
    }
}
