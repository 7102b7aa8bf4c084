//! mount/umount/format/map/unmap commands - Client side of CurveFS and CurveBS
//!
//! `mount`/`umount` attach a CurveFS filesystem on a client host. `map`/`unmap`
//! expose a CurveBS volume as an NBD device. `format` prepares chunkfile pools
//! on the disks listed in a format file.

use anyhow::Result;

use super::{client_host_flag, path_arg, submit};
use crate::cli::command::{Command, Flag, Positional};
use crate::cli::parse::ParsedArgs;
use crate::context::AdministrationContext;
use crate::orchestrator::Task;

fn client_config_flag() -> Flag {
    Flag::string("conf", "Specify client configuration file")
        .short('c')
        .default_value("client.yaml")
}

pub fn new_mount_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("mount", "Mount filesystem", mount)
        .usage("mount NAME_OF_CURVEFS MOUNT_POINT [OPTIONS]")
        .example(
            "Examples:
  $ curveadm mount /test /mnt/test -c client.yaml  # Mount CurveFS '/test' to '/mnt/test'",
        )
        .arg(Positional::required("name", "NAME_OF_CURVEFS", "Filesystem name"))
        .arg(Positional::required("mount-point", "MOUNT_POINT", "Mount point"))
        .flag(client_host_flag())
        .flag(client_config_flag())
        .flag(Flag::string("fstype", "Specify fs data backend").default_value("s3"))
}

pub fn new_umount_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("umount", "Umount filesystem", umount)
        .usage("umount MOUNT_POINT [OPTIONS]")
        .arg(Positional::required("mount-point", "MOUNT_POINT", "Mount point"))
        .flag(client_host_flag())
}

pub fn new_format_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("format", "Format chunkfile pool", format)
        .usage("format [OPTIONS]")
        .example(
            "Examples:
  $ curveadm format -f /path/to/format.yaml  # Format chunkfile pool with specified configure file
  $ curveadm format --status                 # Display formatting status
  $ curveadm format --stop                   # Stop formatting progress",
        )
        .flag(
            Flag::string("formatting", "Specify the path of format configuration file")
                .short('f')
                .default_value("format.yaml"),
        )
        .flag(Flag::bool("status", "Show formatting status"))
        .flag(Flag::bool("stop", "Stop formatting progress"))
}

pub fn new_map_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("map", "Map a volume to nbd device", map)
        .usage("map USER:VOLUME [OPTIONS]")
        .example(
            "Examples:
  $ curveadm map curve:/test -c client.yaml                # Map volume '/test' of user 'curve'
  $ curveadm map curve:/test --create --size 20GiB         # Create the volume if it does not exist",
        )
        .arg(Positional::required("volume", "USER:VOLUME", "Volume to map"))
        .flag(client_host_flag())
        .flag(Flag::bool("create", "Create volume if not exist"))
        .flag(Flag::string("size", "Specify volume size").default_value("10GiB"))
        .flag(client_config_flag())
}

pub fn new_unmap_command(_ctx: &AdministrationContext) -> Command {
    Command::leaf("unmap", "Unmap nbd device", unmap)
        .usage("unmap USER:VOLUME [OPTIONS]")
        .arg(Positional::required("volume", "USER:VOLUME", "Mapped volume"))
        .flag(client_host_flag())
}

fn host(args: &ParsedArgs) -> Result<String> {
    args.require("host").map(str::to_string)
}

fn mount(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Mount {
            name: args.require("name")?.to_string(),
            mount_point: args.require("mount-point")?.to_string(),
            host: host(args)?,
            client_config: path_arg(args, "conf")?,
            fstype: args.require("fstype")?.to_string(),
        },
    )
}

fn umount(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Umount {
            mount_point: args.require("mount-point")?.to_string(),
            host: host(args)?,
        },
    )
}

fn format(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Format {
            config: path_arg(args, "formatting")?,
            status: args.flag("status"),
            stop: args.flag("stop"),
        },
    )
}

fn map(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Map {
            volume: args.require("volume")?.to_string(),
            host: host(args)?,
            create: args.flag("create"),
            size: args.require("size")?.to_string(),
            client_config: path_arg(args, "conf")?,
        },
    )
}

fn unmap(args: &ParsedArgs, ctx: &AdministrationContext) -> Result<()> {
    submit(
        ctx,
        Task::Unmap {
            volume: args.require("volume")?.to_string(),
            host: host(args)?,
        },
    )
}
