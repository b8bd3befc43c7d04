use super::{exec, ToolError};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Used to create a logical volume on a volume group.
pub fn lvcreate(group: &str, name: &str, size: Option<u64>) -> Result<(), ToolError> {
    exec(
        "lvcreate",
        None,
        None,
        &size.map_or(
            [
                "-y".into(),
                "-l".into(),
                "100%FREE".into(),
                group.into(),
                "-n".into(),
                name.into(),
            ],
            |size| {
                [
                    "-y".into(),
                    "-L".into(),
                    super::mebibytes(size).into(),
                    group.into(),
                    "-n".into(),
                    name.into(),
                ]
            },
        ),
    )
}

/// Obtains a list of logical volumes associated with the given volume group.
pub fn lvs(vg: &str) -> io::Result<Vec<PathBuf>> {
    info!("obtaining logical volumes on {}", vg);
    let mut current_line = String::with_capacity(128);
    let mut output = Vec::new();

    let mut reader = BufReader::new(
        Command::new("lvs")
            .arg(vg)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?
            .stdout
            .expect("failed to execute lvs command"),
    );

    // Skip the first line of output
    let _ = reader.read_line(&mut current_line);
    current_line.clear();

    while reader.read_line(&mut current_line)? != 0 {
        {
            let line = &current_line[2..];
            if let Some(pos) = line.find(' ') {
                output.push(PathBuf::from(
                    [
                        "/dev/mapper/",
                        &vg.replace("-", "--"),
                        "-",
                        &(&line[..pos].replace("-", "--"))
                    ].concat(),
                ));
            }
        }

        current_line.clear();
    }

    Ok(output)
}

/// Used to create a physical volume on a LUKS partition.
pub fn pvcreate<P: AsRef<Path>>(device: P) -> Result<(), ToolError> {
    exec(
        "pvcreate",
        None,
        None,
        &["-ffy".into(), device.as_ref().into()],
    )
}

/// Obtains a map of physical volume paths and their optionally-assigned volume
/// groups.
pub fn pvs() -> io::Result<BTreeMap<PathBuf, Option<String>>> {
    info!("obtaining list of physical volumes");
    let mut current_line = String::with_capacity(64);
    let mut output = BTreeMap::new();

    let mut reader = BufReader::new(
        Command::new("pvs")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?
            .stdout
            .expect("failed to execute pvs command"),
    );

    // Skip the first line of output
    let _ = reader.read_line(&mut current_line);
    current_line.clear();

    while reader.read_line(&mut current_line)? != 0 {
        {
            let mut fields = current_line[2..].split_whitespace();
            fields.next().map(|pv| {
                fields.next().map(|vg| {
                    output.insert(
                        PathBuf::from(pv),
                        if vg.is_empty() || vg == "lvm2" {
                            None
                        } else {
                            Some(vg.into())
                        },
                    )
                })
            });
        }

        current_line.clear();
    }

    Ok(output)
}

/// Activates all logical volumes in the supplied volume group.
pub fn vgactivate(volume_group: &str) -> Result<(), ToolError> {
    info!("activating '{}'", volume_group);
    let args = &["-ffyay".into(), volume_group.into()];
    exec("vgchange", None, None, args)
}

/// Used to create a volume group from one or more physical volumes.
pub fn vgcreate<I: Iterator<Item = S>, S: AsRef<OsStr>>(
    group: &str,
    devices: I,
) -> Result<(), ToolError> {
    exec("vgcreate", None, None, &{
        let mut args = Vec::with_capacity(16);
        args.push("-ffy".into());
        args.push(group.into());
        args.extend(devices.map(|x| x.as_ref().into()));
        args
    })
}

/// Removes the given volume group from the system.
pub fn vgremove(group: &str) -> Result<(), ToolError> {
    exec("vgremove", None, None, &["-ffy".into(), group.into()])
}
