use crate::entity::Format;
use crate::error::BlockplanError;
use crate::resolver::resolve;
use crate::store::EntityStore;
use block_external::exec;

/// Realizes a `format` record by dispatching to the tool appropriate for its
/// `fstype`. A `preserve=true` format is a pure no-op: the caller is
/// asserting the volume is already formatted as declared, and nothing here
/// can cheaply verify that without mounting it.
pub fn handle(store: &EntityStore, format: &Format) -> Result<(), BlockplanError> {
    if format.preserve.unwrap_or(false) {
        return Ok(());
    }

    let path = resolve(store, &format.volume)?;

    match format.fstype.as_str() {
        "ext3" | "ext4" => {
            let label = validate_label(&format.id, format.label.as_deref(), 16)?;
            let mut args = vec!["-q".into()];
            if let Some(label) = label {
                args.push("-L".into());
                args.push(label.into());
            }
            args.push(path.clone().into());
            exec(&format!("mkfs.{}", format.fstype), None, None, &args)?;
        }
        "fat12" | "fat16" | "fat32" | "fat" => {
            let label = validate_label(&format.id, format.label.as_deref(), 11)?;
            let mut args = Vec::new();
            if let Some(bits) = fat_bits(&format.fstype) {
                args.push("-F".into());
                args.push(bits.into());
            }
            if let Some(label) = label {
                args.push("-n".into());
                args.push(label.into());
            }
            args.push(path.clone().into());
            exec("mkfs.fat", None, None, &args)?;
        }
        "swap" => {
            exec("mkswap", None, None, &[path.clone().into()])?;
        }
        other => {
            if which(other).is_none() {
                return Err(BlockplanError::Config {
                    id: format.id.clone(),
                    why: format!("no mkfs.{} on PATH", other),
                });
            }
            exec(&format!("mkfs.{}", other), None, None, &[path.clone().into()])?;
        }
    }

    Ok(())
}

fn fat_bits(fstype: &str) -> Option<&'static str> {
    match fstype {
        "fat12" => Some("12"),
        "fat16" => Some("16"),
        "fat32" => Some("32"),
        _ => None,
    }
}

fn validate_label<'a>(
    id: &str,
    label: Option<&'a str>,
    max_len: usize,
) -> Result<Option<&'a str>, BlockplanError> {
    match label {
        Some(label) if label.len() > max_len => Err(BlockplanError::Config {
            id: id.to_owned(),
            why: format!("label '{}' exceeds {} bytes", label, max_len),
        }),
        other => Ok(other),
    }
}

fn which(cmd: &str) -> Option<()> {
    std::process::Command::new("which")
        .arg(format!("mkfs.{}", cmd))
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .ok()
        .filter(|status| status.success())
        .map(|_| ())
}
