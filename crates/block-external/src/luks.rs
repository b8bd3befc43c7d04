use super::{exec, ToolError};
use std::{ffi::OsString, path::Path};

/// The key material used to unlock a LUKS volume.
pub enum LuksKey<'a> {
    Passphrase(&'a str),
    Keyfile(&'a Path),
}

/// Formats a block device as a LUKS volume with `cryptsetup luksFormat`.
pub fn cryptsetup_format(
    device: &Path,
    key: &LuksKey,
    cipher: Option<&str>,
    keysize: Option<u32>,
) -> Result<(), ToolError> {
    let mut args: Vec<OsString> = Vec::new();
    args.push("luksFormat".into());
    args.push("-q".into());

    if let Some(cipher) = cipher {
        args.push("--cipher".into());
        args.push(cipher.into());
    }

    if let Some(keysize) = keysize {
        args.push("--key-size".into());
        args.push(keysize.to_string().into());
    }

    args.push(device.into());

    match *key {
        LuksKey::Passphrase(password) => {
            exec("cryptsetup", Some(&append_newline(password.as_bytes())), None, &args)
        }
        LuksKey::Keyfile(path) => {
            args.push(path.into());
            exec("cryptsetup", None, None, &args)
        }
    }
}

/// Opens a LUKS volume at `device`, mapping it to `/dev/mapper/<dm_name>`.
pub fn cryptsetup_open(device: &Path, dm_name: &str, key: &LuksKey) -> Result<(), ToolError> {
    let mut args: Vec<OsString> = vec!["open".into(), device.into(), dm_name.into()];

    match *key {
        LuksKey::Passphrase(password) => {
            exec("cryptsetup", Some(&append_newline(password.as_bytes())), None, &args)
        }
        LuksKey::Keyfile(path) => {
            args.push("--key-file".into());
            args.push(path.into());
            exec("cryptsetup", None, None, &args)
        }
    }
}

fn append_newline(input: &[u8]) -> Vec<u8> {
    let mut vec = Vec::with_capacity(input.len() + 1);
    vec.extend_from_slice(input);
    vec.push(b'\n');
    vec
}
