use crate::error::BlockplanError;

/// A `"<int><unit>"` size specifier, such as `"1GiB"` or `"512MiB"`, as
/// declared on a `partition`'s `size` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    value: u64,
    unit: Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Byte,
    Kibibyte,
    Mebibyte,
    Gibibyte,
    Tebibyte,
    Pebibyte,
}

impl Unit {
    fn multiplier(self) -> u64 {
        match self {
            Unit::Byte => 1,
            Unit::Kibibyte => 1024,
            Unit::Mebibyte => 1024 * 1024,
            Unit::Gibibyte => 1024 * 1024 * 1024,
            Unit::Tebibyte => 1024 * 1024 * 1024 * 1024,
            Unit::Pebibyte => 1024 * 1024 * 1024 * 1024 * 1024,
        }
    }

    fn parse(unit: &str) -> Option<Unit> {
        match unit {
            "B" => Some(Unit::Byte),
            "KiB" => Some(Unit::Kibibyte),
            "MiB" => Some(Unit::Mebibyte),
            "GiB" => Some(Unit::Gibibyte),
            "TiB" => Some(Unit::Tebibyte),
            "PiB" => Some(Unit::Pebibyte),
            _ => None,
        }
    }
}

impl SizeSpec {
    /// Splits digits from the unit suffix, as spec.md's partition handler
    /// describes (`size.strip(string.ascii_letters)` /
    /// `size.strip(string.digits)` in the provisioner this generalizes).
    pub fn parse(id: &str, size: &str) -> Result<SizeSpec, BlockplanError> {
        let split_at = size.find(|c: char| !c.is_ascii_digit()).ok_or_else(|| {
            BlockplanError::Config { id: id.to_owned(), why: format!("size '{}' has no unit", size) }
        })?;

        let (digits, unit) = size.split_at(split_at);
        let value = digits.parse::<u64>().map_err(|_| BlockplanError::Config {
            id: id.to_owned(),
            why: format!("size '{}' has a non-numeric magnitude", size),
        })?;

        let unit = Unit::parse(unit).ok_or_else(|| BlockplanError::Config {
            id: id.to_owned(),
            why: format!("size '{}' has an unrecognized unit '{}'", size, unit),
        })?;

        Ok(SizeSpec { value, unit })
    }

    pub fn to_bytes(self) -> u64 { self.value * self.unit.multiplier() }

    /// Converts to a sector count for a device with the given logical sector
    /// size, rounding up, matching `parted.sizeToSectors`.
    pub fn to_sectors(self, sector_size: u64) -> u64 {
        let bytes = self.to_bytes();
        (bytes + sector_size - 1) / sector_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gib() {
        let spec = SizeSpec::parse("sda1", "1GiB").unwrap();
        assert_eq!(spec.to_bytes(), 1024 * 1024 * 1024);
    }

    #[test]
    fn parses_plain_bytes() {
        let spec = SizeSpec::parse("sda1", "512B").unwrap();
        assert_eq!(spec.to_bytes(), 512);
    }

    #[test]
    fn to_sectors_rounds_up() {
        let spec = SizeSpec::parse("sda1", "1KiB").unwrap();
        // 1024 bytes at a 512-byte sector size is exactly 2 sectors.
        assert_eq!(spec.to_sectors(512), 2);
        // at a 700-byte sector size it must round up to 2, not truncate to 1.
        assert_eq!(spec.to_sectors(700), 2);
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!(SizeSpec::parse("sda1", "10XiB").is_err());
    }

    #[test]
    fn rejects_missing_unit() {
        assert!(SizeSpec::parse("sda1", "1024").is_err());
    }
}
