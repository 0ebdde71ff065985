use std::path::Path;

use loadgrid_core::SimConfig;

/// Load `path` if given, otherwise the built-in defaults.
pub fn load(path: Option<&Path>) -> anyhow::Result<SimConfig> {
    match path {
        Some(path) => Ok(SimConfig::from_file(path)?),
        None => Ok(SimConfig::default()),
    }
}

pub fn show(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load(path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_defaults_without_path() {
        assert_eq!(load(None).unwrap(), SimConfig::default());
    }

    #[test]
    fn load_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "upper_threshold = 120\nscaling_cooldown = 10").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.upper_threshold, 120);
        assert_eq!(config.scaling_cooldown, 10);
        assert_eq!(config.lower_threshold, 50);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lower_threshold = 80").unwrap();
        assert!(load(Some(file.path())).is_err());
    }
}
