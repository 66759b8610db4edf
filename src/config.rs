use std::path::Path;

use ini::Ini;
use thiserror::Error;

const TOKEN_SECTION: &str = "Token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read settings file {path}: {source}")]
    Read { path: String, source: ini::Error },
    #[error("settings file has no [{0}] section")]
    MissingSection(&'static str),
    #[error("settings file is missing {key} in [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },
}

/// API tokens loaded from the INI settings file.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub vk_token: String,
    pub yd_token: String,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Settings::from_ini(&ini)
    }

    pub fn from_ini(ini: &Ini) -> Result<Settings, ConfigError> {
        let section = ini
            .section(Some(TOKEN_SECTION))
            .ok_or(ConfigError::MissingSection(TOKEN_SECTION))?;

        Ok(Settings {
            vk_token: require_key(section, "vk_token")?,
            yd_token: require_key(section, "yd_token")?,
        })
    }
}

fn require_key(section: &ini::Properties, key: &'static str) -> Result<String, ConfigError> {
    section
        .get(key)
        .map(str::to_string)
        .ok_or(ConfigError::MissingKey {
            section: TOKEN_SECTION,
            key,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_both_tokens() {
        let ini = Ini::load_from_str(
            "[Token]\n\
             vk_token = vk1.a.abcdef\n\
             yd_token = y0_AgAAAA\n",
        )
        .unwrap();

        let settings = Settings::from_ini(&ini).unwrap();
        assert_eq!(
            settings,
            Settings {
                vk_token: "vk1.a.abcdef".to_string(),
                yd_token: "y0_AgAAAA".to_string(),
            }
        );
    }

    #[test]
    fn missing_section_is_reported() {
        let ini = Ini::load_from_str("[Other]\nvk_token = x\n").unwrap();

        match Settings::from_ini(&ini) {
            Err(ConfigError::MissingSection(section)) => assert_eq!(section, "Token"),
            other => panic!("expected MissingSection, got {:?}", other),
        }
    }

    #[test]
    fn missing_key_is_reported() {
        let ini = Ini::load_from_str("[Token]\nvk_token = x\n").unwrap();

        match Settings::from_ini(&ini) {
            Err(ConfigError::MissingKey { section, key }) => {
                assert_eq!(section, "Token");
                assert_eq!(key, "yd_token");
            },
            other => panic!("expected MissingKey, got {:?}", other),
        }
    }
}
