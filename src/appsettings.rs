use alarmclock_models::settings::Settings;
use config::{Config, ConfigError, Environment, File};

/// Reads `appsettings`, then `appsettings.local`, then `APP_*` environment
/// variables (`APP_INTERPRETER__URL`, `APP_TELEGRAM__CHAT_ID`, ...).
pub fn load() -> Result<Settings, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("appsettings").required(false))
        .add_source(File::with_name("appsettings.local").required(false))
        .add_source(environment())
        .build()?;

    from_config(config)
}

fn environment() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn from_config(config: Config) -> Result<Settings, ConfigError> {
    config.try_deserialize()
}

/// Zone for timestamps without an offset; `None` means the system local zone.
pub fn alarm_timezone(settings: &Settings) -> anyhow::Result<Option<chrono_tz::Tz>> {
    settings
        .alarm
        .timezone
        .as_deref()
        .map(|name| {
            name.parse::<chrono_tz::Tz>()
                .map_err(|error| anyhow::anyhow!("Invalid alarm.timezone {name:?}: {error}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use alarmclock_models::settings::DEFAULT_INTERPRETER_URL;
    use config::FileFormat;

    use super::*;

    fn settings(toml: &str) -> Settings {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();

        from_config(config).unwrap()
    }

    #[test]
    fn empty_configuration_uses_defaults() {
        let settings = settings("");

        assert_eq!(settings.interpreter.url, DEFAULT_INTERPRETER_URL);
        assert_eq!(settings.interpreter.timeout_secs, 30);
        assert!(settings.telegram.is_none());
        assert!(settings.alarm.timezone.is_none());
    }

    #[test]
    fn full_configuration_is_read() {
        let settings = settings(
            r#"
            [interpreter]
            url = "http://localhost:8000/set-alarm"
            timeout_secs = 5

            [telegram]
            token = "123:abc"
            chat_id = 42

            [alarm]
            timezone = "Europe/Berlin"
            "#,
        );

        assert_eq!(settings.interpreter.url, "http://localhost:8000/set-alarm");
        assert_eq!(settings.interpreter.timeout_secs, 5);
        let telegram = settings.telegram.as_ref().unwrap();
        assert_eq!(telegram.token, "123:abc");
        assert_eq!(telegram.chat_id, 42);
        assert_eq!(
            alarm_timezone(&settings).unwrap(),
            Some(chrono_tz::Europe::Berlin)
        );
    }

    #[test]
    fn environment_variables_override_files() {
        let variables = config::Map::from([
            (
                "APP_INTERPRETER__URL".to_owned(),
                "http://env.local/set-alarm".to_owned(),
            ),
            ("APP_TELEGRAM__TOKEN".to_owned(), "123:env".to_owned()),
            ("APP_TELEGRAM__CHAT_ID".to_owned(), "42".to_owned()),
        ]);
        let config = Config::builder()
            .add_source(File::from_str(
                r#"
                [interpreter]
                url = "http://file.local/set-alarm"
                "#,
                FileFormat::Toml,
            ))
            .add_source(environment().source(Some(variables)))
            .build()
            .unwrap();

        let settings = from_config(config).unwrap();

        assert_eq!(settings.interpreter.url, "http://env.local/set-alarm");
        let telegram = settings.telegram.unwrap();
        assert_eq!(telegram.token, "123:env");
        assert_eq!(telegram.chat_id, 42);
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let settings = settings(
            r#"
            [alarm]
            timezone = "Mars/Olympus_Mons"
            "#,
        );

        assert!(alarm_timezone(&settings).is_err());
    }
}
