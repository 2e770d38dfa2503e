use anyhow::{anyhow, Result};
use clap::ArgMatches;
use lazy_static::lazy_static;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::api::admission_review::GroupVersionResource;
use crate::validation::ValidatorSettings;

lazy_static! {
    pub(crate) static ref HOSTNAME: String =
        std::env::var("HOSTNAME").unwrap_or_else(|_| String::from("unknown"));
}

pub struct Config {
    pub addr: SocketAddr,
    pub tls_config: Option<TlsConfig>,
    pub expected_resource: GroupVersionResource,
    pub max_body_size: usize,
    pub log_level: String,
    pub log_fmt: String,
    pub log_no_color: bool,
}

pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

impl Config {
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        let addr = api_bind_address(matches)?;
        let expected_resource = expected_resource(matches);
        let max_body_size = matches
            .get_one::<String>("max-body-size")
            .expect("This should not happen, there's a default value for max-body-size")
            .parse::<usize>()
            .map_err(|e| anyhow!("error parsing max-body-size: {}", e))?;

        let log_level = matches
            .get_one::<String>("log-level")
            .expect("This should not happen, there's a default value for log-level")
            .to_owned();
        let log_fmt = matches
            .get_one::<String>("log-fmt")
            .expect("This should not happen, there's a default value for log-fmt")
            .to_owned();
        let log_no_color = matches
            .get_one::<bool>("log-no-color")
            .expect("clap should have assigned a default value")
            .to_owned();

        let (cert_file, key_file) = tls_files(matches)?;
        let tls_config = if cert_file.is_empty() {
            None
        } else {
            Some(TlsConfig {
                cert_file: PathBuf::from(cert_file),
                key_file: PathBuf::from(key_file),
            })
        };

        Ok(Self {
            addr,
            tls_config,
            expected_resource,
            max_body_size,
            log_level,
            log_fmt,
            log_no_color,
        })
    }

    /// The immutable settings every review is checked against.
    pub fn validator_settings(&self) -> ValidatorSettings {
        ValidatorSettings {
            expected_resource: self.expected_resource.clone(),
            max_body_size: self.max_body_size,
        }
    }
}

fn api_bind_address(matches: &ArgMatches) -> Result<SocketAddr> {
    format!(
        "{}:{}",
        matches
            .get_one::<String>("address")
            .expect("This should not happen, there's a default value for addr"),
        matches
            .get_one::<String>("port")
            .expect("This should not happen, there's a default value for port")
    )
    .parse()
    .map_err(|e| anyhow!("error parsing arguments: {}", e))
}

fn tls_files(matches: &ArgMatches) -> Result<(String, String)> {
    let cert_file = matches
        .get_one::<String>("cert-file")
        .expect("This should not happen, there's a default value for cert-file")
        .to_owned();
    let key_file = matches
        .get_one::<String>("key-file")
        .expect("This should not happen, there's a default value for key-file")
        .to_owned();
    if cert_file.is_empty() != key_file.is_empty() {
        Err(anyhow!("error parsing arguments: either both --cert-file and --key-file must be provided, or neither"))
    } else {
        Ok((cert_file, key_file))
    }
}

fn expected_resource(matches: &ArgMatches) -> GroupVersionResource {
    let value = |id: &str| {
        matches
            .get_one::<String>(id)
            .map(String::as_str)
            .unwrap_or_default()
    };

    GroupVersionResource::new(
        value("resource-group"),
        value("resource-version"),
        value("resource"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;
    use crate::validation::DEFAULT_MAX_BODY_SIZE;
    use rstest::rstest;

    fn config_from(flags: &[&str]) -> Result<Config> {
        let mut args = vec!["khcheck-webhook"];
        args.extend_from_slice(flags);
        let matches = cli::build_cli().try_get_matches_from(args)?;
        Config::from_args(&matches)
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.addr, "0.0.0.0:8443".parse().unwrap());
        assert!(config.tls_config.is_none());
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(config.validator_settings(), ValidatorSettings::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_fmt, "text");
    }

    #[test]
    fn custom_expected_resource() {
        let config = config_from(&[
            "--resource-group",
            "kuberhealthy.github.io",
            "--resource-version",
            "v2",
            "--resource",
            "healthchecks",
        ])
        .unwrap();

        assert_eq!(
            config.validator_settings().expected_resource,
            GroupVersionResource::new("kuberhealthy.github.io", "v2", "healthchecks")
        );
    }

    #[test]
    fn tls_files_are_loaded_together() {
        let config =
            config_from(&["--cert-file", "/tls/tls.crt", "--key-file", "/tls/tls.key"]).unwrap();

        let tls_config = config.tls_config.expect("tls should be configured");
        assert_eq!(tls_config.cert_file, PathBuf::from("/tls/tls.crt"));
        assert_eq!(tls_config.key_file, PathBuf::from("/tls/tls.key"));
    }

    #[rstest]
    #[case::only_cert(&["--cert-file", "/tls/tls.crt"])]
    #[case::only_key(&["--key-file", "/tls/tls.key"])]
    #[case::bad_address(&["--addr", "not-an-address"])]
    #[case::bad_port(&["--port", "http"])]
    #[case::bad_body_size(&["--max-body-size", "-1"])]
    #[case::unknown_log_fmt(&["--log-fmt", "otlp"])]
    fn invalid_flags(#[case] flags: &[&str]) {
        assert!(config_from(flags).is_err());
    }

    #[test]
    fn boolean_flags() {
        for provide_flag in [true, false] {
            let flags: &[&str] = if provide_flag {
                &["--log-no-color"]
            } else {
                &[]
            };

            let config = config_from(flags).unwrap();
            assert_eq!(provide_flag, config.log_no_color);
        }
    }
}
