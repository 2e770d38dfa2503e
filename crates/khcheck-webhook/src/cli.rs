use clap::builder::PossibleValue;
use clap::{crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, Command};

use crate::khcheck::{KHCHECK_GROUP, KHCHECK_RESOURCE, KHCHECK_VERSION};

pub fn build_cli() -> Command {
    let mut args = vec![
        Arg::new("log-level")
            .long("log-level")
            .value_name("LOG_LEVEL")
            .env("KHCHECK_WEBHOOK_LOG_LEVEL")
            .default_value("info")
            .value_parser([
                PossibleValue::new("trace"),
                PossibleValue::new("debug"),
                PossibleValue::new("info"),
                PossibleValue::new("warn"),
                PossibleValue::new("error"),
            ])
            .help("Log level"),
        Arg::new("log-fmt")
            .long("log-fmt")
            .value_name("LOG_FMT")
            .env("KHCHECK_WEBHOOK_LOG_FMT")
            .default_value("text")
            .value_parser([PossibleValue::new("text"), PossibleValue::new("json")])
            .help("Log output format"),
        Arg::new("log-no-color")
            .long("log-no-color")
            .env("NO_COLOR")
            .action(ArgAction::SetTrue)
            .help("Disable colored output for logs"),
        Arg::new("address")
            .long("addr")
            .value_name("BIND_ADDRESS")
            .default_value("0.0.0.0")
            .env("KHCHECK_WEBHOOK_BIND_ADDRESS")
            .help("Bind against ADDRESS"),
        Arg::new("port")
            .long("port")
            .value_name("PORT")
            .default_value("8443")
            .env("KHCHECK_WEBHOOK_PORT")
            .help("Listen on PORT"),
        Arg::new("cert-file")
            .long("cert-file")
            .value_name("CERT_FILE")
            .default_value("")
            .env("KHCHECK_WEBHOOK_CERT_FILE")
            .help("Path to an X.509 certificate file for HTTPS"),
        Arg::new("key-file")
            .long("key-file")
            .value_name("KEY_FILE")
            .default_value("")
            .env("KHCHECK_WEBHOOK_KEY_FILE")
            .help("Path to an X.509 private key file for HTTPS"),
        Arg::new("resource-group")
            .long("resource-group")
            .value_name("GROUP")
            .default_value(KHCHECK_GROUP)
            .env("KHCHECK_WEBHOOK_RESOURCE_GROUP")
            .help("API group of the only resource admitted by the webhook"),
        Arg::new("resource-version")
            .long("resource-version")
            .value_name("VERSION")
            .default_value(KHCHECK_VERSION)
            .env("KHCHECK_WEBHOOK_RESOURCE_VERSION")
            .help("API version of the only resource admitted by the webhook"),
        Arg::new("resource")
            .long("resource")
            .value_name("RESOURCE")
            .default_value(KHCHECK_RESOURCE)
            .env("KHCHECK_WEBHOOK_RESOURCE")
            .help("Plural name of the only resource admitted by the webhook"),
        Arg::new("max-body-size")
            .long("max-body-size")
            .value_name("BYTES")
            .default_value("3145728")
            .env("KHCHECK_WEBHOOK_MAX_BODY_SIZE")
            .help("Reject AdmissionReview bodies larger than BYTES"),
    ];
    args.sort_by(|a, b| a.get_id().cmp(b.get_id()));

    Command::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .args(args)
}
