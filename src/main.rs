// Main CLI entry point for authorisation-check
// Uses clap for argument parsing and tracing for diagnostics on stderr

use authorisation_check::auditor::RouteAuditor;
use authorisation_check::config::{AuditConfig, DEFAULT_HOST, DEFAULT_INTERNAL_PREFIX, DEFAULT_SCHEME, DEFAULT_TIMEOUT_SECS};
use authorisation_check::engine::ReqwestRequester;
use authorisation_check::error::FatalError;
use authorisation_check::parsers::load_route_table;
use authorisation_check::reporting::ConsoleReporter;
use clap::{Arg, ArgMatches, Command};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("authorisation-check:check")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Checks if the authorisation is correct")
        .long_about("Requests every declared route anonymously and reports the ones that answer 200 or 500 without redirecting")
        .after_help("EXAMPLES:\n  authorisation-check --routes routes.json\n  authorisation-check staging.example.com https --routes openapi.json\n\nA Symfony route table can be dumped with:\n  bin/console debug:router --format=json > routes.json")
        .arg(Arg::new("host")
            .index(1)
            .default_value(DEFAULT_HOST)
            .help("Host (and port) the URLs are generated for"))
        .arg(Arg::new("scheme")
            .index(2)
            .default_value(DEFAULT_SCHEME)
            .help("URL scheme, http or https"))
        .arg(Arg::new("routes")
            .short('r')
            .long("routes")
            .required(true)
            .num_args(1)
            .help("Route manifest, OpenAPI .json document or directory of manifests"))
        .arg(Arg::new("timeout")
            .long("timeout")
            .num_args(1)
            .value_parser(clap::value_parser!(u64))
            .default_value("10")
            .help("Per-request timeout in seconds"))
        .arg(Arg::new("internal_prefix")
            .long("internal-prefix")
            .num_args(1)
            .default_value(DEFAULT_INTERNAL_PREFIX)
            .help("Routes whose name starts with this are never probed"))
}

fn config_from_matches(matches: &ArgMatches) -> AuditConfig {
    let host = matches.get_one::<String>("host").map(|s| s.as_str()).unwrap_or(DEFAULT_HOST);
    let scheme = matches.get_one::<String>("scheme").map(|s| s.as_str()).unwrap_or(DEFAULT_SCHEME);
    let prefix = matches
        .get_one::<String>("internal_prefix")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_INTERNAL_PREFIX);
    AuditConfig::new(host, scheme).with_internal_prefix(prefix)
}

fn run(matches: &ArgMatches) -> Result<(), FatalError> {
    let config = config_from_matches(matches);
    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(DEFAULT_TIMEOUT_SECS);
    let routes_path = matches
        .get_one::<String>("routes")
        .map(Path::new)
        .ok_or_else(|| FatalError::RouteListing("no route table given".to_string()))?;

    let table = load_route_table(routes_path)?;
    let requester = ReqwestRequester::new(Duration::from_secs(timeout));
    let mut auditor = RouteAuditor::new(table, requester, config);
    let mut reporter = ConsoleReporter::stdout();
    auditor.run(&mut reporter)?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("authorisation_check=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_arguments_default_to_local_http() {
        let matches = cli().try_get_matches_from(["authorisation-check", "-r", "routes.json"]).unwrap();
        let config = config_from_matches(&matches);
        assert_eq!(config.host, "localhost:8000");
        assert_eq!(config.scheme, "http");
        assert_eq!(matches.get_one::<u64>("timeout"), Some(&10));
    }

    #[test]
    fn host_and_scheme_are_positional() {
        let matches = cli()
            .try_get_matches_from(["authorisation-check", "example.com", "https", "--routes", "r.json"])
            .unwrap();
        let config = config_from_matches(&matches);
        assert_eq!(config.context().base_url(), "https://example.com");
    }

    #[test]
    fn routes_option_is_required() {
        assert!(cli().try_get_matches_from(["authorisation-check"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }
}
