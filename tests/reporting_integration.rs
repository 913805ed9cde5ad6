/// Integration tests for console reporting
/// Tests output lines and terminal highlighting
use authorisation_check::error::{ProbeError, RouteGenerationError};
use authorisation_check::models::ProbeResult;
use authorisation_check::reporting::{exposed_message, ConsoleReporter, Reporter};
use authorisation_check::verdict::Verdict;

fn exposed_result() -> ProbeResult {
    ProbeResult {
        route: "secret".to_string(),
        url: "http://localhost:8000/admin/1".to_string(),
        status: 200,
        final_url: "http://localhost:8000/admin/1".to_string(),
        verdict: Verdict::Exposed,
    }
}

#[test]
fn exposed_line_format() {
    assert_eq!(
        exposed_message(&exposed_result()),
        "Route secret is accessible without authorisation, statusCode : 200, url : http://localhost:8000/admin/1"
    );
}

#[test]
fn highlighting_wraps_only_the_exposed_line() {
    let mut reporter = ConsoleReporter::new(Vec::new(), true);
    reporter.trying("secret").unwrap();
    reporter.exposed(&exposed_result()).unwrap();

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Trying route secret");
    assert!(lines[1].starts_with("\x1b[31mRoute secret is accessible"));
    assert!(lines[1].ends_with("\x1b[0m"));
}

#[test]
fn failures_print_the_error_message_alone() {
    let mut reporter = ConsoleReporter::new(Vec::new(), false);
    let err = ProbeError::from(RouteGenerationError::RouteNotFound { route: "ghost".to_string() });
    reporter.failed("ghost", &err).unwrap();
    reporter.done().unwrap();

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert_eq!(
        text,
        "Unable to generate a URL for the named route \"ghost\" as such route does not exist.\nDone!\n"
    );
}
