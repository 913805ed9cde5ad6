// Verdict engine for authorisation-check
// Decides whether an anonymous response means the route is exposed

use crate::models::HttpResponse;

/// Statuses that mean the handler ran for an anonymous caller.
pub const EXPOSED_STATUSES: [u16; 2] = [200, 500];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Reachable without authorisation
    Exposed,
    Protected,
}

/// Decide verdict from the requested URL and what came back.
///
/// A redirect (typically to a login page) counts as enforcement whatever the
/// final status is. Without a redirect, only 200 and 500 are exposures: any
/// other status, 401 and 403 included, is treated as a denial.
pub fn decide_verdict(requested_url: &str, response: &HttpResponse) -> Verdict {
    if response.final_url == requested_url && EXPOSED_STATUSES.contains(&response.status) {
        Verdict::Exposed
    } else {
        Verdict::Protected
    }
}
