// Route auditor for authorisation-check
// Walks the route table once, probes every public route anonymously and
// reports the ones that answer as if no authorisation were enforced

use crate::config::AuditConfig;
use crate::engine::HttpRequester;
use crate::error::{FatalError, ProbeError};
use crate::models::{ProbeResult, Route};
use crate::parameters::build_assignment;
use crate::reporting::Reporter;
use crate::router::RouteSource;
use crate::verdict::decide_verdict;
use tracing::{debug, info, warn};

/// Counts for one audit run plus every exposed route, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub total_routes: usize,
    pub skipped: usize,
    pub probed: usize,
    pub errors: usize,
    pub exposed: Vec<ProbeResult>,
}

impl AuditSummary {
    pub fn exposed_routes(&self) -> Vec<&str> {
        self.exposed.iter().map(|r| r.route.as_str()).collect()
    }
}

pub struct RouteAuditor<S, H> {
    source: S,
    requester: H,
    config: AuditConfig,
}

impl<S: RouteSource, H: HttpRequester> RouteAuditor<S, H> {
    pub fn new(source: S, requester: H, config: AuditConfig) -> Self {
        Self {
            source,
            requester,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn requester(&self) -> &H {
        &self.requester
    }

    /// One full pass over the route table. Per-route failures are reported
    /// and counted; only listing routes or writing the report can fail the
    /// run.
    pub fn run<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> Result<AuditSummary, FatalError> {
        self.source.set_context(self.config.context());
        info!(host = %self.config.host, scheme = %self.config.scheme, "starting authorisation audit");

        let routes = self.source.list_routes()?;
        reporter.routes_found(routes.len())?;

        let mut summary = AuditSummary {
            total_routes: routes.len(),
            ..AuditSummary::default()
        };

        for route in &routes {
            if self.config.is_internal(&route.name) {
                debug!(route = %route.name, "skipping internal route");
                summary.skipped += 1;
                continue;
            }

            reporter.trying(&route.name)?;
            summary.probed += 1;

            match self.probe(route) {
                Ok(result) if result.is_exposed() => {
                    warn!(route = %result.route, status = result.status, url = %result.final_url, "route accessible without authorisation");
                    reporter.exposed(&result)?;
                    summary.exposed.push(result);
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(route = %route.name, error = %err, "route check failed");
                    reporter.failed(&route.name, &err)?;
                    summary.errors += 1;
                }
            }
        }

        reporter.done()?;
        info!(
            probed = summary.probed,
            exposed = summary.exposed.len(),
            errors = summary.errors,
            "authorisation audit finished"
        );
        Ok(summary)
    }

    /// Render `route` with its defaults (or the placeholder value) and GET it.
    pub fn probe(&self, route: &Route) -> Result<ProbeResult, ProbeError> {
        let assignment = build_assignment(route, &self.config.placeholder_value);
        let url = self.source.generate_url(&route.name, &assignment)?;
        let response = self.requester.get(&url, self.config.max_redirects)?;
        debug!(route = %route.name, status = response.status, final_url = %response.final_url, "probed");

        let verdict = decide_verdict(&url, &response);
        Ok(ProbeResult {
            route: route.name.clone(),
            url,
            status: response.status,
            final_url: response.final_url,
            verdict,
        })
    }
}
