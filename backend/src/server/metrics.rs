//! Optional Prometheus request metrics.
//!
//! `actix-web-prom` changes the response body type, so the layer boxes the
//! body on both branches to keep one concrete app type whether or not the
//! exporter could be registered.

use std::fmt::Display;
use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

const METRICS_NAMESPACE: &str = "roombook";
const METRICS_ENDPOINT: &str = "/metrics";

/// Build the exporter, logging and returning `None` when registration fails
/// so the service still starts.
pub fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "prometheus metrics disabled");
            None
        }
    }
}

/// Default exporter serving `/metrics` under the `roombook` namespace.
pub fn default_metrics() -> Option<PrometheusMetrics> {
    initialize_metrics(|| {
        PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
            .endpoint(METRICS_ENDPOINT)
            .build()
    })
}

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        metrics.map_or(Self::Disabled, |metrics| Self::Enabled(Arc::new(metrics)))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self {
            Self::Enabled(metrics) => {
                let fut = Compat::new(PrometheusMetrics::clone(metrics)).new_transform(service);
                Box::pin(async move { Ok(boxed::service(fut.await?)) })
            }
            Self::Disabled => {
                let svc = service.map(ServiceResponse::map_into_boxed_body);
                Box::pin(async move { Ok(boxed::service(svc)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    #[test]
    fn initialize_metrics_returns_none_on_error() {
        let metrics = initialize_metrics(|| -> Result<PrometheusMetrics, &str> { Err("boom") });
        assert!(metrics.is_none());
    }

    #[test]
    fn initialize_metrics_returns_metrics_on_success() {
        let metrics = initialize_metrics(|| {
            PrometheusMetricsBuilder::new("test")
                .endpoint("/metrics")
                .build()
        });
        assert!(metrics.is_some());
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[actix_web::test]
    async fn requests_pass_through_either_branch(#[case] enabled: bool) {
        let metrics = enabled
            .then(|| {
                PrometheusMetricsBuilder::new("layer")
                    .endpoint("/metrics")
                    .build()
                    .ok()
            })
            .flatten();
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from_option(metrics))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let scrape =
            test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        let expected = if enabled {
            StatusCode::OK
        } else {
            StatusCode::NOT_FOUND
        };
        assert_eq!(scrape.status(), expected);
    }
}
