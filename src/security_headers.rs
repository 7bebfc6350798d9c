use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

/// Configuration for hardening response headers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityHeadersConfig {
    /// Content Security Policy directive
    pub csp: String,
    /// HTTP Strict Transport Security max-age
    pub hsts_max_age: u32,
    /// Whether to include subdomains in HSTS
    pub hsts_include_subdomains: bool,
    /// X-Frame-Options value
    pub frame_options: String,
    /// Referrer-Policy value
    pub referrer_policy: String,
    /// Cross-Origin-Opener-Policy value
    pub coop: String,
    /// Cross-Origin-Resource-Policy value
    pub corp: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl SecurityHeadersConfig {
    /// Defaults suitable for local work
    #[must_use]
    pub fn development() -> Self {
        Self {
            csp: "default-src 'self'; \
                  base-uri 'self'; \
                  font-src 'self' https: data:; \
                  form-action 'self'; \
                  frame-ancestors 'self'; \
                  img-src 'self' data:; \
                  object-src 'none'; \
                  script-src 'self'; \
                  script-src-attr 'none'; \
                  style-src 'self' https: 'unsafe-inline'; \
                  upgrade-insecure-requests"
                .to_string(),
            hsts_max_age: 15_552_000, // 180 days
            hsts_include_subdomains: true,
            frame_options: "SAMEORIGIN".to_string(),
            referrer_policy: "no-referrer".to_string(),
            coop: "same-origin".to_string(),
            corp: "same-origin".to_string(),
        }
    }

    /// Stricter variant for deployed environments
    #[must_use]
    pub fn production() -> Self {
        Self {
            csp: "default-src 'none'; frame-ancestors 'none'; base-uri 'none'".to_string(),
            hsts_max_age: 31_536_000, // 1 year
            frame_options: "DENY".to_string(),
            ..Self::development()
        }
    }

    /// Select a preset by environment name
    #[must_use]
    pub fn for_environment(environment: &str) -> Self {
        match environment.to_lowercase().as_str() {
            "production" | "prod" => Self::production(),
            _ => Self::development(),
        }
    }

    fn hsts_value(&self) -> String {
        if self.hsts_include_subdomains {
            format!("max-age={}; includeSubDomains", self.hsts_max_age)
        } else {
            format!("max-age={}", self.hsts_max_age)
        }
    }
}

fn insert_dynamic(response: &mut Response, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(name), value);
        }
        Err(_) => tracing::warn!(header = name, "skipping invalid security header value"),
    }
}

/// Adds hardening headers to every response
pub async fn add_security_headers(
    State(config): State<SecurityHeadersConfig>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    insert_dynamic(&mut response, "content-security-policy", &config.csp);
    insert_dynamic(
        &mut response,
        "strict-transport-security",
        &config.hsts_value(),
    );
    insert_dynamic(&mut response, "x-frame-options", &config.frame_options);
    insert_dynamic(&mut response, "referrer-policy", &config.referrer_policy);
    insert_dynamic(&mut response, "cross-origin-opener-policy", &config.coop);
    insert_dynamic(&mut response, "cross-origin-resource-policy", &config.corp);

    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("origin-agent-cluster"),
        HeaderValue::from_static("?1"),
    );
    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );
    headers.insert(
        HeaderName::from_static("x-download-options"),
        HeaderValue::from_static("noopen"),
    );
    headers.insert(
        HeaderName::from_static("x-permitted-cross-domain-policies"),
        HeaderValue::from_static("none"),
    );
    headers.insert(
        HeaderName::from_static("x-xss-protection"),
        HeaderValue::from_static("0"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn test_handler() -> &'static str {
        "test response"
    }

    fn app(config: SecurityHeadersConfig) -> Router {
        Router::new()
            .route("/test", get(test_handler))
            .layer(middleware::from_fn_with_state(config, add_security_headers))
    }

    #[tokio::test]
    async fn test_security_headers() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app(SecurityHeadersConfig::development())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert!(headers.contains_key("Content-Security-Policy"));
        assert!(headers.contains_key("Cross-Origin-Opener-Policy"));
        assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "SAMEORIGIN");
        assert_eq!(
            headers.get("Strict-Transport-Security").unwrap(),
            "max-age=15552000; includeSubDomains"
        );
    }

    #[tokio::test]
    async fn test_production_headers() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app(SecurityHeadersConfig::for_environment("Production"))
            .oneshot(request)
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
        assert!(headers
            .get("Content-Security-Policy")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("frame-ancestors 'none'"));
    }

    #[tokio::test]
    async fn test_invalid_value_is_skipped() {
        let config = SecurityHeadersConfig {
            frame_options: "bad\nvalue".to_string(),
            ..SecurityHeadersConfig::development()
        };
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app(config).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("X-Frame-Options"));
        assert!(response.headers().contains_key("X-Content-Type-Options"));
    }
}
