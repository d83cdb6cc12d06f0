//! Memoized Swagger UI asset provider.
//!
//! Assets are generated on first request and cached per filename behind an
//! `RwLock`; misses are cached too, so repeated probes for files that will
//! never exist short-circuit at the read lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::trace;

/// A servable asset with its content type.
#[derive(Debug, Clone)]
pub struct WebAsset {
    pub content_type: &'static str,
    pub body: Arc<String>,
}

/// Generates and caches the Swagger UI pages.
#[derive(Debug)]
pub struct SwaggerUi {
    cdn_url: String,
    title: String,
    // None marks a filename known not to exist.
    cache: RwLock<HashMap<String, Option<WebAsset>>>,
}

impl SwaggerUi {
    pub fn new(cdn_url: impl Into<String>, title: impl Into<String>) -> Self {
        SwaggerUi {
            cdn_url: cdn_url.into(),
            title: title.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the asset for a filename, generating and caching it on the
    /// first request. Unknown filenames are remembered as misses.
    pub fn serve(&self, filename: &str) -> Option<WebAsset> {
        if let Ok(cache) = self.cache.read() {
            if let Some(cached) = cache.get(filename) {
                trace!(filename, hit = cached.is_some(), "asset cache hit");
                return cached.clone();
            }
        }

        let generated = self.generate(filename);
        if let Ok(mut cache) = self.cache.write() {
            cache
                .entry(filename.to_owned())
                .or_insert_with(|| generated.clone());
        }
        generated
    }

    fn generate(&self, filename: &str) -> Option<WebAsset> {
        let body = match filename {
            "index.html" => index_html(&self.cdn_url, &self.title),
            "oauth2-redirect.html" => oauth2_redirect_html().to_owned(),
            _ => return None,
        };
        Some(WebAsset {
            content_type: content_type_for(filename),
            body: Arc::new(body),
        })
    }
}

/// Content type by file extension, defaulting to a binary stream.
fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// The Swagger UI page. The spec location comes from the `url` query
/// parameter at load time, so one cached page serves either document.
fn index_html(cdn_url: &str, title: &str) -> String {
    let title = html_escape(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="icon" type="image/png" href="{cdn_url}/favicon-32x32.png" sizes="32x32" />
    <link rel="stylesheet" type="text/css" href="{cdn_url}/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="{cdn_url}/swagger-ui-bundle.js"></script>
    <script src="{cdn_url}/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {{
            const specUrl = new URLSearchParams(window.location.search).get("url");
            window.ui = SwaggerUIBundle({{
                url: specUrl,
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            }});
        }};
    </script>
</body>
</html>"#
    )
}

/// The OAuth2 callback page Swagger UI opens during authorization flows.
fn oauth2_redirect_html() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>OAuth2 Redirect</title>
</head>
<body>
    <script>
        'use strict';
        function run() {
            var oauth2 = window.opener.swaggerUIRedirectOauth2;
            var sentState = oauth2.state;
            var redirectUrl = oauth2.redirectUrl;
            var isValid, qp, arr;

            if (/code|token|error/.test(window.location.hash)) {
                qp = window.location.hash.substring(1);
            } else {
                qp = window.location.search.substring(1);
            }

            arr = qp.split("&");
            arr.forEach(function(v, i, _arr) { _arr[i] = '"' + v.replace('=', '":"') + '"'; });
            qp = qp ? JSON.parse('{' + arr.join(',') + '}',
                function(key, value) {
                    return key === "" ? value : decodeURIComponent(value);
                }
            ) : {};

            isValid = qp.state === sentState;

            if ((oauth2.auth.schema.get("flow") === "accessCode" ||
                 oauth2.auth.schema.get("flow") === "authorizationCode" ||
                 oauth2.auth.schema.get("flow") === "authorization_code") &&
                !oauth2.auth.code) {
                if (!isValid) {
                    oauth2.errCb({
                        authId: oauth2.auth.name,
                        source: "auth",
                        level: "warning",
                        message: "Authorization may be unsafe, passed state was changed in server. The passed state wasn't returned from auth server."
                    });
                }

                if (qp.code) {
                    delete oauth2.state;
                    oauth2.auth.code = qp.code;
                    oauth2.callback({auth: oauth2.auth, redirectUrl: redirectUrl});
                } else {
                    oauth2.errCb({
                        authId: oauth2.auth.name,
                        source: "auth",
                        level: "error",
                        message: "[Authorization failed]: no accessCode received from the server."
                    });
                }
            } else {
                oauth2.callback({auth: oauth2.auth, token: qp, isValid: isValid, redirectUrl: redirectUrl});
            }
            window.close();
        }

        if (document.readyState !== 'loading') {
            run();
        } else {
            document.addEventListener('DOMContentLoaded', function() {
                run();
            });
        }
    </script>
</body>
</html>"#
}

/// Simple HTML escaping for attribute values.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_page_loads_spec_from_query_parameter() {
        let ui = SwaggerUi::new("https://cdn.example/swagger-ui", "Test API");
        let asset = ui.serve("index.html").unwrap();

        assert_eq!(asset.content_type, "text/html; charset=utf-8");
        assert!(asset.body.contains("swagger-ui-bundle.js"));
        assert!(asset.body.contains(r#"get("url")"#));
        assert!(asset.body.contains("<title>Test API</title>"));
    }

    #[test]
    fn oauth2_redirect_page_is_served() {
        let ui = SwaggerUi::new("https://cdn.example/swagger-ui", "Test API");
        let asset = ui.serve("oauth2-redirect.html").unwrap();
        assert!(asset.body.contains("swaggerUIRedirectOauth2"));
    }

    #[test]
    fn unknown_files_are_missing_and_stay_missing() {
        let ui = SwaggerUi::new("https://cdn.example/swagger-ui", "Test API");
        assert!(ui.serve("swagger-ui.css.map").is_none());
        // Second lookup hits the cached miss.
        assert!(ui.serve("swagger-ui.css.map").is_none());
    }

    #[test]
    fn repeated_requests_reuse_the_cached_asset() {
        let ui = SwaggerUi::new("https://cdn.example/swagger-ui", "Test API");
        let first = ui.serve("index.html").unwrap();
        let second = ui.serve("index.html").unwrap();
        assert!(Arc::ptr_eq(&first.body, &second.body));
    }

    #[test]
    fn title_is_escaped() {
        let ui = SwaggerUi::new("https://cdn.example/swagger-ui", "<My> API");
        let asset = ui.serve("index.html").unwrap();
        assert!(asset.body.contains("&lt;My&gt; API"));
    }

    #[test]
    fn content_types_follow_extensions() {
        assert_eq!(content_type_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("swagger-ui.css"), "text/css");
        assert_eq!(content_type_for("bundle.js"), "application/javascript");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }
}
