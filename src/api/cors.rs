//! Cross-origin policy layer.

use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::CorsPolicy;

/// Build the CORS layer for a policy.
///
/// Methods and headers are always unrestricted; only origins are narrowed.
pub fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match policy {
        CorsPolicy::Any => {
            warn!("CORS configured to allow ANY origin - narrow CORS_ALLOWED_ORIGINS for production");
            layer.allow_origin(Any)
        }
        CorsPolicy::List(origins) => {
            info!("CORS configured for origins: {:?}", origins);
            layer.allow_origin(AllowOrigin::list(origins.iter().cloned()))
        }
    }
}
