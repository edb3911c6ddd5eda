//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the model layer answer? Failure → pulled from load-balancer. |

use crate::app::AppState;
use crate::model::UserId;
use crate::{Request, Response, Status};

/// Liveness probe.
///
/// Always returns `200 OK` with body `"ok"`. If the process can respond to
/// HTTP at all, it is alive; this handler has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe.
///
/// Returns `200 OK` with body `"ready"` once the user store answers a
/// lookup, `503 Service Unavailable` otherwise.
pub async fn readiness(req: Request) -> Response {
    let Ok(state) = AppState::from_request(&req) else {
        return Response::status(Status::ServiceUnavailable);
    };
    match state.users.get_by_id(UserId(0)).await {
        Ok(_) => Response::text("ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            Response::status(Status::ServiceUnavailable)
        }
    }
}
