//! dspm-api -- HTTP adapter for the DSPM scan pipeline
//!
//! Exposes one shared [`dspm_engine::DspmScanner`] over a small set of JSON routes.
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `POST` | `/scan` | Full scan result (body: optional JSON array of providers) |
//! | `GET` | `/misconfigurations` | Misconfiguration findings for all providers |
//! | `GET` | `/sensitive-data` | PII findings for all providers |
//! | `GET` | `/lineage` | Lineage graph `{nodes, edges}` |
//! | `GET` | `/risk-score` | Risk breakdown |
//! | `GET` | `/healthz` | `{"status": "ok"}` |

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
