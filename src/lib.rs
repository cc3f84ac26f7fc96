//! # spa-navigator
//!
//! Client-side navigation for single-page applications: path patterns with
//! named parameters, exit/enter handler chains driven by continuations,
//! session history synchronisation, and same-origin link interception.
//!
//! The router never talks to a browser directly. Everything environmental
//! goes through the [`Host`] trait: [`MemoryHost`] runs entirely in memory,
//! and `WebHost` (feature `web`) binds to `web-sys`.
//!
//! # Quick start
//!
//! ```
//! use spa_navigator::{ContextHandle, MemoryHost, Next, Options, Router};
//!
//! let host = MemoryHost::new();
//! let router = Router::new(host.clone());
//!
//! router
//!     .middleware(|ctx: &ContextHandle, next: Next| {
//!         ctx.borrow_mut().locals.insert("seen".into(), true.into());
//!         next.proceed();
//!     })
//!     .unwrap();
//! router
//!     .route("/user/:id", |ctx: &ContextHandle, _next: Next| {
//!         let id: u32 = ctx.borrow().params.get_as("id").unwrap();
//!         assert_eq!(id, 42);
//!     })
//!     .unwrap();
//! router.route("/", |_: &ContextHandle, _: Next| {}).unwrap();
//!
//! router.start(Options::new());
//! let ctx = router.show("/user/42");
//!
//! assert_eq!(ctx.borrow().route_path.as_deref(), Some("/user/:id"));
//! assert_eq!(router.current(), "/user/42");
//! assert_eq!(host.history_len(), 2);
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Default | Effect |
//! |-----------|---------|--------|
//! | `log`     | yes     | log through the `log` crate |
//! | `tracing` | no      | log through `tracing` instead |
//! | `cache`   | yes     | LRU cache of compiled patterns |
//! | `web`     | no      | `WebHost` for browsers |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod logging;

#[cfg(feature = "cache")]
pub mod cache;
mod click;
mod context;
mod dispatch;
mod error;
mod handler;
mod history;
mod host;
mod location;
mod memory;
mod options;
mod params;
mod pattern;
mod route;
mod router;
#[cfg(feature = "web")]
mod web;

pub use click::{ClickEvent, Element, Href};
pub use context::{Context, ContextHandle, NavigationPhase, PathConfig, State};
pub use error::RouterError;
pub use handler::{handler, Handler, Next, RouteHandler};
pub use host::{ClickListener, Host, PopStateEvent, PopStateListener, Task};
pub use location::Location;
pub use memory::MemoryHost;
pub use options::{NavigateOptions, Options, RouteOptions};
pub use params::{decode_uri_component, decode_url_component, QueryParams, RouteParams};
pub use pattern::{Key, PathPattern, PatternOptions, WILDCARD};
pub use route::Route;
pub use router::Router;
#[cfg(feature = "web")]
#[cfg_attr(docsrs, doc(cfg(feature = "web")))]
pub use web::WebHost;
