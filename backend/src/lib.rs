//! Collection-management backend library.
//!
//! Layered hexagonally: [`domain`] owns the entities, ports, and use-cases;
//! [`inbound`] adapts HTTP onto the driving ports; [`outbound`] implements
//! the driven ports with Diesel, bcrypt, and in-memory doubles.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Trace-id middleware re-exported for server wiring.
pub use middleware::Trace;
