//! Endpoint families shipped with the crate.
//!
//! Each family is a zero-sized type implementing
//! [`EndpointFamily`](querent_core::EndpointFamily): its operation kinds,
//! declared fields and validation rules.

pub mod compliance;
pub mod likes;
