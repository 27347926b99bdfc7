//! Data Transfer Objects for the job-execution service
//!
//! Wire shapes sent to and received from the service. Domain code converts
//! them into the types in [`crate::domain`].

pub mod run;
