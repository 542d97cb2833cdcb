//! Domain models for the Route Weather Advisory system

pub mod city;
pub mod forecast;
pub mod observation;

pub use city::*;
pub use forecast::*;
pub use observation::*;
