//! Adapters wiring the ports to the outside world.

pub mod outbound;
