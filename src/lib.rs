//! Whitted style recursive ray tracer.

pub mod raytracing;
